//! Error types for schema registration and node mutation.

use smol_str::SmolStr;
use thiserror::Error;

/// Errors raised by the metamodel builder and by schema-checked node mutation.
///
/// All of these signal misconfiguration or caller mistakes, never bad input data.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    /// The same concept name was registered twice.
    #[error("Duplicate concept: {0}")]
    DuplicateConcept(SmolStr),

    /// A concept name that the metamodel does not know.
    #[error("Unknown concept: {0}")]
    UnknownConcept(SmolStr),

    /// A concept extends a concept that was never registered.
    #[error("Concept {concept} extends unknown concept {supertype}")]
    UnknownSupertype { concept: SmolStr, supertype: SmolStr },

    /// A feature points at a concept that was never registered.
    #[error("Feature {concept}.{feature} targets unknown concept {target}")]
    UnknownTarget {
        concept: SmolStr,
        feature: SmolStr,
        target: SmolStr,
    },

    /// Two features with the same name in one concept's inherited feature set.
    #[error("Feature {feature} is declared more than once in {concept}")]
    DuplicateFeature { concept: SmolStr, feature: SmolStr },

    /// The supertype graph loops back on itself.
    #[error("Inheritance cycle through concept {0}")]
    InheritanceCycle(SmolStr),

    /// `mapped_from` was used before any feature was declared.
    #[error("Concept {0} declares a mapping before any feature")]
    DanglingMapping(SmolStr),

    /// A node was asked for a feature its concept does not declare.
    #[error("Concept {concept} has no feature {feature}")]
    UnknownFeature { concept: SmolStr, feature: SmolStr },

    /// A value of the wrong kind or type was assigned to a feature.
    #[error("Cannot assign to {concept}.{feature}: {reason}")]
    AssignmentRejected {
        concept: SmolStr,
        feature: SmolStr,
        reason: String,
    },
}

impl ModelError {
    pub(crate) fn rejected(concept: &str, feature: &str, reason: impl Into<String>) -> Self {
        Self::AssignmentRejected {
            concept: concept.into(),
            feature: feature.into(),
            reason: reason.into(),
        }
    }
}
