//! Error types for scope and type rules.

use smol_str::SmolStr;
use thiserror::Error;

use crate::model::ModelError;

/// Errors raised while registering or running semantic rules.
///
/// An unresolved name is never an error: it is reported by absence.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SemanticError {
    /// A rule was registered for a concept the metamodel does not know.
    #[error("Unknown concept: {0}")]
    UnknownConcept(SmolStr),

    #[error("Concept {concept} has no feature {feature}")]
    UnknownFeature { concept: SmolStr, feature: SmolStr },

    #[error("Feature {concept}.{feature} is not a reference")]
    NotAReference { concept: SmolStr, feature: SmolStr },

    /// Two rules were registered for the same key in one table.
    #[error("A rule for {0} is already registered")]
    DuplicateRule(String),

    /// Strict dispatch found two applicable rules neither of which is more specific.
    #[error("Ambiguous rules for {concept}: {first} and {second} both apply")]
    AmbiguousDispatch {
        concept: SmolStr,
        first: SmolStr,
        second: SmolStr,
    },

    /// Failure raised by a user rule.
    #[error("{0}")]
    Rule(String),

    #[error(transparent)]
    Model(#[from] ModelError),
}

impl SemanticError {
    pub fn rule(message: impl Into<String>) -> Self {
        Self::Rule(message.into())
    }
}
