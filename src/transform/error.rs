//! Error types for the transformation engine.

use smol_str::SmolStr;
use thiserror::Error;

use crate::model::ModelError;

/// Errors raised while turning a foreign tree into an AST.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransformError {
    /// A collection was handed over where a single foreign node was expected.
    #[error("Expected a single foreign node {context}, got a collection")]
    UnexpectedCollection { context: String },

    /// A scalar was handed over where a foreign node was expected.
    #[error("Expected a foreign node {context}, got a {found} value")]
    UnexpectedValue { context: String, found: &'static str },

    /// No factory matches the type and generic placeholders are disabled.
    #[error("No factory registered for foreign type {0}")]
    UnmappedType(SmolStr),

    /// A factory for this foreign type is already registered.
    #[error("A factory for foreign type {0} is already registered")]
    DuplicateFactory(SmolStr),

    /// A concept-qualified child rule names a concept or feature that does not exist.
    #[error("Factory for {source_type} declares a rule for unknown feature {feature}")]
    UnknownChildRule { source_type: SmolStr, feature: String },

    /// Failure raised by a factory; contained as an error node unless configured otherwise.
    #[error("{0}")]
    Factory(String),

    /// A schema-checked assignment was rejected.
    #[error(transparent)]
    Model(#[from] ModelError),
}

impl TransformError {
    /// Convenience constructor for factory failures.
    pub fn factory(message: impl Into<String>) -> Self {
        Self::Factory(message.into())
    }

    /// Whether the engine may replace the failing subtree with an error node.
    ///
    /// Everything else is a misconfiguration and aborts the run.
    pub fn is_containable(&self) -> bool {
        matches!(self, TransformError::Factory(_))
    }
}
