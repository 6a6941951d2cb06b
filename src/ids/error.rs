//! Error types for node identifiers.

use smol_str::SmolStr;
use thiserror::Error;

use crate::semantics::SemanticError;

/// Errors raised when an identifier cannot be computed.
///
/// These signal caller or configuration mistakes, not bad input data.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdError {
    /// The root of the tree has no source to ground structural ids in.
    #[error("Root node {concept} has no source")]
    MissingSource { concept: SmolStr },

    /// The node has a parent link but is not contained by a live parent.
    #[error("Node {concept} should not be root: it is not contained in its parent")]
    DetachedNode { concept: SmolStr },

    /// No declarative rule applies to the node.
    #[error("Node {0} has no semantic identity")]
    NoSemanticIdentity(SmolStr),

    #[error("Unknown concept: {0}")]
    UnknownConcept(SmolStr),

    /// Failure raised by a declarative id rule.
    #[error("{0}")]
    Rule(String),

    #[error(transparent)]
    Dispatch(#[from] SemanticError),
}

impl IdError {
    pub fn rule(message: impl Into<String>) -> Self {
        Self::Rule(message.into())
    }
}
