//! # Node Model
//!
//! The AST side of arbor: a statically declared schema ([`Metamodel`] of
//! [`Concept`]s) and the [`Node`]s built against it, plus the two things every
//! traversal passes around: [`Issue`]s and the [`ForeignNode`] contract for the
//! parse trees nodes are derived from.
//!
//! ## Key Types
//!
//! - [`Metamodel`], [`Concept`], [`FeatureDecl`] - the schema
//! - [`Node`], [`WeakNode`], [`NodeKey`] - reference-identity tree handles
//! - [`ReferenceByName`] - named links filled in by symbol resolution
//! - [`Origin`] - back-link to the foreign element a node derives from
//! - [`Issue`] - accumulated, non-fatal diagnostics

mod concept;
mod error;
mod foreign;
mod issue;
mod node;
mod value;

pub use concept::{
    BASE_CONCEPT, Concept, ERROR_MESSAGE_FEATURE, ERROR_NODE, FeatureDecl, FeatureKind,
    GENERIC_NODE, Metamodel, MetamodelBuilder, NAME_FEATURE,
};
pub use error::ModelError;
pub use foreign::{ForeignNode, ForeignRef, ForeignValue};
pub use issue::{Issue, IssueType, Severity};
pub use node::{Ancestors, Node, NodeKey, Origin, ReferenceByName, Walk, WeakNode};
pub use value::Value;

#[cfg(test)]
mod tests;
