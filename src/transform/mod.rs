//! # Transformation
//!
//! Turns a foreign parse tree into an AST of [`Node`](crate::model::Node)s.
//!
//! A [`Transformer`] holds one [`Factory`] per foreign runtime type. For every
//! foreign node it finds the factory registered for the node's type (or the
//! nearest supertype), builds the AST node, attaches origin, range and parent,
//! then fills each feature of the node's concept from the factory's explicit
//! [`ChildRule`]s or, failing that, from the feature's `mapped_from` path.
//!
//! Bad input degrades instead of aborting:
//!
//! - no factory: a `GenericNode` placeholder and an `Info` translation issue
//! - failing factory: an `ErrorNode` carrying the message and an `Error` issue
//!
//! Both behaviors can be switched off through [`TransformerConfig`].
//!
//! Foreign trees come from any [`ForeignNode`](crate::model::ForeignNode)
//! implementation; [`Record`] and [`RowanNode`] are provided.

mod config;
mod cst;
mod engine;
mod error;
mod factory;
mod record;

pub use config::TransformerConfig;
pub use cst::RowanNode;
pub use engine::Transformer;
pub use error::TransformError;
pub use factory::{ChildRule, Constructor, Factory, FeatureSource, FinallyHook, Getter};
pub use record::Record;

#[cfg(test)]
mod tests;
