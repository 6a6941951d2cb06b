//! # Node Identifiers
//!
//! Stable string ids for AST nodes, through the [`NodeIdProvider`] trait.
//!
//! - [`StructuralIdProvider`] - from tree shape, grounded in the root's [`Source`](crate::base::Source)
//! - [`DeclarativeIdProvider`] - from domain rules dispatched on concept specificity
//! - [`CommonIdProvider`] - semantic where a rule applies, structural otherwise
//! - [`CachingIdProvider`] - memoizes any provider per node identity
//!
//! Providers are single-threaded, like the nodes they identify.

mod caching;
mod common;
mod declarative;
mod error;
mod source;
mod structural;

use std::rc::Rc;

use smol_str::SmolStr;

pub use caching::CachingIdProvider;
pub use common::CommonIdProvider;
pub use declarative::{DeclarativeIdProvider, IdRule};
pub use error::IdError;
pub use source::{SimpleSourceIdProvider, SourceIdProvider};
pub use structural::StructuralIdProvider;

use crate::model::Node;

/// Where a node sits, as seen by a model repository assigning ids.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Coordinates {
    Root,
    Contained {
        container_id: String,
        feature: SmolStr,
        index: usize,
    },
}

pub trait NodeIdProvider {
    fn id(&self, node: &Node) -> Result<String, IdError>;

    /// The id `node` would have at `coordinates`, wherever it currently is.
    fn id_using_coordinates(
        &self,
        node: &Node,
        coordinates: &Coordinates,
    ) -> Result<String, IdError>;
}

impl<P: NodeIdProvider + ?Sized> NodeIdProvider for &P {
    fn id(&self, node: &Node) -> Result<String, IdError> {
        (**self).id(node)
    }

    fn id_using_coordinates(
        &self,
        node: &Node,
        coordinates: &Coordinates,
    ) -> Result<String, IdError> {
        (**self).id_using_coordinates(node, coordinates)
    }
}

impl<P: NodeIdProvider + ?Sized> NodeIdProvider for Rc<P> {
    fn id(&self, node: &Node) -> Result<String, IdError> {
        (**self).id(node)
    }

    fn id_using_coordinates(
        &self,
        node: &Node,
        coordinates: &Coordinates,
    ) -> Result<String, IdError> {
        (**self).id_using_coordinates(node, coordinates)
    }
}

#[cfg(test)]
mod tests;
