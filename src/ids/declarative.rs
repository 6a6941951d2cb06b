//! Identifiers from domain rules.

use std::rc::Rc;

use tracing::trace;

use super::error::IdError;
use super::{Coordinates, NodeIdProvider};
use crate::model::{Metamodel, Node};
use crate::semantics::{DispatchPolicy, DispatchTable, SemanticError};

/// Computes the id of a node from its own attributes.
pub type IdRule = Rc<dyn Fn(&Node) -> Result<String, IdError>>;

/// Semantic ids: the most specific applicable rule names the node.
///
/// Nodes no rule applies to have no semantic identity; [`id`](NodeIdProvider::id)
/// reports that as [`IdError::NoSemanticIdentity`] so callers can fall back
/// to structural ids.
pub struct DeclarativeIdProvider {
    rules: DispatchTable<IdRule>,
}

impl DeclarativeIdProvider {
    pub fn new(metamodel: Rc<Metamodel>) -> Self {
        Self::with_policy(metamodel, DispatchPolicy::default())
    }

    pub fn with_policy(metamodel: Rc<Metamodel>, policy: DispatchPolicy) -> Self {
        Self {
            rules: DispatchTable::new(metamodel, policy),
        }
    }

    pub fn rule(
        &mut self,
        concept: &str,
        rule: impl Fn(&Node) -> Result<String, IdError> + 'static,
    ) -> Result<(), IdError> {
        self.rules
            .register(concept, Rc::new(rule))
            .map_err(|err| match err {
                SemanticError::UnknownConcept(concept) => IdError::UnknownConcept(concept),
                other => IdError::Dispatch(other),
            })
    }

    pub fn has_semantic_identity(&self, node: &Node) -> Result<bool, IdError> {
        Ok(self.rules.lookup(node.concept())?.is_some())
    }

    /// The semantic id of `node`, or `None` when no rule applies.
    pub fn semantic_id(&self, node: &Node) -> Result<Option<String>, IdError> {
        match self.rules.lookup(node.concept())? {
            Some(rule) => {
                let id = rule(node)?;
                trace!("[IDS] {:?} -> {} (semantic)", node, id);
                Ok(Some(id))
            }
            None => Ok(None),
        }
    }
}

impl NodeIdProvider for DeclarativeIdProvider {
    fn id(&self, node: &Node) -> Result<String, IdError> {
        self.semantic_id(node)?
            .ok_or_else(|| IdError::NoSemanticIdentity(node.concept_name().into()))
    }

    /// Semantic ids do not depend on position.
    fn id_using_coordinates(&self, node: &Node, _: &Coordinates) -> Result<String, IdError> {
        self.id(node)
    }
}
