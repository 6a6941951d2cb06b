//! On-demand type computation.

use std::rc::Rc;

use tracing::trace;

use super::Semantics;
use super::dispatch::{DispatchPolicy, DispatchTable};
use super::error::SemanticError;
use crate::model::{Metamodel, Node};

/// Computes the type of a node, typically an existing declaration node.
pub type TypeRule = Rc<dyn Fn(&Semantics, &Node) -> Result<Option<Node>, SemanticError>>;

/// Type rules keyed by node concept, dispatched by specificity.
///
/// Nothing is cached: the result is a function of the node and of the
/// current resolution state, so rules can resolve references they depend on.
pub struct TypeComputer {
    rules: DispatchTable<TypeRule>,
}

impl TypeComputer {
    pub fn new(metamodel: Rc<Metamodel>) -> Self {
        Self::with_policy(metamodel, DispatchPolicy::default())
    }

    pub fn with_policy(metamodel: Rc<Metamodel>, policy: DispatchPolicy) -> Self {
        Self {
            rules: DispatchTable::new(metamodel, policy),
        }
    }

    /// Register how the type of nodes of `concept` is computed.
    pub fn type_for(
        &mut self,
        concept: &str,
        rule: impl Fn(&Semantics, &Node) -> Result<Option<Node>, SemanticError> + 'static,
    ) -> Result<(), SemanticError> {
        self.rules.register(concept, Rc::new(rule))
    }

    pub(crate) fn compute(
        &self,
        semantics: &Semantics,
        node: Option<&Node>,
    ) -> Result<Option<Node>, SemanticError> {
        let Some(node) = node else {
            return Ok(None);
        };
        match self.rules.lookup(node.concept())? {
            Some(rule) => {
                let ty = rule(semantics, node)?;
                trace!("[TYPES] {:?} : {:?}", node, ty);
                Ok(ty)
            }
            None => Ok(None),
        }
    }
}
