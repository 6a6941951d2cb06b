//! Symbol resolution.
//!
//! Scopes are computed by rules. A property rule is registered for one
//! reference feature and a context concept; a node rule for a context concept
//! alone. For a reference `feature` of `node`, property rules for that feature
//! are consulted first, then node rules; with no applicable rule the scope is
//! empty and the reference stays unresolved.

use std::rc::Rc;

use indexmap::IndexMap;
use smol_str::SmolStr;
use tracing::{debug, trace};

use super::Semantics;
use super::dispatch::{DispatchPolicy, DispatchTable};
use super::error::SemanticError;
use super::scope::Scope;
use crate::model::{FeatureDecl, FeatureKind, Metamodel, Node};

/// Computes the scope visible from a context node.
pub type ScopeRule = Rc<dyn Fn(&Semantics, &Node) -> Result<Scope, SemanticError>>;

pub struct SymbolResolver {
    metamodel: Rc<Metamodel>,
    policy: DispatchPolicy,
    /// (concept declaring the feature, feature) -> rules by context concept
    property_rules: IndexMap<(SmolStr, SmolStr), DispatchTable<ScopeRule>>,
    node_rules: DispatchTable<ScopeRule>,
}

impl SymbolResolver {
    pub fn new(metamodel: Rc<Metamodel>) -> Self {
        Self::with_policy(metamodel, DispatchPolicy::default())
    }

    pub fn with_policy(metamodel: Rc<Metamodel>, policy: DispatchPolicy) -> Self {
        Self {
            node_rules: DispatchTable::new(Rc::clone(&metamodel), policy),
            property_rules: IndexMap::new(),
            metamodel,
            policy,
        }
    }

    pub fn metamodel(&self) -> &Rc<Metamodel> {
        &self.metamodel
    }

    /// Register the scope for `feature` when the referencing node is a `concept`.
    pub fn scope_for(
        &mut self,
        concept: &str,
        feature: &str,
        rule: impl Fn(&Semantics, &Node) -> Result<Scope, SemanticError> + 'static,
    ) -> Result<(), SemanticError> {
        let decl = reference_decl(&self.metamodel, concept, feature)?;
        let key = (decl.owner.clone(), decl.name.clone());
        let metamodel = Rc::clone(&self.metamodel);
        let policy = self.policy;
        self.property_rules
            .entry(key)
            .or_insert_with(|| DispatchTable::new(metamodel, policy))
            .register(concept, Rc::new(rule))
            .map_err(|err| match err {
                SemanticError::DuplicateRule(_) => {
                    SemanticError::DuplicateRule(format!("{concept}.{feature}"))
                }
                other => other,
            })
    }

    /// Register the scope for every reference of nodes of `concept`.
    pub fn scope_for_node(
        &mut self,
        concept: &str,
        rule: impl Fn(&Semantics, &Node) -> Result<Scope, SemanticError> + 'static,
    ) -> Result<(), SemanticError> {
        self.node_rules.register(concept, Rc::new(rule))
    }

    pub(crate) fn scope(
        &self,
        semantics: &Semantics,
        node: &Node,
        feature: &str,
    ) -> Result<Scope, SemanticError> {
        let decl = reference_decl(&self.metamodel, node.concept_name(), feature)?;
        let property_rule = match self.property_rules.get(&(decl.owner.clone(), decl.name.clone())) {
            Some(table) => table.lookup(node.concept())?,
            None => None,
        };
        let rule = match property_rule {
            Some(rule) => Some(rule),
            None => self.node_rules.lookup(node.concept())?,
        };
        match rule {
            Some(rule) => rule(semantics, node),
            None => {
                trace!("[RESOLVE] no scope rule for {:?}.{}", node, feature);
                Ok(Scope::new())
            }
        }
    }

    pub(crate) fn resolve_reference(
        &self,
        semantics: &Semantics,
        node: &Node,
        feature: &str,
    ) -> Result<Option<Node>, SemanticError> {
        let decl = reference_decl(&self.metamodel, node.concept_name(), feature)?;
        let Some(reference) = node.reference(feature) else {
            return Ok(None);
        };
        let scope = self.scope(semantics, node, feature)?;
        match scope.resolve(reference.name(), decl.target.as_deref()) {
            Some(target) => {
                debug!("[RESOLVE] {:?}.{} -> {:?}", node, feature, target);
                node.resolve_reference(feature, &target)?;
                Ok(Some(target))
            }
            None => {
                trace!("[RESOLVE] {:?}.{} -> {} unresolved", node, feature, reference.name());
                Ok(None)
            }
        }
    }

    /// Resolve every reference in the tree, root included, in pre-order.
    pub(crate) fn resolve_tree(&self, semantics: &Semantics, root: &Node) -> Result<(), SemanticError> {
        for node in root.walk() {
            for (feature, _) in node.references() {
                self.resolve_reference(semantics, &node, &feature)?;
            }
        }
        Ok(())
    }
}

/// References in the tree that are set but point nowhere, as `(node, feature)`.
pub fn unresolved_references(root: &Node) -> Vec<(Node, SmolStr)> {
    root.walk()
        .flat_map(|node| {
            node.references()
                .into_iter()
                .filter(|(_, reference)| !reference.is_resolved())
                .map(move |(feature, _)| (node.clone(), feature))
                .collect::<Vec<_>>()
        })
        .collect()
}

fn reference_decl<'m>(
    metamodel: &'m Metamodel,
    concept: &str,
    feature: &str,
) -> Result<&'m FeatureDecl, SemanticError> {
    let decl = metamodel
        .concept(concept)
        .ok_or_else(|| SemanticError::UnknownConcept(concept.into()))?
        .feature(feature)
        .ok_or_else(|| SemanticError::UnknownFeature {
            concept: concept.into(),
            feature: feature.into(),
        })?;
    if decl.kind != FeatureKind::Reference {
        return Err(SemanticError::NotAReference {
            concept: concept.into(),
            feature: feature.into(),
        });
    }
    Ok(decl)
}
