//! Rule dispatch by concept specificity.
//!
//! A [`DispatchTable`] maps concepts to rules. A rule applies to a node when
//! its concept is the node's concept or one of its supertypes; the most
//! specific applicable rule wins, with concept names breaking ties between
//! unrelated applicable rules. Rules that do not apply to a node never affect
//! its dispatch. The winner for each concept is memoized, and the overall
//! specificity order reported by [`DispatchTable::ordered_concepts`] is
//! computed once per rule set.

use std::cell::RefCell;
use std::rc::Rc;

use indexmap::IndexMap;
use rustc_hash::FxHashMap;
use smol_str::SmolStr;

use super::error::SemanticError;
use crate::model::{Concept, Metamodel};

/// What to do when the best applicable rules are for unrelated concepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DispatchPolicy {
    /// Pick the most specific applicable rule whose concept name sorts first
    #[default]
    NameOrder,
    /// Fail with [`SemanticError::AmbiguousDispatch`]
    Strict,
}

type Selection = Result<Option<usize>, SemanticError>;

pub struct DispatchTable<R> {
    metamodel: Rc<Metamodel>,
    policy: DispatchPolicy,
    rules: IndexMap<SmolStr, R>,
    /// Rule indices, most specific first
    order: RefCell<Option<Rc<[usize]>>>,
    /// Node concept -> selected rule index
    selected: RefCell<FxHashMap<SmolStr, Selection>>,
}

impl<R> DispatchTable<R> {
    pub fn new(metamodel: Rc<Metamodel>, policy: DispatchPolicy) -> Self {
        Self {
            metamodel,
            policy,
            rules: IndexMap::new(),
            order: RefCell::new(None),
            selected: RefCell::new(FxHashMap::default()),
        }
    }

    pub fn metamodel(&self) -> &Rc<Metamodel> {
        &self.metamodel
    }

    pub fn policy(&self) -> DispatchPolicy {
        self.policy
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn register(&mut self, concept: &str, rule: R) -> Result<(), SemanticError> {
        if !self.metamodel.contains(concept) {
            return Err(SemanticError::UnknownConcept(concept.into()));
        }
        if self.rules.contains_key(concept) {
            return Err(SemanticError::DuplicateRule(concept.into()));
        }
        self.rules.insert(concept.into(), rule);
        self.order.get_mut().take();
        self.selected.get_mut().clear();
        Ok(())
    }

    /// Rule concepts in dispatch order.
    pub fn ordered_concepts(&self) -> Vec<SmolStr> {
        self.order()
            .iter()
            .filter_map(|&index| self.rules.get_index(index).map(|(name, _)| name.clone()))
            .collect()
    }

    /// The most specific rule applicable to nodes of `concept`, if any.
    pub fn lookup(&self, concept: &Concept) -> Result<Option<&R>, SemanticError> {
        let cached = self.selected.borrow().get(concept.name()).cloned();
        let selection = match cached {
            Some(selection) => selection,
            None => {
                let selection = self.select(concept);
                self.selected
                    .borrow_mut()
                    .insert(concept.name().into(), selection.clone());
                selection
            }
        };
        Ok(selection?.and_then(|index| self.rules.get_index(index).map(|(_, rule)| rule)))
    }

    fn select(&self, concept: &Concept) -> Selection {
        let applicable: Vec<usize> = (0..self.rules.len())
            .filter(|&index| concept.is_a(self.name_at(index)))
            .collect();
        // Applicable rules with no more specific applicable rule, by name
        let mut best: Vec<usize> = applicable
            .iter()
            .copied()
            .filter(|&candidate| {
                !applicable.iter().any(|&other| {
                    other != candidate
                        && self
                            .metamodel
                            .is_subtype(self.name_at(other), self.name_at(candidate))
                })
            })
            .collect();
        best.sort_by_key(|&index| self.name_at(index));
        match best.as_slice() {
            [] => Ok(None),
            [first, second, ..] if self.policy == DispatchPolicy::Strict => {
                Err(SemanticError::AmbiguousDispatch {
                    concept: concept.name().into(),
                    first: self.name_at(*first).into(),
                    second: self.name_at(*second).into(),
                })
            }
            [first, ..] => Ok(Some(*first)),
        }
    }

    fn name_at(&self, index: usize) -> &str {
        self.rules
            .get_index(index)
            .map_or("", |(name, _)| name.as_str())
    }

    fn order(&self) -> Rc<[usize]> {
        if let Some(order) = self.order.borrow().as_ref() {
            return Rc::clone(order);
        }
        let names: Vec<&str> = self.rules.keys().map(SmolStr::as_str).collect();
        let order: Rc<[usize]> = specificity_order(&names, &self.metamodel).into();
        *self.order.borrow_mut() = Some(Rc::clone(&order));
        order
    }
}

/// Repeatedly take the rule with no more specific rule left, smallest name first.
fn specificity_order(names: &[&str], metamodel: &Metamodel) -> Vec<usize> {
    let mut remaining: Vec<usize> = (0..names.len()).collect();
    let mut order = Vec::with_capacity(names.len());
    while let Some(&fallback) = remaining.first() {
        let next = remaining
            .iter()
            .copied()
            .filter(|&candidate| {
                !remaining.iter().any(|&other| {
                    other != candidate && metamodel.is_subtype(names[other], names[candidate])
                })
            })
            .min_by_key(|&candidate| names[candidate])
            .unwrap_or(fallback);
        remaining.retain(|&index| index != next);
        order.push(next);
    }
    order
}
