#![allow(clippy::unwrap_used)]

use std::rc::Rc;

use crate::model::{Concept, Metamodel};
use crate::semantics::{DispatchPolicy, DispatchTable, SemanticError};

/// A <- B, A <- C, (B, C) <- D, plus an unrelated E
fn diamond() -> Rc<Metamodel> {
    let metamodel = Metamodel::builder()
        .concept(Concept::new("A"))
        .concept(Concept::new("B").extends("A"))
        .concept(Concept::new("C").extends("A"))
        .concept(Concept::new("D").extends("B").extends("C"))
        .concept(Concept::new("E"))
        .build()
        .unwrap();
    Rc::new(metamodel)
}

fn table(policy: DispatchPolicy, concepts: &[&'static str]) -> DispatchTable<&'static str> {
    let mut table = DispatchTable::new(diamond(), policy);
    for concept in concepts {
        table.register(concept, *concept).unwrap();
    }
    table
}

fn lookup(table: &DispatchTable<&'static str>, concept: &str) -> Option<&'static str> {
    let concept = Rc::clone(table.metamodel().concept(concept).unwrap());
    table.lookup(&concept).unwrap().copied()
}

#[test]
fn test_most_specific_rule_wins() {
    let table = table(DispatchPolicy::NameOrder, &["A", "B"]);
    assert_eq!(lookup(&table, "B"), Some("B"));
    assert_eq!(lookup(&table, "A"), Some("A"));
    assert_eq!(lookup(&table, "D"), Some("B"));
    assert_eq!(lookup(&table, "C"), Some("A"));
    assert_eq!(lookup(&table, "E"), None);
}

#[test]
fn test_registration_order_does_not_matter() {
    let forward = table(DispatchPolicy::NameOrder, &["A", "B", "C", "D"]);
    let backward = table(DispatchPolicy::NameOrder, &["D", "C", "B", "A"]);
    assert_eq!(forward.ordered_concepts(), ["D", "B", "C", "A"]);
    assert_eq!(backward.ordered_concepts(), ["D", "B", "C", "A"]);
}

#[test]
fn test_unrelated_rules_tie_break_on_name() {
    let table = table(DispatchPolicy::NameOrder, &["C", "B"]);
    assert_eq!(lookup(&table, "D"), Some("B"));
    // Memoized answer is stable
    assert_eq!(lookup(&table, "D"), Some("B"));
}

#[test]
fn test_strict_policy_rejects_ambiguity() {
    let table = table(DispatchPolicy::Strict, &["A", "C", "B"]);
    let d = Rc::clone(table.metamodel().concept("D").unwrap());
    let err = table.lookup(&d).err().unwrap();
    assert_eq!(
        err,
        SemanticError::AmbiguousDispatch {
            concept: "D".into(),
            first: "B".into(),
            second: "C".into(),
        }
    );
    // Unambiguous nodes still dispatch
    assert_eq!(lookup(&table, "B"), Some("B"));
    assert_eq!(lookup(&table, "A"), Some("A"));
}

#[test]
fn test_strict_policy_accepts_a_unique_best_rule() {
    let table = table(DispatchPolicy::Strict, &["B", "C", "D"]);
    assert_eq!(lookup(&table, "D"), Some("D"));
}

#[test]
fn test_new_registration_invalidates_order() {
    let mut table = table(DispatchPolicy::NameOrder, &["A"]);
    assert_eq!(lookup(&table, "D"), Some("A"));
    table.register("D", "D").unwrap();
    assert_eq!(lookup(&table, "D"), Some("D"));
}

#[test]
fn test_bad_registrations() {
    let mut table = table(DispatchPolicy::NameOrder, &["A"]);
    assert_eq!(
        table.register("A", "again"),
        Err(SemanticError::DuplicateRule("A".into()))
    );
    assert_eq!(
        table.register("Z", "z"),
        Err(SemanticError::UnknownConcept("Z".into()))
    );
    assert_eq!(table.len(), 1);
}

#[test]
fn test_rules_that_do_not_apply_leave_dispatch_alone() {
    // Z <: B, N <: (B, C)
    let metamodel = Metamodel::builder()
        .concept(Concept::new("B"))
        .concept(Concept::new("C"))
        .concept(Concept::new("Z").extends("B"))
        .concept(Concept::new("N").extends("B").extends("C"))
        .build()
        .unwrap();
    let metamodel = Rc::new(metamodel);
    let n = Rc::clone(metamodel.concept("N").unwrap());

    let mut table = DispatchTable::new(Rc::clone(&metamodel), DispatchPolicy::NameOrder);
    table.register("B", "B").unwrap();
    table.register("C", "C").unwrap();
    assert_eq!(table.lookup(&n).unwrap().copied(), Some("B"));

    table.register("Z", "Z").unwrap();
    assert_eq!(table.lookup(&n).unwrap().copied(), Some("B"));
    let z = Rc::clone(metamodel.concept("Z").unwrap());
    assert_eq!(table.lookup(&z).unwrap().copied(), Some("Z"));
}
