#![allow(clippy::unwrap_used)]

mod tests_dispatch;

use std::rc::Rc;

use crate::model::{Concept, Metamodel, Node, ReferenceByName, Value};

pub(super) fn class_language() -> Rc<Metamodel> {
    let metamodel = Metamodel::builder()
        .concept(Concept::new("Named").attribute("name"))
        .concept(Concept::new("CompilationUnit").children("classes", "ClassDecl"))
        .concept(
            Concept::new("ClassDecl")
                .extends("Named")
                .children("features", "FeatureDecl")
                .reference("superclass", "ClassDecl"),
        )
        .concept(Concept::new("InterfaceDecl").extends("ClassDecl"))
        .concept(
            Concept::new("FeatureDecl")
                .extends("Named")
                .reference("type", "ClassDecl"),
        )
        .build()
        .unwrap();
    Rc::new(metamodel)
}

pub(super) fn named(mm: &Metamodel, concept: &str, name: &str) -> Node {
    let node = mm.create(concept).unwrap();
    node.set_attribute("name", Some(Value::from(name))).unwrap();
    node
}

pub(super) fn refer(node: &Node, feature: &str, name: &str) {
    node.set_reference(feature, Some(ReferenceByName::new(name)))
        .unwrap();
}
