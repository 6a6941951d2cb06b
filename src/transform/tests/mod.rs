#![allow(clippy::unwrap_used)]


use std::rc::Rc;

use super::Transformer;
use crate::model::{Concept, Metamodel};

/// The class language with `mapped_from` paths on every feature.
pub(super) fn mapped_language() -> Rc<Metamodel> {
    let metamodel = Metamodel::builder()
        .concept(Concept::new("Named").attribute("name").mapped_from("name"))
        .concept(
            Concept::new("CompilationUnit")
                .children("classes", "ClassDecl")
                .mapped_from("classes"),
        )
        .concept(
            Concept::new("ClassDecl")
                .extends("Named")
                .children("features", "FeatureDecl")
                .mapped_from("members")
                .reference("superclass", "ClassDecl")
                .mapped_from("extends"),
        )
        .concept(
            Concept::new("FeatureDecl")
                .extends("Named")
                .reference("type", "ClassDecl")
                .mapped_from("type")
                .child("initializer", "Expression")
                .mapped_from("init"),
        )
        .concept(Concept::new("Expression"))
        .concept(
            Concept::new("Literal")
                .extends("Expression")
                .attribute("value")
                .mapped_from("value"),
        )
        .build()
        .unwrap();
    Rc::new(metamodel)
}

/// A transformer with one concept factory per foreign type of the class language.
pub(super) fn class_transformer(metamodel: &Rc<Metamodel>) -> Transformer {
    let mut transformer = Transformer::new(Rc::clone(metamodel));
    for (source_type, concept) in [
        ("Unit", "CompilationUnit"),
        ("Class", "ClassDecl"),
        ("Field", "FeatureDecl"),
        ("Literal", "Literal"),
    ] {
        transformer.register_concept(source_type, concept).unwrap();
    }
    transformer
}
