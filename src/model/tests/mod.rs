#![allow(clippy::unwrap_used)]


use super::{Concept, Metamodel};

/// A small class-based language shared by the model tests.
pub(super) fn class_language() -> Metamodel {
    Metamodel::builder()
        .concept(Concept::new("Named").attribute("name"))
        .concept(Concept::new("CompilationUnit").children("classes", "ClassDecl"))
        .concept(
            Concept::new("ClassDecl")
                .extends("Named")
                .children("features", "FeatureDecl")
                .reference("superclass", "ClassDecl"),
        )
        .concept(
            Concept::new("FeatureDecl")
                .extends("Named")
                .reference("type", "ClassDecl")
                .child("initializer", "Expression"),
        )
        .concept(Concept::new("Expression"))
        .build()
        .unwrap()
}
