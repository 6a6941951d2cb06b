//! A small class-based language: metamodel, factories, scope and type rules.

use std::rc::Rc;

use arbor::base::Source;
use arbor::model::{Concept, Metamodel, Node};
use arbor::semantics::{Scope, SemanticError, Semantics, SymbolResolver, TypeComputer};
use arbor::transform::{Record, Transformer};

pub const SOURCE_NAME: &str = "memory://classes";

pub fn class_metamodel() -> Rc<Metamodel> {
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
                .mapped_from("type"),
        )
        .build()
        .expect("class metamodel is well formed");
    Rc::new(metamodel)
}

pub fn class_transformer(metamodel: &Rc<Metamodel>) -> Transformer {
    let mut transformer =
        Transformer::new(Rc::clone(metamodel)).with_source(Source::named(SOURCE_NAME));
    for (source_type, concept) in [
        ("Unit", "CompilationUnit"),
        ("Class", "ClassDecl"),
        ("Field", "FeatureDecl"),
    ] {
        transformer
            .register_concept(source_type, concept)
            .expect("factory registers");
    }
    transformer
}

/// Every class of the enclosing compilation unit.
fn unit_classes(_: &Semantics, node: &Node) -> Result<Scope, SemanticError> {
    Ok(Scope::new().define_all(&node.root().children_of("classes")))
}

/// Superclasses and feature types are looked up among the unit's classes;
/// the type of a feature is the class its `type` names.
pub fn class_semantics(metamodel: &Rc<Metamodel>) -> Semantics {
    let mut resolver = SymbolResolver::new(Rc::clone(metamodel));
    resolver
        .scope_for("ClassDecl", "superclass", unit_classes)
        .expect("superclass scope registers");
    resolver
        .scope_for("FeatureDecl", "type", unit_classes)
        .expect("type scope registers");

    let mut types = TypeComputer::new(Rc::clone(metamodel));
    types
        .type_for("FeatureDecl", |semantics, node| {
            semantics.resolve_reference(node, "type")
        })
        .expect("type rule registers");
    types
        .type_for("ClassDecl", |_, node| Ok(Some(node.clone())))
        .expect("type rule registers");

    Semantics::new(resolver, types)
}

pub fn unit(classes: impl IntoIterator<Item = Record>) -> Record {
    Record::new("Unit").list("classes", classes)
}

pub fn class(name: &str, superclass: Option<&str>, members: Vec<Record>) -> Record {
    let record = Record::new("Class").field("name", name).list("members", members);
    match superclass {
        Some(superclass) => record.field("extends", superclass),
        None => record,
    }
}

pub fn field(name: &str, ty: &str) -> Record {
    Record::new("Field").field("name", name).field("type", ty)
}
