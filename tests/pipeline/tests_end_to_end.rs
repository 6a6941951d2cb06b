use arbor::model::Node;
use arbor::semantics::unresolved_references;

use crate::helpers::class_language::{
    class, class_metamodel, class_semantics, class_transformer, field, unit,
};
use crate::helpers::node_assertions::{assert_resolved_to, assert_unresolved, get_named};

/// unit { class A extends Missing { x: B }, class B extends A { y: A } }
fn transformed_unit() -> Node {
    let metamodel = class_metamodel();
    let mut transformer = class_transformer(&metamodel);
    let input = unit([
        class("A", Some("Missing"), vec![field("x", "B")]),
        class("B", Some("A"), vec![field("y", "A")]),
    ]);
    let root = transformer
        .transform(&input.into_value(), None)
        .unwrap()
        .unwrap();
    assert!(transformer.issues().is_empty());
    root
}

#[test]
fn test_three_level_tree_is_built_in_declaration_order() {
    let root = transformed_unit();

    assert_eq!(root.concept_name(), "CompilationUnit");
    let shape: Vec<String> = root.walk().map(|node| format!("{:?}", node)).collect();
    assert_eq!(
        shape,
        [
            "CompilationUnit",
            "ClassDecl(\"A\")",
            "FeatureDecl(\"x\")",
            "ClassDecl(\"B\")",
            "FeatureDecl(\"y\")",
        ]
    );
    for node in root.walk().skip(1) {
        assert!(node.parent().is_some());
        assert!(node.origin().is_some());
    }
}

#[test]
fn test_sibling_superclass_resolves_and_missing_one_does_not() {
    let metamodel = class_metamodel();
    let root = transformed_unit();
    let semantics = class_semantics(&metamodel);

    semantics.resolve_tree(&root).unwrap();

    let a = get_named(&root, "ClassDecl", "A");
    let b = get_named(&root, "ClassDecl", "B");
    assert_resolved_to(&b, "superclass", &a);
    assert_unresolved(&a, "superclass");
    assert_resolved_to(&get_named(&root, "FeatureDecl", "x"), "type", &b);
    assert_resolved_to(&get_named(&root, "FeatureDecl", "y"), "type", &a);

    let unresolved = unresolved_references(&root);
    assert_eq!(unresolved.len(), 1);
    assert!(unresolved[0].0.ptr_eq(&a));
    assert!(semantics.issues().is_empty());
}

#[test]
fn test_resolving_twice_changes_nothing() {
    let metamodel = class_metamodel();
    let root = transformed_unit();
    let semantics = class_semantics(&metamodel);

    semantics.resolve_tree(&root).unwrap();
    let first: Vec<_> = root.walk().flat_map(|node| node.references()).collect();
    semantics.resolve_tree(&root).unwrap();
    let second: Vec<_> = root.walk().flat_map(|node| node.references()).collect();

    assert_eq!(first, second);
}

#[test]
fn test_types_are_declarations_in_the_tree() {
    let metamodel = class_metamodel();
    let root = transformed_unit();
    let semantics = class_semantics(&metamodel);

    let x = get_named(&root, "FeatureDecl", "x");
    let b = get_named(&root, "ClassDecl", "B");
    let ty = semantics.type_for(Some(&x)).unwrap().unwrap();
    assert!(ty.ptr_eq(&b));
    assert!(semantics.type_for(Some(&x)).unwrap().unwrap().ptr_eq(&ty));
    // Computing the type resolved the reference it depends on
    assert_resolved_to(&x, "type", &b);
    assert!(semantics.type_for(Some(&root)).unwrap().is_none());
}
