use std::cell::Cell;
use std::rc::Rc;

use arbor::ids::{
    CachingIdProvider, CommonIdProvider, Coordinates, DeclarativeIdProvider, IdError,
    NodeIdProvider, StructuralIdProvider,
};
use arbor::model::Node;

use crate::helpers::class_language::{
    SOURCE_NAME, class, class_metamodel, class_transformer, field, unit,
};
use crate::helpers::node_assertions::get_named;

fn transformed(classes: Vec<arbor::transform::Record>) -> Node {
    let metamodel = class_metamodel();
    let mut transformer = class_transformer(&metamodel);
    transformer
        .transform(&unit(classes).into_value(), None)
        .unwrap()
        .unwrap()
}

#[test]
fn test_structural_ids_of_a_transformed_tree() {
    let root = transformed(vec![
        class("A", None, vec![field("x", "B"), field("y", "B")]),
        class("B", None, vec![]),
    ]);
    let ids = StructuralIdProvider::new();

    let root_id = format!("{SOURCE_NAME}_root");
    assert_eq!(ids.id(&root).unwrap(), root_id);
    assert_eq!(
        ids.id(&get_named(&root, "ClassDecl", "B")).unwrap(),
        format!("{root_id}_classes_1")
    );
    assert_eq!(
        ids.id(&get_named(&root, "FeatureDecl", "y")).unwrap(),
        format!("{root_id}_classes_features_1")
    );
}

#[test]
fn test_common_ids_with_qualified_class_names() {
    let metamodel = class_metamodel();
    let root = transformed(vec![
        class("A", None, vec![field("x", "A")]),
        class("B", None, vec![]),
    ]);

    let mut semantic = DeclarativeIdProvider::new(Rc::clone(&metamodel));
    semantic
        .rule("ClassDecl", |node| {
            node.name()
                .map(|name| format!("class:{name}"))
                .ok_or_else(|| IdError::rule("anonymous class"))
        })
        .unwrap();
    let ids = CommonIdProvider::new(semantic, StructuralIdProvider::new());

    assert_eq!(ids.id(&get_named(&root, "ClassDecl", "B")).unwrap(), "class:B");
    assert_eq!(
        ids.id(&get_named(&root, "FeatureDecl", "x")).unwrap(),
        format!("{SOURCE_NAME}_root_classes_features")
    );
    assert!(ids.semantic().has_semantic_identity(&get_named(&root, "ClassDecl", "A")).unwrap());
    assert!(!ids.semantic().has_semantic_identity(&root).unwrap());
}

struct Counting<P> {
    inner: P,
    calls: Cell<usize>,
}

impl<P: NodeIdProvider> NodeIdProvider for Counting<P> {
    fn id(&self, node: &Node) -> Result<String, IdError> {
        self.calls.set(self.calls.get() + 1);
        self.inner.id(node)
    }

    fn id_using_coordinates(
        &self,
        node: &Node,
        coordinates: &Coordinates,
    ) -> Result<String, IdError> {
        self.inner.id_using_coordinates(node, coordinates)
    }
}

#[test]
fn test_cached_ids_are_computed_once_per_node() {
    let root = transformed(vec![
        class("A", None, vec![field("x", "B")]),
        class("B", None, vec![field("y", "A")]),
    ]);
    let counting = Counting {
        inner: StructuralIdProvider::new(),
        calls: Cell::new(0),
    };
    let cached = CachingIdProvider::new(&counting);

    let first: Vec<String> = root.walk().map(|node| cached.id(&node).unwrap()).collect();
    let second: Vec<String> = root.walk().map(|node| cached.id(&node).unwrap()).collect();

    assert_eq!(first, second);
    assert_eq!(counting.calls.get(), root.walk().count());
}
