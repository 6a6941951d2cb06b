#![allow(clippy::unwrap_used)]

use rstest::rstest;

use super::{item, item_language, tree};
use crate::base::Source;
use crate::ids::{Coordinates, IdError, NodeIdProvider, StructuralIdProvider};

#[test]
fn test_ids_follow_tree_shape() {
    let mm = item_language();
    let tree = tree(&mm);
    let ids = StructuralIdProvider::new();

    assert_eq!(ids.id(&tree.root).unwrap(), "repo_root");
    assert_eq!(ids.id(&tree.items[0]).unwrap(), "repo_root_items");
    assert_eq!(ids.id(&tree.items[1]).unwrap(), "repo_root_items_1");
    assert_eq!(ids.id(&tree.items[2]).unwrap(), "repo_root_items_2");
    assert_eq!(ids.id(&tree.part).unwrap(), "repo_root_items_1_parts");
}

#[test]
fn test_reordering_permutes_ids() {
    let mm = item_language();
    let tree = tree(&mm);
    let ids = StructuralIdProvider::new();
    let before: Vec<String> = tree.items.iter().map(|n| ids.id(n).unwrap()).collect();

    let [c0, c1, c2] = [&tree.items[0], &tree.items[1], &tree.items[2]];
    tree.root
        .set_children("items", vec![c2.clone(), c1.clone(), c0.clone()])
        .unwrap();

    assert_eq!(ids.id(c2).unwrap(), before[0]);
    assert_eq!(ids.id(c1).unwrap(), before[1]);
    assert_eq!(ids.id(c0).unwrap(), before[2]);
}

#[test]
fn test_first_element_id_is_stable_while_it_stays_first() {
    let mm = item_language();
    let tree = tree(&mm);
    let ids = StructuralIdProvider::new();
    let first = ids.id(&tree.items[0]).unwrap();

    let [c0, c1, c2] = [&tree.items[0], &tree.items[1], &tree.items[2]];
    tree.root
        .set_children("items", vec![c0.clone(), c2.clone(), c1.clone()])
        .unwrap();
    assert_eq!(ids.id(c0).unwrap(), first);
}

#[test]
fn test_sourceless_root_fails() {
    let mm = item_language();
    let ids = StructuralIdProvider::new();
    let root = mm.create("Model").unwrap();
    let child = item(&mm, "x");
    root.add_child("items", child.clone()).unwrap();

    let expected = IdError::MissingSource {
        concept: "Model".into(),
    };
    assert_eq!(ids.id(&root).unwrap_err(), expected);
    assert_eq!(ids.id(&child).unwrap_err(), expected);
}

#[test]
fn test_dangling_node_should_not_be_root() {
    let mm = item_language();
    let ids = StructuralIdProvider::new();
    let orphan = item(&mm, "x");
    {
        let root = mm.create("Model").unwrap();
        root.set_source(Some(Source::named("gone")));
        root.add_child("items", orphan.clone()).unwrap();
    }

    assert!(!orphan.is_root());
    let err = ids.id(&orphan).unwrap_err();
    assert_eq!(
        err,
        IdError::DetachedNode {
            concept: "Item".into()
        }
    );
    assert!(err.to_string().contains("should not be root"));
}

#[rstest]
#[case::file(Source::file("models/a.b"), "models-a-b_root")]
#[case::named(Source::named("repo"), "repo_root")]
fn test_root_id_uses_source_id(#[case] source: Source, #[case] expected: &str) {
    let mm = item_language();
    let root = mm.create("Model").unwrap();
    root.set_source(Some(source));
    assert_eq!(StructuralIdProvider::new().id(&root).unwrap(), expected);
}

#[test]
fn test_coordinates() {
    let mm = item_language();
    let tree = tree(&mm);
    let ids = StructuralIdProvider::new();

    assert_eq!(ids.coordinates(&tree.root).unwrap(), Coordinates::Root);
    assert_eq!(
        ids.coordinates(&tree.items[1]).unwrap(),
        Coordinates::Contained {
            container_id: "repo_root".into(),
            feature: "items".into(),
            index: 1,
        }
    );
}

#[rstest]
#[case(0, "remote_items")]
#[case(3, "remote_items_3")]
fn test_id_using_external_coordinates(#[case] index: usize, #[case] expected: &str) {
    let mm = item_language();
    let detached = item(&mm, "x");
    let coordinates = Coordinates::Contained {
        container_id: "remote".into(),
        feature: "items".into(),
        index,
    };
    let id = StructuralIdProvider::new()
        .id_using_coordinates(&detached, &coordinates)
        .unwrap();
    assert_eq!(id, expected);
}
