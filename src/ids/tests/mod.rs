#![allow(clippy::unwrap_used)]

mod tests_structural;

use std::rc::Rc;

use crate::base::Source;
use crate::model::{Concept, Metamodel, Node, Value};

pub(super) fn item_language() -> Rc<Metamodel> {
    let metamodel = Metamodel::builder()
        .concept(Concept::new("Named").attribute("name"))
        .concept(Concept::new("Model").children("items", "Item"))
        .concept(Concept::new("Item").extends("Named").children("parts", "Item"))
        .build()
        .unwrap();
    Rc::new(metamodel)
}

pub(super) fn item(mm: &Metamodel, name: &str) -> Node {
    let node = mm.create("Item").unwrap();
    node.set_attribute("name", Some(Value::from(name))).unwrap();
    node
}

/// `repo` model with items c0, c1, c2; c1 has one part p.
pub(super) struct Tree {
    pub root: Node,
    pub items: Vec<Node>,
    pub part: Node,
}

pub(super) fn tree(mm: &Metamodel) -> Tree {
    let root = mm.create("Model").unwrap();
    root.set_source(Some(Source::named("repo")));
    let items: Vec<Node> = ["c0", "c1", "c2"].iter().map(|n| item(mm, n)).collect();
    root.set_children("items", items.clone()).unwrap();
    let part = item(mm, "p");
    items[1].add_child("parts", part.clone()).unwrap();
    Tree { root, items, part }
}
