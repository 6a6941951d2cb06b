//! Node lookup and reference assertion helpers.

use arbor::model::Node;

/// Find the node of `concept` named `name` under `root`.
pub fn get_named(root: &Node, concept: &str, name: &str) -> Node {
    root.walk()
        .find(|node| node.is_a(concept) && node.name().as_deref() == Some(name))
        .unwrap_or_else(|| panic!("Expected a {} named '{}'", concept, name))
}

/// Assert `feature` of `node` is resolved to `target`.
pub fn assert_resolved_to(node: &Node, feature: &str, target: &Node) {
    let reference = node
        .reference(feature)
        .unwrap_or_else(|| panic!("Expected {:?}.{} to be set", node, feature));
    let referred = reference.referred().unwrap_or_else(|| {
        panic!(
            "Expected {:?}.{} -> '{}' to be resolved",
            node,
            feature,
            reference.name()
        )
    });
    assert!(
        referred.ptr_eq(target),
        "Expected {:?}.{} to resolve to {:?}, got {:?}",
        node,
        feature,
        target,
        referred
    );
}

/// Assert `feature` of `node` is set but unresolved.
pub fn assert_unresolved(node: &Node, feature: &str) {
    let reference = node
        .reference(feature)
        .unwrap_or_else(|| panic!("Expected {:?}.{} to be set", node, feature));
    assert!(
        !reference.is_resolved(),
        "Expected {:?}.{} -> '{}' to stay unresolved",
        node,
        feature,
        reference.name()
    );
}
