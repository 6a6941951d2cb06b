//! AST nodes.
//!
//! A [`Node`] is a cheap-to-clone handle (`Rc`) to a typed tree element. Nodes
//! compare by reference identity: two structurally identical nodes are still
//! different nodes. Parent links and resolved references are weak, so the only
//! owning edges in a tree are containment edges.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use indexmap::IndexMap;
use rustc_hash::FxHashSet;
use smol_str::SmolStr;

use super::concept::{
    Concept, ERROR_MESSAGE_FEATURE, ERROR_NODE, FeatureKind, GENERIC_NODE, NAME_FEATURE,
};
use super::error::ModelError;
use super::foreign::ForeignRef;
use super::value::Value;
use crate::base::{Source, Span};

/// Where a node was derived from.
#[derive(Clone)]
pub enum Origin {
    /// The foreign (parse tree) element the node was built from
    Foreign(ForeignRef),
    /// Another AST node, e.g. for nodes produced by a later rewriting pass
    Node(WeakNode),
}

impl fmt::Debug for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Origin::Foreign(foreign) => write!(f, "Foreign({})", foreign.type_name()),
            Origin::Node(node) => match node.upgrade() {
                Some(node) => write!(f, "Node({node:?})"),
                None => f.write_str("Node(<dropped>)"),
            },
        }
    }
}

/// A reference to another node by name, resolved later by the symbol resolver.
#[derive(Clone)]
pub struct ReferenceByName {
    name: SmolStr,
    referred: Option<WeakNode>,
}

impl ReferenceByName {
    pub fn new(name: impl Into<SmolStr>) -> Self {
        Self {
            name: name.into(),
            referred: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The resolved target, if resolved and still alive
    pub fn referred(&self) -> Option<Node> {
        self.referred.as_ref()?.upgrade()
    }

    pub fn is_resolved(&self) -> bool {
        self.referred().is_some()
    }

    pub fn resolve_to(&mut self, target: &Node) {
        self.referred = Some(target.downgrade());
    }
}

impl PartialEq for ReferenceByName {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && match (self.referred(), other.referred()) {
                (Some(a), Some(b)) => a.ptr_eq(&b),
                (None, None) => true,
                _ => false,
            }
    }
}

impl fmt::Debug for ReferenceByName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = if self.is_resolved() { "resolved" } else { "unresolved" };
        write!(f, "Ref({} {})", self.name, state)
    }
}

/// Stable identity key of a node, valid while the node is alive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeKey(usize);

#[derive(Debug, Clone)]
enum Slot {
    Attribute(Option<Value>),
    Child(Option<Node>),
    Children(Vec<Node>),
    Reference(Option<ReferenceByName>),
}

impl Slot {
    fn empty(kind: FeatureKind) -> Self {
        match kind {
            FeatureKind::Attribute => Slot::Attribute(None),
            FeatureKind::Child => Slot::Child(None),
            FeatureKind::Children => Slot::Children(Vec::new()),
            FeatureKind::Reference => Slot::Reference(None),
        }
    }

    fn contained(&self) -> &[Node] {
        match self {
            Slot::Child(Some(child)) => std::slice::from_ref(child),
            Slot::Children(children) => children,
            _ => &[],
        }
    }
}

#[derive(Debug)]
struct NodeData {
    slots: IndexMap<SmolStr, Slot>,
    parent: Option<WeakNode>,
    origin: Option<Origin>,
    range: Option<Span>,
    source: Option<Source>,
}

struct NodeInner {
    concept: Rc<Concept>,
    data: RefCell<NodeData>,
}

/// A typed tree element.
#[derive(Clone)]
pub struct Node(Rc<NodeInner>);

/// Non-owning handle to a [`Node`].
#[derive(Clone)]
pub struct WeakNode(Weak<NodeInner>);

impl WeakNode {
    pub fn upgrade(&self) -> Option<Node> {
        self.0.upgrade().map(Node)
    }
}

impl fmt::Debug for WeakNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("WeakNode")
    }
}

impl Node {
    pub(crate) fn new(concept: Rc<Concept>) -> Self {
        let slots = concept
            .features()
            .iter()
            .map(|f| (f.name.clone(), Slot::empty(f.kind)))
            .collect();
        Node(Rc::new(NodeInner {
            concept,
            data: RefCell::new(NodeData {
                slots,
                parent: None,
                origin: None,
                range: None,
                source: None,
            }),
        }))
    }

    // ============================================================
    // Identity and type
    // ============================================================

    pub fn concept(&self) -> &Concept {
        &self.0.concept
    }

    pub fn concept_name(&self) -> &str {
        self.0.concept.name()
    }

    /// Supertype-or-equal test against the node's concept
    pub fn is_a(&self, concept: &str) -> bool {
        self.0.concept.is_a(concept)
    }

    pub fn is_generic(&self) -> bool {
        self.concept_name() == GENERIC_NODE
    }

    pub fn is_error(&self) -> bool {
        self.concept_name() == ERROR_NODE
    }

    /// Generic and error nodes stand in for subtrees that could not be translated
    pub fn is_placeholder(&self) -> bool {
        self.0.concept.is_placeholder()
    }

    pub fn error_message(&self) -> Option<String> {
        if !self.is_error() {
            return None;
        }
        self.attribute(ERROR_MESSAGE_FEATURE)
            .map(|value| value.to_string())
    }

    pub fn ptr_eq(&self, other: &Node) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    pub fn key(&self) -> NodeKey {
        NodeKey(Rc::as_ptr(&self.0) as usize)
    }

    pub fn downgrade(&self) -> WeakNode {
        WeakNode(Rc::downgrade(&self.0))
    }

    // ============================================================
    // Feature access
    // ============================================================

    /// Value of the conventional `name` attribute
    pub fn name(&self) -> Option<SmolStr> {
        match self.attribute(NAME_FEATURE)? {
            Value::Str(name) => Some(name),
            _ => None,
        }
    }

    pub fn attribute(&self, feature: &str) -> Option<Value> {
        match self.0.data.borrow().slots.get(feature)? {
            Slot::Attribute(value) => value.clone(),
            _ => None,
        }
    }

    pub fn child(&self, feature: &str) -> Option<Node> {
        match self.0.data.borrow().slots.get(feature)? {
            Slot::Child(child) => child.clone(),
            _ => None,
        }
    }

    pub fn children_of(&self, feature: &str) -> Vec<Node> {
        match self.0.data.borrow().slots.get(feature) {
            Some(Slot::Children(children)) => children.clone(),
            Some(Slot::Child(Some(child))) => vec![child.clone()],
            _ => Vec::new(),
        }
    }

    pub fn reference(&self, feature: &str) -> Option<ReferenceByName> {
        match self.0.data.borrow().slots.get(feature)? {
            Slot::Reference(reference) => reference.clone(),
            _ => None,
        }
    }

    /// All set references, in feature declaration order
    pub fn references(&self) -> Vec<(SmolStr, ReferenceByName)> {
        self.0
            .data
            .borrow()
            .slots
            .iter()
            .filter_map(|(name, slot)| match slot {
                Slot::Reference(Some(reference)) => Some((name.clone(), reference.clone())),
                _ => None,
            })
            .collect()
    }

    /// Contained nodes in feature declaration order, list order within a feature
    pub fn children(&self) -> Vec<Node> {
        self.0
            .data
            .borrow()
            .slots
            .values()
            .flat_map(|slot| slot.contained().iter().cloned())
            .collect()
    }

    // ============================================================
    // Schema-checked mutation
    // ============================================================

    pub fn set_attribute(&self, feature: &str, value: Option<Value>) -> Result<(), ModelError> {
        self.check_kind(feature, &[FeatureKind::Attribute])?;
        self.replace_slot(feature, Slot::Attribute(value));
        Ok(())
    }

    pub fn set_reference(
        &self,
        feature: &str,
        reference: Option<ReferenceByName>,
    ) -> Result<(), ModelError> {
        self.check_kind(feature, &[FeatureKind::Reference])?;
        self.replace_slot(feature, Slot::Reference(reference));
        Ok(())
    }

    /// Point an already set reference at `target`.
    pub fn resolve_reference(&self, feature: &str, target: &Node) -> Result<(), ModelError> {
        self.check_kind(feature, &[FeatureKind::Reference])?;
        let mut data = self.0.data.borrow_mut();
        match data.slots.get_mut(feature) {
            Some(Slot::Reference(Some(reference))) => {
                reference.resolve_to(target);
                Ok(())
            }
            _ => Err(ModelError::rejected(
                self.concept_name(),
                feature,
                "no reference is set",
            )),
        }
    }

    /// Set a single-child feature, attaching the child to this node.
    pub fn set_child(&self, feature: &str, child: Option<Node>) -> Result<(), ModelError> {
        self.check_kind(feature, &[FeatureKind::Child])?;
        if let Some(child) = &child {
            self.check_child(feature, child)?;
        }
        self.attach(feature, child.into_iter().collect(), false);
        Ok(())
    }

    /// Replace a child-list feature, attaching every child to this node.
    pub fn set_children(&self, feature: &str, children: Vec<Node>) -> Result<(), ModelError> {
        self.check_kind(feature, &[FeatureKind::Children])?;
        let mut seen = FxHashSet::default();
        for child in &children {
            if !seen.insert(child.key()) {
                return Err(ModelError::rejected(
                    self.concept_name(),
                    feature,
                    "the same node cannot appear twice",
                ));
            }
            self.check_child(feature, child)?;
        }
        self.attach(feature, children, false);
        Ok(())
    }

    /// Append to a child-list feature.
    pub fn add_child(&self, feature: &str, child: Node) -> Result<(), ModelError> {
        self.check_kind(feature, &[FeatureKind::Children])?;
        self.check_child(feature, &child)?;
        self.attach(feature, vec![child], true);
        Ok(())
    }

    fn check_kind(&self, feature: &str, allowed: &[FeatureKind]) -> Result<FeatureKind, ModelError> {
        let decl = self
            .0
            .concept
            .feature(feature)
            .ok_or_else(|| ModelError::UnknownFeature {
                concept: self.concept_name().into(),
                feature: feature.into(),
            })?;
        if !allowed.contains(&decl.kind) {
            return Err(ModelError::rejected(
                self.concept_name(),
                feature,
                format!("feature is a {}", decl.kind.as_str()),
            ));
        }
        Ok(decl.kind)
    }

    fn check_child(&self, feature: &str, child: &Node) -> Result<(), ModelError> {
        if child.ptr_eq(self) || self.ancestors().any(|a| a.ptr_eq(child)) {
            return Err(ModelError::rejected(
                self.concept_name(),
                feature,
                "a node cannot contain itself or an ancestor",
            ));
        }
        let target = self
            .0
            .concept
            .feature(feature)
            .and_then(|f| f.target.clone());
        match target {
            Some(target) if !child.is_placeholder() && !child.is_a(&target) => {
                Err(ModelError::rejected(
                    self.concept_name(),
                    feature,
                    format!("expected {target}, got {}", child.concept_name()),
                ))
            }
            _ => Ok(()),
        }
    }

    /// Move `incoming` into `feature`, keeping parent links and containment consistent.
    fn attach(&self, feature: &str, incoming: Vec<Node>, append: bool) {
        // A node belongs to one container at a time
        for child in &incoming {
            child.detach();
        }
        let displaced = {
            let mut data = self.0.data.borrow_mut();
            match data.slots.get_mut(feature) {
                Some(Slot::Children(children)) if append => {
                    children.extend(incoming.iter().cloned());
                    Vec::new()
                }
                Some(Slot::Children(children)) => std::mem::replace(children, incoming.clone()),
                Some(Slot::Child(child)) => {
                    std::mem::replace(child, incoming.first().cloned()).into_iter().collect()
                }
                _ => Vec::new(),
            }
        };
        for old in displaced {
            if !incoming.iter().any(|n| n.ptr_eq(&old)) {
                old.0.data.borrow_mut().parent = None;
            }
        }
        for child in &incoming {
            child.set_parent(Some(self));
        }
    }

    /// Remove this node from its current container, if any.
    fn detach(&self) {
        let Some(parent) = self.parent() else {
            return;
        };
        let mut data = parent.0.data.borrow_mut();
        for slot in data.slots.values_mut() {
            match slot {
                Slot::Child(child) if child.as_ref().is_some_and(|c| c.ptr_eq(self)) => {
                    *child = None;
                }
                Slot::Children(children) => children.retain(|c| !c.ptr_eq(self)),
                _ => {}
            }
        }
        drop(data);
        self.0.data.borrow_mut().parent = None;
    }

    fn replace_slot(&self, feature: &str, slot: Slot) {
        if let Some(existing) = self.0.data.borrow_mut().slots.get_mut(feature) {
            *existing = slot;
        }
    }

    /// Unchecked attribute write for built-in concepts.
    pub(crate) fn store_attribute(&self, feature: &str, value: Value) {
        self.replace_slot(feature, Slot::Attribute(Some(value)));
    }

    // ============================================================
    // Tree structure
    // ============================================================

    pub fn parent(&self) -> Option<Node> {
        self.0.data.borrow().parent.as_ref()?.upgrade()
    }

    /// True when the node has never been attached (or was explicitly detached).
    ///
    /// A node whose parent link exists but no longer leads to a live container
    /// is *not* a root: it is dangling.
    pub fn is_root(&self) -> bool {
        self.0.data.borrow().parent.is_none()
    }

    pub(crate) fn set_parent(&self, parent: Option<&Node>) {
        self.0.data.borrow_mut().parent = parent.map(Node::downgrade);
    }

    /// The feature holding this node in its parent and the index within it.
    ///
    /// `None` for roots and for nodes whose parent does not actually contain them.
    pub fn containing_feature(&self) -> Option<(SmolStr, usize)> {
        let parent = self.parent()?;
        let data = parent.0.data.borrow();
        data.slots.iter().find_map(|(name, slot)| {
            slot.contained()
                .iter()
                .position(|c| c.ptr_eq(self))
                .map(|index| (name.clone(), index))
        })
    }

    pub fn ancestors(&self) -> Ancestors {
        Ancestors {
            next: self.parent(),
        }
    }

    pub fn root(&self) -> Node {
        self.ancestors().last().unwrap_or_else(|| self.clone())
    }

    /// Pre-order traversal including this node.
    pub fn walk(&self) -> Walk {
        Walk {
            stack: vec![self.clone()],
        }
    }

    // ============================================================
    // Metadata
    // ============================================================

    pub fn origin(&self) -> Option<Origin> {
        self.0.data.borrow().origin.clone()
    }

    pub fn set_origin(&self, origin: Option<Origin>) {
        self.0.data.borrow_mut().origin = origin;
    }

    pub fn range(&self) -> Option<Span> {
        self.0.data.borrow().range
    }

    pub fn set_range(&self, range: Option<Span>) {
        self.0.data.borrow_mut().range = range;
    }

    /// The source recorded on this node's root.
    pub fn source(&self) -> Option<Source> {
        self.root().own_source()
    }

    /// The source recorded on this very node.
    pub fn own_source(&self) -> Option<Source> {
        self.0.data.borrow().source.clone()
    }

    pub fn set_source(&self, source: Option<Source>) {
        self.0.data.borrow_mut().source = source;
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => write!(f, "{}({name:?})", self.concept_name()),
            None => write!(f, "{}", self.concept_name()),
        }
    }
}

/// Iterator over a node's ancestors, nearest first.
pub struct Ancestors {
    next: Option<Node>,
}

impl Iterator for Ancestors {
    type Item = Node;

    fn next(&mut self) -> Option<Node> {
        let current = self.next.take()?;
        self.next = current.parent();
        Some(current)
    }
}

/// Pre-order iterator over a subtree.
pub struct Walk {
    stack: Vec<Node>,
}

impl Iterator for Walk {
    type Item = Node;

    fn next(&mut self) -> Option<Node> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children().into_iter().rev());
        Some(node)
    }
}
