//! The foreign tree contract.
//!
//! A foreign tree is whatever an external parser produced. arbor never depends
//! on a concrete grammar: all it asks of a foreign node is its runtime type name,
//! its supertypes, its accessors and, optionally, its source range.

use std::fmt;
use std::rc::Rc;

use smol_str::SmolStr;

use super::value::Value;
use crate::base::Span;

/// Shared handle to a foreign node.
pub type ForeignRef = Rc<dyn ForeignNode>;

/// A node of an external parse tree.
pub trait ForeignNode: fmt::Debug {
    /// Runtime type of the node (rule name, syntax kind, class name, ...)
    fn type_name(&self) -> SmolStr;

    /// Supertypes of [`type_name`](Self::type_name), most-derived first.
    fn supertypes(&self) -> Vec<SmolStr> {
        Vec::new()
    }

    /// Read one accessor. Unknown accessors yield [`ForeignValue::Null`].
    fn get(&self, accessor: &str) -> ForeignValue;

    fn range(&self) -> Option<Span> {
        None
    }

    /// Source text covered by the node, when the parser keeps it
    fn text(&self) -> Option<String> {
        None
    }
}

/// What an accessor returns.
#[derive(Debug, Clone)]
pub enum ForeignValue {
    Null,
    Value(Value),
    Node(ForeignRef),
    List(Vec<ForeignValue>),
}

impl ForeignValue {
    pub fn is_null(&self) -> bool {
        matches!(self, ForeignValue::Null)
    }

    pub fn as_node(&self) -> Option<&ForeignRef> {
        match self {
            ForeignValue::Node(node) => Some(node),
            _ => None,
        }
    }

    /// Follow a dotted accessor path (`"body.members"`) starting at `node`.
    ///
    /// Lists met halfway are navigated element-wise; a scalar or null met
    /// halfway ends the walk with [`ForeignValue::Null`].
    pub fn navigate(node: &ForeignRef, path: &str) -> ForeignValue {
        let mut current = ForeignValue::Node(Rc::clone(node));
        for segment in path.split('.').filter(|s| !s.is_empty()) {
            current = current.step(segment);
        }
        current
    }

    fn step(self, accessor: &str) -> ForeignValue {
        match self {
            ForeignValue::Node(node) => node.get(accessor),
            ForeignValue::List(items) => {
                ForeignValue::List(items.into_iter().map(|item| item.step(accessor)).collect())
            }
            ForeignValue::Null | ForeignValue::Value(_) => ForeignValue::Null,
        }
    }
}

impl From<ForeignRef> for ForeignValue {
    fn from(node: ForeignRef) -> Self {
        ForeignValue::Node(node)
    }
}

impl<T: Into<Value>> From<Option<T>> for ForeignValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(ForeignValue::Null, |v| ForeignValue::Value(v.into()))
    }
}
