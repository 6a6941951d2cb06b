//! An in-memory foreign node.
//!
//! [`Record`] is the simplest possible [`ForeignNode`]: a type name, optional
//! supertypes and a map of named fields. It is what hand-written front ends and
//! tests feed the transformer when there is no real parser in between.

use std::rc::Rc;

use indexmap::IndexMap;
use smol_str::SmolStr;

use crate::base::Span;
use crate::model::{ForeignNode, ForeignRef, ForeignValue, Value};

#[derive(Debug, Clone)]
pub struct Record {
    type_name: SmolStr,
    supertypes: Vec<SmolStr>,
    fields: IndexMap<SmolStr, ForeignValue>,
    range: Option<Span>,
    text: Option<String>,
}

impl Record {
    pub fn new(type_name: impl Into<SmolStr>) -> Self {
        Self {
            type_name: type_name.into(),
            supertypes: Vec::new(),
            fields: IndexMap::new(),
            range: None,
            text: None,
        }
    }

    /// Add a supertype; call in most-derived-first order.
    pub fn extends(mut self, supertype: impl Into<SmolStr>) -> Self {
        self.supertypes.push(supertype.into());
        self
    }

    pub fn field(mut self, accessor: &str, value: impl Into<Value>) -> Self {
        self.fields
            .insert(accessor.into(), ForeignValue::Value(value.into()));
        self
    }

    pub fn node(mut self, accessor: &str, node: Record) -> Self {
        self.fields
            .insert(accessor.into(), ForeignValue::Node(node.into_ref()));
        self
    }

    pub fn list(mut self, accessor: &str, nodes: impl IntoIterator<Item = Record>) -> Self {
        let items = nodes
            .into_iter()
            .map(|node| ForeignValue::Node(node.into_ref()))
            .collect();
        self.fields.insert(accessor.into(), ForeignValue::List(items));
        self
    }

    /// Store an arbitrary accessor result.
    pub fn raw(mut self, accessor: &str, value: ForeignValue) -> Self {
        self.fields.insert(accessor.into(), value);
        self
    }

    pub fn at(mut self, range: Span) -> Self {
        self.range = Some(range);
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn into_ref(self) -> ForeignRef {
        Rc::new(self)
    }

    pub fn into_value(self) -> ForeignValue {
        ForeignValue::Node(self.into_ref())
    }
}

impl ForeignNode for Record {
    fn type_name(&self) -> SmolStr {
        self.type_name.clone()
    }

    fn supertypes(&self) -> Vec<SmolStr> {
        self.supertypes.clone()
    }

    fn get(&self, accessor: &str) -> ForeignValue {
        self.fields
            .get(accessor)
            .cloned()
            .unwrap_or(ForeignValue::Null)
    }

    fn range(&self) -> Option<Span> {
        self.range
    }

    fn text(&self) -> Option<String> {
        self.text.clone()
    }
}
