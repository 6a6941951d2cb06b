use std::rc::Rc;

use indexmap::IndexMap;
use smol_str::SmolStr;

use crate::model::Node;

/// A lexical scope: named bindings plus an optional enclosing scope.
///
/// A name may be bound several times; the first binding that matches a
/// lookup wins. Scopes are built fresh by scope rules and are not meant to
/// be mutated once returned.
#[derive(Debug, Clone, Default)]
pub struct Scope {
    /// Folded name -> bindings in definition order
    symbols: IndexMap<SmolStr, Vec<Node>>,
    parent: Option<Rc<Scope>>,
    case_insensitive: bool,
}

impl Scope {
    pub fn new() -> Self {
        Self::default()
    }

    /// A scope whose names match regardless of case.
    pub fn case_insensitive() -> Self {
        Self {
            case_insensitive: true,
            ..Self::default()
        }
    }

    pub fn with_parent(mut self, parent: impl Into<Rc<Scope>>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    pub fn parent(&self) -> Option<&Scope> {
        self.parent.as_deref()
    }

    pub fn is_case_insensitive(&self) -> bool {
        self.case_insensitive
    }

    /// Bind `node` under its `name` attribute. Unnamed nodes are skipped.
    pub fn define(&mut self, node: &Node) -> bool {
        match node.name() {
            Some(name) => {
                self.define_as(&name, node);
                true
            }
            None => false,
        }
    }

    pub fn define_as(&mut self, name: &str, node: &Node) {
        let key = self.fold(name);
        self.symbols.entry(key).or_default().push(node.clone());
    }

    pub fn define_all<'a>(mut self, nodes: impl IntoIterator<Item = &'a Node>) -> Self {
        for node in nodes {
            self.define(node);
        }
        self
    }

    /// Find `name`, locally first, then in enclosing scopes.
    ///
    /// With `required`, only nodes whose concept is (a subtype of) it match.
    pub fn resolve(&self, name: &str, required: Option<&str>) -> Option<Node> {
        let local = self.symbols.get(self.fold(name).as_str()).and_then(|bindings| {
            bindings
                .iter()
                .find(|node| required.is_none_or(|concept| node.is_a(concept)))
                .cloned()
        });
        local.or_else(|| self.parent.as_ref()?.resolve(name, required))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.resolve(name, None).is_some()
    }

    /// Local names, folded, in definition order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.symbols.keys().map(SmolStr::as_str)
    }

    /// Number of local bindings
    pub fn len(&self) -> usize {
        self.symbols.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    fn fold(&self, name: &str) -> SmolStr {
        if self.case_insensitive {
            name.to_lowercase().into()
        } else {
            name.into()
        }
    }
}
