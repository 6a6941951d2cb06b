//! # Semantics
//!
//! Symbol resolution and type computation over an AST.
//!
//! Both are driven by user rules dispatched on concept specificity
//! ([`DispatchTable`]): the most specific rule whose concept is the node's
//! concept or a supertype of it wins.
//!
//! ## Usage
//!
//! ```ignore
//! let mut resolver = SymbolResolver::new(Rc::clone(&metamodel));
//! resolver.scope_for("ClassDecl", "superclass", |_, node| {
//!     let unit = node.root();
//!     Ok(Scope::new().define_all(&unit.children_of("classes")))
//! })?;
//! let semantics = Semantics::new(resolver, TypeComputer::new(metamodel));
//! semantics.resolve_tree(&unit)?;
//! ```
//!
//! A [`Semantics`] session is what rules receive, so a type rule can resolve
//! the references it depends on and any rule can [`report`](Semantics::report)
//! issues.

mod dispatch;
mod error;
mod resolver;
mod scope;
mod types;

use std::cell::RefCell;

pub use dispatch::{DispatchPolicy, DispatchTable};
pub use error::SemanticError;
pub use resolver::{ScopeRule, SymbolResolver, unresolved_references};
pub use scope::Scope;
pub use types::{TypeComputer, TypeRule};

use crate::model::{Issue, Node};

/// Resolver, type computer and the issues their rules report.
pub struct Semantics {
    resolver: SymbolResolver,
    types: TypeComputer,
    issues: RefCell<Vec<Issue>>,
}

impl Semantics {
    pub fn new(resolver: SymbolResolver, types: TypeComputer) -> Self {
        Self {
            resolver,
            types,
            issues: RefCell::new(Vec::new()),
        }
    }

    pub fn resolver(&self) -> &SymbolResolver {
        &self.resolver
    }

    /// Resolve every reference of the tree under `root`.
    ///
    /// Resolved references are written back; names with no match are left as
    /// they were. Running it again on an unchanged tree changes nothing.
    pub fn resolve_tree(&self, root: &Node) -> Result<(), SemanticError> {
        self.resolver.resolve_tree(self, root)
    }

    /// Resolve one reference feature of `node`, returning its target.
    pub fn resolve_reference(&self, node: &Node, feature: &str) -> Result<Option<Node>, SemanticError> {
        self.resolver.resolve_reference(self, node, feature)
    }

    /// The scope in which `feature` of `node` is looked up.
    pub fn scope_for(&self, node: &Node, feature: &str) -> Result<Scope, SemanticError> {
        self.resolver.scope(self, node, feature)
    }

    pub fn type_for(&self, node: Option<&Node>) -> Result<Option<Node>, SemanticError> {
        self.types.compute(self, node)
    }

    pub fn report(&self, issue: Issue) {
        self.issues.borrow_mut().push(issue);
    }

    pub fn issues(&self) -> Vec<Issue> {
        self.issues.borrow().clone()
    }

    pub fn take_issues(&self) -> Vec<Issue> {
        self.issues.take()
    }
}

#[cfg(test)]
mod tests;
