//! Node factories: how one foreign type becomes an AST node.

use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;
use smol_str::SmolStr;

use super::engine::Transformer;
use super::error::TransformError;
use crate::model::{Concept, ForeignRef, ForeignValue, Node};

/// Builds the node for one foreign node. May call back into the engine.
pub type Constructor =
    Rc<dyn Fn(&ForeignRef, &mut Transformer, &Factory) -> Result<Option<Node>, TransformError>>;

/// Reads a feature's value off a foreign node.
pub type Getter = Rc<dyn Fn(&ForeignRef) -> ForeignValue>;

/// Runs once the node's children are wired.
pub type FinallyHook = Rc<dyn Fn(&Node, &ForeignRef) -> Result<(), TransformError>>;

/// Where a child-extraction rule reads its value from.
#[derive(Clone)]
pub enum FeatureSource {
    Getter(Getter),
    /// Dotted accessor path, navigated with [`ForeignValue::navigate`]
    Path(SmolStr),
}

impl FeatureSource {
    pub fn getter(getter: impl Fn(&ForeignRef) -> ForeignValue + 'static) -> Self {
        Self::Getter(Rc::new(getter))
    }

    pub fn path(path: &str) -> Self {
        Self::Path(path.into())
    }

    pub fn extract(&self, foreign: &ForeignRef) -> ForeignValue {
        match self {
            FeatureSource::Getter(getter) => getter(foreign),
            FeatureSource::Path(path) => ForeignValue::navigate(foreign, path),
        }
    }
}

impl fmt::Debug for FeatureSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeatureSource::Getter(_) => f.write_str("Getter(..)"),
            FeatureSource::Path(path) => write!(f, "Path({path})"),
        }
    }
}

/// An explicitly registered child-extraction rule.
#[derive(Debug, Clone)]
pub struct ChildRule {
    pub feature: SmolStr,
    pub source: FeatureSource,
}

/// Registration for one foreign type.
pub struct Factory {
    source_type: SmolStr,
    constructor: Constructor,
    /// Keyed by feature name, or by `Concept#feature` for concept-qualified rules
    children: IndexMap<SmolStr, ChildRule>,
    skip_children: bool,
    finally: Option<FinallyHook>,
}

impl Factory {
    pub fn new(
        source_type: impl Into<SmolStr>,
        constructor: impl Fn(&ForeignRef, &mut Transformer, &Factory) -> Result<Option<Node>, TransformError>
        + 'static,
    ) -> Self {
        Self {
            source_type: source_type.into(),
            constructor: Rc::new(constructor),
            children: IndexMap::new(),
            skip_children: false,
            finally: None,
        }
    }

    /// Read `feature` from the dotted accessor `path`.
    pub fn with_child(self, feature: &str, path: &str) -> Self {
        self.with_rule(feature.into(), feature, FeatureSource::path(path))
    }

    /// Read `feature` with a getter function.
    pub fn with_child_getter(
        self,
        feature: &str,
        getter: impl Fn(&ForeignRef) -> ForeignValue + 'static,
    ) -> Self {
        self.with_rule(feature.into(), feature, FeatureSource::getter(getter))
    }

    /// A rule that only applies when the produced node is a `concept`.
    ///
    /// Used when one foreign type feeds several concepts whose features share a name.
    pub fn with_child_for(self, concept: &str, feature: &str, source: FeatureSource) -> Self {
        self.with_rule(qualified_key(concept, feature), feature, source)
    }

    fn with_rule(mut self, key: SmolStr, feature: &str, source: FeatureSource) -> Self {
        self.children.insert(
            key,
            ChildRule {
                feature: feature.into(),
                source,
            },
        );
        self
    }

    /// The constructor wires children itself; the engine only sets metadata.
    pub fn skip_children(mut self) -> Self {
        self.skip_children = true;
        self
    }

    pub fn finally(
        mut self,
        hook: impl Fn(&Node, &ForeignRef) -> Result<(), TransformError> + 'static,
    ) -> Self {
        self.finally = Some(Rc::new(hook));
        self
    }

    pub fn source_type(&self) -> &str {
        &self.source_type
    }

    /// The explicit rule for `feature` of a node of `concept`.
    ///
    /// Concept-qualified keys (most-derived concept first) win over the bare name.
    pub fn child_rule(&self, concept: &Concept, feature: &str) -> Option<&ChildRule> {
        concept
            .ancestry()
            .iter()
            .find_map(|c| self.children.get(qualified_key(c, feature).as_str()))
            .or_else(|| self.children.get(feature))
    }

    /// Extract the raw foreign value of an explicitly registered feature.
    pub fn extract(&self, concept: &Concept, feature: &str, foreign: &ForeignRef) -> ForeignValue {
        self.child_rule(concept, feature)
            .map_or(ForeignValue::Null, |rule| rule.source.extract(foreign))
    }

    /// Concept-qualified rule keys, as `(concept, feature)` pairs.
    pub(crate) fn qualified_rules(&self) -> impl Iterator<Item = (&str, &str)> {
        self.children
            .keys()
            .filter_map(|key| key.split_once('#'))
    }

    pub(crate) fn constructor(&self) -> &Constructor {
        &self.constructor
    }

    pub(crate) fn skips_children(&self) -> bool {
        self.skip_children
    }

    pub(crate) fn finally_hook(&self) -> Option<&FinallyHook> {
        self.finally.as_ref()
    }
}

impl fmt::Debug for Factory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Factory")
            .field("source_type", &self.source_type)
            .field("children", &self.children.keys().collect::<Vec<_>>())
            .field("skip_children", &self.skip_children)
            .finish()
    }
}

fn qualified_key(concept: &str, feature: &str) -> SmolStr {
    smol_str::format_smolstr!("{concept}#{feature}")
}
