//! The transformation engine.
//!
//! A [`Transformer`] owns the factory registry, the issue list and the memo
//! tables for one transformation session. Factories receive the engine
//! mutably, so nested calls share the same issues and caches.

use std::rc::Rc;

use rustc_hash::FxHashMap;
use smol_str::SmolStr;
use tracing::{debug, trace, warn};

use super::config::TransformerConfig;
use super::error::TransformError;
use super::factory::{Factory, FeatureSource};
use crate::base::Source;
use crate::model::{
    Concept, FeatureDecl, FeatureKind, ForeignRef, ForeignValue, Issue, Metamodel, ModelError,
    Node, Origin, ReferenceByName, Severity, Value,
};

/// One step of the extraction plan computed per (factory, concept).
#[derive(Debug, Clone)]
struct PlannedChild {
    feature: FeatureDecl,
    source: FeatureSource,
}

/// Maps a foreign tree onto AST nodes through registered [`Factory`]s.
pub struct Transformer {
    metamodel: Rc<Metamodel>,
    config: TransformerConfig,
    factories: FxHashMap<SmolStr, Rc<Factory>>,
    issues: Vec<Issue>,
    source: Option<Source>,
    /// Foreign runtime type -> factory found for it (exact or ancestor)
    resolved_factories: FxHashMap<SmolStr, Option<Rc<Factory>>>,
    /// (factory source type, concept) -> extraction plan
    plans: FxHashMap<(SmolStr, SmolStr), Rc<[PlannedChild]>>,
}

impl Transformer {
    pub fn new(metamodel: Rc<Metamodel>) -> Self {
        Self::with_config(metamodel, TransformerConfig::default())
    }

    pub fn with_config(metamodel: Rc<Metamodel>, config: TransformerConfig) -> Self {
        Self {
            metamodel,
            config,
            factories: FxHashMap::default(),
            issues: Vec::new(),
            source: None,
            resolved_factories: FxHashMap::default(),
            plans: FxHashMap::default(),
        }
    }

    /// Record `source` on every root node this engine produces.
    pub fn with_source(mut self, source: Source) -> Self {
        self.source = Some(source);
        self
    }

    pub fn metamodel(&self) -> &Rc<Metamodel> {
        &self.metamodel
    }

    pub fn config(&self) -> &TransformerConfig {
        &self.config
    }

    // ============================================================
    // Registration
    // ============================================================

    pub fn register(&mut self, factory: Factory) -> Result<(), TransformError> {
        let source_type = SmolStr::from(factory.source_type());
        if self.factories.contains_key(&source_type) {
            return Err(TransformError::DuplicateFactory(source_type));
        }
        for (concept, feature) in factory.qualified_rules() {
            let known = self
                .metamodel
                .concept(concept)
                .is_some_and(|c| c.feature(feature).is_some());
            if !known {
                return Err(TransformError::UnknownChildRule {
                    source_type,
                    feature: format!("{concept}#{feature}"),
                });
            }
        }
        // New registrations can change which ancestor factory a type resolves to
        self.resolved_factories.clear();
        self.plans.clear();
        self.factories.insert(source_type, Rc::new(factory));
        Ok(())
    }

    /// Register a factory that creates a node of `concept` and lets the engine wire
    /// every feature from declared mappings.
    pub fn register_concept(
        &mut self,
        source_type: &str,
        concept: &str,
    ) -> Result<(), TransformError> {
        let concept = SmolStr::from(concept);
        self.register(Factory::new(source_type, move |_, engine, _| {
            Ok(Some(engine.metamodel().create(&concept)?))
        }))
    }

    // ============================================================
    // Issues
    // ============================================================

    pub fn issues(&self) -> &[Issue] {
        &self.issues
    }

    pub fn add_issue(&mut self, issue: Issue) {
        self.issues.push(issue);
    }

    pub fn take_issues(&mut self) -> Vec<Issue> {
        std::mem::take(&mut self.issues)
    }

    // ============================================================
    // Transformation
    // ============================================================

    /// Transform an accessor result that must be a single node (or absent).
    pub fn transform(
        &mut self,
        value: &ForeignValue,
        parent: Option<&Node>,
    ) -> Result<Option<Node>, TransformError> {
        match value {
            ForeignValue::Null => Ok(None),
            ForeignValue::Node(foreign) => self.transform_node(foreign, parent),
            ForeignValue::List(_) => Err(TransformError::UnexpectedCollection {
                context: "at transformation entry".into(),
            }),
            ForeignValue::Value(value) => Err(TransformError::UnexpectedValue {
                context: "at transformation entry".into(),
                found: value.kind_label(),
            }),
        }
    }

    /// Transform every element of a list, dropping absent results.
    pub fn transform_list(
        &mut self,
        value: &ForeignValue,
        parent: Option<&Node>,
    ) -> Result<Vec<Node>, TransformError> {
        let items = match value {
            ForeignValue::Null => return Ok(Vec::new()),
            ForeignValue::List(items) => items,
            single => return Ok(self.transform(single, parent)?.into_iter().collect()),
        };
        let mut nodes = Vec::with_capacity(items.len());
        for item in items {
            if let Some(node) = self.transform(item, parent)? {
                nodes.push(node);
            }
        }
        Ok(nodes)
    }

    pub fn transform_node(
        &mut self,
        foreign: &ForeignRef,
        parent: Option<&Node>,
    ) -> Result<Option<Node>, TransformError> {
        let Some(factory) = self.factory_for(foreign) else {
            return self.unmapped(foreign, parent).map(Some);
        };

        trace!(
            "[TRANSFORM] {} via factory for {}",
            foreign.type_name(),
            factory.source_type()
        );
        let constructor = Rc::clone(factory.constructor());
        let node = match constructor(foreign, self, &*factory) {
            Ok(Some(node)) => node,
            Ok(None) => return Ok(None),
            Err(err) if err.is_containable() && self.config.contain_factory_failures => {
                warn!(
                    "[TRANSFORM] factory for {} failed: {}",
                    factory.source_type(),
                    err
                );
                let node = self.metamodel.error_node(err.to_string());
                self.issues.push(Issue::translation(
                    format!("Failed to transform {}: {}", foreign.type_name(), err),
                    Severity::Error,
                    foreign.range(),
                ));
                self.attach_metadata(&node, foreign, parent);
                return Ok(Some(node));
            }
            Err(err) => return Err(err),
        };

        self.attach_metadata(&node, foreign, parent);
        if !factory.skips_children() && !node.is_placeholder() {
            self.wire_children(&node, foreign, &factory)?;
        }
        if let Some(hook) = factory.finally_hook() {
            hook(&node, foreign)?;
        }
        Ok(Some(node))
    }

    fn unmapped(
        &mut self,
        foreign: &ForeignRef,
        parent: Option<&Node>,
    ) -> Result<Node, TransformError> {
        let type_name = foreign.type_name();
        if !self.config.allow_generic_node {
            return Err(TransformError::UnmappedType(type_name));
        }
        debug!("[TRANSFORM] no factory for {}, using generic node", type_name);
        let node = self.metamodel.generic_node();
        self.issues.push(Issue::translation(
            format!("Source node not mapped: {type_name}"),
            Severity::Info,
            foreign.range(),
        ));
        self.attach_metadata(&node, foreign, parent);
        Ok(node)
    }

    /// Parent is always the caller's; origin and range only if the factory left them unset.
    fn attach_metadata(&self, node: &Node, foreign: &ForeignRef, parent: Option<&Node>) {
        if node.origin().is_none() {
            node.set_origin(Some(Origin::Foreign(Rc::clone(foreign))));
        }
        if node.range().is_none() {
            node.set_range(foreign.range());
        }
        match parent {
            Some(parent) => node.set_parent(Some(parent)),
            None => {
                if let (Some(source), None) = (&self.source, node.own_source()) {
                    node.set_source(Some(source.clone()));
                }
            }
        }
    }

    fn wire_children(
        &mut self,
        node: &Node,
        foreign: &ForeignRef,
        factory: &Rc<Factory>,
    ) -> Result<(), TransformError> {
        let plan = self.plan_for(factory, node.concept());
        for step in plan.iter() {
            let value = step.source.extract(foreign);
            self.assign(node, &step.feature, value)?;
        }
        Ok(())
    }

    fn assign(
        &mut self,
        node: &Node,
        feature: &FeatureDecl,
        value: ForeignValue,
    ) -> Result<(), TransformError> {
        let name = feature.name.as_str();
        let context = || format!("for {}.{}", node.concept_name(), name);
        match (feature.kind, value) {
            (
                FeatureKind::Attribute | FeatureKind::Reference | FeatureKind::Child,
                ForeignValue::List(_),
            ) => Err(TransformError::UnexpectedCollection { context: context() }),
            (FeatureKind::Attribute, value) => {
                let scalar = scalar_of(&value);
                Ok(node.set_attribute(name, scalar)?)
            }
            (FeatureKind::Reference, value) => {
                let reference = scalar_of(&value).map(|v| ReferenceByName::new(v.to_string()));
                Ok(node.set_reference(name, reference)?)
            }
            (FeatureKind::Child, ForeignValue::Node(child)) => {
                let child = self.transform_node(&child, Some(node))?;
                Ok(node.set_child(name, child)?)
            }
            (FeatureKind::Child, ForeignValue::Null) => Ok(node.set_child(name, None)?),
            (FeatureKind::Children, ForeignValue::List(items)) => {
                let mut children = Vec::with_capacity(items.len());
                for item in &items {
                    match item {
                        ForeignValue::Null => {}
                        ForeignValue::Node(child) => {
                            children.extend(self.transform_node(child, Some(node))?);
                        }
                        ForeignValue::List(_) => {
                            return Err(TransformError::UnexpectedCollection {
                                context: format!("inside {}", context()),
                            });
                        }
                        ForeignValue::Value(value) => {
                            return Err(TransformError::UnexpectedValue {
                                context: context(),
                                found: value.kind_label(),
                            });
                        }
                    }
                }
                Ok(node.set_children(name, children)?)
            }
            (FeatureKind::Children, ForeignValue::Null) => Ok(node.set_children(name, Vec::new())?),
            (_, ForeignValue::Value(value)) => Err(TransformError::UnexpectedValue {
                context: context(),
                found: value.kind_label(),
            }),
            (FeatureKind::Children, ForeignValue::Node(_)) => Err(ModelError::rejected(
                node.concept_name(),
                name,
                "expected a list, got a single node",
            )
            .into()),
        }
    }

    // ============================================================
    // Memoized lookups
    // ============================================================

    /// Exact runtime type first, then supertypes most-derived first.
    fn factory_for(&mut self, foreign: &ForeignRef) -> Option<Rc<Factory>> {
        let type_name = foreign.type_name();
        if let Some(cached) = self.resolved_factories.get(&type_name) {
            return cached.clone();
        }
        let found = std::iter::once(type_name.clone())
            .chain(foreign.supertypes())
            .find_map(|candidate| self.factories.get(&candidate).cloned());
        self.resolved_factories.insert(type_name, found.clone());
        found
    }

    /// Explicit factory rules win over `mapped_from` declarations on the concept.
    fn plan_for(&mut self, factory: &Rc<Factory>, concept: &Concept) -> Rc<[PlannedChild]> {
        let key = (SmolStr::from(factory.source_type()), SmolStr::from(concept.name()));
        if let Some(plan) = self.plans.get(&key) {
            return Rc::clone(plan);
        }
        let plan: Rc<[PlannedChild]> = concept
            .features()
            .iter()
            .filter_map(|feature| {
                let source = match factory.child_rule(concept, &feature.name) {
                    Some(rule) => rule.source.clone(),
                    None => FeatureSource::Path(feature.mapped_from.clone()?),
                };
                Some(PlannedChild {
                    feature: feature.clone(),
                    source,
                })
            })
            .collect();
        trace!(
            "[TRANSFORM] plan for {} as {}: {} features",
            key.0,
            key.1,
            plan.len()
        );
        self.plans.insert(key, Rc::clone(&plan));
        plan
    }
}

/// Scalar view of a foreign value; nodes contribute their source text.
fn scalar_of(value: &ForeignValue) -> Option<Value> {
    match value {
        ForeignValue::Value(value) => Some(value.clone()),
        ForeignValue::Node(node) => node.text().map(Value::from),
        ForeignValue::Null | ForeignValue::List(_) => None,
    }
}
