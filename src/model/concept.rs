//! Concepts, the statically declared schema of AST node types.
//!
//! Every node type is described once, at startup, by a [`Concept`]: its name,
//! its supertypes and its ordered features. The [`Metamodel`] validates the
//! declarations and precomputes, for each concept, its ancestry (most-derived
//! first) and its full feature list (inherited features first). Everything that
//! would otherwise need runtime introspection (feature discovery, subtype tests,
//! dispatch ordering) reads these precomputed tables.

use std::rc::Rc;

use indexmap::IndexMap;
use rustc_hash::{FxHashMap, FxHashSet};
use smol_str::SmolStr;

use super::error::ModelError;
use super::node::Node;
use super::value::Value;

/// Implicit supertype of every concept.
pub const BASE_CONCEPT: &str = "Node";
/// Placeholder produced when no factory matches a foreign node.
pub const GENERIC_NODE: &str = "GenericNode";
/// Placeholder produced when a factory fails.
pub const ERROR_NODE: &str = "ErrorNode";
/// Attribute of [`ERROR_NODE`] holding the failure message.
pub const ERROR_MESSAGE_FEATURE: &str = "message";
/// Attribute read by [`Node::name`](super::Node::name).
pub const NAME_FEATURE: &str = "name";

/// The structural role of a feature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FeatureKind {
    /// A scalar value
    Attribute,
    /// A single contained node
    Child,
    /// An ordered list of contained nodes
    Children,
    /// A by-name link to a node elsewhere in the tree
    Reference,
}

impl FeatureKind {
    pub fn is_containment(&self) -> bool {
        matches!(self, FeatureKind::Child | FeatureKind::Children)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FeatureKind::Attribute => "attribute",
            FeatureKind::Child => "child",
            FeatureKind::Children => "children",
            FeatureKind::Reference => "reference",
        }
    }
}

/// A named structural member of a concept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureDecl {
    pub name: SmolStr,
    pub kind: FeatureKind,
    /// Concept expected for children / reference targets
    pub target: Option<SmolStr>,
    /// Dotted accessor path used to extract this feature from a foreign node
    /// when no factory registers an explicit rule for it
    pub mapped_from: Option<SmolStr>,
    /// The concept that declares the feature (filled in by the metamodel)
    pub owner: SmolStr,
}

impl FeatureDecl {
    fn new(name: &str, kind: FeatureKind, target: Option<&str>) -> Self {
        Self {
            name: name.into(),
            kind,
            target: target.map(SmolStr::from),
            mapped_from: None,
            owner: SmolStr::default(),
        }
    }
}

/// Declaration of a node type.
#[derive(Debug, Clone)]
pub struct Concept {
    name: SmolStr,
    supertypes: Vec<SmolStr>,
    own_features: Vec<FeatureDecl>,
    /// Self first, then supertypes with every concept after its subtypes, ending with [`BASE_CONCEPT`]
    ancestry: Vec<SmolStr>,
    features: Vec<FeatureDecl>,
}

impl Concept {
    pub fn new(name: impl Into<SmolStr>) -> Self {
        Self {
            name: name.into(),
            supertypes: Vec::new(),
            own_features: Vec::new(),
            ancestry: Vec::new(),
            features: Vec::new(),
        }
    }

    pub fn extends(mut self, supertype: impl Into<SmolStr>) -> Self {
        self.supertypes.push(supertype.into());
        self
    }

    pub fn attribute(mut self, name: &str) -> Self {
        self.own_features
            .push(FeatureDecl::new(name, FeatureKind::Attribute, None));
        self
    }

    pub fn child(mut self, name: &str, target: &str) -> Self {
        self.own_features
            .push(FeatureDecl::new(name, FeatureKind::Child, Some(target)));
        self
    }

    pub fn children(mut self, name: &str, target: &str) -> Self {
        self.own_features
            .push(FeatureDecl::new(name, FeatureKind::Children, Some(target)));
        self
    }

    pub fn reference(mut self, name: &str, target: &str) -> Self {
        self.own_features
            .push(FeatureDecl::new(name, FeatureKind::Reference, Some(target)));
        self
    }

    /// Declare where the most recently added feature is read from on a foreign node.
    ///
    /// Registration fails with [`ModelError::DanglingMapping`] if no feature precedes it.
    pub fn mapped_from(mut self, path: &str) -> Self {
        match self.own_features.last_mut() {
            Some(feature) => feature.mapped_from = Some(path.into()),
            // Recorded as a sentinel feature so the builder can report it
            None => self.own_features.push(FeatureDecl {
                mapped_from: Some(path.into()),
                ..FeatureDecl::new("", FeatureKind::Attribute, None)
            }),
        }
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Direct supertypes as declared
    pub fn supertypes(&self) -> &[SmolStr] {
        &self.supertypes
    }

    /// This concept followed by all its supertypes, most-derived first
    pub fn ancestry(&self) -> &[SmolStr] {
        &self.ancestry
    }

    /// Supertype-or-equal test
    pub fn is_a(&self, concept: &str) -> bool {
        self.ancestry.iter().any(|c| c == concept)
    }

    /// All features including inherited ones, in declaration order
    pub fn features(&self) -> &[FeatureDecl] {
        &self.features
    }

    pub fn feature(&self, name: &str) -> Option<&FeatureDecl> {
        self.features.iter().find(|f| f.name == name)
    }

    pub fn is_placeholder(&self) -> bool {
        self.name == GENERIC_NODE || self.name == ERROR_NODE
    }
}

/// The registry of all concepts known to a language.
#[derive(Debug)]
pub struct Metamodel {
    concepts: IndexMap<SmolStr, Rc<Concept>>,
}

impl Metamodel {
    pub fn builder() -> MetamodelBuilder {
        MetamodelBuilder::default()
    }

    pub fn concept(&self, name: &str) -> Option<&Rc<Concept>> {
        self.concepts.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.concepts.contains_key(name)
    }

    pub fn concepts(&self) -> impl Iterator<Item = &Rc<Concept>> {
        self.concepts.values()
    }

    /// Whether `sub` is `sup` or one of its (transitive) subtypes.
    pub fn is_subtype(&self, sub: &str, sup: &str) -> bool {
        self.concepts
            .get(sub)
            .is_some_and(|concept| concept.is_a(sup))
    }

    /// Create a fresh node of the given concept with every feature unset.
    pub fn create(&self, concept: &str) -> Result<Node, ModelError> {
        let concept = self
            .concepts
            .get(concept)
            .ok_or_else(|| ModelError::UnknownConcept(concept.into()))?;
        Ok(Node::new(Rc::clone(concept)))
    }

    /// A placeholder for a foreign subtree that nothing knows how to translate.
    pub fn generic_node(&self) -> Node {
        Node::new(Rc::clone(&self.concepts[GENERIC_NODE]))
    }

    /// A placeholder standing in for a subtree whose factory failed.
    pub fn error_node(&self, message: impl Into<String>) -> Node {
        let message: String = message.into();
        let node = Node::new(Rc::clone(&self.concepts[ERROR_NODE]));
        node.store_attribute(ERROR_MESSAGE_FEATURE, Value::Str(message.into()));
        node
    }
}

/// Collects concept declarations and validates them into a [`Metamodel`].
#[derive(Debug, Default)]
pub struct MetamodelBuilder {
    declared: Vec<Concept>,
}

impl MetamodelBuilder {
    pub fn concept(mut self, concept: Concept) -> Self {
        self.declared.push(concept);
        self
    }

    pub fn build(self) -> Result<Metamodel, ModelError> {
        let mut declared: IndexMap<SmolStr, Concept> = IndexMap::new();
        for concept in builtin_concepts().into_iter().chain(self.declared) {
            if declared.contains_key(&concept.name) {
                return Err(ModelError::DuplicateConcept(concept.name));
            }
            declared.insert(concept.name.clone(), concept);
        }

        for concept in declared.values_mut() {
            if concept.own_features.iter().any(|f| f.name.is_empty()) {
                return Err(ModelError::DanglingMapping(concept.name.clone()));
            }
            if concept.supertypes.is_empty() && concept.name != BASE_CONCEPT {
                concept.supertypes.push(BASE_CONCEPT.into());
            }
            let owner = concept.name.clone();
            for feature in &mut concept.own_features {
                feature.owner = owner.clone();
            }
        }

        validate_references(&declared)?;

        let mut ancestries: FxHashMap<SmolStr, Vec<SmolStr>> = FxHashMap::default();
        let mut visiting = FxHashSet::default();
        for name in declared.keys() {
            compute_ancestry(name, &declared, &mut ancestries, &mut visiting)?;
        }

        let mut concepts = IndexMap::with_capacity(declared.len());
        for (name, concept) in &declared {
            let ancestry = ancestries.remove(name).unwrap_or_default();
            let mut features: Vec<FeatureDecl> = Vec::new();
            for ancestor in ancestry.iter().rev() {
                for feature in &declared[ancestor].own_features {
                    if features.iter().any(|f| f.name == feature.name) {
                        return Err(ModelError::DuplicateFeature {
                            concept: name.clone(),
                            feature: feature.name.clone(),
                        });
                    }
                    features.push(feature.clone());
                }
            }
            let concept = Concept {
                ancestry,
                features,
                ..concept.clone()
            };
            concepts.insert(name.clone(), Rc::new(concept));
        }

        tracing::debug!("[METAMODEL] built {} concepts", concepts.len());
        Ok(Metamodel { concepts })
    }
}

fn builtin_concepts() -> [Concept; 3] {
    [
        Concept::new(BASE_CONCEPT),
        Concept::new(GENERIC_NODE),
        Concept::new(ERROR_NODE).attribute(ERROR_MESSAGE_FEATURE),
    ]
}

fn validate_references(declared: &IndexMap<SmolStr, Concept>) -> Result<(), ModelError> {
    for concept in declared.values() {
        for supertype in &concept.supertypes {
            if !declared.contains_key(supertype) {
                return Err(ModelError::UnknownSupertype {
                    concept: concept.name.clone(),
                    supertype: supertype.clone(),
                });
            }
        }
        for feature in &concept.own_features {
            if let Some(target) = &feature.target {
                if !declared.contains_key(target) {
                    return Err(ModelError::UnknownTarget {
                        concept: concept.name.clone(),
                        feature: feature.name.clone(),
                        target: target.clone(),
                    });
                }
            }
        }
    }
    Ok(())
}

/// Linearization of the supertype graph, each concept once and after all of
/// its subtypes. Nearer supertypes come first among unrelated concepts.
fn compute_ancestry(
    name: &SmolStr,
    declared: &IndexMap<SmolStr, Concept>,
    done: &mut FxHashMap<SmolStr, Vec<SmolStr>>,
    visiting: &mut FxHashSet<SmolStr>,
) -> Result<Vec<SmolStr>, ModelError> {
    if let Some(ancestry) = done.get(name) {
        return Ok(ancestry.clone());
    }
    if !visiting.insert(name.clone()) {
        return Err(ModelError::InheritanceCycle(name.clone()));
    }

    let mut parents = Vec::new();
    for supertype in &declared[name].supertypes {
        parents.push(compute_ancestry(supertype, declared, done, visiting)?);
    }
    // Interleave parent ancestries level by level for the preferred order
    let mut remaining: Vec<SmolStr> = Vec::new();
    let depth = parents.iter().map(Vec::len).max().unwrap_or(0);
    for level in 0..depth {
        for parent in &parents {
            if let Some(ancestor) = parent.get(level) {
                if !remaining.contains(ancestor) {
                    remaining.push(ancestor.clone());
                }
            }
        }
    }

    // Then emit each ancestor only once none of its subtypes is left
    let mut ancestry = Vec::with_capacity(remaining.len() + 1);
    ancestry.push(name.clone());
    while !remaining.is_empty() {
        let next = remaining
            .iter()
            .position(|candidate| {
                !remaining.iter().any(|other| {
                    other != candidate
                        && done
                            .get(other)
                            .is_some_and(|supertypes| supertypes.contains(candidate))
                })
            })
            .unwrap_or(0);
        ancestry.push(remaining.remove(next));
    }

    visiting.remove(name);
    done.insert(name.clone(), ancestry.clone());
    Ok(ancestry)
}
