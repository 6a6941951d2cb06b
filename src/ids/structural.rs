//! Identifiers derived from tree shape.
//!
//! The root of a tree is `<sourceId>_root`; every other node is
//! `<parentId>_<feature>` followed by `_<index>` unless it is the first
//! element of its containing feature. Reordering the elements of a feature
//! permutes their ids accordingly.

use smol_str::SmolStr;
use tracing::trace;

use super::error::IdError;
use super::source::{SimpleSourceIdProvider, SourceIdProvider};
use super::{Coordinates, NodeIdProvider};
use crate::model::Node;

pub struct StructuralIdProvider {
    sources: Box<dyn SourceIdProvider>,
}

impl Default for StructuralIdProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl StructuralIdProvider {
    pub fn new() -> Self {
        Self::with_source_ids(SimpleSourceIdProvider)
    }

    pub fn with_source_ids(sources: impl SourceIdProvider + 'static) -> Self {
        Self {
            sources: Box::new(sources),
        }
    }

    /// Where `node` sits: the root, or an index inside a feature of its container.
    pub fn coordinates(&self, node: &Node) -> Result<Coordinates, IdError> {
        if node.is_root() {
            return Ok(Coordinates::Root);
        }
        let (parent, (feature, index)) = node
            .parent()
            .zip(node.containing_feature())
            .ok_or_else(|| IdError::DetachedNode {
                concept: node.concept_name().into(),
            })?;
        Ok(Coordinates::Contained {
            container_id: self.id(&parent)?,
            feature,
            index,
        })
    }
}

impl NodeIdProvider for StructuralIdProvider {
    fn id(&self, node: &Node) -> Result<String, IdError> {
        let coordinates = self.coordinates(node)?;
        self.id_using_coordinates(node, &coordinates)
    }

    fn id_using_coordinates(
        &self,
        node: &Node,
        coordinates: &Coordinates,
    ) -> Result<String, IdError> {
        let id = match coordinates {
            Coordinates::Root => {
                let source = node.own_source().ok_or_else(|| IdError::MissingSource {
                    concept: node.concept_name().into(),
                })?;
                format!("{}_root", self.sources.source_id(&source)?)
            }
            Coordinates::Contained {
                container_id,
                feature,
                index,
            } => contained_id(container_id, feature, *index),
        };
        trace!("[IDS] {:?} -> {}", node, id);
        Ok(id)
    }
}

fn contained_id(container_id: &str, feature: &SmolStr, index: usize) -> String {
    if index == 0 {
        format!("{container_id}_{feature}")
    } else {
        format!("{container_id}_{feature}_{index}")
    }
}
