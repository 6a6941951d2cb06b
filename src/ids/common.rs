use super::declarative::DeclarativeIdProvider;
use super::error::IdError;
use super::structural::StructuralIdProvider;
use super::{Coordinates, NodeIdProvider};
use crate::model::Node;

/// Semantic ids where a rule applies, structural ids everywhere else.
pub struct CommonIdProvider {
    semantic: DeclarativeIdProvider,
    structural: StructuralIdProvider,
}

impl CommonIdProvider {
    pub fn new(semantic: DeclarativeIdProvider, structural: StructuralIdProvider) -> Self {
        Self {
            semantic,
            structural,
        }
    }

    pub fn semantic(&self) -> &DeclarativeIdProvider {
        &self.semantic
    }

    pub fn structural(&self) -> &StructuralIdProvider {
        &self.structural
    }
}

impl NodeIdProvider for CommonIdProvider {
    fn id(&self, node: &Node) -> Result<String, IdError> {
        match self.semantic.semantic_id(node)? {
            Some(id) => Ok(id),
            None => self.structural.id(node),
        }
    }

    fn id_using_coordinates(
        &self,
        node: &Node,
        coordinates: &Coordinates,
    ) -> Result<String, IdError> {
        match self.semantic.semantic_id(node)? {
            Some(id) => Ok(id),
            None => self.structural.id_using_coordinates(node, coordinates),
        }
    }
}
