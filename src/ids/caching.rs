use std::cell::RefCell;

use rustc_hash::FxHashMap;
use tracing::trace;

use super::error::IdError;
use super::{Coordinates, NodeIdProvider};
use crate::model::{Node, NodeKey, WeakNode};

/// Memoizes another provider, computing each node's id at most once.
///
/// Entries are keyed by node identity, so two structurally equal nodes are
/// cached separately. Entries are never evicted; build a new provider to
/// start over. Ids computed from explicit coordinates bypass the cache.
pub struct CachingIdProvider<P> {
    inner: P,
    /// The weak handle guards against a dropped node's address being reused
    cache: RefCell<FxHashMap<NodeKey, (WeakNode, String)>>,
}

impl<P: NodeIdProvider> CachingIdProvider<P> {
    pub fn new(inner: P) -> Self {
        Self {
            inner,
            cache: RefCell::new(FxHashMap::default()),
        }
    }

    pub fn inner(&self) -> &P {
        &self.inner
    }

    pub fn cached(&self, node: &Node) -> Option<String> {
        let cache = self.cache.borrow();
        let (weak, id) = cache.get(&node.key())?;
        weak.upgrade()
            .filter(|cached| cached.ptr_eq(node))
            .map(|_| id.clone())
    }
}

impl<P: NodeIdProvider> NodeIdProvider for CachingIdProvider<P> {
    fn id(&self, node: &Node) -> Result<String, IdError> {
        if let Some(id) = self.cached(node) {
            return Ok(id);
        }
        let id = self.inner.id(node)?;
        trace!("[IDS] cached {:?} -> {}", node, id);
        self.cache
            .borrow_mut()
            .insert(node.key(), (node.downgrade(), id.clone()));
        Ok(id)
    }

    fn id_using_coordinates(
        &self,
        node: &Node,
        coordinates: &Coordinates,
    ) -> Result<String, IdError> {
        self.inner.id_using_coordinates(node, coordinates)
    }
}
