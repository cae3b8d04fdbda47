//! Explicit collaborator context passed into every operation.

use std::sync::Arc;

use arbor_store::{RelationshipGraph, ResourceStore};

/// Holds the store collaborators for the access layer.
///
/// The resource store is required. The relationship graph is optional; its
/// absence disables all authorization and hierarchy features, leaving the
/// layer in permissive flat mode.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use arbor_core::AccessContext;
/// use arbor_store::{MemoryGraph, MemoryStore};
///
/// let context = AccessContext::builder()
///     .resource_store(Arc::new(MemoryStore::new()))
///     .relationship_graph(Arc::new(MemoryGraph::new()))
///     .build();
/// ```
#[derive(Clone)]
pub struct AccessContext {
    resource_store: Arc<dyn ResourceStore>,
    relationship_graph: Option<Arc<dyn RelationshipGraph>>,
}

#[bon::bon]
impl AccessContext {
    #[builder]
    pub fn new(
        resource_store: Arc<dyn ResourceStore>,
        relationship_graph: Option<Arc<dyn RelationshipGraph>>,
    ) -> Self {
        Self { resource_store, relationship_graph }
    }
}

impl AccessContext {
    /// The resource record store.
    #[inline]
    pub fn resource_store(&self) -> &Arc<dyn ResourceStore> {
        &self.resource_store
    }

    /// The relationship graph, when one is configured.
    #[inline]
    pub fn relationship_graph(&self) -> Option<&Arc<dyn RelationshipGraph>> {
        self.relationship_graph.as_ref()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use arbor_store::{MemoryGraph, MemoryStore};

    use super::*;

    #[test]
    fn test_builder_without_graph() {
        let context =
            AccessContext::builder().resource_store(Arc::new(MemoryStore::new())).build();

        assert!(context.relationship_graph().is_none());
    }

    #[test]
    fn test_builder_with_graph() {
        let context = AccessContext::builder()
            .resource_store(Arc::new(MemoryStore::new()))
            .relationship_graph(Arc::new(MemoryGraph::new()))
            .build();

        assert!(context.relationship_graph().is_some());
    }
}
