//! In-memory relationship graph for testing and development.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use arbor_types::{Node, Predicate, StoreResult};

use crate::RelationshipGraph;

#[derive(Debug, Clone, PartialEq, Eq)]
struct Edge {
    subject: String,
    predicate: Predicate,
    object: String,
}

/// In-memory [`RelationshipGraph`] implementation.
///
/// Stores edges in insertion order and answers queries by linear scan, which
/// keeps the backend small and its behavior obvious at test scale.
#[derive(Clone, Default)]
pub struct MemoryGraph {
    edges: Arc<RwLock<Vec<Edge>>>,
}

impl MemoryGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of edges. Test helper.
    pub async fn edge_count(&self) -> usize {
        self.edges.read().await.len()
    }

    /// Whether the exact edge `(subject, predicate, object)` exists. Test helper.
    pub async fn has_edge(&self, subject: &str, predicate: Predicate, object: &str) -> bool {
        let edges = self.edges.read().await;
        edges
            .iter()
            .any(|e| e.subject == subject && e.predicate == predicate && e.object == object)
    }
}

#[async_trait]
impl RelationshipGraph for MemoryGraph {
    async fn create_edge(
        &self,
        subject: &str,
        predicate: Predicate,
        object: &str,
    ) -> StoreResult<()> {
        let edge = Edge {
            subject: subject.to_string(),
            predicate,
            object: object.to_string(),
        };
        let mut edges = self.edges.write().await;
        if !edges.contains(&edge) {
            edges.push(edge);
        }
        Ok(())
    }

    async fn objects_of(&self, subject: &str, predicate: Predicate) -> StoreResult<Vec<Node>> {
        let edges = self.edges.read().await;
        Ok(edges
            .iter()
            .filter(|e| e.subject == subject && e.predicate == predicate)
            .filter_map(|e| Node::parse(&e.object))
            .collect())
    }

    async fn subjects_of(&self, object: &str, predicate: Predicate) -> StoreResult<Vec<Node>> {
        let edges = self.edges.read().await;
        Ok(edges
            .iter()
            .filter(|e| e.object == object && e.predicate == predicate)
            .filter_map(|e| Node::parse(&e.subject))
            .collect())
    }

    async fn remove_all_edges_touching(&self, node: &str) -> StoreResult<()> {
        let mut edges = self.edges.write().await;
        edges.retain(|e| e.subject != node && e.object != node);
        Ok(())
    }

    async fn members_of_type_under_anchor(
        &self,
        kind: &str,
        anchor: &str,
        predicate: Predicate,
        _origin_user_id: &str,
    ) -> StoreResult<Vec<Node>> {
        let members = self.subjects_of(anchor, predicate).await?;
        Ok(members.into_iter().filter(|n| n.kind == kind).collect())
    }
}
