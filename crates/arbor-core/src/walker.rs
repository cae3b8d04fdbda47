//! Concurrent hierarchy traversal over `is-member` edges.

use std::collections::HashSet;
use std::sync::Arc;

use tokio::task::JoinSet;
use tracing::debug;

use arbor_store::RelationshipGraph;
use arbor_types::{Node, Predicate, StoreError, StoreResult};

/// Direction of an `is-member` traversal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Upward,
    Downward,
}

/// Traverses the containment hierarchy from a start node.
///
/// Each call owns its dedup accumulator exclusively: a node discovered once
/// is never re-emitted and never re-expanded, which also bounds traversal on
/// graphs that are not strictly trees. Every frontier level fans out its
/// queries in parallel; the first failing branch aborts the join and fails
/// the walk.
#[derive(Clone)]
pub struct HierarchyWalker {
    graph: Option<Arc<dyn RelationshipGraph>>,
}

impl HierarchyWalker {
    pub fn new(graph: Option<Arc<dyn RelationshipGraph>>) -> Self {
        Self { graph }
    }

    /// Whether a relationship graph is configured.
    pub fn has_graph(&self) -> bool {
        self.graph.is_some()
    }

    /// Ancestors of `start`: every node reachable by following `is-member`
    /// edges from subject to object.
    ///
    /// `max_discovered` is a global count budget across all branches, not a
    /// per-branch depth limit: once the total discovered count reaches it,
    /// no further expansion queries are issued anywhere. Branches stop at
    /// empty results or at the `SYSTEM` sentinel, which terminates the
    /// branch without being emitted. With no graph configured the result is
    /// empty. Result order is a join-order artifact; callers must treat the
    /// result as a set.
    pub async fn walk_upward(
        &self,
        start: &str,
        max_discovered: Option<usize>,
    ) -> StoreResult<Vec<Node>> {
        self.walk(start, Direction::Upward, max_discovered).await
    }

    /// Descendants of `start`: the mirror of [`walk_upward`], following
    /// `is-member` edges from object to subject.
    ///
    /// [`walk_upward`]: HierarchyWalker::walk_upward
    pub async fn walk_downward(
        &self,
        start: &str,
        max_discovered: Option<usize>,
    ) -> StoreResult<Vec<Node>> {
        self.walk(start, Direction::Downward, max_discovered).await
    }

    async fn walk(
        &self,
        start: &str,
        direction: Direction,
        max_discovered: Option<usize>,
    ) -> StoreResult<Vec<Node>> {
        let Some(graph) = self.graph.as_ref() else {
            return Ok(Vec::new());
        };

        let mut seen: HashSet<String> = HashSet::new();
        seen.insert(start.to_string());

        let mut discovered: Vec<Node> = Vec::new();
        let mut frontier: Vec<String> = vec![start.to_string()];

        while !frontier.is_empty() {
            let mut queries = JoinSet::new();
            for identity in frontier.drain(..) {
                let graph = Arc::clone(graph);
                queries.spawn(async move {
                    match direction {
                        Direction::Upward => {
                            graph.objects_of(&identity, Predicate::IsMember).await
                        },
                        Direction::Downward => {
                            graph.subjects_of(&identity, Predicate::IsMember).await
                        },
                    }
                });
            }

            let mut next = Vec::new();
            while let Some(joined) = queries.join_next().await {
                // Returning on the first failure drops the set, cancelling
                // the sibling branch queries.
                let related = joined
                    .map_err(|e| StoreError::Internal(format!("walk task join error: {e}")))??;
                for node in related {
                    // The sentinel ends a branch without being emitted.
                    if node.is_system() {
                        continue;
                    }
                    let identity = node.identity();
                    if !seen.insert(identity.clone()) {
                        continue;
                    }
                    discovered.push(node);
                    // Global count budget: once the discovered total reaches
                    // it, stop issuing expansion queries on every branch.
                    if max_discovered.is_none_or(|max| discovered.len() < max) {
                        next.push(identity);
                    }
                }
            }
            frontier = next;
        }

        debug!(
            start = start,
            direction = ?direction,
            discovered = discovered.len(),
            "hierarchy walk complete"
        );

        Ok(discovered)
    }
}
