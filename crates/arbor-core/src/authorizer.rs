//! Hierarchy-intersection authorization decisions.

use std::collections::HashSet;

use tracing::debug;

use arbor_types::{Node, StoreResult};

use crate::walker::HierarchyWalker;

/// Decides retrieve/update access by intersecting the caller's hierarchy
/// scope with the target's ancestor chain.
///
/// The caller's scope is their ancestor chain plus everything under their
/// nearest parent: the same branch of the containment tree, or a branch that
/// contains it. Sibling branches elsewhere in the tree stay invisible. With
/// no relationship graph configured every check is granted (flat mode).
#[derive(Clone)]
pub struct AccessAuthorizer {
    walker: HierarchyWalker,
}

impl AccessAuthorizer {
    pub fn new(walker: HierarchyWalker) -> Self {
        Self { walker }
    }

    /// The walker this authorizer traverses with.
    #[inline]
    pub fn walker(&self) -> &HierarchyWalker {
        &self.walker
    }

    /// Whether `user_id` may retrieve the resource `{kind}-{id}`.
    pub async fn can_retrieve(&self, user_id: &str, kind: &str, id: &str) -> StoreResult<bool> {
        self.shares_branch(user_id, kind, id).await
    }

    /// Whether `user_id` may update the resource `{kind}-{id}`.
    ///
    /// Update permission also gates removal.
    pub async fn can_update(&self, user_id: &str, kind: &str, id: &str) -> StoreResult<bool> {
        self.shares_branch(user_id, kind, id).await
    }

    async fn shares_branch(&self, user_id: &str, kind: &str, id: &str) -> StoreResult<bool> {
        if !self.walker.has_graph() {
            return Ok(true);
        }

        let user_identity = Node::user(user_id).identity();
        let ancestors = self.walker.walk_upward(&user_identity, None).await?;
        let Some(nearest) = ancestors.first() else {
            // A user with no parent anywhere has an empty scope.
            return Ok(false);
        };

        let mut scope: HashSet<String> = ancestors.iter().map(Node::identity).collect();
        for node in self.walker.walk_downward(&nearest.identity(), None).await? {
            scope.insert(node.identity());
        }

        let target_identity = Node::new(kind, id).identity();
        let target_ancestors = self.walker.walk_upward(&target_identity, None).await?;
        let granted = target_ancestors.iter().any(|n| scope.contains(&n.identity()));

        debug!(
            user = %user_identity,
            target = %target_identity,
            scope_size = scope.len(),
            granted = granted,
            "authorization decision"
        );

        Ok(granted)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use std::sync::Arc;

    use arbor_store::{MemoryGraph, RelationshipGraph};
    use arbor_types::Predicate;

    use super::*;

    /// Two sibling branches under the root:
    /// `SYSTEM <- Org-OrgA <- Team-TeamX <- {User-U1, Doc-Doc1}` and
    /// `SYSTEM <- Org-OrgB <- Team-TeamY <- {User-U2, Doc-Doc2}`.
    async fn seeded_authorizer() -> AccessAuthorizer {
        let graph = Arc::new(MemoryGraph::new());
        for (subject, object) in [
            ("Org-OrgA", "SYSTEM"),
            ("Team-TeamX", "Org-OrgA"),
            ("User-U1", "Team-TeamX"),
            ("Doc-Doc1", "Team-TeamX"),
            ("Org-OrgB", "SYSTEM"),
            ("Team-TeamY", "Org-OrgB"),
            ("User-U2", "Team-TeamY"),
            ("Doc-Doc2", "Team-TeamY"),
        ] {
            graph.create_edge(subject, Predicate::IsMember, object).await.unwrap();
        }
        AccessAuthorizer::new(HierarchyWalker::new(Some(graph)))
    }

    #[tokio::test]
    async fn test_same_branch_is_granted() {
        let authorizer = seeded_authorizer().await;

        assert!(authorizer.can_retrieve("U1", "Doc", "Doc1").await.unwrap());
        assert!(authorizer.can_update("U1", "Doc", "Doc1").await.unwrap());
    }

    #[tokio::test]
    async fn test_sibling_branch_is_denied() {
        let authorizer = seeded_authorizer().await;

        assert!(!authorizer.can_retrieve("U1", "Doc", "Doc2").await.unwrap());
        assert!(!authorizer.can_update("U2", "Doc", "Doc1").await.unwrap());
    }

    #[tokio::test]
    async fn test_unparented_user_has_empty_scope() {
        let authorizer = seeded_authorizer().await;

        assert!(!authorizer.can_retrieve("Ghost", "Doc", "Doc1").await.unwrap());
    }

    #[tokio::test]
    async fn test_without_graph_everything_is_granted() {
        let authorizer = AccessAuthorizer::new(HierarchyWalker::new(None));

        assert!(authorizer.can_retrieve("U1", "Doc", "Doc1").await.unwrap());
        assert!(authorizer.can_update("Anyone", "Doc", "Anything").await.unwrap());
    }

    #[tokio::test]
    async fn test_ancestor_chain_grants_upward_visibility() {
        // A node above the user in the same branch intersects the user's
        // ancestor chain, so it stays visible.
        let authorizer = seeded_authorizer().await;

        assert!(authorizer.can_retrieve("U1", "Team", "TeamX").await.unwrap());
    }
}
