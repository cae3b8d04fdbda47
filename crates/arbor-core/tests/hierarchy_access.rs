//! Integration tests for hierarchy traversal and authorization decisions.

use std::sync::Arc;

use arbor_core::{AccessAuthorizer, HierarchyWalker};
use arbor_store::MemoryGraph;
use arbor_test_fixtures::{seed_memberships, seed_org_tree};
use arbor_types::Node;

async fn seeded_walker() -> HierarchyWalker {
    let graph = Arc::new(MemoryGraph::new());
    seed_org_tree(&graph).await.unwrap();
    HierarchyWalker::new(Some(graph))
}

fn identities(nodes: &[Node]) -> Vec<String> {
    let mut ids: Vec<String> = nodes.iter().map(Node::identity).collect();
    ids.sort();
    ids
}

// =========================================================================
// WALKER PROPERTIES
// =========================================================================

#[tokio::test]
async fn test_upward_walk_terminates_with_each_ancestor_once() {
    let walker = seeded_walker().await;

    let ancestors = walker.walk_upward("User-U1", None).await.unwrap();

    assert_eq!(identities(&ancestors), vec!["Org-OrgA", "Team-TeamX"]);
}

#[tokio::test]
async fn test_walk_never_emits_sentinel_or_start_node() {
    let walker = seeded_walker().await;

    let ancestors = walker.walk_upward("Doc-Doc1", None).await.unwrap();

    assert!(ancestors.iter().all(|n| !n.is_system()));
    assert!(ancestors.iter().all(|n| n.identity() != "Doc-Doc1"));
}

#[tokio::test]
async fn test_walks_are_inverse_relation_duals() {
    let walker = seeded_walker().await;

    // For the edge (User-U1, is-member, Team-TeamX): the object is among the
    // subject's ancestors, and the subject among the object's descendants.
    let up = walker.walk_upward("User-U1", None).await.unwrap();
    let down = walker.walk_downward("Team-TeamX", None).await.unwrap();

    assert!(up.iter().any(|n| n.identity() == "Team-TeamX"));
    assert!(down.iter().any(|n| n.identity() == "User-U1"));
}

#[tokio::test]
async fn test_downward_walk_stays_inside_the_branch() {
    let walker = seeded_walker().await;

    let descendants = walker.walk_downward("Org-OrgA", None).await.unwrap();
    let ids = identities(&descendants);

    assert_eq!(ids, vec!["Doc-Doc1", "Team-TeamX", "User-U1"]);
    assert!(!ids.contains(&"Team-TeamY".to_string()));
}

#[tokio::test]
async fn test_diamond_graph_emits_each_node_once() {
    // D has two parents sharing a grandparent; dedup keeps the walk finite
    // and single-emission even though the data is not a strict tree.
    let graph = Arc::new(MemoryGraph::new());
    seed_memberships(
        &graph,
        &[("N-D", "N-P1"), ("N-D", "N-P2"), ("N-P1", "N-G"), ("N-P2", "N-G")],
    )
    .await
    .unwrap();
    let walker = HierarchyWalker::new(Some(graph));

    let ancestors = walker.walk_upward("N-D", None).await.unwrap();

    assert_eq!(identities(&ancestors), vec!["N-G", "N-P1", "N-P2"]);
}

// =========================================================================
// AUTHORIZATION SCENARIOS
// =========================================================================

#[tokio::test]
async fn test_shared_team_grants_retrieve() {
    // SYSTEM -> OrgA -> TeamX, with User-U1 and Doc-Doc1 both members of
    // TeamX: the scopes share TeamX, so retrieval is granted.
    let walker = seeded_walker().await;
    let authorizer = AccessAuthorizer::new(walker);

    assert!(authorizer.can_retrieve("U1", "Doc", "Doc1").await.unwrap());
}

#[tokio::test]
async fn test_sibling_branches_stay_invisible() {
    let walker = seeded_walker().await;
    let authorizer = AccessAuthorizer::new(walker);

    assert!(!authorizer.can_retrieve("U1", "Doc", "Doc2").await.unwrap());
    assert!(!authorizer.can_retrieve("U2", "Doc", "Doc1").await.unwrap());
}

#[tokio::test]
async fn test_update_permission_matches_retrieve_permission() {
    let walker = seeded_walker().await;
    let authorizer = AccessAuthorizer::new(walker);

    assert!(authorizer.can_update("U1", "Doc", "Doc1").await.unwrap());
    assert!(!authorizer.can_update("U2", "Doc", "Doc1").await.unwrap());
}

#[tokio::test]
async fn test_flat_mode_grants_everything() {
    let authorizer = AccessAuthorizer::new(HierarchyWalker::new(None));

    assert!(authorizer.can_retrieve("Nobody", "Doc", "Doc1").await.unwrap());
    assert!(authorizer.can_update("Nobody", "Doc", "Doc1").await.unwrap());
}
