//! Fixtures for seeding containment hierarchies
//!
//! Provides helper functions for building test graphs and attribute payloads
//! with sensible defaults.

use arbor_store::{MemoryGraph, RelationshipGraph};
use arbor_types::{Predicate, StoreResult};
use serde_json::{Map, Value};

/// Seed a batch of `is-member` edges, each `(subject, object)` given by
/// canonical identity.
pub async fn seed_memberships(
    graph: &MemoryGraph,
    edges: &[(&str, &str)],
) -> StoreResult<()> {
    for (subject, object) in edges {
        graph.create_edge(subject, Predicate::IsMember, object).await?;
    }
    Ok(())
}

/// Seed the canonical two-branch test hierarchy:
///
/// ```text
/// SYSTEM
/// ├── Org-OrgA
/// │   └── Team-TeamX
/// │       ├── User-U1
/// │       └── Doc-Doc1
/// └── Org-OrgB
///     └── Team-TeamY
///         ├── User-U2
///         └── Doc-Doc2
/// ```
pub async fn seed_org_tree(graph: &MemoryGraph) -> StoreResult<()> {
    seed_memberships(
        graph,
        &[
            ("Org-OrgA", "SYSTEM"),
            ("Team-TeamX", "Org-OrgA"),
            ("User-U1", "Team-TeamX"),
            ("Doc-Doc1", "Team-TeamX"),
            ("Org-OrgB", "SYSTEM"),
            ("Team-TeamY", "Org-OrgB"),
            ("User-U2", "Team-TeamY"),
            ("Doc-Doc2", "Team-TeamY"),
        ],
    )
    .await
}

/// Build an attribute payload from string pairs.
///
/// # Example
/// ```
/// use arbor_test_fixtures::attributes;
///
/// let attrs = attributes(&[("name", "A"), ("color", "teal")]);
/// assert_eq!(attrs.get("name").and_then(|v| v.as_str()), Some("A"));
/// ```
pub fn attributes(pairs: &[(&str, &str)]) -> Map<String, Value> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), Value::String(v.to_string())))
        .collect()
}
