//! # Arbor Store - Collaborator Interfaces
//!
//! Abstract interfaces for the two independently-failing stores the access
//! layer talks to: the resource record store (a key/hash store) and the
//! relationship graph (directed, predicate-labeled edges).
//!
//! The resource store is a required collaborator. The relationship graph is
//! optional: when it is absent, the layers above fall back to permissive
//! flat mode with no hierarchy features.
//!
//! In-memory backends for both interfaces live in [`memory`] and
//! [`memory_graph`]; they back the test suites and embedded development use.

use async_trait::async_trait;
use serde_json::{Map, Value};

use arbor_types::{Node, Predicate, StoreResult};

pub mod keys;
pub mod memory;
pub mod memory_graph;

pub use memory::MemoryStore;
pub use memory_graph::MemoryGraph;

/// The resource record store: keyed hashes plus membership sets.
#[async_trait]
pub trait ResourceStore: Send + Sync {
    /// Whether a record exists at `key`.
    async fn exists(&self, key: &str) -> StoreResult<bool>;

    /// Read every hash field stored at `key`.
    ///
    /// A missing key reads as an empty map, matching hash-store semantics.
    async fn read_hash(&self, key: &str) -> StoreResult<Map<String, Value>>;

    /// Write `fields` into the hash at `key`, merging over existing fields.
    async fn write_hash_fields(&self, key: &str, fields: Map<String, Value>) -> StoreResult<()>;

    /// Add `member` to the set named `set`.
    async fn add_to_set(&self, set: &str, member: &str) -> StoreResult<()>;

    /// Delete the value stored at `key`.
    async fn delete(&self, key: &str) -> StoreResult<()>;
}

/// The relationship graph: directed `(subject, predicate, object)` edges
/// between nodes addressed by their canonical identity strings.
#[async_trait]
pub trait RelationshipGraph: Send + Sync {
    /// Create the edge `(subject, predicate, object)`.
    async fn create_edge(
        &self,
        subject: &str,
        predicate: Predicate,
        object: &str,
    ) -> StoreResult<()>;

    /// Objects related to `subject` via `predicate`; for `is-member`,
    /// "what is this node a member of".
    async fn objects_of(&self, subject: &str, predicate: Predicate) -> StoreResult<Vec<Node>>;

    /// Subjects related to `object` via `predicate`; for `is-member`,
    /// "what is a member of this node".
    async fn subjects_of(&self, object: &str, predicate: Predicate) -> StoreResult<Vec<Node>>;

    /// Remove every edge touching `node`: both directions, any predicate.
    async fn remove_all_edges_touching(&self, node: &str) -> StoreResult<()>;

    /// Member nodes of `kind` related to `anchor` via `predicate`.
    async fn members_of_type_under_anchor(
        &self,
        kind: &str,
        anchor: &str,
        predicate: Predicate,
        origin_user_id: &str,
    ) -> StoreResult<Vec<Node>>;
}
