//! # Arbor Core - Hierarchy-Gated Resource Access
//!
//! Core access layer for Arbor: hierarchy traversal over `is-member` edges,
//! reachability-based authorization decisions, and the resource lifecycle
//! orchestration that composes both with the two backing stores.

use thiserror::Error;

use arbor_types::StoreError;

pub mod authorizer;
pub mod context;
pub mod lifecycle;
pub mod operations;
pub mod walker;

pub use authorizer::AccessAuthorizer;
pub use context::AccessContext;
pub use lifecycle::{CreateOutcome, ResourceLifecycleManager};
pub use operations::{Operation, OperationCatalog, OperationSet};
pub use walker::HierarchyWalker;

/// Errors surfaced by access-layer operations.
#[derive(Debug, Error)]
pub enum AccessError {
    /// An argument's type or shape was violated; raised before any I/O.
    #[error("validation error: {0}")]
    Validation(String),

    /// A required collaborator is missing, or hierarchy placement cannot be
    /// resolved.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The hierarchy-intersection check denied the caller.
    #[error("not authorized: {0}")]
    Authorization(String),

    /// The target record does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// A collaborator call failed while creating a resource; the original
    /// cause is attached.
    #[error("store operation failed while creating a `{resource_kind}` resource")]
    External {
        resource_kind: String,
        #[source]
        source: StoreError,
    },

    /// A collaborator error propagated unwrapped.
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

pub type Result<T> = std::result::Result<T, AccessError>;
