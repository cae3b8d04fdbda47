//! # Arbor Types
//!
//! Shared type definitions for the Arbor resource access layer.
//!
//! This crate provides the domain types used across the workspace (graph
//! nodes, resource records, walk strategies) plus the error surface of the
//! two store collaborators, ensuring a single source of truth and preventing
//! circular dependencies.

use thiserror::Error;

pub mod node;
pub mod resource;

pub use node::{Node, Predicate, SYSTEM_IDENTITY, USER_KIND};
pub use resource::{
    RESERVED_FIELD_ID, RESERVED_FIELD_META, Resource, ResourceMeta, WalkMethod,
};

// ============================================================================
// Collaborator Error Types
// ============================================================================

/// Errors raised by the store collaborators (resource store and
/// relationship graph).
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Not found")]
    NotFound,

    #[error("Conflict")]
    Conflict,

    #[error("Database error: {0}")]
    Database(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;
