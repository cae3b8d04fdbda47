//! Test fixtures for Arbor integration tests
//!
//! This crate provides shared helpers for seeding containment hierarchies
//! and building attribute payloads, used across multiple test suites.

pub mod hierarchy;

pub use hierarchy::{attributes, seed_memberships, seed_org_tree};
