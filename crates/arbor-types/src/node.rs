//! Graph node identity and edge predicates.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Reserved identity of the hierarchy root sentinel.
///
/// Upward traversal stops at this value; it is never emitted as a result
/// node. It is the only node identity that is not a `{kind}-{id}` composite.
pub const SYSTEM_IDENTITY: &str = "SYSTEM";

/// Node kind reserved for user nodes in the relationship graph.
pub const USER_KIND: &str = "User";

/// Label on a directed relationship edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Predicate {
    /// Containment: the subject is a member of the object.
    IsMember,
    /// Provenance: the subject was created by the object (a user node).
    IsAuthored,
}

impl Predicate {
    pub fn as_str(&self) -> &'static str {
        match self {
            Predicate::IsMember => "is-member",
            Predicate::IsAuthored => "is-authored",
        }
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A node in the relationship graph, identified by `(kind, id)`.
///
/// The canonical identity string is `{kind}-{id}`; the `SYSTEM` sentinel is
/// the single non-composite identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Node {
    pub kind: String,
    pub id: String,
}

impl Node {
    pub fn new(kind: impl Into<String>, id: impl Into<String>) -> Self {
        Self { kind: kind.into(), id: id.into() }
    }

    /// The user node for `user_id`.
    pub fn user(user_id: impl Into<String>) -> Self {
        Self::new(USER_KIND, user_id)
    }

    /// The hierarchy root sentinel.
    pub fn system() -> Self {
        Self { kind: SYSTEM_IDENTITY.to_string(), id: String::new() }
    }

    pub fn is_system(&self) -> bool {
        self.kind == SYSTEM_IDENTITY
    }

    /// Canonical identity string: `{kind}-{id}`, or the bare sentinel.
    pub fn identity(&self) -> String {
        if self.is_system() {
            SYSTEM_IDENTITY.to_string()
        } else {
            format!("{}-{}", self.kind, self.id)
        }
    }

    /// Parse a canonical identity back into a node.
    ///
    /// Splits on the first `-`, so kinds must not contain dashes while IDs
    /// may (UUIDs do). Returns `None` for strings that are neither the
    /// sentinel nor a well-formed composite.
    pub fn parse(identity: &str) -> Option<Self> {
        if identity == SYSTEM_IDENTITY {
            return Some(Self::system());
        }
        let (kind, id) = identity.split_once('-')?;
        if kind.is_empty() || id.is_empty() {
            return None;
        }
        Some(Self::new(kind, id))
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.identity())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_is_kind_dash_id() {
        let node = Node::new("Team", "TeamX");
        assert_eq!(node.identity(), "Team-TeamX");
    }

    #[test]
    fn test_user_node_uses_reserved_kind() {
        let node = Node::user("U1");
        assert_eq!(node.identity(), "User-U1");
        assert_eq!(node.kind, USER_KIND);
    }

    #[test]
    fn test_system_identity_is_not_composite() {
        let node = Node::system();
        assert!(node.is_system());
        assert_eq!(node.identity(), "SYSTEM");
    }

    #[test]
    fn test_parse_round_trips_composite_identity() {
        let node = Node::parse("Org-OrgA").unwrap();
        assert_eq!(node.kind, "Org");
        assert_eq!(node.id, "OrgA");
        assert_eq!(node.identity(), "Org-OrgA");
    }

    #[test]
    fn test_parse_keeps_dashes_in_id() {
        let node = Node::parse("Widget-550e8400-e29b-41d4-a716-446655440000").unwrap();
        assert_eq!(node.kind, "Widget");
        assert_eq!(node.id, "550e8400-e29b-41d4-a716-446655440000");
    }

    #[test]
    fn test_parse_sentinel() {
        let node = Node::parse("SYSTEM").unwrap();
        assert!(node.is_system());
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert!(Node::parse("").is_none());
        assert!(Node::parse("nodash").is_none());
        assert!(Node::parse("-leading").is_none());
        assert!(Node::parse("trailing-").is_none());
    }

    #[test]
    fn test_predicate_labels() {
        assert_eq!(Predicate::IsMember.as_str(), "is-member");
        assert_eq!(Predicate::IsAuthored.as_str(), "is-authored");
        assert_eq!(Predicate::IsMember.to_string(), "is-member");
    }
}
