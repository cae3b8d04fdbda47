//! Resource records and their persisted metadata.
//!
//! A resource is persisted as a hash: its attributes become fields, plus the
//! two reserved fields `ID` (the record identity) and `meta` (a JSON value
//! holding authorship and timestamps). Caller-supplied attribute payloads
//! always have the reserved keys stripped before they reach a record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::node::Node;
use crate::{StoreError, StoreResult};

/// Reserved hash field holding the record identity.
pub const RESERVED_FIELD_ID: &str = "ID";

/// Reserved hash field holding the record metadata.
pub const RESERVED_FIELD_META: &str = "meta";

/// Authorship and timestamp metadata carried by every resource record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceMeta {
    #[serde(rename = "authorID")]
    pub author_id: String,

    #[serde(rename = "createdISOTime")]
    pub created_at: DateTime<Utc>,

    #[serde(rename = "updatedISOTime")]
    pub updated_at: DateTime<Utc>,
}

impl ResourceMeta {
    /// Fresh metadata for a record created now by `author_id`.
    pub fn new(author_id: impl Into<String>) -> Self {
        let now = Utc::now();
        Self { author_id: author_id.into(), created_at: now, updated_at: now }
    }
}

/// A typed, attribute-bearing record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    pub id: String,
    pub kind: String,
    pub attributes: Map<String, Value>,
    pub meta: ResourceMeta,
}

impl Resource {
    /// The graph node this record is embedded at.
    pub fn node(&self) -> Node {
        Node::new(&self.kind, &self.id)
    }

    /// Flatten into the persisted hash shape: attributes plus the reserved
    /// `ID` and `meta` fields.
    pub fn to_fields(&self) -> StoreResult<Map<String, Value>> {
        let mut fields = self.attributes.clone();
        fields.insert(RESERVED_FIELD_ID.to_string(), Value::String(self.id.clone()));
        fields.insert(RESERVED_FIELD_META.to_string(), serde_json::to_value(&self.meta)?);
        Ok(fields)
    }

    /// Hydrate a record of `kind` from its stored hash fields.
    pub fn from_fields(kind: &str, mut fields: Map<String, Value>) -> StoreResult<Self> {
        let id = match fields.remove(RESERVED_FIELD_ID) {
            Some(Value::String(id)) => id,
            _ => {
                return Err(StoreError::Internal(format!(
                    "stored {kind} record is missing its reserved `{RESERVED_FIELD_ID}` field"
                )));
            },
        };
        let meta = fields.remove(RESERVED_FIELD_META).ok_or_else(|| {
            StoreError::Internal(format!(
                "stored {kind} record `{id}` is missing its reserved `{RESERVED_FIELD_META}` field"
            ))
        })?;
        let meta: ResourceMeta = serde_json::from_value(meta)?;

        Ok(Self { id, kind: kind.to_string(), attributes: fields, meta })
    }

    /// Strip the reserved keys from a caller-supplied payload, returning the
    /// caller-reserved ID when one was present.
    pub fn strip_reserved(attributes: &mut Map<String, Value>) -> Option<String> {
        let reserved_id = match attributes.remove(RESERVED_FIELD_ID) {
            Some(Value::String(id)) if !id.is_empty() => Some(id),
            _ => None,
        };
        attributes.remove(RESERVED_FIELD_META);
        reserved_id
    }
}

/// Anchor-selection strategy for type listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WalkMethod {
    /// Ancestors of the caller plus everything under the caller's first
    /// ancestor.
    TopNodeDescent,
    /// The caller's direct parent plus all of its descendants.
    CurrentNodeDescent,
    /// The caller's direct parent only.
    CurrentNode,
}
