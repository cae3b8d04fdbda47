//! Key encoding for resource record storage.
//!
//! All keys carry the `arbor:` prefix for namespace isolation:
//!
//! - `arbor:res:{kind}:{id}` - resource record hash
//! - `arbor:res:idx:{kind}` - type-index member set

/// Prefix for all Arbor keys.
pub const STORE_PREFIX: &str = "arbor";

/// Key builders for resource records.
pub mod resource {
    use super::STORE_PREFIX;

    /// Build the key for a resource record hash.
    ///
    /// Schema: `arbor:res:{kind}:{id}`
    #[inline]
    pub fn record(kind: &str, id: &str) -> String {
        format!("{}:res:{}:{}", STORE_PREFIX, kind, id)
    }

    /// Build the key for a type-index member set.
    ///
    /// Schema: `arbor:res:idx:{kind}`
    #[inline]
    pub fn type_index(kind: &str) -> String {
        format!("{}:res:idx:{}", STORE_PREFIX, kind)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn test_record_keys() {
        assert_eq!(resource::record("Widget", "w1"), "arbor:res:Widget:w1");
        assert_eq!(resource::record("Doc", "Doc1"), "arbor:res:Doc:Doc1");
    }

    #[test]
    fn test_type_index_keys() {
        assert_eq!(resource::type_index("Widget"), "arbor:res:idx:Widget");
    }

    #[test]
    fn test_keys_are_deterministic() {
        assert_eq!(resource::record("Widget", "w1"), resource::record("Widget", "w1"));
    }
}
