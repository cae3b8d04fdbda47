//! Static operation catalog for resource kinds.
//!
//! The catalog is built once at startup from the resource kinds a deployment
//! serves, mapping each kind to its generated operation and event names.
//! Nothing is derived from type metadata at call time: an unregistered kind
//! simply has no operations to invoke.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// The operations generated for every registered resource kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operation {
    Create,
    Retrieve,
    Update,
    Remove,
    List,
}

/// Every generated operation, in declaration order.
pub const ALL_OPERATIONS: [Operation; 5] = [
    Operation::Create,
    Operation::Retrieve,
    Operation::Update,
    Operation::Remove,
    Operation::List,
];

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Create => "create",
            Operation::Retrieve => "retrieve",
            Operation::Update => "update",
            Operation::Remove => "remove",
            Operation::List => "list",
        }
    }

    /// Past-tense suffix for the event emitted after the operation succeeds.
    pub fn event_suffix(&self) -> &'static str {
        match self {
            Operation::Create => "created",
            Operation::Retrieve => "retrieved",
            Operation::Update => "updated",
            Operation::Remove => "removed",
            Operation::List => "listed",
        }
    }
}

/// The named operation set generated for one resource kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationSet {
    kind: String,
    prefix: String,
}

impl OperationSet {
    fn new(kind: String) -> Self {
        let prefix = kind.to_lowercase();
        Self { kind, prefix }
    }

    /// The resource kind this set was generated for.
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// Operation name, e.g. `widget.retrieve`.
    pub fn operation_name(&self, operation: Operation) -> String {
        format!("{}.{}", self.prefix, operation.as_str())
    }

    /// Event name, e.g. `widget.retrieved`.
    pub fn event_name(&self, operation: Operation) -> String {
        format!("{}.{}", self.prefix, operation.event_suffix())
    }

    /// All generated operation names, in declaration order.
    pub fn operation_names(&self) -> Vec<String> {
        ALL_OPERATIONS.iter().map(|op| self.operation_name(*op)).collect()
    }
}

/// Immutable kind-to-operation-set table, built once at startup.
#[derive(Debug, Clone, Default)]
pub struct OperationCatalog {
    entries: HashMap<String, OperationSet>,
}

impl OperationCatalog {
    /// Build the catalog from the resource kinds this deployment serves.
    pub fn new<I, S>(kinds: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let entries = kinds
            .into_iter()
            .map(|kind| {
                let kind = kind.into();
                (kind.clone(), OperationSet::new(kind))
            })
            .collect();
        Self { entries }
    }

    /// The operation set for `kind`, when the kind is registered.
    pub fn operations_for(&self, kind: &str) -> Option<&OperationSet> {
        self.entries.get(kind)
    }

    pub fn contains(&self, kind: &str) -> bool {
        self.entries.contains_key(kind)
    }

    /// The registered kinds, in no particular order.
    pub fn kinds(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_registers_kinds() {
        let catalog = OperationCatalog::new(["Widget", "Doc"]);

        assert!(catalog.contains("Widget"));
        assert!(catalog.contains("Doc"));
        assert!(!catalog.contains("Gadget"));
    }

    #[test]
    fn test_operation_names_are_lowercased_and_dotted() {
        let catalog = OperationCatalog::new(["Widget"]);
        let ops = catalog.operations_for("Widget").unwrap();

        assert_eq!(ops.operation_name(Operation::Create), "widget.create");
        assert_eq!(ops.operation_name(Operation::List), "widget.list");
        assert_eq!(ops.event_name(Operation::Create), "widget.created");
        assert_eq!(ops.event_name(Operation::Remove), "widget.removed");
    }

    #[test]
    fn test_every_kind_gets_the_full_operation_set() {
        let catalog = OperationCatalog::new(["Doc"]);
        let ops = catalog.operations_for("Doc").unwrap();

        assert_eq!(
            ops.operation_names(),
            vec!["doc.create", "doc.retrieve", "doc.update", "doc.remove", "doc.list"]
        );
    }

    #[test]
    fn test_unregistered_kind_has_no_operations() {
        let catalog = OperationCatalog::new(["Widget"]);

        assert!(catalog.operations_for("Gadget").is_none());
    }
}
