//! Resource lifecycle orchestration.
//!
//! [`ResourceLifecycleManager`] composes the authorization check with the two
//! backing stores for every create/retrieve/update/remove/list operation.
//!
//! # Check Order
//!
//! Retrieve, update and remove check authorization **before** existence, so
//! an unauthorized caller probing a nonexistent resource receives an
//! authorization error rather than a not-found error. The ordering hides
//! which identifiers exist and must be preserved.
//!
//! # Partial Failure
//!
//! The record store and the relationship graph fail independently and are
//! written without a transaction. A create that persists the record but
//! fails writing its edges surfaces the error and leaves the partial state;
//! nothing is rolled back.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::Utc;
use serde_json::{Map, Value};
use tokio::task::JoinSet;
use tracing::{debug, instrument};
use uuid::Uuid;

use arbor_store::{RelationshipGraph, ResourceStore, keys};
use arbor_types::{Node, Predicate, Resource, ResourceMeta, StoreError, WalkMethod};

use crate::authorizer::AccessAuthorizer;
use crate::context::AccessContext;
use crate::operations::{Operation, OperationCatalog, OperationSet};
use crate::walker::HierarchyWalker;
use crate::{AccessError, Result};

/// Outcome of a successful create: the stored resource plus the nodes its
/// bookkeeping edges point at.
#[derive(Debug, Clone)]
pub struct CreateOutcome {
    pub resource: Resource,
    /// The user node on the `is-authored` edge.
    pub author_node: Node,
    /// The parent node on the `is-member` edge; `None` when no relationship
    /// graph is configured and no edges were written.
    pub member_node: Option<Node>,
}

/// Orchestrates the resource lifecycle against the configured collaborators.
#[derive(Clone)]
pub struct ResourceLifecycleManager {
    context: AccessContext,
    catalog: OperationCatalog,
    authorizer: AccessAuthorizer,
}

impl ResourceLifecycleManager {
    pub fn new(context: AccessContext, catalog: OperationCatalog) -> Self {
        let walker = HierarchyWalker::new(context.relationship_graph().cloned());
        let authorizer = AccessAuthorizer::new(walker);
        Self { context, catalog, authorizer }
    }

    /// The authorizer gating this manager's operations.
    #[inline]
    pub fn authorizer(&self) -> &AccessAuthorizer {
        &self.authorizer
    }

    /// The operation catalog this manager serves.
    #[inline]
    pub fn catalog(&self) -> &OperationCatalog {
        &self.catalog
    }

    fn operations(&self, kind: &str) -> Result<&OperationSet> {
        self.catalog.operations_for(kind).ok_or_else(|| {
            AccessError::Validation(format!("resource kind `{kind}` is not registered"))
        })
    }

    /// Create a resource of `kind` on behalf of `origin_user_id`.
    ///
    /// The effective parent is the explicit `parent` pair when given;
    /// otherwise the node the origin user is currently a member of. With
    /// neither available the hierarchy placement cannot be resolved and the
    /// call fails with a configuration error before any write.
    ///
    /// Reserved keys are stripped from `attributes`; a caller-reserved `ID`
    /// value is honored as the record identity. When a relationship graph is
    /// configured, the `is-member` and `is-authored` edges are written
    /// concurrently after the record. Collaborator failures are rewrapped
    /// with the resource kind and the original cause attached.
    #[instrument(skip(self, attributes))]
    pub async fn create(
        &self,
        kind: &str,
        mut attributes: Map<String, Value>,
        origin_user_id: &str,
        parent: Option<(&str, &str)>,
    ) -> Result<CreateOutcome> {
        let ops = self.operations(kind)?;
        validate_kind(kind)?;
        validate_required("origin user id", origin_user_id)?;
        if let Some((parent_kind, parent_id)) = parent {
            validate_kind(parent_kind)?;
            validate_required("parent node id", parent_id)?;
        }

        let graph = self.context.relationship_graph();

        // Resolve the hierarchy placement before touching either store.
        let parent_node = match parent {
            Some((parent_kind, parent_id)) => Node::new(parent_kind, parent_id),
            None => match graph {
                Some(graph) => {
                    let memberships = graph
                        .objects_of(&Node::user(origin_user_id).identity(), Predicate::IsMember)
                        .await
                        .map_err(|source| external(kind, source))?;
                    memberships.into_iter().next().ok_or_else(|| {
                        AccessError::Configuration(format!(
                            "cannot place `{kind}` in the hierarchy: user `{origin_user_id}` \
                             has no membership"
                        ))
                    })?
                },
                None => {
                    return Err(AccessError::Configuration(format!(
                        "cannot place `{kind}` in the hierarchy: no parent given and no \
                         relationship graph configured"
                    )));
                },
            },
        };

        let reserved_id = Resource::strip_reserved(&mut attributes);
        let id = reserved_id.unwrap_or_else(|| Uuid::new_v4().to_string());

        let resource = Resource {
            id,
            kind: kind.to_string(),
            attributes,
            meta: ResourceMeta::new(origin_user_id),
        };

        let store = self.context.resource_store();
        let fields = resource.to_fields().map_err(|source| external(kind, source))?;
        store
            .write_hash_fields(&keys::resource::record(kind, &resource.id), fields)
            .await
            .map_err(|source| external(kind, source))?;
        store
            .add_to_set(&keys::resource::type_index(kind), &resource.id)
            .await
            .map_err(|source| external(kind, source))?;

        let author_node = Node::user(origin_user_id);
        let member_node = match graph {
            Some(graph) => {
                let subject = resource.node().identity();
                let parent_identity = parent_node.identity();
                let author_identity = author_node.identity();
                tokio::try_join!(
                    graph.create_edge(&subject, Predicate::IsMember, &parent_identity),
                    graph.create_edge(&subject, Predicate::IsAuthored, &author_identity),
                )
                .map_err(|source| external(kind, source))?;
                Some(parent_node)
            },
            None => None,
        };

        debug!(
            event = %ops.event_name(Operation::Create),
            id = %resource.id,
            member = ?member_node,
            "resource created"
        );

        Ok(CreateOutcome { resource, author_node, member_node })
    }

    /// Retrieve the resource `{kind}-{id}` on behalf of `origin_user_id`.
    #[instrument(skip(self))]
    pub async fn retrieve_by_id(
        &self,
        kind: &str,
        id: &str,
        origin_user_id: &str,
    ) -> Result<Resource> {
        let ops = self.operations(kind)?;
        validate_kind(kind)?;
        validate_required("resource id", id)?;
        validate_required("origin user id", origin_user_id)?;

        if !self.authorizer.can_retrieve(origin_user_id, kind, id).await? {
            return Err(unauthorized(Operation::Retrieve, kind, id));
        }

        let store = self.context.resource_store();
        let key = keys::resource::record(kind, id);
        if !store.exists(&key).await? {
            return Err(AccessError::NotFound(Node::new(kind, id).identity()));
        }

        let fields = store.read_hash(&key).await?;
        let resource = Resource::from_fields(kind, fields)?;

        debug!(event = %ops.event_name(Operation::Retrieve), id = id, "resource retrieved");

        Ok(resource)
    }

    /// Apply `patch` to the resource `{kind}-{id}`.
    ///
    /// Reserved keys are stripped from the patch; remaining keys merge over
    /// the stale attributes with the patch winning conflicts. Identity,
    /// creation time and authorship never change, and `updated_at` never
    /// moves backwards even when the clock does.
    #[instrument(skip(self, patch))]
    pub async fn update_by_id(
        &self,
        kind: &str,
        id: &str,
        mut patch: Map<String, Value>,
        origin_user_id: &str,
    ) -> Result<Resource> {
        let ops = self.operations(kind)?;
        validate_kind(kind)?;
        validate_required("resource id", id)?;
        validate_required("origin user id", origin_user_id)?;

        if !self.authorizer.can_update(origin_user_id, kind, id).await? {
            return Err(unauthorized(Operation::Update, kind, id));
        }

        let store = self.context.resource_store();
        let key = keys::resource::record(kind, id);
        if !store.exists(&key).await? {
            return Err(AccessError::NotFound(Node::new(kind, id).identity()));
        }

        let stale = Resource::from_fields(kind, store.read_hash(&key).await?)?;

        Resource::strip_reserved(&mut patch);
        let mut attributes = stale.attributes;
        for (field, value) in patch {
            attributes.insert(field, value);
        }

        let now = Utc::now();
        let updated_at = if now > stale.meta.updated_at { now } else { stale.meta.updated_at };

        let resource = Resource {
            id: stale.id,
            kind: stale.kind,
            attributes,
            meta: ResourceMeta {
                author_id: stale.meta.author_id,
                created_at: stale.meta.created_at,
                updated_at,
            },
        };

        store.write_hash_fields(&key, resource.to_fields()?).await?;

        debug!(event = %ops.event_name(Operation::Update), id = id, "resource updated");

        Ok(resource)
    }

    /// Remove the resource `{kind}-{id}`, cascading over its edges.
    ///
    /// Removal is gated on update permission. After the record is deleted,
    /// every edge touching the resource's node is removed (both directions,
    /// any predicate) when a relationship graph is configured.
    #[instrument(skip(self))]
    pub async fn remove_by_id(
        &self,
        kind: &str,
        id: &str,
        origin_user_id: &str,
    ) -> Result<String> {
        let ops = self.operations(kind)?;
        validate_kind(kind)?;
        validate_required("resource id", id)?;
        validate_required("origin user id", origin_user_id)?;

        if !self.authorizer.can_update(origin_user_id, kind, id).await? {
            return Err(unauthorized(Operation::Remove, kind, id));
        }

        let store = self.context.resource_store();
        let key = keys::resource::record(kind, id);
        if !store.exists(&key).await? {
            return Err(AccessError::NotFound(Node::new(kind, id).identity()));
        }

        store.delete(&key).await?;

        if let Some(graph) = self.context.relationship_graph() {
            graph.remove_all_edges_touching(&Node::new(kind, id).identity()).await?;
        }

        debug!(event = %ops.event_name(Operation::Remove), id = id, "resource removed");

        Ok(id.to_string())
    }

    /// List resources of `kind` visible from the caller's position in the
    /// hierarchy.
    ///
    /// The walk method selects the anchor nodes; member nodes of `kind` are
    /// collected under every anchor, unioned and deduplicated, then hydrated
    /// in parallel through [`retrieve_by_id`]. Hits the caller turns out not
    /// to be authorized for are silently dropped; any other failure aborts
    /// the listing. With no relationship graph configured there is no
    /// hierarchy to enumerate and the result is empty.
    ///
    /// [`retrieve_by_id`]: ResourceLifecycleManager::retrieve_by_id
    #[instrument(skip(self))]
    pub async fn retrieve_all_by_type(
        &self,
        kind: &str,
        origin_user_id: &str,
        walk_method: WalkMethod,
    ) -> Result<Vec<Resource>> {
        let ops = self.operations(kind)?;
        validate_kind(kind)?;
        validate_required("origin user id", origin_user_id)?;

        let Some(graph) = self.context.relationship_graph() else {
            return Ok(Vec::new());
        };

        let walker = self.authorizer.walker();
        let user_identity = Node::user(origin_user_id).identity();

        let anchors: Vec<Node> = match walk_method {
            WalkMethod::TopNodeDescent => {
                let ancestors = walker.walk_upward(&user_identity, None).await?;
                let mut anchors = ancestors.clone();
                if let Some(first) = ancestors.first() {
                    anchors.extend(walker.walk_downward(&first.identity(), None).await?);
                }
                anchors
            },
            WalkMethod::CurrentNodeDescent => match self.direct_parent(&user_identity).await? {
                Some(parent) => {
                    let mut anchors = walker.walk_downward(&parent.identity(), None).await?;
                    anchors.insert(0, parent);
                    anchors
                },
                None => Vec::new(),
            },
            WalkMethod::CurrentNode => {
                self.direct_parent(&user_identity).await?.into_iter().collect()
            },
        };

        // Union member nodes across anchors, deduplicating by identity.
        let mut queries = JoinSet::new();
        for anchor in anchors {
            let graph = Arc::clone(graph);
            let kind = kind.to_string();
            let user = origin_user_id.to_string();
            let anchor_identity = anchor.identity();
            queries.spawn(async move {
                graph
                    .members_of_type_under_anchor(
                        &kind,
                        &anchor_identity,
                        Predicate::IsMember,
                        &user,
                    )
                    .await
            });
        }

        let mut seen: HashSet<String> = HashSet::new();
        let mut members: Vec<Node> = Vec::new();
        while let Some(joined) = queries.join_next().await {
            let nodes = joined.map_err(join_error)??;
            for node in nodes {
                if seen.insert(node.identity()) {
                    members.push(node);
                }
            }
        }

        // Hydrate in parallel; denials drop the hit, anything else fails
        // the listing.
        let mut hydrations = JoinSet::new();
        for node in members {
            let manager = self.clone();
            let user = origin_user_id.to_string();
            hydrations.spawn(async move {
                match manager.retrieve_by_id(&node.kind, &node.id, &user).await {
                    Ok(resource) => Ok(Some(resource)),
                    Err(AccessError::Authorization(_)) => Ok(None),
                    Err(err) => Err(err),
                }
            });
        }

        let mut resources = Vec::new();
        while let Some(joined) = hydrations.join_next().await {
            if let Some(resource) = joined.map_err(join_error)?? {
                resources.push(resource);
            }
        }

        debug!(
            event = %ops.event_name(Operation::List),
            method = ?walk_method,
            count = resources.len(),
            "resources listed"
        );

        Ok(resources)
    }

    /// Subject nodes related to `{object_kind}-{object_id}` via `predicate`,
    /// filtered to the nodes the caller may retrieve.
    #[instrument(skip(self))]
    pub async fn retrieve_all_by_relationship(
        &self,
        object_kind: &str,
        object_id: &str,
        predicate: Predicate,
        origin_user_id: &str,
    ) -> Result<Vec<Node>> {
        validate_kind(object_kind)?;
        validate_required("object node id", object_id)?;
        validate_required("origin user id", origin_user_id)?;

        let Some(graph) = self.context.relationship_graph() else {
            return Ok(Vec::new());
        };

        let subjects = graph
            .subjects_of(&Node::new(object_kind, object_id).identity(), predicate)
            .await?;

        let mut checks = JoinSet::new();
        for node in subjects {
            let authorizer = self.authorizer.clone();
            let user = origin_user_id.to_string();
            checks.spawn(async move {
                let allowed = authorizer.can_retrieve(&user, &node.kind, &node.id).await?;
                Ok::<_, StoreError>(allowed.then_some(node))
            });
        }

        let mut visible = Vec::new();
        while let Some(joined) = checks.join_next().await {
            if let Some(node) = joined.map_err(join_error)?? {
                visible.push(node);
            }
        }

        Ok(visible)
    }

    /// The node the user is directly a member of, if any.
    async fn direct_parent(&self, user_identity: &str) -> Result<Option<Node>> {
        let Some(graph) = self.context.relationship_graph() else {
            return Ok(None);
        };
        let memberships = graph.objects_of(user_identity, Predicate::IsMember).await?;
        Ok(memberships.into_iter().next())
    }
}

fn validate_kind(kind: &str) -> Result<()> {
    if kind.is_empty() || !kind.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(AccessError::Validation(format!(
            "resource kind `{kind}` must be a non-empty alphanumeric identifier"
        )));
    }
    Ok(())
}

fn validate_required(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(AccessError::Validation(format!("{field} must be a non-empty string")));
    }
    Ok(())
}

fn unauthorized(operation: Operation, kind: &str, id: &str) -> AccessError {
    AccessError::Authorization(format!(
        "caller may not {} {}",
        operation.as_str(),
        Node::new(kind, id).identity()
    ))
}

fn external(kind: &str, source: StoreError) -> AccessError {
    AccessError::External { resource_kind: kind.to_string(), source }
}

fn join_error(err: tokio::task::JoinError) -> AccessError {
    AccessError::Store(StoreError::Internal(format!("task join error: {err}")))
}
