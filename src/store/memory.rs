//! In-memory [`AccessStore`] used by tests, benches and fuzz targets.
//!
//! Besides the read side it implements the lifecycle the engine relies on:
//! creators receive `Owner`, grants are upserts (one role per resource and
//! principal), and soft deletion stamps `ancestors_deleted_at` on the whole
//! subtree.

use super::AccessStore;
use crate::error::StoreError;
use crate::resource::{AccessEntry, Resource, ResourceKind};
use crate::roles::Role;
use crate::types::{Principal, ResourceId, UserId};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

#[derive(Debug, Default)]
pub struct MemoryStore {
    resources: HashMap<ResourceId, Resource>,
    entries: HashMap<(ResourceId, Principal), AccessEntry>,
    unavailable: AtomicBool,
    queries: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a resource owned by `creator`, who receives an `Owner` entry.
    /// A child of a trashed resource starts out trashed as well.
    pub fn create_resource(
        &mut self,
        kind: ResourceKind,
        creator: UserId,
        parent: Option<ResourceId>,
    ) -> Result<Resource, StoreError> {
        let mut resource = Resource::new(kind, Some(creator));
        if let Some(parent_id) = parent {
            let parent = self.resources.get(&parent_id).ok_or_else(|| {
                StoreError::Inconsistent(format!("parent resource {} does not exist", parent_id))
            })?;
            resource.parent = Some(parent_id);
            resource.ancestors_deleted_at = parent.ancestors_deleted_at;
        }
        self.resources.insert(resource.id, resource.clone());
        self.grant(resource.id, Principal::User(creator), Role::Owner);
        Ok(resource)
    }

    /// Stores `resource` as is, without creating any access entry.
    pub fn insert_resource(&mut self, resource: Resource) {
        self.resources.insert(resource.id, resource);
    }

    /// Grants `role`, replacing any role `principal` already held on `resource`.
    pub fn grant(&mut self, resource: ResourceId, principal: Principal, role: Role) -> AccessEntry {
        let entry = self
            .entries
            .entry((resource, principal.clone()))
            .and_modify(|existing| existing.role = role)
            .or_insert_with(|| AccessEntry::new(resource, principal, role));
        entry.clone()
    }

    pub fn revoke(&mut self, resource: ResourceId, principal: &Principal) -> Option<AccessEntry> {
        self.entries.remove(&(resource, principal.clone()))
    }

    /// All entries on `resource`, whoever holds them.
    pub fn accesses(&self, resource: ResourceId) -> Vec<AccessEntry> {
        self.entries.values().filter(|entry| entry.resource == resource).cloned().collect()
    }

    /// Moves `id` and its subtree to the trashbin at instant `at`.
    pub fn soft_delete(&mut self, id: ResourceId, at: DateTime<Utc>) -> Result<(), StoreError> {
        let resource = self
            .resources
            .get_mut(&id)
            .ok_or_else(|| StoreError::Inconsistent(format!("resource {} does not exist", id)))?;
        resource.deleted_at = Some(at);
        for node in self.subtree(id) {
            if let Some(resource) = self.resources.get_mut(&node) {
                resource.ancestors_deleted_at = Some(match resource.ancestors_deleted_at {
                    Some(earlier) if earlier < at => earlier,
                    _ => at,
                });
            }
        }
        Ok(())
    }

    /// Takes `id` out of the trashbin, recomputing the deletion marks of its subtree.
    pub fn restore(&mut self, id: ResourceId) -> Result<(), StoreError> {
        let resource = self
            .resources
            .get_mut(&id)
            .ok_or_else(|| StoreError::Inconsistent(format!("resource {} does not exist", id)))?;
        resource.deleted_at = None;
        // subtree() is breadth first, so parents are settled before children.
        for node in self.subtree(id) {
            let inherited = self
                .resources
                .get(&node)
                .and_then(|r| r.parent)
                .and_then(|parent| self.resources.get(&parent))
                .and_then(|parent| parent.ancestors_deleted_at);
            if let Some(resource) = self.resources.get_mut(&node) {
                resource.ancestors_deleted_at = match (resource.deleted_at, inherited) {
                    (Some(own), Some(up)) => Some(own.min(up)),
                    (own, up) => own.or(up),
                };
            }
        }
        Ok(())
    }

    /// Makes every following query fail with `StoreError::Unavailable`.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Number of read queries served so far.
    pub fn query_count(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }

    fn subtree(&self, root: ResourceId) -> Vec<ResourceId> {
        let mut nodes = vec![root];
        let mut cursor = 0;
        while cursor < nodes.len() {
            let current = nodes[cursor];
            let mut children: Vec<ResourceId> = self
                .resources
                .values()
                .filter(|r| r.parent == Some(current) && !nodes.contains(&r.id))
                .map(|r| r.id)
                .collect();
            children.sort();
            nodes.extend(children);
            cursor += 1;
        }
        nodes
    }

    fn begin_query(&self) -> Result<(), StoreError> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("memory store switched off".into()));
        }
        Ok(())
    }
}

impl AccessStore for MemoryStore {
    fn resource(&self, id: ResourceId) -> Result<Option<Resource>, StoreError> {
        self.begin_query()?;
        Ok(self.resources.get(&id).cloned())
    }

    fn entries_for(
        &self,
        resource: ResourceId,
        principals: &[Principal],
    ) -> Result<Vec<AccessEntry>, StoreError> {
        self.begin_query()?;
        Ok(principals
            .iter()
            .filter_map(|principal| self.entries.get(&(resource, principal.clone())))
            .cloned()
            .collect())
    }

    fn owner_count(&self, resource: ResourceId) -> Result<usize, StoreError> {
        self.begin_query()?;
        Ok(self
            .entries
            .values()
            .filter(|entry| entry.resource == resource && entry.role == Role::Owner)
            .count())
    }
}
