//!
//! Data model of the access-controlled world: resources, access entries,
//! invitations, nested database objects, and the derived abilities map.

use crate::actions::Action;
use crate::roles::Role;
use crate::types::{AccessId, InvitationId, Principal, ResourceId, UserId};
use chrono::{DateTime, Utc};
use serde::ser::SerializeMap;
use std::collections::BTreeMap;

// --- Resources --------------------------------------------------------------

/// Kind of a top-level access-controlled resource.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Document,
    Template,
    Database,
}

impl ResourceKind {
    /// Whether `action` means anything for this kind of resource. Actions
    /// that don't apply are reported as denied in the abilities map.
    pub fn applicable(self, action: Action) -> bool {
        if action.is_endpoint_alias() || action == Action::Create {
            return false;
        }
        match self {
            ResourceKind::Document => action != Action::GenerateDocument,
            ResourceKind::Template => matches!(
                action,
                Action::List
                    | Action::Retrieve
                    | Action::Update
                    | Action::PartialUpdate
                    | Action::Destroy
                    | Action::AccessesView
                    | Action::AccessesManage
                    | Action::GenerateDocument
            ),
            ResourceKind::Database => matches!(
                action,
                Action::List
                    | Action::Retrieve
                    | Action::Update
                    | Action::PartialUpdate
                    | Action::Destroy
                    | Action::Favorite
                    | Action::AccessesView
                    | Action::AccessesManage
            ),
        }
    }
}

/// An access-controlled entity.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Resource {
    pub id: ResourceId,
    pub kind: ResourceKind,
    pub owner: Option<UserId>,                       // None makes the resource public-readable
    pub parent: Option<ResourceId>,                  // Hierarchy link, documents only in practice
    pub deleted_at: Option<DateTime<Utc>>,           // Soft deletion of this very resource
    pub ancestors_deleted_at: Option<DateTime<Utc>>, // Earliest deletion among self and ancestors
}

impl Resource {
    pub fn new(kind: ResourceKind, owner: Option<UserId>) -> Self {
        Resource {
            id: ResourceId::new(),
            kind,
            owner,
            parent: None,
            deleted_at: None,
            ancestors_deleted_at: None,
        }
    }

    pub fn with_parent(mut self, parent: ResourceId) -> Self {
        self.parent = Some(parent);
        self
    }

    /// True when this resource or one of its ancestors sits in the trashbin.
    pub fn is_soft_deleted(&self) -> bool {
        self.ancestors_deleted_at.is_some()
    }

    /// True when this resource is the one that was deleted, as opposed to
    /// being hidden by the deletion of an ancestor.
    pub fn is_deletion_root(&self) -> bool {
        self.deleted_at.is_some() && self.deleted_at == self.ancestors_deleted_at
    }
}

// --- Access entries & invitations -------------------------------------------

/// A stored grant of `role` to `principal` on `resource`.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct AccessEntry {
    pub id: AccessId,
    pub resource: ResourceId,
    pub principal: Principal,
    pub role: Role,
}

impl AccessEntry {
    pub fn new(resource: ResourceId, principal: Principal, role: Role) -> Self {
        AccessEntry { id: AccessId::new(), resource, principal, role }
    }
}

/// A grant waiting for its recipient to sign up.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Invitation {
    pub id: InvitationId,
    pub resource: ResourceId,
    pub email: String,
    pub role: Role,
    pub issuer: Option<UserId>,
}

impl Invitation {
    pub fn new(
        resource: ResourceId,
        email: impl Into<String>,
        role: Role,
        issuer: Option<UserId>,
    ) -> Self {
        Invitation { id: InvitationId::new(), resource, email: email.into(), role, issuer }
    }
}

// --- Nested database objects ------------------------------------------------

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NestedKind {
    Row,
    Property,
    View,
}

/// A row, property or view living inside a database. It has no access list
/// of its own; every check is made against the parent database.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct NestedObject {
    pub id: uuid::Uuid,
    pub kind: NestedKind,
    pub database: Option<ResourceId>,
}

impl NestedObject {
    pub fn new(kind: NestedKind, database: ResourceId) -> Self {
        NestedObject { id: uuid::Uuid::new_v4(), kind, database: Some(database) }
    }
}

// --- Abilities --------------------------------------------------------------

/// Derived map of what an actor may do on one object.
///
/// Computed per request from live access entries and never cached.
/// Absent actions are denied.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Abilities {
    actions: BTreeMap<Action, bool>,
    /// Roles the actor may assign to others on this object.
    pub set_role_to: Vec<Role>,
}

impl Abilities {
    /// An abilities map denying every action in `actions`.
    pub fn deny_all<I: IntoIterator<Item = Action>>(actions: I) -> Self {
        Abilities {
            actions: actions.into_iter().map(|action| (action, false)).collect(),
            set_role_to: Vec::new(),
        }
    }

    pub fn get(&self, action: Action) -> bool {
        self.actions.get(&action).copied().unwrap_or(false)
    }

    pub fn set(&mut self, action: Action, allowed: bool) {
        self.actions.insert(action, allowed);
    }

    /// Actions granted by this map, in declaration order.
    pub fn granted(&self) -> impl Iterator<Item = Action> + '_ {
        self.actions.iter().filter(|(_, allowed)| **allowed).map(|(action, _)| *action)
    }

    pub fn can_set_role(&self, role: Role) -> bool {
        self.set_role_to.contains(&role)
    }

    /// Flat JSON object as returned to API clients.
    pub fn to_json(&self) -> serde_json::Value {
        // Serializing a map of plain enums and bools cannot fail.
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

impl serde::Serialize for Abilities {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.actions.len() + 1))?;
        for (action, allowed) in &self.actions {
            map.serialize_entry(action.as_str(), allowed)?;
        }
        map.serialize_entry("set_role_to", &self.set_role_to)?;
        map.end()
    }
}
