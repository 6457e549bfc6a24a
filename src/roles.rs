//!
//! Role Hierarchy for the authorization engine.
//! Defines the fixed privilege ordering of roles, which of them may manage
//! other principals' access, and the static action-by-role table.

use crate::actions::Action;
use std::fmt;
use std::str::FromStr;

/// A role granted to a principal on a resource.
///
/// Variants are declared from least to most privileged so that the derived
/// `Ord` is the privilege order. `Owner` is always maximal.
#[derive(
    Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Reader,
    Editor,
    Admin,
    Owner,
}

impl Role {
    /// Every role, least privileged first.
    pub const ALL: [Role; 4] = [Role::Reader, Role::Editor, Role::Admin, Role::Owner];

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Reader => "reader",
            Role::Editor => "editor",
            Role::Admin => "admin",
            Role::Owner => "owner",
        }
    }

    /// Highest-privilege role among `roles`, independent of iteration order.
    pub fn max_of<I: IntoIterator<Item = Role>>(roles: I) -> Option<Role> {
        roles.into_iter().max()
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a role name is not part of the hierarchy.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown role: {0}")]
pub struct UnknownRole(pub String);

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .iter()
            .copied()
            .find(|role| role.as_str() == s)
            .ok_or_else(|| UnknownRole(s.to_string()))
    }
}

/// Roles allowed to grant, revoke and change other principals' access.
pub const PRIVILEGED_ROLES: [Role; 2] = [Role::Admin, Role::Owner];

#[inline]
pub fn is_privileged(role: Role) -> bool {
    PRIVILEGED_ROLES.contains(&role)
}

/// Static action-by-role table.
///
/// Each level repeats the level below it, so a role's set is always a
/// superset of every less privileged role's set.
pub mod table {
    use crate::actions::Action::{self, *};

    pub const READER: &[Action] = &[
        List,
        Retrieve,
        Favorite,
        ChildrenList,
        VersionsList,
        VersionsRetrieve,
        AccessesView,
        GenerateDocument,
    ];

    pub const EDITOR: &[Action] = &[
        List,
        Retrieve,
        Favorite,
        ChildrenList,
        VersionsList,
        VersionsRetrieve,
        AccessesView,
        GenerateDocument,
        // editor
        Update,
        PartialUpdate,
        ChildrenCreate,
        AttachmentUpload,
    ];

    pub const ADMIN: &[Action] = &[
        List,
        Retrieve,
        Favorite,
        ChildrenList,
        VersionsList,
        VersionsRetrieve,
        AccessesView,
        GenerateDocument,
        Update,
        PartialUpdate,
        ChildrenCreate,
        AttachmentUpload,
        // admin
        AccessesManage,
        LinkConfiguration,
        Move,
    ];

    pub const OWNER: &[Action] = &[
        List,
        Retrieve,
        Favorite,
        ChildrenList,
        VersionsList,
        VersionsRetrieve,
        AccessesView,
        GenerateDocument,
        Update,
        PartialUpdate,
        ChildrenCreate,
        AttachmentUpload,
        AccessesManage,
        LinkConfiguration,
        Move,
        // owner
        Destroy,
        Restore,
        VersionsDestroy,
        InviteOwner,
    ];
}

/// Actions permitted to a holder of `role`.
pub fn action_set(role: Role) -> &'static [Action] {
    match role {
        Role::Reader => table::READER,
        Role::Editor => table::EDITOR,
        Role::Admin => table::ADMIN,
        Role::Owner => table::OWNER,
    }
}

/// Roles a holder of `role` may assign to other principals.
///
/// Owners may hand out any role, including `Owner`. Admins may hand out
/// anything up to their own level. Everyone else manages nothing.
pub fn assignable_roles(role: Role) -> Vec<Role> {
    match role {
        Role::Owner => Role::ALL.to_vec(),
        Role::Admin => vec![Role::Reader, Role::Editor, Role::Admin],
        Role::Editor | Role::Reader => Vec::new(),
    }
}
