//!
//! Action vocabulary for the ability maps and the verb alias table.
//!
//! Some endpoints serve several verbs under a single action name (`children`
//! lists on GET and creates on POST). The abilities are expressed in terms of
//! the fine-grained actions, so the endpoint action is remapped exactly once,
//! at the fine-check boundary, through [`ACTION_FOR_METHOD`].

use crate::types::Method;
use std::fmt;
use std::str::FromStr;

/// A named operation an actor may attempt on a resource.
#[derive(
    Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    List,
    Retrieve,
    Create,
    Update,
    PartialUpdate,
    Destroy,
    Restore,
    Move,
    Favorite,
    ChildrenList,
    ChildrenCreate,
    VersionsList,
    VersionsRetrieve,
    VersionsDestroy,
    AccessesView,
    AccessesManage,
    InviteOwner,
    LinkConfiguration,
    AttachmentUpload,
    GenerateDocument,
    /// Endpoint action, resolved through [`fine_action`].
    Children,
    /// Endpoint action, resolved through [`fine_action`].
    VersionsDetail,
}

impl Action {
    pub const ALL: [Action; 22] = [
        Action::List,
        Action::Retrieve,
        Action::Create,
        Action::Update,
        Action::PartialUpdate,
        Action::Destroy,
        Action::Restore,
        Action::Move,
        Action::Favorite,
        Action::ChildrenList,
        Action::ChildrenCreate,
        Action::VersionsList,
        Action::VersionsRetrieve,
        Action::VersionsDestroy,
        Action::AccessesView,
        Action::AccessesManage,
        Action::InviteOwner,
        Action::LinkConfiguration,
        Action::AttachmentUpload,
        Action::GenerateDocument,
        Action::Children,
        Action::VersionsDetail,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Action::List => "list",
            Action::Retrieve => "retrieve",
            Action::Create => "create",
            Action::Update => "update",
            Action::PartialUpdate => "partial_update",
            Action::Destroy => "destroy",
            Action::Restore => "restore",
            Action::Move => "move",
            Action::Favorite => "favorite",
            Action::ChildrenList => "children_list",
            Action::ChildrenCreate => "children_create",
            Action::VersionsList => "versions_list",
            Action::VersionsRetrieve => "versions_retrieve",
            Action::VersionsDestroy => "versions_destroy",
            Action::AccessesView => "accesses_view",
            Action::AccessesManage => "accesses_manage",
            Action::InviteOwner => "invite_owner",
            Action::LinkConfiguration => "link_configuration",
            Action::AttachmentUpload => "attachment_upload",
            Action::GenerateDocument => "generate_document",
            Action::Children => "children",
            Action::VersionsDetail => "versions_detail",
        }
    }

    /// Actions that only observe state. These are the ones opened up on
    /// public resources and kept on soft-deleted ones.
    pub fn is_read_only(self) -> bool {
        matches!(
            self,
            Action::List
                | Action::Retrieve
                | Action::ChildrenList
                | Action::VersionsList
                | Action::VersionsRetrieve
                | Action::AccessesView
                | Action::GenerateDocument
        )
    }

    /// Endpoint-only actions never appear in an ability map.
    pub fn is_endpoint_alias(self) -> bool {
        matches!(self, Action::Children | Action::VersionsDetail)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when an action name is not part of the vocabulary.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown action: {0}")]
pub struct UnknownAction(pub String);

impl FromStr for Action {
    type Err = UnknownAction;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Action::ALL
            .iter()
            .copied()
            .find(|action| action.as_str() == s)
            .ok_or_else(|| UnknownAction(s.to_string()))
    }
}

/// `(endpoint action, verb) → fine-grained action`.
pub const ACTION_FOR_METHOD: &[(Action, Method, Action)] = &[
    (Action::VersionsDetail, Method::Delete, Action::VersionsDestroy),
    (Action::VersionsDetail, Method::Get, Action::VersionsRetrieve),
    (Action::Children, Method::Get, Action::ChildrenList),
    (Action::Children, Method::Post, Action::ChildrenCreate),
];

/// Maps an endpoint action and verb to the action looked up in the abilities.
/// Pairs missing from the table keep the endpoint action unchanged.
pub fn fine_action(action: Action, method: Method) -> Action {
    ACTION_FOR_METHOD
        .iter()
        .find(|(endpoint, verb, _)| *endpoint == action && *verb == method)
        .map(|(_, _, fine)| *fine)
        .unwrap_or(action)
}
