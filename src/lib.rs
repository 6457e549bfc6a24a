#![forbid(unsafe_code)]
#![deny(clippy::all)]
#![deny(deprecated)]

//!
//! Collab-Authz is the authorization decision engine of a document and
//! database collaboration backend.
//!
//! Given an actor and a resource it answers whether an action may proceed,
//! must be refused, or must be masked as "not found". Decisions combine
//! ownership, team membership, granted roles inherited down the resource
//! hierarchy, the rules for managing other principals' access, and the
//! visibility of soft-deleted resources.
//!
//! Persistence stays outside: the engine reads through [`store::AccessStore`].

// Identities, principals, actors and request verbs.
pub mod types;

// Action vocabulary and the verb alias table.
pub mod actions;

// Role Hierarchy and the static action-by-role table.
pub mod roles;

// Resources, access entries, invitations, nested objects and abilities.
pub mod resource;

// Module for error types.
pub mod error;

// Settings (trashbin retention, hierarchy depth).
pub mod config;

// Access Entry Store abstraction (and the in-memory store for tests).
pub mod store;

// Ability Resolver.
pub mod resolver;

// Trashbin Visibility Rule.
pub mod trashbin;

// Policy Checks and the two request-time entry points.
pub mod policy;

#[cfg(feature = "tracing-subscriber")]
pub mod telemetry;

pub use actions::{fine_action, Action};
pub use config::AuthzSettings;
pub use error::{AuthzError, ConfigError, StoreError};
pub use policy::{
    authorize, check_collection_permission, check_object_permission, PermissionPolicy, Request,
    Verdict,
};
pub use resolver::AbilityResolver;
pub use resource::{
    Abilities, AccessEntry, Invitation, NestedKind, NestedObject, Resource, ResourceKind,
};
pub use roles::{is_privileged, Role, PRIVILEGED_ROLES};
pub use trashbin::TrashbinRule;
pub use types::{AccessId, Actor, InvitationId, Method, Principal, ResourceId, TeamId, UserId};
