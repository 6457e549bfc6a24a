//! Policy Checks: the request-time gate.
//!
//! A request goes through two phases. The coarse check
//! ([`PermissionPolicy::has_permission`]) runs before anything is loaded and
//! only sees the actor, the action and the route parameters. The fine check
//! ([`PermissionPolicy::has_object_permission`]) runs once the target object
//! is in hand and combines the trashbin rule with the object's abilities.
//!
//! ```text
//! ANONYMOUS → AUTHENTICATED → coarse → OBJECT-LOADED → fine
//!     → { Allow, Deny, MaskedNotFound }
//! ```
//!
//! Every ability-based policy masks objects whose `retrieve` ability is
//! denied: the caller cannot tell them apart from objects that don't exist.
//! When `retrieve` is granted but the requested action is not, the verdict
//! is a plain `Deny`.

use crate::actions::Action;
use crate::error::AuthzError;
use crate::resolver::AbilityResolver;
use crate::resource::{Abilities, AccessEntry, Invitation, Resource};
use crate::roles::Role;
use crate::store::AccessStore;
use crate::trashbin::TrashbinRule;
use crate::types::{Actor, Method, ResourceId, UserId};
use chrono::{DateTime, Utc};
use tracing::{debug, warn};

pub mod access;
pub mod basic;
pub mod nested;
pub mod resource;

pub use access::{InvitationPolicy, ResourceAccessPolicy};
pub use basic::{IsAuthenticated, IsAuthenticatedOrSafe, IsOwnedOrPublic, IsSelf, OwnedObject};
pub use nested::DatabaseNestedPolicy;
pub use resource::{DatabasePolicy, DocumentPolicy, ResourceWithAccessPolicy, TemplatePolicy};

#[cfg(test)]
mod tests;

// --- Verdicts ---------------------------------------------------------------

/// Outcome of a check. There is no "unknown" outcome.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Verdict {
    Allow,
    /// Respond forbidden.
    Deny,
    /// Respond not found, the object must look absent.
    MaskedNotFound,
}

impl Verdict {
    pub fn from_bool(allowed: bool) -> Self {
        if allowed {
            Verdict::Allow
        } else {
            Verdict::Deny
        }
    }

    pub fn is_allowed(self) -> bool {
        self == Verdict::Allow
    }

    /// Converts into a `Result` so request handlers can use `?`.
    pub fn into_result(self) -> Result<(), AuthzError> {
        match self {
            Verdict::Allow => Ok(()),
            Verdict::Deny => Err(AuthzError::PermissionDenied(
                "You do not have permission to perform this action.".into(),
            )),
            Verdict::MaskedNotFound => Err(AuthzError::NotFound),
        }
    }
}

/// Verdict for `action` given an abilities map, masking objects the actor
/// may not even retrieve.
pub fn ability_verdict(abilities: &Abilities, action: Action) -> Verdict {
    if abilities.get(action) {
        Verdict::Allow
    } else if !abilities.get(Action::Retrieve) {
        Verdict::MaskedNotFound
    } else {
        Verdict::Deny
    }
}

/// Abilities of `actor` on a resource still visible to them, or `None` when
/// the trashbin rule hides it: past the cutoff for everyone, inside the
/// window for anyone without `Owner` on the resource or an ancestor.
pub fn visible_abilities<S: AccessStore + ?Sized>(
    resolver: &AbilityResolver<'_, S>,
    trashbin: &TrashbinRule,
    actor: &Actor,
    resource: &Resource,
    now: DateTime<Utc>,
) -> Result<Option<Abilities>, AuthzError> {
    if trashbin.is_hard_hidden(resource, now) {
        debug!(resource = %resource.id, "Resource is past the trashbin cutoff");
        return Ok(None);
    }
    let roles = resolver.roles(actor, resource)?;
    if !trashbin.is_visible(&roles, resource, now) {
        debug!(resource = %resource.id, "Trashed resource hidden from non-owner");
        return Ok(None);
    }
    Ok(Some(resolver.abilities_for_roles(actor, resource, &roles)))
}

// --- Requests ---------------------------------------------------------------

/// What the request layer knows about an incoming request.
#[derive(Debug, Clone)]
pub struct Request<'a> {
    pub actor: &'a Actor,
    /// Endpoint action, before the verb remapping.
    pub action: Action,
    pub method: Method,
    /// Parent resource named in the route (document of an access, database of a row).
    pub parent_id: Option<ResourceId>,
    /// Role the request body asks to grant, if any.
    pub requested_role: Option<Role>,
    pub now: DateTime<Utc>,
}

impl<'a> Request<'a> {
    pub fn new(actor: &'a Actor, action: Action, method: Method) -> Self {
        Request { actor, action, method, parent_id: None, requested_role: None, now: Utc::now() }
    }

    pub fn with_parent(mut self, parent_id: ResourceId) -> Self {
        self.parent_id = Some(parent_id);
        self
    }

    pub fn with_role(mut self, role: Role) -> Self {
        self.requested_role = Some(role);
        self
    }

    pub fn at(mut self, now: DateTime<Utc>) -> Self {
        self.now = now;
        self
    }

    /// Parent id for actions that cannot be checked without one.
    pub fn require_parent(&self, what: &str) -> Result<ResourceId, AuthzError> {
        self.parent_id.ok_or_else(|| {
            AuthzError::Configuration(format!(
                "You must set a resource ID in the route to manage {}.",
                what
            ))
        })
    }
}

// --- Protected objects ------------------------------------------------------

/// Capability set shared by every kind of object guarded by abilities.
pub trait Protected {
    fn load_abilities<S: AccessStore + ?Sized>(
        &self,
        resolver: &AbilityResolver<'_, S>,
        actor: &Actor,
    ) -> Result<Abilities, AuthzError>;

    /// The hierarchy node whose trash state governs the object's visibility.
    fn trashbin_subject(&self) -> Option<&Resource> {
        None
    }

    /// User the object belongs to, if any.
    fn owner(&self) -> Option<UserId> {
        None
    }
}

impl Protected for Resource {
    fn load_abilities<S: AccessStore + ?Sized>(
        &self,
        resolver: &AbilityResolver<'_, S>,
        actor: &Actor,
    ) -> Result<Abilities, AuthzError> {
        resolver.resolve(actor, self)
    }

    fn trashbin_subject(&self) -> Option<&Resource> {
        Some(self)
    }

    fn owner(&self) -> Option<UserId> {
        self.owner
    }
}

impl Protected for AccessEntry {
    fn load_abilities<S: AccessStore + ?Sized>(
        &self,
        resolver: &AbilityResolver<'_, S>,
        actor: &Actor,
    ) -> Result<Abilities, AuthzError> {
        resolver.resolve_access(actor, self)
    }
}

impl Protected for Invitation {
    fn load_abilities<S: AccessStore + ?Sized>(
        &self,
        resolver: &AbilityResolver<'_, S>,
        actor: &Actor,
    ) -> Result<Abilities, AuthzError> {
        resolver.resolve_invitation(actor, self)
    }

    fn owner(&self) -> Option<UserId> {
        self.issuer
    }
}

// --- Policies ---------------------------------------------------------------

/// An authorization policy attached to an endpoint.
///
/// Both checks default to `Allow` so a policy only overrides the phase it
/// cares about.
pub trait PermissionPolicy {
    type Object: ?Sized;

    fn name(&self) -> &'static str;

    fn has_permission(&self, _request: &Request<'_>) -> Result<Verdict, AuthzError> {
        Ok(Verdict::Allow)
    }

    fn has_object_permission(
        &self,
        _request: &Request<'_>,
        _object: &Self::Object,
    ) -> Result<Verdict, AuthzError> {
        Ok(Verdict::Allow)
    }
}

// --- Entry points -----------------------------------------------------------

/// Coarse check, before any object is fetched.
pub fn check_collection_permission<P: PermissionPolicy>(
    policy: &P,
    request: &Request<'_>,
) -> Result<Verdict, AuthzError> {
    let verdict = policy
        .has_permission(request)
        .map_err(|err| log_failure(policy.name(), request, err))?;
    debug!(
        policy = policy.name(),
        action = %request.action,
        actor = ?request.actor.user_id(),
        verdict = ?verdict,
        "Collection permission checked"
    );
    Ok(verdict)
}

/// Fine check, once the target object is loaded.
pub fn check_object_permission<P: PermissionPolicy>(
    policy: &P,
    request: &Request<'_>,
    object: &P::Object,
) -> Result<Verdict, AuthzError> {
    let verdict = policy
        .has_object_permission(request, object)
        .map_err(|err| log_failure(policy.name(), request, err))?;
    debug!(
        policy = policy.name(),
        action = %request.action,
        actor = ?request.actor.user_id(),
        verdict = ?verdict,
        "Object permission checked"
    );
    Ok(verdict)
}

/// Runs the full pipeline: coarse check, object load, fine check.
///
/// `load` is only invoked when the coarse check allows the request. A
/// loader that finds nothing yields `MaskedNotFound`, indistinguishable from
/// a masked object.
pub fn authorize<P, F>(policy: &P, request: &Request<'_>, load: F) -> Result<Verdict, AuthzError>
where
    P: PermissionPolicy,
    P::Object: Sized,
    F: FnOnce() -> Result<Option<P::Object>, AuthzError>,
{
    let coarse = check_collection_permission(policy, request)?;
    if !coarse.is_allowed() {
        return Ok(coarse);
    }
    match load()? {
        Some(object) => check_object_permission(policy, request, &object),
        None => Ok(Verdict::MaskedNotFound),
    }
}

fn log_failure(policy: &str, request: &Request<'_>, err: AuthzError) -> AuthzError {
    match &err {
        AuthzError::Configuration(msg) => {
            warn!(
                policy = policy,
                action = %request.action,
                "Misconfigured permission check: {}", msg
            )
        }
        AuthzError::Store(store_err) => {
            warn!(
                policy = policy,
                action = %request.action,
                "Access store failed during check: {}", store_err
            )
        }
        _ => {}
    }
    err
}
