//! Managing who has access: access entries and invitations.

use super::{ability_verdict, PermissionPolicy, Protected, Request, Verdict};
use crate::actions::Action;
use crate::error::AuthzError;
use crate::resolver::AbilityResolver;
use crate::resource::{AccessEntry, Invitation};
use crate::roles::{self, Role};
use crate::store::AccessStore;
use crate::trashbin::TrashbinRule;
use tracing::debug;

/// Access entries of a resource.
///
/// Creating an entry needs a privileged role on the parent resource and a
/// requested role the actor is allowed to hand out. Changing an entry's
/// role is bounded by the entry's own `set_role_to`. A parent in the
/// trashbin answers like a missing one, and its entries are masked from
/// whoever could no longer see it.
#[derive(Debug)]
pub struct ResourceAccessPolicy<'s, S: AccessStore + ?Sized> {
    resolver: AbilityResolver<'s, S>,
    trashbin: TrashbinRule,
}

impl<'s, S: AccessStore + ?Sized> ResourceAccessPolicy<'s, S> {
    pub fn new(resolver: AbilityResolver<'s, S>, trashbin: TrashbinRule) -> Self {
        ResourceAccessPolicy { resolver, trashbin }
    }
}

impl<'s, S: AccessStore + ?Sized> PermissionPolicy for ResourceAccessPolicy<'s, S> {
    type Object = AccessEntry;

    fn name(&self) -> &'static str {
        "resource_access"
    }

    fn has_permission(&self, request: &Request<'_>) -> Result<Verdict, AuthzError> {
        if !request.actor.is_authenticated() {
            return Ok(Verdict::Deny);
        }
        if request.action != Action::Create {
            return Ok(Verdict::Allow);
        }

        let parent_id = request.require_parent("accesses")?;
        let Some(parent) = self.resolver.store().resource(parent_id)? else {
            return Ok(Verdict::Deny);
        };
        if parent.is_soft_deleted() {
            debug!(resource = %parent_id, "Accesses of a trashed resource cannot change");
            return Ok(Verdict::Deny);
        }
        let role = self.resolver.role(request.actor, &parent)?;
        let Some(role) = role.filter(|role| roles::is_privileged(*role)) else {
            debug!(
                resource = %parent_id,
                "You are not allowed to manage accesses for this resource."
            );
            return Ok(Verdict::Deny);
        };
        if let Some(requested) = request.requested_role {
            if !roles::assignable_roles(role).contains(&requested) {
                debug!(
                    resource = %parent_id,
                    role = %role,
                    requested = %requested,
                    "Requested role above the actor's reach"
                );
                return Ok(Verdict::Deny);
            }
        }
        Ok(Verdict::Allow)
    }

    fn has_object_permission(
        &self,
        request: &Request<'_>,
        entry: &AccessEntry,
    ) -> Result<Verdict, AuthzError> {
        let Some(parent) = self.resolver.store().resource(entry.resource)? else {
            return Ok(Verdict::MaskedNotFound);
        };
        if parent.is_soft_deleted() {
            let roles = self.resolver.roles(request.actor, &parent)?;
            if !self.trashbin.is_visible(&roles, &parent, request.now) {
                return Ok(Verdict::MaskedNotFound);
            }
        }
        let abilities = entry.load_abilities(&self.resolver, request.actor)?;
        if !abilities.get(Action::Retrieve) {
            return Ok(Verdict::MaskedNotFound);
        }
        if let Some(requested) = request.requested_role {
            if !abilities.can_set_role(requested) {
                return Ok(Verdict::Deny);
            }
        }
        Ok(ability_verdict(&abilities, request.action))
    }
}

/// Invitations of a resource.
///
/// Creating one needs an `Owner` or `Admin` entry held directly or through a
/// team on the parent resource, which must not be in the trashbin. Other
/// actions go through the invitation's abilities.
#[derive(Debug)]
pub struct InvitationPolicy<'s, S: AccessStore + ?Sized> {
    resolver: AbilityResolver<'s, S>,
}

impl<'s, S: AccessStore + ?Sized> InvitationPolicy<'s, S> {
    pub fn new(resolver: AbilityResolver<'s, S>) -> Self {
        InvitationPolicy { resolver }
    }
}

impl<'s, S: AccessStore + ?Sized> PermissionPolicy for InvitationPolicy<'s, S> {
    type Object = Invitation;

    fn name(&self) -> &'static str {
        "invitation"
    }

    fn has_permission(&self, request: &Request<'_>) -> Result<Verdict, AuthzError> {
        if !request.actor.is_authenticated() {
            return Ok(Verdict::Deny);
        }
        if request.action != Action::Create {
            return Ok(Verdict::Allow);
        }
        let parent_id = request.require_parent("invitations")?;
        match self.resolver.store().resource(parent_id)? {
            Some(parent) if !parent.is_soft_deleted() => {}
            _ => return Ok(Verdict::Deny),
        }
        let role = self.resolver.direct_role(request.actor, parent_id)?;
        let allowed = role.is_some_and(roles::is_privileged);
        if allowed {
            if let (Some(role), Some(requested)) = (role, request.requested_role) {
                if requested == Role::Owner && role != Role::Owner {
                    return Ok(Verdict::Deny);
                }
            }
        }
        Ok(Verdict::from_bool(allowed))
    }

    fn has_object_permission(
        &self,
        request: &Request<'_>,
        invitation: &Invitation,
    ) -> Result<Verdict, AuthzError> {
        let abilities = invitation.load_abilities(&self.resolver, request.actor)?;
        if let Some(requested) = request.requested_role {
            if abilities.get(Action::Retrieve) && !abilities.can_set_role(requested) {
                return Ok(Verdict::Deny);
            }
        }
        Ok(ability_verdict(&abilities, request.action))
    }
}
