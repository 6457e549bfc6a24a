//!
//! Ability Resolver.
//!
//! Computes, for one actor and one object, the full map of action → allowed.
//! The result is a pure function of the actor, the object and the access
//! entries visible in the store at the time of the call. Nothing is cached:
//! every request resolves again against live entries.

use crate::actions::Action;
use crate::config::AuthzSettings;
use crate::error::AuthzError;
use crate::resource::{Abilities, AccessEntry, Invitation, Resource};
use crate::roles::{self, Role};
use crate::store::AccessStore;
use crate::types::{Actor, ResourceId};
use tracing::{debug, trace};

/// Resolves abilities by reading the access entry store.
#[derive(Debug)]
pub struct AbilityResolver<'s, S: AccessStore + ?Sized> {
    store: &'s S,
    max_ancestor_depth: usize,
}

impl<'s, S: AccessStore + ?Sized> Clone for AbilityResolver<'s, S> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'s, S: AccessStore + ?Sized> Copy for AbilityResolver<'s, S> {}

impl<'s, S: AccessStore + ?Sized> AbilityResolver<'s, S> {
    pub fn new(store: &'s S, settings: &AuthzSettings) -> Self {
        AbilityResolver { store, max_ancestor_depth: settings.max_ancestor_depth }
    }

    pub fn store(&self) -> &'s S {
        self.store
    }

    /// The resource followed by its ancestors, nearest first.
    ///
    /// The walk stops at a dangling parent link, at a cycle, or after
    /// `max_ancestor_depth` hops.
    pub fn lineage(&self, resource: &Resource) -> Result<Vec<Resource>, AuthzError> {
        let mut chain = vec![resource.clone()];
        let mut next = resource.parent;
        while let Some(parent_id) = next {
            if chain.len() > self.max_ancestor_depth {
                debug!(
                    "Ancestor walk for {} truncated at depth {}",
                    resource.id, self.max_ancestor_depth
                );
                break;
            }
            if chain.iter().any(|r| r.id == parent_id) {
                debug!("Cycle in hierarchy of {} at {}", resource.id, parent_id);
                break;
            }
            let Some(parent) = self.store.resource(parent_id)? else {
                break;
            };
            next = parent.parent;
            chain.push(parent);
        }
        Ok(chain)
    }

    /// Every role the actor holds on the resource or one of its ancestors,
    /// through a direct entry, a team entry, or the `owner` link.
    pub fn roles(&self, actor: &Actor, resource: &Resource) -> Result<Vec<Role>, AuthzError> {
        let principals = actor.principals();
        if principals.is_empty() {
            return Ok(Vec::new());
        }
        let mut roles = Vec::new();
        for node in self.lineage(resource)? {
            if node.owner.as_ref().is_some_and(|owner| actor.is(owner)) {
                roles.push(Role::Owner);
            }
            roles.extend(self.store.entries_for(node.id, &principals)?.into_iter().map(|e| e.role));
        }
        trace!(resource = %resource.id, roles = ?roles, "Collected roles");
        Ok(roles)
    }

    /// Highest role the actor holds on the resource or its ancestors.
    pub fn role(&self, actor: &Actor, resource: &Resource) -> Result<Option<Role>, AuthzError> {
        Ok(Role::max_of(self.roles(actor, resource)?))
    }

    /// Highest role granted by entries on exactly `resource`, ignoring
    /// ancestors and the `owner` link.
    pub fn direct_role(
        &self,
        actor: &Actor,
        resource: ResourceId,
    ) -> Result<Option<Role>, AuthzError> {
        let principals = actor.principals();
        if principals.is_empty() {
            return Ok(None);
        }
        let entries = self.store.entries_for(resource, &principals)?;
        Ok(Role::max_of(entries.into_iter().map(|e| e.role)))
    }

    /// Abilities of `actor` on a document, template or database.
    pub fn resolve(&self, actor: &Actor, resource: &Resource) -> Result<Abilities, AuthzError> {
        let roles = self.roles(actor, resource)?;
        Ok(self.abilities_for_roles(actor, resource, &roles))
    }

    /// Builds the abilities map from roles already collected for `resource`.
    pub fn abilities_for_roles(
        &self,
        actor: &Actor,
        resource: &Resource,
        held: &[Role],
    ) -> Abilities {
        let kind = resource.kind;
        let mut abilities =
            Abilities::deny_all(Action::ALL.iter().copied().filter(|a| kind.applicable(*a)));
        let role = Role::max_of(held.iter().copied());

        match role {
            Some(role) => {
                for action in roles::action_set(role) {
                    if kind.applicable(*action) {
                        abilities.set(*action, true);
                    }
                }
                abilities.set_role_to = roles::assignable_roles(role);
            }
            None if resource.owner.is_none() && actor.is_authenticated() => {
                let readable = Action::ALL
                    .iter()
                    .filter(|a| a.is_read_only() && kind.applicable(**a));
                for action in readable {
                    abilities.set(*action, true);
                }
            }
            None => {}
        }

        if resource.is_soft_deleted() {
            // Trashed resources can be looked at and, from the deletion root, restored.
            let can_retrieve = abilities.get(Action::Retrieve);
            let can_restore = role == Some(Role::Owner) && resource.is_deletion_root();
            for action in Action::ALL.iter().filter(|a| kind.applicable(**a)) {
                abilities.set(*action, false);
            }
            abilities.set(Action::Retrieve, can_retrieve);
            if kind.applicable(Action::Restore) {
                abilities.set(Action::Restore, can_restore);
            }
            abilities.set_role_to.clear();
        }

        debug!(
            resource = %resource.id,
            actor = ?actor.user_id(),
            role = ?role,
            "Resolved abilities"
        );
        abilities
    }

    /// Abilities of `actor` on an access entry.
    ///
    /// Privileged actors manage entries of their resource. An `Owner` entry
    /// can only be touched by another owner, and never when it is the last
    /// one. `set_role_to` is what the actor could change the entry into.
    /// Nothing can be changed on a soft-deleted resource.
    pub fn resolve_access(
        &self,
        actor: &Actor,
        entry: &AccessEntry,
    ) -> Result<Abilities, AuthzError> {
        let mut abilities = Abilities::deny_all([
            Action::Retrieve,
            Action::Update,
            Action::PartialUpdate,
            Action::Destroy,
        ]);
        let Some(resource) = self.store.resource(entry.resource)? else {
            return Ok(abilities);
        };
        let Some(role) = self.role(actor, &resource)? else {
            return Ok(abilities);
        };

        // Access management is frozen while the resource sits in the trashbin.
        let can_manage = if resource.is_soft_deleted() {
            false
        } else if entry.role == Role::Owner {
            role == Role::Owner && self.store.owner_count(entry.resource)? > 1
        } else {
            roles::is_privileged(role)
        };

        abilities.set(Action::Retrieve, true);
        abilities.set(Action::Update, can_manage);
        abilities.set(Action::PartialUpdate, can_manage);
        abilities.set(Action::Destroy, can_manage);
        if can_manage {
            abilities.set_role_to = roles::assignable_roles(role)
                .into_iter()
                .filter(|candidate| *candidate != entry.role)
                .collect();
        }
        Ok(abilities)
    }

    /// Abilities of `actor` on a pending invitation: privileged actors on
    /// the invited resource manage it, nobody else sees it. Invitations of a
    /// trashed resource can only be looked at.
    pub fn resolve_invitation(
        &self,
        actor: &Actor,
        invitation: &Invitation,
    ) -> Result<Abilities, AuthzError> {
        let mut abilities = Abilities::deny_all([
            Action::Retrieve,
            Action::Update,
            Action::PartialUpdate,
            Action::Destroy,
        ]);
        let Some(resource) = self.store.resource(invitation.resource)? else {
            return Ok(abilities);
        };
        let privileged = self.role(actor, &resource)?.filter(|role| roles::is_privileged(*role));
        if let Some(role) = privileged {
            abilities.set(Action::Retrieve, true);
            if !resource.is_soft_deleted() {
                for action in [Action::Update, Action::PartialUpdate, Action::Destroy] {
                    abilities.set(action, true);
                }
                abilities.set_role_to = roles::assignable_roles(role);
            }
        }
        Ok(abilities)
    }
}
