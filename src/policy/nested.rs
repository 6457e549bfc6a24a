//! Rows, properties and views of a database.
//!
//! These objects carry no access list. Both phases are decided by the
//! abilities of the parent database, and a database hidden by the trashbin
//! hides everything under it.

use super::{ability_verdict, visible_abilities, PermissionPolicy, Request, Verdict};
use crate::actions::Action;
use crate::error::AuthzError;
use crate::resolver::AbilityResolver;
use crate::resource::{Abilities, NestedObject};
use crate::store::AccessStore;
use crate::trashbin::TrashbinRule;
use crate::types::ResourceId;
use tracing::debug;

/// What the parent database looks like to the actor.
enum Parent {
    Missing,
    Hidden,
    Visible(Abilities),
}

#[derive(Debug)]
pub struct DatabaseNestedPolicy<'s, S: AccessStore + ?Sized> {
    resolver: AbilityResolver<'s, S>,
    trashbin: TrashbinRule,
}

impl<'s, S: AccessStore + ?Sized> DatabaseNestedPolicy<'s, S> {
    pub fn new(resolver: AbilityResolver<'s, S>, trashbin: TrashbinRule) -> Self {
        DatabaseNestedPolicy { resolver, trashbin }
    }

    fn database(&self, request: &Request<'_>, id: ResourceId) -> Result<Parent, AuthzError> {
        let Some(database) = self.resolver.store().resource(id)? else {
            debug!(database = %id, "Parent database not found");
            return Ok(Parent::Missing);
        };
        let (actor, now) = (request.actor, request.now);
        let visible = visible_abilities(&self.resolver, &self.trashbin, actor, &database, now)?;
        Ok(match visible {
            Some(abilities) => Parent::Visible(abilities),
            None => Parent::Hidden,
        })
    }
}

impl<'s, S: AccessStore + ?Sized> PermissionPolicy for DatabaseNestedPolicy<'s, S> {
    type Object = NestedObject;

    fn name(&self) -> &'static str {
        "database_nested"
    }

    fn has_permission(&self, request: &Request<'_>) -> Result<Verdict, AuthzError> {
        if !request.actor.is_authenticated() {
            return Ok(Verdict::Deny);
        }
        let Some(database) = request.parent_id else {
            debug!(action = %request.action, "No database in route");
            return Ok(Verdict::Deny);
        };
        let Parent::Visible(abilities) = self.database(request, database)? else {
            return Ok(Verdict::Deny);
        };
        let needed =
            if request.action == Action::Create { Action::Update } else { Action::Retrieve };
        Ok(Verdict::from_bool(abilities.get(needed)))
    }

    fn has_object_permission(
        &self,
        request: &Request<'_>,
        object: &NestedObject,
    ) -> Result<Verdict, AuthzError> {
        let Some(database) = object.database else {
            return Ok(Verdict::Deny);
        };
        let abilities = match self.database(request, database)? {
            Parent::Missing => return Ok(Verdict::Deny),
            Parent::Hidden => return Ok(Verdict::MaskedNotFound),
            Parent::Visible(abilities) => abilities,
        };
        let needed = match request.action {
            Action::Update | Action::PartialUpdate | Action::Destroy => Some(Action::Update),
            Action::Retrieve => Some(Action::Retrieve),
            _ => None,
        };
        Ok(match needed {
            Some(action) => ability_verdict(&abilities, action),
            None if !abilities.get(Action::Retrieve) => Verdict::MaskedNotFound,
            None => Verdict::Deny,
        })
    }
}
