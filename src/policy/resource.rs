//! Ability-based policies for top-level resources.

use super::{ability_verdict, visible_abilities, PermissionPolicy, Protected, Request, Verdict};
use crate::actions::{fine_action, Action};
use crate::error::AuthzError;
use crate::resolver::AbilityResolver;
use crate::resource::Resource;
use crate::store::AccessStore;
use crate::trashbin::TrashbinRule;
use std::marker::PhantomData;

/// Looks the requested action up in the object's abilities.
///
/// Creating needs an authenticated actor; everything else is decided on the
/// object. Objects that sit in the trashbin follow the trashbin rule before
/// their abilities are consulted.
#[derive(Debug)]
pub struct ResourceWithAccessPolicy<'s, S: AccessStore + ?Sized, O: ?Sized> {
    resolver: AbilityResolver<'s, S>,
    trashbin: TrashbinRule,
    name: &'static str,
    _object: PhantomData<fn(&O)>,
}

/// Policy guarding templates.
pub type TemplatePolicy<'s, S> = ResourceWithAccessPolicy<'s, S, Resource>;
/// Policy guarding databases.
pub type DatabasePolicy<'s, S> = ResourceWithAccessPolicy<'s, S, Resource>;

impl<'s, S: AccessStore + ?Sized, O: ?Sized> ResourceWithAccessPolicy<'s, S, O> {
    pub fn new(resolver: AbilityResolver<'s, S>, trashbin: TrashbinRule) -> Self {
        ResourceWithAccessPolicy {
            resolver,
            trashbin,
            name: "resource_with_access",
            _object: PhantomData,
        }
    }

    /// Name reported in logs.
    pub fn named(mut self, name: &'static str) -> Self {
        self.name = name;
        self
    }
}

impl<'s, S: AccessStore + ?Sized> ResourceWithAccessPolicy<'s, S, Resource> {
    pub fn templates(
        resolver: AbilityResolver<'s, S>,
        trashbin: TrashbinRule,
    ) -> TemplatePolicy<'s, S> {
        Self::new(resolver, trashbin).named("template")
    }

    pub fn databases(
        resolver: AbilityResolver<'s, S>,
        trashbin: TrashbinRule,
    ) -> DatabasePolicy<'s, S> {
        Self::new(resolver, trashbin).named("database")
    }
}

impl<'s, S, O> PermissionPolicy for ResourceWithAccessPolicy<'s, S, O>
where
    S: AccessStore + ?Sized,
    O: Protected + ?Sized,
{
    type Object = O;

    fn name(&self) -> &'static str {
        self.name
    }

    fn has_permission(&self, request: &Request<'_>) -> Result<Verdict, AuthzError> {
        Ok(Verdict::from_bool(request.actor.is_authenticated() || request.action != Action::Create))
    }

    fn has_object_permission(
        &self,
        request: &Request<'_>,
        object: &O,
    ) -> Result<Verdict, AuthzError> {
        let abilities = match object.trashbin_subject() {
            Some(resource) => {
                let visible = visible_abilities(
                    &self.resolver,
                    &self.trashbin,
                    request.actor,
                    resource,
                    request.now,
                )?;
                match visible {
                    Some(abilities) => abilities,
                    None => return Ok(Verdict::MaskedNotFound),
                }
            }
            None => object.load_abilities(&self.resolver, request.actor)?,
        };
        Ok(ability_verdict(&abilities, request.action))
    }
}

/// Documents: trashbin first, then abilities with the verb alias table.
#[derive(Debug)]
pub struct DocumentPolicy<'s, S: AccessStore + ?Sized> {
    resolver: AbilityResolver<'s, S>,
    trashbin: TrashbinRule,
}

impl<'s, S: AccessStore + ?Sized> DocumentPolicy<'s, S> {
    pub fn new(resolver: AbilityResolver<'s, S>, trashbin: TrashbinRule) -> Self {
        DocumentPolicy { resolver, trashbin }
    }
}

impl<'s, S: AccessStore + ?Sized> PermissionPolicy for DocumentPolicy<'s, S> {
    type Object = Resource;

    fn name(&self) -> &'static str {
        "document"
    }

    fn has_permission(&self, request: &Request<'_>) -> Result<Verdict, AuthzError> {
        Ok(Verdict::from_bool(request.actor.is_authenticated() || request.action != Action::Create))
    }

    fn has_object_permission(
        &self,
        request: &Request<'_>,
        document: &Resource,
    ) -> Result<Verdict, AuthzError> {
        let Some(abilities) =
            visible_abilities(&self.resolver, &self.trashbin, request.actor, document, request.now)?
        else {
            return Ok(Verdict::MaskedNotFound);
        };
        Ok(ability_verdict(&abilities, fine_action(request.action, request.method)))
    }
}
