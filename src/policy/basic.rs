//! Identity-based policies that need no access entries.

use super::{PermissionPolicy, Protected, Request, Verdict};
use crate::error::AuthzError;
use crate::resource::{Invitation, Resource};
use crate::types::UserId;
use std::marker::PhantomData;

/// Only authenticated actors get through.
#[derive(Debug, Default, Clone, Copy)]
pub struct IsAuthenticated;

impl PermissionPolicy for IsAuthenticated {
    type Object = ();

    fn name(&self) -> &'static str {
        "is_authenticated"
    }

    fn has_permission(&self, request: &Request<'_>) -> Result<Verdict, AuthzError> {
        Ok(Verdict::from_bool(request.actor.is_authenticated()))
    }
}

/// Authenticated actors, or anyone on a safe verb.
#[derive(Debug, Default, Clone, Copy)]
pub struct IsAuthenticatedOrSafe;

impl PermissionPolicy for IsAuthenticatedOrSafe {
    type Object = ();

    fn name(&self) -> &'static str {
        "is_authenticated_or_safe"
    }

    fn has_permission(&self, request: &Request<'_>) -> Result<Verdict, AuthzError> {
        if request.method.is_safe() {
            return Ok(Verdict::Allow);
        }
        IsAuthenticated.has_permission(request)
    }
}

/// Self-service: the object must be the acting user.
#[derive(Debug, Default, Clone, Copy)]
pub struct IsSelf;

impl PermissionPolicy for IsSelf {
    type Object = UserId;

    fn name(&self) -> &'static str {
        "is_self"
    }

    fn has_permission(&self, request: &Request<'_>) -> Result<Verdict, AuthzError> {
        IsAuthenticated.has_permission(request)
    }

    fn has_object_permission(
        &self,
        request: &Request<'_>,
        object: &UserId,
    ) -> Result<Verdict, AuthzError> {
        Ok(Verdict::from_bool(request.actor.is(object)))
    }
}

/// Objects with an optional owner and, for some kinds, a `user` backlink.
pub trait OwnedObject {
    fn owner(&self) -> Option<UserId>;

    /// `None` when the object has no such relation.
    fn linked_user(&self) -> Option<UserId> {
        None
    }
}

impl OwnedObject for Resource {
    fn owner(&self) -> Option<UserId> {
        Protected::owner(self)
    }
}

impl OwnedObject for Invitation {
    fn owner(&self) -> Option<UserId> {
        Protected::owner(self)
    }
}

/// Unsafe verbs need an exact ownership match. Safe verbs also pass on
/// ownerless objects, or when the object's `user` backlink is the actor.
#[derive(Debug)]
pub struct IsOwnedOrPublic<O: ?Sized> {
    _object: PhantomData<fn(&O)>,
}

impl<O: ?Sized> IsOwnedOrPublic<O> {
    pub fn new() -> Self {
        IsOwnedOrPublic { _object: PhantomData }
    }
}

impl<O: ?Sized> Default for IsOwnedOrPublic<O> {
    fn default() -> Self {
        Self::new()
    }
}

impl<O: OwnedObject + ?Sized> PermissionPolicy for IsOwnedOrPublic<O> {
    type Object = O;

    fn name(&self) -> &'static str {
        "is_owned_or_public"
    }

    fn has_permission(&self, request: &Request<'_>) -> Result<Verdict, AuthzError> {
        IsAuthenticated.has_permission(request)
    }

    fn has_object_permission(
        &self,
        request: &Request<'_>,
        object: &O,
    ) -> Result<Verdict, AuthzError> {
        let actor = request.actor;
        let owner = object.owner();
        if owner.as_ref().is_some_and(|owner| actor.is(owner)) {
            return Ok(Verdict::Allow);
        }
        if !request.method.is_safe() {
            return Ok(Verdict::Deny);
        }
        if owner.is_none() {
            return Ok(Verdict::Allow);
        }
        let linked = object.linked_user();
        Ok(Verdict::from_bool(linked.as_ref().is_some_and(|user| actor.is(user))))
    }
}
