//!
//! Identities and request vocabulary shared by every module of the engine.
//!
//! Resources, users and access entries are keyed by UUIDs. Teams are named
//! groups handed to us by the identity provider, so they stay plain strings.

use std::fmt;
use uuid::Uuid;

// --- Universal identifiers --------------------------------------------------

macro_rules! uuid_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord,
            serde::Serialize, serde::Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub Uuid);

        impl $name {
            /// Generates a fresh random (v4) identifier.
            pub fn new() -> Self {
                $name(Uuid::new_v4())
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }

        impl From<Uuid> for $name {
            fn from(value: Uuid) -> Self {
                $name(value)
            }
        }
    };
}

uuid_id!(
    /// Stable identity of a user account.
    UserId
);
uuid_id!(
    /// Identity of an access-controlled resource (document, template, database).
    ResourceId
);
uuid_id!(
    /// Identity of a stored access entry.
    AccessId
);
uuid_id!(
    /// Identity of a pending invitation.
    InvitationId
);

/// Name of a team a user belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct TeamId(pub String);

impl TeamId {
    pub fn new(name: impl Into<String>) -> Self {
        TeamId(name.into())
    }
}

impl fmt::Display for TeamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// --- Principals -------------------------------------------------------------

/// Holder of an access entry: a single user or a whole team.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Principal {
    User(UserId),
    Team(TeamId),
}

/// The party making a request.
///
/// An anonymous actor has no user and belongs to no team. An authenticated
/// actor carries its team memberships so that the team expansion happens
/// once per request instead of inside every store query.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Actor {
    user: Option<UserId>,
    teams: Vec<TeamId>,
}

impl Actor {
    pub fn anonymous() -> Self {
        Actor::default()
    }

    pub fn user(id: UserId) -> Self {
        Actor { user: Some(id), teams: Vec::new() }
    }

    /// Replaces the team memberships of an authenticated actor.
    /// Teams are meaningless without a user and are dropped for anonymous actors.
    pub fn with_teams<I, T>(mut self, teams: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<TeamId>,
    {
        if self.user.is_some() {
            self.teams = teams.into_iter().map(Into::into).collect();
        }
        self
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    pub fn user_id(&self) -> Option<UserId> {
        self.user
    }

    pub fn teams(&self) -> &[TeamId] {
        &self.teams
    }

    /// Expands the actor to `{user} ∪ teams(user)`. Empty for anonymous actors.
    pub fn principals(&self) -> Vec<Principal> {
        let Some(user) = self.user else {
            return Vec::new();
        };
        let mut principals = Vec::with_capacity(self.teams.len() + 1);
        principals.push(Principal::User(user));
        principals.extend(self.teams.iter().cloned().map(Principal::Team));
        principals
    }

    pub fn is(&self, user: &UserId) -> bool {
        self.user.as_ref() == Some(user)
    }
}

impl From<&str> for TeamId {
    fn from(value: &str) -> Self {
        TeamId::new(value)
    }
}

impl From<String> for TeamId {
    fn from(value: String) -> Self {
        TeamId(value)
    }
}

// --- Request verbs ----------------------------------------------------------

/// HTTP verb of the incoming request.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    Get,
    Head,
    Options,
    Post,
    Put,
    Patch,
    Delete,
}

impl Method {
    /// Safe verbs never mutate state and may be served to anonymous actors
    /// by the lenient policies.
    pub fn is_safe(self) -> bool {
        matches!(self, Method::Get | Method::Head | Method::Options)
    }
}
