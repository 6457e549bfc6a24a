//!
//! Trashbin visibility rule.
//!
//! A soft-deleted resource (or any descendant of one) stays reachable by the
//! owners of the deleted subtree until the retention cutoff passes. After
//! that it is hidden from everyone, owners included, and reported as absent.

use crate::config::AuthzSettings;
use crate::resource::Resource;
use crate::roles::Role;
use chrono::{DateTime, Duration, Utc};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrashbinRule {
    cutoff: Duration,
}

impl TrashbinRule {
    pub fn new(cutoff: Duration) -> Self {
        TrashbinRule { cutoff }
    }

    pub fn from_settings(settings: &AuthzSettings) -> Self {
        Self::new(settings.trashbin_cutoff())
    }

    pub fn cutoff(&self) -> Duration {
        self.cutoff
    }

    /// Deletions older than this instant are past the retention window.
    pub fn cutoff_instant(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        now - self.cutoff
    }

    /// Past the cutoff: invisible to everyone.
    pub fn is_hard_hidden(&self, resource: &Resource, now: DateTime<Utc>) -> bool {
        match resource.ancestors_deleted_at {
            Some(deleted_at) => deleted_at < self.cutoff_instant(now),
            None => false,
        }
    }

    /// Whether an actor holding `roles` on the resource or its ancestors may
    /// still see it. Deletion anywhere up the chain hides the resource from
    /// non-owners, whatever their other abilities.
    pub fn is_visible(&self, roles: &[Role], resource: &Resource, now: DateTime<Utc>) -> bool {
        if !resource.is_soft_deleted() {
            return true;
        }
        !self.is_hard_hidden(resource, now) && roles.contains(&Role::Owner)
    }
}

impl Default for TrashbinRule {
    fn default() -> Self {
        Self::from_settings(&AuthzSettings::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::ResourceKind;
    use crate::types::UserId;

    fn trashed(at: DateTime<Utc>) -> Resource {
        let mut resource = Resource::new(ResourceKind::Document, Some(UserId::new()));
        resource.deleted_at = Some(at);
        resource.ancestors_deleted_at = Some(at);
        resource
    }

    #[test]
    fn live_resources_are_always_visible() {
        let rule = TrashbinRule::default();
        let live = Resource::new(ResourceKind::Document, None);
        assert!(!rule.is_hard_hidden(&live, Utc::now()));
        assert!(rule.is_visible(&[], &live, Utc::now()));
    }

    #[test]
    fn owners_see_trash_within_cutoff() {
        let rule = TrashbinRule::new(Duration::days(30));
        let t0 = Utc::now();
        let doc = trashed(t0);
        let now = t0 + Duration::days(10);
        assert!(rule.is_visible(&[Role::Owner], &doc, now));
        assert!(!rule.is_visible(&[Role::Admin, Role::Editor], &doc, now));
        assert!(!rule.is_hard_hidden(&doc, now));
    }

    #[test]
    fn boundary_is_inclusive_for_owners() {
        let rule = TrashbinRule::new(Duration::days(30));
        let t0 = Utc::now();
        let doc = trashed(t0);
        assert!(rule.is_visible(&[Role::Owner], &doc, t0 + Duration::days(30)));
        assert!(rule.is_hard_hidden(&doc, t0 + Duration::days(30) + Duration::seconds(1)));
    }

    #[test]
    fn past_cutoff_hides_from_owners() {
        let rule = TrashbinRule::new(Duration::days(30));
        let t0 = Utc::now();
        let doc = trashed(t0);
        let now = t0 + Duration::days(31);
        assert!(rule.is_hard_hidden(&doc, now));
        assert!(!rule.is_visible(&[Role::Owner], &doc, now));
    }

    #[test]
    fn deleted_ancestor_hides_descendant() {
        let rule = TrashbinRule::default();
        let t0 = Utc::now();
        let mut child = Resource::new(ResourceKind::Document, None);
        child.ancestors_deleted_at = Some(t0);
        assert!(!rule.is_visible(&[Role::Admin], &child, t0));
        assert!(rule.is_visible(&[Role::Owner], &child, t0));
    }
}
