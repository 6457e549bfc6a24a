#![no_main]

// Harness: trashbin_window
// Focus: visibility is monotone in time; once hidden, a trashed resource
// never reappears for an owner.

use arbitrary::Arbitrary;
use chrono::{Duration, TimeZone, Utc};
use collab_authz::{Resource, ResourceKind, Role, TrashbinRule};
use libfuzzer_sys::fuzz_target;

#[derive(Arbitrary, Debug, Clone)]
struct WindowFrame {
    cutoff_hours: u16,
    first_offset_mins: u32,
    second_offset_mins: u32,
}

fuzz_target!(|frame: WindowFrame| {
    let rule = TrashbinRule::new(Duration::hours(i64::from(frame.cutoff_hours.max(1))));
    let t0 = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    let mut resource = Resource::new(ResourceKind::Document, None);
    resource.ancestors_deleted_at = Some(t0);

    let (early, late) = if frame.first_offset_mins <= frame.second_offset_mins {
        (frame.first_offset_mins, frame.second_offset_mins)
    } else {
        (frame.second_offset_mins, frame.first_offset_mins)
    };
    let early = t0 + Duration::minutes(i64::from(early));
    let late = t0 + Duration::minutes(i64::from(late));

    if !rule.is_visible(&[Role::Owner], &resource, early) {
        assert!(!rule.is_visible(&[Role::Owner], &resource, late));
    }
    assert!(!rule.is_visible(&[Role::Editor, Role::Admin], &resource, early));
});
