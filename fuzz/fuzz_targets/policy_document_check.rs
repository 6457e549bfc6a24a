#![no_main]

// Harness: policy_document_check
// Focus: the document fine check never errors on a healthy store, hard-hidden
// documents are always masked, and non-owners never see trashed documents.

use arbitrary::Arbitrary;
use chrono::{Duration, TimeZone, Utc};
use collab_authz::policy::DocumentPolicy;
use collab_authz::store::{AccessStore, MemoryStore};
use collab_authz::{
    check_object_permission, AbilityResolver, Action, Actor, AuthzSettings, Method, Principal,
    Request, ResourceKind, Role, TrashbinRule, UserId, Verdict,
};
use libfuzzer_sys::fuzz_target;

#[derive(Arbitrary, Debug, Clone)]
struct DocFrame {
    depth: u8,
    role: Option<u8>,       // Role index granted to the actor at the root
    via_team: bool,
    deleted_level: Option<u8>,
    elapsed_hours: u16,
    cutoff_days: u8,
    action: u8,
    method: u8,
}

const METHODS: [Method; 7] = [
    Method::Get,
    Method::Head,
    Method::Options,
    Method::Post,
    Method::Put,
    Method::Patch,
    Method::Delete,
];

fuzz_target!(|frame: DocFrame| {
    let settings = AuthzSettings {
        trashbin_cutoff_days: u32::from(frame.cutoff_days.max(1)),
        ..AuthzSettings::default()
    };
    let mut store = MemoryStore::new();
    let owner = UserId::new();
    let member = UserId::new();

    let mut chain = vec![store.create_resource(ResourceKind::Document, owner, None).unwrap()];
    for _ in 0..(frame.depth % 8) {
        let parent = chain[chain.len() - 1].id;
        chain.push(store.create_resource(ResourceKind::Document, owner, Some(parent)).unwrap());
    }
    let root = chain[0].id;
    let role = frame.role.map(|i| Role::ALL[usize::from(i) % Role::ALL.len()]);
    if let Some(role) = role {
        let principal = if frame.via_team {
            Principal::Team("fuzz".into())
        } else {
            Principal::User(member)
        };
        store.grant(root, principal, role);
    }

    let t0 = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    if let Some(level) = frame.deleted_level {
        let target = chain[usize::from(level) % chain.len()].id;
        store.soft_delete(target, t0).unwrap();
    }
    let leaf = store.resource(chain[chain.len() - 1].id).unwrap().unwrap();

    let actor = Actor::user(member).with_teams(["fuzz"]);
    let action = Action::ALL[usize::from(frame.action) % Action::ALL.len()];
    let method = METHODS[usize::from(frame.method) % METHODS.len()];
    let now = t0 + Duration::hours(i64::from(frame.elapsed_hours));
    let request = Request::new(&actor, action, method).at(now);

    let rule = TrashbinRule::from_settings(&settings);
    let policy = DocumentPolicy::new(AbilityResolver::new(&store, &settings), rule);
    let verdict =
        check_object_permission(&policy, &request, &leaf).expect("memory store never fails");

    if rule.is_hard_hidden(&leaf, now) {
        assert_eq!(verdict, Verdict::MaskedNotFound);
    }
    if leaf.is_soft_deleted() && role != Some(Role::Owner) {
        assert_eq!(verdict, Verdict::MaskedNotFound);
    }
    if role.is_none() {
        assert_ne!(verdict, Verdict::Allow);
    }
});
