#![cfg(test)]

use super::*;
use crate::config::AuthzSettings;
use crate::error::StoreError;
use crate::resource::{NestedKind, NestedObject, ResourceKind};
use crate::store::MemoryStore;
use crate::trashbin::TrashbinRule;
use crate::types::{Principal, TeamId};
use chrono::Duration;

// --- Test Utilities ---

fn resolver(store: &MemoryStore) -> AbilityResolver<'_, MemoryStore> {
    AbilityResolver::new(store, &AuthzSettings::default())
}

fn trashbin() -> TrashbinRule {
    TrashbinRule::new(Duration::days(30))
}

struct Fixture {
    store: MemoryStore,
    owner: UserId,
    doc: Resource,
}

fn fixture() -> Fixture {
    let mut store = MemoryStore::new();
    let owner = UserId::new();
    let doc = store.create_resource(ResourceKind::Document, owner, None).unwrap();
    Fixture { store, owner, doc }
}

// --- Verdicts ---

#[test]
fn verdicts_map_to_errors() {
    assert_eq!(Verdict::Allow.into_result(), Ok(()));
    assert!(matches!(Verdict::Deny.into_result(), Err(AuthzError::PermissionDenied(_))));
    assert_eq!(Verdict::MaskedNotFound.into_result(), Err(AuthzError::NotFound));
}

#[test]
fn ability_verdict_masks_unretrievable_objects() {
    let mut abilities = Abilities::default();
    assert_eq!(ability_verdict(&abilities, Action::Update), Verdict::MaskedNotFound);
    abilities.set(Action::Retrieve, true);
    assert_eq!(ability_verdict(&abilities, Action::Update), Verdict::Deny);
    assert_eq!(ability_verdict(&abilities, Action::Retrieve), Verdict::Allow);
}

// --- Identity policies ---

#[test]
fn is_authenticated_or_safe_lets_anonymous_read() {
    let anonymous = Actor::anonymous();
    let get = Request::new(&anonymous, Action::List, Method::Get);
    let post = Request::new(&anonymous, Action::Create, Method::Post);
    assert_eq!(check_collection_permission(&IsAuthenticatedOrSafe, &get), Ok(Verdict::Allow));
    assert_eq!(check_collection_permission(&IsAuthenticatedOrSafe, &post), Ok(Verdict::Deny));
    assert_eq!(check_collection_permission(&IsAuthenticated, &get), Ok(Verdict::Deny));
}

#[test]
fn is_self_compares_identities() {
    let me = UserId::new();
    let actor = Actor::user(me);
    let request = Request::new(&actor, Action::PartialUpdate, Method::Patch);
    assert_eq!(check_object_permission(&IsSelf, &request, &me), Ok(Verdict::Allow));
    assert_eq!(check_object_permission(&IsSelf, &request, &UserId::new()), Ok(Verdict::Deny));
}

struct Profile {
    owner: Option<UserId>,
    user: Option<UserId>,
}

impl OwnedObject for Profile {
    fn owner(&self) -> Option<UserId> {
        self.owner
    }

    fn linked_user(&self) -> Option<UserId> {
        self.user
    }
}

#[test]
fn owned_or_public_rules() {
    let me = UserId::new();
    let actor = Actor::user(me);
    let policy = IsOwnedOrPublic::<Profile>::new();
    let get = Request::new(&actor, Action::Retrieve, Method::Get);
    let delete = Request::new(&actor, Action::Destroy, Method::Delete);

    let mine = Profile { owner: Some(me), user: None };
    assert_eq!(policy.has_object_permission(&delete, &mine), Ok(Verdict::Allow));

    let public = Profile { owner: None, user: None };
    assert_eq!(policy.has_object_permission(&get, &public), Ok(Verdict::Allow));
    assert_eq!(policy.has_object_permission(&delete, &public), Ok(Verdict::Deny));

    let linked = Profile { owner: Some(UserId::new()), user: Some(me) };
    assert_eq!(policy.has_object_permission(&get, &linked), Ok(Verdict::Allow));
    assert_eq!(policy.has_object_permission(&delete, &linked), Ok(Verdict::Deny));

    let foreign = Profile { owner: Some(UserId::new()), user: None };
    assert_eq!(policy.has_object_permission(&get, &foreign), Ok(Verdict::Deny));
}

#[test]
fn owned_or_public_on_resources() {
    let fx = fixture();
    let policy = IsOwnedOrPublic::<Resource>::new();
    let owner = Actor::user(fx.owner);
    let stranger = Actor::user(UserId::new());
    let delete_by_owner = Request::new(&owner, Action::Destroy, Method::Delete);
    let read_by_stranger = Request::new(&stranger, Action::Retrieve, Method::Get);
    assert_eq!(policy.has_object_permission(&delete_by_owner, &fx.doc), Ok(Verdict::Allow));
    assert_eq!(policy.has_object_permission(&read_by_stranger, &fx.doc), Ok(Verdict::Deny));
}

// --- Documents ---

#[test]
fn anonymous_cannot_create_documents_but_may_list() {
    let fx = fixture();
    let policy = DocumentPolicy::new(resolver(&fx.store), trashbin());
    let anonymous = Actor::anonymous();
    let create = Request::new(&anonymous, Action::Create, Method::Post);
    let list = Request::new(&anonymous, Action::List, Method::Get);
    assert_eq!(check_collection_permission(&policy, &create), Ok(Verdict::Deny));
    assert_eq!(check_collection_permission(&policy, &list), Ok(Verdict::Allow));
}

#[test]
fn children_endpoint_uses_verb_aliases() {
    let mut fx = fixture();
    let reader = UserId::new();
    fx.store.grant(fx.doc.id, Principal::User(reader), Role::Reader);
    let policy = DocumentPolicy::new(resolver(&fx.store), trashbin());
    let actor = Actor::user(reader);

    let list = Request::new(&actor, Action::Children, Method::Get);
    let create = Request::new(&actor, Action::Children, Method::Post);
    assert_eq!(check_object_permission(&policy, &list, &fx.doc), Ok(Verdict::Allow));
    assert_eq!(check_object_permission(&policy, &create, &fx.doc), Ok(Verdict::Deny));

    let versions = Request::new(&actor, Action::VersionsDetail, Method::Delete);
    assert_eq!(check_object_permission(&policy, &versions, &fx.doc), Ok(Verdict::Deny));
}

#[test]
fn strangers_see_nothing() {
    let fx = fixture();
    let policy = DocumentPolicy::new(resolver(&fx.store), trashbin());
    let stranger = Actor::user(UserId::new());
    let update = Request::new(&stranger, Action::Update, Method::Put);
    assert_eq!(check_object_permission(&policy, &update, &fx.doc), Ok(Verdict::MaskedNotFound));
}

#[test]
fn trashed_child_is_masked_for_admin_of_parent() {
    let mut fx = fixture();
    let admin = UserId::new();
    fx.store.grant(fx.doc.id, Principal::User(admin), Role::Admin);
    let child =
        fx.store.create_resource(ResourceKind::Document, fx.owner, Some(fx.doc.id)).unwrap();
    let t0 = Utc::now();
    fx.store.soft_delete(fx.doc.id, t0).unwrap();
    let child = fx.store.resource(child.id).unwrap().unwrap();

    let policy = DocumentPolicy::new(resolver(&fx.store), trashbin());
    let admin_actor = Actor::user(admin);
    let owner_actor = Actor::user(fx.owner);
    let next_day = t0 + Duration::days(1);
    let by_admin = Request::new(&admin_actor, Action::Retrieve, Method::Get).at(next_day);
    let by_owner = Request::new(&owner_actor, Action::Retrieve, Method::Get).at(next_day);
    assert_eq!(check_object_permission(&policy, &by_admin, &child), Ok(Verdict::MaskedNotFound));
    assert_eq!(check_object_permission(&policy, &by_owner, &child), Ok(Verdict::Allow));
}

#[test]
fn owner_restores_only_the_deletion_root() {
    let mut fx = fixture();
    let child =
        fx.store.create_resource(ResourceKind::Document, fx.owner, Some(fx.doc.id)).unwrap();
    let t0 = Utc::now();
    fx.store.soft_delete(fx.doc.id, t0).unwrap();
    let doc = fx.store.resource(fx.doc.id).unwrap().unwrap();
    let child = fx.store.resource(child.id).unwrap().unwrap();

    let policy = DocumentPolicy::new(resolver(&fx.store), trashbin());
    let actor = Actor::user(fx.owner);
    let restore = Request::new(&actor, Action::Restore, Method::Post).at(t0 + Duration::days(2));
    assert_eq!(check_object_permission(&policy, &restore, &doc), Ok(Verdict::Allow));
    assert_eq!(check_object_permission(&policy, &restore, &child), Ok(Verdict::Deny));
    let update = Request::new(&actor, Action::Update, Method::Put).at(t0 + Duration::days(2));
    assert_eq!(check_object_permission(&policy, &update, &doc), Ok(Verdict::Deny));
}

// --- Templates & databases ---

#[test]
fn template_policy_reads_abilities() {
    let mut store = MemoryStore::new();
    let owner = UserId::new();
    let template = store.create_resource(ResourceKind::Template, owner, None).unwrap();
    let reader = UserId::new();
    store.grant(template.id, Principal::User(reader), Role::Reader);
    let policy: TemplatePolicy<'_, MemoryStore> =
        ResourceWithAccessPolicy::templates(resolver(&store), trashbin());

    let actor = Actor::user(reader);
    let generate = Request::new(&actor, Action::GenerateDocument, Method::Post);
    let destroy = Request::new(&actor, Action::Destroy, Method::Delete);
    assert_eq!(check_object_permission(&policy, &generate, &template), Ok(Verdict::Allow));
    assert_eq!(check_object_permission(&policy, &destroy, &template), Ok(Verdict::Deny));
}

#[test]
fn expired_trash_is_masked_for_databases() {
    let mut store = MemoryStore::new();
    let owner = UserId::new();
    let database = store.create_resource(ResourceKind::Database, owner, None).unwrap();
    let t0 = Utc::now();
    store.soft_delete(database.id, t0).unwrap();
    let database = store.resource(database.id).unwrap().unwrap();
    let policy: DatabasePolicy<'_, MemoryStore> =
        ResourceWithAccessPolicy::databases(resolver(&store), trashbin());

    let actor = Actor::user(owner);
    let late = Request::new(&actor, Action::Retrieve, Method::Get).at(t0 + Duration::days(31));
    assert_eq!(check_object_permission(&policy, &late, &database), Ok(Verdict::MaskedNotFound));
    let early = Request::new(&actor, Action::Retrieve, Method::Get).at(t0 + Duration::days(1));
    assert_eq!(check_object_permission(&policy, &early, &database), Ok(Verdict::Allow));
}

#[test]
fn trashed_databases_and_templates_are_hidden_from_non_owners() {
    let mut store = MemoryStore::new();
    let owner = UserId::new();
    let reader = UserId::new();
    let database = store.create_resource(ResourceKind::Database, owner, None).unwrap();
    let template = store.create_resource(ResourceKind::Template, owner, None).unwrap();
    store.grant(database.id, Principal::User(reader), Role::Reader);
    store.grant(template.id, Principal::User(reader), Role::Admin);
    let t0 = Utc::now();
    store.soft_delete(database.id, t0).unwrap();
    store.soft_delete(template.id, t0).unwrap();
    let database = store.resource(database.id).unwrap().unwrap();
    let template = store.resource(template.id).unwrap().unwrap();

    let databases: DatabasePolicy<'_, MemoryStore> =
        ResourceWithAccessPolicy::databases(resolver(&store), trashbin());
    let templates: TemplatePolicy<'_, MemoryStore> =
        ResourceWithAccessPolicy::templates(resolver(&store), trashbin());
    assert_eq!(databases.name(), "database");
    assert_eq!(templates.name(), "template");

    let within = t0 + Duration::days(10);
    let reader = Actor::user(reader);
    let owner = Actor::user(owner);
    let by_reader = Request::new(&reader, Action::Retrieve, Method::Get).at(within);
    let by_owner = Request::new(&owner, Action::Retrieve, Method::Get).at(within);
    let masked = Ok(Verdict::MaskedNotFound);
    assert_eq!(check_object_permission(&databases, &by_reader, &database), masked);
    assert_eq!(check_object_permission(&templates, &by_reader, &template), masked);
    assert_eq!(check_object_permission(&databases, &by_owner, &database), Ok(Verdict::Allow));
    assert_eq!(check_object_permission(&templates, &by_owner, &template), Ok(Verdict::Allow));
}

// --- Nested database objects ---

#[test]
fn nested_checks_use_the_parent_database() {
    let mut store = MemoryStore::new();
    let owner = UserId::new();
    let database = store.create_resource(ResourceKind::Database, owner, None).unwrap();
    let viewer = UserId::new();
    store.grant(database.id, Principal::Team(TeamId::new("viewers")), Role::Reader);
    let policy = DatabaseNestedPolicy::new(resolver(&store), trashbin());
    let row = NestedObject::new(NestedKind::Row, database.id);

    let actor = Actor::user(viewer).with_teams(["viewers"]);
    let list = Request::new(&actor, Action::List, Method::Get).with_parent(database.id);
    let create = Request::new(&actor, Action::Create, Method::Post).with_parent(database.id);
    assert_eq!(check_collection_permission(&policy, &list), Ok(Verdict::Allow));
    assert_eq!(check_collection_permission(&policy, &create), Ok(Verdict::Deny));

    let retrieve = Request::new(&actor, Action::Retrieve, Method::Get);
    let destroy = Request::new(&actor, Action::Destroy, Method::Delete);
    let odd = Request::new(&actor, Action::Move, Method::Post);
    assert_eq!(check_object_permission(&policy, &retrieve, &row), Ok(Verdict::Allow));
    assert_eq!(check_object_permission(&policy, &destroy, &row), Ok(Verdict::Deny));
    assert_eq!(check_object_permission(&policy, &odd, &row), Ok(Verdict::Deny));
}

#[test]
fn nested_without_database_is_denied_not_an_error() {
    let store = MemoryStore::new();
    let policy = DatabaseNestedPolicy::new(resolver(&store), trashbin());
    let actor = Actor::user(UserId::new());
    let no_parent = Request::new(&actor, Action::List, Method::Get);
    let ghost_parent =
        Request::new(&actor, Action::List, Method::Get).with_parent(ResourceId::new());
    assert_eq!(check_collection_permission(&policy, &no_parent), Ok(Verdict::Deny));
    assert_eq!(check_collection_permission(&policy, &ghost_parent), Ok(Verdict::Deny));

    let orphan = NestedObject { id: uuid::Uuid::new_v4(), kind: NestedKind::View, database: None };
    let retrieve = Request::new(&actor, Action::Retrieve, Method::Get);
    assert_eq!(check_object_permission(&policy, &retrieve, &orphan), Ok(Verdict::Deny));
}

#[test]
fn nested_objects_follow_the_trashed_database() {
    let mut store = MemoryStore::new();
    let owner = UserId::new();
    let reader = UserId::new();
    let database = store.create_resource(ResourceKind::Database, owner, None).unwrap();
    store.grant(database.id, Principal::User(reader), Role::Reader);
    let t0 = Utc::now();
    store.soft_delete(database.id, t0).unwrap();
    let policy = DatabaseNestedPolicy::new(resolver(&store), trashbin());
    let row = NestedObject::new(NestedKind::Row, database.id);
    let owner = Actor::user(owner);
    let reader = Actor::user(reader);

    let within = t0 + Duration::days(10);
    let list = |actor| Request::new(actor, Action::List, Method::Get).with_parent(database.id);
    let retrieve = |actor| Request::new(actor, Action::Retrieve, Method::Get);

    assert_eq!(check_collection_permission(&policy, &list(&reader).at(within)), Ok(Verdict::Deny));
    assert_eq!(
        check_object_permission(&policy, &retrieve(&reader).at(within), &row),
        Ok(Verdict::MaskedNotFound)
    );
    assert_eq!(check_collection_permission(&policy, &list(&owner).at(within)), Ok(Verdict::Allow));
    assert_eq!(
        check_object_permission(&policy, &retrieve(&owner).at(within), &row),
        Ok(Verdict::Allow)
    );

    let expired = t0 + Duration::days(40);
    assert_eq!(check_collection_permission(&policy, &list(&owner).at(expired)), Ok(Verdict::Deny));
    assert_eq!(
        check_object_permission(&policy, &retrieve(&owner).at(expired), &row),
        Ok(Verdict::MaskedNotFound)
    );
}

// --- Accesses & invitations ---

#[test]
fn access_creation_requires_parent_id() {
    let fx = fixture();
    let policy = ResourceAccessPolicy::new(resolver(&fx.store), trashbin());
    let actor = Actor::user(fx.owner);
    let request = Request::new(&actor, Action::Create, Method::Post);
    assert!(matches!(
        check_collection_permission(&policy, &request),
        Err(AuthzError::Configuration(_))
    ));
}

#[test]
fn access_creation_requires_privilege_and_reachable_role() {
    let mut fx = fixture();
    let admin = UserId::new();
    let editor = UserId::new();
    fx.store.grant(fx.doc.id, Principal::User(admin), Role::Admin);
    fx.store.grant(fx.doc.id, Principal::User(editor), Role::Editor);
    let policy = ResourceAccessPolicy::new(resolver(&fx.store), trashbin());

    let admin_actor = Actor::user(admin);
    let editor_actor = Actor::user(editor);
    let grant_editor = Request::new(&admin_actor, Action::Create, Method::Post)
        .with_parent(fx.doc.id)
        .with_role(Role::Editor);
    let grant_owner = Request::new(&admin_actor, Action::Create, Method::Post)
        .with_parent(fx.doc.id)
        .with_role(Role::Owner);
    let by_editor = Request::new(&editor_actor, Action::Create, Method::Post)
        .with_parent(fx.doc.id)
        .with_role(Role::Reader);
    assert_eq!(check_collection_permission(&policy, &grant_editor), Ok(Verdict::Allow));
    assert_eq!(check_collection_permission(&policy, &grant_owner), Ok(Verdict::Deny));
    assert_eq!(check_collection_permission(&policy, &by_editor), Ok(Verdict::Deny));
}

#[test]
fn access_update_is_bounded_by_set_role_to() {
    let mut fx = fixture();
    let admin = UserId::new();
    fx.store.grant(fx.doc.id, Principal::User(admin), Role::Admin);
    let reader_entry = fx.store.grant(fx.doc.id, Principal::User(UserId::new()), Role::Reader);
    let policy = ResourceAccessPolicy::new(resolver(&fx.store), trashbin());
    let actor = Actor::user(admin);

    let patch = Request::new(&actor, Action::PartialUpdate, Method::Patch);
    let to_editor = patch.clone().with_role(Role::Editor);
    let to_owner = patch.with_role(Role::Owner);
    assert_eq!(check_object_permission(&policy, &to_editor, &reader_entry), Ok(Verdict::Allow));
    assert_eq!(check_object_permission(&policy, &to_owner, &reader_entry), Ok(Verdict::Deny));

    let stranger = Actor::user(UserId::new());
    let peek = Request::new(&stranger, Action::Retrieve, Method::Get);
    assert_eq!(check_object_permission(&policy, &peek, &reader_entry), Ok(Verdict::MaskedNotFound));
}

#[test]
fn accesses_of_a_trashed_resource_are_frozen() {
    let mut fx = fixture();
    let admin = UserId::new();
    fx.store.grant(fx.doc.id, Principal::User(admin), Role::Admin);
    let reader_entry = fx.store.grant(fx.doc.id, Principal::User(UserId::new()), Role::Reader);
    let t0 = Utc::now();
    fx.store.soft_delete(fx.doc.id, t0).unwrap();
    let policy = ResourceAccessPolicy::new(resolver(&fx.store), trashbin());
    let owner = Actor::user(fx.owner);
    let admin = Actor::user(admin);

    // Same answer as for a resource that doesn't exist.
    let expired = t0 + Duration::days(40);
    let create = Request::new(&owner, Action::Create, Method::Post)
        .with_parent(fx.doc.id)
        .with_role(Role::Reader)
        .at(expired);
    let create_on_ghost = Request::new(&owner, Action::Create, Method::Post)
        .with_parent(ResourceId::new())
        .with_role(Role::Reader)
        .at(expired);
    assert_eq!(check_collection_permission(&policy, &create), Ok(Verdict::Deny));
    assert_eq!(check_collection_permission(&policy, &create_on_ghost), Ok(Verdict::Deny));

    let within = t0 + Duration::days(10);
    let owner_reads = Request::new(&owner, Action::Retrieve, Method::Get).at(within);
    let owner_promotes = Request::new(&owner, Action::PartialUpdate, Method::Patch)
        .with_role(Role::Editor)
        .at(within);
    let admin_reads = Request::new(&admin, Action::Retrieve, Method::Get).at(within);
    assert_eq!(check_object_permission(&policy, &owner_reads, &reader_entry), Ok(Verdict::Allow));
    assert_eq!(check_object_permission(&policy, &owner_promotes, &reader_entry), Ok(Verdict::Deny));
    assert_eq!(
        check_object_permission(&policy, &admin_reads, &reader_entry),
        Ok(Verdict::MaskedNotFound)
    );

    let owner_reads_late = Request::new(&owner, Action::Retrieve, Method::Get).at(expired);
    assert_eq!(
        check_object_permission(&policy, &owner_reads_late, &reader_entry),
        Ok(Verdict::MaskedNotFound)
    );

    let invitations = InvitationPolicy::new(resolver(&fx.store));
    let invite =
        Request::new(&owner, Action::Create, Method::Post).with_parent(fx.doc.id).at(within);
    assert_eq!(check_collection_permission(&invitations, &invite), Ok(Verdict::Deny));
}

#[test]
fn invitation_creation_needs_direct_privileged_entry() {
    let mut fx = fixture();
    let child =
        fx.store.create_resource(ResourceKind::Document, fx.owner, Some(fx.doc.id)).unwrap();
    let admin = UserId::new();
    fx.store.grant(fx.doc.id, Principal::Team(TeamId::new("leads")), Role::Admin);
    let policy = InvitationPolicy::new(resolver(&fx.store));
    let actor = Actor::user(admin).with_teams(["leads"]);

    let on_doc = Request::new(&actor, Action::Create, Method::Post).with_parent(fx.doc.id);
    let on_child = Request::new(&actor, Action::Create, Method::Post).with_parent(child.id);
    let owner_invite = on_doc.clone().with_role(Role::Owner);
    let missing = Request::new(&actor, Action::Create, Method::Post);
    let listing = Request::new(&actor, Action::List, Method::Get);

    assert_eq!(check_collection_permission(&policy, &on_doc), Ok(Verdict::Allow));
    assert_eq!(check_collection_permission(&policy, &on_child), Ok(Verdict::Deny));
    assert_eq!(check_collection_permission(&policy, &owner_invite), Ok(Verdict::Deny));
    assert_eq!(check_collection_permission(&policy, &listing), Ok(Verdict::Allow));
    assert!(matches!(
        check_collection_permission(&policy, &missing),
        Err(AuthzError::Configuration(_))
    ));
}

#[test]
fn invitation_objects_are_managed_by_privileged_actors() {
    let mut fx = fixture();
    let invitation = Invitation::new(fx.doc.id, "guest@example.com", Role::Reader, Some(fx.owner));
    let editor = UserId::new();
    fx.store.grant(fx.doc.id, Principal::User(editor), Role::Editor);
    let policy = InvitationPolicy::new(resolver(&fx.store));

    let owner = Actor::user(fx.owner);
    let editor = Actor::user(editor);
    let destroy_by_owner = Request::new(&owner, Action::Destroy, Method::Delete);
    let retrieve_by_editor = Request::new(&editor, Action::Retrieve, Method::Get);
    assert_eq!(
        check_object_permission(&policy, &destroy_by_owner, &invitation),
        Ok(Verdict::Allow)
    );
    assert_eq!(
        check_object_permission(&policy, &retrieve_by_editor, &invitation),
        Ok(Verdict::MaskedNotFound)
    );
}

// --- Pipeline ---

#[test]
fn authorize_skips_loading_when_coarse_check_fails() {
    let fx = fixture();
    let policy = DocumentPolicy::new(resolver(&fx.store), trashbin());
    let anonymous = Actor::anonymous();
    let request = Request::new(&anonymous, Action::Create, Method::Post);
    let mut loaded = false;
    let verdict = authorize(&policy, &request, || {
        loaded = true;
        Ok(Some(fx.doc.clone()))
    });
    assert_eq!(verdict, Ok(Verdict::Deny));
    assert!(!loaded);
}

#[test]
fn authorize_masks_missing_objects() {
    let fx = fixture();
    let policy = DocumentPolicy::new(resolver(&fx.store), trashbin());
    let actor = Actor::user(fx.owner);
    let request = Request::new(&actor, Action::Retrieve, Method::Get);
    assert_eq!(authorize(&policy, &request, || Ok(None)), Ok(Verdict::MaskedNotFound));
    assert_eq!(
        authorize(&policy, &request, || Ok(Some(fx.doc.clone()))),
        Ok(Verdict::Allow)
    );
}

#[test]
fn store_failure_is_propagated() {
    let fx = fixture();
    fx.store.set_unavailable(true);
    let policy = DocumentPolicy::new(resolver(&fx.store), trashbin());
    let actor = Actor::user(fx.owner);
    let request = Request::new(&actor, Action::Retrieve, Method::Get);
    assert!(matches!(
        check_object_permission(&policy, &request, &fx.doc),
        Err(AuthzError::Store(StoreError::Unavailable(_)))
    ));
}
