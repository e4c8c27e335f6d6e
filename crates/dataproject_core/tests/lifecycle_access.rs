mod common;

use common::{principal, seeded_project, FakeRemote, RemoteCall};
use dataproject_core::db::open_db_in_memory;
use dataproject_core::{
    DataProjectDto, DataProjectStore, LifecycleError, ProjectLifecycleManager,
    SqliteDataProjectStore,
};
use uuid::Uuid;

#[test]
fn create_then_get_returns_equal_project() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteDataProjectStore::new(&conn);
    let remote = FakeRemote::new();
    let manager = ProjectLifecycleManager::new(&store, &remote);
    let alice = principal("alice-token");

    let created = manager
        .create(&alice, "test-project", "Test project")
        .unwrap();
    let loaded = manager.get(&alice, created.id).unwrap();

    assert_eq!(loaded, created);
    assert_eq!(created.owner_id, alice.person_id);
    assert_eq!(created.slug, "test-project");
    assert_eq!(created.description, "Test project");
    assert!(created.experiments.is_empty());
    assert!(remote.exists(created.remote_id));
    assert_eq!(
        remote.calls(),
        vec![RemoteCall::Create {
            name: "test-project".to_string(),
            path: "test-project".to_string(),
        }]
    );
}

#[test]
fn owner_scoped_listing_and_hidden_foreign_projects() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteDataProjectStore::new(&conn);
    let remote = FakeRemote::new();
    let alice = principal("alice");
    let bob = principal("bob");

    let project1 = seeded_project(alice.person_id, "slug-1", "group1", "project-1", 1);
    let project2 = seeded_project(alice.person_id, "slug-2", "group2", "project-2", 2);
    let project3 = seeded_project(bob.person_id, "slug-3", "group3", "project-3", 3);
    for project in [&project1, &project2, &project3] {
        store.create(project).unwrap();
        remote.insert_existing(project.remote_id);
    }

    let manager = ProjectLifecycleManager::new(&store, &remote);

    let listed = manager.list(&alice).unwrap();
    let slugs: Vec<&str> = listed.iter().map(|p| p.slug.as_str()).collect();
    assert_eq!(slugs, vec!["slug-1", "slug-2"]);

    let err = manager.get(&alice, project3.id).unwrap_err();
    assert!(matches!(err, LifecycleError::NotFound(id) if id == project3.id));

    let err = manager.delete(&alice, project3.id).unwrap_err();
    assert!(matches!(err, LifecycleError::NotFound(_)));
    assert!(remote.delete_calls().is_empty());

    assert!(store.find_by_id(project1.id).unwrap().is_some());
    assert!(store.find_by_id(project2.id).unwrap().is_some());
    assert!(store.find_by_id(project3.id).unwrap().is_some());
    assert!(remote.exists(3));
}

#[test]
fn foreign_and_missing_projects_are_indistinguishable() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteDataProjectStore::new(&conn);
    let remote = FakeRemote::new();
    let alice = principal("alice");
    let bob = principal("bob");
    let bobs = seeded_project(bob.person_id, "slug-3", "group3", "project-3", 3);
    store.create(&bobs).unwrap();

    let manager = ProjectLifecycleManager::new(&store, &remote);
    let missing = Uuid::new_v4();

    let foreign = manager.get(&alice, bobs.id).unwrap_err();
    let absent = manager.get(&alice, missing).unwrap_err();
    assert_eq!(foreign.http_status(), 404);
    assert_eq!(absent.http_status(), 404);
    assert_eq!(foreign.code(), absent.code());

    let err = manager
        .update(&alice, bobs.id, "hijacked", "")
        .unwrap_err();
    assert!(matches!(err, LifecycleError::NotFound(_)));
    assert_eq!(store.find_by_id(bobs.id).unwrap().unwrap().name, bobs.name);

    assert!(matches!(
        manager.verify_remote(&alice, bobs.id),
        Err(LifecycleError::NotFound(_))
    ));
    assert!(remote.calls().is_empty());
}

#[test]
fn list_is_empty_for_principal_without_projects() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteDataProjectStore::new(&conn);
    let remote = FakeRemote::new();
    let bob = principal("bob");
    store
        .create(&seeded_project(bob.person_id, "slug-3", "group3", "project-3", 3))
        .unwrap();

    let manager = ProjectLifecycleManager::new(&store, &remote);
    assert!(manager.list(&principal("carol")).unwrap().is_empty());
}

#[test]
fn update_changes_local_fields_only() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteDataProjectStore::new(&conn);
    let remote = FakeRemote::new();
    let manager = ProjectLifecycleManager::new(&store, &remote);
    let alice = principal("alice");

    let created = manager.create(&alice, "test-project", "Test project").unwrap();
    let calls_before = remote.calls().len();

    let updated = manager
        .update(&alice, created.id, "Renamed project", "New Test project")
        .unwrap();

    assert_eq!(updated.name, "Renamed project");
    assert_eq!(updated.description, "New Test project");
    assert_eq!(updated.slug, created.slug);
    assert_eq!(updated.remote_project_name, created.remote_project_name);
    assert_eq!(updated.url, created.url);
    assert_eq!(remote.calls().len(), calls_before);
    assert_eq!(manager.get(&alice, created.id).unwrap(), updated);

    let dto = DataProjectDto::from(&updated);
    assert_ne!(dto, DataProjectDto::from(&created));
    assert_eq!(dto.name, "Renamed project");
    assert_eq!(dto.description, "New Test project");
    assert_eq!(dto.gitlab_project, "test-project");
}

#[test]
fn owner_update_with_blank_name_is_validation_error() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteDataProjectStore::new(&conn);
    let remote = FakeRemote::new();
    let manager = ProjectLifecycleManager::new(&store, &remote);
    let alice = principal("alice");

    let created = manager.create(&alice, "test-project", "kept").unwrap();
    let err = manager.update(&alice, created.id, "  ", "").unwrap_err();

    assert!(matches!(err, LifecycleError::Validation(_)));
    assert_eq!(manager.get(&alice, created.id).unwrap(), created);
}

#[test]
fn foreign_update_with_blank_name_is_not_found() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteDataProjectStore::new(&conn);
    let remote = FakeRemote::new();
    let manager = ProjectLifecycleManager::new(&store, &remote);
    let alice = principal("alice");
    let bob = principal("bob");

    let bobs = manager.create(&bob, "bobs-project", "").unwrap();

    for name in ["", "   "] {
        let err = manager.update(&alice, bobs.id, name, "").unwrap_err();
        assert!(
            matches!(err, LifecycleError::NotFound(id) if id == bobs.id),
            "name={name:?}"
        );
        assert_eq!(err.http_status(), 404);
    }
    let missing = manager.update(&alice, Uuid::new_v4(), "", "").unwrap_err();
    assert!(matches!(missing, LifecycleError::NotFound(_)));
}

#[test]
fn owner_delete_removes_both_sides() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteDataProjectStore::new(&conn);
    let remote = FakeRemote::new();
    let manager = ProjectLifecycleManager::new(&store, &remote);
    let alice = principal("alice");

    let created = manager.create(&alice, "test-project", "").unwrap();
    manager.delete(&alice, created.id).unwrap();

    assert!(store.find_by_id(created.id).unwrap().is_none());
    assert!(!remote.exists(created.remote_id));
    assert!(matches!(
        manager.get(&alice, created.id),
        Err(LifecycleError::NotFound(_))
    ));
}
