#![allow(dead_code)]

use dataproject_core::{
    DataProject, DataProjectId, DataProjectStore, PersonId, Principal, RemoteError,
    RemoteProject, RemoteRepositoryClient, RemoteResult, RepoError, RepoResult,
    SqliteDataProjectStore,
};
use std::cell::{Cell, RefCell};
use std::collections::BTreeSet;
use uuid::Uuid;

/// One call observed by `FakeRemote`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteCall {
    Create { name: String, path: String },
    Delete(i64),
    Get(i64),
}

/// In-process remote service that records calls and can inject failures.
pub struct FakeRemote {
    next_id: Cell<i64>,
    existing: RefCell<BTreeSet<i64>>,
    calls: RefCell<Vec<RemoteCall>>,
    create_failure: RefCell<Option<RemoteError>>,
    delete_failure: RefCell<Option<RemoteError>>,
    get_failure: RefCell<Option<RemoteError>>,
}

impl FakeRemote {
    pub fn new() -> Self {
        Self {
            next_id: Cell::new(100),
            existing: RefCell::new(BTreeSet::new()),
            calls: RefCell::new(Vec::new()),
            create_failure: RefCell::new(None),
            delete_failure: RefCell::new(None),
            get_failure: RefCell::new(None),
        }
    }

    pub fn fail_create_with(&self, err: RemoteError) {
        *self.create_failure.borrow_mut() = Some(err);
    }

    pub fn fail_delete_with(&self, err: RemoteError) {
        *self.delete_failure.borrow_mut() = Some(err);
    }

    pub fn fail_get_with(&self, err: RemoteError) {
        *self.get_failure.borrow_mut() = Some(err);
    }

    /// Registers a remote project created outside the manager.
    pub fn insert_existing(&self, remote_id: i64) {
        self.existing.borrow_mut().insert(remote_id);
    }

    /// Removes a remote project behind the manager's back.
    pub fn forget(&self, remote_id: i64) {
        self.existing.borrow_mut().remove(&remote_id);
    }

    pub fn exists(&self, remote_id: i64) -> bool {
        self.existing.borrow().contains(&remote_id)
    }

    pub fn calls(&self) -> Vec<RemoteCall> {
        self.calls.borrow().clone()
    }

    pub fn delete_calls(&self) -> Vec<i64> {
        self.calls
            .borrow()
            .iter()
            .filter_map(|call| match call {
                RemoteCall::Delete(remote_id) => Some(*remote_id),
                _ => None,
            })
            .collect()
    }
}

impl RemoteRepositoryClient for FakeRemote {
    fn create_project(
        &self,
        _token: &str,
        name: &str,
        path: &str,
        _description: &str,
    ) -> RemoteResult<RemoteProject> {
        self.calls.borrow_mut().push(RemoteCall::Create {
            name: name.to_string(),
            path: path.to_string(),
        });
        if let Some(err) = self.create_failure.borrow().clone() {
            return Err(err);
        }

        let remote_id = self.next_id.get();
        self.next_id.set(remote_id + 1);
        self.existing.borrow_mut().insert(remote_id);
        Ok(RemoteProject {
            remote_id,
            url: format!("https://gitlab.example.com/owner/{path}"),
            namespace: "owner".to_string(),
            project_name: path.to_string(),
        })
    }

    fn delete_project(&self, _token: &str, remote_id: i64) -> RemoteResult<()> {
        self.calls.borrow_mut().push(RemoteCall::Delete(remote_id));
        if let Some(err) = self.delete_failure.borrow().clone() {
            return Err(err);
        }
        if self.existing.borrow_mut().remove(&remote_id) {
            Ok(())
        } else {
            Err(RemoteError::NotFound(remote_id))
        }
    }

    fn get_project(&self, _token: &str, remote_id: i64) -> RemoteResult<RemoteProject> {
        self.calls.borrow_mut().push(RemoteCall::Get(remote_id));
        if let Some(err) = self.get_failure.borrow().clone() {
            return Err(err);
        }
        if !self.exists(remote_id) {
            return Err(RemoteError::NotFound(remote_id));
        }
        Ok(RemoteProject {
            remote_id,
            url: format!("https://gitlab.example.com/owner/{remote_id}"),
            namespace: "owner".to_string(),
            project_name: remote_id.to_string(),
        })
    }
}

/// SQLite store wrapper that can fail selected writes.
pub struct FlakyStore<'conn> {
    inner: SqliteDataProjectStore<'conn>,
    pub fail_create: Cell<bool>,
    pub fail_update: Cell<bool>,
    pub fail_delete: Cell<bool>,
}

impl<'conn> FlakyStore<'conn> {
    pub fn new(inner: SqliteDataProjectStore<'conn>) -> Self {
        Self {
            inner,
            fail_create: Cell::new(false),
            fail_update: Cell::new(false),
            fail_delete: Cell::new(false),
        }
    }
}

fn injected(op: &str) -> RepoError {
    RepoError::InvalidData(format!("injected {op} failure"))
}

impl DataProjectStore for FlakyStore<'_> {
    fn create(&self, project: &DataProject) -> RepoResult<DataProjectId> {
        if self.fail_create.get() {
            return Err(injected("create"));
        }
        self.inner.create(project)
    }

    fn find_by_id(&self, id: DataProjectId) -> RepoResult<Option<DataProject>> {
        self.inner.find_by_id(id)
    }

    fn find_all_by_owner(&self, owner_id: PersonId) -> RepoResult<Vec<DataProject>> {
        self.inner.find_all_by_owner(owner_id)
    }

    fn update(&self, project: &DataProject) -> RepoResult<()> {
        if self.fail_update.get() {
            return Err(injected("update"));
        }
        self.inner.update(project)
    }

    fn delete(&self, id: DataProjectId) -> RepoResult<()> {
        if self.fail_delete.get() {
            return Err(injected("delete"));
        }
        self.inner.delete(id)
    }
}

pub fn principal(token: &str) -> Principal {
    Principal::new(Uuid::new_v4(), token)
}

/// Builds a project the way the API tests seed rows directly.
pub fn seeded_project(
    owner_id: PersonId,
    slug: &str,
    group: &str,
    gitlab_project: &str,
    remote_id: i64,
) -> DataProject {
    DataProject {
        id: Uuid::new_v4(),
        slug: slug.to_string(),
        url: format!("www.{slug}.com"),
        name: format!("Test {slug}"),
        description: String::new(),
        owner_id,
        remote_namespace: group.to_string(),
        remote_project_name: gitlab_project.to_string(),
        remote_id,
        experiments: Vec::new(),
    }
}
