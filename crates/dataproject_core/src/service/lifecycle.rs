//! Data project lifecycle orchestration.
//!
//! # Responsibility
//! - Create, read, list, update and delete data projects across the local
//!   store and the remote repository service.
//! - Enforce ownership through an `AccessPolicy`.
//! - Compensate remote side effects when local persistence fails.
//!
//! # Invariants
//! - No local record is written unless the remote create succeeded.
//! - A failed local create triggers exactly one remote rollback.
//! - Hidden and missing projects produce the same `NotFound` error.
//! - `update` never calls the remote service.
//! - No call is retried.

use crate::model::data_project::{
    slugify, validate_name, DataProject, DataProjectId, DataProjectValidationError,
};
use crate::model::principal::Principal;
use crate::policy::access::{AccessPolicy, OwnerOnlyPolicy};
use crate::remote::{RemoteError, RemoteProject, RemoteRepositoryClient};
use crate::repo::project_repo::{DataProjectStore, RepoError};
use crate::service::error::{LifecycleError, PartialFailure, PartialFailureKind};
use log::{error, info, warn};

pub type LifecycleResult<T> = Result<T, LifecycleError>;

/// Observed state of a project's remote counterpart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteCounterpart {
    Present(RemoteProject),
    Missing,
}

/// Single entry point for data project CRUD.
///
/// Holds only immutable handles; every operation is independent.
pub struct ProjectLifecycleManager<S, R, P = OwnerOnlyPolicy> {
    store: S,
    remote: R,
    policy: P,
}

impl<S, R> ProjectLifecycleManager<S, R, OwnerOnlyPolicy>
where
    S: DataProjectStore,
    R: RemoteRepositoryClient,
{
    /// Creates a manager that grants access to owners only.
    pub fn new(store: S, remote: R) -> Self {
        Self::with_policy(store, remote, OwnerOnlyPolicy)
    }
}

impl<S, R, P> ProjectLifecycleManager<S, R, P>
where
    S: DataProjectStore,
    R: RemoteRepositoryClient,
    P: AccessPolicy,
{
    pub fn with_policy(store: S, remote: R, policy: P) -> Self {
        Self {
            store,
            remote,
            policy,
        }
    }

    /// Creates the remote repository, then the local record.
    ///
    /// # Errors
    /// - `Validation` for a blank, overlong or slug-less name, or when the
    ///   remote rejects parameters.
    /// - `Conflict` when the remote reports the name as taken.
    /// - `Unavailable` for any other remote failure.
    /// - `Storage` when the local write failed and the remote project was
    ///   rolled back.
    /// - `PartialFailure` when the rollback failed as well.
    pub fn create(
        &self,
        principal: &Principal,
        name: &str,
        description: &str,
    ) -> LifecycleResult<DataProject> {
        validate_name(name)?;
        let slug = slugify(name);
        if slug.is_empty() {
            return Err(DataProjectValidationError::EmptySlug.into());
        }

        let remote = self
            .remote
            .create_project(&principal.token, name, &slug, description)
            .map_err(|err| {
                warn!(
                    "event=project_create module=lifecycle status=error stage=remote owner_id={} slug={} error={}",
                    principal.person_id, slug, err
                );
                LifecycleError::from_remote_create(err)
            })?;

        let project =
            DataProject::from_remote(principal.person_id, name, description, slug, &remote);
        if let Err(store_err) = self.store.create(&project) {
            return Err(self.roll_back_create(principal, &project, store_err));
        }

        info!(
            "event=project_create module=lifecycle status=ok project_id={} owner_id={} remote_id={}",
            project.id, project.owner_id, project.remote_id
        );
        Ok(project)
    }

    /// Loads one project visible to `principal`.
    pub fn get(&self, principal: &Principal, id: DataProjectId) -> LifecycleResult<DataProject> {
        let project = self.load_visible(principal, id)?;
        info!(
            "event=project_get module=lifecycle status=ok project_id={} principal_id={}",
            id, principal.person_id
        );
        Ok(project)
    }

    /// Lists every project owned by `principal`.
    pub fn list(&self, principal: &Principal) -> LifecycleResult<Vec<DataProject>> {
        let projects = self
            .store
            .find_all_by_owner(principal.person_id)
            .map_err(LifecycleError::from)?
            .into_iter()
            .filter(|project| self.policy.can_view(principal, project))
            .collect::<Vec<_>>();
        info!(
            "event=project_list module=lifecycle status=ok principal_id={} count={}",
            principal.person_id,
            projects.len()
        );
        Ok(projects)
    }

    /// Replaces display name and description of an owned project.
    ///
    /// The remote project keeps its original name.
    pub fn update(
        &self,
        principal: &Principal,
        id: DataProjectId,
        name: &str,
        description: &str,
    ) -> LifecycleResult<DataProject> {
        let mut project = self.load_mutable(principal, id)?;
        validate_name(name)?;
        project.name = name.to_string();
        project.description = description.to_string();
        self.store.update(&project)?;

        info!(
            "event=project_update module=lifecycle status=ok project_id={} principal_id={}",
            id, principal.person_id
        );
        Ok(project)
    }

    /// Deletes the remote repository, then the local record.
    ///
    /// A remote project that is already gone counts as deleted.
    ///
    /// # Errors
    /// - `NotFound` when absent or not owned.
    /// - `Unavailable` when the remote delete failed; local record kept.
    /// - `PartialFailure` when the remote is gone but the local delete failed.
    pub fn delete(&self, principal: &Principal, id: DataProjectId) -> LifecycleResult<()> {
        let project = self.load_mutable(principal, id)?;

        match self.remote.delete_project(&principal.token, project.remote_id) {
            Ok(()) => {}
            Err(RemoteError::NotFound(remote_id)) => {
                info!(
                    "event=project_delete module=lifecycle status=remote_absent project_id={} remote_id={}",
                    id, remote_id
                );
            }
            Err(err) => {
                warn!(
                    "event=project_delete module=lifecycle status=error stage=remote project_id={} remote_id={} error={}",
                    id, project.remote_id, err
                );
                return Err(LifecycleError::Unavailable(err));
            }
        }

        // A concurrent delete that already removed the row leaves both sides gone.
        if let Err(store_err) = self
            .store
            .delete(id)
            .or_else(|err| match err {
                RepoError::NotFound(_) => Ok(()),
                other => Err(other),
            })
        {
            let detail = PartialFailure {
                kind: PartialFailureKind::LocalOrphaned,
                project_id: id,
                remote_id: project.remote_id,
                cause: store_err.to_string(),
                compensation_error: None,
            };
            error!(
                "event=project_partial_failure module=lifecycle status=error op=delete {}",
                detail
            );
            return Err(LifecycleError::PartialFailure(detail));
        }

        info!(
            "event=project_delete module=lifecycle status=ok project_id={} remote_id={}",
            id, project.remote_id
        );
        Ok(())
    }

    /// Checks whether the remote counterpart of a visible project exists.
    ///
    /// Read-only; used to reconcile after a `PartialFailure`.
    pub fn verify_remote(
        &self,
        principal: &Principal,
        id: DataProjectId,
    ) -> LifecycleResult<RemoteCounterpart> {
        let project = self.load_visible(principal, id)?;
        let counterpart = match self.remote.get_project(&principal.token, project.remote_id) {
            Ok(remote) => RemoteCounterpart::Present(remote),
            Err(RemoteError::NotFound(_)) => RemoteCounterpart::Missing,
            Err(err) => return Err(LifecycleError::Unavailable(err)),
        };

        let status = match counterpart {
            RemoteCounterpart::Present(_) => "present",
            RemoteCounterpart::Missing => "missing",
        };
        info!(
            "event=project_verify_remote module=lifecycle status=ok project_id={} remote_id={} remote={}",
            id, project.remote_id, status
        );
        Ok(counterpart)
    }

    fn load_visible(
        &self,
        principal: &Principal,
        id: DataProjectId,
    ) -> LifecycleResult<DataProject> {
        match self.store.find_by_id(id)? {
            Some(project) if self.policy.can_view(principal, &project) => Ok(project),
            _ => Err(LifecycleError::NotFound(id)),
        }
    }

    fn load_mutable(
        &self,
        principal: &Principal,
        id: DataProjectId,
    ) -> LifecycleResult<DataProject> {
        let project = self.load_visible(principal, id)?;
        if !self.policy.can_mutate(principal, &project) {
            return Err(LifecycleError::NotFound(id));
        }
        Ok(project)
    }

    fn roll_back_create(
        &self,
        principal: &Principal,
        project: &DataProject,
        store_err: RepoError,
    ) -> LifecycleError {
        warn!(
            "event=project_rollback module=lifecycle status=start project_id={} remote_id={} cause={}",
            project.id, project.remote_id, store_err
        );

        let compensation = match self
            .remote
            .delete_project(&principal.token, project.remote_id)
        {
            Ok(()) | Err(RemoteError::NotFound(_)) => None,
            Err(err) => Some(err),
        };

        match compensation {
            None => {
                info!(
                    "event=project_rollback module=lifecycle status=ok project_id={} remote_id={}",
                    project.id, project.remote_id
                );
                LifecycleError::Storage(store_err)
            }
            Some(rollback_err) => {
                let detail = PartialFailure {
                    kind: PartialFailureKind::RemoteOrphaned,
                    project_id: project.id,
                    remote_id: project.remote_id,
                    cause: store_err.to_string(),
                    compensation_error: Some(rollback_err.to_string()),
                };
                error!(
                    "event=project_partial_failure module=lifecycle status=error op=create {}",
                    detail
                );
                LifecycleError::PartialFailure(detail)
            }
        }
    }
}
