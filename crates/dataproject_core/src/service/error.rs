//! Lifecycle error taxonomy.
//!
//! # Invariants
//! - Every store or remote failure maps to exactly one `LifecycleError`.
//! - Ownership denials are reported as `NotFound`, never as a distinct kind.

use crate::model::data_project::{DataProjectId, DataProjectValidationError};
use crate::remote::RemoteError;
use crate::repo::project_repo::RepoError;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Which store was left holding a record the other store no longer has.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartialFailureKind {
    /// Remote project exists without a local record: local create failed
    /// and the compensating remote delete failed too.
    RemoteOrphaned,
    /// Local record exists without a remote project: remote delete
    /// succeeded and the local delete failed.
    LocalOrphaned,
}

impl PartialFailureKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::RemoteOrphaned => "remote_orphaned",
            Self::LocalOrphaned => "local_orphaned",
        }
    }
}

/// Drift between local and remote state that needs reconciliation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartialFailure {
    pub kind: PartialFailureKind,
    pub project_id: DataProjectId,
    pub remote_id: i64,
    /// Failure that started the inconsistency.
    pub cause: String,
    /// Failure of the compensating action, if one was attempted.
    pub compensation_error: Option<String>,
}

impl Display for PartialFailure {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} project_id={} remote_id={} cause={}",
            self.kind.as_str(),
            self.project_id,
            self.remote_id,
            self.cause
        )?;
        if let Some(compensation) = &self.compensation_error {
            write!(f, " compensation_error={compensation}")?;
        }
        Ok(())
    }
}

/// Error returned by every `ProjectLifecycleManager` operation.
#[derive(Debug)]
pub enum LifecycleError {
    Validation(String),
    Conflict(String),
    NotFound(DataProjectId),
    Unavailable(RemoteError),
    Storage(RepoError),
    PartialFailure(PartialFailure),
}

impl LifecycleError {
    /// HTTP status the API surface responds with.
    pub fn http_status(&self) -> u16 {
        match self {
            Self::Validation(_) | Self::Conflict(_) => 400,
            Self::NotFound(_) => 404,
            Self::Unavailable(_) => 503,
            Self::Storage(_) | Self::PartialFailure(_) => 500,
        }
    }

    /// Stable machine-readable code for logs and error bodies.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation_error",
            Self::Conflict(_) => "conflict_error",
            Self::NotFound(_) => "not_found",
            Self::Unavailable(_) => "unavailable",
            Self::Storage(_) => "storage_error",
            Self::PartialFailure(_) => "partial_failure",
        }
    }

    /// Maps a failed remote create to its domain error.
    pub(crate) fn from_remote_create(err: RemoteError) -> Self {
        match err {
            RemoteError::Conflict(message) => Self::Conflict(message),
            RemoteError::InvalidParameters(message) => Self::Validation(message),
            other => Self::Unavailable(other),
        }
    }
}

impl Display for LifecycleError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(message) => write!(f, "invalid data project: {message}"),
            Self::Conflict(message) => write!(f, "data project already exists: {message}"),
            Self::NotFound(id) => write!(f, "data project not found: {id}"),
            Self::Unavailable(err) => write!(f, "{err}"),
            Self::Storage(err) => write!(f, "data project storage failed: {err}"),
            Self::PartialFailure(detail) => {
                write!(f, "data project left inconsistent: {detail}")
            }
        }
    }
}

impl Error for LifecycleError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Unavailable(err) => Some(err),
            Self::Storage(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DataProjectValidationError> for LifecycleError {
    fn from(value: DataProjectValidationError) -> Self {
        Self::Validation(value.to_string())
    }
}

impl From<RepoError> for LifecycleError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(id) => Self::NotFound(id),
            RepoError::Validation(err) => Self::Validation(err.to_string()),
            other => Self::Storage(other),
        }
    }
}
