//! Remote repository service contracts.
//!
//! # Responsibility
//! - Define the capability core consumes from the external Git service.
//! - Classify remote failures into a small, stable error set.
//!
//! # Invariants
//! - Every remote call either returns a value or exactly one `RemoteError`.
//! - Implementations never retry on their own.
//!
//! # See also
//! - `gitlab` for the GitLab API v4 implementation.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod gitlab;

pub use gitlab::GitlabRestClient;

pub type RemoteResult<T> = Result<T, RemoteError>;

/// Coordinates of a project hosted by the remote service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteProject {
    pub remote_id: i64,
    pub url: String,
    pub namespace: String,
    pub project_name: String,
}

/// Failure reported by a remote repository call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteError {
    /// Name or path already taken in the target namespace.
    Conflict(String),
    /// Remote rejected the request parameters.
    InvalidParameters(String),
    /// Remote project does not exist (or is already gone).
    NotFound(i64),
    /// Transport failure, timeout, auth rejection or server error.
    Unavailable(String),
}

impl Display for RemoteError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Conflict(message) => write!(f, "remote conflict: {message}"),
            Self::InvalidParameters(message) => {
                write!(f, "remote rejected parameters: {message}")
            }
            Self::NotFound(remote_id) => write!(f, "remote project not found: {remote_id}"),
            Self::Unavailable(message) => write!(f, "remote service unavailable: {message}"),
        }
    }
}

impl Error for RemoteError {}

/// Project API of the external version-control provider.
pub trait RemoteRepositoryClient {
    /// Creates a project owned by the holder of `token`.
    fn create_project(
        &self,
        token: &str,
        name: &str,
        path: &str,
        description: &str,
    ) -> RemoteResult<RemoteProject>;

    /// Deletes a project. `NotFound` means it is already absent.
    fn delete_project(&self, token: &str, remote_id: i64) -> RemoteResult<()>;

    /// Fetches current coordinates of a project.
    fn get_project(&self, token: &str, remote_id: i64) -> RemoteResult<RemoteProject>;
}

impl<C: RemoteRepositoryClient + ?Sized> RemoteRepositoryClient for &C {
    fn create_project(
        &self,
        token: &str,
        name: &str,
        path: &str,
        description: &str,
    ) -> RemoteResult<RemoteProject> {
        (**self).create_project(token, name, path, description)
    }

    fn delete_project(&self, token: &str, remote_id: i64) -> RemoteResult<()> {
        (**self).delete_project(token, remote_id)
    }

    fn get_project(&self, token: &str, remote_id: i64) -> RemoteResult<RemoteProject> {
        (**self).get_project(token, remote_id)
    }
}
