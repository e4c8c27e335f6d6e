//! Wire types for the data project API surface.
//!
//! # Invariants
//! - JSON field names are snake_case and stable; `gitlab_*` names are kept
//!   for compatibility with existing clients.
//! - DTOs are plain projections; they never carry the owner's token.
//! - `name`/`description` are the local display fields changed by `PUT`;
//!   `gitlab_project` keeps the remote path fixed at creation.

use crate::model::data_project::{DataProject, DataProjectId, ExperimentId};
use crate::model::principal::PersonId;
use crate::service::error::LifecycleError;
use serde::{Deserialize, Serialize};

/// Response body for a single data project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataProjectDto {
    pub id: DataProjectId,
    pub slug: String,
    pub url: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub owner_id: PersonId,
    pub gitlab_group: String,
    pub gitlab_project: String,
    pub gitlab_id: i64,
    #[serde(default)]
    pub experiments: Vec<ExperimentId>,
}

impl From<&DataProject> for DataProjectDto {
    fn from(project: &DataProject) -> Self {
        Self {
            id: project.id,
            slug: project.slug.clone(),
            url: project.url.clone(),
            name: project.name.clone(),
            description: project.description.clone(),
            owner_id: project.owner_id,
            gitlab_group: project.remote_namespace.clone(),
            gitlab_project: project.remote_project_name.clone(),
            gitlab_id: project.remote_id,
            experiments: project.experiments.clone(),
        }
    }
}

impl From<DataProject> for DataProjectDto {
    fn from(project: DataProject) -> Self {
        Self::from(&project)
    }
}

/// Error body returned with a non-2xx status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorDto {
    pub status: u16,
    pub code: String,
    pub message: String,
}

impl From<&LifecycleError> for ErrorDto {
    fn from(err: &LifecycleError) -> Self {
        Self {
            status: err.http_status(),
            code: err.code().to_string(),
            message: err.to_string(),
        }
    }
}
