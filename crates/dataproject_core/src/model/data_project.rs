//! Data project domain model.
//!
//! # Responsibility
//! - Define the local record of a project whose repository lives on the
//!   remote Git service.
//! - Provide validation and slug derivation used by every write path.
//!
//! # Invariants
//! - `id` is stable and never reused for another project.
//! - Remote fields (`url`, `remote_namespace`, `remote_project_name`,
//!   `remote_id`) are copied from a successful remote creation and never
//!   change afterwards.
//! - `owner_id` never changes.

use crate::model::principal::PersonId;
use crate::remote::RemoteProject;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier of a data project.
pub type DataProjectId = Uuid;

/// Identifier of an experiment attached to a data project.
pub type ExperimentId = Uuid;

/// Upper bound for display names, matching the remote service limit.
pub const MAX_NAME_CHARS: usize = 255;

/// Local record of a data project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataProject {
    pub id: DataProjectId,
    /// URL-safe identifier, unique within `remote_namespace`.
    pub slug: String,
    /// Web address of the remote repository.
    pub url: String,
    /// Display name. Mutable via lifecycle `update` only.
    pub name: String,
    pub description: String,
    pub owner_id: PersonId,
    pub remote_namespace: String,
    pub remote_project_name: String,
    /// Numeric id assigned by the remote service.
    pub remote_id: i64,
    /// Owned by experiment management; core never mutates this list.
    pub experiments: Vec<ExperimentId>,
}

/// Validation failures for `DataProject` fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataProjectValidationError {
    EmptyName,
    NameTooLong { chars: usize },
    EmptySlug,
    EmptyUrl,
    InvalidRemoteId(i64),
}

impl Display for DataProjectValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyName => write!(f, "project name must not be empty"),
            Self::NameTooLong { chars } => write!(
                f,
                "project name has {chars} characters; at most {MAX_NAME_CHARS} allowed"
            ),
            Self::EmptySlug => write!(
                f,
                "project name must contain at least one ASCII letter or digit"
            ),
            Self::EmptyUrl => write!(f, "project url must not be empty"),
            Self::InvalidRemoteId(value) => {
                write!(f, "remote project id must be positive, got {value}")
            }
        }
    }
}

impl Error for DataProjectValidationError {}

impl DataProject {
    /// Builds a fresh project from a successful remote creation.
    ///
    /// # Invariants
    /// - A new `id` is generated.
    /// - `experiments` starts empty.
    pub fn from_remote(
        owner_id: PersonId,
        name: impl Into<String>,
        description: impl Into<String>,
        slug: impl Into<String>,
        remote: &RemoteProject,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            slug: slug.into(),
            url: remote.url.clone(),
            name: name.into(),
            description: description.into(),
            owner_id,
            remote_namespace: remote.namespace.clone(),
            remote_project_name: remote.project_name.clone(),
            remote_id: remote.remote_id,
            experiments: Vec::new(),
        }
    }

    /// Returns whether `person_id` owns this project.
    pub fn is_owned_by(&self, person_id: PersonId) -> bool {
        self.owner_id == person_id
    }

    /// Checks field-level invariants before persistence.
    pub fn validate(&self) -> Result<(), DataProjectValidationError> {
        validate_name(&self.name)?;
        if self.slug.trim().is_empty() {
            return Err(DataProjectValidationError::EmptySlug);
        }
        if self.url.trim().is_empty() {
            return Err(DataProjectValidationError::EmptyUrl);
        }
        if self.remote_id <= 0 {
            return Err(DataProjectValidationError::InvalidRemoteId(self.remote_id));
        }
        Ok(())
    }
}

/// Validates a display name as accepted by create/update.
pub fn validate_name(name: &str) -> Result<(), DataProjectValidationError> {
    if name.trim().is_empty() {
        return Err(DataProjectValidationError::EmptyName);
    }
    let chars = name.chars().count();
    if chars > MAX_NAME_CHARS {
        return Err(DataProjectValidationError::NameTooLong { chars });
    }
    Ok(())
}

/// Derives a URL-safe slug from a display name.
///
/// Rules:
/// - ASCII letters are lowercased, ASCII digits kept.
/// - Every run of other characters becomes one `-`.
/// - Leading and trailing `-` are removed.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_dash = false;
    for ch in name.chars() {
        if ch.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(ch.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }
    slug
}
