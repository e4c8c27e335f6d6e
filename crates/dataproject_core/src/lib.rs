//! Core domain logic for data project lifecycle management.
//! This crate is the single source of truth for ownership and local/remote
//! consistency rules.

pub mod config;
pub mod db;
pub mod dto;
pub mod logging;
pub mod model;
pub mod policy;
pub mod remote;
pub mod repo;
pub mod service;

pub use config::{AppConfig, ConfigError, GitlabConfig};
pub use dto::{DataProjectDto, ErrorDto};
pub use logging::{default_log_level, init_logging, logging_status, LogTarget};
pub use model::data_project::{
    slugify, DataProject, DataProjectId, DataProjectValidationError, ExperimentId,
};
pub use model::principal::{PersonId, Principal};
pub use policy::access::{AccessPolicy, OwnerOnlyPolicy};
pub use remote::{
    GitlabRestClient, RemoteError, RemoteProject, RemoteRepositoryClient, RemoteResult,
};
pub use repo::project_repo::{DataProjectStore, RepoError, RepoResult, SqliteDataProjectStore};
pub use service::error::{LifecycleError, PartialFailure, PartialFailureKind};
pub use service::lifecycle::{LifecycleResult, ProjectLifecycleManager, RemoteCounterpart};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
