//! Local persistence for data projects.
//!
//! # Responsibility
//! - Define the store contract the lifecycle manager consumes.
//! - Keep SQL details out of lifecycle orchestration.
//!
//! # Invariants
//! - Write paths run `DataProject::validate()` before SQL mutations.
//! - Each store call is atomic; no partial writes are observable.

pub mod project_repo;
