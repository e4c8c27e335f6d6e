//! Domain model for data projects and the principals that own them.
//!
//! # Responsibility
//! - Define the canonical `DataProject` record shared by store, remote and
//!   lifecycle layers.
//! - Define the explicit caller identity (`Principal`) passed to every
//!   lifecycle operation.
//!
//! # Invariants
//! - Every data project is identified by a stable `DataProjectId`.
//! - Every data project has exactly one owner, fixed at creation.

pub mod data_project;
pub mod principal;
