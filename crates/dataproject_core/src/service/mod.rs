//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate store and remote calls into lifecycle operations.
//! - Keep API and CLI layers decoupled from storage and transport details.

pub mod error;
pub mod lifecycle;
