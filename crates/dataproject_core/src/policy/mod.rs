//! Access decisions for data projects.
//!
//! # Invariants
//! - Policies are pure: no I/O, no side effects.
//! - Callers must never expose a denial differently from a missing record.

pub mod access;
