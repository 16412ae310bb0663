//! Persistence contracts and SQLite implementations.
//!
//! # Responsibility
//! - Define repository traits consumed by the service layer.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - Write paths validate records before SQL mutations.
//! - Read paths reject invalid persisted state instead of masking it.

pub mod experiment_repo;
