//! Use-case services over repository implementations.
//!
//! # Responsibility
//! - Provide stable lifecycle entry points for core callers.
//! - Keep mutation semantics (upsert-by-day, complete/reopen, review lock)
//!   in one place.
//!
//! # Invariants
//! - Services never bypass repository validation/persistence contracts.
//! - Services never read ambient time; callers inject `now_ms`.

pub mod experiment_service;
