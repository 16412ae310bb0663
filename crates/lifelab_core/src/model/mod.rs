//! Domain model for tracked experiments and the external category catalog.
//!
//! # Responsibility
//! - Define canonical data structures used by core business logic.
//! - Keep one record shape shared by persistence and analytics.
//!
//! # Invariants
//! - Every domain object is identified by a stable `ExperimentId`.
//! - Deletion is a hard delete; there is no tombstone state.

pub mod catalog;
pub mod experiment;
