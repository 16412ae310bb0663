//! Experiment lifecycle service.
//!
//! # Responsibility
//! - Provide create/record/complete/reopen/review/delete use-cases.
//! - Delegate persistence to repository implementations.
//! - Expose the record snapshot consumed by the analytics engine.
//!
//! # Invariants
//! - Every mutation takes an injected `now_ms`; the service never reads the
//!   system clock.
//! - Recording twice on the same day updates the existing entry in place.
//! - A locked review rejects further edits until the experiment is reopened.

use crate::model::experiment::{ExperimentId, ExperimentRecord, LogEntryId, Mood};
use crate::repo::experiment_repo::{ExperimentRepository, RepoError, RepoResult};
use chrono::NaiveDate;
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Service error for experiment use-cases.
#[derive(Debug)]
pub enum ServiceError {
    /// Target experiment does not exist.
    NotFound(ExperimentId),
    /// Review edits are rejected while the review is locked.
    ReviewLocked(ExperimentId),
    /// Review operations require a saved review.
    ReviewMissing(ExperimentId),
    /// Persistence-layer failure.
    Repo(RepoError),
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(id) => write!(f, "experiment not found: {id}"),
            Self::ReviewLocked(id) => write!(f, "review is locked for experiment {id}"),
            Self::ReviewMissing(id) => write!(f, "no review saved for experiment {id}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(id) => Self::NotFound(id),
            other => Self::Repo(other),
        }
    }
}

/// Request model for creating an experiment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreateExperimentRequest {
    /// Non-empty display title.
    pub title: String,
    /// Optional free-text category.
    pub category: Option<String>,
    /// Optional free-text subcategory.
    pub subcategory: Option<String>,
}

/// Use-case service wrapper for experiment lifecycle operations.
pub struct ExperimentService<R: ExperimentRepository> {
    repo: R,
}

impl<R: ExperimentRepository> ExperimentService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Creates a new active experiment.
    ///
    /// # Contract
    /// - `created_at == updated_at == now_ms`.
    /// - Returns the persisted record.
    pub fn create_experiment(
        &mut self,
        request: &CreateExperimentRequest,
        now_ms: i64,
    ) -> RepoResult<ExperimentRecord> {
        let mut record = ExperimentRecord::new(request.title.clone(), now_ms);
        record.category = request.category.clone();
        record.subcategory = request.subcategory.clone();

        let id = self.repo.create_experiment(&record)?;
        info!("event=experiment_create module=service status=ok id={id}");
        Ok(record)
    }

    /// Saves the daily log for `date`, updating in place when one exists.
    ///
    /// # Contract
    /// - Upsert-by-day: a second save on the same day overwrites note/mood
    ///   and keeps the entry id.
    /// - Bumps `updated_at` to `now_ms`.
    pub fn record_day(
        &mut self,
        id: ExperimentId,
        date: NaiveDate,
        note: impl Into<String>,
        mood: Option<Mood>,
        now_ms: i64,
    ) -> Result<LogEntryId, ServiceError> {
        let mut record = self.load(id)?;
        let entry_id = record.log_day(date, note, mood, now_ms);
        self.repo.update_experiment(&record)?;
        info!("event=record_day module=service status=ok id={id} date={date}");
        Ok(entry_id)
    }

    /// Completes an active experiment, stamping `completed_at = now_ms`.
    pub fn complete_experiment(
        &mut self,
        id: ExperimentId,
        now_ms: i64,
    ) -> Result<ExperimentRecord, ServiceError> {
        let mut record = self.load(id)?;
        record.complete(now_ms);
        self.repo.update_experiment(&record)?;
        info!("event=experiment_complete module=service status=ok id={id}");
        Ok(record)
    }

    /// Reopens a completed experiment, clearing `completed_at` and
    /// unlocking its review.
    pub fn reopen_experiment(
        &mut self,
        id: ExperimentId,
        now_ms: i64,
    ) -> Result<ExperimentRecord, ServiceError> {
        let mut record = self.load(id)?;
        record.reopen(now_ms);
        self.repo.update_experiment(&record)?;
        info!("event=experiment_reopen module=service status=ok id={id}");
        Ok(record)
    }

    /// Saves review answers for an experiment.
    ///
    /// # Errors
    /// - `ReviewLocked` when the existing review has been locked.
    pub fn save_review(
        &mut self,
        id: ExperimentId,
        outcome: impl Into<String>,
        learned: impl Into<String>,
        next_step: impl Into<String>,
        now_ms: i64,
    ) -> Result<ExperimentRecord, ServiceError> {
        let mut record = self.load(id)?;
        if record.review.as_ref().is_some_and(|review| review.locked) {
            return Err(ServiceError::ReviewLocked(id));
        }
        record.save_review(outcome, learned, next_step, now_ms);
        self.repo.update_experiment(&record)?;
        info!("event=review_save module=service status=ok id={id}");
        Ok(record)
    }

    /// Marks the saved review read-only.
    ///
    /// # Errors
    /// - `ReviewMissing` when no review has been saved yet.
    pub fn lock_review(
        &mut self,
        id: ExperimentId,
        now_ms: i64,
    ) -> Result<ExperimentRecord, ServiceError> {
        let mut record = self.load(id)?;
        if record.review.is_none() {
            return Err(ServiceError::ReviewMissing(id));
        }
        record.lock_review(now_ms);
        self.repo.update_experiment(&record)?;
        info!("event=review_lock module=service status=ok id={id}");
        Ok(record)
    }

    /// Hard-deletes an experiment and everything attached to it.
    pub fn delete_experiment(&mut self, id: ExperimentId) -> Result<(), ServiceError> {
        self.repo.delete_experiment(id)?;
        info!("event=experiment_delete module=service status=ok id={id}");
        Ok(())
    }

    /// Gets one experiment by stable id.
    pub fn get_experiment(&self, id: ExperimentId) -> RepoResult<Option<ExperimentRecord>> {
        self.repo.get_experiment(id)
    }

    /// Returns the current record snapshot for the analytics engine.
    ///
    /// Snapshot order is creation order; analytics re-sorts as needed.
    pub fn snapshot(&self) -> RepoResult<Vec<ExperimentRecord>> {
        self.repo.list_experiments()
    }

    fn load(&self, id: ExperimentId) -> Result<ExperimentRecord, ServiceError> {
        self.repo
            .get_experiment(id)?
            .ok_or(ServiceError::NotFound(id))
    }
}
