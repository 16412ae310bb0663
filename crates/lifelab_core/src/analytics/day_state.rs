//! Home day-state classifier.
//!
//! # Responsibility
//! - Classify the record set into one of three Home states.
//! - Select "continue recording" candidates for the Home view.
//!
//! # Invariants
//! - Candidates are active records not touched today, sorted by `updated_at`
//!   descending with a stable tie-break on snapshot (creation) order.
//! - The section title depends only on the state, never on candidate content.

use super::activity::{any_touched_on, touched_on};
use super::AnalyticsContext;
use crate::model::experiment::ExperimentRecord;

/// Number of candidates surfaced in the Home preview.
pub const CONTINUE_PREVIEW_LEN: usize = 2;

/// Overall state of "today" across the whole record set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayState {
    /// No active experiments exist.
    NoActive,
    /// At least one record was touched today.
    UpdatedToday,
    /// Active experiments exist but nothing was touched today.
    ActiveNoUpdateToday,
}

impl DayState {
    /// Fixed title for the continue-recording section.
    ///
    /// The `UpdatedToday` wording is deliberately weakened: today's record
    /// already happened, so further recording is framed as optional.
    pub fn continue_section_title(self) -> &'static str {
        match self {
            DayState::NoActive => "Start an experiment",
            DayState::UpdatedToday => "More to record, if you like",
            DayState::ActiveNoUpdateToday => "Continue recording",
        }
    }
}

/// Classification result for the Home view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayClassification {
    /// Overall state of today.
    pub state: DayState,
    /// Active records not touched today, most recently updated first.
    pub continue_candidates: Vec<ExperimentRecord>,
}

impl DayClassification {
    /// First candidates shown on the Home view.
    pub fn preview(&self) -> &[ExperimentRecord] {
        let len = self.continue_candidates.len().min(CONTINUE_PREVIEW_LEN);
        &self.continue_candidates[..len]
    }
}

/// Classifies the snapshot for "today".
///
/// An empty snapshot yields `NoActive` with no candidates.
pub fn classify_day(snapshot: &[ExperimentRecord], ctx: &AnalyticsContext) -> DayClassification {
    let has_active = snapshot.iter().any(ExperimentRecord::is_active);
    let updated_today = any_touched_on(snapshot, ctx.today, ctx);

    let state = if !has_active {
        DayState::NoActive
    } else if updated_today {
        DayState::UpdatedToday
    } else {
        DayState::ActiveNoUpdateToday
    };

    let mut continue_candidates: Vec<ExperimentRecord> = snapshot
        .iter()
        .filter(|record| record.is_active() && !touched_on(record, ctx.today, ctx))
        .cloned()
        .collect();
    // Stable sort keeps snapshot order for equal timestamps.
    continue_candidates.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));

    DayClassification {
        state,
        continue_candidates,
    }
}
