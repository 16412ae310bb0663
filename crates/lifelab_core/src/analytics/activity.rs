//! Activity predicate shared by every analytics component.
//!
//! # Responsibility
//! - Decide whether a record was "touched" on a given calendar day.
//!
//! # Invariants
//! - This predicate is the single source of truth for day-boundary logic;
//!   other components must reuse it rather than re-derive it.

use super::AnalyticsContext;
use crate::model::experiment::ExperimentRecord;
use chrono::NaiveDate;

/// Returns whether anything happened to `record` on `day`.
///
/// True iff the record was created that day, has a log entry dated that day,
/// or was completed that day (all in the context's local time zone).
pub fn touched_on(record: &ExperimentRecord, day: NaiveDate, ctx: &AnalyticsContext) -> bool {
    if ctx.local_day(record.created_at) == day {
        return true;
    }
    if record.logs.iter().any(|entry| entry.date == day) {
        return true;
    }
    record
        .completed_at
        .is_some_and(|instant| ctx.local_day(instant) == day)
}

/// Returns whether any record in the snapshot was touched on `day`.
pub fn any_touched_on(
    snapshot: &[ExperimentRecord],
    day: NaiveDate,
    ctx: &AnalyticsContext,
) -> bool {
    snapshot.iter().any(|record| touched_on(record, day, ctx))
}
