//! Calendar footprint engine.
//!
//! # Responsibility
//! - Compute the activity date range across the whole record set.
//! - Provide clamped week-window navigation bounds.
//! - Compute per-day intensity for the displayed week.
//!
//! # Invariants
//! - The week window never extends into a future week beyond the current
//!   one, even when activity instants lie in the future.
//! - Navigation always clamps into `[min_offset, max_offset]`.
//! - Intensity counts distinct records; a record matching both the active
//!   and completed conditions still counts once.

use super::AnalyticsContext;
use crate::model::experiment::ExperimentRecord;
use chrono::{Datelike, Days, NaiveDate};

/// Visual cap for intensity dots; the raw count is unbounded.
pub const INTENSITY_DOT_CAP: u32 = 5;

/// Returns the `(earliest, latest)` activity instants in epoch ms.
///
/// Considers every record's created/updated/completed instants and the local
/// midnight of every log entry's date. An empty snapshot pins both bounds to
/// today's local midnight.
pub fn activity_range(snapshot: &[ExperimentRecord], ctx: &AnalyticsContext) -> (i64, i64) {
    let mut earliest: Option<i64> = None;
    let mut latest: Option<i64> = None;
    let mut observe = |instant: i64| {
        earliest = Some(earliest.map_or(instant, |value| value.min(instant)));
        latest = Some(latest.map_or(instant, |value| value.max(instant)));
    };

    for record in snapshot {
        observe(record.created_at);
        observe(record.updated_at);
        if let Some(completed_at) = record.completed_at {
            observe(completed_at);
        }
        for entry in &record.logs {
            observe(ctx.day_start_ms(entry.date));
        }
    }

    let today_start = ctx.day_start_ms(ctx.today);
    (
        earliest.unwrap_or(today_start),
        latest.unwrap_or(today_start),
    )
}

/// Returns the Monday on or before `date`.
pub fn monday_of(date: NaiveDate) -> NaiveDate {
    let offset = u64::from(date.weekday().num_days_from_monday());
    date.checked_sub_days(Days::new(offset)).unwrap_or(date)
}

/// Clamped range of navigable calendar weeks.
///
/// Offsets are whole weeks relative to `reference_monday` (the Monday of the
/// latest activity week); week 0 is that reference week and negative offsets
/// go back in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeekWindow {
    pub reference_monday: NaiveDate,
    pub min_offset: i64,
    pub max_offset: i64,
}

impl WeekWindow {
    /// Computes the window from the snapshot's activity range and today.
    pub fn compute(snapshot: &[ExperimentRecord], ctx: &AnalyticsContext) -> Self {
        let (earliest_ms, latest_ms) = activity_range(snapshot, ctx);
        let earliest_monday = monday_of(ctx.local_day(earliest_ms));
        let latest_monday = monday_of(ctx.local_day(latest_ms));
        let today_monday = monday_of(ctx.today);

        let reference_monday = latest_monday;
        let min_offset = weeks_between(reference_monday, earliest_monday);
        // Future activity never unlocks weeks beyond the current one.
        let max_offset =
            weeks_between(reference_monday, latest_monday.min(today_monday)).max(min_offset);

        Self {
            reference_monday,
            min_offset,
            max_offset,
        }
    }

    /// Clamps an arbitrary offset into the navigable range.
    pub fn clamp(&self, offset: i64) -> i64 {
        offset.clamp(self.min_offset, self.max_offset)
    }

    /// One week back from `current`; a no-op at the lower bound.
    pub fn previous(&self, current: i64) -> i64 {
        self.clamp(current.saturating_sub(1))
    }

    /// One week forward from `current`; a no-op at the upper bound.
    pub fn next(&self, current: i64) -> i64 {
        self.clamp(current.saturating_add(1))
    }

    /// Offset of the week containing today, clamped into the window.
    pub fn today_offset(&self, ctx: &AnalyticsContext) -> i64 {
        self.clamp(weeks_between(self.reference_monday, monday_of(ctx.today)))
    }

    /// Monday of the week displayed at `offset` (clamped).
    pub fn week_start(&self, offset: i64) -> NaiveDate {
        let clamped = self.clamp(offset);
        let days = clamped * 7;
        if days >= 0 {
            self.reference_monday
                .checked_add_days(Days::new(days as u64))
                .unwrap_or(self.reference_monday)
        } else {
            self.reference_monday
                .checked_sub_days(Days::new(days.unsigned_abs()))
                .unwrap_or(self.reference_monday)
        }
    }
}

fn weeks_between(from_monday: NaiveDate, to_monday: NaiveDate) -> i64 {
    (to_monday - from_monday).num_days() / 7
}

/// Intensity cell for one displayed day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayCell {
    pub date: NaiveDate,
    /// Distinct records active or completed on this day. Unbounded.
    pub count: u32,
}

impl DayCell {
    /// Dots to draw, capped at [`INTENSITY_DOT_CAP`].
    pub fn dot_count(&self) -> u32 {
        self.count.min(INTENSITY_DOT_CAP)
    }

    /// Whether the overflow marker should be shown.
    pub fn has_overflow(&self) -> bool {
        self.count > INTENSITY_DOT_CAP
    }
}

/// Counts distinct records with activity on `day`.
///
/// A record counts when it is active and was created or logged that day, or
/// when it was completed that day; matching both still counts once.
pub fn day_intensity(snapshot: &[ExperimentRecord], day: NaiveDate, ctx: &AnalyticsContext) -> u32 {
    snapshot
        .iter()
        .filter(|record| {
            let active_touch = record.is_active()
                && (ctx.local_day(record.created_at) == day
                    || record.logs.iter().any(|entry| entry.date == day));
            let completed_here = record
                .completed_at
                .is_some_and(|instant| ctx.local_day(instant) == day);
            active_touch || completed_here
        })
        .count() as u32
}

/// Builds the 7 intensity cells for the week displayed at `offset`.
pub fn week_cells(
    snapshot: &[ExperimentRecord],
    window: &WeekWindow,
    offset: i64,
    ctx: &AnalyticsContext,
) -> Vec<DayCell> {
    let monday = window.week_start(offset);
    (0..7)
        .map(|index| {
            let date = monday
                .checked_add_days(Days::new(index))
                .unwrap_or(monday);
            DayCell {
                date,
                count: day_intensity(snapshot, date, ctx),
            }
        })
        .collect()
}
