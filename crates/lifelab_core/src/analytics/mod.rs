//! Activity Analytics Engine.
//!
//! # Responsibility
//! - Derive presentation-ready facts (day state, streaks, milestones,
//!   calendar intensity, category boxes) from the record snapshot.
//!
//! # Invariants
//! - Every computation is a pure function over an immutable snapshot plus an
//!   [`AnalyticsContext`]; nothing here reads ambient time or mutates input.
//! - Identical `(snapshot, context)` inputs always produce identical output.

use chrono::{DateTime, FixedOffset, NaiveDate, TimeZone};

pub mod activity;
pub mod calendar;
pub mod day_state;
pub mod grouping;
pub mod streak;

/// Injected "today" plus the offset used to map instants to calendar days.
///
/// Callers capture the clock once per computation and hand it in; analytics
/// code never reads wall-clock time itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalyticsContext {
    /// The calendar day treated as "today".
    pub today: NaiveDate,
    /// UTC offset of the user's local time zone.
    pub utc_offset: FixedOffset,
}

impl AnalyticsContext {
    /// Builds a context from a captured instant, deriving `today` from it.
    ///
    /// Any time-of-day component is normalized away by the day conversion.
    pub fn from_instant(now_ms: i64, utc_offset: FixedOffset) -> Self {
        Self {
            today: local_day(now_ms, utc_offset),
            utc_offset,
        }
    }

    /// Builds a context with an explicit `today`, used by tests and callers
    /// that already hold a normalized date.
    pub fn with_today(today: NaiveDate, utc_offset: FixedOffset) -> Self {
        Self { today, utc_offset }
    }

    /// UTC convenience constructor for an explicit `today`.
    pub fn utc(today: NaiveDate) -> Self {
        Self::with_today(today, utc_zero())
    }

    /// Maps an epoch-millisecond instant to its local calendar day.
    pub fn local_day(&self, epoch_ms: i64) -> NaiveDate {
        local_day(epoch_ms, self.utc_offset)
    }

    /// Instant (epoch ms) at local midnight of `day`.
    pub fn day_start_ms(&self, day: NaiveDate) -> i64 {
        let midnight = day.and_hms_opt(0, 0, 0).unwrap_or_default();
        self.utc_offset
            .from_local_datetime(&midnight)
            .single()
            .map_or(0, |instant| instant.timestamp_millis())
    }
}

/// Maps an epoch-millisecond instant to a calendar day in the given offset.
///
/// Out-of-range instants degrade to the Unix epoch day instead of failing.
pub fn local_day(epoch_ms: i64, utc_offset: FixedOffset) -> NaiveDate {
    DateTime::from_timestamp_millis(epoch_ms)
        .map(|instant| instant.with_timezone(&utc_offset).date_naive())
        .unwrap_or_default()
}

fn utc_zero() -> FixedOffset {
    FixedOffset::east_opt(0).expect("zero offset is valid")
}

#[cfg(test)]
mod tests {
    use super::{local_day, AnalyticsContext};
    use chrono::{FixedOffset, NaiveDate};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn local_day_respects_offset_across_midnight() {
        // 2024-03-10T23:30:00Z
        let instant_ms = 1_710_113_400_000;
        let utc = FixedOffset::east_opt(0).unwrap();
        let plus_two = FixedOffset::east_opt(2 * 3600).unwrap();

        assert_eq!(local_day(instant_ms, utc), date(2024, 3, 10));
        assert_eq!(local_day(instant_ms, plus_two), date(2024, 3, 11));
    }

    #[test]
    fn from_instant_normalizes_today_to_a_day_boundary() {
        let utc = FixedOffset::east_opt(0).unwrap();
        let midday = AnalyticsContext::from_instant(1_710_070_200_000, utc);
        let evening = AnalyticsContext::from_instant(1_710_100_000_000, utc);
        assert_eq!(midday.today, evening.today);
    }

    #[test]
    fn out_of_range_instant_degrades_to_epoch_day() {
        let utc = FixedOffset::east_opt(0).unwrap();
        assert_eq!(local_day(i64::MAX, utc), NaiveDate::default());
    }

    #[test]
    fn day_start_ms_is_midnight_of_the_day() {
        let ctx = AnalyticsContext::utc(date(2024, 3, 10));
        let start = ctx.day_start_ms(ctx.today);
        assert_eq!(ctx.local_day(start), ctx.today);
        assert_eq!(start % 86_400_000, 0);
    }
}
