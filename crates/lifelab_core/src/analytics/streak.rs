//! Streak computation and milestone selection.
//!
//! # Responsibility
//! - Count the current consecutive-day activity streak.
//! - Select up to two ranked milestone events for the Home view.
//! - Render events to presentation cards through a fixed template table.
//!
//! # Invariants
//! - Tiers are evaluated in strict priority order and short-circuit once two
//!   events are collected; a lower tier never displaces a higher tier.
//! - The streak walk stops at the first day without activity and caps at
//!   [`STREAK_CAP_DAYS`].

use super::activity::{any_touched_on, touched_on};
use super::AnalyticsContext;
use crate::model::experiment::ExperimentRecord;

/// Upper bound for the streak walk-back.
pub const STREAK_CAP_DAYS: u32 = 365;

/// Maximum number of milestone events surfaced at once.
pub const MILESTONE_LIMIT: usize = 2;

/// Counts consecutive days of activity walking backward from today.
///
/// A streak of 0 means today has no activity yet.
pub fn current_streak(snapshot: &[ExperimentRecord], ctx: &AnalyticsContext) -> u32 {
    let mut streak = 0;
    let mut day = ctx.today;

    while streak < STREAK_CAP_DAYS {
        if !any_touched_on(snapshot, day, ctx) {
            break;
        }
        streak += 1;
        match day.pred_opt() {
            Some(previous) => day = previous,
            None => break,
        }
    }

    streak
}

/// One ranked milestone surfaced on the Home view.
///
/// Kind plus payload only; user-facing copy comes from the template table
/// via [`MilestoneEvent::render`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MilestoneEvent {
    /// Tier 1: streak of two or more days.
    StreakRun { days: u32 },
    /// Tier 1 fallback: activity today but no longer streak.
    ProgressToday,
    /// Tier 2: experiments completed yesterday.
    CompletedYesterday { count: u32 },
    /// Tier 3: first record ever in this category, touched today.
    FirstTimeCategory { category: String },
    /// Tier 4: nothing else to say and no active experiments.
    Welcome,
}

/// Presentation-ready card rendered from a milestone event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MilestoneCard {
    /// Icon lookup key for the presentation layer.
    pub icon_key: &'static str,
    pub title: String,
    pub subtitle: String,
}

struct MilestoneTemplate {
    icon_key: &'static str,
    /// `{n}` and `{category}` placeholders are substituted at render time.
    title: &'static str,
    subtitle: &'static str,
}

const STREAK_RUN_TEMPLATE: MilestoneTemplate = MilestoneTemplate {
    icon_key: "flame",
    title: "{n} days in a row",
    subtitle: "Keep the rhythm going.",
};

const PROGRESS_TODAY_TEMPLATE: MilestoneTemplate = MilestoneTemplate {
    icon_key: "sparkle",
    title: "Progress made today",
    subtitle: "Every recorded day counts.",
};

const COMPLETED_YESTERDAY_ONE_TEMPLATE: MilestoneTemplate = MilestoneTemplate {
    icon_key: "check",
    title: "Completed yesterday",
    subtitle: "You wrapped up an experiment.",
};

const COMPLETED_YESTERDAY_MANY_TEMPLATE: MilestoneTemplate = MilestoneTemplate {
    icon_key: "check",
    title: "Completed yesterday",
    subtitle: "You wrapped up {n} experiments.",
};

const FIRST_TIME_CATEGORY_TEMPLATE: MilestoneTemplate = MilestoneTemplate {
    icon_key: "star",
    title: "First time in {category}",
    subtitle: "New territory for you.",
};

const WELCOME_TEMPLATE: MilestoneTemplate = MilestoneTemplate {
    icon_key: "seedling",
    title: "You're here",
    subtitle: "Start an experiment whenever you're ready.",
};

impl MilestoneEvent {
    /// Renders this event through the fixed template vocabulary.
    pub fn render(&self) -> MilestoneCard {
        let (template, n, category) = match self {
            Self::StreakRun { days } => (&STREAK_RUN_TEMPLATE, Some(*days), None),
            Self::ProgressToday => (&PROGRESS_TODAY_TEMPLATE, None, None),
            Self::CompletedYesterday { count: 1 } => {
                (&COMPLETED_YESTERDAY_ONE_TEMPLATE, None, None)
            }
            Self::CompletedYesterday { count } => {
                (&COMPLETED_YESTERDAY_MANY_TEMPLATE, Some(*count), None)
            }
            Self::FirstTimeCategory { category } => {
                (&FIRST_TIME_CATEGORY_TEMPLATE, None, Some(category.as_str()))
            }
            Self::Welcome => (&WELCOME_TEMPLATE, None, None),
        };

        MilestoneCard {
            icon_key: template.icon_key,
            title: fill(template.title, n, category),
            subtitle: fill(template.subtitle, n, category),
        }
    }
}

fn fill(template: &str, n: Option<u32>, category: Option<&str>) -> String {
    let mut text = template.to_string();
    if let Some(value) = n {
        text = text.replace("{n}", &value.to_string());
    }
    if let Some(value) = category {
        text = text.replace("{category}", value);
    }
    text
}

/// Selects up to two milestone events in strict priority order.
///
/// Tier order is deliberate: consistency signals beat completion signals,
/// which beat novelty signals, with a welcome fallback for empty states.
pub fn select_milestones(
    snapshot: &[ExperimentRecord],
    ctx: &AnalyticsContext,
) -> Vec<MilestoneEvent> {
    let mut events = Vec::new();
    let streak = current_streak(snapshot, ctx);

    // Tier 1: streak run, or softer progress note for a one-day streak.
    if streak >= 2 {
        events.push(MilestoneEvent::StreakRun { days: streak });
    } else if streak == 1 {
        events.push(MilestoneEvent::ProgressToday);
    }

    // Tier 2: completions dated yesterday, aggregated into one event.
    if events.len() < MILESTONE_LIMIT {
        if let Some(yesterday) = ctx.today.pred_opt() {
            let count = snapshot
                .iter()
                .filter(|record| {
                    record
                        .completed_at
                        .is_some_and(|instant| ctx.local_day(instant) == yesterday)
                })
                .count() as u32;
            if count > 0 {
                events.push(MilestoneEvent::CompletedYesterday { count });
            }
        }
    }

    // Tier 3: first-time category, only considered for today's activity.
    if events.len() < MILESTONE_LIMIT && any_touched_on(snapshot, ctx.today, ctx) {
        if let Some(category) = first_time_category(snapshot, ctx) {
            events.push(MilestoneEvent::FirstTimeCategory { category });
        }
    }

    // Tier 4: fallback encouragement when there is nothing else to show.
    if events.is_empty() && !snapshot.iter().any(ExperimentRecord::is_active) {
        events.push(MilestoneEvent::Welcome);
    }

    events
}

/// Finds the category of the first record touched today that no other
/// record shares.
///
/// Only the first today-touched candidate with a non-empty category is
/// examined; at most one event can ever come out of this rule.
fn first_time_category(snapshot: &[ExperimentRecord], ctx: &AnalyticsContext) -> Option<String> {
    let candidate = snapshot.iter().find(|record| {
        touched_on(record, ctx.today, ctx) && record.trimmed_category().is_some()
    })?;
    let category = candidate.trimmed_category()?;

    let shared = snapshot.iter().any(|other| {
        other.uuid != candidate.uuid && other.trimmed_category() == Some(category)
    });
    if shared {
        return None;
    }

    Some(category.to_string())
}
