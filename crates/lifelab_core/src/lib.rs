//! Core domain logic for LifeLab, a personal experiment tracker.
//! This crate is the single source of truth for business invariants and for
//! the Activity Analytics Engine feeding the Home and calendar views.

pub mod analytics;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use analytics::activity::{any_touched_on, touched_on};
pub use analytics::calendar::{
    activity_range, day_intensity, monday_of, week_cells, DayCell, WeekWindow, INTENSITY_DOT_CAP,
};
pub use analytics::day_state::{
    classify_day, DayClassification, DayState, CONTINUE_PREVIEW_LEN,
};
pub use analytics::grouping::{
    group_by_category, BoxKind, CategoryBox, CUSTOM_BOX_TITLE, EMPTY_BOX_UPDATED_AT,
    UNCATEGORIZED_BOX_TITLE,
};
pub use analytics::streak::{
    current_streak, select_milestones, MilestoneCard, MilestoneEvent, MILESTONE_LIMIT,
    STREAK_CAP_DAYS,
};
pub use analytics::AnalyticsContext;
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::catalog::{CatalogCategory, CatalogPrompt, CatalogSubcategory, CategoryCatalog};
pub use model::experiment::{
    DailyLogEntry, ExperimentId, ExperimentRecord, ExperimentStatus, ExperimentValidationError,
    LogEntryId, Mood, Review,
};
pub use repo::experiment_repo::{
    ExperimentRepository, RepoError, RepoResult, SqliteExperimentRepository,
};
pub use service::experiment_service::{CreateExperimentRequest, ExperimentService, ServiceError};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
