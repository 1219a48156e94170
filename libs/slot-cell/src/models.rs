// libs/slot-cell/src/models.rs
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// A concrete, dated, bookable interval derived from a `ClinicSchedule`.
///
/// The store carries a uniqueness constraint on
/// `(clinic_schedule_id, date, start_time)`; generation relies on it to turn
/// duplicate-insert races into benign skips.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppointmentSlot {
    pub id: Uuid,
    pub clinic_schedule_id: Uuid,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub is_booked: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A slot the expansion step proposes before the store has been consulted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotCandidate {
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
}

/// Outcome of one generation run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct GenerationReport {
    pub schedules_processed: usize,
    pub schedules_skipped: usize,
    pub slots_created: usize,
    pub slots_skipped: usize,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SlotSearchQuery {
    pub clinic_schedule_id: Option<Uuid>,
    pub from_date: Option<NaiveDate>,
    pub to_date: Option<NaiveDate>,
    pub is_booked: Option<bool>,
}

#[derive(Error, Debug)]
pub enum SlotError {
    #[error("Database error: {0}")]
    DatabaseError(String),
}

/// A schedule row the generator refuses to expand. These are skipped and
/// logged; one malformed schedule never aborts the run for the others.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScheduleValidationError {
    #[error("Schedule start time is not before end time")]
    EmptyTimeRange,

    #[error("Schedule slot duration is not positive: {0}")]
    NonPositiveDuration(i32),

    #[error("Schedule day of week is out of range: {0}")]
    DayOfWeekOutOfRange(i32),
}
