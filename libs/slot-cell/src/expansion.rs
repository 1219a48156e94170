// libs/slot-cell/src/expansion.rs
//
// Pure expansion of a recurring weekly schedule into dated slot candidates.
// Kept free of persistence so the partitioning rules can be tested against
// fixed dates.

use chrono::{Datelike, Duration, NaiveDate, Timelike};

use schedule_cell::models::ClinicSchedule;

use crate::models::{ScheduleValidationError, SlotCandidate};

/// Weekday index matching the `day_of_week` column: 0 = Sunday .. 6 = Saturday.
pub fn weekday_index(date: NaiveDate) -> i32 {
    date.weekday().num_days_from_sunday() as i32
}

/// Expand `schedule` into slot candidates for every matching weekday within
/// `[from, to]` (inclusive).
///
/// `[start_time, end_time)` is partitioned into consecutive intervals of
/// `slot_duration_minutes` starting at `start_time`; a trailing interval
/// shorter than the duration is dropped, never shrunk. Candidates come back
/// ordered by date, then start time. An inverted or empty window yields an
/// empty vec.
pub fn expand_schedule(
    schedule: &ClinicSchedule,
    from: NaiveDate,
    to: NaiveDate,
) -> Result<Vec<SlotCandidate>, ScheduleValidationError> {
    if !(0..=6).contains(&schedule.day_of_week) {
        return Err(ScheduleValidationError::DayOfWeekOutOfRange(schedule.day_of_week));
    }
    if schedule.slot_duration_minutes <= 0 {
        return Err(ScheduleValidationError::NonPositiveDuration(schedule.slot_duration_minutes));
    }
    if schedule.start_time >= schedule.end_time {
        return Err(ScheduleValidationError::EmptyTimeRange);
    }

    // Work in whole seconds from the window start; NaiveTime addition below
    // stays within the day because the loop bound is exclusive of any
    // partial remainder.
    let window_seconds = schedule.end_time.num_seconds_from_midnight() as i64
        - schedule.start_time.num_seconds_from_midnight() as i64;
    let step_seconds = schedule.slot_duration_minutes as i64 * 60;

    let mut candidates = Vec::new();
    let mut date = from;
    while date <= to {
        if weekday_index(date) == schedule.day_of_week {
            let mut offset = 0i64;
            while offset + step_seconds <= window_seconds {
                candidates.push(SlotCandidate {
                    date,
                    start_time: schedule.start_time + Duration::seconds(offset),
                    end_time: schedule.start_time + Duration::seconds(offset + step_seconds),
                });
                offset += step_seconds;
            }
        }
        date = match date.succ_opt() {
            Some(next) => next,
            None => break,
        };
    }

    Ok(candidates)
}
