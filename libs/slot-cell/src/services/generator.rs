// libs/slot-cell/src/services/generator.rs
use chrono::{Months, NaiveDate, NaiveTime, Utc};
use reqwest::Method;
use serde_json::{json, Value};
use tracing::{debug, info, warn};
use uuid::Uuid;

use schedule_cell::models::ClinicSchedule;
use shared_config::AppConfig;
use shared_database::supabase::SupabaseClient;

use crate::expansion::expand_schedule;
use crate::models::{GenerationReport, SlotError};

/// Materializes concrete appointment slots for every stored schedule over a
/// rolling window. Safe to re-run: existing slots, booked or not, are never
/// touched, and the bulk insert asks the store to ignore duplicate rows so a
/// concurrent run cannot double-insert past the uniqueness constraint.
pub struct SlotGeneratorService {
    supabase: SupabaseClient,
}

impl SlotGeneratorService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
        }
    }

    /// Production entry point: today through today + 1 month, UTC wall clock.
    pub async fn generate_monthly_slots(&self) -> Result<GenerationReport, SlotError> {
        let today = Utc::now().date_naive();
        let horizon_end = today.checked_add_months(Months::new(1)).unwrap_or(today);
        self.generate_for_window(today, horizon_end).await
    }

    /// Generate slots for an explicit window (inclusive on both ends).
    /// Callers fix the dates; only `generate_monthly_slots` reads the clock.
    pub async fn generate_for_window(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<GenerationReport, SlotError> {
        debug!("Generating appointment slots for window {} to {}", from, to);

        let schedules = self.list_all_schedules().await?;
        let mut report = GenerationReport::default();
        let mut staged: Vec<Value> = Vec::new();

        for schedule in &schedules {
            let candidates = match expand_schedule(schedule, from, to) {
                Ok(candidates) => candidates,
                Err(e) => {
                    warn!("Skipping malformed schedule {}: {}", schedule.id, e);
                    report.schedules_skipped += 1;
                    continue;
                }
            };
            report.schedules_processed += 1;

            for candidate in candidates {
                if self.slot_exists(schedule.id, candidate.date, candidate.start_time).await? {
                    report.slots_skipped += 1;
                    continue;
                }

                let now = Utc::now().to_rfc3339();
                staged.push(json!({
                    "id": Uuid::new_v4(),
                    "clinic_schedule_id": schedule.id,
                    "date": candidate.date,
                    "start_time": candidate.start_time.format("%H:%M:%S").to_string(),
                    "end_time": candidate.end_time.format("%H:%M:%S").to_string(),
                    "is_booked": false,
                    "created_at": now,
                    "updated_at": now
                }));
            }
        }

        // One flush per run; a failure here aborts the run and the next
        // scheduled invocation fills the gaps idempotently.
        report.slots_created = staged.len();
        if !staged.is_empty() {
            self.insert_slots(staged).await?;
        }

        info!(
            "Slot generation finished: {} created, {} already present, {} schedules skipped",
            report.slots_created, report.slots_skipped, report.schedules_skipped
        );
        Ok(report)
    }

    async fn list_all_schedules(&self) -> Result<Vec<ClinicSchedule>, SlotError> {
        let result: Vec<Value> = self.supabase.request(
            Method::GET,
            "/rest/v1/clinic_schedules?order=day_of_week.asc,start_time.asc",
            None,
            None,
        ).await.map_err(|e| SlotError::DatabaseError(e.to_string()))?;

        result.into_iter()
            .map(serde_json::from_value)
            .collect::<Result<Vec<ClinicSchedule>, _>>()
            .map_err(|e| SlotError::DatabaseError(format!("Failed to parse schedule: {}", e)))
    }

    async fn slot_exists(
        &self,
        schedule_id: Uuid,
        date: NaiveDate,
        start_time: NaiveTime,
    ) -> Result<bool, SlotError> {
        let path = format!(
            "/rest/v1/appointment_slots?clinic_schedule_id=eq.{}&date=eq.{}&start_time=eq.{}&select=id&limit=1",
            schedule_id,
            date,
            start_time.format("%H:%M:%S")
        );

        let result: Vec<Value> = self.supabase.request(
            Method::GET,
            &path,
            None,
            None,
        ).await.map_err(|e| SlotError::DatabaseError(e.to_string()))?;

        Ok(!result.is_empty())
    }

    async fn insert_slots(&self, rows: Vec<Value>) -> Result<(), SlotError> {
        let mut headers = reqwest::header::HeaderMap::new();
        // ignore-duplicates turns a lost insert race into "already exists,
        // skip" against the (clinic_schedule_id, date, start_time) constraint.
        headers.insert(
            "Prefer",
            reqwest::header::HeaderValue::from_static("return=representation,resolution=ignore-duplicates"),
        );

        let _inserted: Vec<Value> = self.supabase.request_with_headers(
            Method::POST,
            "/rest/v1/appointment_slots?on_conflict=clinic_schedule_id,date,start_time",
            None,
            Some(Value::Array(rows)),
            Some(headers),
        ).await.map_err(|e| SlotError::DatabaseError(e.to_string()))?;

        Ok(())
    }
}
