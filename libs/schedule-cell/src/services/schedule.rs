// libs/schedule-cell/src/services/schedule.rs
use chrono::{NaiveTime, Utc};
use reqwest::Method;
use serde_json::{json, Value};
use tracing::debug;
use uuid::Uuid;

use shared_config::AppConfig;
use shared_database::supabase::SupabaseClient;

use crate::models::{
    ClinicSchedule, CreateScheduleRequest, ScheduleError, ScheduleSearchQuery,
    UpdateScheduleRequest,
};

pub struct ScheduleService {
    supabase: SupabaseClient,
}

impl ScheduleService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
        }
    }

    /// Create a recurring weekly schedule for a doctor at a clinic.
    pub async fn create_schedule(
        &self,
        request: CreateScheduleRequest,
        auth_token: &str,
    ) -> Result<ClinicSchedule, ScheduleError> {
        debug!(
            "Creating schedule for doctor {} at clinic {}",
            request.doctor_id, request.clinic_id
        );

        validate_schedule_rules(
            request.day_of_week,
            request.start_time,
            request.end_time,
            request.slot_duration_minutes,
        )?;

        let schedule_data = json!({
            "id": Uuid::new_v4(),
            "clinic_id": request.clinic_id,
            "doctor_id": request.doctor_id,
            "day_of_week": request.day_of_week,
            "start_time": request.start_time.format("%H:%M:%S").to_string(),
            "end_time": request.end_time.format("%H:%M:%S").to_string(),
            "slot_duration_minutes": request.slot_duration_minutes,
            "created_at": Utc::now().to_rfc3339(),
            "updated_at": Utc::now().to_rfc3339()
        });

        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert("Prefer", reqwest::header::HeaderValue::from_static("return=representation"));

        let result: Vec<Value> = self.supabase.request_with_headers(
            Method::POST,
            "/rest/v1/clinic_schedules",
            Some(auth_token),
            Some(schedule_data),
            Some(headers),
        ).await.map_err(|e| ScheduleError::DatabaseError(e.to_string()))?;

        let Some(row) = result.into_iter().next() else {
            return Err(ScheduleError::DatabaseError("Failed to create schedule".to_string()));
        };

        let schedule: ClinicSchedule = serde_json::from_value(row)
            .map_err(|e| ScheduleError::DatabaseError(format!("Failed to parse schedule: {}", e)))?;
        debug!("Schedule created with ID: {}", schedule.id);

        Ok(schedule)
    }

    /// Partially update a schedule, re-validating the effective values.
    pub async fn update_schedule(
        &self,
        schedule_id: Uuid,
        request: UpdateScheduleRequest,
        auth_token: &str,
    ) -> Result<ClinicSchedule, ScheduleError> {
        debug!("Updating schedule: {}", schedule_id);

        let current = self.get_schedule(schedule_id, auth_token).await?;

        validate_schedule_rules(
            request.day_of_week.unwrap_or(current.day_of_week),
            request.start_time.unwrap_or(current.start_time),
            request.end_time.unwrap_or(current.end_time),
            request.slot_duration_minutes.unwrap_or(current.slot_duration_minutes),
        )?;

        let mut update_data = serde_json::Map::new();
        if let Some(day_of_week) = request.day_of_week {
            update_data.insert("day_of_week".to_string(), json!(day_of_week));
        }
        if let Some(start_time) = request.start_time {
            update_data.insert("start_time".to_string(), json!(start_time.format("%H:%M:%S").to_string()));
        }
        if let Some(end_time) = request.end_time {
            update_data.insert("end_time".to_string(), json!(end_time.format("%H:%M:%S").to_string()));
        }
        if let Some(duration) = request.slot_duration_minutes {
            update_data.insert("slot_duration_minutes".to_string(), json!(duration));
        }
        update_data.insert("updated_at".to_string(), json!(Utc::now().to_rfc3339()));

        let path = format!("/rest/v1/clinic_schedules?id=eq.{}", schedule_id);
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert("Prefer", reqwest::header::HeaderValue::from_static("return=representation"));

        let result: Vec<Value> = self.supabase.request_with_headers(
            Method::PATCH,
            &path,
            Some(auth_token),
            Some(Value::Object(update_data)),
            Some(headers),
        ).await.map_err(|e| ScheduleError::DatabaseError(e.to_string()))?;

        let Some(row) = result.into_iter().next() else {
            return Err(ScheduleError::NotFound);
        };

        serde_json::from_value(row)
            .map_err(|e| ScheduleError::DatabaseError(format!("Failed to parse schedule: {}", e)))
    }

    /// List schedules, optionally filtered by clinic, doctor, or weekday.
    pub async fn list_schedules(
        &self,
        query: ScheduleSearchQuery,
        auth_token: &str,
    ) -> Result<Vec<ClinicSchedule>, ScheduleError> {
        let mut path = "/rest/v1/clinic_schedules?order=day_of_week.asc,start_time.asc".to_string();

        if let Some(clinic_id) = query.clinic_id {
            path.push_str(&format!("&clinic_id=eq.{}", clinic_id));
        }
        if let Some(doctor_id) = query.doctor_id {
            path.push_str(&format!("&doctor_id=eq.{}", doctor_id));
        }
        if let Some(day_of_week) = query.day_of_week {
            path.push_str(&format!("&day_of_week=eq.{}", day_of_week));
        }

        let result: Vec<Value> = self.supabase.request(
            Method::GET,
            &path,
            Some(auth_token),
            None,
        ).await.map_err(|e| ScheduleError::DatabaseError(e.to_string()))?;

        result.into_iter()
            .map(serde_json::from_value)
            .collect::<Result<Vec<ClinicSchedule>, _>>()
            .map_err(|e| ScheduleError::DatabaseError(format!("Failed to parse schedule: {}", e)))
    }

    pub async fn get_schedule(
        &self,
        schedule_id: Uuid,
        auth_token: &str,
    ) -> Result<ClinicSchedule, ScheduleError> {
        let path = format!("/rest/v1/clinic_schedules?id=eq.{}", schedule_id);
        let result: Vec<Value> = self.supabase.request(
            Method::GET,
            &path,
            Some(auth_token),
            None,
        ).await.map_err(|e| ScheduleError::DatabaseError(e.to_string()))?;

        let Some(row) = result.into_iter().next() else {
            return Err(ScheduleError::NotFound);
        };

        serde_json::from_value(row)
            .map_err(|e| ScheduleError::DatabaseError(format!("Failed to parse schedule: {}", e)))
    }
}

/// Shared validation for create and update paths. A malformed schedule is a
/// client error here; the slot generator applies the same rules defensively
/// and skips offenders instead.
pub fn validate_schedule_rules(
    day_of_week: i32,
    start_time: NaiveTime,
    end_time: NaiveTime,
    slot_duration_minutes: i32,
) -> Result<(), ScheduleError> {
    if !(0..=6).contains(&day_of_week) {
        return Err(ScheduleError::InvalidDayOfWeek(day_of_week));
    }
    if start_time >= end_time {
        return Err(ScheduleError::InvalidTimeRange);
    }
    if slot_duration_minutes <= 0 {
        return Err(ScheduleError::InvalidSlotDuration(slot_duration_minutes));
    }
    Ok(())
}
