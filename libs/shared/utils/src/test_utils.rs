use std::sync::Arc;
use chrono::Utc;
use serde_json::{json, Value};
use uuid::Uuid;

use shared_config::AppConfig;

pub struct TestConfig {
    pub supabase_url: String,
    pub supabase_anon_key: String,
    pub slot_generation_hour_utc: u32,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            supabase_url: "http://localhost:54321".to_string(),
            supabase_anon_key: "test-anon-key".to_string(),
            slot_generation_hour_utc: 2,
        }
    }
}

impl TestConfig {
    /// Point the config at a wiremock PostgREST server.
    pub fn for_mock_server(url: &str) -> Self {
        Self {
            supabase_url: url.to_string(),
            ..Self::default()
        }
    }

    pub fn to_app_config(&self) -> AppConfig {
        AppConfig {
            supabase_url: self.supabase_url.clone(),
            supabase_anon_key: self.supabase_anon_key.clone(),
            slot_generation_hour_utc: self.slot_generation_hour_utc,
        }
    }

    pub fn to_arc(&self) -> Arc<AppConfig> {
        Arc::new(self.to_app_config())
    }
}

/// Canned PostgREST row payloads matching the engine's table shapes.
pub struct MockSupabaseResponses;

impl MockSupabaseResponses {
    pub fn schedule_row(
        id: Uuid,
        clinic_id: Uuid,
        doctor_id: Uuid,
        day_of_week: i32,
        start_time: &str,
        end_time: &str,
        slot_duration_minutes: i32,
    ) -> Value {
        json!({
            "id": id,
            "clinic_id": clinic_id,
            "doctor_id": doctor_id,
            "day_of_week": day_of_week,
            "start_time": start_time,
            "end_time": end_time,
            "slot_duration_minutes": slot_duration_minutes,
            "created_at": Utc::now().to_rfc3339(),
            "updated_at": Utc::now().to_rfc3339()
        })
    }

    pub fn slot_row(
        id: Uuid,
        clinic_schedule_id: Uuid,
        date: &str,
        start_time: &str,
        end_time: &str,
        is_booked: bool,
    ) -> Value {
        json!({
            "id": id,
            "clinic_schedule_id": clinic_schedule_id,
            "date": date,
            "start_time": start_time,
            "end_time": end_time,
            "is_booked": is_booked,
            "created_at": Utc::now().to_rfc3339(),
            "updated_at": Utc::now().to_rfc3339()
        })
    }

    pub fn appointment_row(id: Uuid, slot_id: Uuid, patient_id: Uuid, reason: &str) -> Value {
        json!({
            "id": id,
            "slot_id": slot_id,
            "patient_id": patient_id,
            "reason": reason,
            "created_at": Utc::now().to_rfc3339()
        })
    }
}
