// libs/slot-cell/src/services/slots.rs
use reqwest::Method;
use serde_json::Value;
use tracing::debug;
use uuid::Uuid;

use shared_config::AppConfig;
use shared_database::supabase::SupabaseClient;

use crate::models::{AppointmentSlot, SlotError, SlotSearchQuery};

/// Read-only slot lookups for the appointment-facing API surface.
pub struct SlotQueryService {
    supabase: SupabaseClient,
}

impl SlotQueryService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
        }
    }

    /// List slots, optionally filtered by schedule, date range, and booked
    /// flag, ordered by date then start time.
    pub async fn list_slots(
        &self,
        query: SlotSearchQuery,
        auth_token: &str,
    ) -> Result<Vec<AppointmentSlot>, SlotError> {
        debug!("Searching appointment slots with filters: {:?}", query);

        let mut path = "/rest/v1/appointment_slots?order=date.asc,start_time.asc".to_string();

        if let Some(schedule_id) = query.clinic_schedule_id {
            path.push_str(&format!("&clinic_schedule_id=eq.{}", schedule_id));
        }
        if let Some(from_date) = query.from_date {
            path.push_str(&format!("&date=gte.{}", from_date));
        }
        if let Some(to_date) = query.to_date {
            path.push_str(&format!("&date=lte.{}", to_date));
        }
        if let Some(is_booked) = query.is_booked {
            path.push_str(&format!("&is_booked=eq.{}", is_booked));
        }

        let result: Vec<Value> = self.supabase.request(
            Method::GET,
            &path,
            Some(auth_token),
            None,
        ).await.map_err(|e| SlotError::DatabaseError(e.to_string()))?;

        result.into_iter()
            .map(serde_json::from_value)
            .collect::<Result<Vec<AppointmentSlot>, _>>()
            .map_err(|e| SlotError::DatabaseError(format!("Failed to parse slot: {}", e)))
    }

    pub async fn get_slot(
        &self,
        slot_id: Uuid,
        auth_token: &str,
    ) -> Result<Option<AppointmentSlot>, SlotError> {
        let path = format!("/rest/v1/appointment_slots?id=eq.{}", slot_id);
        let result: Vec<Value> = self.supabase.request(
            Method::GET,
            &path,
            Some(auth_token),
            None,
        ).await.map_err(|e| SlotError::DatabaseError(e.to_string()))?;

        let Some(row) = result.into_iter().next() else {
            return Ok(None);
        };

        serde_json::from_value(row)
            .map(Some)
            .map_err(|e| SlotError::DatabaseError(format!("Failed to parse slot: {}", e)))
    }
}
