// libs/booking-cell/src/services/booking.rs
use chrono::Utc;
use reqwest::Method;
use serde_json::{json, Value};
use tracing::{debug, info, warn};
use uuid::Uuid;

use shared_config::AppConfig;
use shared_database::supabase::{SupabaseClient, SupabaseError};
use slot_cell::models::AppointmentSlot;

use crate::models::{Appointment, BookSlotRequest, BookingConfirmation, BookingError};

/// The booking gate: the only writer of `is_booked` besides cancellation.
///
/// The claim is a guarded PATCH (`id=eq.X&is_booked=eq.false`), which the
/// store executes as a single conditional UPDATE. Of two concurrent callers
/// exactly one gets the updated row back; the other sees an empty
/// representation and is told the slot is taken.
pub struct BookingService {
    supabase: SupabaseClient,
}

impl BookingService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
        }
    }

    pub async fn book_slot(
        &self,
        slot_id: Uuid,
        request: BookSlotRequest,
        auth_token: &str,
    ) -> Result<BookingConfirmation, BookingError> {
        debug!("Booking slot {} for patient {}", slot_id, request.patient_id);

        let slot = match self.claim_slot(slot_id, auth_token).await? {
            Some(slot) => slot,
            None => {
                // Lost the race, or the id never existed.
                return match self.get_slot(slot_id, auth_token).await? {
                    Some(_) => Err(BookingError::SlotAlreadyBooked),
                    None => Err(BookingError::SlotNotFound),
                };
            }
        };

        let appointment = match self.create_appointment(slot_id, &request, auth_token).await {
            Ok(appointment) => appointment,
            Err(e) => {
                // A booked slot without an appointment must not survive.
                self.release_slot(slot_id, auth_token).await;
                return Err(e);
            }
        };

        info!("Slot {} booked by appointment {}", slot_id, appointment.id);
        Ok(BookingConfirmation {
            appointment_id: appointment.id,
            slot_id: slot.id,
            date: slot.date,
            start_time: slot.start_time,
            end_time: slot.end_time,
        })
    }

    pub async fn cancel_appointment(
        &self,
        appointment_id: Uuid,
        auth_token: &str,
    ) -> Result<(), BookingError> {
        debug!("Cancelling appointment: {}", appointment_id);

        let appointment = self.get_appointment(appointment_id, auth_token).await?;

        // Free the slot before deleting the appointment: a failure at either
        // step leaves the appointment row in place, so the caller can retry
        // the cancellation. The unique slot_id column keeps the briefly free
        // slot from being double-booked in between.
        self.set_booked_flag(appointment.slot_id, false, auth_token).await?;

        let path = format!("/rest/v1/appointments?id=eq.{}", appointment_id);
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert("Prefer", reqwest::header::HeaderValue::from_static("return=representation"));

        let deleted: Vec<Value> = self.supabase.request_with_headers(
            Method::DELETE,
            &path,
            Some(auth_token),
            None,
            Some(headers),
        ).await.map_err(|e| BookingError::DatabaseError(e.to_string()))?;

        if deleted.is_empty() {
            // Another cancellation got there between the read and the delete.
            return Err(BookingError::AppointmentNotFound);
        }

        info!("Appointment {} cancelled, slot {} freed", appointment_id, appointment.slot_id);
        Ok(())
    }

    pub async fn get_appointment(
        &self,
        appointment_id: Uuid,
        auth_token: &str,
    ) -> Result<Appointment, BookingError> {
        let path = format!("/rest/v1/appointments?id=eq.{}", appointment_id);
        let result: Vec<Value> = self.supabase.request(
            Method::GET,
            &path,
            Some(auth_token),
            None,
        ).await.map_err(|e| BookingError::DatabaseError(e.to_string()))?;

        let Some(row) = result.into_iter().next() else {
            return Err(BookingError::AppointmentNotFound);
        };

        serde_json::from_value(row)
            .map_err(|e| BookingError::DatabaseError(format!("Failed to parse appointment: {}", e)))
    }

    // Private helpers

    /// Atomically flip `is_booked` false -> true. `None` means no free row
    /// matched the guard.
    async fn claim_slot(
        &self,
        slot_id: Uuid,
        auth_token: &str,
    ) -> Result<Option<AppointmentSlot>, BookingError> {
        let path = format!(
            "/rest/v1/appointment_slots?id=eq.{}&is_booked=eq.false",
            slot_id
        );
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert("Prefer", reqwest::header::HeaderValue::from_static("return=representation"));

        let updated: Vec<Value> = self.supabase.request_with_headers(
            Method::PATCH,
            &path,
            Some(auth_token),
            Some(json!({
                "is_booked": true,
                "updated_at": Utc::now().to_rfc3339()
            })),
            Some(headers),
        ).await.map_err(|e| BookingError::DatabaseError(e.to_string()))?;

        let Some(row) = updated.into_iter().next() else {
            return Ok(None);
        };

        serde_json::from_value(row)
            .map(Some)
            .map_err(|e| BookingError::DatabaseError(format!("Failed to parse slot: {}", e)))
    }

    async fn create_appointment(
        &self,
        slot_id: Uuid,
        request: &BookSlotRequest,
        auth_token: &str,
    ) -> Result<Appointment, BookingError> {
        let appointment_data = json!({
            "id": Uuid::new_v4(),
            "slot_id": slot_id,
            "patient_id": request.patient_id,
            "reason": request.reason,
            "created_at": Utc::now().to_rfc3339()
        });

        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert("Prefer", reqwest::header::HeaderValue::from_static("return=representation"));

        let result: Vec<Value> = self.supabase.request_with_headers(
            Method::POST,
            "/rest/v1/appointments",
            Some(auth_token),
            Some(appointment_data),
            Some(headers),
        ).await.map_err(|e| {
            // The unique slot_id column is the storage-level backstop for a
            // writer that slipped past the claim.
            match e.downcast_ref::<SupabaseError>() {
                Some(SupabaseError::Conflict(_)) => BookingError::SlotAlreadyBooked,
                _ => BookingError::DatabaseError(e.to_string()),
            }
        })?;

        let Some(row) = result.into_iter().next() else {
            return Err(BookingError::DatabaseError("Failed to create appointment".to_string()));
        };

        serde_json::from_value(row)
            .map_err(|e| BookingError::DatabaseError(format!("Failed to parse appointment: {}", e)))
    }

    /// Best-effort compensation when the appointment insert fails after a
    /// successful claim.
    async fn release_slot(&self, slot_id: Uuid, auth_token: &str) {
        if let Err(e) = self.set_booked_flag(slot_id, false, auth_token).await {
            warn!("Failed to release claimed slot {}: {}", slot_id, e);
        }
    }

    async fn set_booked_flag(
        &self,
        slot_id: Uuid,
        is_booked: bool,
        auth_token: &str,
    ) -> Result<(), BookingError> {
        let path = format!("/rest/v1/appointment_slots?id=eq.{}", slot_id);

        let _: Vec<Value> = self.supabase.request_with_headers(
            Method::PATCH,
            &path,
            Some(auth_token),
            Some(json!({
                "is_booked": is_booked,
                "updated_at": Utc::now().to_rfc3339()
            })),
            Some({
                let mut headers = reqwest::header::HeaderMap::new();
                headers.insert("Prefer", reqwest::header::HeaderValue::from_static("return=representation"));
                headers
            }),
        ).await.map_err(|e| BookingError::DatabaseError(e.to_string()))?;

        Ok(())
    }

    async fn get_slot(
        &self,
        slot_id: Uuid,
        auth_token: &str,
    ) -> Result<Option<AppointmentSlot>, BookingError> {
        let path = format!("/rest/v1/appointment_slots?id=eq.{}", slot_id);
        let result: Vec<Value> = self.supabase.request(
            Method::GET,
            &path,
            Some(auth_token),
            None,
        ).await.map_err(|e| BookingError::DatabaseError(e.to_string()))?;

        let Some(row) = result.into_iter().next() else {
            return Ok(None);
        };

        serde_json::from_value(row)
            .map(Some)
            .map_err(|e| BookingError::DatabaseError(format!("Failed to parse slot: {}", e)))
    }
}
