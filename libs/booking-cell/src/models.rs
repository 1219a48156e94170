// libs/booking-cell/src/models.rs
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// One-to-one with an `AppointmentSlot`; creating an appointment is the only
/// legitimate way a slot becomes booked, deleting it the only way the flag
/// clears. `slot_id` is unique in the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Appointment {
    pub id: Uuid,
    pub slot_id: Uuid,
    pub patient_id: Uuid,
    pub reason: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BookSlotRequest {
    pub patient_id: Uuid,
    pub reason: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct BookingConfirmation {
    pub appointment_id: Uuid,
    pub slot_id: Uuid,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
}

#[derive(Error, Debug)]
pub enum BookingError {
    #[error("Appointment slot not found")]
    SlotNotFound,

    #[error("Appointment not found")]
    AppointmentNotFound,

    #[error("Appointment slot is already booked")]
    SlotAlreadyBooked,

    #[error("Database error: {0}")]
    DatabaseError(String),
}
