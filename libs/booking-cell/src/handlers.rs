// libs/booking-cell/src/handlers.rs
use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use axum_extra::TypedHeader;
use headers::{Authorization, authorization::Bearer};
use serde_json::{json, Value};
use uuid::Uuid;

use shared_config::AppConfig;
use shared_models::error::AppError;

use crate::models::{BookSlotRequest, BookingError};
use crate::services::BookingService;

fn map_booking_error(e: BookingError) -> AppError {
    match e {
        BookingError::SlotNotFound => AppError::NotFound("Appointment slot not found".to_string()),
        BookingError::AppointmentNotFound => AppError::NotFound("Appointment not found".to_string()),
        BookingError::SlotAlreadyBooked => AppError::Conflict("Appointment slot is already booked".to_string()),
        BookingError::DatabaseError(msg) => AppError::Database(msg),
    }
}

#[axum::debug_handler]
pub async fn book_slot(
    State(state): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Path(slot_id): Path<Uuid>,
    Json(request): Json<BookSlotRequest>,
) -> Result<Json<Value>, AppError> {
    let service = BookingService::new(&state);

    let confirmation = service.book_slot(slot_id, request, auth.token()).await
        .map_err(map_booking_error)?;

    Ok(Json(json!({
        "success": true,
        "booking": confirmation
    })))
}

#[axum::debug_handler]
pub async fn cancel_appointment(
    State(state): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Path(appointment_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let service = BookingService::new(&state);

    service.cancel_appointment(appointment_id, auth.token()).await
        .map_err(map_booking_error)?;

    Ok(Json(json!({
        "success": true,
        "message": "Appointment cancelled and slot freed"
    })))
}

#[axum::debug_handler]
pub async fn get_appointment(
    State(state): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Path(appointment_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let service = BookingService::new(&state);

    let appointment = service.get_appointment(appointment_id, auth.token()).await
        .map_err(map_booking_error)?;

    Ok(Json(json!({
        "appointment": appointment
    })))
}
