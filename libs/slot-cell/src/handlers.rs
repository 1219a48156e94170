// libs/slot-cell/src/handlers.rs
use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use axum_extra::TypedHeader;
use headers::{Authorization, authorization::Bearer};
use serde_json::{json, Value};
use uuid::Uuid;

use shared_config::AppConfig;
use shared_models::error::AppError;

use crate::models::{SlotError, SlotSearchQuery};
use crate::services::{SlotGeneratorService, SlotQueryService};

fn map_slot_error(e: SlotError) -> AppError {
    match e {
        SlotError::DatabaseError(msg) => AppError::Database(msg),
    }
}

#[axum::debug_handler]
pub async fn list_slots(
    State(state): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Query(query): Query<SlotSearchQuery>,
) -> Result<Json<Value>, AppError> {
    let service = SlotQueryService::new(&state);

    let slots = service.list_slots(query, auth.token()).await
        .map_err(map_slot_error)?;

    let count = slots.len();
    Ok(Json(json!({
        "slots": slots,
        "count": count
    })))
}

#[axum::debug_handler]
pub async fn get_slot(
    State(state): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Path(slot_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let service = SlotQueryService::new(&state);

    let slot = service.get_slot(slot_id, auth.token()).await
        .map_err(map_slot_error)?
        .ok_or_else(|| AppError::NotFound("Slot not found".to_string()))?;

    Ok(Json(json!({
        "slot": slot
    })))
}

/// Admin trigger for an on-demand generation run, same code path the daily
/// job takes.
#[axum::debug_handler]
pub async fn trigger_generation(
    State(state): State<Arc<AppConfig>>,
    TypedHeader(_auth): TypedHeader<Authorization<Bearer>>,
) -> Result<Json<Value>, AppError> {
    let service = SlotGeneratorService::new(&state);

    let report = service.generate_monthly_slots().await
        .map_err(map_slot_error)?;

    Ok(Json(json!({
        "success": true,
        "report": report
    })))
}
