// libs/schedule-cell/src/handlers.rs
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

use crate::models::{
    CreateScheduleRequest, ScheduleError, ScheduleSearchQuery, UpdateScheduleRequest,
};
use crate::services::ScheduleService;

fn map_schedule_error(e: ScheduleError) -> AppError {
    match e {
        ScheduleError::NotFound => AppError::NotFound("Schedule not found".to_string()),
        ScheduleError::InvalidTimeRange
        | ScheduleError::InvalidDayOfWeek(_)
        | ScheduleError::InvalidSlotDuration(_) => AppError::ValidationError(e.to_string()),
        ScheduleError::DatabaseError(msg) => AppError::Database(msg),
    }
}

#[axum::debug_handler]
pub async fn create_schedule(
    State(state): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Json(request): Json<CreateScheduleRequest>,
) -> Result<Json<Value>, AppError> {
    let service = ScheduleService::new(&state);

    let schedule = service.create_schedule(request, auth.token()).await
        .map_err(map_schedule_error)?;

    Ok(Json(json!({
        "success": true,
        "schedule": schedule
    })))
}

#[axum::debug_handler]
pub async fn update_schedule(
    State(state): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Path(schedule_id): Path<Uuid>,
    Json(request): Json<UpdateScheduleRequest>,
) -> Result<Json<Value>, AppError> {
    let service = ScheduleService::new(&state);

    let schedule = service.update_schedule(schedule_id, request, auth.token()).await
        .map_err(map_schedule_error)?;

    Ok(Json(json!({
        "success": true,
        "schedule": schedule
    })))
}

#[axum::debug_handler]
pub async fn list_schedules(
    State(state): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Query(query): Query<ScheduleSearchQuery>,
) -> Result<Json<Value>, AppError> {
    let service = ScheduleService::new(&state);

    let schedules = service.list_schedules(query, auth.token()).await
        .map_err(map_schedule_error)?;

    let count = schedules.len();
    Ok(Json(json!({
        "schedules": schedules,
        "count": count
    })))
}

#[axum::debug_handler]
pub async fn get_schedule(
    State(state): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Path(schedule_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let service = ScheduleService::new(&state);

    let schedule = service.get_schedule(schedule_id, auth.token()).await
        .map_err(map_schedule_error)?;

    Ok(Json(json!({
        "schedule": schedule
    })))
}
