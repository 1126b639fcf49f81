use axum::{
    extract::{rejection::JsonRejection, State},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};

use crate::controllers::access_controller::PLATE_MISSING;
use crate::dto::parking_dto::{OccupancyResponse, PlateRequest, PlateValidationResponse};
use crate::state::AppState;
use crate::utils::errors::{bad_request_error, AppError};

pub fn create_parking_router() -> Router<AppState> {
    Router::new()
        .route("/validar_placa/", post(validate_plate))
        .route("/validar_placa", post(validate_plate))
        .route("/puestos", get(occupancy))
        .route("/health", get(health))
}

async fn validate_plate(
    State(state): State<AppState>,
    payload: Result<Json<PlateRequest>, JsonRejection>,
) -> Result<Json<PlateValidationResponse>, AppError> {
    let Json(request) = payload.map_err(|rejection| {
        AppError::BadRequest(format!("Cuerpo de solicitud inválido: {}", rejection.body_text()))
    })?;

    let raw_plate = request.placa.ok_or_else(|| bad_request_error(PLATE_MISSING))?;
    let outcome = state.controller.process_plate_event(&raw_plate).await?;
    Ok(Json(outcome.into()))
}

async fn occupancy(State(state): State<AppState>) -> Result<Json<OccupancyResponse>, AppError> {
    let snapshot = state.controller.occupancy().await?;
    Ok(Json(snapshot.into()))
}

async fn health(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    state.controller.health_check().await?;
    Ok(Json(json!({
        "status": "ok",
        "database": "up",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    })))
}
