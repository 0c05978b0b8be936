//! HTTP endpoint handlers

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use tracing::{info, warn};

use super::responses::{ApiResponse, HealthResponse, StatusResponse};
use crate::state::AppState;

fn set_input(state: &AppState, index: usize, checked: bool) -> Result<Json<ApiResponse>, (StatusCode, Json<ApiResponse>)> {
    if index >= state.inputs.len() {
        warn!("No answer option at index {}", index);
        return Err((
            StatusCode::NOT_FOUND,
            Json(ApiResponse::error(
                format!("No answer option at index {}", index),
                state.get_gate_state(),
            )),
        ));
    }

    match state.set_input(index, checked) {
        Ok(()) => {
            let verb = if checked { "checked" } else { "unchecked" };
            info!("Option {} {}", index, verb);
            Ok(Json(ApiResponse::ok(
                format!("Option {} {}", index, verb),
                state.get_gate_state(),
            )))
        }
        Err(e) => {
            warn!("Failed to change option {}: {}", index, e);
            Err((
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(ApiResponse::error(e, state.get_gate_state())),
            ))
        }
    }
}

/// Handle POST /inputs/:index/check
pub async fn check_handler(
    State(state): State<Arc<AppState>>,
    Path(index): Path<usize>,
) -> Result<Json<ApiResponse>, (StatusCode, Json<ApiResponse>)> {
    set_input(&state, index, true)
}

/// Handle POST /inputs/:index/uncheck
pub async fn uncheck_handler(
    State(state): State<Arc<AppState>>,
    Path(index): Path<usize>,
) -> Result<Json<ApiResponse>, (StatusCode, Json<ApiResponse>)> {
    set_input(&state, index, false)
}

/// Handle GET /status - Return the page and behavior state
pub async fn status_handler(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    let (last_action, last_action_time) = state.get_last_action();

    Json(StatusResponse {
        timer: state.get_timer_state(),
        gate: state.get_gate_state(),
        inputs: state.input_states(),
        submissions: state.submissions(),
        uptime: state.get_uptime(),
        port: state.port,
        host: state.host.clone(),
        last_action,
        last_action_time,
    })
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}
