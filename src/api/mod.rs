use std::sync::Arc;

use axum::{
    Router,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::post,
};
use serde::Serialize;
use tracing::{info, warn};

use crate::TravelPlanError;
use crate::models::{BODY_TOO_LARGE, DayPlan, INVALID_BODY, ItineraryPayload};
use crate::planner::ItineraryPlanner;

#[derive(Clone)]
pub struct AppState {
    planner: Arc<ItineraryPlanner>,
    max_days: u32,
}

impl AppState {
    pub fn new(planner: Arc<ItineraryPlanner>, max_days: u32) -> Self {
        Self { planner, max_days }
    }
}

#[derive(Serialize)]
pub struct ApiError {
    pub error: String,
}

impl IntoResponse for TravelPlanError {
    fn into_response(self) -> Response {
        let status = match self {
            TravelPlanError::Validation { .. } => StatusCode::BAD_REQUEST,
            TravelPlanError::Config { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let body = ApiError {
            error: self.user_message(),
        };
        (status, Json(body)).into_response()
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/get_itinerary", post(get_itinerary))
        .with_state(state)
}

async fn get_itinerary(
    State(state): State<AppState>,
    payload: Result<Json<ItineraryPayload>, JsonRejection>,
) -> Result<Json<Vec<DayPlan>>, TravelPlanError> {
    let Json(payload) = payload.map_err(|rejection| {
        warn!("Unreadable itinerary request: {}", rejection.body_text());
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            TravelPlanError::validation(BODY_TOO_LARGE)
        } else {
            TravelPlanError::validation(INVALID_BODY)
        }
    })?;

    let request = payload.validate(state.max_days).inspect_err(|e| {
        warn!("Rejected itinerary request: {}", e);
    })?;

    info!(
        "Itinerary requested for {} ({} days)",
        request.destination, request.days
    );
    let itinerary = state.planner.plan(&request).await;
    Ok(Json(itinerary))
}
