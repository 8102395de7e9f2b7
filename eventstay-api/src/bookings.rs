use axum::{
    extract::{Json, Path, State},
    middleware,
    routing::{get, put},
    Extension, Router,
};
use eventstay_core::{BookingCreated, BookingError, BookingSummary};
use serde::Deserialize;
use tracing::warn;

use crate::error::AppError;
use crate::middleware::{session_auth_middleware, AuthUser};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingRequest {
    #[serde(default)]
    pub room_id: Option<i32>,
}

impl BookingRequest {
    /// A missing room id lands in the invalid partition (0).
    fn room_id(&self) -> i32 {
        self.room_id.unwrap_or_default()
    }
}

pub fn routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/booking", get(get_booking).post(post_booking))
        .route("/booking/{booking_id}", put(put_booking))
        .route_layer(middleware::from_fn_with_state(state, session_auth_middleware))
}

/// GET /booking
/// Current booking of the caller, with its room
async fn get_booking(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<BookingSummary>, AppError> {
    let booking = state
        .bookings
        .get_booking(user.user_id)
        .await
        .map_err(|e| match e {
            BookingError::NotFound(msg) => AppError::NotFoundError(msg),
            other => AppError::from(other),
        })?;

    Ok(Json(booking))
}

/// POST /booking
/// Reserve a room for the caller
async fn post_booking(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(req): Json<BookingRequest>,
) -> Result<Json<BookingCreated>, AppError> {
    let created = state
        .bookings
        .post_booking(user.user_id, req.room_id())
        .await
        .map_err(|e| match e {
            BookingError::BusinessRule(msg) => AppError::AuthorizationError(msg),
            BookingError::NotFound(msg) => AppError::NotFoundError(msg),
            other => AppError::from(other),
        })?;

    Ok(Json(created))
}

/// PUT /booking/{booking_id}
/// Move the caller to another room
async fn put_booking(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(booking_id): Path<String>,
    Json(req): Json<BookingRequest>,
) -> Result<Json<BookingCreated>, AppError> {
    let moved = state
        .bookings
        .put_booking(user.user_id, req.room_id(), &booking_id)
        .await
        .map_err(|e| match e {
            BookingError::BusinessRule(msg) => AppError::AuthorizationError(msg),
            // Not-found has no status of its own on this route.
            BookingError::NotFound(msg) => {
                warn!("Unmapped not-found on booking {} update: {}", booking_id, msg);
                AppError::InternalServerError(msg)
            }
            other => AppError::from(other),
        })?;

    Ok(Json(moved))
}
