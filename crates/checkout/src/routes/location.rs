//! Session location lookup and manual override.

use axum::Json;
use axum::extract::{Path, State};
use serde::Deserialize;
use tracing::instrument;

use crate::error::Result;
use crate::location::ResolvedLocation;
use crate::state::AppState;

/// Resolve the location for a session without coordinates. Serves the
/// cached entry when fresh, otherwise falls back to domestic pricing.
#[instrument(skip(state))]
pub async fn get_location(
    State(state): State<AppState>,
    Path(session): Path<String>,
) -> Result<Json<ResolvedLocation>> {
    let resolved = state.locations().resolve(&session, None).await;
    Ok(Json(resolved))
}

/// Request body for `PUT /api/location`.
#[derive(Debug, Deserialize)]
pub struct SetLocationRequest {
    pub session: String,
    /// Region or country name, looked up against the rate sheet.
    pub location: String,
}

/// Manually pin a session to a region. Overwrites any cached detection
/// and restarts the 24h clock.
#[instrument(skip(state, request), fields(location = %request.location))]
pub async fn set_location(
    State(state): State<AppState>,
    Json(request): Json<SetLocationRequest>,
) -> Result<Json<ResolvedLocation>> {
    let resolved = state
        .locations()
        .set_location(&request.session, &request.location)
        .await;
    Ok(Json(resolved))
}
