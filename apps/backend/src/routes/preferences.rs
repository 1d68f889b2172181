//! Preference endpoints

use axum::{extract::State, Json};

use crate::models::{PreferencesResponse, UpdatePreferencesRequest};
use crate::AppState;

/// GET /api/preferences
pub async fn get(State(state): State<AppState>) -> Json<PreferencesResponse> {
    Json(PreferencesResponse {
        simulated_mode: state.preferences.simulated_mode(),
    })
}

/// PUT /api/preferences
/// Changes apply from the next ingestion attempt onwards
pub async fn update(
    State(state): State<AppState>,
    Json(request): Json<UpdatePreferencesRequest>,
) -> Json<PreferencesResponse> {
    if let Some(simulated_mode) = request.simulated_mode {
        state.preferences.set_simulated_mode(simulated_mode);
        tracing::info!(simulated_mode, "updated preferences");
    }

    Json(PreferencesResponse {
        simulated_mode: state.preferences.simulated_mode(),
    })
}
