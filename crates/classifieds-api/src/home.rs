use axum::{Json, extract::State};

use classifieds_types::api::HomeResponse;

use crate::state::AppState;

/// GET /
pub async fn home(State(state): State<AppState>) -> Json<HomeResponse> {
    Json(HomeResponse {
        installed: state.config.installed.clone(),
        my_statement: "Nice to see you!".to_string(),
    })
}
