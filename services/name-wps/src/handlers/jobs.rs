//! Job status handler.

use axum::{extract::Extension, Json};
use std::sync::Arc;

use crate::state::AppState;
use crate::tracker::JobsResponse;

/// GET /jobs - Active and recent jobs
pub async fn jobs_handler(Extension(state): Extension<Arc<AppState>>) -> Json<JobsResponse> {
    Json(state.tracker.get_status().await)
}
