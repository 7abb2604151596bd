//! Axum router wiring.
//!
//! The request policy is layered in front of whatever downstream router the
//! host supplies; the binary uses [`default_downstream`].

use axum::{http::StatusCode, Router};

use crate::{app_state::AppState, filter};

pub fn build_router(state: &AppState, downstream: Router) -> Router {
    filter::wrap(downstream, state.filter())
}

/// Stand-in downstream: answers every admitted request with `200 ok`.
pub fn default_downstream() -> Router {
    Router::new().fallback(|| async { (StatusCode::OK, "ok") })
}
