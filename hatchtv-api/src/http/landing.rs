//! Landing endpoint.

use axum::{response::IntoResponse, Json};

/// Liveness/landing response.
pub async fn landing() -> impl IntoResponse {
    Json("Hello I am the HSL Api!!")
}
