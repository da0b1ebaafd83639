//! Hatch hook: reconcile the manifest, then publish the upload directory.
//!
//! Invoked out-of-band (typically by the transcode script once HLS output
//! exists), not by the upload request path.

use axum::extract::{Path, State};
use axum::Json;
use serde::Serialize;

use hatchtv_core::service::is_identity;

use crate::http::error::{AppError, AppResult};
use crate::http::AppState;

#[derive(Debug, Serialize)]
pub struct HookResponse {
    pub msg: String,
}

pub async fn run_hook(
    State(state): State<AppState>,
    Path((identity, day)): Path<(String, u32)>,
) -> AppResult<Json<HookResponse>> {
    let (Some(reconciler), Some(publisher)) = (&state.reconciler, &state.publisher) else {
        return Err(AppError::not_found("remote publishing is not configured"));
    };

    if !is_identity(&identity) || !state.library.contains(&identity) {
        return Err(AppError::bad_request("Video unknown"));
    }

    reconciler.sync(&identity, day).await?;
    publisher
        .ensure_published(&identity, &state.library.record_dir(&identity))
        .await?;

    Ok(Json(HookResponse {
        msg: format!("hatch {day} now serves {identity}"),
    }))
}
