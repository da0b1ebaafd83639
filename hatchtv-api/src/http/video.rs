//! Upload intake and record-status endpoints.

use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;
use tokio::io::AsyncWriteExt;

use hatchtv_core::service::{is_identity, IntakeOutcome, StagedUpload};

use crate::http::error::{AppError, AppResult};
use crate::http::AppState;

#[derive(Debug, Serialize)]
pub struct MsgResponse {
    pub msg: String,
}

/// 200 with an empty body when an upload record exists, 400 otherwise.
pub async fn record_status(
    State(state): State<AppState>,
    Path(identity): Path<String>,
) -> AppResult<StatusCode> {
    if is_identity(&identity) && state.library.contains(&identity) {
        Ok(StatusCode::OK)
    } else {
        Err(AppError::bad_request("Video unknown"))
    }
}

/// A file part staged to a temp file; the file is removed on drop.
struct StagedFile {
    file_name: String,
    mime_type: String,
    temp: tempfile::NamedTempFile,
}

/// Accept a multipart video upload and kick off transcoding.
///
/// Validation, hashing, and the dedup check complete before the response;
/// the transcode itself is dispatched fire-and-forget.
pub async fn upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> AppResult<Json<MsgResponse>> {
    let mut video: Option<StagedFile> = None;
    let mut day: Option<u32> = None;
    let mut file_parts = 0usize;

    while let Some(mut field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::bad_request(format!("malformed multipart body: {e}")))?
    {
        let name = field.name().map(ToString::to_string);
        let is_file = field.file_name().is_some();
        if is_file {
            file_parts += 1;
        }

        match name.as_deref() {
            Some("video") => {
                if video.is_some() {
                    return Err(AppError::bad_request(
                        "Multiple Files were sent! Only one is allowed",
                    ));
                }
                video = Some(stage_field(&mut field).await?);
            }
            Some("day") => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::bad_request(format!("unreadable day field: {e}")))?;
                let trimmed = text.trim();
                if !trimmed.is_empty() {
                    day = Some(
                        trimmed
                            .parse()
                            .map_err(|_| AppError::bad_request("day must be a number"))?,
                    );
                }
            }
            _ => {}
        }
    }

    let Some(staged) = video else {
        if file_parts == 0 {
            return Err(AppError::bad_request("No files were uploaded."));
        }
        return Err(AppError::bad_request(
            "No input file received. Please send video file in video in application/form-data format.",
        ));
    };

    let outcome = state
        .intake
        .accept(StagedUpload {
            file_name: staged.file_name.clone(),
            mime_type: staged.mime_type.clone(),
            path: staged.temp.path().to_path_buf(),
            day,
        })
        .await?;

    let msg = match outcome {
        IntakeOutcome::Accepted { .. } => {
            format!("transcoding started for: {}", staged.file_name)
        }
        IntakeOutcome::AlreadyAccepted { .. } => {
            "transcoding for this file already started or maybe is already finished".to_string()
        }
    };

    Ok(Json(MsgResponse { msg }))
}

/// Stream one multipart field into a temp file.
async fn stage_field(field: &mut axum::extract::multipart::Field<'_>) -> AppResult<StagedFile> {
    let file_name = field.file_name().unwrap_or("upload").to_string();
    let mime_type = field
        .content_type()
        .unwrap_or("application/octet-stream")
        .to_string();

    let temp = tempfile::NamedTempFile::new()
        .map_err(|e| AppError::internal(format!("cannot stage upload: {e}")))?;
    let mut out = tokio::fs::File::create(temp.path())
        .await
        .map_err(|e| AppError::internal(format!("cannot stage upload: {e}")))?;

    while let Some(chunk) = field
        .chunk()
        .await
        .map_err(|e| AppError::bad_request(format!("interrupted upload: {e}")))?
    {
        out.write_all(&chunk)
            .await
            .map_err(|e| AppError::internal(format!("cannot stage upload: {e}")))?;
    }
    out.flush()
        .await
        .map_err(|e| AppError::internal(format!("cannot stage upload: {e}")))?;

    Ok(StagedFile {
        file_name,
        mime_type,
        temp,
    })
}
