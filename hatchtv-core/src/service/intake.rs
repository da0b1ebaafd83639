//! Upload intake: format validation, content identity, dedup, dispatch.

use std::path::PathBuf;
use std::sync::Arc;

use tracing::info;

use crate::error::{Error, Result};
use crate::service::identity;
use crate::service::library::{AdmitOutcome, VideoLibrary};
use crate::service::transcode::{TranscodeDispatcher, TranscodeJob};

/// Container/media extensions the transcode script understands.
pub const VALID_VIDEO_EXTENSIONS: &[&str] = &[
    // MP4
    "mp4", "m4a", "m4v", "f4v", "f4a", "m4b", "m4r", "f4b", "mov",
    // 3GP
    "3gp", "3gp2", "3g2", "3gpp", "3gpp2",
    // OGG
    "ogg", "oga", "ogv", "ogx",
    // WMV
    "wmv", "wma", "asf",
    // WEBM
    "webm",
    // FLV
    "flv",
    // AVI
    "avi",
    // Quicktime
    "qt",
    // HDV
    "hdv",
    // MXF
    "op1a", "op-atom",
    // MPEG-TS
    "ts", "mts", "m2ts",
    // WAV
    "wav",
    // Misc
    "lxf", "gxf", "vob",
];

/// A single upload staged on local disk, plus its declared metadata.
#[derive(Debug)]
pub struct StagedUpload {
    pub file_name: String,
    pub mime_type: String,
    pub path: PathBuf,
    pub day: Option<u32>,
}

/// Result of accepting an upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntakeOutcome {
    /// New content: a record was created and a transcode dispatched.
    Accepted { identity: String, extension: String },
    /// Identical content was seen before; nothing was written or dispatched.
    AlreadyAccepted { identity: String },
}

pub struct IntakeService {
    library: Arc<VideoLibrary>,
    dispatcher: Arc<TranscodeDispatcher>,
}

impl IntakeService {
    pub fn new(library: Arc<VideoLibrary>, dispatcher: Arc<TranscodeDispatcher>) -> Self {
        Self { library, dispatcher }
    }

    /// Map a declared MIME type to a recognized video extension.
    pub fn extension_for(mime_type: &str) -> Result<String> {
        let essence = mime_type
            .split(';')
            .next()
            .unwrap_or(mime_type)
            .trim()
            .to_ascii_lowercase();
        let extension = mime_guess::get_mime_extensions_str(&essence)
            .and_then(|extensions| extensions.first())
            .ok_or_else(|| Error::UnsupportedFormat(mime_type.to_string()))?;
        if !VALID_VIDEO_EXTENSIONS
            .iter()
            .any(|valid| valid.eq_ignore_ascii_case(extension))
        {
            return Err(Error::UnsupportedFormat(mime_type.to_string()));
        }
        Ok((*extension).to_string())
    }

    /// Validate, identify, dedup, and (for new content) stage the upload
    /// and hand it to the dispatcher. Runs to completion before the HTTP
    /// response is formed; only the transcode itself is detached.
    pub async fn accept(&self, upload: StagedUpload) -> Result<IntakeOutcome> {
        let extension = Self::extension_for(&upload.mime_type)?;
        let identity = identity::hash_file(&upload.path).await?;

        match self
            .library
            .admit(&identity, &extension, &upload.path)
            .await?
        {
            AdmitOutcome::Duplicate => {
                info!(%identity, "duplicate upload, record already present");
                Ok(IntakeOutcome::AlreadyAccepted { identity })
            }
            AdmitOutcome::Created => {
                info!(
                    %identity,
                    %extension,
                    file_name = %upload.file_name,
                    "upload accepted"
                );
                let _ = self.dispatcher.dispatch(TranscodeJob {
                    identity: identity.clone(),
                    extension: extension.clone(),
                    day: upload.day,
                });
                Ok(IntakeOutcome::Accepted { identity, extension })
            }
        }
    }
}
