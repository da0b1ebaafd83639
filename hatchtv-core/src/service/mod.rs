pub mod identity;
pub mod intake;
pub mod library;
pub mod manifest;
pub mod publish;
pub mod transcode;

pub use identity::{hash_file, is_identity, sha256_hex};
pub use intake::{IntakeOutcome, IntakeService, StagedUpload, VALID_VIDEO_EXTENSIONS};
pub use library::{AdmitOutcome, VideoLibrary};
pub use manifest::{playlist_url, reconcile, HatchEntry, HatchManifest, HatchReconciler};
pub use publish::PublishSync;
pub use transcode::{SystemTranscodeRunner, TranscodeDispatcher, TranscodeJob, TranscodeRunner};
