use thiserror::Error;

use crate::store::StoreError;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid upload: {0}")]
    Validation(String),

    #[error("Video format is not supported: {0}")]
    UnsupportedFormat(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Remote store error: {0}")]
    RemoteStore(String),

    #[error("Manifest parse error: {0}")]
    ManifestParse(#[from] serde_json::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<StoreError> for Error {
    fn from(err: StoreError) -> Self {
        Self::RemoteStore(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
