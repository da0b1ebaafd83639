//! Remote blob store with directory semantics.
//!
//! The publish target is modeled as a flat key/value store whose keys are
//! `/`-separated paths relative to a configured root. The FTP transport is
//! one implementation; tests use the in-memory one.

pub mod ftp;
pub mod memory;

use async_trait::async_trait;
use thiserror::Error;

pub use ftp::FtpStore;
pub use memory::MemoryStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("remote entry not found: {0}")]
    NotFound(String),

    #[error("remote store failure: {0}")]
    Transport(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

#[async_trait]
pub trait RemoteStore: Send + Sync {
    /// Names of entries directly under `dir` (`""` for the store root).
    async fn list(&self, dir: &str) -> StoreResult<Vec<String>>;

    /// Full content of the file at `path`; `StoreError::NotFound` when the
    /// entry does not exist.
    async fn download(&self, path: &str) -> StoreResult<Vec<u8>>;

    /// Create or replace the file at `path`.
    async fn upload(&self, path: &str, data: &[u8]) -> StoreResult<()>;

    async fn create_dir(&self, path: &str) -> StoreResult<()>;
}
