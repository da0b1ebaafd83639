//! Local upload records: one directory per content identity.
//!
//! A record directory `uploads/<identity>/` holds the original upload as
//! `<identity>.<extension>` and, later, whatever the transcode script writes
//! next to it. The directory's existence is the dedup flag; there is no
//! separate status marker.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing::warn;

use crate::error::Result;

/// Outcome of admitting an upload into the library.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdmitOutcome {
    /// A fresh record was created for this identity.
    Created,
    /// The identity already has a record (or one is being created right now).
    Duplicate,
}

/// Owns the uploads root and tracks identities that are mid-admission.
///
/// The in-flight set closes the gap between the existence check and the
/// directory creation: a concurrent upload of the same content observes the
/// reservation and is reported as a duplicate instead of racing the copy.
pub struct VideoLibrary {
    root: PathBuf,
    in_flight: Mutex<HashSet<String>>,
}

impl VideoLibrary {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let _ = std::fs::create_dir_all(&root);
        Self {
            root,
            in_flight: Mutex::new(HashSet::new()),
        }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    #[must_use]
    pub fn record_dir(&self, identity: &str) -> PathBuf {
        self.root.join(identity)
    }

    #[must_use]
    pub fn video_path(&self, identity: &str, extension: &str) -> PathBuf {
        self.record_dir(identity).join(format!("{identity}.{extension}"))
    }

    /// Whether a record exists for `identity`.
    #[must_use]
    pub fn contains(&self, identity: &str) -> bool {
        self.record_dir(identity).is_dir()
    }

    /// Create the record for `identity` by copying `source` into place.
    ///
    /// Exactly one caller wins for a given identity; everyone else gets
    /// `Duplicate`. A failed copy removes the half-created directory before
    /// the error propagates, so no partially-populated record stays visible.
    pub async fn admit(&self, identity: &str, extension: &str, source: &Path) -> Result<AdmitOutcome> {
        let Some(_reservation) = self.try_reserve(identity) else {
            return Ok(AdmitOutcome::Duplicate);
        };

        let record_dir = self.record_dir(identity);
        tokio::fs::create_dir_all(&record_dir).await?;

        let target = self.video_path(identity, extension);
        if let Err(err) = tokio::fs::copy(source, &target).await {
            if let Err(cleanup) = tokio::fs::remove_dir_all(&record_dir).await {
                warn!(%identity, error = %cleanup, "failed to remove partial upload record");
            }
            return Err(err.into());
        }

        Ok(AdmitOutcome::Created)
    }

    fn try_reserve(&self, identity: &str) -> Option<Reservation<'_>> {
        let mut in_flight = self
            .in_flight
            .lock()
            .unwrap_or_else(|e| e.into_inner());
        if in_flight.contains(identity) || self.record_dir(identity).is_dir() {
            return None;
        }
        in_flight.insert(identity.to_string());
        Some(Reservation {
            library: self,
            identity: identity.to_string(),
        })
    }
}

/// Holds an identity in the in-flight set until admission finishes.
struct Reservation<'a> {
    library: &'a VideoLibrary,
    identity: String,
}

impl Drop for Reservation<'_> {
    fn drop(&mut self) {
        let mut in_flight = self
            .library
            .in_flight
            .lock()
            .unwrap_or_else(|e| e.into_inner());
        in_flight.remove(&self.identity);
    }
}
