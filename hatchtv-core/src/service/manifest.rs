//! Hatch release manifest: one entry per scheduled day.
//!
//! The manifest is a single JSON document owned by the remote store. Every
//! reconciliation fetches it fresh, folds one identity in, and writes the
//! whole document back. Concurrent reconciliations race; the last write
//! wins, and no lock is held across the three remote operations.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{Error, Result};
use crate::store::{RemoteStore, StoreError};

/// Name of the manifest document at the store root.
pub const MANIFEST_NAME: &str = "hatches.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HatchEntry {
    pub id: String,
    pub day: u32,
    pub url: String,
    pub open: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HatchManifest {
    pub hatches: Vec<HatchEntry>,
}

/// Canonical playlist path for a published identity.
#[must_use]
pub fn playlist_url(identity: &str) -> String {
    format!("/{identity}/playlist.m3u8")
}

/// Upsert-by-day.
///
/// A day that already has an entry gets its `id` and `url` rewritten in
/// place; `open` and the sequence order stay untouched. A day without an
/// entry is appended closed.
pub fn reconcile(manifest: &mut HatchManifest, identity: &str, day: u32) {
    let url = playlist_url(identity);
    if let Some(entry) = manifest.hatches.iter_mut().find(|entry| entry.day == day) {
        entry.id = identity.to_string();
        entry.url = url;
    } else {
        manifest.hatches.push(HatchEntry {
            id: identity.to_string(),
            day,
            url,
            open: false,
        });
    }
}

/// Fetch–mutate–replace of the remote manifest.
pub struct HatchReconciler {
    store: Arc<dyn RemoteStore>,
}

impl HatchReconciler {
    pub fn new(store: Arc<dyn RemoteStore>) -> Self {
        Self { store }
    }

    /// Point `day` at `identity` in the remote manifest.
    ///
    /// A store without a manifest yet starts from the empty document;
    /// malformed JSON is a `ManifestParse` error.
    pub async fn sync(&self, identity: &str, day: u32) -> Result<HatchManifest> {
        let mut manifest = match self.store.download(MANIFEST_NAME).await {
            Ok(bytes) => serde_json::from_slice(&bytes)?,
            Err(StoreError::NotFound(_)) => HatchManifest::default(),
            Err(err) => return Err(err.into()),
        };

        reconcile(&mut manifest, identity, day);

        let bytes = serde_json::to_vec_pretty(&manifest).map_err(Error::ManifestParse)?;
        self.store.upload(MANIFEST_NAME, &bytes).await?;
        info!(%identity, day, "hatch manifest updated");
        Ok(manifest)
    }
}
