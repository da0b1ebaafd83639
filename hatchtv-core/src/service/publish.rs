//! Publish sync: mirror a finished upload directory into the remote store.

use std::path::Path;
use std::sync::Arc;

use tracing::info;

use crate::error::Result;
use crate::store::RemoteStore;

pub struct PublishSync {
    store: Arc<dyn RemoteStore>,
}

impl PublishSync {
    pub fn new(store: Arc<dyn RemoteStore>) -> Self {
        Self { store }
    }

    /// Upload the record directory unless the identity is already present
    /// remotely. Presence means published; contents are never compared or
    /// re-uploaded.
    pub async fn ensure_published(&self, identity: &str, local_dir: &Path) -> Result<()> {
        let existing = self.store.list("").await?;
        if existing.iter().any(|name| name == identity) {
            info!(%identity, "already published, skipping upload");
            return Ok(());
        }

        self.store.create_dir(identity).await?;

        let mut entries = tokio::fs::read_dir(local_dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            if !entry.file_type().await?.is_file() {
                continue;
            }
            let data = tokio::fs::read(entry.path()).await?;
            let name = entry.file_name();
            let remote_path = format!("{identity}/{}", name.to_string_lossy());
            self.store.upload(&remote_path, &data).await?;
        }

        info!(%identity, "upload directory published");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    const ID: &str = "0123456789abcdef0123456789abcdef0123456789abcdef0123456789abcdef";

    async fn seed_local_output(dir: &Path) {
        tokio::fs::create_dir_all(dir).await.unwrap();
        tokio::fs::write(dir.join("playlist.m3u8"), b"#EXTM3U")
            .await
            .unwrap();
        tokio::fs::write(dir.join("segment0.ts"), b"\x47segment")
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn publishes_every_file_when_absent_remotely() {
        let tmp = tempfile::tempdir().unwrap();
        let local = tmp.path().join(ID);
        seed_local_output(&local).await;

        let store = Arc::new(MemoryStore::new());
        let publisher = PublishSync::new(store.clone());
        publisher.ensure_published(ID, &local).await.unwrap();

        assert!(store.has_dir(ID).await);
        assert_eq!(
            store.file(&format!("{ID}/playlist.m3u8")).await.unwrap(),
            b"#EXTM3U"
        );
        assert!(store.file(&format!("{ID}/segment0.ts")).await.is_some());
    }

    #[tokio::test]
    async fn skips_upload_when_already_present() {
        let tmp = tempfile::tempdir().unwrap();
        let local = tmp.path().join(ID);
        seed_local_output(&local).await;

        let store = Arc::new(MemoryStore::new());
        store.create_dir(ID).await.unwrap();

        let publisher = PublishSync::new(store.clone());
        publisher.ensure_published(ID, &local).await.unwrap();

        // nothing was copied under the existing directory
        assert!(store.file(&format!("{ID}/playlist.m3u8")).await.is_none());
    }

    #[tokio::test]
    async fn missing_local_directory_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        let store = Arc::new(MemoryStore::new());
        let publisher = PublishSync::new(store);

        assert!(publisher
            .ensure_published(ID, &tmp.path().join("absent"))
            .await
            .is_err());
    }
}
