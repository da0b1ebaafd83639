//! In-memory remote store used by tests and local development.

use std::collections::{BTreeMap, BTreeSet};

use async_trait::async_trait;
use tokio::sync::Mutex;

use super::{RemoteStore, StoreError, StoreResult};

#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

#[derive(Default)]
struct Inner {
    files: BTreeMap<String, Vec<u8>>,
    dirs: BTreeSet<String>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stored content of `path`, if any.
    pub async fn file(&self, path: &str) -> Option<Vec<u8>> {
        self.inner.lock().await.files.get(path).cloned()
    }

    pub async fn has_dir(&self, path: &str) -> bool {
        self.inner.lock().await.dirs.contains(path)
    }
}

#[async_trait]
impl RemoteStore for MemoryStore {
    async fn list(&self, dir: &str) -> StoreResult<Vec<String>> {
        let inner = self.inner.lock().await;
        let prefix = if dir.is_empty() {
            String::new()
        } else {
            format!("{dir}/")
        };

        let mut names = BTreeSet::new();
        for path in inner.files.keys().chain(inner.dirs.iter()) {
            if let Some(rest) = path.strip_prefix(&prefix) {
                if let Some(first) = rest.split('/').next() {
                    if !first.is_empty() {
                        names.insert(first.to_string());
                    }
                }
            }
        }
        Ok(names.into_iter().collect())
    }

    async fn download(&self, path: &str) -> StoreResult<Vec<u8>> {
        self.inner
            .lock()
            .await
            .files
            .get(path)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(path.to_string()))
    }

    async fn upload(&self, path: &str, data: &[u8]) -> StoreResult<()> {
        self.inner
            .lock()
            .await
            .files
            .insert(path.to_string(), data.to_vec());
        Ok(())
    }

    async fn create_dir(&self, path: &str) -> StoreResult<()> {
        self.inner.lock().await.dirs.insert(path.to_string());
        Ok(())
    }
}
