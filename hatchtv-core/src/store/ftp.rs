//! FTP-backed remote store.
//!
//! Every operation opens its own control connection, logs in, and changes
//! into the configured root directory. The blocking FTP client runs on the
//! tokio blocking pool so handlers are never stalled on socket I/O.

use std::io::Cursor;

use suppaftp::{FtpError, FtpStream, Status};
use tracing::debug;

use super::{RemoteStore, StoreError, StoreResult};
use crate::config::FtpConfig;

pub struct FtpStore {
    config: FtpConfig,
}

impl FtpStore {
    #[must_use]
    pub fn new(config: FtpConfig) -> Self {
        Self { config }
    }

    fn connect(config: &FtpConfig) -> StoreResult<FtpStream> {
        let addr = format!("{}:{}", config.host, config.port);
        let mut stream = FtpStream::connect(&addr).map_err(transport)?;
        stream
            .login(&config.username, &config.password)
            .map_err(transport)?;
        if !config.root_dir.is_empty() {
            stream.cwd(&config.root_dir).map_err(transport)?;
        }
        debug!(%addr, "ftp connection established");
        Ok(stream)
    }

    async fn with_connection<T, F>(&self, op: F) -> StoreResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut FtpStream) -> StoreResult<T> + Send + 'static,
    {
        let config = self.config.clone();
        tokio::task::spawn_blocking(move || {
            let mut stream = Self::connect(&config)?;
            let result = op(&mut stream);
            let _ = stream.quit();
            result
        })
        .await
        .map_err(|e| StoreError::Transport(e.to_string()))?
    }
}

fn transport(err: FtpError) -> StoreError {
    StoreError::Transport(err.to_string())
}

/// Servers report NLST entries with varying amounts of leading path.
fn base_name(entry: &str) -> &str {
    entry.rsplit('/').next().unwrap_or(entry)
}

#[async_trait::async_trait]
impl RemoteStore for FtpStore {
    async fn list(&self, dir: &str) -> StoreResult<Vec<String>> {
        let dir = dir.to_string();
        self.with_connection(move |stream| {
            let target = if dir.is_empty() { None } else { Some(dir.as_str()) };
            let names = stream.nlst(target).map_err(transport)?;
            Ok(names
                .iter()
                .map(|entry| base_name(entry).to_string())
                .filter(|name| !name.is_empty())
                .collect())
        })
        .await
    }

    async fn download(&self, path: &str) -> StoreResult<Vec<u8>> {
        let path = path.to_string();
        self.with_connection(move |stream| match stream.retr_as_buffer(&path) {
            Ok(buffer) => Ok(buffer.into_inner()),
            Err(FtpError::UnexpectedResponse(response))
                if response.status == Status::FileUnavailable =>
            {
                Err(StoreError::NotFound(path.clone()))
            }
            Err(e) => Err(transport(e)),
        })
        .await
    }

    async fn upload(&self, path: &str, data: &[u8]) -> StoreResult<()> {
        let path = path.to_string();
        let data = data.to_vec();
        self.with_connection(move |stream| {
            stream
                .put_file(&path, &mut Cursor::new(data))
                .map_err(transport)?;
            Ok(())
        })
        .await
    }

    async fn create_dir(&self, path: &str) -> StoreResult<()> {
        let path = path.to_string();
        self.with_connection(move |stream| stream.mkdir(&path).map_err(transport))
            .await
    }
}
