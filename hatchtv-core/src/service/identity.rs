//! Content identity: SHA-256 digests over uploaded bytes.
//!
//! The hex digest of a file's full content is the upload's only identifier;
//! it names the record directory and acts as the idempotency key for
//! transcode work.

use std::path::Path;

use sha2::{Digest, Sha256};
use tokio::fs::File;
use tokio::io::AsyncReadExt;

use crate::error::Result;

const READ_CHUNK: usize = 64 * 1024;

/// Hex digest of an in-memory value.
#[must_use]
pub fn sha256_hex(value: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(value.as_bytes());
    hex::encode(hasher.finalize())
}

/// Hex digest of a file's full byte content.
///
/// The file is streamed through the hasher in fixed-size chunks, so inputs
/// of arbitrary size never load into memory at once. A read error aborts the
/// whole computation; a digest is only produced once the stream is fully
/// consumed.
pub async fn hash_file(path: &Path) -> Result<String> {
    let mut file = File::open(path).await?;
    let mut hasher = Sha256::new();
    let mut buf = vec![0u8; READ_CHUNK];
    loop {
        let read = file.read(&mut buf).await?;
        if read == 0 {
            break;
        }
        hasher.update(&buf[..read]);
    }
    Ok(hex::encode(hasher.finalize()))
}

/// Whether `value` has the shape of a content identity (64 hex chars).
///
/// Identities double as path components, so anything else is rejected
/// before it reaches the filesystem.
#[must_use]
pub fn is_identity(value: &str) -> bool {
    value.len() == 64 && value.bytes().all(|b| b.is_ascii_hexdigit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn string_hash_matches_known_vector() {
        assert_eq!(
            sha256_hex("hello"),
            "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824"
        );
    }

    #[tokio::test]
    async fn file_hash_matches_string_hash() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clip.bin");
        tokio::fs::write(&path, b"hello").await.unwrap();

        assert_eq!(hash_file(&path).await.unwrap(), sha256_hex("hello"));
    }

    #[tokio::test]
    async fn identical_content_identical_identity() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.mp4");
        let b = dir.path().join("b.mp4");
        tokio::fs::write(&a, b"same frames").await.unwrap();
        tokio::fs::write(&b, b"same frames").await.unwrap();

        assert_eq!(hash_file(&a).await.unwrap(), hash_file(&b).await.unwrap());
    }

    #[tokio::test]
    async fn distinct_content_distinct_identity() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.mp4");
        let b = dir.path().join("b.mp4");
        tokio::fs::write(&a, b"first cut").await.unwrap();
        tokio::fs::write(&b, b"first cut!").await.unwrap();

        assert_ne!(hash_file(&a).await.unwrap(), hash_file(&b).await.unwrap());
    }

    #[tokio::test]
    async fn unreadable_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(hash_file(&dir.path().join("missing.mp4")).await.is_err());
    }

    #[test]
    fn identity_shape() {
        assert!(is_identity(&sha256_hex("x")));
        assert!(!is_identity("abc"));
        assert!(!is_identity("../../../../etc/passwd"));
        let not_hex = "g".repeat(64);
        assert!(!is_identity(&not_hex));
    }
}
