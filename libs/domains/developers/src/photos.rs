//! Photo storage backends.
//!
//! Profile photos are opaque byte blobs. Where they land is a deployment
//! choice made once at startup: a directory on local disk served back by
//! the app, or a remote photo host reached over HTTP. Both backends hand
//! back the public reference string that gets stored on the developer
//! record.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};
use uuid::Uuid;

use crate::error::{DeveloperError, DeveloperResult};

/// Uploads still carrying this suffix were never finalized
const TEMP_SUFFIX: &str = ".tmp";

/// Destination for uploaded photo bytes, selected once at startup.
#[async_trait]
pub trait PhotoStore: Send + Sync {
    /// Store the bytes and return the public reference to put on the record.
    async fn store(&self, filename_hint: &str, bytes: Vec<u8>) -> DeveloperResult<String>;
}

/// Keep only the extension from the client-supplied filename; the basename
/// is a fresh UUID so uploads can never collide or traverse paths.
fn unique_name(filename_hint: &str) -> String {
    let ext = Path::new(filename_hint)
        .extension()
        .and_then(|e| e.to_str())
        .filter(|e| e.chars().all(|c| c.is_ascii_alphanumeric()))
        .unwrap_or("bin");
    format!("{}.{}", Uuid::new_v4(), ext)
}

/// Writes photos into a local uploads directory. Files go through a temp
/// name plus rename so readers never observe a half-written photo.
pub struct LocalDiskPhotoStore {
    uploads_dir: PathBuf,
}

impl LocalDiskPhotoStore {
    pub fn new(uploads_dir: impl Into<PathBuf>) -> Self {
        Self {
            uploads_dir: uploads_dir.into(),
        }
    }

    /// Remove finalization leftovers older than `max_age`. Best effort:
    /// failures are logged and skipped, never propagated.
    pub async fn cleanup_stale(&self, max_age: Duration) {
        let mut entries = match tokio::fs::read_dir(&self.uploads_dir).await {
            Ok(entries) => entries,
            Err(_) => return,
        };
        let cutoff = SystemTime::now() - max_age;
        while let Ok(Some(entry)) = entries.next_entry().await {
            let path = entry.path();
            let is_temp = path
                .file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.ends_with(TEMP_SUFFIX));
            if !is_temp {
                continue;
            }
            let stale = entry
                .metadata()
                .await
                .and_then(|m| m.modified())
                .map(|modified| modified < cutoff)
                .unwrap_or(false);
            if stale {
                if let Err(e) = tokio::fs::remove_file(&path).await {
                    tracing::warn!(path = %path.display(), error = %e, "failed to remove stale upload");
                } else {
                    tracing::info!(path = %path.display(), "removed stale upload");
                }
            }
        }
    }
}

#[async_trait]
impl PhotoStore for LocalDiskPhotoStore {
    async fn store(&self, filename_hint: &str, bytes: Vec<u8>) -> DeveloperResult<String> {
        tokio::fs::create_dir_all(&self.uploads_dir)
            .await
            .map_err(|e| DeveloperError::PhotoStore(e.to_string()))?;

        let name = unique_name(filename_hint);
        let final_path = self.uploads_dir.join(&name);
        let temp_path = self.uploads_dir.join(format!("{name}{TEMP_SUFFIX}"));

        tokio::fs::write(&temp_path, &bytes)
            .await
            .map_err(|e| DeveloperError::PhotoStore(e.to_string()))?;
        tokio::fs::rename(&temp_path, &final_path)
            .await
            .map_err(|e| DeveloperError::PhotoStore(e.to_string()))?;

        tracing::info!(path = %final_path.display(), size = bytes.len(), "photo stored");
        Ok(format!("/uploads/{name}"))
    }
}

/// Forwards photos to a remote photo host and stores the URL it returns.
pub struct RemotePhotoStore {
    client: reqwest::Client,
    host_url: String,
}

/// Response body of the remote host's upload endpoint
#[derive(serde::Deserialize)]
struct RemoteUploadResponse {
    url: String,
}

impl RemotePhotoStore {
    pub fn new(host_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            host_url: host_url.into(),
        }
    }
}

#[async_trait]
impl PhotoStore for RemotePhotoStore {
    async fn store(&self, filename_hint: &str, bytes: Vec<u8>) -> DeveloperResult<String> {
        let part = reqwest::multipart::Part::bytes(bytes)
            .file_name(unique_name(filename_hint));
        let form = reqwest::multipart::Form::new().part("photo", part);

        let endpoint = format!("{}/upload", self.host_url.trim_end_matches('/'));
        let response = self
            .client
            .post(&endpoint)
            .multipart(form)
            .send()
            .await
            .map_err(|e| DeveloperError::PhotoStore(e.to_string()))?;

        if !response.status().is_success() {
            return Err(DeveloperError::PhotoStore(format!(
                "photo host returned {}",
                response.status()
            )));
        }

        let body: RemoteUploadResponse = response
            .json()
            .await
            .map_err(|e| DeveloperError::PhotoStore(e.to_string()))?;
        tracing::info!(url = %body.url, "photo stored on remote host");
        Ok(body.url)
    }
}
