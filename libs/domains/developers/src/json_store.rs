//! JSON-file persistence for developer records.
//!
//! The whole record set lives in memory; the file is a durability log of
//! the latest state. Every mutation rewrites the file through a temp file
//! in the same directory followed by a rename, so a crash mid-write leaves
//! either the old state or the new one, never a torn file. A mutation is
//! kept in memory only when the file write succeeds, so readers never see
//! state the file does not hold.

use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{DeveloperError, DeveloperResult};
use crate::models::Developer;
use crate::repository::DeveloperRepository;

pub struct JsonFileDeveloperRepository {
    path: PathBuf,
    records: Arc<RwLock<HashMap<Uuid, Developer>>>,
}

impl JsonFileDeveloperRepository {
    /// Open the store at `path`, loading any existing records. A missing
    /// file means an empty directory, not an error.
    pub async fn open(path: impl AsRef<Path>) -> DeveloperResult<Self> {
        let path = path.as_ref().to_path_buf();
        let records = match tokio::fs::read(&path).await {
            Ok(bytes) => {
                let list: Vec<Developer> = serde_json::from_slice(&bytes)
                    .map_err(|e| DeveloperError::Storage(format!("corrupt store file: {e}")))?;
                list.into_iter().map(|dev| (dev.id, dev)).collect()
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => HashMap::new(),
            Err(e) => return Err(DeveloperError::Storage(e.to_string())),
        };
        tracing::info!(path = %path.display(), count = records.len(), "developer store opened");
        Ok(Self {
            path,
            records: Arc::new(RwLock::new(records)),
        })
    }

    /// Serialize the current state and atomically replace the store file.
    /// Callers must hold the write lock across the call so persisted states
    /// are totally ordered.
    async fn persist(&self, records: &HashMap<Uuid, Developer>) -> DeveloperResult<()> {
        let list: Vec<&Developer> = records.values().collect();
        let bytes = serde_json::to_vec_pretty(&list)
            .map_err(|e| DeveloperError::Storage(e.to_string()))?;

        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| DeveloperError::Storage(e.to_string()))?;
        }
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, &bytes)
            .await
            .map_err(|e| DeveloperError::Storage(e.to_string()))?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .map_err(|e| DeveloperError::Storage(e.to_string()))?;
        Ok(())
    }
}

fn email_taken(records: &HashMap<Uuid, Developer>, email: &str, exclude: Option<Uuid>) -> bool {
    let email = email.to_lowercase();
    records
        .values()
        .any(|dev| dev.email.to_lowercase() == email && exclude != Some(dev.id))
}

#[async_trait]
impl DeveloperRepository for JsonFileDeveloperRepository {
    async fn create(&self, developer: Developer) -> DeveloperResult<Developer> {
        let mut records = self.records.write().await;
        if email_taken(&records, &developer.email, None) {
            return Err(DeveloperError::DuplicateEmail(developer.email));
        }
        records.insert(developer.id, developer.clone());
        if let Err(e) = self.persist(&records).await {
            records.remove(&developer.id);
            return Err(e);
        }
        tracing::info!(developer_id = %developer.id, "developer record created");
        Ok(developer)
    }

    async fn get_by_id(&self, id: Uuid) -> DeveloperResult<Developer> {
        let records = self.records.read().await;
        records
            .get(&id)
            .cloned()
            .ok_or(DeveloperError::NotFound(id))
    }

    async fn list_all(&self) -> DeveloperResult<Vec<Developer>> {
        let records = self.records.read().await;
        Ok(records.values().cloned().collect())
    }

    async fn update(&self, developer: Developer) -> DeveloperResult<Developer> {
        let mut records = self.records.write().await;
        if !records.contains_key(&developer.id) {
            return Err(DeveloperError::NotFound(developer.id));
        }
        if email_taken(&records, &developer.email, Some(developer.id)) {
            return Err(DeveloperError::DuplicateEmail(developer.email));
        }
        let previous = records.insert(developer.id, developer.clone());
        if let Err(e) = self.persist(&records).await {
            match previous {
                Some(old) => {
                    records.insert(developer.id, old);
                }
                None => {
                    records.remove(&developer.id);
                }
            }
            return Err(e);
        }
        tracing::info!(developer_id = %developer.id, "developer record updated");
        Ok(developer)
    }

    async fn delete(&self, id: Uuid) -> DeveloperResult<()> {
        let mut records = self.records.write().await;
        let Some(removed) = records.remove(&id) else {
            return Err(DeveloperError::NotFound(id));
        };
        if let Err(e) = self.persist(&records).await {
            records.insert(id, removed);
            return Err(e);
        }
        tracing::info!(developer_id = %id, "developer record deleted");
        Ok(())
    }
}
