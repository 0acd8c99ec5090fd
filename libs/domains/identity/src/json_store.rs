//! JSON-file persistence for identities, same discipline as the developer
//! store: full set in memory, temp-file-plus-rename on every write.

use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{IdentityError, IdentityResult};
use crate::models::Identity;
use crate::repository::IdentityRepository;

/// On-disk record. The wire type skips the hash on serialize, so the store
/// keeps its own shape with the hash included.
#[derive(serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredIdentity {
    id: Uuid,
    name: String,
    email: String,
    password_hash: String,
    created_at: chrono::DateTime<chrono::Utc>,
}

impl From<&Identity> for StoredIdentity {
    fn from(identity: &Identity) -> Self {
        Self {
            id: identity.id,
            name: identity.name.clone(),
            email: identity.email.clone(),
            password_hash: identity.password_hash.clone(),
            created_at: identity.created_at,
        }
    }
}

impl From<StoredIdentity> for Identity {
    fn from(stored: StoredIdentity) -> Self {
        Self {
            id: stored.id,
            name: stored.name,
            email: stored.email,
            password_hash: stored.password_hash,
            created_at: stored.created_at,
        }
    }
}

pub struct JsonFileIdentityRepository {
    path: PathBuf,
    records: Arc<RwLock<HashMap<Uuid, Identity>>>,
}

impl JsonFileIdentityRepository {
    /// Open the store at `path`; a missing file starts empty.
    pub async fn open(path: impl AsRef<Path>) -> IdentityResult<Self> {
        let path = path.as_ref().to_path_buf();
        let records = match tokio::fs::read(&path).await {
            Ok(bytes) => {
                let list: Vec<StoredIdentity> = serde_json::from_slice(&bytes)
                    .map_err(|e| IdentityError::Storage(format!("corrupt store file: {e}")))?;
                list.into_iter()
                    .map(Identity::from)
                    .map(|i| (i.id, i))
                    .collect()
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => HashMap::new(),
            Err(e) => return Err(IdentityError::Storage(e.to_string())),
        };
        tracing::info!(path = %path.display(), count = records.len(), "identity store opened");
        Ok(Self {
            path,
            records: Arc::new(RwLock::new(records)),
        })
    }

    async fn persist(&self, records: &HashMap<Uuid, Identity>) -> IdentityResult<()> {
        let list: Vec<StoredIdentity> = records.values().map(StoredIdentity::from).collect();
        let bytes =
            serde_json::to_vec_pretty(&list).map_err(|e| IdentityError::Storage(e.to_string()))?;

        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| IdentityError::Storage(e.to_string()))?;
        }
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, &bytes)
            .await
            .map_err(|e| IdentityError::Storage(e.to_string()))?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .map_err(|e| IdentityError::Storage(e.to_string()))?;
        Ok(())
    }
}

#[async_trait]
impl IdentityRepository for JsonFileIdentityRepository {
    async fn create(&self, identity: Identity) -> IdentityResult<Identity> {
        let mut records = self.records.write().await;
        let email = identity.email.to_lowercase();
        if records.values().any(|i| i.email.to_lowercase() == email) {
            return Err(IdentityError::DuplicateEmail(identity.email));
        }
        records.insert(identity.id, identity.clone());
        if let Err(e) = self.persist(&records).await {
            records.remove(&identity.id);
            return Err(e);
        }
        tracing::info!(identity_id = %identity.id, "identity created");
        Ok(identity)
    }

    async fn get_by_id(&self, id: Uuid) -> IdentityResult<Identity> {
        let records = self.records.read().await;
        records.get(&id).cloned().ok_or(IdentityError::NotFound(id))
    }

    async fn find_by_email(&self, email: &str) -> IdentityResult<Option<Identity>> {
        let email = email.to_lowercase();
        let records = self.records.read().await;
        Ok(records
            .values()
            .find(|i| i.email.to_lowercase() == email)
            .cloned())
    }
}
