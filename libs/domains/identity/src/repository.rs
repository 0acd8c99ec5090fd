use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{IdentityError, IdentityResult};
use crate::models::Identity;

/// Storage abstraction for identities. Identities are append-only;
/// implementations enforce email uniqueness (case-insensitive) at create.
#[async_trait]
pub trait IdentityRepository: Send + Sync {
    async fn create(&self, identity: Identity) -> IdentityResult<Identity>;
    async fn get_by_id(&self, id: Uuid) -> IdentityResult<Identity>;
    /// Lookup by email, lowercased before comparison. `None` means no such
    /// identity; it is not an error here because login folds that into the
    /// credentials check.
    async fn find_by_email(&self, email: &str) -> IdentityResult<Option<Identity>>;
}

/// In-memory identity store for tests and the memory storage backend.
#[derive(Clone, Default)]
pub struct InMemoryIdentityRepository {
    records: Arc<RwLock<HashMap<Uuid, Identity>>>,
}

impl InMemoryIdentityRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl IdentityRepository for InMemoryIdentityRepository {
    async fn create(&self, identity: Identity) -> IdentityResult<Identity> {
        let mut records = self.records.write().await;
        let email = identity.email.to_lowercase();
        if records.values().any(|i| i.email.to_lowercase() == email) {
            return Err(IdentityError::DuplicateEmail(identity.email));
        }
        records.insert(identity.id, identity.clone());
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
