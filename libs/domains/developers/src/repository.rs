use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{DeveloperError, DeveloperResult};
use crate::models::Developer;

/// Storage abstraction for developer records.
///
/// Implementations enforce email uniqueness (case-insensitive) on both
/// create and update; everything else is plain keyed CRUD.
#[async_trait]
pub trait DeveloperRepository: Send + Sync {
    async fn create(&self, developer: Developer) -> DeveloperResult<Developer>;
    async fn get_by_id(&self, id: Uuid) -> DeveloperResult<Developer>;
    /// Full snapshot of the record set, in no particular order
    async fn list_all(&self) -> DeveloperResult<Vec<Developer>>;
    async fn update(&self, developer: Developer) -> DeveloperResult<Developer>;
    async fn delete(&self, id: Uuid) -> DeveloperResult<()>;
}

/// In-memory repository backed by a HashMap. The process's working set is
/// the store; nothing survives a restart.
#[derive(Clone, Default)]
pub struct InMemoryDeveloperRepository {
    records: Arc<RwLock<HashMap<Uuid, Developer>>>,
}

impl InMemoryDeveloperRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

fn email_taken(records: &HashMap<Uuid, Developer>, email: &str, exclude: Option<Uuid>) -> bool {
    let email = email.to_lowercase();
    records
        .values()
        .any(|dev| dev.email.to_lowercase() == email && exclude != Some(dev.id))
}

#[async_trait]
impl DeveloperRepository for InMemoryDeveloperRepository {
    async fn create(&self, developer: Developer) -> DeveloperResult<Developer> {
        let mut records = self.records.write().await;
        if email_taken(&records, &developer.email, None) {
            return Err(DeveloperError::DuplicateEmail(developer.email));
        }
        records.insert(developer.id, developer.clone());
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
        records.insert(developer.id, developer.clone());
        tracing::info!(developer_id = %developer.id, "developer record updated");
        Ok(developer)
    }

    async fn delete(&self, id: Uuid) -> DeveloperResult<()> {
        let mut records = self.records.write().await;
        records
            .remove(&id)
            .map(|_| tracing::info!(developer_id = %id, "developer record deleted"))
            .ok_or(DeveloperError::NotFound(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CreateDeveloper, Role, UpdateDeveloper};

    fn create_input(name: &str, email: &str) -> CreateDeveloper {
        CreateDeveloper {
            name: name.to_string(),
            email: email.to_string(),
            role: Role::Backend,
            tech_stack: vec!["Rust".to_string()],
            experience: 3.0,
            description: "Builds backend services.".to_string(),
            joining_date: None,
            photo: None,
        }
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let repo = InMemoryDeveloperRepository::new();
        let owner = Uuid::new_v4();
        let dev = Developer::new(create_input("Alice", "alice@example.com"), owner);

        let created = repo.create(dev.clone()).await.unwrap();
        assert_eq!(created.id, dev.id);

        let fetched = repo.get_by_id(dev.id).await.unwrap();
        assert_eq!(fetched.email, "alice@example.com");
        assert_eq!(fetched.created_by, owner);
    }

    #[tokio::test]
    async fn test_create_rejects_duplicate_email_case_insensitive() {
        let repo = InMemoryDeveloperRepository::new();
        let owner = Uuid::new_v4();
        repo.create(Developer::new(
            create_input("Alice", "alice@example.com"),
            owner,
        ))
        .await
        .unwrap();

        let result = repo
            .create(Developer::new(
                create_input("Other", "ALICE@example.com"),
                owner,
            ))
            .await;
        assert!(matches!(result, Err(DeveloperError::DuplicateEmail(_))));
    }

    #[tokio::test]
    async fn test_get_missing_returns_not_found() {
        let repo = InMemoryDeveloperRepository::new();
        let id = Uuid::new_v4();
        assert!(matches!(
            repo.get_by_id(id).await,
            Err(DeveloperError::NotFound(missing)) if missing == id
        ));
    }

    #[tokio::test]
    async fn test_update_replaces_record() {
        let repo = InMemoryDeveloperRepository::new();
        let owner = Uuid::new_v4();
        let mut dev = repo
            .create(Developer::new(
                create_input("Alice", "alice@example.com"),
                owner,
            ))
            .await
            .unwrap();

        dev.apply_update(UpdateDeveloper {
            name: "Alice Cooper".to_string(),
            email: "alice@example.com".to_string(),
            role: Role::FullStack,
            tech_stack: vec!["Rust".to_string(), "React".to_string()],
            experience: 4.5,
            description: "Now does both ends of the stack.".to_string(),
            joining_date: None,
            photo: None,
        });
        let updated = repo.update(dev.clone()).await.unwrap();
        assert_eq!(updated.name, "Alice Cooper");

        let fetched = repo.get_by_id(dev.id).await.unwrap();
        assert_eq!(fetched.role, Role::FullStack);
        assert_eq!(fetched.experience, 4.5);
    }

    #[tokio::test]
    async fn test_update_rejects_email_of_other_record() {
        let repo = InMemoryDeveloperRepository::new();
        let owner = Uuid::new_v4();
        repo.create(Developer::new(
            create_input("Alice", "alice@example.com"),
            owner,
        ))
        .await
        .unwrap();
        let mut bob = repo
            .create(Developer::new(create_input("Bob", "bob@example.com"), owner))
            .await
            .unwrap();

        bob.email = "alice@example.com".to_string();
        assert!(matches!(
            repo.update(bob).await,
            Err(DeveloperError::DuplicateEmail(_))
        ));
    }

    #[tokio::test]
    async fn test_update_keeping_own_email_is_allowed() {
        let repo = InMemoryDeveloperRepository::new();
        let owner = Uuid::new_v4();
        let mut dev = repo
            .create(Developer::new(
                create_input("Alice", "alice@example.com"),
                owner,
            ))
            .await
            .unwrap();

        dev.name = "Alice Cooper".to_string();
        assert!(repo.update(dev).await.is_ok());
    }

    #[tokio::test]
    async fn test_delete_removes_record() {
        let repo = InMemoryDeveloperRepository::new();
        let owner = Uuid::new_v4();
        let dev = repo
            .create(Developer::new(
                create_input("Alice", "alice@example.com"),
                owner,
            ))
            .await
            .unwrap();

        repo.delete(dev.id).await.unwrap();
        assert!(repo.get_by_id(dev.id).await.is_err());
        assert!(matches!(
            repo.delete(dev.id).await,
            Err(DeveloperError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_list_all_returns_snapshot() {
        let repo = InMemoryDeveloperRepository::new();
        let owner = Uuid::new_v4();
        for i in 0..3 {
            repo.create(Developer::new(
                create_input(&format!("Dev{}", i), &format!("dev{}@example.com", i)),
                owner,
            ))
            .await
            .unwrap();
        }
        assert_eq!(repo.list_all().await.unwrap().len(), 3);
    }
}
