use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

use crate::error::{DeveloperError, DeveloperResult};
use crate::models::{
    CreateDeveloper, Developer, DirectoryAnalytics, DirectoryQuery, RoleCount, TechCount,
    UpdateDeveloper,
};
use crate::photos::PhotoStore;
use crate::query::{run_query, QueryPage};
use crate::repository::DeveloperRepository;

/// How many tech-stack entries the analytics summary reports
const POPULAR_TECH_LIMIT: usize = 10;

/// Business logic for the developer directory.
///
/// Mutations carry the acting identity; only the identity that created a
/// record may update or delete it. Reads are open to any authenticated
/// caller.
#[derive(Clone)]
pub struct DeveloperService<R: DeveloperRepository> {
    repository: Arc<R>,
    photos: Arc<dyn PhotoStore>,
}

impl<R: DeveloperRepository> DeveloperService<R> {
    pub fn new(repository: Arc<R>, photos: Arc<dyn PhotoStore>) -> Self {
        Self { repository, photos }
    }

    pub async fn create_developer(
        &self,
        input: CreateDeveloper,
        owner: Uuid,
    ) -> DeveloperResult<Developer> {
        self.repository.create(Developer::new(input, owner)).await
    }

    pub async fn get_developer(&self, id: Uuid) -> DeveloperResult<Developer> {
        self.repository.get_by_id(id).await
    }

    /// Filter, sort and paginate the directory over a point-in-time snapshot.
    pub async fn query_directory(
        &self,
        query: &DirectoryQuery,
    ) -> DeveloperResult<QueryPage<Developer>> {
        let records = self.repository.list_all().await?;
        Ok(run_query(&records, query))
    }

    pub async fn update_developer(
        &self,
        id: Uuid,
        input: UpdateDeveloper,
        actor: Uuid,
    ) -> DeveloperResult<Developer> {
        let mut developer = self.repository.get_by_id(id).await?;
        if developer.created_by != actor {
            return Err(DeveloperError::Forbidden(
                "You do not have permission to update this developer".to_string(),
            ));
        }
        developer.apply_update(input);
        self.repository.update(developer).await
    }

    pub async fn delete_developer(&self, id: Uuid, actor: Uuid) -> DeveloperResult<()> {
        let developer = self.repository.get_by_id(id).await?;
        if developer.created_by != actor {
            return Err(DeveloperError::Forbidden(
                "You do not have permission to delete this developer".to_string(),
            ));
        }
        self.repository.delete(id).await
    }

    /// Store uploaded photo bytes and point the record's photo field at the
    /// resulting reference. Requires the same ownership as any other update.
    pub async fn attach_photo(
        &self,
        id: Uuid,
        actor: Uuid,
        filename: &str,
        bytes: Vec<u8>,
    ) -> DeveloperResult<Developer> {
        let mut developer = self.repository.get_by_id(id).await?;
        if developer.created_by != actor {
            return Err(DeveloperError::Forbidden(
                "You do not have permission to update this developer".to_string(),
            ));
        }
        let reference = self.photos.store(filename, bytes).await?;
        developer.photo = Some(reference);
        developer.updated_at = chrono::Utc::now();
        self.repository.update(developer).await
    }

    /// Aggregate counts over the whole directory: headcount, per-role
    /// breakdown, and the most common tech-stack entries.
    pub async fn analytics(&self) -> DeveloperResult<DirectoryAnalytics> {
        let records = self.repository.list_all().await?;

        let mut role_counts: HashMap<String, usize> = HashMap::new();
        let mut tech_counts: HashMap<String, usize> = HashMap::new();
        for dev in &records {
            *role_counts.entry(dev.role.to_string()).or_default() += 1;
            for tech in &dev.tech_stack {
                *tech_counts.entry(tech.clone()).or_default() += 1;
            }
        }

        let mut by_role: Vec<RoleCount> = role_counts
            .into_iter()
            .map(|(role, count)| RoleCount { role, count })
            .collect();
        by_role.sort_by(|a, b| b.count.cmp(&a.count).then(a.role.cmp(&b.role)));

        let mut popular: Vec<TechCount> = tech_counts
            .into_iter()
            .map(|(tech, count)| TechCount { tech, count })
            .collect();
        popular.sort_by(|a, b| b.count.cmp(&a.count).then(a.tech.cmp(&b.tech)));
        popular.truncate(POPULAR_TECH_LIMIT);

        Ok(DirectoryAnalytics {
            total_developers: records.len(),
            by_role,
            popular_tech_stacks: popular,
        })
    }
}
