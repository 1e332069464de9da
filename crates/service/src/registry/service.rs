use std::sync::Arc;

use models::service::{validate_name, NewRow};
use tracing::{debug, info, instrument};

use super::domain::{SearchQuery, Service, ServiceChanges, ServiceInput};
use super::repository::ServiceRepository;
use super::response::{ServiceEnvelope, ServicePagination};
use super::search::SearchEngine;
use crate::errors::ServiceError;

/// Versioning rules over the record store, independent of web framework.
pub struct RegistryService<R: ServiceRepository> {
    repo: Arc<R>,
    search: SearchEngine<R>,
}

impl<R: ServiceRepository> RegistryService<R> {
    pub fn new(repo: Arc<R>) -> Self {
        let search = SearchEngine::new(repo.clone());
        Self { repo, search }
    }

    /// Register a new name at version 1.
    ///
    /// # Examples
    /// ```
    /// use service::registry::{RegistryService, domain::ServiceInput, repository::mock::MockServiceRepository};
    /// use std::sync::Arc;
    /// let svc = RegistryService::new(Arc::new(MockServiceRepository::default()));
    /// let created = tokio_test::block_on(svc.create(ServiceInput::new("svc-a"))).unwrap();
    /// assert_eq!((created.current_version, created.total_versions), (1, 1));
    /// assert!(tokio_test::block_on(svc.create(ServiceInput::new("svc-a"))).is_err());
    /// ```
    #[instrument(skip(self, input), fields(name = %input.name))]
    pub async fn create(&self, input: ServiceInput) -> Result<ServiceEnvelope, ServiceError> {
        validate_name(&input.name)?;
        let existing = self.repo.find_by_name(&input.name).await?;
        if !existing.is_empty() {
            debug!(versions = existing.len(), "name already registered");
            return Err(ServiceError::duplicate_name(&input.name));
        }
        let created = self.repo.insert(new_row(input, 1)).await?;
        info!(name = %created.name, version = created.version, "service_created");
        Ok(ServiceEnvelope::new(created, 1, 1))
    }

    /// Append version `max + 1` for a name with at least one live row.
    /// A name whose rows are all soft-deleted is `NotFound`.
    ///
    /// # Examples
    /// ```
    /// use service::registry::{RegistryService, domain::ServiceInput, repository::mock::MockServiceRepository};
    /// use std::sync::Arc;
    /// let svc = RegistryService::new(Arc::new(MockServiceRepository::default()));
    /// tokio_test::block_on(svc.create(ServiceInput::new("svc-a"))).unwrap();
    /// let v2 = tokio_test::block_on(svc.create_version("svc-a", ServiceInput::new("svc-a"))).unwrap();
    /// assert_eq!(v2.service.version, 2);
    /// assert_eq!(v2.total_versions, 2);
    /// ```
    #[instrument(skip(self, input))]
    pub async fn create_version(&self, name: &str, input: ServiceInput) -> Result<ServiceEnvelope, ServiceError> {
        validate_name(name)?;
        let existing = self.repo.find_by_name(name).await?;
        if !has_live_rows(&existing) {
            return Err(ServiceError::not_found(name));
        }
        let Some(latest) = existing.iter().map(|s| s.version).max() else {
            return Err(ServiceError::not_found(name));
        };
        let version = latest + 1;
        let input = ServiceInput { name: name.to_string(), ..input };
        let created = self.repo.insert(new_row(input, version)).await?;
        let total = existing.len() as i32 + 1;
        info!(name = %created.name, version, "service_version_created");
        Ok(ServiceEnvelope::new(created, version, total))
    }

    /// Overwrite the mutable fields of one existing version in place.
    #[instrument(skip(self, changes))]
    pub async fn update_version(&self, name: &str, version: i32, changes: ServiceChanges) -> Result<Service, ServiceError> {
        let updated = self
            .repo
            .update_by_name_and_version(name, version, &changes)
            .await?
            .ok_or_else(|| ServiceError::version_not_found(name, version))?;
        info!(%name, version, "service_version_updated");
        Ok(updated)
    }

    /// Soft-delete every version of `name`. Deleting an already deleted name is `NotFound`.
    #[instrument(skip(self))]
    pub async fn delete(&self, name: &str) -> Result<(), ServiceError> {
        let existing = self.repo.find_by_name(name).await?;
        if !has_live_rows(&existing) {
            return Err(ServiceError::not_found(name));
        }
        let affected = self.repo.soft_delete_by_name(name).await?;
        info!(%name, affected, "service_deleted");
        Ok(())
    }

    /// Every stored version of `name`, ascending. Soft-deleted rows are included.
    #[instrument(skip(self))]
    pub async fn fetch_by_name(&self, name: &str) -> Result<Vec<Service>, ServiceError> {
        let rows = self.repo.find_by_name(name).await?;
        if rows.is_empty() {
            return Err(ServiceError::not_found(name));
        }
        Ok(rows)
    }

    #[instrument(skip(self))]
    pub async fn fetch_by_version_and_name(&self, name: &str, version: i32) -> Result<Service, ServiceError> {
        self.repo
            .find_by_name_and_version(name, version)
            .await?
            .ok_or_else(|| ServiceError::version_not_found(name, version))
    }

    #[instrument(skip(self))]
    pub async fn fetch_all(&self) -> Result<Vec<Service>, ServiceError> {
        self.repo.list_active().await
    }

    pub async fn search_and_sort(&self, query: &SearchQuery) -> Result<ServicePagination, ServiceError> {
        self.search.search_and_sort(query).await
    }

    pub fn search(&self) -> &SearchEngine<R> { &self.search }

    pub fn repository(&self) -> &Arc<R> { &self.repo }
}

fn has_live_rows(rows: &[Service]) -> bool {
    rows.iter().any(|r| r.deleted_at.is_none())
}

fn new_row(input: ServiceInput, version: i32) -> NewRow {
    NewRow { name: input.name, description: input.description, tags: input.tags, is_active: input.is_active, version }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::repository::mock::MockServiceRepository;

    fn registry() -> (Arc<MockServiceRepository>, RegistryService<MockServiceRepository>) {
        let repo = Arc::new(MockServiceRepository::default());
        (repo.clone(), RegistryService::new(repo))
    }

    #[tokio::test]
    async fn create_starts_at_version_one() {
        let (_, svc) = registry();
        let env = svc.create(ServiceInput::new("svc-a").with_description("first")).await.unwrap();
        assert_eq!(env.service.version, 1);
        assert_eq!((env.current_version, env.total_versions), (1, 1));
        assert_eq!(env.service.description, "first");
        assert!(env.service.is_active);
    }

    #[tokio::test]
    async fn duplicate_create_does_not_write() {
        let (repo, svc) = registry();
        svc.create(ServiceInput::new("svc-a")).await.unwrap();
        let err = svc.create(ServiceInput::new("svc-a")).await.unwrap_err();
        assert!(matches!(err, ServiceError::DuplicateName { ref name } if name == "svc-a"));
        assert_eq!(repo.rows().len(), 1);
    }

    #[tokio::test]
    async fn invalid_names_are_rejected() {
        let (repo, svc) = registry();
        assert!(matches!(svc.create(ServiceInput::new("  ")).await, Err(ServiceError::Validation(_))));
        assert!(matches!(svc.create(ServiceInput::new("x".repeat(256))).await, Err(ServiceError::Validation(_))));
        assert!(repo.rows().is_empty());
    }

    #[tokio::test]
    async fn versions_increase_by_one() {
        let (_, svc) = registry();
        svc.create(ServiceInput::new("svc-a")).await.unwrap();
        for n in 1..=4 {
            let env = svc.create_version("svc-a", ServiceInput::new("svc-a").with_tags(format!("rev{n}"))).await.unwrap();
            assert_eq!(env.service.version, n + 1);
            assert_eq!((env.current_version, env.total_versions), (n + 1, n + 1));
        }
        let rows = svc.fetch_by_name("svc-a").await.unwrap();
        assert_eq!(rows.iter().map(|r| r.version).collect::<Vec<_>>(), vec![1, 2, 3, 4, 5]);
        assert_eq!(rows[4].tags, "rev4");
    }

    #[tokio::test]
    async fn create_version_uses_path_name() {
        let (_, svc) = registry();
        svc.create(ServiceInput::new("svc-a")).await.unwrap();
        let env = svc.create_version("svc-a", ServiceInput::new("ignored")).await.unwrap();
        assert_eq!(env.service.name, "svc-a");
    }

    #[tokio::test]
    async fn create_version_needs_an_existing_name() {
        let (repo, svc) = registry();
        let err = svc.create_version("ghost", ServiceInput::new("ghost")).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound { .. }));
        assert!(repo.rows().is_empty());
    }

    #[tokio::test]
    async fn update_version_is_in_place() {
        let (repo, svc) = registry();
        svc.create(ServiceInput::new("svc-a").with_tags("old")).await.unwrap();
        let changes = ServiceChanges { tags: Some("new".into()), ..Default::default() };
        let updated = svc.update_version("svc-a", 1, changes).await.unwrap();
        assert_eq!((updated.version, updated.tags.as_str()), (1, "new"));
        assert_eq!(repo.rows().len(), 1);
    }

    #[tokio::test]
    async fn update_missing_version_leaves_storage_unchanged() {
        let (repo, svc) = registry();
        svc.create(ServiceInput::new("svc-a").with_tags("old")).await.unwrap();
        let before = repo.rows();
        let changes = ServiceChanges { tags: Some("new".into()), ..Default::default() };
        let err = svc.update_version("svc-a", 7, changes).await.unwrap_err();
        assert!(matches!(err, ServiceError::VersionNotFound { version: 7, .. }));
        assert_eq!(repo.rows(), before);
    }

    #[tokio::test]
    async fn delete_hides_name_from_active_listing() {
        let (_, svc) = registry();
        svc.create(ServiceInput::new("svc-a")).await.unwrap();
        svc.create_version("svc-a", ServiceInput::new("svc-a")).await.unwrap();
        svc.create(ServiceInput::new("svc-b")).await.unwrap();

        svc.delete("svc-a").await.unwrap();

        let active = svc.fetch_all().await.unwrap();
        assert_eq!(active.iter().map(|s| s.name.as_str()).collect::<Vec<_>>(), vec!["svc-b"]);
        let rows = svc.fetch_by_name("svc-a").await.unwrap();
        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|r| !r.is_active && r.deleted_at.is_some()));

        let page = svc.search_and_sort(&SearchQuery::default()).await.unwrap();
        assert_eq!(page.meta.total_results, 1);
        assert_eq!(page.data[0].service.name, "svc-b");
    }

    #[tokio::test]
    async fn deleted_name_stays_deleted() {
        let (repo, svc) = registry();
        svc.create(ServiceInput::new("svc-a")).await.unwrap();
        svc.create_version("svc-a", ServiceInput::new("svc-a")).await.unwrap();
        svc.create_version("svc-a", ServiceInput::new("svc-a")).await.unwrap();
        svc.delete("svc-a").await.unwrap();

        assert!(matches!(svc.delete("svc-a").await, Err(ServiceError::NotFound { .. })));
        assert!(matches!(
            svc.create_version("svc-a", ServiceInput::new("svc-a")).await,
            Err(ServiceError::NotFound { .. })
        ));
        assert!(matches!(svc.create(ServiceInput::new("svc-a")).await, Err(ServiceError::DuplicateName { .. })));
        assert_eq!(repo.rows().len(), 3);

        assert!(svc.fetch_all().await.unwrap().is_empty());
        let page = svc.search_and_sort(&SearchQuery::default()).await.unwrap();
        assert_eq!(page.meta.total_results, 0);
        assert!(page.data.is_empty());
        assert_eq!(svc.fetch_by_name("svc-a").await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn delete_unknown_name_is_not_found() {
        let (_, svc) = registry();
        assert!(matches!(svc.delete("ghost").await, Err(ServiceError::NotFound { .. })));
    }

    #[tokio::test]
    async fn fetches_report_the_right_miss() {
        let (_, svc) = registry();
        assert!(matches!(svc.fetch_by_name("ghost").await, Err(ServiceError::NotFound { .. })));
        svc.create(ServiceInput::new("svc-a")).await.unwrap();
        assert_eq!(svc.fetch_by_version_and_name("svc-a", 1).await.unwrap().version, 1);
        assert!(matches!(
            svc.fetch_by_version_and_name("svc-a", 2).await,
            Err(ServiceError::VersionNotFound { version: 2, .. })
        ));
    }

    #[tokio::test]
    async fn fetch_all_on_empty_store_is_empty() {
        let (_, svc) = registry();
        assert!(svc.fetch_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn storage_errors_propagate_unchanged() {
        let (repo, svc) = registry();
        svc.create(ServiceInput::new("svc-a")).await.unwrap();
        repo.fail_with("pool timed out");

        let is_db = |e: ServiceError| matches!(e, ServiceError::Db(ref m) if m == "pool timed out");
        assert!(is_db(svc.create(ServiceInput::new("svc-b")).await.unwrap_err()));
        assert!(is_db(svc.create_version("svc-a", ServiceInput::new("svc-a")).await.unwrap_err()));
        assert!(is_db(svc.update_version("svc-a", 1, ServiceChanges::default()).await.unwrap_err()));
        assert!(is_db(svc.delete("svc-a").await.unwrap_err()));
        assert!(is_db(svc.fetch_by_name("svc-a").await.unwrap_err()));
        assert!(is_db(svc.fetch_by_version_and_name("svc-a", 1).await.unwrap_err()));
        assert!(is_db(svc.fetch_all().await.unwrap_err()));

        repo.recover();
        assert_eq!(svc.fetch_by_name("svc-a").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn scenario_three_versions_agree_across_views() {
        let (_, svc) = registry();
        svc.create(ServiceInput::new("svc-a")).await.unwrap();
        svc.create_version("svc-a", ServiceInput::new("svc-a")).await.unwrap();
        svc.create_version("svc-a", ServiceInput::new("svc-a")).await.unwrap();

        let rows = svc.fetch_by_name("svc-a").await.unwrap();
        assert_eq!(rows.iter().map(|r| r.version).collect::<Vec<_>>(), vec![1, 2, 3]);
        let detail = svc.search().service_details("svc-a").await.unwrap();
        assert_eq!((detail.current_version, detail.total_versions), (3, 3));
    }
}
