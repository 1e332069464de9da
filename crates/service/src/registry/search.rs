use std::sync::Arc;

use tracing::{debug, instrument};

use super::domain::SearchQuery;
use super::repository::ServiceRepository;
use super::response::{Meta, ServiceEnvelope, ServicePagination};
use crate::errors::ServiceError;

/// Distinct-name listing with filter, sort and paging.
pub struct SearchEngine<R: ServiceRepository> {
    repo: Arc<R>,
}

impl<R: ServiceRepository> Clone for SearchEngine<R> {
    fn clone(&self) -> Self { Self { repo: self.repo.clone() } }
}

impl<R: ServiceRepository> SearchEngine<R> {
    pub fn new(repo: Arc<R>) -> Self { Self { repo } }

    /// One page of distinct names, each with its current version row.
    ///
    /// `query.pagination` is normalized here as well, so out-of-range paging
    /// never reaches the store.
    ///
    /// # Examples
    /// ```
    /// use service::registry::{SearchEngine, domain::SearchQuery, repository::mock::MockServiceRepository};
    /// use std::sync::Arc;
    /// let engine = SearchEngine::new(Arc::new(MockServiceRepository::default()));
    /// let page = tokio_test::block_on(engine.search_and_sort(&SearchQuery::default())).unwrap();
    /// assert_eq!(page.meta.total_results, 0);
    /// assert!(page.data.is_empty());
    /// ```
    #[instrument(skip(self), fields(query = %query.query, sort = %query.sort, dir = %query.dir))]
    pub async fn search_and_sort(&self, query: &SearchQuery) -> Result<ServicePagination, ServiceError> {
        let pagination = query.pagination.normalize();
        let total = self.repo.count_distinct_names(&query.query).await?;
        let groups = self
            .repo
            .paged_grouped_by_name(&query.query, query.sort, query.dir, pagination.limit(), pagination.offset())
            .await?;
        debug!(total, page_len = groups.len(), "grouped names fetched");

        let mut data = Vec::with_capacity(groups.len());
        for group in &groups {
            data.push(self.service_details(&group.name).await?);
        }
        Ok(ServicePagination { meta: Meta::new(pagination, total), data })
    }

    /// Current row of `name`, taken as the row whose version equals the number
    /// of rows stored for the name. Diverges from the max version when a
    /// version is missing; that case reports `VersionNotFound`.
    pub async fn service_details(&self, name: &str) -> Result<ServiceEnvelope, ServiceError> {
        let versions = self.repo.find_by_name(name).await?;
        if versions.is_empty() {
            return Err(ServiceError::not_found(name));
        }
        let total = versions.len() as i32;
        let current = self
            .repo
            .find_by_name_and_version(name, total)
            .await?
            .ok_or_else(|| ServiceError::version_not_found(name, total))?;
        Ok(ServiceEnvelope::new(current, total, total))
    }
}
