use models::service::{self as rows, NameVersionCount, NewRow, RowChanges, SortColumn, SortDirection};
use sea_orm::DatabaseConnection;

use crate::errors::ServiceError;
use crate::registry::domain::{Service, ServiceChanges};
use crate::registry::repository::ServiceRepository;

pub struct SeaOrmServiceRepository {
    pub db: DatabaseConnection,
}

impl SeaOrmServiceRepository {
    pub fn new(db: DatabaseConnection) -> Self { Self { db } }
}

#[async_trait::async_trait]
impl ServiceRepository for SeaOrmServiceRepository {
    async fn insert(&self, row: NewRow) -> Result<Service, ServiceError> {
        Ok(rows::insert(&self.db, row).await?)
    }

    async fn find_by_name(&self, name: &str) -> Result<Vec<Service>, ServiceError> {
        Ok(rows::find_by_name(&self.db, name).await?)
    }

    async fn find_by_name_and_version(&self, name: &str, version: i32) -> Result<Option<Service>, ServiceError> {
        Ok(rows::find_by_name_and_version(&self.db, name, version).await?)
    }

    async fn update_by_name_and_version(&self, name: &str, version: i32, changes: &ServiceChanges) -> Result<Option<Service>, ServiceError> {
        let changes: RowChanges = changes.into();
        Ok(rows::update_by_name_and_version(&self.db, name, version, &changes).await?)
    }

    async fn soft_delete_by_name(&self, name: &str) -> Result<u64, ServiceError> {
        Ok(rows::soft_delete_by_name(&self.db, name).await?)
    }

    async fn list_active(&self) -> Result<Vec<Service>, ServiceError> {
        Ok(rows::list_active(&self.db).await?)
    }

    async fn count_distinct_names(&self, filter: &str) -> Result<u64, ServiceError> {
        Ok(rows::count_distinct_names(&self.db, filter).await?)
    }

    async fn paged_grouped_by_name(
        &self,
        filter: &str,
        sort: SortColumn,
        dir: SortDirection,
        limit: u64,
        offset: u64,
    ) -> Result<Vec<NameVersionCount>, ServiceError> {
        Ok(rows::paged_grouped_by_name(&self.db, filter, sort, dir, limit, offset).await?)
    }

    async fn ping(&self) -> Result<(), ServiceError> {
        Ok(rows::ping(&self.db).await?)
    }
}
