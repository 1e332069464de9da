use async_trait::async_trait;
use models::service::{NameVersionCount, NewRow, SortColumn, SortDirection};

use super::domain::{Service, ServiceChanges};
use crate::errors::ServiceError;

/// Record store for service rows. No business rules live here: empty results
/// are returned as such and the caller decides what they mean.
#[async_trait]
pub trait ServiceRepository: Send + Sync {
    async fn insert(&self, row: NewRow) -> Result<Service, ServiceError>;
    /// All rows of `name` (soft-deleted included), ascending by version.
    async fn find_by_name(&self, name: &str) -> Result<Vec<Service>, ServiceError>;
    async fn find_by_name_and_version(&self, name: &str, version: i32) -> Result<Option<Service>, ServiceError>;
    async fn update_by_name_and_version(&self, name: &str, version: i32, changes: &ServiceChanges) -> Result<Option<Service>, ServiceError>;
    async fn soft_delete_by_name(&self, name: &str) -> Result<u64, ServiceError>;
    /// Rows that are active and not soft-deleted.
    async fn list_active(&self) -> Result<Vec<Service>, ServiceError>;
    /// Distinct live names matching the `LIKE` pattern `filter`. Case sensitivity
    /// follows the engine: Postgres compares exactly, SQLite ignores ASCII case.
    /// The mock compares exactly.
    async fn count_distinct_names(&self, filter: &str) -> Result<u64, ServiceError>;
    async fn paged_grouped_by_name(
        &self,
        filter: &str,
        sort: SortColumn,
        dir: SortDirection,
        limit: u64,
        offset: u64,
    ) -> Result<Vec<NameVersionCount>, ServiceError>;
    async fn ping(&self) -> Result<(), ServiceError>;
}

/// Simple in-memory mock repository for tests and doc examples
pub mod mock {
    use super::*;
    use chrono::Utc;
    use std::cmp::Ordering;
    use std::collections::BTreeMap;
    use std::sync::Mutex;

    #[derive(Default)]
    struct State {
        rows: Vec<Service>,
        next_id: i32,
    }

    #[derive(Default)]
    pub struct MockServiceRepository {
        state: Mutex<State>,
        failure: Mutex<Option<String>>,
    }

    impl MockServiceRepository {
        /// Make every subsequent call fail with `ServiceError::Db(message)`.
        pub fn fail_with(&self, message: &str) {
            *self.failure.lock().unwrap() = Some(message.to_string());
        }

        pub fn recover(&self) {
            *self.failure.lock().unwrap() = None;
        }

        /// Snapshot of every stored row, deleted ones included.
        pub fn rows(&self) -> Vec<Service> {
            self.state.lock().unwrap().rows.clone()
        }

        /// Drop a single row, producing a version gap for `name`.
        pub fn remove_row(&self, name: &str, version: i32) {
            self.state.lock().unwrap().rows.retain(|r| !(r.name == name && r.version == version));
        }

        fn check(&self) -> Result<(), ServiceError> {
            match self.failure.lock().unwrap().as_ref() {
                Some(m) => Err(ServiceError::Db(m.clone())),
                None => Ok(()),
            }
        }
    }

    /// SQL `LIKE` semantics: `%` any run of characters, `_` exactly one.
    /// Case-sensitive, as on Postgres.
    pub fn like(pattern: &str, value: &str) -> bool {
        let p: Vec<char> = pattern.chars().collect();
        let v: Vec<char> = value.chars().collect();
        // dp[j]: pattern prefix p[..i] matches value prefix v[..j]
        let mut dp = vec![false; v.len() + 1];
        dp[0] = true;
        for &pc in &p {
            let mut next = vec![false; v.len() + 1];
            match pc {
                '%' => {
                    let mut seen = false;
                    for j in 0..=v.len() {
                        seen |= dp[j];
                        next[j] = seen;
                    }
                }
                _ => {
                    for j in 1..=v.len() {
                        next[j] = dp[j - 1] && (pc == '_' || pc == v[j - 1]);
                    }
                }
            }
            dp = next;
        }
        dp[v.len()]
    }

    #[derive(PartialEq, Eq, PartialOrd, Ord)]
    enum SortKey {
        Time(sea_orm::prelude::DateTimeWithTimeZone),
        Int(i32),
        Text(String),
    }

    fn sort_key(row: &Service, sort: SortColumn) -> SortKey {
        match sort {
            SortColumn::CreatedAt => SortKey::Time(row.created_at),
            SortColumn::UpdatedAt => SortKey::Time(row.updated_at),
            SortColumn::Version => SortKey::Int(row.version),
            SortColumn::Name => SortKey::Text(row.name.clone()),
        }
    }

    fn live_groups(rows: &[Service], filter: &str) -> BTreeMap<String, Vec<Service>> {
        let mut groups: BTreeMap<String, Vec<Service>> = BTreeMap::new();
        for r in rows.iter().filter(|r| r.deleted_at.is_none() && like(filter, &r.name)) {
            groups.entry(r.name.clone()).or_default().push(r.clone());
        }
        groups
    }

    #[async_trait]
    impl ServiceRepository for MockServiceRepository {
        async fn insert(&self, row: NewRow) -> Result<Service, ServiceError> {
            self.check()?;
            let mut st = self.state.lock().unwrap();
            if st.rows.iter().any(|r| r.name == row.name && r.version == row.version) {
                return Err(ServiceError::Db(format!("unique violation on ({}, {})", row.name, row.version)));
            }
            st.next_id += 1;
            let now = Utc::now().into();
            let created = Service {
                id: st.next_id,
                name: row.name,
                description: row.description,
                version: row.version,
                is_active: row.is_active,
                tags: row.tags,
                created_at: now,
                updated_at: now,
                deleted_at: None,
            };
            st.rows.push(created.clone());
            Ok(created)
        }

        async fn find_by_name(&self, name: &str) -> Result<Vec<Service>, ServiceError> {
            self.check()?;
            let st = self.state.lock().unwrap();
            let mut rows: Vec<Service> = st.rows.iter().filter(|r| r.name == name).cloned().collect();
            rows.sort_by_key(|r| r.version);
            Ok(rows)
        }

        async fn find_by_name_and_version(&self, name: &str, version: i32) -> Result<Option<Service>, ServiceError> {
            self.check()?;
            let st = self.state.lock().unwrap();
            Ok(st.rows.iter().find(|r| r.name == name && r.version == version).cloned())
        }

        async fn update_by_name_and_version(&self, name: &str, version: i32, changes: &ServiceChanges) -> Result<Option<Service>, ServiceError> {
            self.check()?;
            let mut st = self.state.lock().unwrap();
            let Some(row) = st.rows.iter_mut().find(|r| r.name == name && r.version == version) else {
                return Ok(None);
            };
            if let Some(d) = &changes.description {
                row.description = d.clone();
            }
            if let Some(t) = &changes.tags {
                row.tags = t.clone();
            }
            if let Some(a) = changes.is_active {
                row.is_active = a;
            }
            row.updated_at = Utc::now().into();
            Ok(Some(row.clone()))
        }

        async fn soft_delete_by_name(&self, name: &str) -> Result<u64, ServiceError> {
            self.check()?;
            let mut st = self.state.lock().unwrap();
            let now = Utc::now().into();
            let mut affected = 0;
            for r in st.rows.iter_mut().filter(|r| r.name == name && r.deleted_at.is_none()) {
                r.deleted_at = Some(now);
                r.is_active = false;
                r.updated_at = now;
                affected += 1;
            }
            Ok(affected)
        }

        async fn list_active(&self) -> Result<Vec<Service>, ServiceError> {
            self.check()?;
            let st = self.state.lock().unwrap();
            let mut rows: Vec<Service> = st.rows.iter().filter(|r| r.is_active && r.deleted_at.is_none()).cloned().collect();
            rows.sort_by(|a, b| a.name.cmp(&b.name).then(a.version.cmp(&b.version)));
            Ok(rows)
        }

        async fn count_distinct_names(&self, filter: &str) -> Result<u64, ServiceError> {
            self.check()?;
            let st = self.state.lock().unwrap();
            Ok(live_groups(&st.rows, filter).len() as u64)
        }

        async fn paged_grouped_by_name(
            &self,
            filter: &str,
            sort: SortColumn,
            dir: SortDirection,
            limit: u64,
            offset: u64,
        ) -> Result<Vec<NameVersionCount>, ServiceError> {
            self.check()?;
            let st = self.state.lock().unwrap();
            let mut ranked: Vec<(SortKey, NameVersionCount)> = live_groups(&st.rows, filter)
                .into_iter()
                .filter_map(|(name, rows)| {
                    let key = rows.iter().map(|r| sort_key(r, sort)).max()?;
                    Some((key, NameVersionCount { name, count: rows.len() as i64 }))
                })
                .collect();
            ranked.sort_by(|(ka, a), (kb, b)| {
                let primary = match dir {
                    SortDirection::Asc => ka.cmp(kb),
                    SortDirection::Desc => kb.cmp(ka),
                };
                match primary {
                    Ordering::Equal => a.name.cmp(&b.name),
                    other => other,
                }
            });
            Ok(ranked
                .into_iter()
                .skip(offset as usize)
                .take(limit as usize)
                .map(|(_, g)| g)
                .collect())
        }

        async fn ping(&self) -> Result<(), ServiceError> {
            self.check()
        }
    }

}
