use std::fmt;
use std::str::FromStr;

use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    entity::prelude::*, ActiveModelTrait, DatabaseConnection, EntityTrait, FromQueryResult, NotSet, Order,
    PaginatorTrait, QueryOrder, QuerySelect, Select, Set,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::errors;

/// Max length of a service name, matching the `services.name` column.
pub const NAME_MAX_LEN: usize = 255;

/// One version of a named service. `(name, version)` is unique.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "services")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[serde(rename = "serviceName")]
    pub name: String,
    #[serde(rename = "describe")]
    #[sea_orm(column_type = "Text")]
    pub description: String,
    pub version: i32,
    pub is_active: bool,
    #[sea_orm(column_type = "Text")]
    pub tags: String,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
    pub deleted_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Fields of a row about to be inserted; `version` is decided by the caller.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewRow {
    pub name: String,
    pub description: String,
    pub tags: String,
    pub is_active: bool,
    pub version: i32,
}

/// Mutable fields of an existing row. `None` leaves the column untouched.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowChanges {
    pub description: Option<String>,
    pub tags: Option<String>,
    pub is_active: Option<bool>,
}

/// One grouped row of the listing query: a distinct name and its version count.
#[derive(Clone, Debug, PartialEq, Eq, FromQueryResult)]
pub struct NameVersionCount {
    pub name: String,
    pub count: i64,
}

/// Columns a listing may be ordered by. Each group is ranked by `MAX(column)`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortColumn {
    #[default]
    CreatedAt,
    UpdatedAt,
    Version,
    Name,
}

impl SortColumn {
    pub fn column(self) -> Column {
        match self {
            SortColumn::CreatedAt => Column::CreatedAt,
            SortColumn::UpdatedAt => Column::UpdatedAt,
            SortColumn::Version => Column::Version,
            SortColumn::Name => Column::Name,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SortColumn::CreatedAt => "created_at",
            SortColumn::UpdatedAt => "updated_at",
            SortColumn::Version => "version",
            SortColumn::Name => "name",
        }
    }
}

impl fmt::Display for SortColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortColumn {
    type Err = errors::ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "created_at" => Ok(SortColumn::CreatedAt),
            "updated_at" => Ok(SortColumn::UpdatedAt),
            "version" => Ok(SortColumn::Version),
            "name" => Ok(SortColumn::Name),
            other => Err(errors::ModelError::Validation(format!("unsupported sort column '{other}'"))),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl SortDirection {
    pub fn order(self) -> Order {
        match self {
            SortDirection::Asc => Order::Asc,
            SortDirection::Desc => Order::Desc,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortDirection {
    type Err = errors::ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" => Ok(SortDirection::Asc),
            "desc" => Ok(SortDirection::Desc),
            other => Err(errors::ModelError::Validation(format!("unsupported sort direction '{other}'"))),
        }
    }
}

pub fn validate_name(name: &str) -> Result<(), errors::ModelError> {
    if name.trim().is_empty() {
        return Err(errors::ModelError::Validation("serviceName required".into()));
    }
    if name.chars().count() > NAME_MAX_LEN {
        return Err(errors::ModelError::Validation(format!("serviceName longer than {NAME_MAX_LEN} characters")));
    }
    Ok(())
}

fn db_err(op: &'static str) -> impl Fn(DbErr) -> errors::ModelError {
    move |e| {
        error!(op, error = %e, "services query failed");
        errors::ModelError::Db(e.to_string())
    }
}

pub async fn insert(db: &DatabaseConnection, row: NewRow) -> Result<Model, errors::ModelError> {
    debug!(name = %row.name, version = row.version, "adding service");
    let now = Utc::now().into();
    let am = ActiveModel {
        id: NotSet,
        name: Set(row.name),
        description: Set(row.description),
        version: Set(row.version),
        is_active: Set(row.is_active),
        tags: Set(row.tags),
        created_at: Set(now),
        updated_at: Set(now),
        deleted_at: Set(None),
    };
    am.insert(db).await.map_err(db_err("insert"))
}

/// Every row of `name`, soft-deleted ones included, by ascending version.
pub async fn find_by_name(db: &DatabaseConnection, name: &str) -> Result<Vec<Model>, errors::ModelError> {
    debug!(%name, "fetching service by name");
    Entity::find()
        .filter(Column::Name.eq(name))
        .order_by_asc(Column::Version)
        .all(db)
        .await
        .map_err(db_err("find_by_name"))
}

pub async fn find_by_name_and_version(
    db: &DatabaseConnection,
    name: &str,
    version: i32,
) -> Result<Option<Model>, errors::ModelError> {
    debug!(%name, version, "fetching service with name and version");
    Entity::find()
        .filter(Column::Name.eq(name))
        .filter(Column::Version.eq(version))
        .one(db)
        .await
        .map_err(db_err("find_by_name_and_version"))
}

/// Overwrite the given fields of `(name, version)` in place. `Ok(None)` if no such row.
pub async fn update_by_name_and_version(
    db: &DatabaseConnection,
    name: &str,
    version: i32,
    changes: &RowChanges,
) -> Result<Option<Model>, errors::ModelError> {
    debug!(%name, version, "updating service with name and version");
    let Some(found) = find_by_name_and_version(db, name, version).await? else {
        return Ok(None);
    };
    let mut am: ActiveModel = found.into();
    if let Some(d) = &changes.description {
        am.description = Set(d.clone());
    }
    if let Some(t) = &changes.tags {
        am.tags = Set(t.clone());
    }
    if let Some(a) = changes.is_active {
        am.is_active = Set(a);
    }
    am.updated_at = Set(Utc::now().into());
    let updated = am.update(db).await.map_err(db_err("update_by_name_and_version"))?;
    Ok(Some(updated))
}

/// Mark every live row of `name` deleted and inactive. Returns rows affected.
pub async fn soft_delete_by_name(db: &DatabaseConnection, name: &str) -> Result<u64, errors::ModelError> {
    debug!(%name, "deleting service");
    let now: DateTimeWithTimeZone = Utc::now().into();
    let res = Entity::update_many()
        .col_expr(Column::DeletedAt, Expr::value(Some(now)))
        .col_expr(Column::IsActive, Expr::value(false))
        .col_expr(Column::UpdatedAt, Expr::value(now))
        .filter(Column::Name.eq(name))
        .filter(Column::DeletedAt.is_null())
        .exec(db)
        .await
        .map_err(db_err("soft_delete_by_name"))?;
    Ok(res.rows_affected)
}

/// Active, non-deleted rows ordered by name then version.
pub async fn list_active(db: &DatabaseConnection) -> Result<Vec<Model>, errors::ModelError> {
    debug!("fetching all services");
    Entity::find()
        .filter(Column::IsActive.eq(true))
        .filter(Column::DeletedAt.is_null())
        .order_by_asc(Column::Name)
        .order_by_asc(Column::Version)
        .all(db)
        .await
        .map_err(db_err("list_active"))
}

fn grouped_by_name(filter: &str) -> Select<Entity> {
    Entity::find()
        .select_only()
        .column(Column::Name)
        .column_as(Expr::col(Column::Id).count(), "count")
        .filter(Column::Name.like(filter))
        .filter(Column::DeletedAt.is_null())
        .group_by(Column::Name)
}

/// Number of distinct live names matching the `LIKE` pattern `filter`.
/// Case-sensitive on Postgres; SQLite's `LIKE` ignores ASCII case.
pub async fn count_distinct_names(db: &DatabaseConnection, filter: &str) -> Result<u64, errors::ModelError> {
    debug!(%filter, "counting distinct service names");
    // COUNT(*) over the grouped subquery
    grouped_by_name(filter).count(db).await.map_err(db_err("count_distinct_names"))
}

/// One page of distinct live names with their version counts, ranked by
/// `MAX(sort)` in `dir`, ties broken by name.
pub async fn paged_grouped_by_name(
    db: &DatabaseConnection,
    filter: &str,
    sort: SortColumn,
    dir: SortDirection,
    limit: u64,
    offset: u64,
) -> Result<Vec<NameVersionCount>, errors::ModelError> {
    debug!(%filter, %sort, %dir, limit, offset, "fetching service and version counts");
    grouped_by_name(filter)
        .order_by(Expr::col(sort.column()).max(), dir.order())
        .order_by_asc(Column::Name)
        .limit(limit)
        .offset(offset)
        .into_model::<NameVersionCount>()
        .all(db)
        .await
        .map_err(db_err("paged_grouped_by_name"))
}

pub async fn ping(db: &DatabaseConnection) -> Result<(), errors::ModelError> {
    db.ping().await.map_err(db_err("ping"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sort_column_parses_known_names() {
        assert_eq!("created_at".parse::<SortColumn>().unwrap(), SortColumn::CreatedAt);
        assert_eq!("UPDATED_AT".parse::<SortColumn>().unwrap(), SortColumn::UpdatedAt);
        assert_eq!(" version ".parse::<SortColumn>().unwrap(), SortColumn::Version);
        assert_eq!("name".parse::<SortColumn>().unwrap(), SortColumn::Name);
        assert!("id; drop table services".parse::<SortColumn>().is_err());
    }

    #[test]
    fn sort_direction_round_trips_through_display() {
        for d in [SortDirection::Asc, SortDirection::Desc] {
            assert_eq!(d.to_string().parse::<SortDirection>().unwrap(), d);
        }
        assert!("sideways".parse::<SortDirection>().is_err());
        assert_eq!(SortDirection::default(), SortDirection::Desc);
    }

    #[test]
    fn name_validation() {
        assert!(validate_name("svc-a").is_ok());
        assert!(validate_name("   ").is_err());
        assert!(validate_name(&"x".repeat(NAME_MAX_LEN)).is_ok());
        assert!(validate_name(&"x".repeat(NAME_MAX_LEN + 1)).is_err());
    }

    #[test]
    fn model_uses_wire_field_names() {
        let now: DateTimeWithTimeZone = Utc::now().into();
        let m = Model {
            id: 7,
            name: "svc-a".into(),
            description: "first".into(),
            version: 2,
            is_active: true,
            tags: "core".into(),
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        let v = serde_json::to_value(&m).unwrap();
        assert_eq!(v["serviceName"], "svc-a");
        assert_eq!(v["describe"], "first");
        assert_eq!(v["isActive"], true);
        assert_eq!(v["version"], 2);
        assert!(v.get("createdAt").is_some());
        assert!(v["deletedAt"].is_null());
    }
}
