use models::service::{RowChanges, SortColumn, SortDirection};
use serde::{Deserialize, Serialize};

use crate::pagination::Pagination;

/// A stored service version (business view equals the row).
pub type Service = models::service::Model;

fn default_active() -> bool { true }

/// Body of a create or new-version request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceInput {
    #[serde(rename = "serviceName", default)]
    pub name: String,
    #[serde(rename = "describe", default)]
    pub description: String,
    #[serde(default)]
    pub tags: String,
    #[serde(rename = "isActive", default = "default_active")]
    pub is_active: bool,
}

impl ServiceInput {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), description: String::new(), tags: String::new(), is_active: true }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_tags(mut self, tags: impl Into<String>) -> Self {
        self.tags = tags.into();
        self
    }
}

/// Body of an in-place version update. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceChanges {
    #[serde(rename = "describe", default)]
    pub description: Option<String>,
    #[serde(default)]
    pub tags: Option<String>,
    #[serde(rename = "isActive", default)]
    pub is_active: Option<bool>,
}

impl From<&ServiceChanges> for RowChanges {
    fn from(c: &ServiceChanges) -> Self {
        RowChanges { description: c.description.clone(), tags: c.tags.clone(), is_active: c.is_active }
    }
}

/// Search/sort/page request; `pagination` is expected to be normalized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    /// SQL `LIKE` pattern on the name; `%` matches everything
    pub query: String,
    pub sort: SortColumn,
    pub dir: SortDirection,
    pub pagination: Pagination,
}

impl Default for SearchQuery {
    fn default() -> Self {
        Self { query: "%".into(), sort: SortColumn::default(), dir: SortDirection::default(), pagination: Pagination::default() }
    }
}
