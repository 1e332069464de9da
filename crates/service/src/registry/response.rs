//! Response envelopes returned to callers. Pure data shaping.

use serde::{Deserialize, Serialize};

use super::domain::Service;
use crate::pagination::Pagination;

/// A service row plus its version bookkeeping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceEnvelope {
    #[serde(flatten)]
    pub service: Service,
    #[serde(rename = "currentVersion")]
    pub current_version: i32,
    #[serde(rename = "totalVersion")]
    pub total_versions: i32,
}

impl ServiceEnvelope {
    pub fn new(service: Service, current_version: i32, total_versions: i32) -> Self {
        Self { service, current_version, total_versions }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Meta {
    pub page: u64,
    pub page_size: u64,
    pub total_results: u64,
    pub total_pages: u64,
}

impl Meta {
    pub fn new(pagination: Pagination, total_results: u64) -> Self {
        Self {
            page: pagination.page.max(1) as u64,
            page_size: pagination.limit(),
            total_results,
            total_pages: pagination.total_pages(total_results),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServicePagination {
    pub meta: Meta,
    pub data: Vec<ServiceEnvelope>,
}
