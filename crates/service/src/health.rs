//! Datastore probe shared by the health endpoints.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::registry::repository::ServiceRepository;

/// Upper bound on a single datastore ping.
pub const PING_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Components {
    pub datastore: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthReport {
    pub status: String,
    pub status_code: u16,
    pub components: Components,
    pub timestamp: DateTime<Utc>,
}

impl HealthReport {
    pub fn from_components(components: Components) -> Self {
        let healthy = components.datastore;
        Self {
            status: if healthy { "healthy" } else { "unhealthy" }.to_string(),
            status_code: if healthy { 200 } else { 500 },
            components,
            timestamp: Utc::now(),
        }
    }

    pub fn is_healthy(&self) -> bool { self.components.datastore }
}

/// Ping the datastore, treating an error or a ping slower than `timeout` as down.
pub async fn check<R: ServiceRepository + ?Sized>(repo: &R, timeout: Duration) -> HealthReport {
    let datastore = match tokio::time::timeout(timeout, repo.ping()).await {
        Ok(Ok(())) => true,
        Ok(Err(e)) => {
            warn!(error = %e, "datastore ping failed");
            false
        }
        Err(_) => {
            warn!(timeout_ms = timeout.as_millis() as u64, "datastore ping timed out");
            false
        }
    };
    HealthReport::from_components(Components { datastore })
}
