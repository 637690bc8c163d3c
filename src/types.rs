use std::sync::Arc;
use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::{errors::AppError, repositories::InMemoryKnowledgeRepository};

pub type Result<T> = std::result::Result<T, AppError>;

/// Entry points listed by the root route
pub const ENDPOINTS: [&str; 5] = [
    "/health",
    "/api/categories",
    "/api/knowledge",
    "/api/knowledge/{id}/share",
    "/api/knowledge/share/{share_code}",
];

/// Body of `GET /`
#[derive(Serialize, Deserialize)]
pub struct ServiceInfo {
    pub name: String,
    pub version: String,
    pub endpoints: Vec<String>,
}

/// Body of `GET /health`
#[derive(Serialize, Deserialize)]
pub struct HealthStatus {
    /// `OK`, or `DEGRADED` when the store could not be read
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
    pub articles: Option<usize>,
    pub share_base_url: String,
}

/// Process-wide state, built once and shared by every worker
pub struct AppState {
    pub name: String,
    pub version: String,
    pub share_base_url: String,
    pub start_time: Instant,
    pub repository: Arc<InMemoryKnowledgeRepository>,
}

impl AppState {
    pub fn new(
        name: impl Into<String>,
        version: impl Into<String>,
        share_base_url: impl Into<String>,
        repository: Arc<InMemoryKnowledgeRepository>,
    ) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            share_base_url: share_base_url.into(),
            start_time: Instant::now(),
            repository,
        }
    }

    pub fn service_info(&self) -> ServiceInfo {
        ServiceInfo {
            name: self.name.clone(),
            version: self.version.clone(),
            endpoints: ENDPOINTS.iter().map(|e| e.to_string()).collect(),
        }
    }

    /// `articles` is `None` when the count failed
    pub fn health(&self, articles: Option<usize>) -> HealthStatus {
        HealthStatus {
            status: if articles.is_some() { "OK" } else { "DEGRADED" }.to_string(),
            version: self.version.clone(),
            uptime_seconds: self.start_time.elapsed().as_secs(),
            articles,
            share_base_url: self.share_base_url.clone(),
        }
    }
}
