//! One-shot bulk load of all current readings from the PostgREST API

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::config::SupabaseConfig;
use crate::io::HttpClient;
use crate::reading::Reading;

/// Source of the initial full set of readings
#[async_trait]
pub trait SnapshotSource: Send + Sync {
    async fn fetch(&self) -> crate::Result<Vec<Reading>>;
}

/// Fetches every row of the readings table in a single request
pub struct SnapshotLoader {
    endpoint: String,
    api_key: String,
    http: Arc<dyn HttpClient>,
}

impl std::fmt::Debug for SnapshotLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SnapshotLoader")
            .field("endpoint", &self.endpoint)
            .finish()
    }
}

impl SnapshotLoader {
    pub fn new(config: &SupabaseConfig, http: Arc<dyn HttpClient>) -> Self {
        let endpoint = format!(
            "{}/rest/v1/{}?select=*",
            config.url.trim_end_matches('/'),
            config.table
        );
        tracing::debug!("Created SnapshotLoader for {}", endpoint);

        Self {
            endpoint,
            api_key: config.api_key.clone(),
            http,
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl SnapshotSource for SnapshotLoader {
    async fn fetch(&self) -> crate::Result<Vec<Reading>> {
        let bearer = format!("Bearer {}", self.api_key);
        let headers = [
            ("apikey", self.api_key.as_str()),
            ("Authorization", bearer.as_str()),
        ];

        let response = self.http.get(&self.endpoint, &headers).await?;
        if !response.is_success() {
            return Err(crate::DashboardError::Http(format!(
                "Snapshot request returned status {}: {}",
                response.status, response.body
            )));
        }

        let rows: Vec<Value> = serde_json::from_str(&response.body)?;
        Ok(parse_rows(rows))
    }
}

/// Validate raw rows, skipping the ones without a usable key
pub fn parse_rows(rows: Vec<Value>) -> Vec<Reading> {
    rows.into_iter()
        .filter_map(|row| match Reading::from_row(row) {
            Ok(reading) => Some(reading),
            Err(e) => {
                tracing::warn!("Skipping snapshot row: {}", e);
                None
            }
        })
        .collect()
}
