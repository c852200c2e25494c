//! Remote quote source

use async_trait::async_trait;
use reqwest::header::ACCEPT;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use super::SyncError;
use crate::config::SyncConfig;
use crate::models::Quote;

/// A record from the remote collection; fields other than `title` are ignored
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct RemoteRecord {
    pub title: String,
}

/// Anything that can produce the remote collection
#[async_trait]
pub trait QuoteSource: Send + Sync {
    async fn fetch(&self) -> Result<Vec<RemoteRecord>, SyncError>;
}

/// Reads the remote collection with a single GET
pub struct HttpQuoteSource {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpQuoteSource {
    pub fn new(endpoint: impl Into<String>, timeout: Option<Duration>) -> Result<Self, SyncError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
            endpoint: endpoint.into(),
        })
    }

    pub fn from_config(config: &SyncConfig) -> Result<Self, SyncError> {
        Self::new(
            config.endpoint.clone(),
            config.request_timeout_secs.map(Duration::from_secs),
        )
    }
}

#[async_trait]
impl QuoteSource for HttpQuoteSource {
    async fn fetch(&self) -> Result<Vec<RemoteRecord>, SyncError> {
        debug!(endpoint = %self.endpoint, "Fetching remote quotes");
        let response = self
            .client
            .get(&self.endpoint)
            .header(ACCEPT, "application/json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SyncError::Status {
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        let records: Vec<RemoteRecord> = serde_json::from_str(&body)?;
        debug!(count = records.len(), "Fetched remote records");
        Ok(records)
    }
}

/// Shape remote records as quotes under a fixed category label
pub fn map_records(records: Vec<RemoteRecord>, category: &str) -> Vec<Quote> {
    records
        .into_iter()
        .map(|r| Quote::new(r.title, category))
        .collect()
}
