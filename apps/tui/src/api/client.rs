use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;

use super::error::{ApiError, Result};
use super::DataService;
use crate::domain::{DistrictAggregate, PrecinctCollection};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

pub struct HttpDataService {
    client: reqwest::Client,
    base_url: String,
}

impl HttpDataService {
    pub fn new(base_url: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str, query: Option<&str>) -> String {
        match query {
            Some(query) if !query.is_empty() => format!("{}{path}?{query}", self.base_url),
            _ => format!("{}{path}", self.base_url),
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        let resp = self.client.get(url).send().await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ApiError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let bytes = resp.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

#[async_trait]
impl DataService for HttpDataService {
    async fn districts(&self) -> Result<Vec<DistrictAggregate>> {
        let url = self.url("/api/districts", None);
        tracing::debug!(%url, "Fetching district aggregates");

        let districts: Vec<DistrictAggregate> = self.get_json(&url).await?;
        tracing::info!(count = districts.len(), "Fetched district aggregates");
        Ok(districts)
    }

    async fn precincts(&self, query: &str) -> Result<PrecinctCollection> {
        let url = self.url("/api/precincts", Some(query));
        tracing::debug!(%url, "Fetching precincts");

        let collection: PrecinctCollection = self.get_json(&url).await?;
        tracing::info!(count = collection.features.len(), query, "Fetched precincts");
        Ok(collection)
    }
}
