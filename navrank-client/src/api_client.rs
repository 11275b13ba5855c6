use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;

use navrank_model::{
    FundDetails, FundSectorView, PreloadMetadata, PreloadStatus, SectorRanking,
};

use crate::config::ClientConfig;
use crate::error::{ClientError, Result};

/// Plain request/response client for the ranking backend.
#[derive(Clone, Debug)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

#[derive(Debug, Default, serde::Deserialize)]
struct SectorsResponse {
    #[serde(default)]
    sectors: Vec<String>,
}

impl ApiClient {
    /// Create a new API client from connection settings.
    pub fn new(config: &ClientConfig) -> Self {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .expect("Failed to create HTTP client");

        log::info!(
            "[ApiClient] Creating new API client with base URL: {}",
            config.base_url
        );

        Self {
            client,
            base_url: config.base_url.clone(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Execute a request and handle common errors
    async fn execute_request<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> Result<T> {
        let response = request.send().await?;

        match response.status() {
            StatusCode::OK => Ok(response.json().await?),
            status => {
                let message = response
                    .text()
                    .await
                    .unwrap_or_else(|_| "Unknown error".to_string());
                Err(ClientError::Api {
                    status: status.as_u16(),
                    message,
                })
            }
        }
    }

    async fn get<T: DeserializeOwned>(&self, url: String) -> Result<T> {
        log::debug!("[ApiClient] GET request to: {}", url);
        self.execute_request(self.client.get(&url)).await
    }

    /// List sector identifiers the backend currently serves.
    pub async fn sectors(&self, available: bool, refresh: bool) -> Result<Vec<String>> {
        let mut request = self
            .client
            .get(format!("{}/sectors", self.base_url));
        if available {
            request = request.query(&[("available", "true")]);
        }
        if refresh {
            request = request.query(&[("refresh", "true")]);
        }
        log::debug!(
            "[ApiClient] GET /sectors (available={}, refresh={})",
            available,
            refresh
        );
        let response: SectorsResponse = self.execute_request(request).await?;
        Ok(response.sectors)
    }

    /// Ask the backend to pre-classify the fund universe. Returns summary
    /// metadata once the classification finishes.
    pub async fn trigger_preload(&self) -> Result<PreloadMetadata> {
        let url = format!("{}/sectors/preload", self.base_url);
        log::debug!("[ApiClient] POST request to: {}", url);
        self.execute_request(self.client.post(&url)).await
    }

    /// Current preload state.
    pub async fn preload_status(&self) -> Result<PreloadStatus> {
        self.get(format!("{}/sectors/preload/status", self.base_url))
            .await
    }

    /// Fetch ranking data for a sector over plain request/response. This is
    /// the fallback path when the push channel fails.
    pub async fn sector_ranking(
        &self,
        sector: &str,
        refresh: bool,
    ) -> Result<SectorRanking> {
        let mut request = self.client.get(format!(
            "{}/sector/{}",
            self.base_url,
            urlencoding::encode(sector)
        ));
        if refresh {
            request = request.query(&[("refresh", "true")]);
        }
        log::debug!("[ApiClient] GET /sector/{} (refresh={})", sector, refresh);
        self.execute_request(request).await
    }

    /// Fetch individual fund details by scheme code or name.
    pub async fn fund_details(&self, query: &str) -> Result<FundDetails> {
        self.get(format!(
            "{}/fund/{}",
            self.base_url,
            urlencoding::encode(query)
        ))
        .await
    }

    /// Fetch a fund together with its sector's ranking.
    pub async fn fund_sector_ranking(&self, query: &str) -> Result<FundSectorView> {
        self.get(format!(
            "{}/fund/{}/sector",
            self.base_url,
            urlencoding::encode(query)
        ))
        .await
    }

    /// Address of the push channel for a sector-ranking computation.
    pub fn stream_url(&self, sector: &str, refresh: bool) -> String {
        let mut url = format!(
            "{}/sector/{}/stream",
            self.base_url,
            urlencoding::encode(sector)
        );
        if refresh {
            url.push_str("?refresh=true");
        }
        url
    }
}
