use async_trait::async_trait;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use navrank_model::{RankingRequest, SectorRanking};

use crate::api_client::ApiClient;
use crate::error::Result;
use crate::stream::{RankingEvent, RankingStream};

/// Seam between the coordinator and the wire. Production uses
/// [`HttpTransport`]; tests script event sequences through their own
/// implementations.
#[async_trait]
pub trait RankingTransport: Send + Sync {
    /// Open the push channel for one computation. Non-blocking; the channel
    /// stops producing once `token` is cancelled.
    fn open(
        &self,
        request: &RankingRequest,
        token: CancellationToken,
    ) -> mpsc::UnboundedReceiver<RankingEvent>;

    /// Plain request/response path for the same computation, used as the
    /// one-shot fallback when the push channel fails.
    async fn fetch_plain(&self, request: &RankingRequest) -> Result<SectorRanking>;

    /// List the sector catalog.
    async fn fetch_sectors(&self, refresh: bool) -> Result<Vec<String>>;
}

/// SSE-plus-REST transport over [`ApiClient`].
#[derive(Clone, Debug)]
pub struct HttpTransport {
    api: ApiClient,
}

impl HttpTransport {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }
}

#[async_trait]
impl RankingTransport for HttpTransport {
    fn open(
        &self,
        request: &RankingRequest,
        token: CancellationToken,
    ) -> mpsc::UnboundedReceiver<RankingEvent> {
        let url = self.api.stream_url(&request.sector, request.force_refresh);
        RankingStream::open(url, request.sector.clone(), token)
    }

    async fn fetch_plain(&self, request: &RankingRequest) -> Result<SectorRanking> {
        self.api
            .sector_ranking(&request.sector, request.force_refresh)
            .await
    }

    async fn fetch_sectors(&self, refresh: bool) -> Result<Vec<String>> {
        self.api.sectors(true, refresh).await
    }
}
