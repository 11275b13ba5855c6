//! Fetch coordination for sector-ranking computations.
//!
//! The coordinator owns at most one live push channel at a time and enforces
//! "latest request wins": issuing a new request cancels whatever was in
//! flight, and a superseded request's outcome is inert no matter when it
//! arrives. Completed payloads are cached per sector and consulted before any
//! transport is opened.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use navrank_model::{RankingRequest, SectorCatalog, SectorRanking};

use crate::api_client::ApiClient;
use crate::cache::RankingCache;
use crate::config::ClientConfig;
use crate::error::{ClientError, Result};
use crate::lifecycle::{RankingLifecycle, RankingPhase};
use crate::progress::ProgressProjector;
use crate::stream::RankingEvent;
use crate::transport::{HttpTransport, RankingTransport};

/// Load status of the sector catalog, tracked separately from the ranking
/// lifecycle.
#[derive(Debug, Clone, Default)]
pub struct CatalogState {
    pub phase: RankingPhase,
    pub catalog: SectorCatalog,
    pub error: Option<String>,
}

#[derive(Debug)]
struct ActiveChannel {
    token: CancellationToken,
    generation: u64,
}

#[derive(Debug)]
struct CoordinatorState {
    lifecycle: RankingLifecycle,
    cache: RankingCache,
    projector: ProgressProjector,
    catalog: CatalogState,
    active: Option<ActiveChannel>,
    generation: u64,
}

impl CoordinatorState {
    /// A request may mutate shared state only while its channel is still the
    /// designated active one. Events from a closed or superseded channel fail
    /// this check and fall through.
    fn is_live(&self, generation: u64) -> bool {
        self.active
            .as_ref()
            .is_some_and(|active| active.generation == generation)
    }

    fn settle(&mut self, sector: &str, ranking: &SectorRanking) {
        self.cache.put(sector.to_string(), ranking.clone());
        self.lifecycle.complete(ranking.clone());
        self.projector.clear();
        self.active = None;
    }
}

impl Default for CoordinatorState {
    fn default() -> Self {
        Self {
            lifecycle: RankingLifecycle::default(),
            cache: RankingCache::new(),
            projector: ProgressProjector::new(),
            catalog: CatalogState::default(),
            active: None,
            generation: 0,
        }
    }
}

/// Orchestrates ranking retrieval over an injectable transport.
#[derive(Debug)]
pub struct FetchCoordinator<T> {
    transport: T,
    stream_timeout: Duration,
    state: Arc<Mutex<CoordinatorState>>,
}

/// Coordinator over the production SSE-plus-REST transport.
pub type HttpCoordinator = FetchCoordinator<HttpTransport>;

impl FetchCoordinator<HttpTransport> {
    pub fn from_config(config: &ClientConfig) -> Self {
        let api = ApiClient::new(config);
        Self::new(HttpTransport::new(api), config.stream_timeout)
    }

    pub fn api(&self) -> &ApiClient {
        self.transport.api()
    }
}

impl<T: RankingTransport> FetchCoordinator<T> {
    pub fn new(transport: T, stream_timeout: Duration) -> Self {
        Self {
            transport,
            stream_timeout,
            state: Arc::new(Mutex::new(CoordinatorState::default())),
        }
    }

    /// Snapshot of the view-facing lifecycle.
    pub fn lifecycle(&self) -> RankingLifecycle {
        let state = self.state.lock();
        let mut snapshot = state.lifecycle.clone();
        snapshot.progress = state.projector.current().cloned();
        snapshot
    }

    pub fn catalog(&self) -> CatalogState {
        self.state.lock().catalog.clone()
    }

    /// Designate the sector whose progress the user is watching.
    pub fn watch(&self, sector: impl Into<String>) {
        self.state.lock().projector.watch(sector);
    }

    pub fn watched(&self) -> String {
        self.state.lock().projector.watched().to_string()
    }

    /// Reset the visible ranking state to idle. Does not cancel in-flight
    /// work; a late completion simply repopulates the lifecycle.
    pub fn clear_ranking(&self) {
        let mut state = self.state.lock();
        state.lifecycle.reset();
        state.projector.clear();
    }

    pub fn cached(&self, sector: &str) -> Option<SectorRanking> {
        self.state.lock().cache.get(sector).cloned()
    }

    /// Load the sector catalog. A refresh invalidates the whole result cache
    /// since stale sector names may no longer be valid keys.
    pub async fn load_catalog(&self, refresh: bool) -> Result<SectorCatalog> {
        {
            let mut state = self.state.lock();
            state.catalog.phase = RankingPhase::Loading;
            state.catalog.error = None;
        }

        match self.transport.fetch_sectors(refresh).await {
            Ok(raw) => {
                let catalog = SectorCatalog::new(raw);
                let mut state = self.state.lock();
                if refresh {
                    state.cache.clear();
                }
                state.catalog.phase = RankingPhase::Succeeded;
                state.catalog.catalog = catalog.clone();
                Ok(catalog)
            }
            Err(e) => {
                let mut state = self.state.lock();
                state.catalog.phase = RankingPhase::Failed;
                state.catalog.error = Some(e.to_string());
                Err(e)
            }
        }
    }

    /// Run one ranking computation to a terminal outcome.
    ///
    /// Resolution order: cache, push channel, then exactly one plain fetch if
    /// the channel fails or times out. Returns [`ClientError::Cancelled`]
    /// when a newer request supersedes this one; that outcome never touches
    /// the visible lifecycle.
    pub async fn request(
        &self,
        sector: &str,
        force_refresh: bool,
    ) -> Result<SectorRanking> {
        let request = RankingRequest::new(sector, force_refresh)?;

        let (generation, token) = {
            let mut state = self.state.lock();

            if !request.force_refresh {
                if let Some(hit) = state.cache.get(&request.sector).cloned() {
                    log::debug!("Cache hit for sector {}", request.sector);
                    state.lifecycle.complete(hit.clone());
                    return Ok(hit);
                }
            }

            // At most one live computation per coordinator: switching targets
            // always wins over finishing the previous one.
            if let Some(previous) = state.active.take() {
                log::info!(
                    "Superseding in-flight ranking request for {}",
                    request.sector
                );
                previous.token.cancel();
            }

            state.generation += 1;
            let generation = state.generation;
            let token = CancellationToken::new();
            state.active = Some(ActiveChannel {
                token: token.clone(),
                generation,
            });
            state.lifecycle.begin_loading();
            state.projector.clear();
            (generation, token)
        };

        let events = self.transport.open(&request, token.clone());

        let outcome = tokio::time::timeout(
            self.stream_timeout,
            self.drive(&request, generation, &token, events),
        )
        .await;

        match outcome {
            Ok(result) => result,
            Err(_elapsed) => {
                // Force-close the channel; its task exits on cancellation.
                token.cancel();
                if !self.is_live(generation) {
                    return Err(ClientError::Cancelled);
                }
                let cause = ClientError::Timeout {
                    after: self.stream_timeout,
                };
                log::warn!(
                    "Ranking stream for {} timed out ({}), attempting plain fetch",
                    request.sector,
                    cause
                );
                self.fallback(&request, generation).await
            }
        }
    }

    fn is_live(&self, generation: u64) -> bool {
        self.state.lock().is_live(generation)
    }

    async fn drive(
        &self,
        request: &RankingRequest,
        generation: u64,
        token: &CancellationToken,
        mut events: mpsc::UnboundedReceiver<RankingEvent>,
    ) -> Result<SectorRanking> {
        loop {
            let event = tokio::select! {
                _ = token.cancelled() => return Err(ClientError::Cancelled),
                event = events.recv() => event.unwrap_or(RankingEvent::Closed),
            };

            match event {
                RankingEvent::Status(status) => {
                    let mut state = self.state.lock();
                    if state.is_live(generation) {
                        state.projector.observe(&request.sector, status.into());
                    }
                }
                RankingEvent::Progress(update) => {
                    let mut state = self.state.lock();
                    if state.is_live(generation) {
                        state.projector.observe(&request.sector, update);
                    }
                }
                RankingEvent::Partial(ranking) => {
                    let mut state = self.state.lock();
                    if state.is_live(generation) {
                        state.lifecycle.apply_partial(ranking);
                    }
                }
                RankingEvent::Complete(ranking) => {
                    let mut state = self.state.lock();
                    if !state.is_live(generation) {
                        return Err(ClientError::Cancelled);
                    }
                    state.settle(&request.sector, &ranking);
                    return Ok(ranking);
                }
                RankingEvent::Error(detail) => {
                    if !self.is_live(generation) {
                        return Err(ClientError::Cancelled);
                    }
                    log::warn!(
                        "Ranking stream for {} failed: {}, attempting plain fetch",
                        request.sector,
                        detail
                    );
                    return self.fallback(request, generation).await;
                }
                RankingEvent::Closed => {
                    if !self.is_live(generation) {
                        return Err(ClientError::Cancelled);
                    }
                    log::warn!(
                        "Ranking stream for {} ended without a terminal event, attempting plain fetch",
                        request.sector
                    );
                    return self.fallback(request, generation).await;
                }
            }
        }
    }

    /// The one-shot plain request/response fallback. Reached only for genuine
    /// channel failures; a superseded request returns `Cancelled` before this.
    async fn fallback(
        &self,
        request: &RankingRequest,
        generation: u64,
    ) -> Result<SectorRanking> {
        match self.transport.fetch_plain(request).await {
            Ok(ranking) => {
                let mut state = self.state.lock();
                if !state.is_live(generation) {
                    return Err(ClientError::Cancelled);
                }
                state.settle(&request.sector, &ranking);
                Ok(ranking)
            }
            Err(e) => {
                let mut state = self.state.lock();
                if !state.is_live(generation) {
                    return Err(ClientError::Cancelled);
                }
                state.lifecycle.fail(e.to_string());
                state.projector.clear();
                state.active = None;
                Err(e)
            }
        }
    }
}
