//! Fetch coordinator behavior tests.
//!
//! These drive the coordinator through a scripted transport so every channel
//! event sequence is deterministic: cache short-circuits, latest-request-wins
//! cancellation, partial visibility, progress filtering, fallback and timeout
//! handling.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use navrank_client::{
    ClientError, FetchCoordinator, RankingEvent, RankingPhase, RankingTransport,
};
use navrank_model::{ProgressUpdate, RankingRequest, SectorRanking, StatusUpdate};

/// One scripted action of a fake push channel.
#[derive(Debug, Clone)]
enum Step {
    Status(StatusUpdate),
    Progress(ProgressUpdate),
    Partial(SectorRanking),
    Complete(SectorRanking),
    Error(String),
    Close,
    Delay(Duration),
    /// Park until the coordinator cancels this channel.
    WaitCancelled,
}

#[derive(Debug, Clone)]
enum PlainOutcome {
    Success(SectorRanking),
    NotFound(String),
}

/// Transport whose channels replay pre-queued scripts. Scripts are consumed
/// in `open` order; a script that ends without a terminal step holds its
/// sender open until cancelled, simulating a silent backend.
#[derive(Debug, Clone, Default)]
struct ScriptedTransport {
    scripts: Arc<Mutex<VecDeque<Vec<Step>>>>,
    plain: Arc<Mutex<VecDeque<PlainOutcome>>>,
    sectors: Arc<Mutex<VecDeque<Result<Vec<String>, String>>>>,
    opens: Arc<AtomicUsize>,
    plain_calls: Arc<AtomicUsize>,
}

impl ScriptedTransport {
    fn new() -> Self {
        Self::default()
    }

    fn push_script(&self, steps: Vec<Step>) {
        self.scripts.lock().unwrap().push_back(steps);
    }

    fn push_plain_ok(&self, ranking: SectorRanking) {
        self.plain
            .lock()
            .unwrap()
            .push_back(PlainOutcome::Success(ranking));
    }

    fn push_plain_err(&self, message: &str) {
        self.plain
            .lock()
            .unwrap()
            .push_back(PlainOutcome::NotFound(message.to_string()));
    }

    fn push_sectors(&self, outcome: Result<Vec<String>, String>) {
        self.sectors.lock().unwrap().push_back(outcome);
    }

    fn opens(&self) -> usize {
        self.opens.load(Ordering::SeqCst)
    }

    fn plain_calls(&self) -> usize {
        self.plain_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RankingTransport for ScriptedTransport {
    fn open(
        &self,
        _request: &RankingRequest,
        token: CancellationToken,
    ) -> mpsc::UnboundedReceiver<RankingEvent> {
        self.opens.fetch_add(1, Ordering::SeqCst);
        let steps = self
            .scripts
            .lock()
            .unwrap()
            .pop_front()
            .expect("no script queued for open");
        let (tx, rx) = mpsc::unbounded_channel();

        tokio::spawn(async move {
            for step in steps {
                match step {
                    Step::Delay(duration) => tokio::time::sleep(duration).await,
                    Step::WaitCancelled => token.cancelled().await,
                    Step::Status(status) => {
                        let _ = tx.send(RankingEvent::Status(status));
                    }
                    Step::Progress(update) => {
                        let _ = tx.send(RankingEvent::Progress(update));
                    }
                    Step::Partial(ranking) => {
                        let _ = tx.send(RankingEvent::Partial(ranking));
                    }
                    Step::Complete(ranking) => {
                        let _ = tx.send(RankingEvent::Complete(ranking));
                        return;
                    }
                    Step::Error(detail) => {
                        let _ = tx.send(RankingEvent::Error(detail));
                        return;
                    }
                    Step::Close => {
                        let _ = tx.send(RankingEvent::Closed);
                        return;
                    }
                }
            }
            // Script exhausted without a terminal event: hold the channel
            // open until the coordinator gives up.
            token.cancelled().await;
        });

        rx
    }

    async fn fetch_plain(
        &self,
        _request: &RankingRequest,
    ) -> navrank_client::Result<SectorRanking> {
        self.plain_calls.fetch_add(1, Ordering::SeqCst);
        match self.plain.lock().unwrap().pop_front() {
            Some(PlainOutcome::Success(ranking)) => Ok(ranking),
            Some(PlainOutcome::NotFound(message)) => Err(ClientError::Api {
                status: 404,
                message,
            }),
            None => Err(ClientError::Stream(
                "no plain response scripted".to_string(),
            )),
        }
    }

    async fn fetch_sectors(
        &self,
        _refresh: bool,
    ) -> navrank_client::Result<Vec<String>> {
        match self.sectors.lock().unwrap().pop_front() {
            Some(Ok(sectors)) => Ok(sectors),
            Some(Err(message)) => Err(ClientError::Api {
                status: 500,
                message,
            }),
            None => Ok(Vec::new()),
        }
    }
}

fn ranking(sector: &str, total_funds: u64) -> SectorRanking {
    SectorRanking {
        sector: sector.to_string(),
        total_funds,
        ..SectorRanking::default()
    }
}

fn progress_counts(processed: u64, total: u64) -> ProgressUpdate {
    ProgressUpdate {
        processed: Some(processed),
        total: Some(total),
        ..ProgressUpdate::default()
    }
}

fn coordinator(
    transport: &ScriptedTransport,
) -> Arc<FetchCoordinator<ScriptedTransport>> {
    Arc::new(FetchCoordinator::new(
        transport.clone(),
        Duration::from_secs(5),
    ))
}

#[tokio::test]
async fn cache_short_circuit_skips_transport() {
    let transport = ScriptedTransport::new();
    transport.push_script(vec![Step::Complete(ranking("Technology", 12))]);
    let coordinator = coordinator(&transport);

    let first = coordinator.request("Technology", false).await.unwrap();
    assert_eq!(first.total_funds, 12);
    assert_eq!(transport.opens(), 1);

    // No script queued: any second open would panic the channel task and
    // hang the request.
    let second = coordinator.request("Technology", false).await.unwrap();
    assert_eq!(second, first);
    assert_eq!(transport.opens(), 1);
    assert_eq!(coordinator.lifecycle().phase, RankingPhase::Succeeded);
}

#[tokio::test]
async fn force_refresh_bypasses_cache_and_overwrites() {
    let transport = ScriptedTransport::new();
    transport.push_script(vec![Step::Complete(ranking("Technology", 10))]);
    transport.push_script(vec![Step::Complete(ranking("Technology", 25))]);
    let coordinator = coordinator(&transport);

    coordinator.request("Technology", false).await.unwrap();
    let refreshed = coordinator.request("Technology", true).await.unwrap();

    assert_eq!(transport.opens(), 2);
    assert_eq!(refreshed.total_funds, 25);
    assert_eq!(coordinator.cached("Technology").unwrap().total_funds, 25);
}

#[tokio::test]
async fn latest_request_wins_and_aborted_outcome_is_inert() {
    let transport = ScriptedTransport::new();
    // Technology would complete late; Banking wins the race.
    transport.push_script(vec![
        Step::Delay(Duration::from_millis(200)),
        Step::Complete(ranking("Technology", 40)),
    ]);
    transport.push_script(vec![Step::Complete(ranking("Banking", 8))]);
    let coordinator = coordinator(&transport);

    let background = {
        let coordinator = coordinator.clone();
        tokio::spawn(async move { coordinator.request("Technology", false).await })
    };
    tokio::time::sleep(Duration::from_millis(50)).await;

    let banking = coordinator.request("Banking", false).await.unwrap();
    assert_eq!(banking.sector, "Banking");

    let aborted = background.await.unwrap();
    assert!(matches!(aborted, Err(ClientError::Cancelled)));

    // Give the superseded channel time to fire its late completion.
    tokio::time::sleep(Duration::from_millis(250)).await;
    let lifecycle = coordinator.lifecycle();
    assert_eq!(lifecycle.phase, RankingPhase::Succeeded);
    assert_eq!(lifecycle.ranking.unwrap().sector, "Banking");
    assert!(lifecycle.error.is_none());
    assert_eq!(transport.plain_calls(), 0);
    assert!(coordinator.cached("Technology").is_none());
}

#[tokio::test]
async fn error_after_abort_never_triggers_fallback() {
    let transport = ScriptedTransport::new();
    // The first channel errors out only once it has been superseded; the
    // rejection must be swallowed without a fallback call.
    transport.push_script(vec![
        Step::WaitCancelled,
        Step::Error("connection reset".to_string()),
    ]);
    transport.push_script(vec![Step::Complete(ranking("Banking", 8))]);
    let coordinator = coordinator(&transport);

    let background = {
        let coordinator = coordinator.clone();
        tokio::spawn(async move { coordinator.request("Technology", false).await })
    };
    tokio::time::sleep(Duration::from_millis(50)).await;

    coordinator.request("Banking", false).await.unwrap();
    let aborted = background.await.unwrap();
    assert!(matches!(aborted, Err(ClientError::Cancelled)));

    tokio::time::sleep(Duration::from_millis(50)).await;
    let lifecycle = coordinator.lifecycle();
    assert_eq!(lifecycle.phase, RankingPhase::Succeeded);
    assert!(lifecycle.error.is_none());
    assert_eq!(transport.plain_calls(), 0);
}

#[tokio::test]
async fn partial_results_are_visible_before_completion() {
    let transport = ScriptedTransport::new();
    let mut provisional = ranking("Technology", 0);
    provisional.rankings.one_year.push(navrank_model::RankedFund {
        rank: 1,
        scheme_name: "Active Fund".to_string(),
        ..navrank_model::RankedFund::default()
    });
    transport.push_script(vec![
        Step::Partial(provisional.clone()),
        Step::Delay(Duration::from_millis(150)),
        Step::Complete(ranking("Technology", 40)),
    ]);
    let coordinator = coordinator(&transport);

    let background = {
        let coordinator = coordinator.clone();
        tokio::spawn(async move { coordinator.request("Technology", false).await })
    };
    tokio::time::sleep(Duration::from_millis(50)).await;

    let lifecycle = coordinator.lifecycle();
    assert_eq!(lifecycle.phase, RankingPhase::Partial);
    assert_eq!(lifecycle.ranking.unwrap(), provisional);

    let full = background.await.unwrap().unwrap();
    assert_eq!(full.total_funds, 40);
    assert_eq!(coordinator.lifecycle().phase, RankingPhase::Succeeded);
    assert_eq!(coordinator.cached("Technology").unwrap().total_funds, 40);
}

#[tokio::test]
async fn progress_for_watched_sector_is_projected() {
    let transport = ScriptedTransport::new();
    transport.push_script(vec![
        Step::Progress(progress_counts(50, 100)),
        Step::Delay(Duration::from_millis(150)),
        Step::Complete(ranking("Technology", 100)),
    ]);
    let coordinator = coordinator(&transport);
    coordinator.watch("Technology");

    let background = {
        let coordinator = coordinator.clone();
        tokio::spawn(async move { coordinator.request("Technology", false).await })
    };
    tokio::time::sleep(Duration::from_millis(50)).await;

    let progress = coordinator.lifecycle().progress.unwrap();
    assert_eq!(progress.processed, Some(50));
    assert_eq!(progress.total, Some(100));

    background.await.unwrap().unwrap();
    // Completion discards the progress chrome.
    assert!(coordinator.lifecycle().progress.is_none());
}

#[tokio::test]
async fn progress_for_other_sectors_is_dropped() {
    let transport = ScriptedTransport::new();
    let mut foreign = progress_counts(50, 100);
    foreign.sector = Some("Different".to_string());
    transport.push_script(vec![
        Step::Progress(foreign),
        Step::Delay(Duration::from_millis(150)),
        Step::Complete(ranking("Technology", 100)),
    ]);
    let coordinator = coordinator(&transport);
    coordinator.watch("Banking");

    let background = {
        let coordinator = coordinator.clone();
        tokio::spawn(async move { coordinator.request("Technology", false).await })
    };
    tokio::time::sleep(Duration::from_millis(50)).await;

    assert!(coordinator.lifecycle().progress.is_none());
    background.await.unwrap().unwrap();
}

#[tokio::test]
async fn status_events_project_as_messages() {
    let transport = ScriptedTransport::new();
    transport.push_script(vec![
        Step::Status(StatusUpdate {
            sector: None,
            message: "Loading funds...".to_string(),
            phase: Some("loading_funds".to_string()),
        }),
        Step::Delay(Duration::from_millis(150)),
        Step::Complete(ranking("Technology", 100)),
    ]);
    let coordinator = coordinator(&transport);
    coordinator.watch("Technology");

    let background = {
        let coordinator = coordinator.clone();
        tokio::spawn(async move { coordinator.request("Technology", false).await })
    };
    tokio::time::sleep(Duration::from_millis(50)).await;

    let progress = coordinator.lifecycle().progress.unwrap();
    assert_eq!(progress.message.as_deref(), Some("Loading funds..."));
    assert_eq!(progress.phase.as_deref(), Some("loading_funds"));
    background.await.unwrap().unwrap();
}

#[tokio::test]
async fn channel_error_falls_back_to_plain_fetch() {
    let transport = ScriptedTransport::new();
    transport.push_script(vec![Step::Error("stream broke".to_string())]);
    transport.push_plain_ok(ranking("Technology", 33));
    let coordinator = coordinator(&transport);

    let result = coordinator.request("Technology", false).await.unwrap();
    assert_eq!(result.total_funds, 33);
    assert_eq!(transport.plain_calls(), 1);
    assert_eq!(coordinator.lifecycle().phase, RankingPhase::Succeeded);
    assert_eq!(coordinator.cached("Technology").unwrap().total_funds, 33);
}

#[tokio::test]
async fn failed_fallback_surfaces_its_message() {
    let transport = ScriptedTransport::new();
    transport.push_script(vec![Step::Error("stream broke".to_string())]);
    transport.push_plain_err("Sector not found");
    let coordinator = coordinator(&transport);

    let error = coordinator
        .request("InvalidSector", false)
        .await
        .unwrap_err();
    assert!(error.to_string().contains("Sector not found"));
    assert_eq!(transport.plain_calls(), 1);

    let lifecycle = coordinator.lifecycle();
    assert_eq!(lifecycle.phase, RankingPhase::Failed);
    assert!(lifecycle.error.unwrap().contains("Sector not found"));
    assert!(coordinator.cached("InvalidSector").is_none());
}

#[tokio::test]
async fn silent_stream_end_falls_back() {
    let transport = ScriptedTransport::new();
    transport.push_script(vec![Step::Close]);
    transport.push_plain_ok(ranking("Technology", 7));
    let coordinator = coordinator(&transport);

    let result = coordinator.request("Technology", false).await.unwrap();
    assert_eq!(result.total_funds, 7);
    assert_eq!(transport.plain_calls(), 1);
}

#[tokio::test]
async fn timeout_closes_channel_and_falls_back() {
    let transport = ScriptedTransport::new();
    // Empty script: the channel stays silent forever.
    transport.push_script(vec![]);
    transport.push_plain_ok(ranking("Technology", 19));
    let coordinator = Arc::new(FetchCoordinator::new(
        transport.clone(),
        Duration::from_millis(100),
    ));

    let result = coordinator.request("Technology", false).await.unwrap();
    assert_eq!(result.total_funds, 19);
    assert_eq!(transport.plain_calls(), 1);
    assert_eq!(coordinator.lifecycle().phase, RankingPhase::Succeeded);
}

#[tokio::test]
async fn timeout_with_failing_fallback_fails() {
    let transport = ScriptedTransport::new();
    transport.push_script(vec![]);
    transport.push_plain_err("backend overloaded");
    let coordinator = Arc::new(FetchCoordinator::new(
        transport.clone(),
        Duration::from_millis(100),
    ));

    let error = coordinator.request("Technology", false).await.unwrap_err();
    assert!(error.to_string().contains("backend overloaded"));
    assert_eq!(coordinator.lifecycle().phase, RankingPhase::Failed);
}

#[tokio::test]
async fn cache_hit_leaves_other_flight_untouched() {
    let transport = ScriptedTransport::new();
    transport.push_script(vec![Step::Complete(ranking("Banking", 8))]);
    transport.push_script(vec![
        Step::Delay(Duration::from_millis(200)),
        Step::Complete(ranking("Technology", 40)),
    ]);
    let coordinator = coordinator(&transport);

    coordinator.request("Banking", false).await.unwrap();

    let background = {
        let coordinator = coordinator.clone();
        tokio::spawn(async move { coordinator.request("Technology", false).await })
    };
    tokio::time::sleep(Duration::from_millis(50)).await;

    // Cached Banking resolves instantly and does not cancel Technology.
    let banking = coordinator.request("Banking", false).await.unwrap();
    assert_eq!(banking.sector, "Banking");
    assert_eq!(coordinator.lifecycle().phase, RankingPhase::Succeeded);

    let technology = background.await.unwrap().unwrap();
    assert_eq!(technology.sector, "Technology");
    assert_eq!(coordinator.lifecycle().ranking.unwrap().sector, "Technology");
}

#[tokio::test]
async fn blank_sector_is_rejected_before_any_transport() {
    let transport = ScriptedTransport::new();
    let coordinator = coordinator(&transport);

    let error = coordinator.request("   ", false).await.unwrap_err();
    assert!(matches!(error, ClientError::Invalid(_)));
    assert_eq!(transport.opens(), 0);
    assert_eq!(coordinator.lifecycle().phase, RankingPhase::Idle);
}

#[tokio::test]
async fn catalog_load_normalizes_and_refresh_clears_cache() {
    let transport = ScriptedTransport::new();
    transport.push_sectors(Ok(vec![
        "Technology".to_string(),
        "Banking".to_string(),
    ]));
    transport.push_script(vec![Step::Complete(ranking("Technology", 12))]);
    transport.push_sectors(Ok(vec!["Technology".to_string()]));
    let coordinator = coordinator(&transport);

    let catalog = coordinator.load_catalog(false).await.unwrap();
    assert_eq!(catalog.sectors()[0], "All Funds");
    assert!(catalog.contains("Banking"));

    coordinator.request("Technology", false).await.unwrap();
    assert!(coordinator.cached("Technology").is_some());

    coordinator.load_catalog(true).await.unwrap();
    assert!(coordinator.cached("Technology").is_none());
}

#[tokio::test]
async fn catalog_failure_records_error() {
    let transport = ScriptedTransport::new();
    transport.push_sectors(Err("Network error".to_string()));
    let coordinator = coordinator(&transport);

    let error = coordinator.load_catalog(false).await.unwrap_err();
    assert!(error.to_string().contains("Network error"));

    let catalog = coordinator.catalog();
    assert_eq!(catalog.phase, RankingPhase::Failed);
    assert!(catalog.error.unwrap().contains("Network error"));
}
