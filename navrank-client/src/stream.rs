//! Push-channel transport for one sector-ranking computation.
//!
//! Wraps a Server-Sent Events connection and surfaces a uniform, typed event
//! sequence over an mpsc channel. One stream serves exactly one computation:
//! `complete` and `error` are terminal and the underlying connection is
//! released as soon as either is emitted.

use futures::StreamExt;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use navrank_model::{ProgressUpdate, SectorRanking, StatusUpdate};

/// Events a ranking computation emits, in arrival order. `Complete` and
/// `Error` are terminal and mutually exclusive; `Closed` marks a stream that
/// ended without reaching either.
#[derive(Debug, Clone)]
pub enum RankingEvent {
    Status(StatusUpdate),
    Progress(ProgressUpdate),
    Partial(SectorRanking),
    Complete(SectorRanking),
    Error(String),
    Closed,
}

impl RankingEvent {
    pub fn is_terminal(&self) -> bool {
        matches!(self, RankingEvent::Complete(_) | RankingEvent::Error(_))
    }
}

/// Opens the push channel for a computation and drains it into a typed
/// event stream.
#[derive(Debug)]
pub struct RankingStream;

impl RankingStream {
    /// Open the channel addressed by `url`. The returned receiver yields
    /// events until a terminal one, `Closed`, or cancellation; the spawned
    /// task releases the connection in every exit path.
    ///
    /// `sector` is stamped onto status/progress payloads that omit their own,
    /// so downstream filtering always has a subject to compare.
    pub fn open(
        url: String,
        sector: String,
        token: CancellationToken,
    ) -> mpsc::UnboundedReceiver<RankingEvent> {
        let (tx, rx) = mpsc::unbounded_channel();

        tokio::spawn(async move {
            log::info!("Opening ranking stream: {}", url);
            let mut source = reqwest_eventsource::EventSource::get(&url);

            loop {
                let event = tokio::select! {
                    _ = token.cancelled() => {
                        log::debug!("Ranking stream for {} cancelled", sector);
                        break;
                    }
                    event = source.next() => event,
                };

                match event {
                    None => {
                        let _ = tx.send(RankingEvent::Closed);
                        break;
                    }
                    Some(Ok(reqwest_eventsource::Event::Open)) => {
                        log::info!("Ranking stream opened for {}", sector);
                    }
                    Some(Ok(reqwest_eventsource::Event::Message(msg))) => {
                        match decode_message(&sector, &msg.event, &msg.data) {
                            Some(event) => {
                                let terminal = event.is_terminal();
                                if tx.send(event).is_err() {
                                    // Receiver dropped, exit task
                                    break;
                                }
                                if terminal {
                                    break;
                                }
                            }
                            None => continue,
                        }
                    }
                    Some(Err(e)) => {
                        let _ = tx.send(RankingEvent::Error(e.to_string()));
                        break;
                    }
                }
            }

            source.close();
        });

        rx
    }
}

/// Map one wire message to a typed event. Returns `None` for keepalives,
/// unknown event names, and undecodable non-terminal payloads; those must not
/// disturb the channel.
fn decode_message(sector: &str, event: &str, data: &str) -> Option<RankingEvent> {
    if data == "keepalive" || data.is_empty() {
        log::debug!("Received ranking stream keepalive");
        return None;
    }

    match event {
        "status" => match serde_json::from_str::<StatusUpdate>(data) {
            Ok(mut status) => {
                status.sector.get_or_insert_with(|| sector.to_string());
                Some(RankingEvent::Status(status))
            }
            Err(e) => {
                log::debug!("Dropping undecodable status event: {}", e);
                None
            }
        },
        "progress" => match serde_json::from_str::<ProgressUpdate>(data) {
            Ok(mut progress) => {
                progress.sector.get_or_insert_with(|| sector.to_string());
                Some(RankingEvent::Progress(progress))
            }
            Err(e) => {
                log::debug!("Dropping undecodable progress event: {}", e);
                None
            }
        },
        "partial" => match serde_json::from_str::<SectorRanking>(data) {
            Ok(ranking) => Some(RankingEvent::Partial(ranking)),
            Err(e) => {
                log::debug!("Dropping undecodable partial event: {}", e);
                None
            }
        },
        "complete" => match serde_json::from_str::<SectorRanking>(data) {
            Ok(ranking) => Some(RankingEvent::Complete(ranking)),
            Err(e) => {
                log::error!(
                    "Failed to parse ranking payload: {} - Data: {}",
                    e,
                    data
                );
                Some(RankingEvent::Error(format!(
                    "failed to parse ranking payload: {e}"
                )))
            }
        },
        "error" => Some(RankingEvent::Error(if data == "{}" {
            "ranking stream reported an error".to_string()
        } else {
            data.to_string()
        })),
        other => {
            log::debug!("Unknown ranking stream event type: {}", other);
            None
        }
    }
}
