//! Client-side orchestration for the navrank sector-ranking backend.
//!
//! Ranking a sector is a slow, multi-fund analytics job, so the backend
//! streams progress over a push channel while it works. This crate owns the
//! client half of that contract: open the channel, surface a uniform
//! loading/partial/succeeded/failed lifecycle, fall back to plain
//! request/response when the channel fails, cancel in-flight work when the
//! target changes, and cache completed payloads per sector.
//!
//! [`coordinator::FetchCoordinator`] is the entry point; everything else is
//! a piece it owns.

pub mod api_client;
pub mod cache;
pub mod config;
pub mod coordinator;
pub mod error;
pub mod lifecycle;
pub mod progress;
pub mod stream;
pub mod transport;

pub use api_client::ApiClient;
pub use cache::RankingCache;
pub use config::{ClientConfig, DEFAULT_BASE_URL};
pub use coordinator::{CatalogState, FetchCoordinator, HttpCoordinator};
pub use error::{ClientError, Result};
pub use lifecycle::{RankingLifecycle, RankingPhase};
pub use progress::ProgressProjector;
pub use stream::{RankingEvent, RankingStream};
pub use transport::{HttpTransport, RankingTransport};
