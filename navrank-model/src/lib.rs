//! Core data model definitions shared across navrank crates.
#![allow(missing_docs)]

pub use ::chrono;

pub mod catalog;
pub mod error;
pub mod fund;
pub mod preload;
pub mod progress;
pub mod ranking;

// Intentionally curated re-exports for downstream consumers.
pub use catalog::{DEFAULT_SECTOR, SectorCatalog};
pub use error::{ModelError, Result as ModelResult};
pub use fund::{FundDetails, FundReturns, FundSectorView};
pub use preload::{PreloadMetadata, PreloadStatus};
pub use progress::{ProgressUpdate, StatusUpdate};
pub use ranking::{
    FundMetrics, RankedFund, RankingRequest, SectorRanking, Timeframe,
    TimeframeRankings,
};
