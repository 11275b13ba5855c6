use chrono::{DateTime, Utc};

/// Summary returned when the backend finishes pre-classifying the fund
/// universe into sectors.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase", default))]
pub struct PreloadMetadata {
    pub classified_funds: u64,
    pub generated_at: Option<DateTime<Utc>>,
}

/// Current preload state as reported by the backend.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase", default))]
pub struct PreloadStatus {
    pub preloaded: bool,
    pub metadata: Option<PreloadMetadata>,
}
