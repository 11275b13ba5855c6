/// Transient progress snapshot for an in-flight ranking computation.
///
/// Last value wins; nothing here is persisted. The `sector` field is filled in
/// by the transport from the request when the backend omits it, so consumers
/// can always attribute an update.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase", default))]
pub struct ProgressUpdate {
    pub sector: Option<String>,
    pub message: Option<String>,
    pub percent: Option<f64>,
    pub processed: Option<u64>,
    pub total: Option<u64>,
    /// Estimated seconds remaining.
    pub eta: Option<f64>,
    /// Funds that failed analysis so far.
    pub errors: Option<u64>,
    /// Free-form computation phase, e.g. "loading_funds" or "ranking".
    pub phase: Option<String>,
}

impl ProgressUpdate {
    /// Fraction complete as a percentage, preferring the explicit percent over
    /// the processed/total pair.
    pub fn percent_complete(&self) -> Option<f64> {
        if self.percent.is_some() {
            return self.percent;
        }
        match (self.processed, self.total) {
            (Some(done), Some(total)) if total > 0 => {
                Some(done as f64 * 100.0 / total as f64)
            }
            _ => None,
        }
    }
}

/// Informational status line from the backend. No effect on cached results.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase", default))]
pub struct StatusUpdate {
    pub sector: Option<String>,
    pub message: String,
    pub phase: Option<String>,
}

impl From<StatusUpdate> for ProgressUpdate {
    fn from(status: StatusUpdate) -> Self {
        ProgressUpdate {
            sector: status.sector,
            message: Some(status.message),
            phase: status.phase,
            ..ProgressUpdate::default()
        }
    }
}
