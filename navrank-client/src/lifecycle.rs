use navrank_model::{ProgressUpdate, SectorRanking};

/// Observable status of the current ranking request.
///
/// `Partial` is a real, user-visible intermediate: provisional data plus
/// progress, distinct from `Loading` (progress only) and `Succeeded` (full
/// data, no progress chrome).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RankingPhase {
    #[default]
    Idle,
    Loading,
    Partial,
    Succeeded,
    Failed,
}

impl std::fmt::Display for RankingPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            RankingPhase::Idle => "idle",
            RankingPhase::Loading => "loading",
            RankingPhase::Partial => "partial",
            RankingPhase::Succeeded => "succeeded",
            RankingPhase::Failed => "failed",
        };
        f.write_str(s)
    }
}

/// Read-only projection handed to the view layer. Mutated exclusively by the
/// fetch coordinator; exactly one phase is visible at a time.
#[derive(Debug, Clone, Default)]
pub struct RankingLifecycle {
    pub phase: RankingPhase,
    /// Last known ranking, possibly a provisional subset while `phase` is
    /// `Partial`.
    pub ranking: Option<SectorRanking>,
    pub progress: Option<ProgressUpdate>,
    pub error: Option<String>,
}

impl RankingLifecycle {
    pub(crate) fn begin_loading(&mut self) {
        self.phase = RankingPhase::Loading;
        self.ranking = None;
        self.progress = None;
        self.error = None;
    }

    pub(crate) fn apply_partial(&mut self, ranking: SectorRanking) {
        self.phase = RankingPhase::Partial;
        self.ranking = Some(ranking);
    }

    pub(crate) fn complete(&mut self, ranking: SectorRanking) {
        self.phase = RankingPhase::Succeeded;
        self.ranking = Some(ranking);
        self.progress = None;
        self.error = None;
    }

    pub(crate) fn fail(&mut self, message: String) {
        self.phase = RankingPhase::Failed;
        self.progress = None;
        self.error = Some(message);
    }

    pub(crate) fn reset(&mut self) {
        *self = RankingLifecycle::default();
    }
}
