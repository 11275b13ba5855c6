use chrono::{DateTime, Utc};

use crate::error::{ModelError, Result};

/// Identifies one ranking computation. Created per user action and discarded
/// once superseded by a newer request.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RankingRequest {
    pub sector: String,
    pub force_refresh: bool,
}

impl RankingRequest {
    /// Build a request for a sector. Sector names are case-sensitive backend
    /// identifiers; an empty name is rejected up front rather than round-tripped
    /// as a guaranteed 404.
    pub fn new(sector: impl Into<String>, force_refresh: bool) -> Result<Self> {
        let sector = sector.into();
        if sector.trim().is_empty() {
            return Err(ModelError::EmptySector);
        }
        Ok(RankingRequest {
            sector,
            force_refresh,
        })
    }
}

/// Return windows the backend ranks over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub enum Timeframe {
    OneYear,
    ThreeYear,
    FiveYear,
}

impl Timeframe {
    pub const ALL: [Timeframe; 3] =
        [Timeframe::OneYear, Timeframe::ThreeYear, Timeframe::FiveYear];

    pub fn label(&self) -> &'static str {
        match self {
            Timeframe::OneYear => "1Y",
            Timeframe::ThreeYear => "3Y",
            Timeframe::FiveYear => "5Y",
        }
    }
}

impl std::fmt::Display for Timeframe {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Per-fund metric bag. Every value is optional: AUM/PE/expense come from one
/// upstream source, risk metrics from NAV history, and either may be missing
/// for a given scheme.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase", default))]
pub struct FundMetrics {
    pub aum: Option<f64>,
    pub pe_ratio: Option<f64>,
    pub pb_ratio: Option<f64>,
    pub expense_ratio: Option<f64>,
    pub sharpe_ratio: Option<f64>,
    pub sortino_ratio: Option<f64>,
    pub standard_deviation: Option<f64>,
    pub max_drawdown: Option<f64>,
}

/// One row of a ranked fund list.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase", default))]
pub struct RankedFund {
    pub rank: u32,
    pub scheme_code: String,
    pub scheme_name: String,
    pub is_active: bool,
    pub returns: Option<f64>,
    pub metrics: FundMetrics,
}

impl Default for RankedFund {
    fn default() -> Self {
        RankedFund {
            rank: 0,
            scheme_code: String::new(),
            scheme_name: String::new(),
            // Payloads that omit the flag are active-fund subsets
            is_active: true,
            returns: None,
            metrics: FundMetrics::default(),
        }
    }
}

/// Ranked fund lists keyed by return window.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase", default))]
pub struct TimeframeRankings {
    pub one_year: Vec<RankedFund>,
    pub three_year: Vec<RankedFund>,
    pub five_year: Vec<RankedFund>,
}

impl TimeframeRankings {
    pub fn for_timeframe(&self, timeframe: Timeframe) -> &[RankedFund] {
        match timeframe {
            Timeframe::OneYear => &self.one_year,
            Timeframe::ThreeYear => &self.three_year,
            Timeframe::FiveYear => &self.five_year,
        }
    }

    /// Leader for a window, if any funds ranked in it.
    pub fn leader(&self, timeframe: Timeframe) -> Option<&RankedFund> {
        self.for_timeframe(timeframe).first()
    }

    pub fn is_empty(&self) -> bool {
        self.one_year.is_empty()
            && self.three_year.is_empty()
            && self.five_year.is_empty()
    }
}

/// Completed (or provisional) ranking payload for one sector.
///
/// The orchestration layer treats this as an opaque value it must deliver
/// exactly once per request. All fields default so a provisional subset
/// (active funds only, say) decodes with the same schema as a full payload.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase", default))]
pub struct SectorRanking {
    pub sector: String,
    pub generated_at: Option<DateTime<Utc>>,
    pub total_funds: u64,
    pub top_funds: TimeframeRankings,
    pub rankings: TimeframeRankings,
}

impl SectorRanking {
    pub fn is_empty(&self) -> bool {
        self.rankings.is_empty() && self.top_funds.is_empty()
    }
}
