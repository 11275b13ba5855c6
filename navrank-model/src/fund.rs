use crate::ranking::{FundMetrics, SectorRanking, Timeframe};

/// Per-timeframe return values for a single scheme.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase", default))]
pub struct FundReturns {
    pub one_year: Option<f64>,
    pub three_year: Option<f64>,
    pub five_year: Option<f64>,
}

impl FundReturns {
    pub fn for_timeframe(&self, timeframe: Timeframe) -> Option<f64> {
        match timeframe {
            Timeframe::OneYear => self.one_year,
            Timeframe::ThreeYear => self.three_year,
            Timeframe::FiveYear => self.five_year,
        }
    }
}

/// Detail record for a single scheme, looked up by code or name.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase", default))]
pub struct FundDetails {
    pub scheme_code: String,
    pub scheme_name: String,
    pub sector: Option<String>,
    pub is_active: bool,
    pub returns: FundReturns,
    pub metrics: FundMetrics,
}

impl Default for FundDetails {
    fn default() -> Self {
        FundDetails {
            scheme_code: String::new(),
            scheme_name: String::new(),
            sector: None,
            is_active: true,
            returns: FundReturns::default(),
            metrics: FundMetrics::default(),
        }
    }
}

/// A fund together with the ranking of its sector, for "where does this fund
/// stand" views.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase", default))]
pub struct FundSectorView {
    pub fund: FundDetails,
    pub sector_ranking: SectorRanking,
}

impl FundSectorView {
    /// Rank of this fund within its sector for a window, if it appears there.
    pub fn rank_in_sector(&self, timeframe: Timeframe) -> Option<u32> {
        self.sector_ranking
            .rankings
            .for_timeframe(timeframe)
            .iter()
            .find(|entry| entry.scheme_code == self.fund.scheme_code)
            .map(|entry| entry.rank)
    }
}
