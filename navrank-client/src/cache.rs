use std::collections::HashMap;

use navrank_model::SectorRanking;

/// Completed ranking payloads keyed by sector name.
///
/// Entries are written once per key unless a force-refresh overwrites them.
/// There is no TTL or size bound: the sector universe is small and bounded,
/// and `clear` on catalog refresh is the only eviction (stale sector names
/// may no longer be valid keys after a refresh).
#[derive(Debug, Default)]
pub struct RankingCache {
    entries: HashMap<String, SectorRanking>,
}

impl RankingCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, sector: &str) -> Option<&SectorRanking> {
        self.entries.get(sector)
    }

    pub fn put(&mut self, sector: impl Into<String>, ranking: SectorRanking) {
        self.entries.insert(sector.into(), ranking);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ranking(sector: &str, total: u64) -> SectorRanking {
        SectorRanking {
            sector: sector.to_string(),
            total_funds: total,
            ..SectorRanking::default()
        }
    }

    #[test]
    fn get_is_keyed_and_case_sensitive() {
        let mut cache = RankingCache::new();
        cache.put("Technology", ranking("Technology", 10));
        assert!(cache.get("Technology").is_some());
        assert!(cache.get("technology").is_none());
        assert!(cache.get("Banking").is_none());
    }

    #[test]
    fn put_overwrites_existing_entry() {
        let mut cache = RankingCache::new();
        cache.put("Technology", ranking("Technology", 10));
        cache.put("Technology", ranking("Technology", 25));
        assert_eq!(cache.get("Technology").unwrap().total_funds, 25);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn clear_removes_everything() {
        let mut cache = RankingCache::new();
        cache.put("Technology", ranking("Technology", 10));
        cache.put("Banking", ranking("Banking", 4));
        cache.clear();
        assert!(cache.is_empty());
    }
}
