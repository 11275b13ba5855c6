use crate::error::{ModelError, Result};

/// Synthetic sector covering the whole fund universe. The backend may or may
/// not include it in its catalog; consumers always see it listed first.
pub const DEFAULT_SECTOR: &str = "All Funds";

/// The list of sector identifiers the backend currently serves.
///
/// Sector names are case-sensitive identity keys. The catalog guarantees
/// `All Funds` is present exactly once, at the front; construction through
/// [`SectorCatalog::new`] is the only way in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SectorCatalog {
    sectors: Vec<String>,
}

impl SectorCatalog {
    pub fn new(raw: Vec<String>) -> Self {
        let mut sectors: Vec<String> = Vec::with_capacity(raw.len() + 1);
        sectors.push(DEFAULT_SECTOR.to_string());
        for sector in raw {
            if sector != DEFAULT_SECTOR && !sectors.contains(&sector) {
                sectors.push(sector);
            }
        }
        SectorCatalog { sectors }
    }

    pub fn sectors(&self) -> &[String] {
        &self.sectors
    }

    pub fn len(&self) -> usize {
        self.sectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sectors.is_empty()
    }

    pub fn contains(&self, sector: &str) -> bool {
        self.sectors.iter().any(|s| s == sector)
    }

    /// Validate a user-supplied sector name against the catalog.
    pub fn resolve<'a>(&'a self, sector: &str) -> Result<&'a str> {
        self.sectors
            .iter()
            .find(|s| s.as_str() == sector)
            .map(String::as_str)
            .ok_or_else(|| ModelError::UnknownSector(sector.to_string()))
    }
}
