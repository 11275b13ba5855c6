use navrank_model::{DEFAULT_SECTOR, ProgressUpdate};

/// Projects incoming progress onto the sector the user is currently watching.
///
/// A background computation (a prefetch, say) keeps running without
/// perturbing the visible progress for the foreground sector: updates whose
/// subject differs from the watched sector are dropped, matching ones replace
/// the projection wholesale.
#[derive(Debug)]
pub struct ProgressProjector {
    watched: String,
    current: Option<ProgressUpdate>,
}

impl Default for ProgressProjector {
    fn default() -> Self {
        Self {
            watched: DEFAULT_SECTOR.to_string(),
            current: None,
        }
    }
}

impl ProgressProjector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one update from a computation for `request_sector`. The update's
    /// own sector tag wins when present. Returns whether it was projected.
    pub fn observe(&mut self, request_sector: &str, mut update: ProgressUpdate) -> bool {
        let subject = update
            .sector
            .take()
            .unwrap_or_else(|| request_sector.to_string());
        if subject != self.watched {
            log::debug!(
                "Dropping progress for {} while watching {}",
                subject,
                self.watched
            );
            return false;
        }
        update.sector = Some(subject);
        self.current = Some(update);
        true
    }

    /// Retarget the projection. Progress from the previously watched sector
    /// is stale by definition and gets discarded.
    pub fn watch(&mut self, sector: impl Into<String>) {
        let sector = sector.into();
        if sector != self.watched {
            self.watched = sector;
            self.current = None;
        }
    }

    pub fn watched(&self) -> &str {
        &self.watched
    }

    pub fn current(&self) -> Option<&ProgressUpdate> {
        self.current.as_ref()
    }

    pub fn clear(&mut self) {
        self.current = None;
    }
}
