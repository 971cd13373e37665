//! In-memory road store.

use crate::rows::RoadRow;
use crate::{Result, RoadStore};
use roadcurve_features::{RoadFeatureRecord, RoadRecord};
use tracing::warn;

/// Holds roads and saved features in memory.
#[derive(Debug, Default)]
pub struct MemoryRoadStore {
    roads: Vec<RoadRecord>,
    saved: Vec<RoadFeatureRecord>,
    skipped: usize,
}

impl MemoryRoadStore {
    /// Store serving `roads`, with nothing saved yet.
    pub fn new(roads: Vec<RoadRecord>) -> Self {
        Self {
            roads,
            ..Self::default()
        }
    }

    /// Build from raw rows, dropping rows whose geometry does not parse.
    pub fn from_rows<I: IntoIterator<Item = RoadRow>>(rows: I) -> Self {
        let mut store = Self::default();
        for row in rows {
            match row.into_record() {
                Ok(road) => store.roads.push(road),
                Err(err) => {
                    warn!("Skipping road: {}", err);
                    store.skipped += 1;
                }
            }
        }
        store
    }

    /// Every feature record saved so far, in save order.
    pub fn saved(&self) -> &[RoadFeatureRecord] {
        &self.saved
    }
}

impl RoadStore for MemoryRoadStore {
    fn load_roads(&mut self) -> Result<Vec<RoadRecord>> {
        Ok(self.roads.clone())
    }

    fn save_features(&mut self, features: &[RoadFeatureRecord]) -> Result<()> {
        self.saved.extend_from_slice(features);
        Ok(())
    }

    fn skipped_rows(&self) -> usize {
        self.skipped
    }
}
