//! # roadcurve-store
//!
//! Sources of road records and sinks for computed features.
//!
//! A [`RoadStore`] hands out [`RoadRecord`]s with their geometry already
//! parsed and accepts one bulk write of [`RoadFeatureRecord`]s. Rows whose
//! geometry is not a usable `LINESTRING` are logged and left out of the load;
//! [`RoadStore::skipped_rows`] reports how many.
//!
//! - [`CsvRoadStore`]: road table from CSV, features to CSV or JSON lines
//! - [`MemoryRoadStore`]: everything in memory

mod csv_store;
mod error;
mod memory;
mod rows;

pub use csv_store::{CsvRoadStore, OutputFormat};
pub use error::StoreError;
pub use memory::MemoryRoadStore;
pub use rows::{FeatureRow, RoadRow};

use roadcurve_features::{RoadFeatureRecord, RoadRecord};

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Road input and feature output.
pub trait RoadStore {
    /// Load every road with valid geometry.
    fn load_roads(&mut self) -> Result<Vec<RoadRecord>>;

    /// Persist computed features in one bulk write.
    fn save_features(&mut self, features: &[RoadFeatureRecord]) -> Result<()>;

    /// Rows left out of the most recent load because of bad geometry.
    fn skipped_rows(&self) -> usize {
        0
    }
}
