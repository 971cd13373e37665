//! # roadcurve-runner
//!
//! Batch job computing curviness and elevation features for every road of a
//! road table.
//!
//! A run loads the DEM tiles of the configured rectangle once, reads the
//! roads, extracts features on a rayon pool and writes one feature row per
//! road. Projected road coordinates are taken to be Web Mercator
//! (EPSG:3857).

mod batch;
mod cli;
mod config;
mod error;
mod signal;

pub use batch::{extract_all, run_batch, BatchSummary, Extraction};
pub use cli::{Cli, OrientationArg};
pub use config::RunnerConfig;
pub use error::RunnerError;
pub use signal::install_abort_handler;

use roadcurve_dem::ElevationSurface;
use roadcurve_features::{RoadFeatureExtractor, WebMercator};
use roadcurve_store::CsvRoadStore;
use std::sync::atomic::AtomicBool;
use tracing::info;

/// Result type for runner operations.
pub type Result<T> = std::result::Result<T, RunnerError>;

/// Run a full batch as described by `config`.
pub fn run(config: &RunnerConfig, abort: &AtomicBool) -> Result<BatchSummary> {
    config.validate()?;

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(config.threads)
        .build()?;

    pool.install(|| {
        info!(
            "Loading DEM tiles from {} (lat {}..={}, lon {}..={})",
            config.dem_dir.display(),
            config.lat_from,
            config.lat_to,
            config.lon_from,
            config.lon_to
        );
        let surface = ElevationSurface::build(
            &config.dem_dir,
            config.coverage()?,
            &config.surface_options(),
        )?;

        let extractor = RoadFeatureExtractor::new(&surface, WebMercator, config.analyzer()?);
        let mut store = CsvRoadStore::new(&config.input, &config.output)?;
        run_batch(&mut store, &extractor, abort)
    })
}
