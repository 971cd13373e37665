//! Per-road feature extraction over the whole road table.

use crate::Result;
use rayon::prelude::*;
use roadcurve_features::{Projector, RoadFeatureExtractor, RoadFeatureRecord, RoadRecord};
use roadcurve_store::RoadStore;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Instant;
use tracing::{info, warn};

/// Counts from one batch run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    /// Rows read from the store, including skipped ones.
    pub roads_read: usize,
    /// Roads whose features were computed and saved.
    pub processed: usize,
    /// Rows dropped for bad geometry or a failed extraction.
    pub skipped: usize,
    /// Whether the run stopped early on an abort request.
    pub aborted: bool,
}

/// Roads extracted so far plus how the loop ended.
#[derive(Debug, Default)]
pub struct Extraction {
    /// Features of finished roads, in input order.
    pub records: Vec<RoadFeatureRecord>,
    /// Roads whose extraction returned an error.
    pub failed: usize,
    /// Whether the abort flag stopped the loop.
    pub aborted: bool,
}

/// Extract features of every road on the current rayon pool.
///
/// `abort` is checked before each road is started. Roads that already
/// finished are kept when it is set; roads not yet started are dropped.
/// Output order follows input order.
pub fn extract_all<P: Projector>(
    extractor: &RoadFeatureExtractor<'_, P>,
    roads: &[RoadRecord],
    abort: &AtomicBool,
) -> Extraction {
    let total = roads.len();
    let done = AtomicUsize::new(0);
    let last_report = AtomicUsize::new(0);
    let report_interval = std::cmp::max(1000, total / 20);
    let start = Instant::now();

    let outcomes: Vec<Option<std::result::Result<RoadFeatureRecord, _>>> = roads
        .par_iter()
        .map(|road| {
            if abort.load(Ordering::SeqCst) {
                return None;
            }
            let outcome = extractor.extract(road);
            if let Err(err) = &outcome {
                warn!("Skipping road {}: {}", road.id, err);
            }

            let current = done.fetch_add(1, Ordering::Relaxed) + 1;
            let last = last_report.load(Ordering::Relaxed);
            if current >= last + report_interval
                && last_report
                    .compare_exchange(last, current, Ordering::Relaxed, Ordering::Relaxed)
                    .is_ok()
            {
                let elapsed = start.elapsed().as_secs_f64();
                info!(
                    "[{:>8}/{:>8}] {:.1}% complete, {:.0} roads/s",
                    current,
                    total,
                    current as f64 / total as f64 * 100.0,
                    if elapsed > 0.0 { current as f64 / elapsed } else { 0.0 }
                );
            }

            Some(outcome)
        })
        .collect();

    let mut extraction = Extraction {
        records: Vec::with_capacity(total),
        ..Extraction::default()
    };
    for outcome in outcomes {
        match outcome {
            Some(Ok(record)) => extraction.records.push(record),
            Some(Err(_)) => extraction.failed += 1,
            None => extraction.aborted = true,
        }
    }
    extraction
}

/// Load roads from `store`, extract their features and save the results.
///
/// On abort the features of completed roads are still saved.
pub fn run_batch<S: RoadStore, P: Projector>(
    store: &mut S,
    extractor: &RoadFeatureExtractor<'_, P>,
    abort: &AtomicBool,
) -> Result<BatchSummary> {
    let roads = store.load_roads()?;
    let bad_rows = store.skipped_rows();
    info!(
        "Extracting features of {} roads using {} threads",
        roads.len(),
        rayon::current_num_threads()
    );

    let start = Instant::now();
    let extraction = extract_all(extractor, &roads, abort);
    if extraction.aborted {
        warn!(
            "Aborted after {} of {} roads, saving completed results",
            extraction.records.len() + extraction.failed,
            roads.len()
        );
    }

    store.save_features(&extraction.records)?;

    let summary = BatchSummary {
        roads_read: roads.len() + bad_rows,
        processed: extraction.records.len(),
        skipped: bad_rows + extraction.failed,
        aborted: extraction.aborted,
    };
    info!(
        "Done in {:.1}s: {} processed, {} skipped{}",
        start.elapsed().as_secs_f64(),
        summary.processed,
        summary.skipped,
        if summary.aborted { " (aborted)" } else { "" }
    );
    Ok(summary)
}
