//! Error types for road stores.

use roadcurve_geom::GeometryError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while reading roads or writing features.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Opening or writing a file failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The road table or CSV output is malformed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A feature row could not be serialized as JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A road's geometry text could not be turned into a polyline.
    #[error("Road {id}: {source}")]
    Geometry {
        /// `osm_id` of the offending row.
        id: i64,
        /// Why the geometry was rejected.
        #[source]
        source: GeometryError,
    },

    /// Output path has neither a `.csv` nor a `.jsonl` extension.
    #[error("Unsupported output format: {0}")]
    UnsupportedFormat(PathBuf),
}
