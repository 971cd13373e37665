//! Error types for feature extraction.

use roadcurve_geom::GeometryError;
use thiserror::Error;

/// Errors that can occur while computing road features.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FeatureError {
    /// Geometry construction or an arc-length query failed.
    #[error("Geometry error: {0}")]
    Geometry(#[from] GeometryError),

    /// Segment size must be a positive, finite length.
    #[error("Invalid segment size {0} (must be positive and finite)")]
    InvalidSegmentSize(f64),
}
