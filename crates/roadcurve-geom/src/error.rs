//! Error types for the geometry crate.

use thiserror::Error;

/// Errors that can occur when building or querying geometry.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeometryError {
    /// A polyline needs at least two coordinates.
    #[error("Polyline needs at least 2 points, got {0}")]
    TooFewPoints(usize),

    /// A coordinate is NaN or infinite.
    #[error("Non-finite coordinate at index {0}")]
    NonFiniteCoordinate(usize),

    /// Geometry text is not a well-known-text linestring.
    #[error("Invalid WKT: {0}")]
    InvalidWkt(String),

    /// Arc length query outside `[0, length]`.
    #[error("Arc length {arc_length} is outside [0, {length}]")]
    OutOfRange {
        /// Requested arc length.
        arc_length: f64,
        /// Length of the polyline.
        length: f64,
    },
}
