//! Error types for the DEM crate.

use std::path::PathBuf;
use thiserror::Error;

/// Reasons a single raster tile could not be turned into a [`RasterTile`](crate::RasterTile).
#[derive(Debug, Error)]
pub enum TileLoadError {
    /// I/O error reading a file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// TIFF decoding error.
    #[error("TIFF decode error: {0}")]
    TiffDecode(#[from] tiff::TiffError),

    /// Invalid GeoTIFF - missing or malformed georeferencing tags.
    #[error("Invalid GeoTIFF: {0}")]
    InvalidGeoTiff(String),

    /// The grid is too small to fit a cubic interpolant.
    #[error("Degenerate raster extent {rows}x{cols} (at least 2x2 samples required)")]
    DegenerateExtent {
        /// Number of rows in the grid.
        rows: usize,
        /// Number of columns in the grid.
        cols: usize,
    },

    /// The sample buffer does not match the declared grid shape.
    #[error("Grid holds {actual} samples, expected {rows}x{cols}")]
    ShapeMismatch {
        /// Declared number of rows.
        rows: usize,
        /// Declared number of columns.
        cols: usize,
        /// Number of samples actually supplied.
        actual: usize,
    },
}

/// Errors that can occur when building or querying an elevation surface.
#[derive(Debug, Error)]
pub enum DemError {
    /// A tile file could not be loaded.
    #[error("Failed to load tile {}: {source}", path.display())]
    TileLoad {
        /// Path of the offending tile.
        path: PathBuf,
        /// Underlying failure.
        #[source]
        source: TileLoadError,
    },

    /// A tile required by the coverage rectangle was not supplied.
    #[error("No tile supplied for cell lat={lat} lon={lon}")]
    MissingTile {
        /// South edge of the missing cell.
        lat: i32,
        /// West edge of the missing cell.
        lon: i32,
    },

    /// One or more tiles in the coverage rectangle failed to load.
    #[error("Surface build failed: {} of {expected} tiles unavailable", failures.len())]
    SurfaceBuild {
        /// Number of tiles the coverage rectangle requires.
        expected: usize,
        /// Every individual tile failure.
        failures: Vec<DemError>,
    },

    /// The coverage rectangle is empty or inverted.
    #[error("Invalid coverage: {0}")]
    InvalidCoverage(String),
}
