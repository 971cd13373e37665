//! # roadcurve-features
//!
//! Road shape features: curviness and elevation change.
//!
//! ## Features
//!
//! - **Whole-road curviness**: path length over straight-line distance, minus 1
//! - **Segment curviness**: the same ratio over consecutive fixed-length windows,
//!   counted into six [`CurvinessBuckets`]
//! - **Elevation delta**: DEM elevation at the road's end minus its start, read
//!   from an [`ElevationSurface`](roadcurve_dem::ElevationSurface) after mapping
//!   the projected endpoints through a [`Projector`]

mod curviness;
mod error;
mod extractor;
mod projector;
mod record;

pub use curviness::{
    CurvinessAnalyzer, CurvinessBuckets, BUCKET_COUNT, BUCKET_UPPER_BOUNDS, DEFAULT_SEGMENT_SIZE,
};
pub use error::FeatureError;
pub use extractor::RoadFeatureExtractor;
pub use projector::{GeoPoint, Projector, WebMercator};
pub use record::{RoadAttributes, RoadFeatureRecord, RoadRecord};

/// Result type for feature extraction.
pub type Result<T> = std::result::Result<T, FeatureError>;
