//! Whole-road and per-segment curviness.

use crate::{FeatureError, Result};
use roadcurve_geom::{Coord, Polyline};

/// Default segment length in projected CRS units.
pub const DEFAULT_SEGMENT_SIZE: f64 = 100.0;

/// Number of curviness buckets.
pub const BUCKET_COUNT: usize = 6;

/// Exclusive upper bound of each curviness bucket, in order.
pub const BUCKET_UPPER_BOUNDS: [f64; BUCKET_COUNT] = [0.1, 0.2, 0.3, 0.5, 0.75, f64::INFINITY];

/// Segment counts per curviness bucket.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CurvinessBuckets([u32; BUCKET_COUNT]);

impl CurvinessBuckets {
    /// Wrap raw bucket counts.
    pub fn from_counts(counts: [u32; BUCKET_COUNT]) -> Self {
        Self(counts)
    }

    /// Count curviness values per bucket.
    pub fn classify(values: &[f64]) -> Self {
        let mut counts = [0u32; BUCKET_COUNT];
        for &value in values {
            counts[Self::bucket_index(value)] += 1;
        }
        Self(counts)
    }

    /// Index of the first bucket whose upper bound `value` is strictly below.
    ///
    /// Values that fit no finite bound (including infinity and NaN) land in the last bucket.
    pub fn bucket_index(value: f64) -> usize {
        BUCKET_UPPER_BOUNDS
            .iter()
            .position(|&bound| value < bound)
            .unwrap_or(BUCKET_COUNT - 1)
    }

    /// Counts in bucket order.
    pub fn counts(&self) -> [u32; BUCKET_COUNT] {
        self.0
    }

    /// Total number of classified segments.
    pub fn total(&self) -> u32 {
        self.0.iter().sum()
    }
}

/// Computes curviness ratios for a polyline.
///
/// Curviness is `path_length / straight_distance - 1`: 0 for a straight path,
/// growing as the path winds.
#[derive(Debug, Clone, Copy)]
pub struct CurvinessAnalyzer {
    segment_size: f64,
}

impl Default for CurvinessAnalyzer {
    fn default() -> Self {
        Self {
            segment_size: DEFAULT_SEGMENT_SIZE,
        }
    }
}

impl CurvinessAnalyzer {
    /// Create an analyzer with the given segment length.
    pub fn new(segment_size: f64) -> Result<Self> {
        if !segment_size.is_finite() || segment_size <= 0.0 {
            return Err(FeatureError::InvalidSegmentSize(segment_size));
        }
        Ok(Self { segment_size })
    }

    /// Segment length used by [`segment_curviness`](Self::segment_curviness).
    pub fn segment_size(&self) -> f64 {
        self.segment_size
    }

    /// Whole-road curviness.
    ///
    /// Returns 0 when the first and last coordinate coincide (closed loops,
    /// degenerate roads).
    pub fn curviness(&self, polyline: &Polyline) -> f64 {
        let straight = polyline.straight_line_length();
        if straight == 0.0 {
            return 0.0;
        }
        polyline.length() / straight - 1.0
    }

    /// Curviness of each consecutive `segment_size` window along the road.
    ///
    /// Each window keeps the original vertices whose projected arc length
    /// falls inside it (inclusive), framed by the interpolated window ends.
    /// A trailing remainder shorter than `segment_size` is not analyzed.
    pub fn segment_curviness(&self, polyline: &Polyline) -> Result<Vec<f64>> {
        let length = polyline.length();
        let vertex_positions: Vec<(f64, Coord<f64>)> = polyline
            .coords()
            .iter()
            .map(|&c| (polyline.project(c), c))
            .collect();

        let mut values = Vec::new();
        for k in 0u64.. {
            let from = k as f64 * self.segment_size;
            let to = from + self.segment_size;
            if to > length {
                break;
            }

            let start = polyline.point_at(from)?;
            let end = polyline.point_at(to)?;

            let mut window = Vec::with_capacity(vertex_positions.len() + 2);
            window.push(start);
            window.extend(
                vertex_positions
                    .iter()
                    .filter(|(arc, _)| (from..=to).contains(arc))
                    .map(|&(_, c)| c),
            );
            window.push(end);

            let sub = Polyline::new(window)?;
            values.push(ratio(sub.length(), sub.straight_line_length()));
        }
        Ok(values)
    }

    /// Bucket counts of the segment curviness list.
    pub fn buckets(&self, polyline: &Polyline) -> Result<CurvinessBuckets> {
        Ok(CurvinessBuckets::classify(&self.segment_curviness(polyline)?))
    }
}

/// Segment curviness; a window whose ends coincide is maximally curvy.
fn ratio(path_length: f64, straight: f64) -> f64 {
    if straight == 0.0 {
        return f64::INFINITY;
    }
    path_length / straight - 1.0
}
