//! Per-road feature extraction.

use crate::{CurvinessAnalyzer, Projector, Result, RoadFeatureRecord, RoadRecord};
use roadcurve_dem::ElevationSurface;
use roadcurve_geom::{Coord, Polyline};
use tracing::trace;

/// Computes a [`RoadFeatureRecord`] for each road.
///
/// Holds only shared references and immutable configuration, so a single
/// extractor can serve many worker threads.
#[derive(Debug)]
pub struct RoadFeatureExtractor<'a, P> {
    surface: &'a ElevationSurface,
    projector: P,
    analyzer: CurvinessAnalyzer,
}

impl<'a, P: Projector> RoadFeatureExtractor<'a, P> {
    /// Create an extractor over a loaded elevation surface.
    pub fn new(surface: &'a ElevationSurface, projector: P, analyzer: CurvinessAnalyzer) -> Self {
        Self {
            surface,
            projector,
            analyzer,
        }
    }

    /// Compute all features of one road.
    pub fn extract(&self, road: &RoadRecord) -> Result<RoadFeatureRecord> {
        let polyline = &road.polyline;
        let total_curviness = self.analyzer.curviness(polyline);
        let buckets = self.analyzer.buckets(polyline)?;
        let elevation_delta = self.elevation_delta(polyline);

        trace!(
            id = road.id,
            total_curviness,
            elevation_delta,
            segments = buckets.total(),
            "extracted road features"
        );

        Ok(RoadFeatureRecord {
            id: road.id,
            total_curviness,
            buckets,
            total_length: polyline.length(),
            elevation_delta,
        })
    }

    /// Elevation at the last coordinate minus elevation at the first.
    ///
    /// Positive when the road climbs in its stored direction. Ends outside
    /// the surface's coverage contribute the default elevation (0).
    pub fn elevation_delta(&self, polyline: &Polyline) -> f64 {
        self.elevation_of(polyline.end()) - self.elevation_of(polyline.start())
    }

    fn elevation_of(&self, coord: Coord<f64>) -> f64 {
        let geo = self.projector.project(coord.x, coord.y);
        self.surface.elevation_at(geo.lat, geo.lon)
    }

    /// Curviness analyzer in use.
    pub fn analyzer(&self) -> &CurvinessAnalyzer {
        &self.analyzer
    }
}
