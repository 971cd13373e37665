//! Road input and feature output records.

use crate::CurvinessBuckets;
use roadcurve_geom::Polyline;

/// Descriptive road attributes carried through extraction untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoadAttributes {
    /// OSM `highway` class.
    pub highway: Option<String>,
    /// OSM `oneway` flag.
    pub oneway: Option<String>,
    /// OSM `bridge` tag.
    pub bridge: Option<String>,
    /// Bicycle access.
    pub bicycle: Option<String>,
    /// Motorcar access.
    pub motorcar: Option<String>,
    /// Public transport flag.
    pub public_transport: Option<String>,
    /// Surface type.
    pub surface: Option<String>,
    /// OSM `tunnel` tag.
    pub tunnel: Option<String>,
    /// Road name.
    pub name: Option<String>,
}

/// A road centerline as supplied by the road store.
///
/// The geometry is parsed into a [`Polyline`] when the record is created, so
/// every record that exists has valid geometry.
#[derive(Debug, Clone, PartialEq)]
pub struct RoadRecord {
    /// Stable identifier (OSM id).
    pub id: i64,
    /// Passthrough attributes.
    pub attributes: RoadAttributes,
    /// Centerline in the store's projected CRS.
    pub polyline: Polyline,
}

impl RoadRecord {
    /// Create a record with empty attributes.
    pub fn new(id: i64, polyline: Polyline) -> Self {
        Self {
            id,
            attributes: RoadAttributes::default(),
            polyline,
        }
    }
}

/// Features computed for one road.
#[derive(Debug, Clone, PartialEq)]
pub struct RoadFeatureRecord {
    /// Identifier of the source road.
    pub id: i64,
    /// Whole-road curviness (dimensionless).
    pub total_curviness: f64,
    /// Segment counts per curviness bucket.
    pub buckets: CurvinessBuckets,
    /// Road length in the projected CRS unit.
    pub total_length: f64,
    /// Elevation at the end minus elevation at the start, in DEM units.
    pub elevation_delta: f64,
}
