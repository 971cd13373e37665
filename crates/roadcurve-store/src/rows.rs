//! Flat row shapes for the road table and the feature table.

use crate::{Result, StoreError};
use roadcurve_features::{RoadAttributes, RoadFeatureRecord, RoadRecord};
use roadcurve_geom::Polyline;
use serde::{Deserialize, Serialize};

/// One row of the road table.
///
/// Empty attribute cells deserialize to `None`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct RoadRow {
    /// OpenStreetMap way id.
    pub osm_id: i64,
    pub highway: Option<String>,
    pub oneway: Option<String>,
    pub bridge: Option<String>,
    pub bicycle: Option<String>,
    pub motorcar: Option<String>,
    pub public_transport: Option<String>,
    pub surface: Option<String>,
    pub tunnel: Option<String>,
    pub name: Option<String>,
    /// WKT `LINESTRING` in the projected CRS.
    pub geometry: String,
}

impl RoadRow {
    /// Parse the geometry and build the road record.
    pub fn into_record(self) -> Result<RoadRecord> {
        let polyline = Polyline::from_wkt(&self.geometry).map_err(|source| StoreError::Geometry {
            id: self.osm_id,
            source,
        })?;
        Ok(RoadRecord {
            id: self.osm_id,
            attributes: RoadAttributes {
                highway: self.highway,
                oneway: self.oneway,
                bridge: self.bridge,
                bicycle: self.bicycle,
                motorcar: self.motorcar,
                public_transport: self.public_transport,
                surface: self.surface,
                tunnel: self.tunnel,
                name: self.name,
            },
            polyline,
        })
    }
}

/// One row of the feature table.
///
/// `c_a` through `c_f` are the segment counts of the six curviness buckets,
/// lowest curviness first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureRow {
    /// OpenStreetMap way id.
    pub osm_id: i64,
    /// Whole-road curviness, 0 for a straight road.
    pub total_curviness: f64,
    pub c_a: u32,
    pub c_b: u32,
    pub c_c: u32,
    pub c_d: u32,
    pub c_e: u32,
    pub c_f: u32,
    /// Road length in projected units.
    pub length: f64,
    /// Elevation at the end minus elevation at the start, in meters.
    pub total_elevation: f64,
}

impl From<&RoadFeatureRecord> for FeatureRow {
    fn from(record: &RoadFeatureRecord) -> Self {
        let [c_a, c_b, c_c, c_d, c_e, c_f] = record.buckets.counts();
        Self {
            osm_id: record.id,
            total_curviness: record.total_curviness,
            c_a,
            c_b,
            c_c,
            c_d,
            c_e,
            c_f,
            length: record.total_length,
            total_elevation: record.elevation_delta,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use roadcurve_features::CurvinessBuckets;
    use roadcurve_geom::GeometryError;

    fn row(geometry: &str) -> RoadRow {
        RoadRow {
            osm_id: 42,
            highway: Some("residential".to_string()),
            oneway: None,
            bridge: None,
            bicycle: Some("yes".to_string()),
            motorcar: None,
            public_transport: None,
            surface: Some("asphalt".to_string()),
            tunnel: None,
            name: Some("Hauptstraße".to_string()),
            geometry: geometry.to_string(),
        }
    }

    #[test]
    fn test_row_into_record() {
        let record = row("LINESTRING(0 0, 3 4)").into_record().expect("valid row");
        assert_eq!(record.id, 42);
        assert_eq!(record.attributes.highway.as_deref(), Some("residential"));
        assert_eq!(record.attributes.name.as_deref(), Some("Hauptstraße"));
        assert_eq!(record.attributes.tunnel, None);
        assert_eq!(record.polyline.length(), 5.0);
    }

    #[test]
    fn test_row_with_bad_geometry() {
        match row("LINESTRING(0 0)").into_record() {
            Err(StoreError::Geometry { id, source }) => {
                assert_eq!(id, 42);
                assert_eq!(source, GeometryError::TooFewPoints(1));
            }
            other => panic!("expected geometry error, got {:?}", other),
        }
    }

    #[test]
    fn test_feature_row_from_record() {
        let record = RoadFeatureRecord {
            id: 7,
            total_curviness: 0.25,
            buckets: CurvinessBuckets::from_counts([1, 2, 3, 4, 5, 6]),
            total_length: 812.5,
            elevation_delta: -12.0,
        };
        let row = FeatureRow::from(&record);
        assert_eq!(row.osm_id, 7);
        assert_eq!((row.c_a, row.c_c, row.c_f), (1, 3, 6));
        assert_eq!(row.length, 812.5);
        assert_eq!(row.total_elevation, -12.0);
    }
}
