//! # roadcurve-geom
//!
//! Geometry value types for road centerlines.
//!
//! A [`Polyline`] is an ordered, immutable sequence of projected `(x, y)`
//! coordinates. Its length, per-vertex arc lengths and bounding box are
//! computed once at construction. Positions along the line are addressed by
//! arc length: [`Polyline::point_at`] maps an arc length to a coordinate and
//! [`Polyline::project`] maps a coordinate back to the nearest arc length.
//!
//! ```
//! use roadcurve_geom::Polyline;
//!
//! let line: Polyline = "LINESTRING (0 0, 100 0, 100 100)".parse()?;
//! assert_eq!(line.length(), 200.0);
//! assert_eq!(line.point_at(150.0)?.y, 50.0);
//! # Ok::<(), roadcurve_geom::GeometryError>(())
//! ```

mod error;
mod polyline;
mod wkt;

pub use error::GeometryError;
pub use geo::{Coord, Rect};
pub use polyline::Polyline;
pub use wkt::parse_linestring;

/// Result type for geometry operations.
pub type Result<T> = std::result::Result<T, GeometryError>;
