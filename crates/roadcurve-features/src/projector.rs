//! Projected-CRS to geographic coordinate conversion.

/// A geographic coordinate in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    /// Latitude (positive = north).
    pub lat: f64,
    /// Longitude (positive = east).
    pub lon: f64,
}

/// Maps a projected `(x, y)` pair to a geographic coordinate.
///
/// Implementations must be pure: the extractor may call them from many
/// threads at once.
pub trait Projector: Send + Sync {
    /// Convert a projected coordinate to latitude/longitude.
    fn project(&self, x: f64, y: f64) -> GeoPoint;
}

impl<F> Projector for F
where
    F: Fn(f64, f64) -> GeoPoint + Send + Sync,
{
    fn project(&self, x: f64, y: f64) -> GeoPoint {
        self(x, y)
    }
}

/// Inverse spherical Web Mercator (EPSG:3857 to EPSG:4326).
#[derive(Debug, Clone, Copy, Default)]
pub struct WebMercator;

impl WebMercator {
    /// Radius of the Web Mercator sphere in meters.
    pub const EARTH_RADIUS_M: f64 = 6_378_137.0;
}

impl Projector for WebMercator {
    fn project(&self, x: f64, y: f64) -> GeoPoint {
        let lon = (x / Self::EARTH_RADIUS_M).to_degrees();
        let t = (y / Self::EARTH_RADIUS_M).exp();
        let lat = (2.0 * t.atan() - std::f64::consts::FRAC_PI_2).to_degrees();
        GeoPoint { lat, lon }
    }
}
