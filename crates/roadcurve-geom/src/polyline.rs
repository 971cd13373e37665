//! Arc-length parameterized polyline.

use crate::{GeometryError, Result};
use geo::{
    BoundingRect, Coord, EuclideanDistance, EuclideanLength, Line, LineInterpolatePoint,
    LineLocatePoint, LineString, Point, Rect,
};
use std::str::FromStr;

/// Ordered sequence of at least two projected coordinates.
///
/// Coordinate order defines direction. Length, cumulative arc lengths and the
/// bounding box are derived once in [`Polyline::new`] and never change.
#[derive(Debug, Clone, PartialEq)]
pub struct Polyline {
    line: LineString<f64>,
    /// Arc length from the start to each vertex; `cumulative[0] == 0`.
    cumulative: Vec<f64>,
    bbox: Rect<f64>,
}

impl Polyline {
    /// Build a polyline from an ordered coordinate sequence.
    pub fn new(coords: Vec<Coord<f64>>) -> Result<Self> {
        if coords.len() < 2 {
            return Err(GeometryError::TooFewPoints(coords.len()));
        }
        if let Some(idx) = coords.iter().position(|c| !c.x.is_finite() || !c.y.is_finite()) {
            return Err(GeometryError::NonFiniteCoordinate(idx));
        }

        let mut cumulative = Vec::with_capacity(coords.len());
        let mut total = 0.0;
        cumulative.push(total);
        for pair in coords.windows(2) {
            total += Line::new(pair[0], pair[1]).euclidean_length();
            cumulative.push(total);
        }

        let line = LineString::new(coords);
        let bbox = line
            .bounding_rect()
            .ok_or(GeometryError::TooFewPoints(0))?;

        Ok(Self {
            line,
            cumulative,
            bbox,
        })
    }

    /// Build a polyline from `(x, y)` pairs.
    pub fn from_xy(points: &[(f64, f64)]) -> Result<Self> {
        Self::new(points.iter().map(|&(x, y)| Coord { x, y }).collect())
    }

    /// Parse a WKT `LINESTRING`.
    pub fn from_wkt(text: &str) -> Result<Self> {
        Self::new(crate::wkt::parse_linestring(text)?)
    }

    /// Total Euclidean length along all segments.
    ///
    /// Cached at construction; equal to `as_linestring().euclidean_length()`.
    pub fn length(&self) -> f64 {
        self.cumulative[self.cumulative.len() - 1]
    }

    /// Euclidean distance between the first and last coordinate.
    pub fn straight_line_length(&self) -> f64 {
        self.start().euclidean_distance(&self.end())
    }

    /// First coordinate.
    pub fn start(&self) -> Coord<f64> {
        self.line.0[0]
    }

    /// Last coordinate.
    pub fn end(&self) -> Coord<f64> {
        self.line.0[self.line.0.len() - 1]
    }

    /// All coordinates in order.
    pub fn coords(&self) -> &[Coord<f64>] {
        &self.line.0
    }

    /// Arc length at each vertex.
    pub fn vertex_arc_lengths(&self) -> &[f64] {
        &self.cumulative
    }

    /// Axis-aligned bounding box.
    pub fn bounding_box(&self) -> Rect<f64> {
        self.bbox
    }

    /// Underlying `geo` linestring.
    pub fn as_linestring(&self) -> &LineString<f64> {
        &self.line
    }

    /// Same vertices in reverse order.
    pub fn reversed(&self) -> Self {
        let mut coords = self.line.0.clone();
        coords.reverse();
        let total = self.length();
        let mut cumulative: Vec<f64> = self.cumulative.iter().map(|c| total - c).collect();
        cumulative.reverse();
        Self {
            line: LineString::new(coords),
            cumulative,
            bbox: self.bbox,
        }
    }

    /// Coordinate at `arc_length` from the start, interpolated linearly.
    ///
    /// Fails with [`GeometryError::OutOfRange`] outside `[0, length()]`.
    pub fn point_at(&self, arc_length: f64) -> Result<Coord<f64>> {
        let length = self.length();
        if !(0.0..=length).contains(&arc_length) {
            return Err(GeometryError::OutOfRange { arc_length, length });
        }
        Ok(self.interpolate(arc_length))
    }

    /// Coordinate at `arc_length`, clamped to the ends of the line.
    pub fn point_at_clamped(&self, arc_length: f64) -> Coord<f64> {
        if arc_length.is_nan() {
            return self.start();
        }
        self.interpolate(arc_length.clamp(0.0, self.length()))
    }

    /// Caller guarantees `0 <= arc_length <= length()`.
    fn interpolate(&self, arc_length: f64) -> Coord<f64> {
        let length = self.length();
        if arc_length <= 0.0 || length <= 0.0 {
            return self.start();
        }
        // geo only yields None for a NaN fraction, which the range check excludes.
        self.line
            .line_interpolate_point(arc_length / length)
            .map_or_else(|| self.end(), |p| p.0)
    }

    /// Arc length of the point on the line nearest to `point`.
    ///
    /// Ties between equally near segments resolve to the earliest one.
    /// A non-finite `point` projects to the start.
    pub fn project(&self, point: Coord<f64>) -> f64 {
        let length = self.length();
        match self.line.line_locate_point(&Point(point)) {
            Some(fraction) => (fraction * length).clamp(0.0, length),
            None => 0.0,
        }
    }
}

impl FromStr for Polyline {
    type Err = GeometryError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_wkt(s)
    }
}
