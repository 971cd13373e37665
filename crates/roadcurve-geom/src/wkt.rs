//! Minimal well-known-text reader for `LINESTRING` geometries.

use crate::{GeometryError, Result};
use geo::Coord;

/// Parse a WKT (or PostGIS EWKT) `LINESTRING` into its coordinates.
///
/// Accepts an optional `SRID=...;` prefix and `Z`/`M`/`ZM` tags; only the
/// first two ordinates of each position are kept.
///
/// ```
/// let coords = roadcurve_geom::parse_linestring("SRID=3857;LINESTRING Z (1 2 3, 4 5 6)")?;
/// assert_eq!(coords.len(), 2);
/// assert_eq!(coords[1].x, 4.0);
/// # Ok::<(), roadcurve_geom::GeometryError>(())
/// ```
pub fn parse_linestring(text: &str) -> Result<Vec<Coord<f64>>> {
    let mut body = text.trim();
    if strip_prefix_ignore_case(body, "SRID=").is_some() {
        body = body
            .split_once(';')
            .map(|(_, rest)| rest.trim_start())
            .ok_or_else(|| GeometryError::InvalidWkt(format!("unterminated SRID prefix: {}", text)))?;
    }

    let mut rest = strip_prefix_ignore_case(body, "LINESTRING")
        .ok_or_else(|| GeometryError::InvalidWkt(format!("expected LINESTRING: {}", text)))?
        .trim_start();

    // Dimension tags.
    for tag in ["ZM", "Z", "M"] {
        if let Some(stripped) = strip_prefix_ignore_case(rest, tag) {
            rest = stripped.trim_start();
            break;
        }
    }

    if rest.eq_ignore_ascii_case("EMPTY") {
        return Ok(Vec::new());
    }

    let inner = rest
        .strip_prefix('(')
        .and_then(|s| s.trim_end().strip_suffix(')'))
        .ok_or_else(|| GeometryError::InvalidWkt(format!("unbalanced parentheses: {}", text)))?;

    inner.split(',').map(parse_position).collect()
}

fn strip_prefix_ignore_case<'a>(s: &'a str, prefix: &str) -> Option<&'a str> {
    let head = s.get(..prefix.len())?;
    head.eq_ignore_ascii_case(prefix).then(|| &s[prefix.len()..])
}

fn parse_position(position: &str) -> Result<Coord<f64>> {
    let mut ordinates = position.split_whitespace().map(|v| {
        v.parse::<f64>()
            .map_err(|_| GeometryError::InvalidWkt(format!("bad ordinate '{}'", v)))
    });

    match (ordinates.next(), ordinates.next()) {
        (Some(x), Some(y)) => Ok(Coord { x: x?, y: y? }),
        _ => Err(GeometryError::InvalidWkt(format!(
            "position needs at least two ordinates: '{}'",
            position.trim()
        ))),
    }
}
