//! Single raster tile representation.

use crate::spline::BicubicSpline;
use crate::TileLoadError;
use std::io::{Read, Seek};
use std::path::Path;
use tiff::decoder::{Decoder, DecodingResult, Limits};
use tiff::tags::Tag;
use tracing::debug;

/// Integer key of a 1x1 degree cell, named by its south-west corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TileKey {
    /// Latitude of the south edge in whole degrees.
    pub lat: i32,
    /// Longitude of the west edge in whole degrees.
    pub lon: i32,
}

impl TileKey {
    /// Create a key from whole-degree coordinates.
    pub fn new(lat: i32, lon: i32) -> Self {
        Self { lat, lon }
    }

    /// Key of the cell containing a geographic coordinate.
    pub fn containing(lat: f64, lon: f64) -> Self {
        Self {
            lat: lat.floor() as i32,
            lon: lon.floor() as i32,
        }
    }
}

/// Affine georeferencing of a raster, in rasterio coefficient order.
///
/// `x = a * col + b * row + c`, `y = d * col + e * row + f`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoTransform {
    /// Pixel width.
    pub a: f64,
    /// Row rotation.
    pub b: f64,
    /// X of the upper-left corner.
    pub c: f64,
    /// Column rotation.
    pub d: f64,
    /// Pixel height (negative for north-up rasters).
    pub e: f64,
    /// Y of the upper-left corner.
    pub f: f64,
}

impl GeoTransform {
    /// North-up transform covering exactly the 1x1 degree cell of `key`.
    pub fn for_cell(key: TileKey, rows: usize, cols: usize) -> Self {
        Self {
            a: 1.0 / cols as f64,
            b: 0.0,
            c: key.lon as f64,
            d: 0.0,
            e: -1.0 / rows as f64,
            f: key.lat as f64 + 1.0,
        }
    }

    /// Build a transform from a GeoTIFF tiepoint and pixel scale.
    fn from_tiepoint(tiepoint: &[f64], scale: &[f64]) -> Self {
        // Tiepoint format: [i, j, k, x, y, z] ties pixel (i, j) to model (x, y).
        let (i, j) = (tiepoint[0], tiepoint[1]);
        let (x, y) = (tiepoint[3], tiepoint[4]);
        Self {
            a: scale[0],
            b: 0.0,
            c: x - i * scale[0],
            d: 0.0,
            e: -scale[1],
            f: y + j * scale[1],
        }
    }

    /// Build a transform from a 4x4 ModelTransformation matrix.
    fn from_matrix(m: &[f64]) -> Self {
        Self {
            a: m[0],
            b: m[1],
            c: m[3],
            d: m[4],
            e: m[5],
            f: m[7],
        }
    }
}

/// Geographic bounds of a tile.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TileBounds {
    /// West edge.
    pub left: f64,
    /// East edge.
    pub right: f64,
    /// North edge.
    pub top: f64,
    /// South edge.
    pub bottom: f64,
}

impl TileBounds {
    /// Derive the bounds from an affine transform and grid shape.
    pub fn from_transform(transform: &GeoTransform, rows: usize, cols: usize) -> Self {
        let left = transform.c;
        let top = transform.f;
        Self {
            left,
            right: left + cols as f64 * transform.a,
            top,
            bottom: top + rows as f64 * transform.e,
        }
    }
}

/// Fractional position inside a raster grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridPosition {
    /// Fractional row index.
    pub row: f64,
    /// Fractional column index.
    pub col: f64,
}

/// How a fractional offset inside a 1x1 degree cell maps onto grid indices.
///
/// `Transposed` is the convention the road feature pipeline has always used
/// and stays the default so stored feature values remain comparable. Rasters
/// whose affine transform shows a plain north-up row-major layout can be read
/// with `NorthUp` instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum TileOrientation {
    /// Longitude drives the row axis, latitude the inverted column axis:
    /// `row = rows * dlon`, `col = cols - cols * dlat`.
    #[default]
    Transposed,
    /// Latitude drives the inverted row axis, longitude the column axis:
    /// `row = rows - rows * dlat`, `col = cols * dlon`.
    NorthUp,
}

impl TileOrientation {
    /// Map offsets `dlat`, `dlon` (each in `[0, 1)` inside the cell) to a grid position.
    pub fn grid_position(self, dlat: f64, dlon: f64, rows: usize, cols: usize) -> GridPosition {
        let (rows, cols) = (rows as f64, cols as f64);
        match self {
            TileOrientation::Transposed => GridPosition {
                row: rows * dlon,
                col: cols - cols * dlat,
            },
            TileOrientation::NorthUp => GridPosition {
                row: rows - rows * dlat,
                col: cols * dlon,
            },
        }
    }
}

/// A single 1x1 degree elevation tile with a fitted bicubic interpolant.
#[derive(Debug)]
pub struct RasterTile {
    key: TileKey,
    /// Elevation samples in row-major order.
    samples: Vec<f32>,
    rows: usize,
    cols: usize,
    transform: GeoTransform,
    /// Derived once from `transform` at construction.
    bounds: TileBounds,
    orientation: TileOrientation,
    spline: BicubicSpline,
}

impl RasterTile {
    /// Build a tile from an in-memory row-major grid.
    pub fn from_grid(
        key: TileKey,
        samples: Vec<f32>,
        rows: usize,
        cols: usize,
        transform: GeoTransform,
        orientation: TileOrientation,
    ) -> Result<Self, TileLoadError> {
        if rows < 2 || cols < 2 {
            return Err(TileLoadError::DegenerateExtent { rows, cols });
        }
        if samples.len() != rows * cols {
            return Err(TileLoadError::ShapeMismatch {
                rows,
                cols,
                actual: samples.len(),
            });
        }

        let spline = BicubicSpline::fit(&samples, rows, cols);
        let bounds = TileBounds::from_transform(&transform, rows, cols);

        Ok(Self {
            key,
            samples,
            rows,
            cols,
            transform,
            bounds,
            orientation,
            spline,
        })
    }

    /// Load a tile from a single-band GeoTIFF file.
    pub fn load<P: AsRef<Path>>(
        path: P,
        key: TileKey,
        orientation: TileOrientation,
    ) -> Result<Self, TileLoadError> {
        let path = path.as_ref();
        let file = std::fs::File::open(path)?;
        let tile = Self::from_reader(file, key, orientation)?;
        debug!(
            path = %path.display(),
            lat = key.lat,
            lon = key.lon,
            rows = tile.rows,
            cols = tile.cols,
            "loaded elevation tile"
        );
        Ok(tile)
    }

    /// Load a tile from any seekable GeoTIFF byte source.
    pub fn from_reader<R: Read + Seek>(
        reader: R,
        key: TileKey,
        orientation: TileOrientation,
    ) -> Result<Self, TileLoadError> {
        let mut decoder = Decoder::new(reader)?;

        // 1 arc-second tiles are 3601 x 3601 f32 samples, well past the default limits.
        let mut limits = Limits::default();
        limits.decoding_buffer_size = 1024 * 1024 * 1024;
        limits.intermediate_buffer_size = 1024 * 1024 * 1024;
        limits.ifd_value_size = 1024 * 1024 * 1024;
        decoder = decoder.with_limits(limits);

        let (width, height) = decoder.dimensions()?;
        let (rows, cols) = (height as usize, width as usize);
        if rows == 0 || cols == 0 {
            return Err(TileLoadError::DegenerateExtent { rows, cols });
        }

        let transform = Self::read_geotransform(&mut decoder)?;
        let samples = Self::decode_elevation_data(&mut decoder)?;
        if samples.len() != rows * cols {
            return Err(TileLoadError::InvalidGeoTiff(format!(
                "expected a single elevation band of {}x{} samples, found {}",
                rows,
                cols,
                samples.len()
            )));
        }

        Self::from_grid(key, samples, rows, cols, transform, orientation)
    }

    /// Read the affine georeferencing from GeoTIFF tags.
    fn read_geotransform<R: Read + Seek>(
        decoder: &mut Decoder<R>,
    ) -> Result<GeoTransform, TileLoadError> {
        if let Ok(matrix) = decoder.get_tag_f64_vec(Tag::ModelTransformationTag) {
            if matrix.len() >= 16 {
                return Ok(GeoTransform::from_matrix(&matrix));
            }
        }

        let tiepoint = decoder.get_tag_f64_vec(Tag::ModelTiepointTag);
        let pixel_scale = decoder.get_tag_f64_vec(Tag::ModelPixelScaleTag);
        match (tiepoint, pixel_scale) {
            (Ok(tiepoint), Ok(scale)) if tiepoint.len() >= 6 && scale.len() >= 2 => {
                Ok(GeoTransform::from_tiepoint(&tiepoint, &scale))
            }
            _ => Err(TileLoadError::InvalidGeoTiff(
                "missing ModelTiepoint/ModelPixelScale or ModelTransformation tags".to_string(),
            )),
        }
    }

    /// Decode elevation data from the TIFF decoder.
    fn decode_elevation_data<R: Read + Seek>(
        decoder: &mut Decoder<R>,
    ) -> Result<Vec<f32>, TileLoadError> {
        let samples = match decoder.read_image()? {
            DecodingResult::F32(data) => data,
            DecodingResult::F64(data) => data.into_iter().map(|v| v as f32).collect(),
            DecodingResult::I16(data) => data.into_iter().map(|v| v as f32).collect(),
            DecodingResult::I32(data) => data.into_iter().map(|v| v as f32).collect(),
            DecodingResult::U16(data) => data.into_iter().map(|v| v as f32).collect(),
            DecodingResult::U32(data) => data.into_iter().map(|v| v as f32).collect(),
            DecodingResult::U8(data) => data.into_iter().map(|v| v as f32).collect(),
            DecodingResult::I8(data) => data.into_iter().map(|v| v as f32).collect(),
            DecodingResult::U64(data) => data.into_iter().map(|v| v as f32).collect(),
            DecodingResult::I64(data) => data.into_iter().map(|v| v as f32).collect(),
        };
        Ok(samples)
    }

    /// Evaluate the interpolant at a fractional grid position.
    ///
    /// Positions outside `[0, rows) x [0, cols)` are extrapolated from the
    /// boundary spline piece rather than rejected; expect reduced accuracy there.
    pub fn elevation_at(&self, row: f64, col: f64) -> f64 {
        self.spline.evaluate(row, col)
    }

    /// Elevation at fractional offsets `dlat`, `dlon` inside this tile's degree cell.
    pub fn elevation_at_offset(&self, dlat: f64, dlon: f64) -> f64 {
        let pos = self.grid_position(dlat, dlon);
        self.elevation_at(pos.row, pos.col)
    }

    /// Elevations for a batch of geographic coordinates inside this tile's cell.
    pub fn elevations_at(&self, coords: &[(f64, f64)]) -> Vec<f64> {
        coords
            .iter()
            .map(|&(lat, lon)| {
                self.elevation_at_offset(lat - self.key.lat as f64, lon - self.key.lon as f64)
            })
            .collect()
    }

    /// Grid position of a fractional offset inside this tile's cell.
    pub fn grid_position(&self, dlat: f64, dlon: f64) -> GridPosition {
        self.orientation.grid_position(dlat, dlon, self.rows, self.cols)
    }

    /// Stored sample at an integer grid position.
    pub fn sample(&self, row: usize, col: usize) -> Option<f32> {
        if row < self.rows && col < self.cols {
            Some(self.samples[row * self.cols + col])
        } else {
            None
        }
    }

    /// Cell key of this tile.
    pub fn key(&self) -> TileKey {
        self.key
    }

    /// Get the geographic bounds of this tile.
    pub fn bounds(&self) -> TileBounds {
        self.bounds
    }

    /// Affine georeferencing read at load time.
    pub fn transform(&self) -> GeoTransform {
        self.transform
    }

    /// Grid shape as `(rows, cols)`.
    pub fn dimensions(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Orientation used to map cell offsets to grid positions.
    pub fn orientation(&self) -> TileOrientation {
        self.orientation
    }

    /// Get the resolution in degrees per pixel as `(x, y)`.
    pub fn resolution(&self) -> (f64, f64) {
        let b = &self.bounds;
        (
            (b.right - b.left).abs() / self.cols as f64,
            (b.top - b.bottom).abs() / self.rows as f64,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use std::io::Cursor;
    use tiff::encoder::{colortype, TiffEncoder};

    /// Georeferencing written into a test GeoTIFF.
    enum Georef {
        TiepointAndScale,
        Matrix,
    }

    /// Encode a north-up GeoTIFF of the 50N 6E cell in memory.
    fn geotiff_bytes(samples: &[f32], rows: usize, cols: usize, georef: Georef) -> Vec<u8> {
        let (sx, sy) = (1.0 / cols as f64, 1.0 / rows as f64);
        let mut bytes = Cursor::new(Vec::new());
        {
            let mut encoder = TiffEncoder::new(&mut bytes).expect("tiff encoder");
            let mut image = encoder
                .new_image::<colortype::Gray32Float>(cols as u32, rows as u32)
                .expect("tiff image");
            match georef {
                Georef::TiepointAndScale => {
                    image
                        .encoder()
                        .write_tag(Tag::ModelTiepointTag, &[0.0f64, 0.0, 0.0, 6.0, 51.0, 0.0][..])
                        .expect("tiepoint tag");
                    image
                        .encoder()
                        .write_tag(Tag::ModelPixelScaleTag, &[sx, sy, 0.0][..])
                        .expect("pixel scale tag");
                }
                Georef::Matrix => {
                    let matrix = [
                        sx, 0.0, 0.0, 6.0, //
                        0.0, -sy, 0.0, 51.0, //
                        0.0, 0.0, 0.0, 0.0, //
                        0.0, 0.0, 0.0, 1.0,
                    ];
                    image
                        .encoder()
                        .write_tag(Tag::ModelTransformationTag, &matrix[..])
                        .expect("transformation tag");
                }
            }
            image.write_data(samples).expect("tile samples");
        }
        bytes.into_inner()
    }

    fn ramp_tile(orientation: TileOrientation) -> RasterTile {
        // 4 rows x 5 cols, value = 10 * row + col.
        let rows = 4;
        let cols = 5;
        let samples = (0..rows * cols)
            .map(|i| (10 * (i / cols) + i % cols) as f32)
            .collect();
        let key = TileKey::new(50, 6);
        RasterTile::from_grid(
            key,
            samples,
            rows,
            cols,
            GeoTransform::for_cell(key, rows, cols),
            orientation,
        )
        .expect("valid grid")
    }

    #[test]
    fn test_transposed_grid_position() {
        let pos = TileOrientation::Transposed.grid_position(0.25, 0.5, 4, 8);
        assert_abs_diff_eq!(pos.row, 2.0);
        assert_abs_diff_eq!(pos.col, 6.0);

        // The cell's south-west corner lands one column past the last sample.
        let corner = TileOrientation::Transposed.grid_position(0.0, 0.0, 4, 8);
        assert_abs_diff_eq!(corner.row, 0.0);
        assert_abs_diff_eq!(corner.col, 8.0);
    }

    #[test]
    fn test_north_up_grid_position() {
        let pos = TileOrientation::NorthUp.grid_position(0.25, 0.5, 4, 8);
        assert_abs_diff_eq!(pos.row, 3.0);
        assert_abs_diff_eq!(pos.col, 4.0);
    }

    #[test]
    fn test_offsets_route_through_orientation() {
        let tile = ramp_tile(TileOrientation::Transposed);
        // dlon = 0.5 -> row 2, dlat = 0.4 -> col 5 - 2 = 3
        assert_abs_diff_eq!(tile.elevation_at_offset(0.4, 0.5), 23.0, epsilon = 1e-3);

        let tile = ramp_tile(TileOrientation::NorthUp);
        // dlat = 0.5 -> row 2, dlon = 0.6 -> col 3
        assert_abs_diff_eq!(tile.elevation_at_offset(0.5, 0.6), 23.0, epsilon = 1e-3);
    }

    #[test]
    fn test_elevation_at_matches_samples() {
        let tile = ramp_tile(TileOrientation::Transposed);
        for row in 0..4 {
            for col in 0..5 {
                let stored = tile.sample(row, col).expect("in range") as f64;
                assert_abs_diff_eq!(tile.elevation_at(row as f64, col as f64), stored, epsilon = 1e-3);
            }
        }
        assert!(tile.sample(4, 0).is_none());
    }

    #[test]
    fn test_bounds_from_transform() {
        let tile = ramp_tile(TileOrientation::Transposed);
        let bounds = tile.bounds();
        assert_abs_diff_eq!(bounds.left, 6.0);
        assert_abs_diff_eq!(bounds.right, 7.0);
        assert_abs_diff_eq!(bounds.top, 51.0);
        assert_abs_diff_eq!(bounds.bottom, 50.0);

        let (rx, ry) = tile.resolution();
        assert_abs_diff_eq!(rx, 0.2, epsilon = 1e-12);
        assert_abs_diff_eq!(ry, 0.25, epsilon = 1e-12);
    }

    #[test]
    fn test_transform_from_tiepoint() {
        let t = GeoTransform::from_tiepoint(&[0.0, 0.0, 0.0, 5.0, 51.0, 0.0], &[0.25, 0.5, 0.0]);
        let bounds = TileBounds::from_transform(&t, 2, 4);
        assert_abs_diff_eq!(bounds.left, 5.0);
        assert_abs_diff_eq!(bounds.right, 6.0);
        assert_abs_diff_eq!(bounds.top, 51.0);
        assert_abs_diff_eq!(bounds.bottom, 50.0);
    }

    #[test]
    fn test_degenerate_and_mismatched_grids() {
        let key = TileKey::new(0, 0);
        let err = RasterTile::from_grid(
            key,
            vec![1.0],
            1,
            1,
            GeoTransform::for_cell(key, 1, 1),
            TileOrientation::default(),
        )
        .unwrap_err();
        assert!(matches!(err, TileLoadError::DegenerateExtent { rows: 1, cols: 1 }));

        let err = RasterTile::from_grid(
            key,
            vec![1.0; 5],
            2,
            2,
            GeoTransform::for_cell(key, 2, 2),
            TileOrientation::default(),
        )
        .unwrap_err();
        assert!(matches!(err, TileLoadError::ShapeMismatch { actual: 5, .. }));
    }

    #[test]
    fn test_tile_key_containing() {
        assert_eq!(TileKey::containing(50.7, 6.1), TileKey::new(50, 6));
        assert_eq!(TileKey::containing(-0.5, -0.5), TileKey::new(-1, -1));
    }

    #[test]
    fn test_reads_standard_geotiff_tags() {
        let samples: Vec<f32> = (0..12).map(|i| 100.0 + i as f32).collect();
        for georef in [Georef::TiepointAndScale, Georef::Matrix] {
            let bytes = geotiff_bytes(&samples, 3, 4, georef);
            let tile = RasterTile::from_reader(
                Cursor::new(bytes),
                TileKey::new(50, 6),
                TileOrientation::Transposed,
            )
            .expect("standard GeoTIFF loads");

            assert_eq!(tile.dimensions(), (3, 4));
            let bounds = tile.bounds();
            assert_abs_diff_eq!(bounds.left, 6.0, epsilon = 1e-12);
            assert_abs_diff_eq!(bounds.right, 7.0, epsilon = 1e-12);
            assert_abs_diff_eq!(bounds.top, 51.0, epsilon = 1e-12);
            assert_abs_diff_eq!(bounds.bottom, 50.0, epsilon = 1e-12);
            assert_eq!(tile.sample(1, 2), Some(106.0));
        }
    }

    #[test]
    fn test_geotiff_without_georeferencing_is_rejected() {
        let mut bytes = Cursor::new(Vec::new());
        {
            let mut encoder = TiffEncoder::new(&mut bytes).expect("tiff encoder");
            encoder
                .write_image::<colortype::Gray32Float>(2, 2, &[1.0, 2.0, 3.0, 4.0])
                .expect("plain tiff");
        }
        let err = RasterTile::from_reader(
            Cursor::new(bytes.into_inner()),
            TileKey::new(0, 0),
            TileOrientation::default(),
        )
        .unwrap_err();
        assert!(matches!(err, TileLoadError::InvalidGeoTiff(_)));
    }

    #[test]
    fn test_batch_query_matches_single_queries() {
        let tile = ramp_tile(TileOrientation::Transposed);
        let coords = [(50.0, 6.0), (50.4, 6.5), (50.95, 6.05), (50.25, 6.8)];
        let batch = tile.elevations_at(&coords);
        assert_eq!(batch.len(), coords.len());
        for (&(lat, lon), value) in coords.iter().zip(&batch) {
            let single = tile.elevation_at_offset(lat - 50.0, lon - 6.0);
            assert_abs_diff_eq!(*value, single, epsilon = 1e-12);
        }
        // dlat = 0.4, dlon = 0.5 lands on sample (2, 3).
        assert_abs_diff_eq!(batch[1], 23.0, epsilon = 1e-3);
    }
}
