//! Integration tests for roadcurve-dem against GeoTIFF tiles written to a
//! temporary directory.

use approx::assert_abs_diff_eq;
use roadcurve_dem::{
    tile_file_name, Coverage, DemError, ElevationSurface, RasterTile, SurfaceOptions, TileKey,
    TileLoadError, TileOrientation,
};
use std::fs::File;
use std::path::Path;
use tempfile::TempDir;
use tiff::encoder::{colortype, TiffEncoder};
use tiff::tags::Tag;

const ROWS: usize = 6;
const COLS: usize = 6;

/// Sample value stored at `(row, col)` of the tile keyed `(lat, lon)`.
fn stored_value(lat: i32, lon: i32, row: usize, col: usize) -> f32 {
    (lat * 100 + lon * 10) as f32 + 2.0 * row as f32 + 0.5 * col as f32
}

/// Write a north-up GeoTIFF covering the 1x1 degree cell at `(lat, lon)`.
fn write_tile(dir: &Path, lat: i32, lon: i32) {
    let samples: Vec<f32> = (0..ROWS)
        .flat_map(|row| (0..COLS).map(move |col| stored_value(lat, lon, row, col)))
        .collect();

    let path = dir.join(tile_file_name(lat, lon, "tif"));
    let file = File::create(path).expect("create tile file");
    let mut encoder = TiffEncoder::new(file).expect("tiff encoder");
    let mut image = encoder
        .new_image::<colortype::Gray32Float>(COLS as u32, ROWS as u32)
        .expect("tiff image");
    image
        .encoder()
        .write_tag(
            Tag::ModelTiepointTag,
            &[0.0f64, 0.0, 0.0, lon as f64, (lat + 1) as f64, 0.0][..],
        )
        .expect("tiepoint tag");
    image
        .encoder()
        .write_tag(
            Tag::ModelPixelScaleTag,
            &[1.0 / COLS as f64, 1.0 / ROWS as f64, 0.0][..],
        )
        .expect("pixel scale tag");
    image.write_data(&samples).expect("tile samples");
}

fn write_coverage(dir: &Path, coverage: &Coverage) {
    for key in coverage.keys() {
        write_tile(dir, key.lat, key.lon);
    }
}

#[test]
fn test_load_single_tile() {
    let dir = TempDir::new().expect("temp dir");
    write_tile(dir.path(), 50, 6);

    let tile = RasterTile::load(
        dir.path().join("lat-50-lon-6.tif"),
        TileKey::new(50, 6),
        TileOrientation::Transposed,
    )
    .expect("tile loads");

    assert_eq!(tile.dimensions(), (ROWS, COLS));
    let bounds = tile.bounds();
    assert_abs_diff_eq!(bounds.left, 6.0, epsilon = 1e-9);
    assert_abs_diff_eq!(bounds.right, 7.0, epsilon = 1e-9);
    assert_abs_diff_eq!(bounds.top, 51.0, epsilon = 1e-9);
    assert_abs_diff_eq!(bounds.bottom, 50.0, epsilon = 1e-9);
    assert_eq!(tile.sample(2, 3), Some(stored_value(50, 6, 2, 3)));
}

#[test]
fn test_build_surface_and_query_grid_nodes() {
    let dir = TempDir::new().expect("temp dir");
    let coverage = Coverage::new(49, 50, 5, 7).expect("valid coverage");
    write_coverage(dir.path(), &coverage);

    let options = SurfaceOptions {
        parallel: false,
        ..SurfaceOptions::default()
    };
    let surface = ElevationSurface::build(dir.path(), coverage, &options).expect("surface builds");
    assert_eq!(surface.tile_count(), 6);

    // With the transposed mapping, offset (dlat, dlon) = (1 - col/COLS, row/ROWS)
    // lands exactly on grid node (row, col).
    for key in coverage.keys() {
        for &(row, col) in &[(0usize, 1usize), (2, 3), (5, 5), (4, 2)] {
            let lat = key.lat as f64 + 1.0 - col as f64 / COLS as f64;
            let lon = key.lon as f64 + row as f64 / ROWS as f64;
            let expected = stored_value(key.lat, key.lon, row, col) as f64;
            assert_abs_diff_eq!(surface.elevation_at(lat, lon), expected, epsilon = 1e-2);
        }
    }
}

#[test]
fn test_tile_corner_round_trip() {
    let dir = TempDir::new().expect("temp dir");
    let coverage = Coverage::new(50, 50, 6, 6).expect("valid coverage");
    write_coverage(dir.path(), &coverage);

    let surface = ElevationSurface::build(dir.path(), coverage, &SurfaceOptions::default())
        .expect("surface builds");

    // The cell's north-west corner (dlat -> 1, dlon = 0) maps to grid node (0, 0).
    let corner = surface.elevation_at(51.0, 6.0);
    assert_abs_diff_eq!(corner, stored_value(50, 6, 0, 0) as f64, epsilon = 1e-2);
}

#[test]
fn test_small_perturbation_is_stable() {
    let dir = TempDir::new().expect("temp dir");
    let coverage = Coverage::new(50, 50, 6, 6).expect("valid coverage");
    write_coverage(dir.path(), &coverage);
    let surface = ElevationSurface::build(dir.path(), coverage, &SurfaceOptions::default())
        .expect("surface builds");

    let a = surface.elevation_at(50.4321, 6.5678);
    let b = surface.elevation_at(50.4321 + 1e-9, 6.5678 - 1e-9);
    assert_abs_diff_eq!(a, b, epsilon = 1e-4);
}

#[test]
fn test_missing_tiles_fail_the_build() {
    let dir = TempDir::new().expect("temp dir");
    write_tile(dir.path(), 49, 5);

    let coverage = Coverage::new(49, 50, 5, 5).expect("valid coverage");
    let err = ElevationSurface::build(dir.path(), coverage, &SurfaceOptions::default())
        .expect_err("one tile missing");

    match err {
        DemError::SurfaceBuild { expected, failures } => {
            assert_eq!(expected, 2);
            assert_eq!(failures.len(), 1);
            match &failures[0] {
                DemError::TileLoad { path, source } => {
                    assert!(path.ends_with("lat-50-lon-5.tif"));
                    assert!(matches!(source, TileLoadError::Io(_)));
                }
                other => panic!("unexpected failure: {other}"),
            }
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_unreadable_tile_fails_the_build() {
    let dir = TempDir::new().expect("temp dir");
    std::fs::write(dir.path().join("lat-49-lon-5.tif"), b"not a tiff").expect("write junk");

    let coverage = Coverage::new(49, 49, 5, 5).expect("valid coverage");
    let err = ElevationSurface::build(dir.path(), coverage, &SurfaceOptions::default())
        .expect_err("junk tile");
    assert!(matches!(err, DemError::SurfaceBuild { ref failures, .. } if failures.len() == 1));
}
