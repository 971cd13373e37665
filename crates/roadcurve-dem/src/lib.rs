//! # roadcurve-dem
//!
//! Digital Elevation Model (DEM) surface built from a rectangle of 1x1 degree
//! GeoTIFF tiles.
//!
//! ## Overview
//!
//! Each tile file covers one whole-degree cell and is named after its
//! south-west corner: `lat-{lat}-lon-{lon}.tif`. A tile holds a single
//! elevation band plus an affine georeferencing transform (ModelTiepoint and
//! ModelPixelScale, or ModelTransformation).
//!
//! When a [`RasterTile`] is loaded a bicubic spline is fitted over its grid,
//! so elevation can be read at any fractional row/column. An
//! [`ElevationSurface`] eagerly loads every tile of its [`Coverage`] rectangle
//! and routes geographic queries to the right tile. Coordinates outside the
//! rectangle resolve to [`DEFAULT_ELEVATION`] (0.0) rather than an error.
//!
//! ## Examples
//!
//! ```no_run
//! use roadcurve_dem::{Coverage, ElevationSurface, RasterTile, SurfaceOptions, TileKey, TileOrientation};
//!
//! // Load the full 49-51 N / 5-8 E rectangle up front
//! let surface = ElevationSurface::build("dem", Coverage::default(), &SurfaceOptions::default())?;
//! let elevation = surface.elevation_at(50.94, 6.96);
//! println!("Cologne elevation: {} meters", elevation);
//!
//! // Or load a single tile directly
//! let tile = RasterTile::load("dem/lat-50-lon-6.tif", TileKey::new(50, 6), TileOrientation::default())?;
//! let elevation = tile.elevation_at_offset(0.94, 0.96);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod error;
mod spline;
mod surface;
mod tile;

pub use error::{DemError, TileLoadError};
pub use spline::BicubicSpline;
pub use surface::{tile_file_name, Coverage, ElevationSurface, SurfaceOptions, DEFAULT_ELEVATION};
pub use tile::{GeoTransform, GridPosition, RasterTile, TileBounds, TileKey, TileOrientation};

/// Result type for DEM operations.
pub type Result<T> = std::result::Result<T, DemError>;
