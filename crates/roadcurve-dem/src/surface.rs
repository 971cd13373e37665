//! Elevation surface stitched together from a rectangle of 1x1 degree tiles.

use crate::{DemError, RasterTile, Result, TileKey, TileOrientation};
use rayon::prelude::*;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Elevation returned for coordinates the surface does not cover.
pub const DEFAULT_ELEVATION: f64 = 0.0;

/// File name of the tile whose south-west corner is `(lat, lon)`.
pub fn tile_file_name(lat: i32, lon: i32, extension: &str) -> String {
    format!("lat-{}-lon-{}.{}", lat, lon, extension)
}

/// Inclusive rectangle of whole-degree tile keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Coverage {
    lat_from: i32,
    lat_to: i32,
    lon_from: i32,
    lon_to: i32,
}

impl Default for Coverage {
    /// 49-51 N, 5-8 E.
    fn default() -> Self {
        Self {
            lat_from: 49,
            lat_to: 51,
            lon_from: 5,
            lon_to: 8,
        }
    }
}

impl Coverage {
    /// Create a coverage rectangle; both ranges are inclusive.
    ///
    /// Keys name south-west corners, so latitudes must lie in `-90..=89` and
    /// longitudes in `-180..=179`.
    pub fn new(lat_from: i32, lat_to: i32, lon_from: i32, lon_to: i32) -> Result<Self> {
        let on_globe = (-90..=89).contains(&lat_from)
            && (-90..=89).contains(&lat_to)
            && (-180..=179).contains(&lon_from)
            && (-180..=179).contains(&lon_to);
        if !on_globe || lat_from > lat_to || lon_from > lon_to {
            return Err(DemError::InvalidCoverage(format!(
                "lat {}..={} lon {}..={}",
                lat_from, lat_to, lon_from, lon_to
            )));
        }
        Ok(Self {
            lat_from,
            lat_to,
            lon_from,
            lon_to,
        })
    }

    /// Whether a geographic coordinate is served by this coverage.
    ///
    /// The upper bounds are `lat_to + 1` and `lon_to + 1`, so the far edge of
    /// the last degree cell is accepted.
    pub fn contains(&self, lat: f64, lon: f64) -> bool {
        lat >= self.lat_from as f64
            && lat <= (self.lat_to + 1) as f64
            && lon >= self.lon_from as f64
            && lon <= (self.lon_to + 1) as f64
    }

    /// Key of the tile serving a covered coordinate.
    ///
    /// Coordinates on the far edge of the rectangle are served by the last tile.
    pub fn key_for(&self, lat: f64, lon: f64) -> TileKey {
        let key = TileKey::containing(lat, lon);
        TileKey {
            lat: key.lat.clamp(self.lat_from, self.lat_to),
            lon: key.lon.clamp(self.lon_from, self.lon_to),
        }
    }

    /// Whether a tile key lies inside the rectangle.
    pub fn includes(&self, key: TileKey) -> bool {
        (self.lat_from..=self.lat_to).contains(&key.lat)
            && (self.lon_from..=self.lon_to).contains(&key.lon)
    }

    /// Every tile key in the rectangle, latitude-major.
    pub fn keys(&self) -> impl Iterator<Item = TileKey> + '_ {
        (self.lat_from..=self.lat_to)
            .flat_map(move |lat| (self.lon_from..=self.lon_to).map(move |lon| TileKey::new(lat, lon)))
    }

    /// Number of tiles the rectangle requires.
    pub fn tile_count(&self) -> usize {
        let lats = (self.lat_to - self.lat_from) as usize + 1;
        let lons = (self.lon_to - self.lon_from) as usize + 1;
        lats * lons
    }

    /// Inclusive latitude key range.
    pub fn lat_range(&self) -> (i32, i32) {
        (self.lat_from, self.lat_to)
    }

    /// Inclusive longitude key range.
    pub fn lon_range(&self) -> (i32, i32) {
        (self.lon_from, self.lon_to)
    }
}

/// Options controlling how a surface is loaded from disk.
#[derive(Debug, Clone)]
pub struct SurfaceOptions {
    /// File extension of tile files (without the dot).
    pub extension: String,
    /// Offset-to-grid mapping applied to every tile.
    pub orientation: TileOrientation,
    /// Load tiles on the rayon thread pool.
    pub parallel: bool,
}

impl Default for SurfaceOptions {
    fn default() -> Self {
        Self {
            extension: "tif".to_string(),
            orientation: TileOrientation::default(),
            parallel: true,
        }
    }
}

/// Continuous elevation function over a rectangle of loaded tiles.
///
/// Every tile in the coverage rectangle is loaded before the surface is
/// returned; queries never touch the disk. The surface is read-only and can be
/// shared across threads.
///
/// # Example
///
/// ```no_run
/// use roadcurve_dem::{Coverage, ElevationSurface, SurfaceOptions};
///
/// let surface = ElevationSurface::build("dem", Coverage::default(), &SurfaceOptions::default())?;
/// let elevation = surface.elevation_at(50.73, 7.10); // Bonn
/// println!("Bonn elevation: {} meters", elevation);
/// # Ok::<(), roadcurve_dem::DemError>(())
/// ```
#[derive(Debug)]
pub struct ElevationSurface {
    coverage: Coverage,
    tiles: HashMap<TileKey, RasterTile>,
}

impl ElevationSurface {
    /// Load every tile of `coverage` from `dir`.
    ///
    /// Fails with [`DemError::SurfaceBuild`] listing every tile that is missing
    /// or unreadable.
    pub fn build<P: AsRef<Path>>(
        dir: P,
        coverage: Coverage,
        options: &SurfaceOptions,
    ) -> Result<Self> {
        let dir = dir.as_ref();
        let jobs: Vec<(TileKey, PathBuf)> = coverage
            .keys()
            .map(|key| {
                let path = dir.join(tile_file_name(key.lat, key.lon, &options.extension));
                (key, path)
            })
            .collect();

        let load = |(key, path): &(TileKey, PathBuf)| {
            RasterTile::load(path, *key, options.orientation).map_err(|source| DemError::TileLoad {
                path: path.clone(),
                source,
            })
        };
        let results: Vec<Result<RasterTile>> = if options.parallel {
            jobs.par_iter().map(load).collect()
        } else {
            jobs.iter().map(load).collect()
        };

        let mut tiles = HashMap::with_capacity(jobs.len());
        let mut failures = Vec::new();
        for result in results {
            match result {
                Ok(tile) => {
                    tiles.insert(tile.key(), tile);
                }
                Err(err) => {
                    warn!("{}", err);
                    failures.push(err);
                }
            }
        }

        if !failures.is_empty() {
            return Err(DemError::SurfaceBuild {
                expected: coverage.tile_count(),
                failures,
            });
        }

        info!(
            tiles = tiles.len(),
            dir = %dir.display(),
            "elevation surface ready"
        );
        Ok(Self { coverage, tiles })
    }

    /// Assemble a surface from already-constructed tiles.
    ///
    /// Tiles outside the coverage rectangle are ignored; every key inside it
    /// must be supplied.
    pub fn from_tiles<I>(coverage: Coverage, tiles: I) -> Result<Self>
    where
        I: IntoIterator<Item = RasterTile>,
    {
        let mut by_key: HashMap<TileKey, RasterTile> = tiles
            .into_iter()
            .map(|tile| (tile.key(), tile))
            .collect();
        by_key.retain(|key, _| coverage.includes(*key));

        let failures: Vec<DemError> = coverage
            .keys()
            .filter(|key| !by_key.contains_key(key))
            .map(|key| DemError::MissingTile {
                lat: key.lat,
                lon: key.lon,
            })
            .collect();
        if !failures.is_empty() {
            return Err(DemError::SurfaceBuild {
                expected: coverage.tile_count(),
                failures,
            });
        }

        Ok(Self {
            coverage,
            tiles: by_key,
        })
    }

    /// Whether a coordinate falls inside the covered rectangle (including the
    /// one-degree far-edge overhang, see [`Coverage::contains`]).
    pub fn contains(&self, lat: f64, lon: f64) -> bool {
        self.coverage.contains(lat, lon)
    }

    /// Interpolated elevation at a geographic coordinate.
    ///
    /// Returns [`DEFAULT_ELEVATION`] outside the coverage rectangle. A zero
    /// therefore does not distinguish "no data" from sea level; check
    /// [`contains`](Self::contains) when that matters.
    pub fn elevation_at(&self, lat: f64, lon: f64) -> f64 {
        if !self.contains(lat, lon) {
            return DEFAULT_ELEVATION;
        }
        let key = self.coverage.key_for(lat, lon);
        match self.tiles.get(&key) {
            Some(tile) => tile.elevation_at_offset(lat - key.lat as f64, lon - key.lon as f64),
            None => DEFAULT_ELEVATION,
        }
    }

    /// Elevations for a batch of `(lat, lon)` coordinates.
    pub fn elevations_at(&self, coords: &[(f64, f64)]) -> Vec<f64> {
        coords
            .iter()
            .map(|&(lat, lon)| self.elevation_at(lat, lon))
            .collect()
    }

    /// Tile for a whole-degree cell, if it is part of the surface.
    pub fn tile(&self, lat: i32, lon: i32) -> Option<&RasterTile> {
        self.tiles.get(&TileKey::new(lat, lon))
    }

    /// Number of loaded tiles.
    pub fn tile_count(&self) -> usize {
        self.tiles.len()
    }

    /// Coverage rectangle of this surface.
    pub fn coverage(&self) -> Coverage {
        self.coverage
    }
}
