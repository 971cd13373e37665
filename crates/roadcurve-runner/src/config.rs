//! Runner configuration loaded from YAML.

use crate::{Result, RunnerError};
use roadcurve_dem::{Coverage, SurfaceOptions, TileOrientation};
use roadcurve_features::{CurvinessAnalyzer, DEFAULT_SEGMENT_SIZE};
use roadcurve_store::OutputFormat;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Settings for one batch run.
///
/// Every field has a default, so an empty YAML document is a valid config.
///
/// ```yaml
/// dem_dir: /data/srtm
/// lat_from: 49
/// lat_to: 51
/// lon_from: 5
/// lon_to: 8
/// tile_orientation: transposed
/// segment_size: 100.0
/// input: roads.csv
/// output: features.jsonl
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunnerConfig {
    /// Directory holding `lat-{lat}-lon-{lon}.{ext}` tiles.
    pub dem_dir: PathBuf,
    /// Southernmost tile key (inclusive).
    pub lat_from: i32,
    /// Northernmost tile key (inclusive).
    pub lat_to: i32,
    /// Westernmost tile key (inclusive).
    pub lon_from: i32,
    /// Easternmost tile key (inclusive).
    pub lon_to: i32,
    /// Tile file extension without the dot.
    pub tile_extension: String,
    /// How tile rows and columns map to latitude and longitude.
    pub tile_orientation: TileOrientation,
    /// Segment length for bucket classification, in projected units.
    pub segment_size: f64,
    /// Road table (CSV).
    pub input: PathBuf,
    /// Feature output, `.csv` or `.jsonl`.
    pub output: PathBuf,
    /// Worker threads; 0 lets rayon decide.
    pub threads: usize,
    /// Load tiles concurrently.
    pub parallel_tile_load: bool,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            dem_dir: PathBuf::from("dem"),
            lat_from: 49,
            lat_to: 51,
            lon_from: 5,
            lon_to: 8,
            tile_extension: "tif".to_string(),
            tile_orientation: TileOrientation::Transposed,
            segment_size: DEFAULT_SEGMENT_SIZE,
            input: PathBuf::from("roads.csv"),
            output: PathBuf::from("features.csv"),
            threads: 0,
            parallel_tile_load: true,
        }
    }
}

impl RunnerConfig {
    /// Read a config from a YAML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_yaml(&contents)
    }

    /// Parse a config from YAML text.
    pub fn from_yaml(text: &str) -> Result<Self> {
        // An empty document deserializes as unit, not as an empty map.
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(text)?)
    }

    /// Check value ranges before any work starts.
    pub fn validate(&self) -> Result<()> {
        if !self.segment_size.is_finite() || self.segment_size <= 0.0 {
            return Err(RunnerError::Config(format!(
                "segment_size must be positive, got {}",
                self.segment_size
            )));
        }
        if self.lat_from > self.lat_to {
            return Err(RunnerError::Config(format!(
                "lat_from ({}) is greater than lat_to ({})",
                self.lat_from, self.lat_to
            )));
        }
        if self.lon_from > self.lon_to {
            return Err(RunnerError::Config(format!(
                "lon_from ({}) is greater than lon_to ({})",
                self.lon_from, self.lon_to
            )));
        }
        if self.lat_from < -90 || self.lat_to >= 90 || self.lon_from < -180 || self.lon_to >= 180 {
            return Err(RunnerError::Config(format!(
                "coverage lat {}..={} lon {}..={} is outside the globe",
                self.lat_from, self.lat_to, self.lon_from, self.lon_to
            )));
        }
        if self.tile_extension.is_empty() {
            return Err(RunnerError::Config("tile_extension is empty".to_string()));
        }
        OutputFormat::from_path(&self.output)?;
        Ok(())
    }

    /// Tile rectangle to load.
    pub fn coverage(&self) -> Result<Coverage> {
        Ok(Coverage::new(
            self.lat_from,
            self.lat_to,
            self.lon_from,
            self.lon_to,
        )?)
    }

    /// Tile loading options derived from this config.
    pub fn surface_options(&self) -> SurfaceOptions {
        SurfaceOptions {
            extension: self.tile_extension.clone(),
            orientation: self.tile_orientation,
            parallel: self.parallel_tile_load,
        }
    }

    /// Curviness analyzer for `segment_size`.
    pub fn analyzer(&self) -> Result<CurvinessAnalyzer> {
        Ok(CurvinessAnalyzer::new(self.segment_size)?)
    }
}
