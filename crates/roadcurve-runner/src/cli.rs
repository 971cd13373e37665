//! Command-line arguments.

use crate::{Result, RunnerConfig};
use clap::{Parser, ValueEnum};
use roadcurve_dem::TileOrientation;
use std::path::PathBuf;

/// Compute curviness and elevation features for a road table.
#[derive(Parser, Debug)]
#[command(name = "roadcurve", author, version, about, long_about = None)]
pub struct Cli {
    /// YAML config file; flags below override its values
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Directory of DEM tiles
    #[arg(long)]
    pub dem_dir: Option<PathBuf>,

    /// Southernmost tile latitude
    #[arg(long, allow_hyphen_values = true)]
    pub lat_from: Option<i32>,

    /// Northernmost tile latitude
    #[arg(long, allow_hyphen_values = true)]
    pub lat_to: Option<i32>,

    /// Westernmost tile longitude
    #[arg(long, allow_hyphen_values = true)]
    pub lon_from: Option<i32>,

    /// Easternmost tile longitude
    #[arg(long, allow_hyphen_values = true)]
    pub lon_to: Option<i32>,

    /// Tile file extension (without the dot)
    #[arg(long)]
    pub tile_extension: Option<String>,

    /// Axis layout of the tile rasters
    #[arg(long, value_enum)]
    pub tile_orientation: Option<OrientationArg>,

    /// Segment length for curviness buckets, in projected units
    #[arg(short, long)]
    pub segment_size: Option<f64>,

    /// Road table (CSV)
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Feature output (.csv or .jsonl)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Worker threads (0 = one per core)
    #[arg(short = 'j', long)]
    pub threads: Option<usize>,

    /// Load tiles one at a time
    #[arg(long)]
    pub serial_tile_load: bool,

    /// Log filter, e.g. "info" or "roadcurve_dem=debug"
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

/// Tile axis layout as spelled on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OrientationArg {
    /// Rows follow longitude, columns follow latitude.
    #[value(name = "transposed")]
    Transposed,
    /// Row 0 is the northern edge, columns follow longitude.
    #[value(name = "north_up")]
    NorthUp,
}

impl From<OrientationArg> for TileOrientation {
    fn from(arg: OrientationArg) -> Self {
        match arg {
            OrientationArg::Transposed => TileOrientation::Transposed,
            OrientationArg::NorthUp => TileOrientation::NorthUp,
        }
    }
}

impl Cli {
    /// Config file values (or defaults) with command-line overrides applied.
    pub fn resolve_config(&self) -> Result<RunnerConfig> {
        let mut config = match &self.config {
            Some(path) => RunnerConfig::load(path)?,
            None => RunnerConfig::default(),
        };
        self.apply_overrides(&mut config);
        Ok(config)
    }

    /// Overwrite every config field that was given on the command line.
    pub fn apply_overrides(&self, config: &mut RunnerConfig) {
        if let Some(dir) = &self.dem_dir {
            config.dem_dir = dir.clone();
        }
        if let Some(v) = self.lat_from {
            config.lat_from = v;
        }
        if let Some(v) = self.lat_to {
            config.lat_to = v;
        }
        if let Some(v) = self.lon_from {
            config.lon_from = v;
        }
        if let Some(v) = self.lon_to {
            config.lon_to = v;
        }
        if let Some(ext) = &self.tile_extension {
            config.tile_extension = ext.clone();
        }
        if let Some(orientation) = self.tile_orientation {
            config.tile_orientation = orientation.into();
        }
        if let Some(size) = self.segment_size {
            config.segment_size = size;
        }
        if let Some(input) = &self.input {
            config.input = input.clone();
        }
        if let Some(output) = &self.output {
            config.output = output.clone();
        }
        if let Some(threads) = self.threads {
            config.threads = threads;
        }
        if self.serial_tile_load {
            config.parallel_tile_load = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_overrides() {
        let cli = Cli::parse_from([
            "roadcurve",
            "--dem-dir",
            "/srv/dem",
            "--lat-from",
            "-3",
            "--tile-orientation",
            "north_up",
            "-s",
            "250",
            "-o",
            "out.jsonl",
            "-j",
            "4",
            "--serial-tile-load",
        ]);

        let mut config = RunnerConfig::default();
        cli.apply_overrides(&mut config);
        assert_eq!(config.dem_dir, PathBuf::from("/srv/dem"));
        assert_eq!(config.lat_from, -3);
        assert_eq!(config.tile_orientation, TileOrientation::NorthUp);
        assert_eq!(config.segment_size, 250.0);
        assert_eq!(config.output, PathBuf::from("out.jsonl"));
        assert_eq!(config.threads, 4);
        assert!(!config.parallel_tile_load);
        // Untouched fields keep their defaults.
        assert_eq!(config.lon_to, 8);
        assert_eq!(config.input, PathBuf::from("roads.csv"));
    }

    #[test]
    fn test_flags_override_config_file() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(file, "segment_size: 40\nlat_to: 50\ninput: from_file.csv").expect("write yaml");

        let cli = Cli::parse_from([
            "roadcurve",
            "--config",
            file.path().to_str().expect("utf-8 path"),
            "--segment-size",
            "75",
        ]);
        let config = cli.resolve_config().expect("config");
        assert_eq!(config.segment_size, 75.0);
        assert_eq!(config.lat_to, 50);
        assert_eq!(config.input, PathBuf::from("from_file.csv"));
    }

    #[test]
    fn test_no_flags_is_default_config() {
        let cli = Cli::parse_from(["roadcurve"]);
        assert_eq!(cli.resolve_config().expect("config"), RunnerConfig::default());
        assert_eq!(cli.log_level, "info");
    }
}
