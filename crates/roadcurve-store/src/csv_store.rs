//! File-backed road store: road table in CSV, features in CSV or JSON lines.

use crate::rows::{FeatureRow, RoadRow};
use crate::{Result, RoadStore, StoreError};
use roadcurve_features::{RoadFeatureRecord, RoadRecord};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Encoding of the feature output file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Comma-separated values with a header row.
    Csv,
    /// One JSON object per line.
    JsonLines,
}

impl OutputFormat {
    /// Pick the format from a path's extension (`.csv` or `.jsonl`).
    pub fn from_path(path: &Path) -> Result<Self> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("csv") => Ok(OutputFormat::Csv),
            Some(ext) if ext.eq_ignore_ascii_case("jsonl") => Ok(OutputFormat::JsonLines),
            _ => Err(StoreError::UnsupportedFormat(path.to_path_buf())),
        }
    }
}

/// Reads roads from a CSV file and writes features to a second file.
///
/// The road file needs a header row naming the columns `osm_id, highway,
/// oneway, bridge, bicycle, motorcar, public_transport, surface, tunnel,
/// name, geometry`.
#[derive(Debug)]
pub struct CsvRoadStore {
    input: PathBuf,
    output: PathBuf,
    format: OutputFormat,
    skipped: usize,
}

impl CsvRoadStore {
    /// Create a store over an input road table and an output feature path.
    pub fn new<P: Into<PathBuf>, Q: Into<PathBuf>>(input: P, output: Q) -> Result<Self> {
        let output = output.into();
        let format = OutputFormat::from_path(&output)?;
        Ok(Self {
            input: input.into(),
            output,
            format,
            skipped: 0,
        })
    }

    /// Road table path.
    pub fn input(&self) -> &Path {
        &self.input
    }

    /// Feature output path.
    pub fn output(&self) -> &Path {
        &self.output
    }

    /// Output encoding chosen from the output extension.
    pub fn format(&self) -> OutputFormat {
        self.format
    }

    fn write_csv(&self, rows: impl Iterator<Item = FeatureRow>) -> Result<()> {
        let mut writer = csv::Writer::from_path(&self.output)?;
        for row in rows {
            writer.serialize(row)?;
        }
        writer.flush()?;
        Ok(())
    }

    fn write_json_lines(&self, rows: impl Iterator<Item = FeatureRow>) -> Result<()> {
        let mut writer = BufWriter::new(File::create(&self.output)?);
        for row in rows {
            serde_json::to_writer(&mut writer, &row)?;
            writer.write_all(b"\n")?;
        }
        writer.flush()?;
        Ok(())
    }
}

impl RoadStore for CsvRoadStore {
    fn load_roads(&mut self) -> Result<Vec<RoadRecord>> {
        let mut reader = csv::Reader::from_path(&self.input)?;
        let mut roads = Vec::new();
        self.skipped = 0;

        for row in reader.deserialize::<RoadRow>() {
            match row?.into_record() {
                Ok(road) => roads.push(road),
                Err(err) => {
                    warn!("Skipping road: {}", err);
                    self.skipped += 1;
                }
            }
        }

        info!(
            "Loaded {} roads from {} ({} skipped)",
            roads.len(),
            self.input.display(),
            self.skipped
        );
        Ok(roads)
    }

    fn save_features(&mut self, features: &[RoadFeatureRecord]) -> Result<()> {
        if let Some(parent) = self.output.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let rows = features.iter().map(FeatureRow::from);
        match self.format {
            OutputFormat::Csv => self.write_csv(rows)?,
            OutputFormat::JsonLines => self.write_json_lines(rows)?,
        }

        debug!(
            "Wrote {} feature rows to {} as {:?}",
            features.len(),
            self.output.display(),
            self.format
        );
        Ok(())
    }

    fn skipped_rows(&self) -> usize {
        self.skipped
    }
}
