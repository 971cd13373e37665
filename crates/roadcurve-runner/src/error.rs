//! Error types for the batch runner.

use roadcurve_dem::DemError;
use roadcurve_features::FeatureError;
use roadcurve_store::StoreError;
use thiserror::Error;

/// Errors that end a batch run.
#[derive(Debug, Error)]
pub enum RunnerError {
    /// Reading the configuration file failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The configuration file is not valid YAML for [`RunnerConfig`](crate::RunnerConfig).
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// A configuration value is out of range.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Loading the elevation tiles failed.
    #[error("DEM error: {0}")]
    Dem(#[from] DemError),

    /// Curviness settings were rejected.
    #[error("Feature error: {0}")]
    Feature(#[from] FeatureError),

    /// Reading roads or writing features failed.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// The rayon pool could not be created.
    #[error("Thread pool error: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    /// The Ctrl-C handler could not be installed.
    #[error("Signal handler error: {0}")]
    Signal(#[from] ctrlc::Error),
}
