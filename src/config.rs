//! Pipeline configuration.
//!
//! Handles loading, validating, and merging a `tintlab` TOML config file. The
//! stock defaults reproduce the classic behaviour (128×128 working raster,
//! 5-pixel mosaic, colordic.org catalog); a user file overrides only the keys
//! it names.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [resize]
//! width = 128               # Working raster width (1..=8192)
//! height = 128              # Working raster height
//!
//! [mosaic]
//! block = 5                 # Block side in pixels (odd, 1..=255)
//! edge_divisor = "block"    # "block" (block² always) or "samples"
//!
//! [colors]
//! on_malformed = "skip"     # "skip" the bad catalog entry, or "abort" the run
//!
//! [catalog]
//! url = "https://www.colordic.org/"
//! timeout_secs = 30
//!
//! [processing]
//! max_processes = 4         # Max parallel render workers (omit for auto = CPU cores)
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::imaging::{EdgeDivisor, MosaicParams, TargetSize};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Top-level configuration.
///
/// All fields have defaults. User config files need only specify the values
/// they want to override. Unknown keys are rejected.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineConfig {
    /// Working raster bounds.
    pub resize: ResizeConfig,
    /// Mosaic filter parameters.
    pub mosaic: MosaicConfig,
    /// Named-color fan-out policy.
    pub colors: ColorsConfig,
    /// Remote color catalog.
    pub catalog: CatalogConfig,
    /// Parallel rendering settings.
    pub processing: ProcessingConfig,
}

/// Largest accepted working raster side.
pub const MAX_RESIZE_SIDE: u32 = 8192;
/// Largest accepted mosaic block side.
pub const MAX_MOSAIC_BLOCK: u32 = 255;

impl PipelineConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let sides = [self.resize.width, self.resize.height];
        if sides.iter().any(|&s| s == 0 || s > MAX_RESIZE_SIDE) {
            return Err(ConfigError::Validation(format!(
                "resize.width and resize.height must be in 1..={MAX_RESIZE_SIDE}"
            )));
        }
        let block = self.mosaic.block;
        if block % 2 == 0 || block > MAX_MOSAIC_BLOCK {
            return Err(ConfigError::Validation(format!(
                "mosaic.block must be an odd number in 1..={MAX_MOSAIC_BLOCK}"
            )));
        }
        if self.catalog.timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "catalog.timeout_secs must be non-zero".into(),
            ));
        }
        if self.processing.max_processes == Some(0) {
            return Err(ConfigError::Validation(
                "processing.max_processes must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

/// Working raster bounds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ResizeConfig {
    pub width: u32,
    pub height: u32,
}

impl Default for ResizeConfig {
    fn default() -> Self {
        let target = TargetSize::default();
        Self {
            width: target.width,
            height: target.height,
        }
    }
}

impl ResizeConfig {
    pub fn target(&self) -> TargetSize {
        TargetSize {
            width: self.width,
            height: self.height,
        }
    }
}

/// Mosaic filter parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MosaicConfig {
    /// Block side length in pixels.
    pub block: u32,
    /// Divisor for blocks that overhang the raster edge.
    pub edge_divisor: EdgeDivisor,
}

impl Default for MosaicConfig {
    fn default() -> Self {
        let params = MosaicParams::default();
        Self {
            block: params.block,
            edge_divisor: params.divisor,
        }
    }
}

impl MosaicConfig {
    pub fn params(&self) -> MosaicParams {
        MosaicParams {
            block: self.block,
            divisor: self.edge_divisor,
        }
    }
}

/// What to do with a catalog entry whose color code does not parse.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MalformedPolicy {
    /// Log, report as skipped, keep going.
    #[default]
    Skip,
    /// Fail the whole run.
    Abort,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColorsConfig {
    pub on_malformed: MalformedPolicy,
}

/// Remote color catalog settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CatalogConfig {
    /// Page whose table cells carry `background-color` styles.
    pub url: String,
    /// HTTP timeout for the whole request.
    pub timeout_secs: u64,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            url: "https://www.colordic.org/".to_string(),
            timeout_secs: 30,
        }
    }
}

/// Parallel rendering settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Maximum number of parallel render workers.
    /// When absent, defaults to the number of CPU cores.
    /// Values larger than the core count are clamped down.
    pub max_processes: Option<usize>,
}

/// Render worker count: all cores unless `max_processes` asks for fewer.
pub fn effective_threads(config: &ProcessingConfig) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    config.max_processes.map(|n| n.min(cores)).unwrap_or(cores)
}

// =============================================================================
// Loading
// =============================================================================

/// [`PipelineConfig::default`] as a TOML table, the layer a user file overlays.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(PipelineConfig::default()).expect("default config must serialize")
}

/// Overlay one TOML value on another. Tables merge per key and recurse;
/// anything else in `overlay` wins outright.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, value) in overlay_table {
                let value = match base_table.remove(&key) {
                    Some(existing) => merge_toml(existing, value),
                    None => value,
                };
                base_table.insert(key, value);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Read a config file as a raw TOML value.
///
/// Unlike a missing optional file, an explicitly named file that does not
/// exist is an error.
pub fn load_raw_config(path: &Path) -> Result<toml::Value, ConfigError> {
    let content = fs::read_to_string(path)?;
    Ok(toml::from_str(&content)?)
}

/// Apply `overlay` (if any), deserialize, validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<PipelineConfig, ConfigError> {
    let merged = match overlay {
        Some(layer) => merge_toml(base, layer),
        None => base,
    };
    let config: PipelineConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load the effective config: stock defaults, plus `path` if given.
pub fn load_config(path: Option<&Path>) -> Result<PipelineConfig, ConfigError> {
    let overlay = path.map(load_raw_config).transpose()?;
    resolve_config(stock_defaults_value(), overlay)
}

/// Returns a fully-commented stock config with all keys and explanations.
///
/// Printed by `tintlab --gen-config`.
pub fn stock_config_toml() -> &'static str {
    r##"# tintlab Configuration
# =====================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
# Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Working raster
# ---------------------------------------------------------------------------
[resize]
# Every artifact is rendered at exactly this size (Catmull-Rom resampling,
# aspect ratio not preserved). Each side is 1..=8192.
width = 128
height = 128

# ---------------------------------------------------------------------------
# Mosaic filter (-moza.png)
# ---------------------------------------------------------------------------
[mosaic]
# Side of each square block in pixels. Must be odd, at most 255.
block = 5

# How blocks that overhang the right/bottom edge are averaged:
#   "block"   - divide by block * block even if fewer pixels were summed
#               (edge blocks come out darker; classic behaviour)
#   "samples" - divide by the number of pixels actually summed
edge_divisor = "block"

# ---------------------------------------------------------------------------
# Named-color variants (-<name>.png)
# ---------------------------------------------------------------------------
[colors]
# A catalog entry whose code is not valid hex:
#   "skip"  - warn and continue without that artifact
#   "abort" - stop the run with an error
on_malformed = "skip"

# ---------------------------------------------------------------------------
# Remote color catalog
# ---------------------------------------------------------------------------
[catalog]
# Page scraped for <td style="background-color:#xxxxxx"> cells.
url = "https://www.colordic.org/"

# Request timeout in seconds.
timeout_secs = 30

# ---------------------------------------------------------------------------
# Parallel rendering
# ---------------------------------------------------------------------------
[processing]
# Maximum number of parallel render workers.
# Omit to use all CPU cores. Values above the core count are clamped.
# max_processes = 4
"##
}
