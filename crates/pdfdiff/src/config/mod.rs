pub mod resolve;

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

pub use self::resolve::{CliOverrides, ResolvedRunConfig};

/// Rasterization resolution used when nothing else is configured.
pub const DEFAULT_DPI: u32 = 300;
pub const MAX_DPI: u32 = 2400;

pub fn validate_channel_tolerance(v: i64) -> Result<u8, String> {
    u8::try_from(v).map_err(|_| {
        format!("Invalid channel-tolerance: {v}. Valid range is 0(default, exact matching)-255")
    })
}

pub fn validate_per_page_pixel_tolerance(v: i64) -> Result<u64, String> {
    u64::try_from(v)
        .map_err(|_| format!("Invalid per-page-pixel-tolerance: {v}. Must be 0 or more"))
}

pub fn validate_dpi(v: i64) -> Result<u32, String> {
    if !(1..=MAX_DPI as i64).contains(&v) {
        return Err(format!(
            "Invalid dpi: {v}. Valid range is 1-{MAX_DPI} (default: {DEFAULT_DPI})"
        ));
    }
    Ok(v as u32)
}

/// Tolerance and visualization settings consumed by the pixel-diff engine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DiffOptions {
    /// Largest per-channel delta still treated as equal.
    pub channel_tolerance: u8,
    /// Differing pixels a page may have before it counts as different.
    /// Zero means any difference, including a size mismatch, counts.
    pub per_page_pixel_tolerance: u64,
    pub grayscale: bool,
    pub mark_differences: bool,
}

/// Immutable settings threaded through the page and document comparators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompareOptions {
    pub diff: DiffOptions,
    pub dpi: u32,
    pub verbose: bool,
    pub skip_identical: bool,
}

impl Default for CompareOptions {
    fn default() -> Self {
        Self {
            diff: DiffOptions::default(),
            dpi: DEFAULT_DPI,
            verbose: false,
            skip_identical: false,
        }
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DiffSection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel_tolerance: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub per_page_pixel_tolerance: Option<i64>,
    #[serde(default)]
    pub grayscale: bool,
    #[serde(default)]
    pub mark_differences: bool,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RenderSection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dpi: Option<i64>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutputSection {
    #[serde(default)]
    pub skip_identical: bool,
}

/// Contents of a `--config` TOML file. Every key is optional.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    #[serde(default)]
    pub diff: DiffSection,
    #[serde(default)]
    pub render: RenderSection,
    #[serde(default)]
    pub output: OutputSection,
}

/// Parse a config file. Numeric ranges are checked when the layers are
/// merged, see [`ResolvedRunConfig::from_layers`].
pub fn parse(content: &str) -> Result<FileConfig> {
    Ok(toml::from_str(content)?)
}

pub fn load(path: &Path) -> Result<FileConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    parse(&content).with_context(|| format!("Failed to parse {}", path.display()))
}
