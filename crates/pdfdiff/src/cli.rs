use std::path::PathBuf;

use clap::Parser;

use crate::config;
use crate::config::CliOverrides;

fn parse_integer(s: &str) -> Result<i64, String> {
    s.trim().parse().map_err(|e| format!("{e}"))
}

fn parse_channel_tolerance(s: &str) -> Result<u8, String> {
    config::validate_channel_tolerance(parse_integer(s)?)
}

fn parse_per_page_pixel_tolerance(s: &str) -> Result<u64, String> {
    config::validate_per_page_pixel_tolerance(parse_integer(s)?)
}

fn parse_dpi(s: &str) -> Result<u32, String> {
    config::validate_dpi(parse_integer(s)?)
}

#[derive(Debug, Parser)]
#[command(
    name = "pdfdiff",
    about = "Compare two PDF documents visually, page by page (exit 0 equal, 1 different)"
)]
pub struct Cli {
    /// First (reference) document
    pub file1: PathBuf,
    /// Second document
    pub file2: PathBuf,

    /// Print per-page pixel counts and a summary
    #[arg(long, short = 'v')]
    pub verbose: bool,
    /// Only output pages with differences
    #[arg(long, short = 's')]
    pub skip_identical: bool,
    /// Additionally mark differences on the left side
    #[arg(long, short = 'm')]
    pub mark_differences: bool,
    /// Only differences will be in color
    #[arg(long, short = 'g')]
    pub grayscale: bool,

    /// Write the differences to this PDF file
    #[arg(long, value_name = "FILE")]
    pub output_diff: Option<PathBuf>,
    /// Channel tolerance (0-255, default: 0)
    #[arg(
        long,
        value_name = "N",
        allow_hyphen_values = true,
        value_parser = parse_channel_tolerance
    )]
    pub channel_tolerance: Option<u8>,
    /// Per-page pixel tolerance (default: 0)
    #[arg(
        long,
        value_name = "N",
        allow_hyphen_values = true,
        value_parser = parse_per_page_pixel_tolerance
    )]
    pub per_page_pixel_tolerance: Option<u64>,
    /// Rasterization resolution (1-2400, default: 300)
    #[arg(long, value_name = "N", allow_hyphen_values = true, value_parser = parse_dpi)]
    pub dpi: Option<u32>,

    /// Write a JSON report of per-page results to this file
    #[arg(long, value_name = "FILE")]
    pub report: Option<PathBuf>,
    /// Read settings from this TOML file
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

impl Cli {
    /// Split into the input paths and the settings that take part in
    /// configuration resolution.
    pub fn into_parts(self) -> (PathBuf, PathBuf, CliOverrides) {
        let overrides = CliOverrides {
            config: self.config,
            channel_tolerance: self.channel_tolerance,
            per_page_pixel_tolerance: self.per_page_pixel_tolerance,
            dpi: self.dpi,
            verbose: self.verbose,
            skip_identical: self.skip_identical,
            mark_differences: self.mark_differences,
            grayscale: self.grayscale,
            output_diff: self.output_diff,
            report: self.report,
        };
        (self.file1, self.file2, overrides)
    }
}
