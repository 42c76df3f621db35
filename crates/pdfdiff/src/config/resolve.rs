use std::path::PathBuf;

use anyhow::{Context, Result};

use super::{
    CompareOptions, DEFAULT_DPI, DiffOptions, FileConfig, load, validate_channel_tolerance,
    validate_dpi, validate_per_page_pixel_tolerance,
};

const ENV_CHANNEL_TOLERANCE: &str = "PDFDIFF_CHANNEL_TOLERANCE";
const ENV_PER_PAGE_PIXEL_TOLERANCE: &str = "PDFDIFF_PER_PAGE_PIXEL_TOLERANCE";
const ENV_DPI: &str = "PDFDIFF_DPI";

/// Values extracted from the CLI that participate in the merge.
#[derive(Debug, Default)]
pub struct CliOverrides {
    pub config: Option<PathBuf>,
    pub channel_tolerance: Option<u8>,
    pub per_page_pixel_tolerance: Option<u64>,
    pub dpi: Option<u32>,
    pub verbose: bool,
    pub skip_identical: bool,
    pub mark_differences: bool,
    pub grayscale: bool,
    pub output_diff: Option<PathBuf>,
    pub report: Option<PathBuf>,
}

/// Fully resolved config after CLI > env > file > defaults merge.
#[derive(Debug)]
pub struct ResolvedRunConfig {
    pub options: CompareOptions,
    pub output_diff: Option<PathBuf>,
    pub report: Option<PathBuf>,
}

impl ResolvedRunConfig {
    pub fn new(cli: CliOverrides) -> Result<Self> {
        let file_config = match &cli.config {
            Some(path) => load(path)?,
            None => FileConfig::default(),
        };
        Self::from_layers(cli, file_config, |key| std::env::var(key).ok())
    }

    /// Merge the layers; `env` looks up a single environment variable.
    pub fn from_layers(
        cli: CliOverrides,
        file: FileConfig,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self> {
        // 1. Env layer
        let env_channel = env_value(&env, ENV_CHANNEL_TOLERANCE, validate_channel_tolerance)?;
        let env_pixels = env_value(
            &env,
            ENV_PER_PAGE_PIXEL_TOLERANCE,
            validate_per_page_pixel_tolerance,
        )?;
        let env_dpi = env_value(&env, ENV_DPI, validate_dpi)?;

        // 2. File layer, range-checked here only
        let file_channel = file
            .diff
            .channel_tolerance
            .map(validate_channel_tolerance)
            .transpose()
            .map_err(|e| anyhow::anyhow!("diff.{e}"))?;
        let file_pixels = file
            .diff
            .per_page_pixel_tolerance
            .map(validate_per_page_pixel_tolerance)
            .transpose()
            .map_err(|e| anyhow::anyhow!("diff.{e}"))?;
        let file_dpi = file
            .render
            .dpi
            .map(validate_dpi)
            .transpose()
            .map_err(|e| anyhow::anyhow!("render.{e}"))?;

        // 3. CLI > env > file > default
        let diff = DiffOptions {
            channel_tolerance: cli
                .channel_tolerance
                .or(env_channel)
                .or(file_channel)
                .unwrap_or(0),
            per_page_pixel_tolerance: cli
                .per_page_pixel_tolerance
                .or(env_pixels)
                .or(file_pixels)
                .unwrap_or(0),
            grayscale: cli.grayscale || file.diff.grayscale,
            mark_differences: cli.mark_differences || file.diff.mark_differences,
        };

        let options = CompareOptions {
            diff,
            dpi: cli.dpi.or(env_dpi).or(file_dpi).unwrap_or(DEFAULT_DPI),
            verbose: cli.verbose,
            skip_identical: cli.skip_identical || file.output.skip_identical,
        };

        Ok(Self {
            options,
            output_diff: cli.output_diff,
            report: cli.report,
        })
    }
}

fn env_value<T>(
    env: &impl Fn(&str) -> Option<String>,
    key: &str,
    validate: fn(i64) -> Result<T, String>,
) -> Result<Option<T>> {
    let Some(raw) = env(key) else {
        return Ok(None);
    };
    let v: i64 = raw
        .trim()
        .parse()
        .with_context(|| format!("{key} must be an integer, got {raw:?}"))?;
    validate(v).map(Some).map_err(|e| anyhow::anyhow!("{key}: {e}"))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::config::parse;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_nothing_set() {
        let resolved =
            ResolvedRunConfig::from_layers(CliOverrides::default(), FileConfig::default(), no_env)
                .unwrap();
        assert_eq!(resolved.options, CompareOptions::default());
        assert_eq!(resolved.options.dpi, 300);
        assert!(resolved.output_diff.is_none());
    }

    #[test]
    fn cli_beats_env_beats_file() {
        let file = parse("[diff]\nchannel_tolerance = 1\n[render]\ndpi = 72\n").unwrap();
        let env = env_from(&[(ENV_CHANNEL_TOLERANCE, "2"), (ENV_DPI, "96")]);
        let cli = CliOverrides {
            channel_tolerance: Some(3),
            ..Default::default()
        };
        let resolved = ResolvedRunConfig::from_layers(cli, file, env).unwrap();
        assert_eq!(resolved.options.diff.channel_tolerance, 3);
        // No CLI dpi: env wins over file.
        assert_eq!(resolved.options.dpi, 96);
    }

    #[test]
    fn file_fills_gaps() {
        let file = parse(
            "[diff]\nper_page_pixel_tolerance = 40\ngrayscale = true\n[output]\nskip_identical = true\n",
        )
        .unwrap();
        let resolved =
            ResolvedRunConfig::from_layers(CliOverrides::default(), file, no_env).unwrap();
        assert_eq!(resolved.options.diff.per_page_pixel_tolerance, 40);
        assert!(resolved.options.diff.grayscale);
        assert!(resolved.options.skip_identical);
        assert!(!resolved.options.diff.mark_differences);
    }

    #[test]
    fn out_of_range_file_value_is_an_error() {
        let file = parse("[render]\ndpi = 5000\n").unwrap();
        let err = ResolvedRunConfig::from_layers(CliOverrides::default(), file, no_env)
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "render.Invalid dpi: 5000. Valid range is 1-2400 (default: 300)"
        );

        let file = parse("[diff]\nchannel_tolerance = 256\n").unwrap();
        let err = ResolvedRunConfig::from_layers(CliOverrides::default(), file, no_env)
            .unwrap_err();
        assert!(err.to_string().starts_with("diff.Invalid channel-tolerance: 256"));
    }

    #[test]
    fn invalid_env_value_is_an_error() {
        let env = env_from(&[(ENV_DPI, "0")]);
        let err =
            ResolvedRunConfig::from_layers(CliOverrides::default(), FileConfig::default(), env)
                .unwrap_err();
        assert!(format!("{err:#}").contains("PDFDIFF_DPI"));

        let env = env_from(&[(ENV_CHANNEL_TOLERANCE, "lots")]);
        assert!(
            ResolvedRunConfig::from_layers(CliOverrides::default(), FileConfig::default(), env)
                .is_err()
        );
    }

    #[test]
    fn paths_pass_through() {
        let cli = CliOverrides {
            output_diff: Some(PathBuf::from("diff.pdf")),
            report: Some(PathBuf::from("report.json")),
            verbose: true,
            ..Default::default()
        };
        let resolved =
            ResolvedRunConfig::from_layers(cli, FileConfig::default(), no_env).unwrap();
        assert_eq!(resolved.output_diff, Some(PathBuf::from("diff.pdf")));
        assert_eq!(resolved.report, Some(PathBuf::from("report.json")));
        assert!(resolved.options.verbose);
    }
}
