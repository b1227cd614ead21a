//! CLI argument definitions for the CMS-1500 generator.

use std::io::{self, IsTerminal};
use std::path::PathBuf;

use clap::{ColorChoice, Parser, ValueEnum, value_parser};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;
use tracing::level_filters::LevelFilter;

use crate::logging::{LogConfig, LogFormat};
use crate::types::{BatchConfig, DEFAULT_DPI, DEFAULT_OUTPUT_DIR, DEFAULT_TEMPLATE};

#[derive(Parser)]
#[command(
    name = "cms1500-gen",
    version,
    about = "Generate synthetic CMS-1500 claim forms",
    long_about = "Generate synthetic CMS-1500 (02/12) claim forms for document-processing tests.\n\n\
                  Each form is written as a filled PDF, an optional PNG preview of page one,\n\
                  a full JSON field dump and a core JSON subset. A forms_data.json aggregate\n\
                  describes the whole batch."
)]
pub struct Cli {
    /// Number of forms to generate.
    #[arg(value_name = "COUNT", value_parser = value_parser!(u32).range(1..))]
    pub count: u32,

    /// Fillable CMS-1500 template.
    #[arg(long = "template", value_name = "PATH", default_value = DEFAULT_TEMPLATE)]
    pub template: PathBuf,

    /// Directory receiving the generated files.
    #[arg(long = "output-dir", value_name = "DIR", default_value = DEFAULT_OUTPUT_DIR)]
    pub output_dir: PathBuf,

    /// Seed for reproducible batches (random when omitted).
    #[arg(long = "seed", value_name = "SEED")]
    pub seed: Option<u64>,

    /// Resolution of the PNG previews.
    #[arg(long = "dpi", default_value_t = DEFAULT_DPI, value_parser = value_parser!(u32).range(1..))]
    pub dpi: u32,

    /// Skip PNG previews.
    #[arg(long = "no-preview")]
    pub no_preview: bool,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(long = "log-format", value_enum, default_value = "pretty")]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Include generated patient values in log output.
    #[arg(long = "log-data")]
    pub log_data: bool,
}

impl Cli {
    pub fn batch_config(&self) -> BatchConfig {
        BatchConfig {
            count: self.count,
            template: self.template.clone(),
            output_dir: self.output_dir.clone(),
            seed: self.seed,
            reference_date: None,
            dpi: self.dpi,
            preview: !self.no_preview,
        }
    }

    /// `--log-level` wins over `-v`/`-q`; `RUST_LOG` applies only when
    /// neither is given.
    pub fn log_config(&self) -> LogConfig {
        let level_filter = self
            .log_level
            .map_or_else(|| self.verbosity.tracing_level_filter(), LevelFilter::from);
        let with_ansi = match self.color.color {
            ColorChoice::Always => true,
            ColorChoice::Never => false,
            ColorChoice::Auto => self.log_file.is_none() && io::stderr().is_terminal(),
        };
        LogConfig {
            level_filter,
            use_env_filter: !(self.verbosity.is_present() || self.log_level.is_some()),
            with_ansi,
            format: self.log_format.into(),
            log_file: self.log_file.clone(),
            log_data: self.log_data,
            ..LogConfig::default()
        }
    }
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevelArg> for LevelFilter {
    fn from(level: LogLevelArg) -> Self {
        match level {
            LogLevelArg::Error => LevelFilter::ERROR,
            LogLevelArg::Warn => LevelFilter::WARN,
            LogLevelArg::Info => LevelFilter::INFO,
            LogLevelArg::Debug => LevelFilter::DEBUG,
            LogLevelArg::Trace => LevelFilter::TRACE,
        }
    }
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}

impl From<LogFormatArg> for LogFormat {
    fn from(format: LogFormatArg) -> Self {
        match format {
            LogFormatArg::Pretty => LogFormat::Pretty,
            LogFormatArg::Compact => LogFormat::Compact,
            LogFormatArg::Json => LogFormat::Json,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_argument_uses_defaults() {
        let cli = Cli::try_parse_from(["cms1500-gen", "5"]).unwrap();
        let config = cli.batch_config();
        assert_eq!(config.count, 5);
        assert_eq!(config.template, PathBuf::from("form-cms1500.pdf"));
        assert_eq!(config.output_dir, PathBuf::from("output_forms"));
        assert_eq!(config.dpi, 300);
        assert!(config.preview);
        assert_eq!(config.seed, None);
    }

    #[test]
    fn rejects_non_positive_or_non_numeric_counts() {
        for count in ["0", "-3", "ten", "2.5"] {
            assert!(
                Cli::try_parse_from(["cms1500-gen", count]).is_err(),
                "{count} was accepted"
            );
        }
        assert!(Cli::try_parse_from(["cms1500-gen"]).is_err());
    }

    #[test]
    fn optional_flags_override_defaults() {
        let cli = Cli::try_parse_from([
            "cms1500-gen",
            "2",
            "--template",
            "blank.pdf",
            "--output-dir",
            "out",
            "--seed",
            "42",
            "--dpi",
            "150",
            "--no-preview",
            "--log-data",
        ])
        .unwrap();
        let config = cli.batch_config();
        assert_eq!(config.template, PathBuf::from("blank.pdf"));
        assert_eq!(config.output_dir, PathBuf::from("out"));
        assert_eq!(config.seed, Some(42));
        assert_eq!(config.dpi, 150);
        assert!(!config.preview);
        assert!(cli.log_data);
    }

    #[test]
    fn explicit_log_level_disables_env_filter() {
        let cli = Cli::try_parse_from([
            "cms1500-gen",
            "1",
            "-v",
            "--log-level",
            "debug",
            "--color",
            "never",
        ])
        .unwrap();
        let config = cli.log_config();
        assert_eq!(config.level_filter, LevelFilter::DEBUG);
        assert!(!config.use_env_filter);
        assert!(!config.with_ansi);
    }

    #[test]
    fn default_logging_defers_to_environment() {
        let cli = Cli::try_parse_from(["cms1500-gen", "1", "--log-format", "json"]).unwrap();
        let config = cli.log_config();
        assert_eq!(config.level_filter, LevelFilter::WARN);
        assert!(config.use_env_filter);
        assert_eq!(config.format, LogFormat::Json);
        assert!(!config.log_data);
    }

    #[test]
    fn log_file_turns_off_auto_color() {
        let cli = Cli::try_parse_from(["cms1500-gen", "1", "-q", "--log-file", "run.log"]).unwrap();
        let config = cli.log_config();
        assert_eq!(config.level_filter, LevelFilter::ERROR);
        assert!(!config.use_env_filter);
        assert!(!config.with_ansi);
        assert_eq!(config.log_file, Some(PathBuf::from("run.log")));
    }
}
