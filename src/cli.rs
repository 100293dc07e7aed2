//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use crate::report::export::is_valid_date_format;
use crate::report::ExportLocale;
use clap::Parser;
use std::path::PathBuf;

/// SurveyLens - star-rating survey analytics
///
/// Aggregate student survey responses into per-question, per-section and
/// per-college statistics, and export them as an Excel workbook.
///
/// Examples:
///   surveylens --responses responses.json --answers answers.json
///   surveylens -r responses.json -a answers.json --format json -o dashboard.json
///   surveylens -r responses.json -a answers.json --export-dir reports --locale ar
///   surveylens --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// JSON file containing the survey responses
    #[arg(short, long, value_name = "FILE", required_unless_present = "init_config")]
    pub responses: Option<PathBuf>,

    /// JSON file containing the per-question answers
    #[arg(short, long, value_name = "FILE", required_unless_present = "init_config")]
    pub answers: Option<PathBuf>,

    /// Question catalog file (JSON or TOML)
    ///
    /// If not specified, the built-in 15-question catalog is used.
    #[arg(long, value_name = "FILE")]
    pub catalog: Option<PathBuf>,

    /// Output file path for the dashboard report
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Dashboard output format (markdown, json)
    #[arg(long, default_value = "markdown", value_name = "FORMAT")]
    pub format: OutputFormat,

    /// Also write the Excel workbook
    #[arg(short, long)]
    pub export: bool,

    /// Directory for the Excel workbook (implies --export)
    #[arg(long, value_name = "DIR")]
    pub export_dir: Option<PathBuf>,

    /// Language of the workbook's sheet names and headers
    #[arg(long, value_name = "LOCALE")]
    pub locale: Option<ExportLocale>,

    /// chrono format for dates in the workbook (e.g. "%d/%m/%Y")
    #[arg(long, value_name = "FORMAT")]
    pub date_format: Option<String>,

    /// E-mail address of the person viewing the analytics
    #[arg(long, value_name = "EMAIL", env = "SURVEYLENS_VIEWER")]
    pub viewer: Option<String>,

    /// Path to configuration file
    ///
    /// If not specified, looks for .surveylens.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(short, long)]
    pub quiet: bool,

    /// Generate a default .surveylens.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

/// Output format for the dashboard report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Markdown format (default)
    #[default]
    Markdown,
    /// JSON format
    Json,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        // Skip validation for --init-config
        if self.init_config {
            return Ok(());
        }

        for (flag, path) in [("--responses", &self.responses), ("--answers", &self.answers)] {
            match path {
                None => return Err(format!("{} is required", flag)),
                Some(p) if !p.is_file() => {
                    return Err(format!("{} file does not exist: {}", flag, p.display()));
                }
                Some(_) => {}
            }
        }

        if let Some(ref catalog) = self.catalog {
            if !catalog.is_file() {
                return Err(format!(
                    "Catalog file does not exist: {}",
                    catalog.display()
                ));
            }
        }

        if let Some(ref dir) = self.export_dir {
            if dir.exists() && !dir.is_dir() {
                return Err(format!(
                    "Export path is not a directory: {}",
                    dir.display()
                ));
            }
        }

        if let Some(ref date_format) = self.date_format {
            if !is_valid_date_format(date_format) {
                return Err(format!("Invalid date format: {:?}", date_format));
            }
        }

        // Check for conflicting options
        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    ///
    /// `config_verbose` is the `[general] verbose` setting; `--quiet` wins
    /// over both.
    pub fn log_level(&self, config_verbose: bool) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose || config_verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }

    /// Human-readable description of the input files.
    pub fn source_label(&self) -> String {
        let name = |p: &Option<PathBuf>| {
            p.as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_default()
        };
        format!("{} + {}", name(&self.responses), name(&self.answers))
    }
}
