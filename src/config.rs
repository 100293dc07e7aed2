//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.surveylens.toml` files.

use crate::report::export::{default_date_format, ExportLocale};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default configuration file name.
pub const CONFIG_FILE_NAME: &str = ".surveylens.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Question catalog settings.
    #[serde(default)]
    pub catalog: CatalogConfig,

    /// Spreadsheet export settings.
    #[serde(default)]
    pub export: ExportConfig,

    /// Dashboard access settings.
    #[serde(default)]
    pub access: AccessConfig,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Default dashboard report path.
    #[serde(default = "default_output")]
    pub output: String,

    /// Enable verbose logging by default.
    #[serde(default)]
    pub verbose: bool,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            output: default_output(),
            verbose: false,
        }
    }
}

fn default_output() -> String {
    "survey_dashboard.md".to_string()
}

/// Question catalog settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Catalog file (JSON or TOML). The built-in catalog is used when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

/// Spreadsheet export settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Write the spreadsheet on every run.
    #[serde(default)]
    pub enabled: bool,

    /// Directory the spreadsheet is written to.
    #[serde(default = "default_export_directory")]
    pub directory: PathBuf,

    /// Label language for sheets and headers.
    #[serde(default)]
    pub locale: ExportLocale,

    /// chrono format string for exported dates.
    #[serde(default = "default_date_format")]
    pub date_format: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            directory: default_export_directory(),
            locale: ExportLocale::default(),
            date_format: default_date_format(),
        }
    }
}

fn default_export_directory() -> PathBuf {
    PathBuf::from(".")
}

/// Dashboard access settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AccessConfig {
    /// E-mail addresses allowed to view analytics. Empty allows everyone.
    #[serde(default)]
    pub allowed_viewers: Vec<String>,
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load configuration from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        let default_path = Path::new(CONFIG_FILE_NAME);

        if default_path.exists() {
            Ok(Some(Self::load(default_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments take precedence over config file settings.
    /// This method only overrides config when CLI provides explicit values.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        if let Some(ref output) = args.output {
            self.general.output = output.display().to_string();
        }

        if let Some(ref catalog) = args.catalog {
            self.catalog.path = Some(catalog.clone());
        }

        // Giving an export directory implies exporting
        if let Some(ref dir) = args.export_dir {
            self.export.directory = dir.clone();
            self.export.enabled = true;
        }
        if args.export {
            self.export.enabled = true;
        }
        if let Some(locale) = args.locale {
            self.export.locale = locale;
        }
        if let Some(ref date_format) = args.date_format {
            self.export.date_format = date_format.clone();
        }

        if args.verbose {
            self.general.verbose = true;
        }
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.general.output, "survey_dashboard.md");
        assert!(config.catalog.path.is_none());
        assert!(!config.export.enabled);
        assert_eq!(config.export.locale, ExportLocale::English);
        assert_eq!(config.export.date_format, "%Y-%m-%d");
        assert!(config.access.allowed_viewers.is_empty());
    }

    #[test]
    fn test_parse_config() {
        let toml_content = r#"
[general]
output = "dashboard.json"
verbose = true

[catalog]
path = "questions.toml"

[export]
enabled = true
directory = "reports"
locale = "ar"
date_format = "%d/%m/%Y"

[access]
allowed_viewers = ["coordinator@example.com"]
"#;

        let config: Config = toml::from_str(toml_content).unwrap();
        assert_eq!(config.general.output, "dashboard.json");
        assert!(config.general.verbose);
        assert_eq!(config.catalog.path, Some(PathBuf::from("questions.toml")));
        assert!(config.export.enabled);
        assert_eq!(config.export.directory, PathBuf::from("reports"));
        assert_eq!(config.export.locale, ExportLocale::Arabic);
        assert_eq!(config.export.date_format, "%d/%m/%Y");
        assert_eq!(config.access.allowed_viewers, vec!["coordinator@example.com"]);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: Config = toml::from_str("[export]\nenabled = true\n").unwrap();
        assert!(config.export.enabled);
        assert_eq!(config.export.directory, PathBuf::from("."));
        assert_eq!(config.general.output, "survey_dashboard.md");
    }

    #[test]
    fn test_default_toml_generation() {
        let toml_str = Config::default_toml();
        assert!(!toml_str.is_empty());
        assert!(toml_str.contains("[general]"));
        assert!(toml_str.contains("[export]"));
        assert!(toml_str.contains("[access]"));

        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.export.locale, ExportLocale::English);
    }
}
