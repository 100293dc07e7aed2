//! SurveyLens - star-rating survey analytics
//!
//! A CLI tool that aggregates student survey responses into dashboard
//! statistics and exports them as an Excel workbook.
//!
//! Exit codes:
//!   0 - Success
//!   1 - Runtime error (bad input, config, export encoding failure, etc.)
//!   3 - Viewer not allowed to see analytics

mod access;
mod analysis;
mod catalog;
mod cli;
mod config;
mod error;
mod input;
mod models;
mod report;

use anyhow::{Context, Result};
use catalog::Catalog;
use chrono::Utc;
use cli::{Args, OutputFormat};
use config::{Config, CONFIG_FILE_NAME};
use error::SurveyError;
use input::SurveySnapshot;
use models::{DashboardReport, ReportMetadata};
use report::ExportOptions;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, error, info};
use tracing_subscriber::FmtSubscriber;

fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        return handle_init_config();
    }

    // Config is read first so its verbosity applies to logging
    let (mut config, config_origin) = match load_config(&args) {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("\n❌ Error: {:#}", e);
            std::process::exit(1);
        }
    };
    config.merge_with_args(&args);

    init_logging(args.log_level(config.general.verbose));

    info!("SurveyLens v{}", env!("CARGO_PKG_VERSION"));
    info!("{}", config_origin);
    debug!("Arguments: {:?}", args);

    if let Err(e) = run(args, config) {
        error!("Run failed: {:#}", e);
        eprintln!("\n❌ Error: {:#}", e);

        let code = e
            .downcast_ref::<SurveyError>()
            .map(SurveyError::exit_code)
            .unwrap_or(1);
        std::process::exit(code);
    }

    Ok(())
}

/// Handle --init-config: generate a default .surveylens.toml.
fn handle_init_config() -> Result<()> {
    let path = Path::new(CONFIG_FILE_NAME);

    if path.exists() {
        eprintln!("⚠️  {} already exists. Remove it first or edit it manually.", CONFIG_FILE_NAME);
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content)
        .with_context(|| format!("Failed to write {}", CONFIG_FILE_NAME))?;

    println!("✅ Created {} with default settings.", CONFIG_FILE_NAME);
    println!("   Edit it to set the catalog, export locale, and allowed viewers.");
    Ok(())
}

/// Initialize logging based on verbosity settings.
fn init_logging(level: tracing::Level) {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
    }
}

/// Load the snapshot, compute analytics, and write the outputs.
fn run(args: Args, config: Config) -> Result<()> {
    let start_time = Instant::now();

    // Access is checked before any data is read
    let policy = access::policy_from_config(&config.access.allowed_viewers);
    policy.authorize(args.viewer.as_deref())?;

    let catalog = load_catalog(&config)?;
    info!(
        "Catalog: {} questions in {} sections",
        catalog.len(),
        catalog.sections().len()
    );

    let (responses_path, answers_path) = match (&args.responses, &args.answers) {
        (Some(r), Some(a)) => (r, a),
        _ => {
            return Err(SurveyError::InvalidInput(
                "both --responses and --answers are required".to_string(),
            )
            .into())
        }
    };

    println!("📥 Loading survey snapshot...");
    let snapshot = SurveySnapshot::load(responses_path, answers_path)?;
    snapshot.log_diagnostics(&catalog);

    println!("🔬 Computing analytics...");
    let analytics =
        analysis::compute_analytics(&snapshot.responses, &snapshot.answers, &catalog);

    let generated_at = Utc::now();
    let dashboard = DashboardReport {
        metadata: ReportMetadata {
            generated_at,
            source: args.source_label(),
            catalog_questions: catalog.len(),
            catalog_sections: catalog.sections().len(),
        },
        analytics,
        questions: catalog.questions().to_vec(),
        responses: snapshot.responses.clone(),
    };

    let output = match args.format {
        OutputFormat::Json => report::generate_json_report(&dashboard)?,
        OutputFormat::Markdown => report::generate_markdown_report(&dashboard),
    };

    let output_path = PathBuf::from(&config.general.output);
    std::fs::write(&output_path, &output)
        .with_context(|| format!("Failed to write report to {}", output_path.display()))?;
    info!("Dashboard written to {}", output_path.display());

    let export_path = if config.export.enabled {
        Some(write_export(&snapshot, &catalog, &config, generated_at)?)
    } else {
        None
    };

    // Print summary
    let analytics = &dashboard.analytics;
    println!("\n📊 Survey Summary:");
    println!("   Responses: {}", analytics.total_responses);
    println!("   Answers: {}", analytics.total_answers);
    println!("   Overall average: {:.2}", analytics.overall_average);
    for stat in &analytics.section_stats {
        println!("   - {}: {:.2}", stat.section, stat.average);
    }
    println!("   Duration: {:.2}s", start_time.elapsed().as_secs_f64());
    println!("\n✅ Dashboard saved to: {}", output_path.display());
    if let Some(path) = export_path {
        println!("✅ Workbook saved to: {}", path.display());
    }

    Ok(())
}

/// Build, encode and write the Excel workbook. Returns the written path.
fn write_export(
    snapshot: &SurveySnapshot,
    catalog: &Catalog,
    config: &Config,
    generated_at: chrono::DateTime<Utc>,
) -> Result<PathBuf> {
    println!("📝 Generating workbook...");

    let options = ExportOptions {
        generated_at,
        date_format: config.export.date_format.clone(),
        locale: config.export.locale,
    };

    let document =
        report::build_export_document(&snapshot.responses, &snapshot.answers, catalog, &options);
    let bytes = document.encode()?;
    debug!("Encoded workbook: {} bytes", bytes.len());

    let dir = &config.export.directory;
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create export directory {}", dir.display()))?;

    let path = dir.join(report::suggested_filename(generated_at.date_naive()));
    std::fs::write(&path, &bytes)
        .with_context(|| format!("Failed to write workbook to {}", path.display()))?;
    info!("Workbook written to {}", path.display());

    Ok(path)
}

/// Load configuration from file or use defaults.
///
/// Runs before logging is set up, so it returns a description of where the
/// config came from instead of logging it.
fn load_config(args: &Args) -> Result<(Config, String)> {
    // Try explicit config path
    if let Some(ref config_path) = args.config {
        let config = Config::load(config_path)?;
        return Ok((config, format!("Loaded config from: {}", config_path.display())));
    }

    // Try default location
    match Config::load_default() {
        Ok(Some(config)) => Ok((config, format!("Loaded default config from {}", CONFIG_FILE_NAME))),
        Ok(None) => Ok((Config::default(), "No config file found, using defaults".to_string())),
        Err(e) => {
            eprintln!("⚠️  Failed to load config: {:#}", e);
            Ok((Config::default(), "Using default config".to_string()))
        }
    }
}

/// Load the configured catalog, falling back to the built-in one.
fn load_catalog(config: &Config) -> Result<Catalog> {
    match config.catalog.path {
        Some(ref path) => {
            info!("Loading catalog from: {}", path.display());
            Catalog::load(path)
        }
        None => {
            debug!("Using built-in catalog");
            Ok(Catalog::builtin())
        }
    }
}
