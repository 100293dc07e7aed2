//! Report rendering and spreadsheet export.

pub mod export;
pub mod generator;

pub use export::{build_export_document, suggested_filename, ExportLocale, ExportOptions};
pub use generator::{generate_json_report, generate_markdown_report};
