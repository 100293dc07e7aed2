//! Analysis modules.
//!
//! The aggregation engine shared by the dashboard and the export.

pub mod aggregator;

pub use aggregator::*;
