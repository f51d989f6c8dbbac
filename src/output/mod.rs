//! Output module for audit reports
//!
//! This module handles:
//! - Aggregating per-sitemap results into a run report
//! - Rendering the human-readable report text

mod report;

pub use report::{format_broken_link, RunOutcome, RunReport};
