//! Run report aggregation
//!
//! Folds the per-sitemap reports of one audit run into a single summary.

use crate::sitemap::{round_tenths, CheckResult, SitemapReport};
use crate::state::StatusBreakdown;
use serde::Serialize;

/// Overall outcome of one audit run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunOutcome {
    /// The root sitemap could not be fetched with HTTP 200
    NoSitemapFound,
    /// Every checked link returned HTTP 200
    AllLinksValid,
    /// At least one link was broken
    BrokenLinksFound,
}

/// Aggregate over all sitemaps processed in one run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunReport {
    /// Number of sitemap documents processed
    pub sitemaps_checked: usize,

    /// Sum of `links_checked` over all sitemaps
    pub total_links_checked: usize,

    /// Sum of elapsed time over all sitemaps, in seconds
    pub total_elapsed_seconds: f64,

    /// Broken links in discovery order, then document order
    pub broken_links: Vec<CheckResult>,

    /// Links per status class over the whole run
    pub breakdown: StatusBreakdown,

    pub outcome: RunOutcome,
}

impl RunReport {
    /// The report of a run where no root sitemap was found
    pub fn no_sitemap_found() -> Self {
        Self {
            sitemaps_checked: 0,
            total_links_checked: 0,
            total_elapsed_seconds: 0.0,
            broken_links: Vec::new(),
            breakdown: StatusBreakdown::default(),
            outcome: RunOutcome::NoSitemapFound,
        }
    }

    /// Merges per-sitemap reports, in the order given
    pub fn aggregate(reports: &[SitemapReport]) -> Self {
        let mut total_links_checked = 0;
        let mut total_elapsed_seconds = 0.0;
        let mut broken_links = Vec::new();
        let mut breakdown = StatusBreakdown::default();

        for report in reports {
            total_links_checked += report.links_checked;
            total_elapsed_seconds += report.elapsed_seconds;
            broken_links.extend(report.broken.iter().cloned());
            breakdown.merge(&report.breakdown);
        }

        let outcome = if broken_links.is_empty() {
            RunOutcome::AllLinksValid
        } else {
            RunOutcome::BrokenLinksFound
        };

        Self {
            sitemaps_checked: reports.len(),
            total_links_checked,
            total_elapsed_seconds: round_tenths(total_elapsed_seconds),
            broken_links,
            breakdown,
            outcome,
        }
    }

    /// Renders the report as human-readable text
    ///
    /// ```text
    /// Total number of links checked: 4
    /// Total execution time: 1.2 seconds
    ///
    /// Broken links:
    /// 1. https://example.com/missing (STATUS: 404)
    /// 2. https://down.example/ (STATUS: ERROR)
    /// ```
    pub fn render(&self) -> String {
        if self.outcome == RunOutcome::NoSitemapFound {
            return "No sitemap.xml was found; no links were checked.".to_string();
        }

        let mut text = String::new();
        text.push_str(&format!(
            "Total number of links checked: {}\n",
            self.total_links_checked
        ));
        text.push_str(&format!(
            "Total execution time: {:.1} seconds\n",
            self.total_elapsed_seconds
        ));

        if self.total_links_checked > 0 {
            text.push_str("\nResponses:\n");
            for class in crate::state::StatusClass::all() {
                let count = self.breakdown.get(class);
                if count > 0 {
                    text.push_str(&format!("- {}: {}\n", class, count));
                }
            }
        }

        if !self.broken_links.is_empty() {
            text.push_str("\nBroken links:\n");
            for (n, link) in self.broken_links.iter().enumerate() {
                text.push_str(&format!("{}\n", format_broken_link(n + 1, link)));
            }
        }

        text.trim_end().to_string()
    }
}

/// Formats one numbered broken-link line
pub fn format_broken_link(n: usize, link: &CheckResult) -> String {
    let status = match link.status {
        Some(code) => code.to_string(),
        None => "ERROR".to_string(),
    };
    format!("{}. {} (STATUS: {})", n, link.uri, status)
}
