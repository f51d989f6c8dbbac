//! Sitemap discovery and link checking
//!
//! This module contains the core of the audit:
//! - HTTP fetching with fixed timeouts and no retries
//! - Sitemap document parsing (index or leaf)
//! - Sitemap discovery (root, index references, filesystem search)
//! - Link checking with a bounded worker pool

mod checker;
mod discovery;
mod fetcher;
mod parser;

pub use checker::LinkChecker;
pub use discovery::{find_sitemap_files, Discovery};
pub use fetcher::{build_http_client, FetchResult, Fetcher};
pub use parser::{parse_sitemap, SitemapKind};

use crate::state::StatusBreakdown;
use serde::Serialize;

/// Where a sitemap reference was found
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SitemapSource {
    /// The conventional `{base}/sitemap.xml`
    Root,
    /// Listed by the root sitemap index
    Index,
    /// A `sitemap.xml` file under the search root
    Filesystem,
}

/// A URL believed to contain a sitemap
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct SitemapRef {
    pub url: String,
    pub source: SitemapSource,
}

impl SitemapRef {
    pub fn new(url: impl Into<String>, source: SitemapSource) -> Self {
        Self {
            url: url.into(),
            source,
        }
    }
}

/// Outcome of fetching one link
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckResult {
    /// The link that was fetched
    pub uri: String,

    /// HTTP status code; `None` when no response was received
    pub status: Option<u16>,

    /// True unless the status is exactly 200
    pub is_broken: bool,
}

impl CheckResult {
    pub fn new(uri: impl Into<String>, status: Option<u16>) -> Self {
        Self {
            uri: uri.into(),
            status,
            is_broken: status != Some(200),
        }
    }
}

/// Aggregate over one sitemap
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SitemapReport {
    /// The sitemap these links came from
    pub sitemap: String,

    /// Number of links fetched
    pub links_checked: usize,

    /// Broken links, in document order
    pub broken: Vec<CheckResult>,

    /// Wall-clock time of the fetch loop, rounded to tenths of a second
    pub elapsed_seconds: f64,

    /// Links per status class
    pub breakdown: StatusBreakdown,
}

impl SitemapReport {
    /// A report for a sitemap that contributed no links
    pub fn empty(sitemap: impl Into<String>) -> Self {
        Self {
            sitemap: sitemap.into(),
            links_checked: 0,
            broken: Vec::new(),
            elapsed_seconds: 0.0,
            breakdown: StatusBreakdown::default(),
        }
    }

    /// Builds a report from ordered check results
    pub fn from_results(
        sitemap: impl Into<String>,
        results: Vec<CheckResult>,
        elapsed_seconds: f64,
    ) -> Self {
        let mut breakdown = StatusBreakdown::default();
        for result in &results {
            breakdown.record(result.status);
        }

        let links_checked = results.len();
        let broken = results.into_iter().filter(|r| r.is_broken).collect();

        Self {
            sitemap: sitemap.into(),
            links_checked,
            broken,
            elapsed_seconds: round_tenths(elapsed_seconds),
            breakdown,
        }
    }
}

/// Rounds a number of seconds to one decimal place
pub(crate) fn round_tenths(seconds: f64) -> f64 {
    (seconds * 10.0).round() / 10.0
}
