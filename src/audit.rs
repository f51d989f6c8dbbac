//! Broken-link audit driven by sitemaps
//!
//! Runs discovery, checks each sitemap in discovery order, aggregates the
//! results and maps them to a verdict for the host harness.

use crate::config::Config;
use crate::output::{RunOutcome, RunReport};
use crate::site::SiteTarget;
use crate::sitemap::{Discovery, Fetcher, LinkChecker};
use crate::AuditError;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Message set when the site has no root sitemap
pub const NO_SITEMAP_MESSAGE: &str = "A sitemap.xml file cannot be found.";

/// Verdict reported to the host harness
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Success,
    Warning,
    Failure,
}

impl From<RunOutcome> for Verdict {
    fn from(outcome: RunOutcome) -> Self {
        match outcome {
            RunOutcome::NoSitemapFound => Self::Warning,
            RunOutcome::AllLinksValid => Self::Success,
            RunOutcome::BrokenLinksFound => Self::Failure,
        }
    }
}

/// Result of one audit invocation
#[derive(Debug, Clone, Serialize)]
pub struct AuditOutcome {
    pub verdict: Verdict,

    /// Rendered report text
    pub status: String,

    /// Only set when no sitemap was found
    pub warning_message: Option<String>,

    pub report: RunReport,

    pub checked_at: DateTime<Utc>,
}

impl AuditOutcome {
    /// Builds the outcome for a finished run
    pub fn from_report(report: RunReport, checked_at: DateTime<Utc>) -> Self {
        let warning_message = match report.outcome {
            RunOutcome::NoSitemapFound => Some(NO_SITEMAP_MESSAGE.to_string()),
            _ => None,
        };

        Self {
            verdict: Verdict::from(report.outcome),
            status: report.render(),
            warning_message,
            report,
            checked_at,
        }
    }
}

/// The sitemap broken-link audit
pub struct SitemapAudit {
    discovery: Discovery,
    checker: LinkChecker,
}

impl SitemapAudit {
    /// Creates an audit from configuration
    ///
    /// # Errors
    ///
    /// Fails if the HTTP client cannot be built.
    pub fn new(config: &Config) -> Result<Self, AuditError> {
        let fetcher = Fetcher::new(&config.http, &config.checker)?;
        Ok(Self::with_fetcher(fetcher, config))
    }

    /// Creates an audit around an existing fetcher
    pub fn with_fetcher(fetcher: Fetcher, config: &Config) -> Self {
        Self {
            discovery: Discovery::new(fetcher.clone(), &config.checker),
            checker: LinkChecker::new(fetcher, &config.checker),
        }
    }

    /// Runs the audit against a site
    ///
    /// # Errors
    ///
    /// Only environment-level problems are errors: an unusable base URI or an
    /// inaccessible search root. Everything else ends up in the report.
    pub async fn run(&self, site: &SiteTarget) -> Result<AuditOutcome, AuditError> {
        tracing::info!("Auditing sitemap links of {}", site.base_uri);

        let sitemaps = self
            .discovery
            .discover(&site.base_uri, site.search_root.as_deref())
            .await?;

        let report = if sitemaps.is_empty() {
            tracing::warn!("No sitemap found for {}", site.base_uri);
            RunReport::no_sitemap_found()
        } else {
            let mut reports = Vec::with_capacity(sitemaps.len());
            for sitemap in &sitemaps {
                reports.push(self.checker.check_sitemap(sitemap).await);
            }
            RunReport::aggregate(&reports)
        };

        let outcome = AuditOutcome::from_report(report, Utc::now());
        tracing::info!(
            "Audit finished: {:?} ({} links checked, {} broken)",
            outcome.verdict,
            outcome.report.total_links_checked,
            outcome.report.broken_links.len()
        );

        Ok(outcome)
    }
}
