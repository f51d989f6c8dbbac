//! Link checker
//!
//! Checks every link of one leaf sitemap. One task per link is spawned and a
//! semaphore bounds how many fetches are in flight; each result is tagged with
//! the link's position in the document and the results are put back in
//! document order once every task finishes, so the report does not depend on
//! completion order.

use crate::config::CheckerConfig;
use crate::sitemap::fetcher::{FetchResult, Fetcher};
use crate::sitemap::parser::{parse_sitemap, SitemapKind};
use crate::sitemap::{CheckResult, SitemapRef, SitemapReport};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use url::Url;

/// Fetches the links of a sitemap and records the broken ones
pub struct LinkChecker {
    fetcher: Fetcher,
    concurrency: usize,
    max_entries: usize,
}

impl LinkChecker {
    /// Creates a link checker
    pub fn new(fetcher: Fetcher, config: &CheckerConfig) -> Self {
        Self {
            fetcher,
            concurrency: config.concurrency.max(1),
            max_entries: config.max_sitemap_entries,
        }
    }

    /// Checks one sitemap in isolation
    ///
    /// A sitemap that cannot be fetched with HTTP 200, cannot be parsed, or
    /// turns out to be an index contributes an empty report.
    pub async fn check_sitemap(&self, sitemap: &SitemapRef) -> SitemapReport {
        let body = match self.fetcher.fetch_document(&sitemap.url).await {
            FetchResult::Success { body } => body,
            FetchResult::HttpError { status_code } => {
                tracing::warn!("Skipping sitemap {}: HTTP {}", sitemap.url, status_code);
                return SitemapReport::empty(&sitemap.url);
            }
            FetchResult::NetworkError { error } => {
                tracing::warn!("Skipping sitemap {}: {}", sitemap.url, error);
                return SitemapReport::empty(&sitemap.url);
            }
            FetchResult::BodyError { error } => {
                tracing::warn!("Skipping sitemap {}: {}", sitemap.url, error);
                return SitemapReport::empty(&sitemap.url);
            }
        };

        let entries = match parse_sitemap(&body, self.max_entries) {
            Ok(SitemapKind::Leaf { entries }) => entries,
            Ok(SitemapKind::Index { entries }) => {
                tracing::debug!(
                    "Sitemap {} is an index of {} sitemaps; no links to check",
                    sitemap.url,
                    entries.len()
                );
                return SitemapReport::empty(&sitemap.url);
            }
            Err(e) => {
                tracing::warn!("Skipping sitemap {}: {}", sitemap.url, e);
                return SitemapReport::empty(&sitemap.url);
            }
        };

        // An entry that does not resolve is kept as written and fails its check
        let links = match Url::parse(&sitemap.url) {
            Ok(document) => entries
                .into_iter()
                .map(|entry| match document.join(&entry) {
                    Ok(url) => url.to_string(),
                    Err(_) => entry,
                })
                .collect(),
            Err(_) => entries,
        };

        tracing::info!("Checking {} link(s) from {}", links.len(), sitemap.url);

        let start = Instant::now();
        let results = self.check_links(links).await;
        let report =
            SitemapReport::from_results(&sitemap.url, results, start.elapsed().as_secs_f64());

        tracing::info!(
            "Sitemap {}: {} link(s) checked, {} broken, {:.1}s",
            sitemap.url,
            report.links_checked,
            report.broken.len(),
            report.elapsed_seconds
        );

        report
    }

    /// Fetches every link and returns one result per link, in input order
    pub async fn check_links(&self, links: Vec<String>) -> Vec<CheckResult> {
        if links.is_empty() {
            return Vec::new();
        }

        let semaphore = Arc::new(Semaphore::new(self.concurrency));
        let mut tasks = JoinSet::new();

        for (index, link) in links.iter().cloned().enumerate() {
            let fetcher = self.fetcher.clone();
            let semaphore = Arc::clone(&semaphore);
            tasks.spawn(async move {
                let status = match semaphore.acquire_owned().await {
                    Ok(_permit) => check_link(&fetcher, &link).await,
                    Err(_) => None,
                };
                (index, CheckResult::new(link, status))
            });
        }

        let mut slots: Vec<Option<CheckResult>> = vec![None; links.len()];
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((index, result)) => {
                    if result.is_broken {
                        tracing::debug!(
                            "Broken link {} (status: {:?})",
                            result.uri,
                            result.status
                        );
                    }
                    slots[index] = Some(result);
                }
                Err(e) => tracing::error!("Link check task failed: {}", e),
            }
        }

        // A link whose task died is reported as having no response
        slots
            .into_iter()
            .zip(links)
            .map(|(slot, link)| slot.unwrap_or_else(|| CheckResult::new(link, None)))
            .collect()
    }
}

/// Fetches one link; a link that is not a valid URL never gets a response
async fn check_link(fetcher: &Fetcher, link: &str) -> Option<u16> {
    if let Err(e) = Url::parse(link) {
        tracing::warn!("Link '{}' is not a valid URL: {}", link, e);
        return None;
    }
    fetcher.fetch_status(link).await
}
