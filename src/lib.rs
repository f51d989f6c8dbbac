//! Sitemap-Audit: broken-link detection driven by a site's sitemaps
//!
//! This crate discovers every sitemap a site publishes (the root `sitemap.xml`,
//! the sitemaps an index points at, and `sitemap.xml` files found on disk under
//! the site's document root), fetches every listed link, and turns the outcome
//! into a pass/fail/warning verdict with a human-readable report.

pub mod audit;
pub mod config;
pub mod output;
pub mod site;
pub mod sitemap;
pub mod state;
pub mod url;

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for Sitemap-Audit operations
///
/// Only environment-level failures end up here. Per-link and per-sitemap
/// failures are absorbed into the report instead.
#[derive(Debug, Error)]
pub enum AuditError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("No base URI is available for the site")]
    MissingBaseUri,

    #[error("Invalid base URI '{uri}': {message}")]
    InvalidBaseUri { uri: String, message: String },

    #[error("Sitemap search root {} is not accessible: {source}", path.display())]
    SearchRootInaccessible {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("Site resolution error: {0}")]
    Site(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing domain in URL")]
    MissingDomain,

    #[error("URL cannot carry a path: {0}")]
    CannotBeABase(String),
}

/// Errors raised while reading a single sitemap document
///
/// These never abort a run: the document is treated as having no entries.
#[derive(Debug, Error)]
pub enum SitemapError {
    #[error("Malformed sitemap XML: {0}")]
    Malformed(String),

    #[error("Sitemap body exceeds {limit} bytes")]
    TooLarge { limit: u64 },

    #[error("Failed to read sitemap body: {0}")]
    Body(String),
}

/// Result type alias for Sitemap-Audit operations
pub type Result<T> = std::result::Result<T, AuditError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use audit::{AuditOutcome, SitemapAudit, Verdict};
pub use config::Config;
pub use output::{RunOutcome, RunReport};
pub use site::{DrushStatus, SiteResolver, SiteTarget, StaticSite};
pub use sitemap::{CheckResult, SitemapKind, SitemapRef, SitemapReport};
pub use state::{StatusBreakdown, StatusClass};
