//! Sitemap-Audit main entry point
//!
//! This is the command-line interface for the sitemap broken-link audit.

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use sitemap_audit::config::{load_config_with_hash, Config};
use sitemap_audit::{DrushStatus, SiteResolver, SitemapAudit, StaticSite, Verdict};
use tracing_subscriber::EnvFilter;

/// Sitemap-Audit: find broken links listed in a site's sitemaps
///
/// Discovers the root sitemap.xml, any sitemaps it indexes, and sitemap.xml
/// files under the site's document root, then fetches every listed link.
#[derive(Parser, Debug)]
#[command(name = "sitemap-audit")]
#[command(version)]
#[command(about = "Sitemap-driven broken link audit", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Base URI of the site (overrides the configuration)
    #[arg(long, value_name = "URI")]
    base_uri: Option<String>,

    /// Directory searched for sitemap.xml files (overrides the configuration)
    #[arg(long, value_name = "DIR")]
    search_root: Option<String>,

    /// Resolve the site from `drush status --format=json` output saved to a file
    #[arg(long, value_name = "FILE")]
    drush_status: Option<PathBuf>,

    /// Print the outcome as JSON
    #[arg(long)]
    json: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    match run(cli).await {
        Ok(Verdict::Success) | Ok(Verdict::Warning) => ExitCode::SUCCESS,
        Ok(Verdict::Failure) => ExitCode::from(1),
        Err(e) => {
            tracing::error!("Audit failed: {:#}", e);
            eprintln!("Error: {:#}", e);
            ExitCode::from(2)
        }
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("sitemap_audit=info,warn"),
            1 => EnvFilter::new("sitemap_audit=debug,info"),
            2 => EnvFilter::new("sitemap_audit=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> anyhow::Result<Verdict> {
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("loading {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => {
            tracing::info!("No configuration file given, using defaults");
            Config::default()
        }
    };

    if let Some(base_uri) = cli.base_uri {
        config.site.base_uri = Some(base_uri);
    }
    if let Some(search_root) = cli.search_root {
        config.site.search_root = Some(search_root);
    }
    sitemap_audit::config::validate(&config).context("invalid configuration")?;

    let site = match &cli.drush_status {
        Some(path) => {
            let mut status = DrushStatus::from_file(path)
                .with_context(|| format!("reading drush status from {}", path.display()))?
                .with_search_template(config.site.search_root.clone());
            // An explicit base URI wins over whatever drush reports
            if let Some(base_uri) = &config.site.base_uri {
                status.uri = Some(base_uri.clone());
            }
            status.resolve()?
        }
        None => StaticSite::from_config(&config.site).resolve()?,
    };

    let audit = SitemapAudit::new(&config)?;
    let outcome = audit.run(&site).await?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    } else {
        if let Some(warning) = &outcome.warning_message {
            println!("WARNING: {}", warning);
        }
        println!("{}", outcome.status);
    }

    Ok(outcome.verdict)
}
