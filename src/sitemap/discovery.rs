//! Sitemap discovery
//!
//! Discovery produces the ordered list of sitemap documents to check:
//!
//! 1. `{base}/sitemap.xml` (discovery stops here if it is not HTTP 200)
//! 2. every sitemap listed by that document when it is an index
//!    (one level only, indexes of indexes are not followed)
//! 3. every `sitemap.xml` file under the search root, mapped to a URL under
//!    the base URI
//!
//! A sitemap URL appears at most once; the first source to report it wins.

use crate::config::CheckerConfig;
use crate::sitemap::fetcher::{FetchResult, Fetcher};
use crate::sitemap::parser::{parse_sitemap, SitemapKind};
use crate::sitemap::{SitemapRef, SitemapSource};
use crate::url::{normalize_base_uri, relative_path_to_url, root_sitemap_url, SITEMAP_FILE_NAME};
use crate::AuditError;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use url::Url;

/// Locates the sitemap documents of a site
pub struct Discovery {
    fetcher: Fetcher,
    max_entries: usize,
    max_search_depth: usize,
}

impl Discovery {
    /// Creates a discovery engine
    pub fn new(fetcher: Fetcher, config: &CheckerConfig) -> Self {
        Self {
            fetcher,
            max_entries: config.max_sitemap_entries,
            max_search_depth: config.max_search_depth,
        }
    }

    /// Discovers the sitemaps of the site at `base_uri`
    ///
    /// Returns an empty list when the root sitemap is not reachable with
    /// HTTP 200.
    ///
    /// # Errors
    ///
    /// * `AuditError::InvalidBaseUri` - the base URI cannot be normalized
    /// * `AuditError::SearchRootInaccessible` - the search root is not a readable directory
    pub async fn discover(
        &self,
        base_uri: &str,
        search_root: Option<&Path>,
    ) -> Result<Vec<SitemapRef>, AuditError> {
        let base = normalize_base_uri(base_uri).map_err(|e| AuditError::InvalidBaseUri {
            uri: base_uri.to_string(),
            message: e.to_string(),
        })?;
        let root_url = root_sitemap_url(&base).map_err(|e| AuditError::InvalidBaseUri {
            uri: base_uri.to_string(),
            message: e.to_string(),
        })?;

        // Environment problems are reported even when the site has no sitemap
        let local_files = match search_root {
            Some(root) => find_sitemap_files(root, self.max_search_depth).map_err(|source| {
                AuditError::SearchRootInaccessible {
                    path: root.to_path_buf(),
                    source,
                }
            })?,
            None => Vec::new(),
        };

        tracing::info!("Fetching root sitemap {}", root_url);
        let body = match self.fetcher.fetch_document(root_url.as_str()).await {
            FetchResult::Success { body } => Some(body),
            FetchResult::BodyError { error } => {
                tracing::warn!("Root sitemap {} could not be read: {}", root_url, error);
                None
            }
            FetchResult::HttpError { status_code } => {
                tracing::warn!("Root sitemap {} returned HTTP {}", root_url, status_code);
                return Ok(Vec::new());
            }
            FetchResult::NetworkError { error } => {
                tracing::warn!("Root sitemap {} is unreachable: {}", root_url, error);
                return Ok(Vec::new());
            }
        };

        let mut found = DiscoveredSitemaps::default();
        found.push(SitemapRef::new(root_url.as_str(), SitemapSource::Root));

        if let Some(body) = body {
            match parse_sitemap(&body, self.max_entries) {
                Ok(SitemapKind::Index { entries }) => {
                    tracing::info!("Root sitemap is an index of {} sitemaps", entries.len());
                    for entry in entries {
                        if let Some(url) = resolve_entry(&root_url, &entry) {
                            found.push(SitemapRef::new(url, SitemapSource::Index));
                        }
                    }
                }
                Ok(SitemapKind::Leaf { .. }) => {}
                Err(e) => tracing::warn!("Root sitemap {} is not usable: {}", root_url, e),
            }
        }

        for relative in local_files {
            match relative_path_to_url(&base, &relative) {
                Ok(url) => found.push(SitemapRef::new(url.as_str(), SitemapSource::Filesystem)),
                Err(e) => tracing::warn!(
                    "Skipping local sitemap {}: {}",
                    relative.display(),
                    e
                ),
            }
        }

        let sitemaps = found.into_vec();
        for sitemap in &sitemaps {
            tracing::debug!("Discovered sitemap {} ({:?})", sitemap.url, sitemap.source);
        }
        tracing::info!("Discovered {} sitemap(s)", sitemaps.len());

        Ok(sitemaps)
    }
}

/// Ordered, de-duplicated collection of sitemap references
#[derive(Default)]
struct DiscoveredSitemaps {
    seen: HashSet<String>,
    ordered: Vec<SitemapRef>,
}

impl DiscoveredSitemaps {
    fn push(&mut self, sitemap: SitemapRef) {
        if self.seen.insert(sitemap.url.clone()) {
            self.ordered.push(sitemap);
        } else {
            tracing::debug!("Sitemap {} already discovered", sitemap.url);
        }
    }

    fn into_vec(self) -> Vec<SitemapRef> {
        self.ordered
    }
}

/// Recursively finds files named `sitemap.xml` under `root`
///
/// Returns paths relative to `root`, sorted so that repeated runs over an
/// unchanged tree give the same order. Directory symlinks are not followed
/// and directories below `max_depth` levels are not visited.
///
/// # Errors
///
/// Fails if `root` itself is not a readable directory. Unreadable
/// subdirectories are skipped with a warning.
pub fn find_sitemap_files(root: &Path, max_depth: usize) -> std::io::Result<Vec<PathBuf>> {
    let metadata = std::fs::metadata(root)?;
    if !metadata.is_dir() {
        return Err(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            "not a directory",
        ));
    }

    let mut found = Vec::new();
    let entries = read_sorted_dir(root)?;
    walk_entries(root, entries, 0, max_depth, &mut found);
    Ok(found)
}

fn walk_entries(
    root: &Path,
    entries: Vec<std::fs::DirEntry>,
    depth: usize,
    max_depth: usize,
    found: &mut Vec<PathBuf>,
) {
    for entry in entries {
        let path = entry.path();
        let file_type = match entry.file_type() {
            Ok(file_type) => file_type,
            Err(e) => {
                tracing::warn!("Cannot stat {}: {}", path.display(), e);
                continue;
            }
        };

        if file_type.is_dir() {
            if depth >= max_depth {
                tracing::debug!("Not descending into {} (depth limit)", path.display());
                continue;
            }
            match read_sorted_dir(&path) {
                Ok(children) => walk_entries(root, children, depth + 1, max_depth, found),
                Err(e) => tracing::warn!("Skipping unreadable directory {}: {}", path.display(), e),
            }
        } else if entry.file_name() == SITEMAP_FILE_NAME && path.is_file() {
            if let Ok(relative) = path.strip_prefix(root) {
                found.push(relative.to_path_buf());
            }
        }
    }
}

fn read_sorted_dir(dir: &Path) -> std::io::Result<Vec<std::fs::DirEntry>> {
    let mut entries = std::fs::read_dir(dir)?.collect::<std::io::Result<Vec<_>>>()?;
    entries.sort_by_key(|entry| entry.file_name());
    Ok(entries)
}

/// Resolves a possibly relative sitemap entry against the document it came from
fn resolve_entry(document: &Url, entry: &str) -> Option<String> {
    match document.join(entry) {
        Ok(url) => Some(url.to_string()),
        Err(e) => {
            tracing::warn!("Skipping entry '{}' in {}: {}", entry, document, e);
            None
        }
    }
}
