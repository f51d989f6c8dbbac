//! Site resolution
//!
//! An audit needs two facts about the site: the base URI its pages are served
//! from and the directory searched for `sitemap.xml` files. They either come
//! straight from configuration or from the JSON output of `drush status`.

use crate::config::SiteConfig;
use crate::AuditError;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Everything an audit needs to know about the site
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteTarget {
    /// Base URI; may lack a scheme
    pub base_uri: String,

    /// Directory searched for `sitemap.xml` files, if any
    pub search_root: Option<PathBuf>,
}

/// Source of the site's base URI and search root
pub trait SiteResolver {
    /// Resolves the site target
    ///
    /// # Errors
    ///
    /// `AuditError::MissingBaseUri` when no base URI can be determined.
    fn resolve(&self) -> Result<SiteTarget, AuditError>;
}

/// A site described directly by configuration
#[derive(Debug, Clone, Default)]
pub struct StaticSite {
    pub base_uri: Option<String>,
    pub search_root: Option<PathBuf>,
}

impl StaticSite {
    /// Builds a static site from the `[site]` configuration section
    ///
    /// A search root containing `%tokens` has nothing to resolve them
    /// against, so it is dropped with a warning.
    pub fn from_config(config: &SiteConfig) -> Self {
        let search_root = config.search_root.as_deref().and_then(|root| {
            if root.contains('%') {
                tracing::warn!(
                    "Search root '{}' needs drush status paths; filesystem search disabled",
                    root
                );
                None
            } else {
                Some(PathBuf::from(root))
            }
        });

        Self {
            base_uri: config.base_uri.clone(),
            search_root,
        }
    }
}

impl SiteResolver for StaticSite {
    fn resolve(&self) -> Result<SiteTarget, AuditError> {
        let base_uri = non_blank(self.base_uri.as_deref()).ok_or(AuditError::MissingBaseUri)?;
        Ok(SiteTarget {
            base_uri,
            search_root: self.search_root.clone(),
        })
    }
}

/// The subset of `drush status --format=json` output used by the audit
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DrushStatus {
    #[serde(default)]
    pub uri: Option<String>,

    #[serde(default)]
    pub root: Option<String>,

    /// Path aliases such as `%root`, `%files`, `%site`
    #[serde(rename = "%paths", default)]
    pub paths: HashMap<String, String>,

    /// Search root template; `%tokens` are replaced from `paths`
    #[serde(skip)]
    pub search_template: Option<String>,
}

impl DrushStatus {
    /// Parses drush status JSON output
    pub fn from_json(json: &str) -> Result<Self, AuditError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads drush status JSON output from a file
    pub fn from_file(path: &Path) -> Result<Self, AuditError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Sets the search root template (e.g. `%root` or `%files/sitemaps`)
    pub fn with_search_template(mut self, template: Option<String>) -> Self {
        self.search_template = template;
        self
    }

    /// Replaces every known `%token` in `template`
    ///
    /// Longer tokens are replaced first so `%root` never clobbers a
    /// hypothetical `%rootdir`. `%root` falls back to the `root` field.
    pub fn expand_tokens(&self, template: &str) -> Result<String, AuditError> {
        let mut tokens: Vec<(String, String)> = self
            .paths
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        if !self.paths.contains_key("%root") {
            if let Some(root) = non_blank(self.root.as_deref()) {
                tokens.push(("%root".to_string(), root));
            }
        }
        tokens.sort_by(|a, b| b.0.len().cmp(&a.0.len()).then_with(|| a.0.cmp(&b.0)));

        let mut expanded = template.to_string();
        for (token, value) in &tokens {
            expanded = expanded.replace(token.as_str(), value);
        }

        if let Some(start) = expanded.find('%') {
            let unresolved: String = expanded[start..]
                .chars()
                .take_while(|c| !std::path::is_separator(*c))
                .collect();
            return Err(AuditError::Site(format!(
                "Unknown path token '{}' in search root '{}'",
                unresolved, template
            )));
        }

        Ok(expanded)
    }
}

impl SiteResolver for DrushStatus {
    fn resolve(&self) -> Result<SiteTarget, AuditError> {
        let base_uri = non_blank(self.uri.as_deref()).ok_or(AuditError::MissingBaseUri)?;

        let search_root = match &self.search_template {
            Some(template) => Some(PathBuf::from(self.expand_tokens(template)?)),
            None => None,
        };

        Ok(SiteTarget {
            base_uri,
            search_root,
        })
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
