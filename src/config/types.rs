use serde::Deserialize;

/// Main configuration structure for Sitemap-Audit
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub site: SiteConfig,
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub checker: CheckerConfig,
}

/// Where the audited site lives
#[derive(Debug, Clone, Deserialize)]
pub struct SiteConfig {
    /// Base URI of the site; a missing scheme is treated as https
    #[serde(rename = "base-uri", default)]
    pub base_uri: Option<String>,

    /// Directory searched for `sitemap.xml` files.
    ///
    /// May contain `%token`s (e.g. `%root`, `%files`) that are resolved against
    /// the site's drush status paths.
    #[serde(rename = "search-root", default = "default_search_root")]
    pub search_root: Option<String>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_uri: None,
            search_root: default_search_root(),
        }
    }
}

/// How a link is requested
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkMethod {
    #[default]
    Get,
    Head,
}

/// HTTP client configuration
#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    /// Total request timeout (seconds)
    #[serde(rename = "timeout-seconds", default = "default_timeout_seconds")]
    pub timeout_seconds: u64,

    /// Connection establishment timeout (seconds)
    #[serde(
        rename = "connect-timeout-seconds",
        default = "default_connect_timeout_seconds"
    )]
    pub connect_timeout_seconds: u64,

    /// Skip TLS certificate validation
    #[serde(rename = "accept-invalid-certs", default = "default_true")]
    pub accept_invalid_certs: bool,

    /// Maximum number of redirects followed per request
    #[serde(rename = "max-redirects", default = "default_max_redirects")]
    pub max_redirects: usize,

    /// User agent sent with every request
    #[serde(rename = "user-agent", default = "default_user_agent")]
    pub user_agent: String,

    /// Request method used for sitemap links
    #[serde(rename = "link-method", default)]
    pub link_method: LinkMethod,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: default_timeout_seconds(),
            connect_timeout_seconds: default_connect_timeout_seconds(),
            accept_invalid_certs: true,
            max_redirects: default_max_redirects(),
            user_agent: default_user_agent(),
            link_method: LinkMethod::default(),
        }
    }
}

/// Link checker behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CheckerConfig {
    /// Number of links fetched at once within one sitemap
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,

    /// Largest sitemap body that will be read
    #[serde(rename = "max-sitemap-bytes", default = "default_max_sitemap_bytes")]
    pub max_sitemap_bytes: u64,

    /// Largest number of entries taken from one sitemap document
    #[serde(rename = "max-sitemap-entries", default = "default_max_sitemap_entries")]
    pub max_sitemap_entries: usize,

    /// How many directory levels below the search root are visited
    #[serde(rename = "max-search-depth", default = "default_max_search_depth")]
    pub max_search_depth: usize,
}

impl Default for CheckerConfig {
    fn default() -> Self {
        Self {
            concurrency: default_concurrency(),
            max_sitemap_bytes: default_max_sitemap_bytes(),
            max_sitemap_entries: default_max_sitemap_entries(),
            max_search_depth: default_max_search_depth(),
        }
    }
}

fn default_search_root() -> Option<String> {
    Some("%root".to_string())
}

fn default_timeout_seconds() -> u64 {
    15
}

fn default_connect_timeout_seconds() -> u64 {
    10
}

fn default_true() -> bool {
    true
}

fn default_max_redirects() -> usize {
    10
}

fn default_user_agent() -> String {
    format!("sitemap-audit/{}", env!("CARGO_PKG_VERSION"))
}

fn default_concurrency() -> usize {
    8
}

// sitemaps.org protocol limits
fn default_max_sitemap_bytes() -> u64 {
    50 * 1024 * 1024
}

fn default_max_sitemap_entries() -> usize {
    50_000
}

fn default_max_search_depth() -> usize {
    16
}
