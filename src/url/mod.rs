//! URL handling module for Sitemap-Audit
//!
//! This module normalizes the site's base URI and builds sitemap URLs from it,
//! either the conventional root location or a path found on disk.

mod join;
mod normalize;

pub use join::{append_segments, relative_path_to_url, root_sitemap_url, SITEMAP_FILE_NAME};
pub use normalize::normalize_base_uri;
