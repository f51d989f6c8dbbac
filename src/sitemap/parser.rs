//! Sitemap document parsing
//!
//! Documents are decoded against a fixed shape: a root element whose children
//! are either `<url>` nodes (a leaf sitemap) or `<sitemap>` nodes (a sitemap
//! index), each carrying a mandatory `<loc>`. A document that does not fit the
//! shape is rejected as a whole.

use crate::SitemapError;
use serde::Deserialize;

/// A decoded sitemap document
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SitemapKind {
    /// Lists other sitemap documents
    Index { entries: Vec<String> },

    /// Lists page URLs
    Leaf { entries: Vec<String> },
}

impl SitemapKind {
    /// The `<loc>` values of the document, in document order
    pub fn entries(&self) -> &[String] {
        match self {
            Self::Index { entries } | Self::Leaf { entries } => entries,
        }
    }

}

#[derive(Debug, Deserialize)]
struct RawDocument {
    #[serde(rename = "url", default)]
    urls: Vec<RawEntry>,

    #[serde(rename = "sitemap", default)]
    sitemaps: Vec<RawEntry>,
}

#[derive(Debug, Deserialize)]
struct RawEntry {
    loc: String,
}

/// Parses a sitemap document
///
/// At most `max_entries` entries are returned; the rest are dropped with a
/// warning. Blank `<loc>` values are skipped.
///
/// # Errors
///
/// Returns `SitemapError::Malformed` if the bytes are not UTF-8, not
/// well-formed XML, or an entry is missing its `<loc>`.
///
/// # Example
///
/// ```
/// use sitemap_audit::sitemap::{parse_sitemap, SitemapKind};
///
/// let xml = br#"<urlset><url><loc>https://example.com/</loc></url></urlset>"#;
/// let kind = parse_sitemap(xml, 100).unwrap();
/// assert_eq!(kind, SitemapKind::Leaf { entries: vec!["https://example.com/".to_string()] });
/// ```
pub fn parse_sitemap(xml: &[u8], max_entries: usize) -> Result<SitemapKind, SitemapError> {
    let text = std::str::from_utf8(xml).map_err(|e| SitemapError::Malformed(e.to_string()))?;
    let text = text.trim_start_matches('\u{feff}');

    let document: RawDocument =
        quick_xml::de::from_str(text).map_err(|e| SitemapError::Malformed(e.to_string()))?;

    // A document listing any pages is a leaf, whatever else it contains
    let (raw_entries, is_index) = if document.urls.is_empty() && !document.sitemaps.is_empty() {
        (document.sitemaps, true)
    } else {
        (document.urls, false)
    };

    let mut entries: Vec<String> = raw_entries
        .into_iter()
        .map(|entry| entry.loc.trim().to_string())
        .filter(|loc| !loc.is_empty())
        .collect();

    if entries.len() > max_entries {
        tracing::warn!(
            "Sitemap lists {} entries; only the first {} are used",
            entries.len(),
            max_entries
        );
        entries.truncate(max_entries);
    }

    Ok(if is_index {
        SitemapKind::Index { entries }
    } else {
        SitemapKind::Leaf { entries }
    })
}
