use crate::{UrlError, UrlResult};
use std::path::{Component, Path};
use url::Url;

/// Name of the conventional sitemap document
pub const SITEMAP_FILE_NAME: &str = "sitemap.xml";

/// Appends path segments to a base URL, percent-encoding each one
///
/// # Examples
///
/// ```
/// use url::Url;
/// use sitemap_audit::url::append_segments;
///
/// let base = Url::parse("https://example.com/site").unwrap();
/// let url = append_segments(&base, ["a b", "sitemap.xml"]).unwrap();
/// assert_eq!(url.as_str(), "https://example.com/site/a%20b/sitemap.xml");
/// ```
pub fn append_segments<I, S>(base: &Url, segments: I) -> UrlResult<Url>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|_| UrlError::CannotBeABase(base.to_string()))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

/// Returns the conventional `{base}/sitemap.xml` URL
pub fn root_sitemap_url(base: &Url) -> UrlResult<Url> {
    append_segments(base, [SITEMAP_FILE_NAME])
}

/// Rewrites a path relative to the sitemap search root into a URL under `base`
///
/// Only normal components are kept; `.`, `..` and root prefixes never
/// contribute a segment.
pub fn relative_path_to_url(base: &Url, relative: &Path) -> UrlResult<Url> {
    let segments: Vec<String> = relative
        .components()
        .filter_map(|component| match component {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect();

    append_segments(base, segments)
}
