use crate::{UrlError, UrlResult};
use url::Url;

/// Normalizes the base URI of the audited site
///
/// # Normalization Steps
///
/// 1. Trim surrounding whitespace
/// 2. Prefix `https://` when no scheme is present
/// 3. Parse the URL; reject if malformed
/// 4. Require an HTTP(S) scheme and a host
/// 5. Remove dot segments, duplicate and trailing slashes from the path
/// 6. Drop the query string and fragment
///
/// # Examples
///
/// ```
/// use sitemap_audit::url::normalize_base_uri;
///
/// let url = normalize_base_uri("example.com/subsite/").unwrap();
/// assert_eq!(url.as_str(), "https://example.com/subsite");
/// ```
pub fn normalize_base_uri(uri: &str) -> UrlResult<Url> {
    let trimmed = uri.trim();
    if trimmed.is_empty() {
        return Err(UrlError::Parse("empty URI".to_string()));
    }

    let with_scheme = if trimmed.contains("://") {
        trimmed.to_string()
    } else {
        format!("https://{}", trimmed)
    };

    let mut url = Url::parse(&with_scheme).map_err(|e| UrlError::Parse(e.to_string()))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(format!(
            "Only HTTP and HTTPS schemes are supported, got: {}",
            url.scheme()
        )));
    }

    match url.host_str() {
        Some(host) if !host.is_empty() => {}
        _ => return Err(UrlError::MissingDomain),
    }

    let normalized_path = normalize_path(url.path());
    url.set_path(&normalized_path);
    url.set_query(None);
    url.set_fragment(None);

    Ok(url)
}

/// Normalizes a URL path by removing dot segments and trailing slashes
fn normalize_path(path: &str) -> String {
    let mut normalized_segments: Vec<&str> = Vec::new();

    for segment in path.split('/') {
        match segment {
            "" | "." => continue,
            ".." => {
                normalized_segments.pop();
            }
            _ => normalized_segments.push(segment),
        }
    }

    if normalized_segments.is_empty() {
        return "/".to_string();
    }

    format!("/{}", normalized_segments.join("/"))
}
