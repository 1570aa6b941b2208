use crate::UrlError;
use url::Url;

/// Tracking query parameters dropped from record URLs
const TRACKING_PARAMS: &[&str] = &["fbclid", "gclid", "mc_eid"];

/// Resolves an `href` found in a fragment to an absolute URL
///
/// Returns `None` for empty values, fragment-only anchors, non-navigational
/// schemes (`javascript:`, `mailto:`, `tel:`, `data:`) and anything that does
/// not end up as HTTP(S).
pub fn resolve_href(href: &str, base: &Url) -> Option<Url> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    if href.starts_with("javascript:")
        || href.starts_with("mailto:")
        || href.starts_with("tel:")
        || href.starts_with("data:")
    {
        return None;
    }

    let absolute = base.join(href).ok()?;
    match absolute.scheme() {
        "http" | "https" => Some(canonicalize(absolute)),
        _ => None,
    }
}

/// Parses and canonicalizes an absolute URL
///
/// # Examples
///
/// ```
/// use reel_sweep::url::normalize_url;
///
/// let url = normalize_url("https://example.com/film/a?utm_source=x#top").unwrap();
/// assert_eq!(url.as_str(), "https://example.com/film/a");
/// ```
pub fn normalize_url(url_str: &str) -> Result<Url, UrlError> {
    let url = Url::parse(url_str).map_err(|e| UrlError::Parse(e.to_string()))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(format!(
            "Only HTTP and HTTPS schemes are supported, got: {}",
            url.scheme()
        )));
    }

    if url.host_str().is_none() {
        return Err(UrlError::MissingDomain);
    }

    Ok(canonicalize(url))
}

/// Drops the fragment and tracking parameters
///
/// The query is filtered as raw `&`-separated segments and never decoded, so
/// every kept segment stays byte-identical to what the source served.
fn canonicalize(mut url: Url) -> Url {
    url.set_fragment(None);

    let kept = url.query().map(|query| {
        query
            .split('&')
            .filter(|segment| {
                let key = segment.split('=').next().unwrap_or_default();
                !is_tracking_param(key)
            })
            .collect::<Vec<_>>()
            .join("&")
    });

    match kept {
        Some(query) if !query.is_empty() => url.set_query(Some(&query)),
        _ => url.set_query(None),
    }

    url
}

/// Checks if a query parameter is a tracking parameter
fn is_tracking_param(key: &str) -> bool {
    TRACKING_PARAMS.contains(&key) || key.starts_with("utm_")
}
