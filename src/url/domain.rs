use url::Url;

/// Extracts the comparable domain from a URL
///
/// The host is lowercased and a leading `www.` is dropped, so mirrors served
/// with and without the prefix compare equal.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use reel_sweep::url::extract_domain;
///
/// let url = Url::parse("https://WWW.Example.com/films").unwrap();
/// assert_eq!(extract_domain(&url), Some("example.com".to_string()));
/// ```
pub fn extract_domain(url: &Url) -> Option<String> {
    url.host_str().map(|h| {
        let host = h.to_lowercase();
        match host.strip_prefix("www.") {
            Some(bare) => bare.to_string(),
            None => host,
        }
    })
}

/// Checks whether `candidate` is the source domain or one of its subdomains
///
/// Both arguments are expected in [`extract_domain`] form.
pub fn is_within_domain(source: &str, candidate: &str) -> bool {
    candidate == source || candidate.ends_with(&format!(".{}", source))
}
