//! URL handling module for Reel-Sweep
//!
//! This module provides the source-site view of URLs: deriving the origin host
//! from the configured listing URL, resolving relative links found in fragments,
//! and deciding whether a link belongs to the source.

mod domain;
mod normalize;

use crate::{UrlError, UrlResult};
use ::url::Url;

// Re-export main functions
pub use domain::{extract_domain, is_within_domain};
pub use normalize::{normalize_url, resolve_href};

/// The catalog source as seen from its configured listing URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceSite {
    listing: Url,
    base: Url,
    domain: String,
}

impl SourceSite {
    /// Builds the source view from the listing URL
    ///
    /// # Examples
    ///
    /// ```
    /// use reel_sweep::url::SourceSite;
    ///
    /// let site = SourceSite::parse("https://www.example.com/filmler").unwrap();
    /// assert_eq!(site.base().as_str(), "https://www.example.com/");
    /// assert_eq!(site.domain(), "example.com");
    /// ```
    pub fn parse(listing_url: &str) -> UrlResult<Self> {
        let listing = normalize_url(listing_url)?;
        let domain = extract_domain(&listing).ok_or(UrlError::MissingDomain)?;

        // scheme://host[:port]/ with no path, query or fragment
        let mut base = listing.clone();
        base.set_path("/");
        base.set_query(None);

        Ok(Self {
            listing,
            base,
            domain,
        })
    }

    /// The listing page that seeds the crawl
    pub fn listing_url(&self) -> &Url {
        &self.listing
    }

    /// Scheme and host of the source, used to absolutize relative links
    pub fn base(&self) -> &Url {
        &self.base
    }

    /// Comparable domain of the source (lowercase, no `www.`)
    pub fn domain(&self) -> &str {
        &self.domain
    }

    /// Absolute URL of an endpoint path on the source host
    pub fn endpoint(&self, path: &str) -> UrlResult<Url> {
        self.base
            .join(path)
            .map_err(|e| UrlError::Parse(e.to_string()))
    }

    /// Resolves an `href` against the source host
    pub fn absolutize(&self, href: &str) -> Option<Url> {
        resolve_href(href, &self.base)
    }

    /// Returns true if the URL is served by the source domain or a subdomain of it
    pub fn owns(&self, url: &Url) -> bool {
        extract_domain(url)
            .map(|candidate| is_within_domain(&self.domain, &candidate))
            .unwrap_or(false)
    }
}
