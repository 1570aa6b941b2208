use crate::config::types::{Config, CrawlerConfig, OutputConfig, SourceConfig, UserAgentConfig};
use crate::ConfigError;
use url::Url;

/// Upper bound on `max-pages`; the crawl must always have a finite ceiling
const MAX_PAGE_CEILING: u32 = 10_000;

/// Lower bound on the pause between detail requests (milliseconds)
pub const MIN_REQUEST_DELAY_MS: u64 = 100;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_source_config(&config.source)?;
    validate_crawler_config(&config.crawler)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates source configuration
fn validate_source_config(config: &SourceConfig) -> Result<(), ConfigError> {
    validate_origin_url(&config.origin_url)?;

    if !config.pagination_path.starts_with('/') {
        return Err(ConfigError::Validation(format!(
            "pagination_path must start with '/', got '{}'",
            config.pagination_path
        )));
    }

    for (name, value) in [
        ("cursor_field", &config.cursor_field),
        ("year_field", &config.year_field),
        ("category_field", &config.category_field),
        ("sort_field", &config.sort_field),
    ] {
        if value.trim().is_empty() {
            return Err(ConfigError::Validation(format!("{} cannot be empty", name)));
        }
    }

    Ok(())
}

/// Validates that the origin is an absolute HTTP(S) URL with a host
pub(crate) fn validate_origin_url(origin: &str) -> Result<(), ConfigError> {
    let url = Url::parse(origin)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid origin_url '{}': {}", origin, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "origin_url '{}' must use http or https",
            origin
        )));
    }

    if url.host_str().is_none() {
        return Err(ConfigError::InvalidUrl(format!(
            "origin_url '{}' has no host",
            origin
        )));
    }

    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.max_pages < 1 || config.max_pages > MAX_PAGE_CEILING {
        return Err(ConfigError::Validation(format!(
            "max_pages must be between 1 and {}, got {}",
            MAX_PAGE_CEILING, config.max_pages
        )));
    }

    if config.request_delay_ms < MIN_REQUEST_DELAY_MS {
        return Err(ConfigError::Validation(format!(
            "request_delay_ms must be >= {}ms, got {}ms",
            MIN_REQUEST_DELAY_MS, config.request_delay_ms
        )));
    }

    for (name, secs) in [
        ("listing_timeout_secs", config.listing_timeout_secs),
        ("pagination_timeout_secs", config.pagination_timeout_secs),
        ("detail_timeout_secs", config.detail_timeout_secs),
    ] {
        if secs < 1 {
            return Err(ConfigError::Validation(format!(
                "{} must be >= 1, got {}",
                name, secs
            )));
        }
    }

    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    if config.value.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user-agent value cannot be empty".to_string(),
        ));
    }

    // Header values must be visible ASCII
    if !config.value.chars().all(|c| c == ' ' || c.is_ascii_graphic()) {
        return Err(ConfigError::Validation(format!(
            "user-agent value contains invalid characters: '{}'",
            config.value
        )));
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.catalog_path.is_empty() {
        return Err(ConfigError::Validation(
            "catalog_path cannot be empty".to_string(),
        ));
    }

    Ok(())
}
