use crate::config::types::{CheckerConfig, Config, HttpConfig, SiteConfig};
use crate::url::normalize_base_uri;
use crate::{ConfigError, ConfigResult};

/// Validates the entire configuration
pub fn validate(config: &Config) -> ConfigResult<()> {
    validate_site_config(&config.site)?;
    validate_http_config(&config.http)?;
    validate_checker_config(&config.checker)?;
    Ok(())
}

/// Validates site configuration
fn validate_site_config(config: &SiteConfig) -> ConfigResult<()> {
    if let Some(base_uri) = &config.base_uri {
        normalize_base_uri(base_uri)
            .map_err(|e| ConfigError::InvalidUrl(format!("Invalid base-uri: {}", e)))?;
    }

    if let Some(search_root) = &config.search_root {
        if search_root.trim().is_empty() {
            return Err(ConfigError::Validation(
                "search-root cannot be empty (omit it to disable the filesystem search)"
                    .to_string(),
            ));
        }
    }

    Ok(())
}

/// Validates HTTP client configuration
fn validate_http_config(config: &HttpConfig) -> ConfigResult<()> {
    if config.timeout_seconds < 1 {
        return Err(ConfigError::Validation(format!(
            "timeout-seconds must be >= 1, got {}",
            config.timeout_seconds
        )));
    }

    if config.connect_timeout_seconds < 1 {
        return Err(ConfigError::Validation(format!(
            "connect-timeout-seconds must be >= 1, got {}",
            config.connect_timeout_seconds
        )));
    }

    if config.connect_timeout_seconds > config.timeout_seconds {
        return Err(ConfigError::Validation(format!(
            "connect-timeout-seconds ({}) cannot exceed timeout-seconds ({})",
            config.connect_timeout_seconds, config.timeout_seconds
        )));
    }

    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user-agent cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates link checker configuration
fn validate_checker_config(config: &CheckerConfig) -> ConfigResult<()> {
    if config.concurrency < 1 || config.concurrency > 100 {
        return Err(ConfigError::Validation(format!(
            "concurrency must be between 1 and 100, got {}",
            config.concurrency
        )));
    }

    if config.max_sitemap_bytes < 1 {
        return Err(ConfigError::Validation(
            "max-sitemap-bytes must be >= 1".to_string(),
        ));
    }

    if config.max_sitemap_entries < 1 {
        return Err(ConfigError::Validation(
            "max-sitemap-entries must be >= 1".to_string(),
        ));
    }

    Ok(())
}
