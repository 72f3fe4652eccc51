use crate::config::types::{Config, FetchConfig, HistoryConfig, LinksConfig, PerformanceConfig};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_fetch_config(&config.fetch)?;
    validate_links_config(&config.links)?;
    validate_performance_config(&config.performance)?;
    validate_history_config(&config.history)?;
    Ok(())
}

/// Validates HTTP identity and timeouts
fn validate_fetch_config(config: &FetchConfig) -> Result<(), ConfigError> {
    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user_agent cannot be empty".to_string(),
        ));
    }

    if config.page_timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "page_timeout_secs must be >= 1, got {}",
            config.page_timeout_secs
        )));
    }

    if config.probe_timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "probe_timeout_secs must be >= 1, got {}",
            config.probe_timeout_secs
        )));
    }

    if config.max_redirects > 20 {
        return Err(ConfigError::Validation(format!(
            "max_redirects must be <= 20, got {}",
            config.max_redirects
        )));
    }

    Ok(())
}

/// Validates link checking limits
fn validate_links_config(config: &LinksConfig) -> Result<(), ConfigError> {
    if config.max_links < 1 || config.max_links > 100 {
        return Err(ConfigError::Validation(format!(
            "max_links must be between 1 and 100, got {}",
            config.max_links
        )));
    }

    if config.max_concurrent < 1 || config.max_concurrent > config.max_links {
        return Err(ConfigError::Validation(format!(
            "max_concurrent must be between 1 and max_links ({}), got {}",
            config.max_links, config.max_concurrent
        )));
    }

    Ok(())
}

/// Validates the performance probe settings
fn validate_performance_config(config: &PerformanceConfig) -> Result<(), ConfigError> {
    let endpoint = Url::parse(&config.endpoint)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid performance endpoint: {}", e)))?;

    if endpoint.scheme() != "http" && endpoint.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "Performance endpoint '{}' must use HTTP or HTTPS",
            config.endpoint
        )));
    }

    if config.timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "performance timeout_secs must be >= 1, got {}",
            config.timeout_secs
        )));
    }

    if config.strategy != "mobile" && config.strategy != "desktop" {
        return Err(ConfigError::Validation(format!(
            "strategy must be 'mobile' or 'desktop', got '{}'",
            config.strategy
        )));
    }

    Ok(())
}

/// Validates history settings
fn validate_history_config(config: &HistoryConfig) -> Result<(), ConfigError> {
    if let Some(path) = &config.database_path {
        if path.trim().is_empty() {
            return Err(ConfigError::Validation(
                "database_path cannot be empty when set".to_string(),
            ));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate(&Config::default()).is_ok());
    }

    #[test]
    fn test_validate_fetch_timeouts() {
        let mut config = FetchConfig::default();
        config.page_timeout_secs = 0;
        assert!(validate_fetch_config(&config).is_err());

        let mut config = FetchConfig::default();
        config.probe_timeout_secs = 0;
        assert!(validate_fetch_config(&config).is_err());

        let mut config = FetchConfig::default();
        config.user_agent = "  ".to_string();
        assert!(validate_fetch_config(&config).is_err());
    }

    #[test]
    fn test_validate_links_limits() {
        assert!(validate_links_config(&LinksConfig {
            max_links: 0,
            max_concurrent: 1
        })
        .is_err());
        assert!(validate_links_config(&LinksConfig {
            max_links: 10,
            max_concurrent: 11
        })
        .is_err());
        assert!(validate_links_config(&LinksConfig {
            max_links: 10,
            max_concurrent: 10
        })
        .is_ok());
    }

    #[test]
    fn test_validate_performance() {
        let mut config = PerformanceConfig::default();
        config.strategy = "tablet".to_string();
        assert!(validate_performance_config(&config).is_err());

        let mut config = PerformanceConfig::default();
        config.endpoint = "not a url".to_string();
        assert!(matches!(
            validate_performance_config(&config),
            Err(ConfigError::InvalidUrl(_))
        ));

        let mut config = PerformanceConfig::default();
        config.endpoint = "ftp://example.com/psi".to_string();
        assert!(validate_performance_config(&config).is_err());
    }

    #[test]
    fn test_validate_history_path() {
        let config = HistoryConfig {
            database_path: Some(String::new()),
        };
        assert!(validate_history_config(&config).is_err());
        assert!(validate_history_config(&HistoryConfig::default()).is_ok());
    }
}
