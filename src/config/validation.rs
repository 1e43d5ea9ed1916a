use crate::config::types::{Config, FrontierConfig, RobotsConfig, UserAgentConfig, WorkerConfig};
use crate::ConfigError;
use url::Url;

const MAX_ROBOTS_TTL_HOURS: u64 = 24 * 365;
const MAX_FAILURE_RETRY_SECS: u64 = 24 * 60 * 60;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_frontier_config(&config.scheduler)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_robots_config(&config.robots)?;
    validate_worker_config(&config.workers)?;
    Ok(())
}

/// Validates frontier limits and seeds
fn validate_frontier_config(config: &FrontierConfig) -> Result<(), ConfigError> {
    // depth_limit = 0 is legal: every page, seeds included, is rejected

    if config.page_limit < 1 {
        return Err(ConfigError::Validation(format!(
            "page_limit must be >= 1, got {}",
            config.page_limit
        )));
    }

    if config.seeds.is_empty() {
        return Err(ConfigError::Validation(
            "at least one seed URL is required".to_string(),
        ));
    }

    for seed in &config.seeds {
        let url = Url::parse(seed)
            .map_err(|e| ConfigError::InvalidUrl(format!("Invalid seed URL '{}': {}", seed, e)))?;

        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(ConfigError::Validation(format!(
                "Seed URL '{}' must use HTTP or HTTPS",
                seed
            )));
        }

        if url.host_str().is_none() {
            return Err(ConfigError::InvalidUrl(format!(
                "Seed URL '{}' has no host",
                seed
            )));
        }
    }

    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    // The name doubles as the robots.txt product token
    if config.crawler_name.is_empty() {
        return Err(ConfigError::Validation(
            "crawler_name cannot be empty".to_string(),
        ));
    }

    if !config
        .crawler_name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-')
    {
        return Err(ConfigError::Validation(format!(
            "crawler_name must contain only alphanumeric characters and hyphens, got '{}'",
            config.crawler_name
        )));
    }

    Url::parse(&config.contact_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid contact_url: {}", e)))?;

    validate_email(&config.contact_email)?;

    Ok(())
}

fn validate_robots_config(config: &RobotsConfig) -> Result<(), ConfigError> {
    if config.cache_ttl_hours < 1 || config.cache_ttl_hours > MAX_ROBOTS_TTL_HOURS {
        return Err(ConfigError::Validation(format!(
            "robots cache_ttl_hours must be between 1 and {}, got {}",
            MAX_ROBOTS_TTL_HOURS, config.cache_ttl_hours
        )));
    }

    if config.failure_retry_secs > MAX_FAILURE_RETRY_SECS {
        return Err(ConfigError::Validation(format!(
            "robots failure_retry_secs must be <= {}, got {}",
            MAX_FAILURE_RETRY_SECS, config.failure_retry_secs
        )));
    }

    Ok(())
}

fn validate_worker_config(config: &WorkerConfig) -> Result<(), ConfigError> {
    if config.count < 1 || config.count > 256 {
        return Err(ConfigError::Validation(format!(
            "worker count must be between 1 and 256, got {}",
            config.count
        )));
    }

    if config.request_timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "request_timeout_secs must be >= 1, got {}",
            config.request_timeout_secs
        )));
    }

    Ok(())
}

/// Basic email validation
fn validate_email(email: &str) -> Result<(), ConfigError> {
    if email.is_empty() {
        return Err(ConfigError::Validation(
            "contact_email cannot be empty".to_string(),
        ));
    }

    let (local, domain) = email
        .split_once('@')
        .ok_or_else(|| ConfigError::Validation(format!("Invalid email format: '{}'", email)))?;

    if local.is_empty() || domain.is_empty() || domain.contains('@') {
        return Err(ConfigError::Validation(format!(
            "Invalid email format: '{}'",
            email
        )));
    }

    if !domain.contains('.') {
        return Err(ConfigError::Validation(format!(
            "Invalid email domain: '{}'",
            email
        )));
    }

    Ok(())
}
