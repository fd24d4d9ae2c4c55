use crate::config::types::{Config, CrawlerConfig, ExtractionConfig, UserAgentConfig};
use crate::ConfigError;
use url::Url;

/// Deepest crawl the engine accepts
pub const MAX_DEPTH_LIMIT: u32 = 15;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_extraction_config(&config.extraction)?;
    Ok(())
}

/// Validates crawl bounds
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.max_depth < 1 || config.max_depth > MAX_DEPTH_LIMIT {
        return Err(ConfigError::Validation(format!(
            "max_depth must be between 1 and {}, got {}",
            MAX_DEPTH_LIMIT, config.max_depth
        )));
    }

    if config.max_pages < 1 {
        return Err(ConfigError::Validation(format!(
            "max_pages must be >= 1, got {}",
            config.max_pages
        )));
    }

    if config.max_links_per_page < 1 {
        return Err(ConfigError::Validation(format!(
            "max_links_per_page must be >= 1, got {}",
            config.max_links_per_page
        )));
    }

    if config.max_queue_size < 1 {
        return Err(ConfigError::Validation(format!(
            "max_queue_size must be >= 1, got {}",
            config.max_queue_size
        )));
    }

    if config.request_delay_ms > 60_000 {
        return Err(ConfigError::Validation(format!(
            "request_delay_ms must be <= 60000ms, got {}ms",
            config.request_delay_ms
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

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    // Validate crawler name: non-empty, alphanumeric + hyphens only
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

/// Validates extraction tuning
fn validate_extraction_config(config: &ExtractionConfig) -> Result<(), ConfigError> {
    if config.min_phone_digits < 5 || config.min_phone_digits > 15 {
        return Err(ConfigError::Validation(format!(
            "min_phone_digits must be between 5 and 15, got {}",
            config.min_phone_digits
        )));
    }

    if config.max_phone_digits < config.min_phone_digits {
        return Err(ConfigError::Validation(format!(
            "max_phone_digits ({}) must be >= min_phone_digits ({})",
            config.max_phone_digits, config.min_phone_digits
        )));
    }

    if config.mask_chars.is_empty() {
        return Err(ConfigError::Validation(
            "mask_chars cannot be empty".to_string(),
        ));
    }

    if let Some(c) = config
        .mask_chars
        .chars()
        .find(|c| c.is_ascii_digit() || c.is_whitespace() || "+-().".contains(*c))
    {
        return Err(ConfigError::Validation(format!(
            "mask_chars cannot contain digits, whitespace or phone punctuation, got '{}'",
            c
        )));
    }

    if config.min_mask_chars < 1 {
        return Err(ConfigError::Validation(format!(
            "min_mask_chars must be >= 1, got {}",
            config.min_mask_chars
        )));
    }

    Ok(())
}

/// Basic shape check for the crawler's own contact address
fn validate_email(email: &str) -> Result<(), ConfigError> {
    let mut parts = email.split('@');
    let valid = match (parts.next(), parts.next(), parts.next()) {
        (Some(local), Some(domain), None) => {
            !local.is_empty() && domain.contains('.') && !domain.starts_with('.')
        }
        _ => false,
    };

    if valid {
        Ok(())
    } else {
        Err(ConfigError::Validation(format!(
            "Invalid contact_email: '{}'",
            email
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate(&Config::default()).is_ok());
    }

    #[test]
    fn test_depth_out_of_range() {
        let mut config = Config::default();
        config.crawler.max_depth = 0;
        assert!(matches!(validate(&config), Err(ConfigError::Validation(_))));

        config.crawler.max_depth = 16;
        assert!(matches!(validate(&config), Err(ConfigError::Validation(_))));

        config.crawler.max_depth = 15;
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_zero_caps_rejected() {
        let mut config = Config::default();
        config.crawler.max_pages = 0;
        assert!(validate(&config).is_err());

        let mut config = Config::default();
        config.crawler.max_links_per_page = 0;
        assert!(validate(&config).is_err());

        let mut config = Config::default();
        config.crawler.max_queue_size = 0;
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_zero_delay_allowed() {
        let mut config = Config::default();
        config.crawler.request_delay_ms = 0;
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let mut config = Config::default();
        config.crawler.request_timeout_secs = 0;
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_invalid_crawler_name() {
        let mut config = Config::default();
        config.user_agent.crawler_name = "bad name!".to_string();
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_invalid_contact_url() {
        let mut config = Config::default();
        config.user_agent.contact_url = "not a url".to_string();
        assert!(matches!(validate(&config), Err(ConfigError::InvalidUrl(_))));
    }

    #[test]
    fn test_invalid_contact_email() {
        let mut config = Config::default();
        config.user_agent.contact_email = "nobody".to_string();
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_mask_chars_cannot_hold_digits() {
        let mut config = Config::default();
        config.extraction.mask_chars = "X0".to_string();
        assert!(validate(&config).is_err());

        config.extraction.mask_chars = String::new();
        assert!(validate(&config).is_err());

        config.extraction.mask_chars = "#".to_string();
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_phone_digit_bounds() {
        let mut config = Config::default();
        config.extraction.min_phone_digits = 4;
        assert!(validate(&config).is_err());

        let mut config = Config::default();
        config.extraction.max_phone_digits = 6;
        assert!(validate(&config).is_err());
    }
}
