//! Semantic configuration checks.
//!
//! Serde handles the syntactic layer; this module rejects configs that
//! parse but cannot work at runtime.

use url::Url;

use crate::config::schema::RouterConfig;

/// A single semantic validation failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Validate a parsed configuration, collecting all failures.
pub fn validate_config(config: &RouterConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.retry.max_attempts == 0 {
        errors.push(ValidationError {
            field: "retry.max_attempts".into(),
            message: "must be at least 1".into(),
        });
    }

    if config.fanout.max_concurrency == 0 {
        errors.push(ValidationError {
            field: "fanout.max_concurrency".into(),
            message: "must be at least 1".into(),
        });
    }

    if !config.channels.webhook.default_url.is_empty()
        && Url::parse(&config.channels.webhook.default_url).is_err()
    {
        errors.push(ValidationError {
            field: "channels.webhook.default_url".into(),
            message: "not a valid URL".into(),
        });
    }

    if !config.channels.whatsapp.api_url.is_empty()
        && Url::parse(&config.channels.whatsapp.api_url).is_err()
    {
        errors.push(ValidationError {
            field: "channels.whatsapp.api_url".into(),
            message: "not a valid URL".into(),
        });
    }

    let mut seen = std::collections::HashSet::new();
    for tenant in &config.tenants {
        if !seen.insert(tenant.id) {
            errors.push(ValidationError {
                field: "tenants".into(),
                message: format!("duplicate tenant id {}", tenant.id),
            });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::TenantConfig;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&RouterConfig::default()).is_ok());
    }

    #[test]
    fn test_zero_attempts_rejected() {
        let mut config = RouterConfig::default();
        config.retry.max_attempts = 0;
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors[0].field, "retry.max_attempts");
    }

    #[test]
    fn test_bad_webhook_url_rejected() {
        let mut config = RouterConfig::default();
        config.channels.webhook.default_url = "not a url".into();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_duplicate_tenant_rejected() {
        let mut config = RouterConfig::default();
        config.tenants.push(TenantConfig { id: 1, languages: vec![] });
        config.tenants.push(TenantConfig { id: 1, languages: vec![] });
        assert!(validate_config(&config).is_err());
    }
}
