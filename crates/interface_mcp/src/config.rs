//! Server configuration

use serde::{Deserialize, Serialize};

use infra_crm::executor::DEFAULT_BASE_URL;
use infra_crm::TokenPrecedence;

/// Settings for the bridge process.
///
/// Broker and static-token variables (`NANGO_*`, `HUBSPOT_ACCESS_TOKEN`) are
/// read by the credential resolver itself; this struct covers everything
/// else.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// CRM API base URL
    pub api_base_url: String,
    /// Log level
    pub log_level: String,
    /// Token source precedence: "broker_first" or "static_first"
    pub token_precedence: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_BASE_URL.to_string(),
            log_level: "info".to_string(),
            token_precedence: "broker_first".to_string(),
        }
    }
}

impl AppConfig {
    /// Loads configuration from `BRIDGE_`-prefixed environment variables.
    pub fn from_env() -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(config::Config::try_from(&AppConfig::default())?)
            .add_source(config::Environment::with_prefix("BRIDGE"))
            .build()?
            .try_deserialize()
    }

    /// Parses the configured precedence, defaulting to broker-first for
    /// unrecognized values.
    pub fn precedence(&self) -> TokenPrecedence {
        match self.token_precedence.as_str() {
            "static_first" => TokenPrecedence::StaticFirst,
            _ => TokenPrecedence::BrokerFirst,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_the_production_api() {
        let config = AppConfig::default();
        assert_eq!(config.api_base_url, "https://api.hubapi.com");
        assert_eq!(config.log_level, "info");
        assert_eq!(config.precedence(), TokenPrecedence::BrokerFirst);
    }

    #[test]
    fn static_first_precedence_is_recognized() {
        let config = AppConfig {
            token_precedence: "static_first".to_string(),
            ..Default::default()
        };
        assert_eq!(config.precedence(), TokenPrecedence::StaticFirst);
    }
}
