//! Credential resolution
//!
//! Obtains the bearer token every outbound call needs. The primary source is
//! a delegated-auth broker (Nango): presenting a connection id, an
//! integration id, and a secret key to the broker's connection endpoint
//! yields a freshly rotated access token. When the broker is not configured,
//! unreachable, or answers without a token, a statically configured token
//! from the environment is used instead — with a warning, since that path
//! bypasses centrally managed rotation.
//!
//! The resolved token is cached in a single slot for the remainder of the
//! process. There is no TTL; `invalidate` clears the slot explicitly.

use chrono::{DateTime, Utc};
use serde_json::Value;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use core_kernel::CrmError;

/// Broker variables read from the environment.
const ENV_CONNECTION_ID: &str = "NANGO_CONNECTION_ID";
const ENV_INTEGRATION_ID: &str = "NANGO_INTEGRATION_ID";
const ENV_BASE_URL: &str = "NANGO_BASE_URL";
const ENV_SECRET_KEY: &str = "NANGO_SECRET_KEY";

/// Static fallback token variable.
const ENV_STATIC_TOKEN: &str = "HUBSPOT_ACCESS_TOKEN";

const BROKER_TIMEOUT: Duration = Duration::from_secs(30);

/// Where a resolved token came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialSource {
    Broker,
    Static,
}

/// A resolved credential set; at most one live instance per process.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub access_token: String,
    pub obtained_at: DateTime<Utc>,
    pub source: CredentialSource,
}

/// Which token source is consulted first.
///
/// The observed behavior of the system this replaces is broker-first with a
/// silent static fallback; making the order a policy keeps that default
/// while letting deployments that intend the inverse say so explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TokenPrecedence {
    #[default]
    BrokerFirst,
    StaticFirst,
}

/// Connection parameters for the delegated-auth broker.
#[derive(Debug, Clone)]
pub struct BrokerConfig {
    pub connection_id: String,
    pub integration_id: String,
    pub base_url: String,
    pub secret_key: String,
}

impl BrokerConfig {
    /// Reads the broker variables from the environment.
    ///
    /// Returns the names of the absent variables when the set is incomplete,
    /// so the caller can surface them verbatim in a credential error.
    pub fn from_env() -> Result<Self, Vec<String>> {
        let mut missing = Vec::new();
        let mut read = |name: &str| -> String {
            match std::env::var(name) {
                Ok(value) if !value.is_empty() => value,
                _ => {
                    missing.push(name.to_string());
                    String::new()
                }
            }
        };

        let connection_id = read(ENV_CONNECTION_ID);
        let integration_id = read(ENV_INTEGRATION_ID);
        let base_url = read(ENV_BASE_URL);
        let secret_key = read(ENV_SECRET_KEY);

        if missing.is_empty() {
            Ok(Self {
                connection_id,
                integration_id,
                base_url,
                secret_key,
            })
        } else {
            Err(missing)
        }
    }
}

/// Resolves and caches the bearer token for outbound CRM calls.
///
/// Constructed once at process start and shared by reference; the token slot
/// is the only shared mutable state in the system. Population is
/// at-most-once: the first caller that finds the slot empty performs the
/// broker round trip while concurrent callers wait on the write lock, then
/// read the stored result.
pub struct CredentialResolver {
    broker: Result<BrokerConfig, Vec<String>>,
    static_token: Option<String>,
    precedence: TokenPrecedence,
    client: reqwest::Client,
    cache: RwLock<Option<Credentials>>,
}

impl CredentialResolver {
    pub fn new(
        broker: Result<BrokerConfig, Vec<String>>,
        static_token: Option<String>,
        precedence: TokenPrecedence,
    ) -> Self {
        Self {
            broker,
            static_token,
            precedence,
            client: reqwest::Client::new(),
            cache: RwLock::new(None),
        }
    }

    /// Builds a resolver from the process environment.
    pub fn from_env(precedence: TokenPrecedence) -> Self {
        let static_token = std::env::var(ENV_STATIC_TOKEN)
            .ok()
            .filter(|token| !token.is_empty());
        Self::new(BrokerConfig::from_env(), static_token, precedence)
    }

    /// Returns the cached token, resolving it on first use.
    pub async fn get_token(&self) -> Result<String, CrmError> {
        if let Some(credentials) = self.cache.read().await.as_ref() {
            return Ok(credentials.access_token.clone());
        }

        // Cold start: the write lock serializes concurrent callers so the
        // broker sees exactly one round trip.
        let mut slot = self.cache.write().await;
        if let Some(credentials) = slot.as_ref() {
            return Ok(credentials.access_token.clone());
        }

        let credentials = self.resolve().await?;
        let token = credentials.access_token.clone();
        info!(source = ?credentials.source, "Resolved CRM access token");
        *slot = Some(credentials);
        Ok(token)
    }

    /// Clears the cached token so the next call re-resolves.
    pub async fn invalidate(&self) {
        *self.cache.write().await = None;
    }

    async fn resolve(&self) -> Result<Credentials, CrmError> {
        match self.precedence {
            TokenPrecedence::BrokerFirst => self.resolve_broker_first().await,
            TokenPrecedence::StaticFirst => self.resolve_static_first().await,
        }
    }

    async fn resolve_broker_first(&self) -> Result<Credentials, CrmError> {
        let broker_failure = match &self.broker {
            Ok(config) => match self.fetch_broker_token(config).await {
                Ok(token) => return Ok(Self::credentials(token, CredentialSource::Broker)),
                Err(err) => err,
            },
            Err(missing) => CrmError::missing_config(missing.clone()),
        };

        if let Some(token) = &self.static_token {
            warn!(
                reason = %broker_failure,
                "Using static HubSpot access token instead of broker credentials"
            );
            return Ok(Self::credentials(token.clone(), CredentialSource::Static));
        }

        match broker_failure {
            err @ CrmError::Credential { .. } => Err(err),
            other => Err(CrmError::credential(format!(
                "Failed to get access token: {other}"
            ))),
        }
    }

    async fn resolve_static_first(&self) -> Result<Credentials, CrmError> {
        if let Some(token) = &self.static_token {
            debug!("Using static HubSpot access token by configured precedence");
            return Ok(Self::credentials(token.clone(), CredentialSource::Static));
        }

        match &self.broker {
            Ok(config) => {
                let token = self.fetch_broker_token(config).await.map_err(|err| {
                    CrmError::credential(format!("Failed to get access token: {err}"))
                })?;
                Ok(Self::credentials(token, CredentialSource::Broker))
            }
            Err(missing) => {
                let mut missing = missing.clone();
                missing.push(ENV_STATIC_TOKEN.to_string());
                Err(CrmError::missing_config(missing))
            }
        }
    }

    /// One round trip to the broker's connection endpoint, requesting a
    /// refreshed token for the stored connection identity.
    async fn fetch_broker_token(&self, config: &BrokerConfig) -> Result<String, CrmError> {
        let url = format!(
            "{}/connection/{}",
            config.base_url.trim_end_matches('/'),
            config.connection_id
        );

        debug!(%url, "Requesting refreshed credentials from broker");

        let response = self
            .client
            .get(&url)
            .query(&[
                ("provider_config_key", config.integration_id.as_str()),
                ("refresh_token", "true"),
            ])
            .bearer_auth(&config.secret_key)
            .timeout(BROKER_TIMEOUT)
            .send()
            .await
            .map_err(|err| {
                CrmError::credential(format!(
                    "Failed to get connection credentials from Nango: {err}"
                ))
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CrmError::credential(format!(
                "Failed to get connection credentials from Nango: {status} {body}"
            )));
        }

        let payload: Value = response.json().await.map_err(|err| {
            CrmError::credential(format!(
                "Failed to get connection credentials from Nango: {err}"
            ))
        })?;

        payload
            .pointer("/credentials/access_token")
            .and_then(Value::as_str)
            .filter(|token| !token.is_empty())
            .map(str::to_string)
            .ok_or_else(|| CrmError::credential("Access token not found in credentials response"))
    }

    fn credentials(access_token: String, source: CredentialSource) -> Credentials {
        Credentials {
            access_token,
            obtained_at: Utc::now(),
            source,
        }
    }
}

impl std::fmt::Debug for CredentialResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialResolver")
            .field("broker_configured", &self.broker.is_ok())
            .field("static_token", &self.static_token.is_some())
            .field("precedence", &self.precedence)
            .finish()
    }
}
