//! Outbound Adapters
//!
//! Implements the kernel's transport port against the real HubSpot API and
//! resolves the bearer token it needs:
//!
//! - `credentials`: delegated-auth broker client with static-token fallback
//!   and a single-slot, process-lifetime cache
//! - `executor`: the authenticated HTTP executor implementing `CrmTransport`

pub mod credentials;
pub mod executor;

pub use credentials::{
    BrokerConfig, CredentialResolver, CredentialSource, Credentials, TokenPrecedence,
};
pub use executor::HubSpotExecutor;
