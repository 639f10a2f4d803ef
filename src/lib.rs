//! CredHub SDK for Rust
//!
//! A typed async client for the CredHub credential management API: storing,
//! versioning, generating and sharing secrets.
//!
//! # Features
//!
//! - Async/await support with tokio runtime
//! - OAuth2 client-credentials authentication with token endpoint discovery
//! - Typed credential values with strict decoding
//! - Version selection (latest, all, N most recent)
//! - Overwrite, no-overwrite and converge write modes
//! - Permission management
//! - `VCAP_SERVICES` style credential interpolation
//! - Secure value handling with zeroization
//!
//! # Example
//!
//! ```no_run
//! use credhub_sdk::{ClientBuilder, CredentialType};
//! use serde_json::json;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = ClientBuilder::new("https://credhub.example.com:8844")
//!         .client_credentials("my-client", "my-secret")
//!         .build()?;
//!
//!     let generated = client
//!         .generate("/concourse/main/db-password", CredentialType::Password, json!({"length": 40}))
//!         .await?;
//!     println!("Generated version {}", generated.id);
//!
//!     let latest = client.get_latest_by_name("/concourse/main/db-password").await?;
//!     assert_eq!(latest.id, generated.id);
//!
//!     Ok(())
//! }
//! ```

#![deny(
    missing_docs,
    missing_debug_implementations,
    unsafe_code,
    unused_results
)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod auth;
mod client;
mod config;
mod endpoints;
mod errors;
mod interpolate;
mod models;
mod selection;
/// Telemetry and observability support
#[cfg(feature = "metrics")]
pub mod telemetry;

#[cfg(not(feature = "metrics"))]
mod telemetry;
mod util;
mod value;

pub use auth::{token_endpoint, Auth, ClientCredentials, OAuthConfig, StaticTokenProvider, TokenProvider};
pub use client::Client;
pub use config::{ClientBuilder, ClientConfig};
pub use errors::{Error, ErrorKind, Result};
pub use interpolate::{collect_references, Reference, REFERENCE_KEY};
pub use models::*;
pub use selection::{select, sort_by_created_desc, VersionSelection};
pub use value::{CertificateValue, CredentialValue, RsaValue, SshValue, UserValue};

// Re-export commonly used types
pub use secrecy::SecretString;

/// SDK version, matches Cargo.toml version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default timeout in milliseconds
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;

/// Scopes requested with client credentials unless configured otherwise
pub const DEFAULT_SCOPES: &[&str] = &["credhub.read", "credhub.write"];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
