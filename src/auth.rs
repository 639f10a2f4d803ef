//! Authentication support for the CredHub SDK
//!
//! Every API request carries an `Authorization: Bearer <token>` header. The
//! token comes from one of:
//!
//! 1. **Bearer Token** - A fixed token obtained elsewhere
//! 2. **Token Provider** - Dynamic tokens with refresh capability, including
//!    the built-in OAuth2 client-credentials provider [`ClientCredentials`]
//!
//! # Examples
//!
//! ## Static Authentication
//!
//! ```
//! use credhub_sdk::Auth;
//!
//! let auth = Auth::bearer("your-access-token");
//! ```
//!
//! ## OAuth2 Client Credentials
//!
//! The token endpoint is discovered from the CredHub `/info` document on
//! first use unless it is configured explicitly.
//!
//! ```no_run
//! use credhub_sdk::ClientBuilder;
//!
//! # fn example() -> credhub_sdk::Result<()> {
//! let client = ClientBuilder::new("https://credhub.example.com:8844")
//!     .client_credentials("my-client", "my-secret")
//!     .build()?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Dynamic Token Provider
//!
//! ```
//! use credhub_sdk::{Auth, TokenProvider, SecretString};
//! use async_trait::async_trait;
//! use std::sync::{Arc, Mutex};
//!
//! #[derive(Clone)]
//! struct MyTokenProvider {
//!     current_token: Arc<Mutex<String>>,
//! }
//!
//! #[async_trait]
//! impl TokenProvider for MyTokenProvider {
//!     async fn get_token(&self) -> Result<SecretString, Box<dyn std::error::Error + Send + Sync>> {
//!         let token = self.current_token.lock().unwrap().clone();
//!         Ok(SecretString::new(token))
//!     }
//!
//!     async fn refresh_token(&self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
//!         *self.current_token.lock().unwrap() = "refreshed-token".to_string();
//!         Ok(())
//!     }
//!
//!     fn clone_box(&self) -> Box<dyn TokenProvider> {
//!         Box::new(self.clone())
//!     }
//! }
//!
//! let provider = MyTokenProvider {
//!     current_token: Arc::new(Mutex::new("initial-token".to_string())),
//! };
//! let auth = Auth::token_provider(provider);
//! ```

use crate::errors::Error;
use crate::models::ServerInfo;
use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{OnceCell, RwLock};
use tracing::{debug, warn};

/// Tokens are renewed this long before the server-reported expiry
const EXPIRY_MARGIN: Duration = Duration::from_secs(30);

/// Authentication method for the CredHub API
///
/// # Security
///
/// All authentication credentials are stored using [`SecretString`] to prevent
/// accidental exposure in logs or debug output.
#[derive(Clone)]
pub enum Auth {
    /// Fixed bearer token
    ///
    /// Sent as `Authorization: Bearer <token>`
    Bearer(SecretString),
    /// Dynamic token provider for refreshable tokens
    ///
    /// Supports one token refresh on a 401 response
    TokenProvider(Box<dyn TokenProvider>),
}

impl Auth {
    /// Create a bearer token authentication
    pub fn bearer(token: impl Into<String>) -> Self {
        Auth::Bearer(SecretString::new(token.into()))
    }

    /// Create a dynamic token provider authentication
    pub fn token_provider(provider: impl TokenProvider + 'static) -> Self {
        Auth::TokenProvider(Box::new(provider))
    }

    /// Get the authorization header name and value
    pub(crate) async fn get_header(&self) -> Result<(&'static str, String), Box<dyn std::error::Error + Send + Sync>> {
        match self {
            Auth::Bearer(token) => Ok(("Authorization", format!("Bearer {}", token.expose_secret()))),
            Auth::TokenProvider(provider) => {
                let token = provider.get_token().await?;
                Ok(("Authorization", format!("Bearer {}", token.expose_secret())))
            }
        }
    }

    /// Check if this auth method supports token refresh
    pub(crate) fn supports_refresh(&self) -> bool {
        matches!(self, Auth::TokenProvider(_))
    }

    /// Refresh the token (only for TokenProvider)
    pub(crate) async fn refresh(&self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        match self {
            Auth::TokenProvider(provider) => provider.refresh_token().await,
            Auth::Bearer(_) => Ok(()),
        }
    }
}

impl fmt::Debug for Auth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Auth::Bearer(_) => write!(f, "Auth::Bearer(****)"),
            Auth::TokenProvider(_) => write!(f, "Auth::TokenProvider(****)"),
        }
    }
}

/// Map a provider failure to an SDK error, keeping SDK errors intact
pub(crate) fn auth_error(err: Box<dyn std::error::Error + Send + Sync>) -> Error {
    match err.downcast::<Error>() {
        Ok(err) => *err,
        Err(other) => Error::Auth(other.to_string()),
    }
}

/// Trait for providing dynamic tokens that can be refreshed
///
/// The SDK calls `refresh_token` when it receives a 401 response and sends
/// the request once more.
#[async_trait]
pub trait TokenProvider: Send + Sync {
    /// Get the current token
    ///
    /// Called before each request to get the authentication token.
    /// Should return quickly, typically from a cached value.
    async fn get_token(&self) -> Result<SecretString, Box<dyn std::error::Error + Send + Sync>>;

    /// Refresh the token (called on 401 responses)
    async fn refresh_token(&self) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;

    /// Clone the provider
    ///
    /// Typically implemented as `Box::new(self.clone())`.
    fn clone_box(&self) -> Box<dyn TokenProvider>;
}

impl Clone for Box<dyn TokenProvider> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}

/// Static token provider (for testing or simple cases)
#[derive(Clone)]
pub struct StaticTokenProvider {
    token: SecretString,
}

impl StaticTokenProvider {
    /// Create a new static token provider
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: SecretString::new(token.into()),
        }
    }
}

impl fmt::Debug for StaticTokenProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StaticTokenProvider(****)")
    }
}

#[async_trait]
impl TokenProvider for StaticTokenProvider {
    async fn get_token(&self) -> Result<SecretString, Box<dyn std::error::Error + Send + Sync>> {
        Ok(self.token.clone())
    }

    async fn refresh_token(&self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        // Static tokens cannot be refreshed
        Ok(())
    }

    fn clone_box(&self) -> Box<dyn TokenProvider> {
        Box::new(self.clone())
    }
}

/// OAuth2 client-credentials settings
#[derive(Clone)]
pub struct OAuthConfig {
    /// OAuth client id
    pub client_id: String,
    /// OAuth client secret
    pub client_secret: SecretString,
    /// Requested scopes, sent space separated
    pub scopes: Vec<String>,
    /// Token endpoint; discovered from `/info` when `None`
    pub token_url: Option<String>,
    /// Skip TLS certificate verification on the token and discovery requests
    pub skip_tls_verify: bool,
    /// Timeout for token and discovery requests
    pub timeout: Duration,
}

impl OAuthConfig {
    /// Settings with the default scopes and timeout
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: SecretString::new(client_secret.into()),
            scopes: crate::DEFAULT_SCOPES.iter().map(|s| s.to_string()).collect(),
            token_url: None,
            skip_tls_verify: false,
            timeout: Duration::from_millis(crate::DEFAULT_TIMEOUT_MS),
        }
    }
}

impl fmt::Debug for OAuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OAuthConfig")
            .field("client_id", &self.client_id)
            .field("client_secret", &"****")
            .field("scopes", &self.scopes)
            .field("token_url", &self.token_url)
            .field("skip_tls_verify", &self.skip_tls_verify)
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<u64>,
}

struct CachedToken {
    token: SecretString,
    expires_at: Option<Instant>,
}

impl CachedToken {
    fn is_fresh(&self) -> bool {
        match self.expires_at {
            Some(expires_at) => Instant::now() + EXPIRY_MARGIN < expires_at,
            None => true,
        }
    }
}

struct ClientCredentialsInner {
    http: reqwest::Client,
    base_url: String,
    config: OAuthConfig,
    token_url: OnceCell<String>,
    token: RwLock<Option<CachedToken>>,
}

/// OAuth2 client-credentials token provider
///
/// Fetches tokens from the authorization server and reuses them until
/// shortly before they expire. Clones share the same token.
#[derive(Clone)]
pub struct ClientCredentials {
    inner: Arc<ClientCredentialsInner>,
}

impl ClientCredentials {
    /// Create a provider for the CredHub server at `base_url`
    ///
    /// No request is made until the first token is needed.
    ///
    /// # Errors
    ///
    /// [`Error::Config`] if the HTTP client cannot be built.
    pub fn new(base_url: impl Into<String>, config: OAuthConfig) -> crate::Result<Self> {
        let builder = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(format!("credhub-sdk-rust/{}", crate::VERSION));

        #[cfg(any(feature = "rustls-tls", feature = "native-tls"))]
        let builder = builder.danger_accept_invalid_certs(config.skip_tls_verify);

        let http = builder
            .build()
            .map_err(|e| Error::Config(format!("Failed to build HTTP client: {}", e)))?;

        let token_url = match &config.token_url {
            Some(url) => OnceCell::new_with(Some(url.clone())),
            None => OnceCell::new(),
        };

        Ok(Self {
            inner: Arc::new(ClientCredentialsInner {
                http,
                base_url: base_url.into().trim_end_matches('/').to_string(),
                config,
                token_url,
                token: RwLock::new(None),
            }),
        })
    }

    /// Token endpoint, discovered on first call
    pub async fn token_url(&self) -> crate::Result<&str> {
        let url = self
            .inner
            .token_url
            .get_or_try_init(|| token_endpoint(&self.inner.http, &self.inner.base_url))
            .await?;
        Ok(url.as_str())
    }

    async fn fetch_token(&self) -> crate::Result<SecretString> {
        let token_url = self.token_url().await?;
        let scope = self.inner.config.scopes.join(" ");
        let mut form = vec![("grant_type", "client_credentials")];
        if !scope.is_empty() {
            form.push(("scope", scope.as_str()));
        }

        debug!("Requesting client-credentials token from {}", token_url);

        let response = self
            .inner
            .http
            .post(token_url)
            .basic_auth(
                &self.inner.config.client_id,
                Some(self.inner.config.client_secret.expose_secret()),
            )
            .header("Accept", "application/json")
            .form(&form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<crate::errors::ErrorResponse>(&body)
                .ok()
                .and_then(|r| r.error_description.or(r.error))
                .unwrap_or_else(|| format!("HTTP error {}", status.as_u16()));
            return Err(Error::Auth(format!(
                "token request failed with status {}: {}",
                status.as_u16(),
                message
            )));
        }

        let body: TokenResponse = response
            .json()
            .await
            .map_err(|e| Error::Auth(format!("invalid token response: {}", e)))?;

        let token = SecretString::new(body.access_token);
        let expires_at = body
            .expires_in
            .and_then(|secs| Instant::now().checked_add(Duration::from_secs(secs)));

        *self.inner.token.write().await = Some(CachedToken {
            token: token.clone(),
            expires_at,
        });

        Ok(token)
    }
}

impl fmt::Debug for ClientCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientCredentials")
            .field("base_url", &self.inner.base_url)
            .field("config", &self.inner.config)
            .finish()
    }
}

#[async_trait]
impl TokenProvider for ClientCredentials {
    async fn get_token(&self) -> Result<SecretString, Box<dyn std::error::Error + Send + Sync>> {
        if let Some(cached) = self.inner.token.read().await.as_ref() {
            if cached.is_fresh() {
                return Ok(cached.token.clone());
            }
        }

        Ok(self.fetch_token().await?)
    }

    async fn refresh_token(&self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        warn!("Refreshing client-credentials token");
        let _ = self.fetch_token().await?;
        Ok(())
    }

    fn clone_box(&self) -> Box<dyn TokenProvider> {
        Box::new(self.clone())
    }
}

/// Discover the OAuth token endpoint of a CredHub server
///
/// Reads `auth-server.url` from `GET {base_url}/info` and appends
/// `/oauth/token`.
///
/// # Errors
///
/// [`Error::Config`] if the info document is unavailable or malformed.
pub async fn token_endpoint(http: &reqwest::Client, base_url: &str) -> crate::Result<String> {
    let url = format!("{}/info", base_url.trim_end_matches('/'));
    debug!("Discovering auth server from {}", url);

    let response = http.get(&url).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(Error::Config(format!(
            "auth server discovery failed: GET {} returned {}",
            url,
            status.as_u16()
        )));
    }

    let info: ServerInfo = response
        .json()
        .await
        .map_err(|e| Error::Config(format!("invalid /info document: {}", e)))?;

    Ok(format!(
        "{}/oauth/token",
        info.auth_server.url.trim_end_matches('/')
    ))
}
