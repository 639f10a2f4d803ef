use crate::{
    auth::{Auth, ClientCredentials, OAuthConfig},
    errors::Result,
    telemetry::TelemetryConfig,
    Error,
};
use secrecy::SecretString;
use std::time::Duration;

/// Client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the CredHub server
    pub base_url: String,
    /// Authentication configuration
    pub auth: Auth,
    /// Request timeout
    pub timeout: Duration,
    /// User agent suffix
    pub user_agent_suffix: Option<String>,
    /// Skip TLS certificate verification
    pub skip_tls_verify: bool,
    /// Telemetry configuration
    pub telemetry_config: TelemetryConfig,
    /// Allow plain HTTP base URLs
    pub allow_insecure_http: bool,
}

/// Builder for creating a configured Client
///
/// # Example
///
/// ```no_run
/// use credhub_sdk::ClientBuilder;
///
/// # fn example() -> credhub_sdk::Result<()> {
/// let client = ClientBuilder::new("https://credhub.example.com:8844")
///     .client_credentials("director_to_credhub", "secret")
///     .scopes(["credhub.read"])
///     .timeout_ms(10_000)
///     .build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct ClientBuilder {
    base_url: String,
    auth: Option<Auth>,
    client_id: Option<String>,
    client_secret: Option<SecretString>,
    scopes: Vec<String>,
    token_url: Option<String>,
    timeout_ms: u64,
    user_agent_suffix: Option<String>,
    skip_tls_verify: bool,
    telemetry_config: TelemetryConfig,
    allow_insecure_http: bool,
}

impl ClientBuilder {
    /// Create a new client builder with the given base URL
    ///
    /// # Arguments
    ///
    /// * `base_url` - Base URL of the CredHub server (e.g., `"https://credhub.example.com:8844"`)
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            auth: None,
            client_id: None,
            client_secret: None,
            scopes: crate::DEFAULT_SCOPES.iter().map(|s| s.to_string()).collect(),
            token_url: None,
            timeout_ms: crate::DEFAULT_TIMEOUT_MS,
            user_agent_suffix: None,
            skip_tls_verify: false,
            telemetry_config: TelemetryConfig::default(),
            allow_insecure_http: false,
        }
    }

    /// Set the authentication method
    ///
    /// Takes precedence over [`client_credentials`](Self::client_credentials).
    pub fn auth(mut self, auth: Auth) -> Self {
        self.auth = Some(auth);
        self
    }

    /// Authenticate with the OAuth2 client-credentials grant
    pub fn client_credentials(
        mut self,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Self {
        self.client_id = Some(client_id.into());
        self.client_secret = Some(SecretString::new(client_secret.into()));
        self
    }

    /// Set the scopes requested with client credentials
    pub fn scopes<I, S>(mut self, scopes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.scopes = scopes.into_iter().map(Into::into).collect();
        self
    }

    /// Use this token endpoint instead of discovering it from `/info`
    pub fn token_url(mut self, token_url: impl Into<String>) -> Self {
        self.token_url = Some(token_url.into());
        self
    }

    /// Set the request timeout in milliseconds
    pub fn timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Add a custom user agent suffix
    pub fn user_agent_extra(mut self, suffix: impl Into<String>) -> Self {
        self.user_agent_suffix = Some(suffix.into());
        self
    }

    /// Skip TLS certificate verification (dangerous!)
    pub fn skip_tls_verify(mut self, skip: bool) -> Self {
        self.skip_tls_verify = skip;
        self
    }

    /// Configure telemetry/metrics
    #[cfg(feature = "metrics")]
    pub fn with_telemetry(mut self, config: TelemetryConfig) -> Self {
        self.telemetry_config = config;
        self
    }

    /// Enable telemetry with default settings
    #[cfg(feature = "metrics")]
    pub fn enable_telemetry(mut self) -> Self {
        self.telemetry_config.enabled = true;
        self
    }

    /// Allow plain HTTP base URLs (dangerous!)
    pub fn allow_insecure_http(mut self) -> Self {
        self.allow_insecure_http = true;
        self
    }

    /// Build the client with the configured options
    pub fn build(self) -> Result<crate::Client> {
        let url = self.base_url.trim_end_matches('/');

        // Validate URL format
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(Error::Config(
                "Base URL must start with http:// or https://".to_string(),
            ));
        }

        // Check for insecure HTTP
        if url.starts_with("http://") && !self.allow_insecure_http {
            return Err(Error::Config(
                "HTTP URLs are not allowed by default. Use .allow_insecure_http() to enable (dangerous!)"
                    .to_string(),
            ));
        }

        let timeout = Duration::from_millis(self.timeout_ms);

        // Require authentication
        let auth = match (self.auth, self.client_id, self.client_secret) {
            (Some(auth), _, _) => auth,
            (None, Some(client_id), Some(client_secret)) => {
                let provider = ClientCredentials::new(
                    url,
                    OAuthConfig {
                        client_id,
                        client_secret,
                        scopes: self.scopes,
                        token_url: self.token_url,
                        skip_tls_verify: self.skip_tls_verify,
                        timeout,
                    },
                )?;
                Auth::token_provider(provider)
            }
            _ => {
                return Err(Error::Config(
                    "Authentication is required. Use .auth() or .client_credentials()".to_string(),
                ))
            }
        };

        let config = ClientConfig {
            base_url: url.to_string(),
            auth,
            timeout,
            user_agent_suffix: self.user_agent_suffix,
            skip_tls_verify: self.skip_tls_verify,
            telemetry_config: self.telemetry_config,
            allow_insecure_http: self.allow_insecure_http,
        };

        crate::client::Client::new(config)
    }
}
