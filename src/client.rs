//! CredHub Client Implementation
//!
//! This module contains the main `Client` struct that maps library calls to
//! the CredHub REST API.
//!
//! # Architecture
//!
//! - **HTTP Layer**: Built on `reqwest` for async HTTP operations
//! - **Authentication**: Bearer tokens or a refreshable token provider; a 401
//!   triggers one token refresh and one re-send of the request
//! - **Decoding**: Credentials come back as envelopes whose values are decoded
//!   on demand (see [`Credential`])
//! - **Telemetry**: Optional OpenTelemetry integration for observability
//!
//! There is no caching and no retry: every operation issues one request and
//! any failure is returned to the caller immediately.
//!
//! # Examples
//!
//! ```no_run
//! use credhub_sdk::{ClientBuilder, Credential, CredentialValue, OverwriteMode};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = ClientBuilder::new("https://credhub.example.com:8844")
//!     .client_credentials("my-client", "my-secret")
//!     .build()?;
//!
//! let cred = Credential::new(
//!     "/concourse/main/api-key",
//!     CredentialValue::Password("s3cr3t".to_string()),
//! );
//! let stored = client.set(&cred, OverwriteMode::Converge, &[]).await?;
//! println!("Stored version {}", stored.id);
//! # Ok(())
//! # }
//! ```

use crate::{
    auth::auth_error,
    config::ClientConfig,
    endpoints::Endpoints,
    errors::{Error, Result},
    interpolate::collect_references,
    models::*,
    selection::{select, VersionSelection},
    telemetry::{metrics_for, Metrics},
    util::generate_request_id,
};

use reqwest::{Client as HttpClient, Method, Response, StatusCode};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, trace, warn};

const USER_AGENT_PREFIX: &str = "credhub-sdk-rust";

/// CredHub client
///
/// Cheap to clone; clones share the connection pool and token provider.
#[derive(Clone)]
pub struct Client {
    pub(crate) config: ClientConfig,
    http: HttpClient,
    endpoints: Endpoints,
    metrics: Arc<Metrics>,
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("base_url", &self.config.base_url)
            .field("auth", &self.config.auth)
            .field("timeout", &self.config.timeout)
            .finish()
    }
}

#[derive(Deserialize)]
struct DataResponse {
    data: Vec<Credential>,
}

#[derive(Deserialize)]
struct PathsResponse {
    paths: Vec<PathEntry>,
}

#[derive(Deserialize)]
struct PathEntry {
    path: String,
}

#[derive(Deserialize)]
struct FindResponse {
    credentials: Vec<CredentialSummary>,
}

#[derive(Deserialize)]
struct PermissionsResponse {
    permissions: Vec<Permission>,
}

#[derive(Serialize)]
struct SetRequest<'a> {
    name: &'a str,
    #[serde(rename = "type")]
    credential_type: CredentialType,
    value: &'a serde_json::Value,
    mode: OverwriteMode,
    #[serde(skip_serializing_if = "Option::is_none")]
    additional_permissions: Option<&'a [Permission]>,
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    name: &'a str,
    #[serde(rename = "type")]
    credential_type: CredentialType,
    parameters: &'a serde_json::Value,
}

#[derive(Serialize)]
struct RegenerateRequest<'a> {
    name: &'a str,
}

#[derive(Serialize)]
struct AddPermissionsRequest<'a> {
    credential_name: &'a str,
    permissions: &'a [Permission],
}

impl Client {
    /// Create a new client with the given configuration
    pub(crate) fn new(config: ClientConfig) -> Result<Self> {
        // Build user agent
        let user_agent = if let Some(suffix) = &config.user_agent_suffix {
            format!("{}/{} {}", USER_AGENT_PREFIX, crate::VERSION, suffix)
        } else {
            format!("{}/{}", USER_AGENT_PREFIX, crate::VERSION)
        };

        // Create HTTP client
        let http_builder = HttpClient::builder()
            .user_agent(user_agent)
            .timeout(config.timeout)
            .pool_idle_timeout(Duration::from_secs(90))
            .pool_max_idle_per_host(10)
            .https_only(!config.allow_insecure_http);

        // Configure TLS
        #[cfg(any(feature = "rustls-tls", feature = "native-tls"))]
        let http_builder = http_builder.danger_accept_invalid_certs(config.skip_tls_verify);

        let http = http_builder
            .build()
            .map_err(|e| Error::Config(format!("Failed to build HTTP client: {}", e)))?;

        let metrics = metrics_for(&config.telemetry_config);

        Ok(Self {
            endpoints: Endpoints::new(&config.base_url),
            http,
            metrics,
            config,
        })
    }

    /// Base URL of the CredHub server
    pub fn base_url(&self) -> &str {
        self.endpoints.base_url()
    }

    // Server

    /// Fetch the server's `/info` document
    ///
    /// This request is sent without credentials.
    pub async fn info(&self) -> Result<ServerInfo> {
        let url = self.endpoints.info();
        let request = self
            .build_request(Method::GET, &url)?
            .build()
            .map_err(|e| Error::Other(format!("Failed to build request: {}", e)))?;

        let response = self.send(request).await?;
        self.expect_json(response, &url).await
    }

    /// Base URL of the authorization server, from `/info`
    pub async fn auth_server_url(&self) -> Result<String> {
        Ok(self.info().await?.auth_server.url)
    }

    /// OAuth token endpoint of the authorization server
    pub async fn token_endpoint(&self) -> Result<String> {
        crate::auth::token_endpoint(&self.http, self.endpoints.base_url()).await
    }

    /// Fetch the server version
    pub async fn server_version(&self) -> Result<ServerVersion> {
        let url = self.endpoints.version();
        let request = self.build_request(Method::GET, &url)?;
        let response = self.execute(request).await?;
        self.expect_json(response, &url).await
    }

    // Lookups

    /// List every path prefix currently holding credentials
    pub async fn list_all_paths(&self) -> Result<Vec<String>> {
        let request = self.build_request(Method::GET, &self.endpoints.all_paths())?;
        let response = self.execute(request).await?;
        let body: PathsResponse = self.expect_json(response, "paths").await?;

        Ok(body.paths.into_iter().map(|p| p.path).collect())
    }

    /// Get one credential version by its id
    ///
    /// # Errors
    ///
    /// * `Error::NotFound` if no version has this id
    /// * `Error::UnexpectedStatus` for any other non-success response
    pub async fn get_by_id(&self, id: &str) -> Result<Credential> {
        let request = self.build_request(Method::GET, &self.endpoints.data_by_id(id))?;
        let response = self.execute(request).await?;
        self.expect_json(response, id).await
    }

    /// Get versions of a named credential
    ///
    /// The versions are sorted newest first before `selection` is applied,
    /// whatever order the server returned them in.
    ///
    /// # Arguments
    ///
    /// * `name` - Full credential name, e.g. `/concourse/main/db-password`
    /// * `selection` - Which versions to keep
    ///
    /// # Errors
    ///
    /// * `Error::NotFound` if the name is unknown or has no versions
    /// * `Error::UnexpectedStatus` for any other non-success response
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use credhub_sdk::{Client, VersionSelection};
    /// # async fn example(client: &Client) -> Result<(), Box<dyn std::error::Error>> {
    /// let versions = client
    ///     .get_by_name("/concourse/main/db-password", VersionSelection::MostRecent(3))
    ///     .await?;
    /// for v in &versions {
    ///     println!("{} created at {}", v.id, v.created);
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub async fn get_by_name(
        &self,
        name: &str,
        selection: VersionSelection,
    ) -> Result<Vec<Credential>> {
        let url = match selection {
            VersionSelection::Latest => self.endpoints.current_by_name(name),
            VersionSelection::MostRecent(n) if n > 0 => self.endpoints.versions_by_name(name, n),
            VersionSelection::All | VersionSelection::MostRecent(_) => {
                self.endpoints.by_name(name)
            }
        };

        let request = self.build_request(Method::GET, &url)?;
        let response = self.execute(request).await?;
        let body: DataResponse = self.expect_json(response, name).await?;

        if body.data.is_empty() {
            return Err(Error::not_found(name));
        }

        trace!("Got {} versions of {}", body.data.len(), name);
        select(body.data, selection)
    }

    /// Get every version of a named credential, newest first
    pub async fn get_all_by_name(&self, name: &str) -> Result<Vec<Credential>> {
        self.get_by_name(name, VersionSelection::All).await
    }

    /// Get the `versions` most recent versions of a named credential
    pub async fn get_versions_by_name(&self, name: &str, versions: usize) -> Result<Vec<Credential>> {
        self.get_by_name(name, VersionSelection::MostRecent(versions))
            .await
    }

    /// Get the current version of a named credential
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use credhub_sdk::Client;
    /// # async fn example(client: &Client) -> Result<(), Box<dyn std::error::Error>> {
    /// let cred = client.get_latest_by_name("/concourse/main/db-user").await?;
    /// let user = cred.as_user()?;
    /// println!("username: {}", user.username);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn get_latest_by_name(&self, name: &str) -> Result<Credential> {
        self.get_by_name(name, VersionSelection::Latest)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| Error::not_found(name))
    }

    /// List credentials directly under `path` (not recursive)
    ///
    /// An empty listing is returned as an empty vector.
    pub async fn find_by_path(&self, path: &str) -> Result<Vec<CredentialSummary>> {
        let request = self.build_request(Method::GET, &self.endpoints.by_path(path))?;
        let response = self.execute(request).await?;
        let body: FindResponse = self.expect_json(response, path).await?;
        Ok(body.credentials)
    }

    /// List credentials whose name contains `partial`, ignoring case
    pub async fn find_by_partial_name(&self, partial: &str) -> Result<Vec<CredentialSummary>> {
        let request = self.build_request(Method::GET, &self.endpoints.by_partial_name(partial))?;
        let response = self.execute(request).await?;
        let body: FindResponse = self.expect_json(response, partial).await?;
        Ok(body.credentials)
    }

    // Writes

    /// Write a credential
    ///
    /// The server applies `mode`; this client only transmits it. Depending on
    /// the mode and the current version, the returned credential is either a
    /// new version or the existing one unchanged.
    ///
    /// # Arguments
    ///
    /// * `credential` - Name and value to write; `id` and `created` are ignored
    /// * `mode` - Overwrite semantics
    /// * `additional_permissions` - Grants to add along with the write
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use credhub_sdk::{Client, Credential, CredentialValue, OverwriteMode, Permission};
    /// # use serde_json::json;
    /// # async fn example(client: &Client) -> Result<(), Box<dyn std::error::Error>> {
    /// let cred = Credential::new("/app/config", CredentialValue::Json(json!({"port": 8080})));
    /// let reader = Permission::new("mtls-app:5532f504-bb3f-4d26-9bd4-c6f9b5b1f7d5", ["read"]);
    ///
    /// let stored = client.set(&cred, OverwriteMode::NoOverwrite, &[reader]).await?;
    /// println!("current version: {}", stored.id);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn set(
        &self,
        credential: &Credential,
        mode: OverwriteMode,
        additional_permissions: &[Permission],
    ) -> Result<Credential> {
        let body = SetRequest {
            name: &credential.name,
            credential_type: credential.credential_type(),
            value: credential.value(),
            mode,
            additional_permissions: if additional_permissions.is_empty() {
                None
            } else {
                Some(additional_permissions)
            },
        };

        debug!(
            "Setting {} credential {} with mode {}",
            body.credential_type,
            credential.name,
            mode.as_str()
        );

        let request = self
            .build_request(Method::PUT, &self.endpoints.data())?
            .json(&body);
        let response = self.execute(request).await?;
        self.expect_json(response, &credential.name).await
    }

    /// Have the server generate a new credential value
    ///
    /// `parameters` are the type-specific generation parameters, e.g.
    /// `{"length": 30, "exclude_upper": true}` for a password.
    ///
    /// # Errors
    ///
    /// * `Error::Unsupported` for `value` and `json` types; no request is sent
    /// * `Error::UnexpectedStatus` if the server rejects the parameters
    pub async fn generate(
        &self,
        name: &str,
        credential_type: CredentialType,
        parameters: serde_json::Value,
    ) -> Result<Credential> {
        if !credential_type.is_generatable() {
            return Err(Error::Unsupported(format!(
                "{} credentials cannot be generated",
                credential_type
            )));
        }

        let body = GenerateRequest {
            name,
            credential_type,
            parameters: &parameters,
        };

        debug!("Generating {} credential {}", credential_type, name);

        let request = self
            .build_request(Method::POST, &self.endpoints.data())?
            .json(&body);
        let response = self.execute(request).await?;
        self.expect_json(response, name).await
    }

    /// Generate a new version using the credential's original parameters
    ///
    /// Fails with `Error::UnexpectedStatus` if the credential was set rather
    /// than generated.
    pub async fn regenerate(&self, name: &str) -> Result<Credential> {
        debug!("Regenerating credential {}", name);

        let request = self
            .build_request(Method::POST, &self.endpoints.regenerate())?
            .json(&RegenerateRequest { name });
        let response = self.execute(request).await?;
        self.expect_json(response, name).await
    }

    /// Delete every version of a named credential
    ///
    /// # Errors
    ///
    /// `Error::UnexpectedStatus` unless the server answers 204 No Content,
    /// including when the name does not exist.
    pub async fn delete(&self, name: &str) -> Result<()> {
        debug!("Deleting credential {}", name);

        let request = self.build_request(Method::DELETE, &self.endpoints.by_name(name))?;
        let response = self.execute(request).await?;
        self.expect_no_content(response).await
    }

    // Permissions

    /// Get the permissions granted on a credential
    ///
    /// # Errors
    ///
    /// `Error::NotFound` if the credential name is unknown.
    pub async fn get_permissions(&self, credential_name: &str) -> Result<Vec<Permission>> {
        let request =
            self.build_request(Method::GET, &self.endpoints.permissions_for(credential_name))?;
        let response = self.execute(request).await?;
        let body: PermissionsResponse = self.expect_json(response, credential_name).await?;
        Ok(body.permissions)
    }

    /// Add permissions to a credential
    ///
    /// Not idempotent: adding the same grant twice leaves two entries.
    /// Returns the full permission set reported by the server.
    pub async fn add_permissions(
        &self,
        credential_name: &str,
        permissions: &[Permission],
    ) -> Result<Vec<Permission>> {
        debug!(
            "Adding {} permissions to {}",
            permissions.len(),
            credential_name
        );

        let request = self
            .build_request(Method::POST, &self.endpoints.permissions())?
            .json(&AddPermissionsRequest {
                credential_name,
                permissions,
            });
        let response = self.execute(request).await?;
        let body: PermissionsResponse = self.expect_json(response, credential_name).await?;
        Ok(body.permissions)
    }

    /// Remove every grant held by `actor` on a credential
    ///
    /// Removing a grant that does not exist succeeds.
    pub async fn delete_permissions(&self, credential_name: &str, actor: &str) -> Result<()> {
        debug!("Deleting permissions of {} on {}", actor, credential_name);

        let url = self
            .endpoints
            .permission_for_actor(credential_name, actor);
        let request = self.build_request(Method::DELETE, &url)?;
        let response = self.execute(request).await?;
        self.expect_no_content(response).await
    }

    // Interpolation

    /// Resolve credential references in a JSON document
    ///
    /// Every object whose only key is `credhub-ref` is replaced by the value
    /// of the current version of the named credential. References are
    /// resolved one at a time, objects in sorted key order and arrays by
    /// index. The first failure aborts the whole operation; no partially
    /// interpolated document is returned.
    pub async fn interpolate_value(&self, mut document: serde_json::Value) -> Result<serde_json::Value> {
        let references = collect_references(&document);
        debug!("Interpolating {} credential references", references.len());

        for reference in references {
            let credential = self.get_latest_by_name(&reference.name).await?;
            let slot = document.pointer_mut(&reference.pointer).ok_or_else(|| {
                Error::Other(format!("reference at {} disappeared", reference.pointer))
            })?;
            *slot = credential.value().clone();
        }

        Ok(document)
    }

    /// Resolve credential references in a JSON string such as `VCAP_SERVICES`
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use credhub_sdk::Client;
    /// # async fn example(client: &Client) -> Result<(), Box<dyn std::error::Error>> {
    /// let vcap = std::env::var("VCAP_SERVICES")?;
    /// let resolved = client.interpolate_credentials(&vcap).await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn interpolate_credentials(&self, document: &str) -> Result<String> {
        let parsed: serde_json::Value = serde_json::from_str(document)?;
        let resolved = self.interpolate_value(parsed).await?;
        Ok(serde_json::to_string(&resolved)?)
    }

    // Helper methods

    /// Build a request with common headers
    fn build_request(&self, method: Method, url: &str) -> Result<reqwest::RequestBuilder> {
        let request_id = generate_request_id();
        let builder = self
            .http
            .request(method, url)
            .header("X-Request-ID", &request_id)
            .header("Accept", "application/json");

        Ok(builder)
    }

    /// Authenticate and send a request, refreshing the token once on 401
    async fn execute(&self, request_builder: reqwest::RequestBuilder) -> Result<Response> {
        let auth = &self.config.auth;
        let mut refreshed = false;

        loop {
            let (auth_header, auth_value) = auth.get_header().await.map_err(auth_error)?;

            let request = request_builder
                .try_clone()
                .ok_or_else(|| Error::Other("Request cannot be cloned".to_string()))?
                .header(auth_header, auth_value)
                .build()
                .map_err(|e| Error::Other(format!("Failed to build request: {}", e)))?;

            let response = self.send(request).await?;

            if response.status() == StatusCode::UNAUTHORIZED && !refreshed && auth.supports_refresh()
            {
                warn!("Got 401, attempting token refresh");
                self.metrics.record_token_refresh();
                auth.refresh().await.map_err(auth_error)?;
                refreshed = true;
                continue;
            }

            return Ok(response);
        }
    }

    /// Send a built request and record it
    async fn send(&self, request: reqwest::Request) -> Result<Response> {
        let method = request.method().to_string();
        let path = request.url().path().to_string();
        debug!("{} {}", method, path);

        let start_time = Instant::now();
        match self.http.execute(request).await {
            Ok(response) => {
                let status = response.status().as_u16();
                trace!("{} {} -> {}", method, path, status);
                self.metrics.record_request(
                    &method,
                    &path,
                    status,
                    start_time.elapsed().as_secs_f64(),
                );
                Ok(response)
            }
            Err(e) => {
                self.metrics.record_transport_error(&method, &path);
                Err(Error::from(e))
            }
        }
    }

    /// Parse error response from server
    async fn parse_error_response(&self, response: Response) -> Error {
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        Error::from_response(status, &body)
    }

    /// Parse a JSON success body; 404 becomes `NotFound` for `resource`
    async fn expect_json<T: DeserializeOwned>(&self, response: Response, resource: &str) -> Result<T> {
        let status = response.status();

        if status == StatusCode::NOT_FOUND {
            return Err(Error::not_found(resource));
        }
        if !status.is_success() {
            return Err(self.parse_error_response(response).await);
        }

        response.json().await.map_err(Error::from)
    }

    /// Accept only 204 No Content
    async fn expect_no_content(&self, response: Response) -> Result<()> {
        let status = response.status();

        if status == StatusCode::NO_CONTENT {
            return Ok(());
        }
        if status.is_success() {
            return Err(Error::UnexpectedStatus {
                status: status.as_u16(),
                message: format!("expected status 204, got {}", status.as_u16()),
            });
        }

        Err(self.parse_error_response(response).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        auth::{Auth, StaticTokenProvider, TokenProvider},
        ClientBuilder,
    };
    use async_trait::async_trait;
    use secrecy::SecretString;
    use serde_json::json;
    use std::sync::Mutex;
    use wiremock::matchers::{header, header_exists, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn create_test_client(base_url: &str, auth: Auth) -> Client {
        ClientBuilder::new(base_url)
            .auth(auth)
            .allow_insecure_http()
            .build()
            .unwrap()
    }

    #[derive(Clone)]
    struct RotatingProvider {
        token: Arc<Mutex<String>>,
    }

    #[async_trait]
    impl TokenProvider for RotatingProvider {
        async fn get_token(
            &self,
        ) -> std::result::Result<SecretString, Box<dyn std::error::Error + Send + Sync>> {
            Ok(SecretString::new(self.token.lock().unwrap().clone()))
        }

        async fn refresh_token(
            &self,
        ) -> std::result::Result<(), Box<dyn std::error::Error + Send + Sync>> {
            *self.token.lock().unwrap() = "new".to_string();
            Ok(())
        }

        fn clone_box(&self) -> Box<dyn TokenProvider> {
            Box::new(self.clone())
        }
    }

    fn credential_body() -> serde_json::Value {
        json!({
            "id": "abc",
            "name": "/p",
            "type": "password",
            "version_created_at": "2020-01-01T00:00:00Z",
            "value": "pw"
        })
    }

    #[test]
    fn test_client_creation() {
        let client = ClientBuilder::new("https://credhub.example.com")
            .auth(Auth::bearer("test-token"))
            .build();
        assert!(client.is_ok());
    }

    #[tokio::test]
    async fn test_request_headers() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/v1/data/abc"))
            .and(header("Authorization", "Bearer test-token"))
            .and(header_exists("X-Request-ID"))
            .respond_with(ResponseTemplate::new(200).set_body_json(credential_body()))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = create_test_client(&mock_server.uri(), Auth::bearer("test-token"));
        let cred = client.get_by_id("abc").await.unwrap();
        assert_eq!(cred.as_password().unwrap(), "pw");
    }

    #[tokio::test]
    async fn test_token_refresh_on_401() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/v1/data/abc"))
            .and(header("Authorization", "Bearer old"))
            .respond_with(ResponseTemplate::new(401))
            .expect(1)
            .mount(&mock_server)
            .await;

        Mock::given(method("GET"))
            .and(path("/api/v1/data/abc"))
            .and(header("Authorization", "Bearer new"))
            .respond_with(ResponseTemplate::new(200).set_body_json(credential_body()))
            .expect(1)
            .mount(&mock_server)
            .await;

        let provider = RotatingProvider {
            token: Arc::new(Mutex::new("old".to_string())),
        };
        let client = create_test_client(&mock_server.uri(), Auth::token_provider(provider));

        let cred = client.get_by_id("abc").await.unwrap();
        assert_eq!(cred.id, "abc");
    }

    #[tokio::test]
    async fn test_token_refresh_only_once() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/v1/data/abc"))
            .respond_with(ResponseTemplate::new(401))
            .expect(2)
            .mount(&mock_server)
            .await;

        let client = create_test_client(
            &mock_server.uri(),
            Auth::token_provider(StaticTokenProvider::new("static")),
        );

        let err = client.get_by_id("abc").await.unwrap_err();
        assert_eq!(err.status_code(), Some(401));
    }

    #[tokio::test]
    async fn test_bearer_401_is_not_resent() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/v1/data/abc"))
            .respond_with(ResponseTemplate::new(401))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = create_test_client(&mock_server.uri(), Auth::bearer("expired"));
        let err = client.get_by_id("abc").await.unwrap_err();
        assert!(matches!(err, Error::UnexpectedStatus { status: 401, .. }));
    }

    #[tokio::test]
    async fn test_info_is_unauthenticated() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/info"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "auth-server": {"url": "https://uaa.example.com:8443"},
                "app": {"name": "CredHub"}
            })))
            .expect(2)
            .mount(&mock_server)
            .await;

        let client = create_test_client(&mock_server.uri(), Auth::bearer("test-token"));

        let info = client.info().await.unwrap();
        assert_eq!(info.app.unwrap().name, "CredHub");
        assert_eq!(
            client.token_endpoint().await.unwrap(),
            "https://uaa.example.com:8443/oauth/token"
        );

        let requests = mock_server.received_requests().await.unwrap();
        assert!(requests
            .iter()
            .all(|r| !r.headers.contains_key("authorization")));
    }

    #[tokio::test]
    async fn test_generate_unsupported_sends_nothing() {
        let mock_server = MockServer::start().await;
        let client = create_test_client(&mock_server.uri(), Auth::bearer("test-token"));

        for credential_type in [CredentialType::Value, CredentialType::Json] {
            let err = client
                .generate("/x", credential_type, json!({}))
                .await
                .unwrap_err();
            assert!(matches!(err, Error::Unsupported(_)));
        }

        assert!(mock_server.received_requests().await.unwrap().is_empty());
    }
}
