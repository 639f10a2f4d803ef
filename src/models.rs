//! Data models for the CredHub SDK
//!
//! This module contains the data structures exchanged with the CredHub API.
//!
//! # Key Types
//!
//! * [`Credential`] - One stored version of a named credential
//! * [`CredentialType`] - The closed set of credential type tags
//! * [`Permission`] - An actor and the operations granted to it
//! * [`OverwriteMode`] - Write semantics for [`Client::set`](crate::Client::set)

use crate::errors::{Error, Result};
use crate::value::{CertificateValue, CredentialValue, RsaValue, SshValue, UserValue};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;
use tracing::trace;

/// Credential type tags supported by CredHub
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CredentialType {
    /// A generic scalar value
    Value,
    /// A password that can be (re-)generated
    Password,
    /// A username, password, and password hash
    User,
    /// An arbitrary block of JSON
    Json,
    /// A public/private key pair
    Rsa,
    /// An SSH private key, public key (OpenSSH format), and fingerprint
    Ssh,
    /// A private key, associated certificate, and CA
    Certificate,
}

impl CredentialType {
    /// Wire name of the type
    pub fn as_str(&self) -> &'static str {
        match self {
            CredentialType::Value => "value",
            CredentialType::Password => "password",
            CredentialType::User => "user",
            CredentialType::Json => "json",
            CredentialType::Rsa => "rsa",
            CredentialType::Ssh => "ssh",
            CredentialType::Certificate => "certificate",
        }
    }

    /// Whether the server can generate values of this type
    ///
    /// `value` and `json` credentials have no generation parameters and can
    /// only be set.
    pub fn is_generatable(&self) -> bool {
        !matches!(self, CredentialType::Value | CredentialType::Json)
    }
}

impl fmt::Display for CredentialType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CredentialType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "value" => Ok(CredentialType::Value),
            "password" => Ok(CredentialType::Password),
            "user" => Ok(CredentialType::User),
            "json" => Ok(CredentialType::Json),
            "rsa" => Ok(CredentialType::Rsa),
            "ssh" => Ok(CredentialType::Ssh),
            "certificate" => Ok(CredentialType::Certificate),
            other => Err(Error::Deserialize(format!(
                "unknown credential type: {}",
                other
            ))),
        }
    }
}

/// One version of a named credential
///
/// Every write creates a new version with its own `id`; all versions share
/// the `name`. The `value` is kept as raw JSON and decoded on demand by the
/// typed extractors, which check the type tag first and then decode strictly.
/// The first successful decode is memoized on the envelope.
///
/// # Example
///
/// ```no_run
/// # use credhub_sdk::Client;
/// # async fn example(client: &Client) -> Result<(), Box<dyn std::error::Error>> {
/// let cred = client.get_latest_by_name("/concourse/main/deploy-key").await?;
/// let ssh = cred.as_ssh()?;
/// println!("fingerprint: {}", ssh.public_key_fingerprint);
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Serialize, Deserialize)]
pub struct Credential {
    /// Hierarchical name, e.g. `/org/app/secret`
    pub name: String,
    /// Version identifier, empty for credentials not yet stored
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    /// Creation timestamp of this version (RFC 3339)
    #[serde(
        rename = "version_created_at",
        default,
        skip_serializing_if = "String::is_empty"
    )]
    pub created: String,
    #[serde(rename = "type")]
    credential_type: CredentialType,
    #[serde(default)]
    value: serde_json::Value,
    #[serde(skip)]
    decoded: OnceLock<CredentialValue>,
}

impl Credential {
    /// Build a credential to be written with [`Client::set`](crate::Client::set)
    ///
    /// The value is decoded lazily like a fetched credential, so a shape the
    /// server would reject (e.g. an object in a `value` credential) fails on
    /// extraction with [`Error::ShapeMismatch`].
    pub fn new(name: impl Into<String>, value: CredentialValue) -> Self {
        Self {
            name: name.into(),
            id: String::new(),
            created: String::new(),
            credential_type: value.credential_type(),
            value: value.to_json(),
            decoded: OnceLock::new(),
        }
    }

    /// Type tag of this credential
    pub fn credential_type(&self) -> CredentialType {
        self.credential_type
    }

    /// Raw, undecoded value
    pub fn value(&self) -> &serde_json::Value {
        &self.value
    }

    /// Parse the creation timestamp
    pub fn created_at(&self) -> Result<time::OffsetDateTime> {
        time::OffsetDateTime::parse(
            &self.created,
            &time::format_description::well_known::Rfc3339,
        )
        .map_err(|e| Error::Deserialize(format!("Invalid version_created_at timestamp: {}", e)))
    }

    /// Decode the value according to the credential's own type tag
    ///
    /// # Errors
    ///
    /// [`Error::ShapeMismatch`] if the raw value does not have the exact shape
    /// of the type.
    pub fn typed_value(&self) -> Result<&CredentialValue> {
        if let Some(decoded) = self.decoded.get() {
            return Ok(decoded);
        }

        let decoded = CredentialValue::decode(self.credential_type, &self.value)?;
        trace!("Decoded {} value for {}", self.credential_type, self.name);
        Ok(self.decoded.get_or_init(|| decoded))
    }

    /// Value of a `value` credential
    pub fn as_value(&self) -> Result<&serde_json::Value> {
        match self.typed_as(CredentialType::Value)? {
            CredentialValue::Value(v) => Ok(v),
            _ => Err(self.mismatch(CredentialType::Value)),
        }
    }

    /// Value of a `password` credential
    pub fn as_password(&self) -> Result<&str> {
        match self.typed_as(CredentialType::Password)? {
            CredentialValue::Password(p) => Ok(p),
            _ => Err(self.mismatch(CredentialType::Password)),
        }
    }

    /// Value of a `user` credential
    pub fn as_user(&self) -> Result<&UserValue> {
        match self.typed_as(CredentialType::User)? {
            CredentialValue::User(u) => Ok(u),
            _ => Err(self.mismatch(CredentialType::User)),
        }
    }

    /// Value of a `json` credential
    pub fn as_json(&self) -> Result<&serde_json::Value> {
        match self.typed_as(CredentialType::Json)? {
            CredentialValue::Json(v) => Ok(v),
            _ => Err(self.mismatch(CredentialType::Json)),
        }
    }

    /// Value of an `rsa` credential
    pub fn as_rsa(&self) -> Result<&RsaValue> {
        match self.typed_as(CredentialType::Rsa)? {
            CredentialValue::Rsa(r) => Ok(r),
            _ => Err(self.mismatch(CredentialType::Rsa)),
        }
    }

    /// Value of an `ssh` credential
    pub fn as_ssh(&self) -> Result<&SshValue> {
        match self.typed_as(CredentialType::Ssh)? {
            CredentialValue::Ssh(s) => Ok(s),
            _ => Err(self.mismatch(CredentialType::Ssh)),
        }
    }

    /// Value of a `certificate` credential
    pub fn as_certificate(&self) -> Result<&CertificateValue> {
        match self.typed_as(CredentialType::Certificate)? {
            CredentialValue::Certificate(c) => Ok(c),
            _ => Err(self.mismatch(CredentialType::Certificate)),
        }
    }

    // The tag check always runs before any decode attempt.
    fn typed_as(&self, expected: CredentialType) -> Result<&CredentialValue> {
        if self.credential_type != expected {
            return Err(self.mismatch(expected));
        }
        self.typed_value()
    }

    fn mismatch(&self, expected: CredentialType) -> Error {
        Error::TypeMismatch {
            expected,
            actual: self.credential_type,
        }
    }
}

impl PartialEq for Credential {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.id == other.id
            && self.created == other.created
            && self.credential_type == other.credential_type
            && self.value == other.value
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("name", &self.name)
            .field("id", &self.id)
            .field("created", &self.created)
            .field("type", &self.credential_type)
            .field("value", &"****")
            .finish()
    }
}

/// Name-only entry returned by path and partial-name searches
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct CredentialSummary {
    /// Credential name
    pub name: String,
    /// Creation time of the current version
    #[serde(rename = "version_created_at", default)]
    pub created: String,
}

/// Operations granted to an actor on a credential
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Permission {
    /// Identity, e.g. `uaa-user:1234` or `mtls-app:<guid>`
    pub actor: String,
    /// Granted verbs: `read`, `write`, `delete`, `read_acl`, `write_acl`
    pub operations: Vec<String>,
}

impl Permission {
    /// Create a permission for an actor
    pub fn new<I, S>(actor: impl Into<String>, operations: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            actor: actor.into(),
            operations: operations.into_iter().map(Into::into).collect(),
        }
    }
}

/// Write semantics for [`Client::set`](crate::Client::set)
///
/// Enforced by the server; the client only transmits the mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OverwriteMode {
    /// Always create a new version
    Overwrite,
    /// Keep the current version if one exists
    NoOverwrite,
    /// Create a new version only if the value differs from the current one
    #[default]
    Converge,
}

impl OverwriteMode {
    /// Wire name of the mode
    pub fn as_str(&self) -> &'static str {
        match self {
            OverwriteMode::Overwrite => "overwrite",
            OverwriteMode::NoOverwrite => "no-overwrite",
            OverwriteMode::Converge => "converge",
        }
    }
}

/// Server information published at `/info`
#[derive(Debug, Clone, Deserialize)]
pub struct ServerInfo {
    /// Authorization server backing this CredHub
    #[serde(rename = "auth-server")]
    pub auth_server: AuthServerInfo,
    /// Application information
    #[serde(default)]
    pub app: Option<AppInfo>,
}

/// Authorization server location
#[derive(Debug, Clone, Deserialize)]
pub struct AuthServerInfo {
    /// Base URL of the UAA / OAuth2 server
    pub url: String,
}

/// Application information
#[derive(Debug, Clone, Deserialize)]
pub struct AppInfo {
    /// Application name
    pub name: String,
}

/// Server version published at `/version`
#[derive(Debug, Clone, Deserialize)]
pub struct ServerVersion {
    /// Version string, e.g. `1.9.3` or `2.1.0`
    pub version: String,
}

impl ServerVersion {
    /// Major version number, if the version string starts with one
    pub fn major(&self) -> Option<u64> {
        self.version.split('.').next()?.parse().ok()
    }
}
