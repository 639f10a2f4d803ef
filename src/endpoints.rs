//! API endpoint URL construction

use crate::util::{encode_path, query_string};

/// API v1 data base path
pub const DATA_PATH: &str = "/api/v1/data";

/// API v1 permissions base path
pub const PERMISSIONS_PATH: &str = "/api/v1/permissions";

/// Endpoint builder
#[derive(Debug, Clone)]
pub struct Endpoints {
    base_url: String,
}

impl Endpoints {
    /// Create a new endpoints builder
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Base URL without trailing slash
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Get the full URL for a path
    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn data_query(&self, pairs: &[(&str, &str)]) -> String {
        self.url(&format!("{}?{}", DATA_PATH, query_string(pairs)))
    }

    // Server
    pub fn info(&self) -> String {
        self.url("/info")
    }

    pub fn version(&self) -> String {
        self.url("/version")
    }

    // Data
    pub fn data(&self) -> String {
        self.url(DATA_PATH)
    }

    pub fn data_by_id(&self, id: &str) -> String {
        self.url(&format!("{}/{}", DATA_PATH, encode_path(id)))
    }

    pub fn all_paths(&self) -> String {
        self.data_query(&[("paths", "true")])
    }

    pub fn by_name(&self, name: &str) -> String {
        self.data_query(&[("name", name)])
    }

    pub fn current_by_name(&self, name: &str) -> String {
        self.data_query(&[("name", name), ("current", "true")])
    }

    pub fn versions_by_name(&self, name: &str, versions: usize) -> String {
        let versions = versions.to_string();
        self.data_query(&[("name", name), ("versions", &versions)])
    }

    pub fn by_path(&self, path: &str) -> String {
        self.data_query(&[("path", path)])
    }

    pub fn by_partial_name(&self, partial: &str) -> String {
        self.data_query(&[("name-like", partial)])
    }

    pub fn regenerate(&self) -> String {
        self.url(&format!("{}/regenerate", DATA_PATH))
    }

    // Permissions
    pub fn permissions(&self) -> String {
        self.url(PERMISSIONS_PATH)
    }

    pub fn permissions_for(&self, credential_name: &str) -> String {
        self.url(&format!(
            "{}?{}",
            PERMISSIONS_PATH,
            query_string(&[("credential_name", credential_name)])
        ))
    }

    pub fn permission_for_actor(&self, credential_name: &str, actor: &str) -> String {
        self.url(&format!(
            "{}?{}",
            PERMISSIONS_PATH,
            query_string(&[("credential_name", credential_name), ("actor", actor)])
        ))
    }
}
