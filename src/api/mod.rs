// Catalog API endpoint wrappers
// Thin typed calls, all issued through the authenticated HTTP client

mod auth;
mod categories;
mod files;
mod products;

use reqwest::Response;
use serde::de::DeserializeOwned;
use std::sync::Arc;

use crate::auth::AuthManager;
use crate::error::{ClientError, Result};
use crate::http_client::CatalogHttpClient;

/// Typed client for the storefront REST API
///
/// Callers only need to know that calls made through this surface are
/// auto-authenticated and retried once on a 401.
pub struct Api {
    http: CatalogHttpClient,
    auth: Arc<AuthManager>,
    base_url: String,
}

impl Api {
    pub fn new(http: CatalogHttpClient, auth: Arc<AuthManager>, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            http,
            auth,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Read the response body as JSON, mapping non-success statuses to errors
    async fn parse<T: DeserializeOwned>(response: Response) -> Result<T> {
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ClientError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response.json().await?)
    }
}
