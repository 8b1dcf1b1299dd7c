use anyhow::Context;
use reqwest::header::{HeaderValue, AUTHORIZATION};
use reqwest::{Client, Request, Response, StatusCode};
use std::sync::Arc;
use std::time::Duration;

use crate::auth::AuthManager;
use crate::error::{ClientError, Result};

/// HTTP client for the catalog API
///
/// Every outgoing request gets the current bearer token attached, renewing it
/// first when it is about to expire. A 401 response triggers one coordinated
/// renewal and a single resend of the original request; whatever that resend
/// yields is the final outcome.
pub struct CatalogHttpClient {
    /// Shared HTTP client with connection pooling
    client: Client,

    /// Session manager
    auth: Arc<AuthManager>,
}

impl CatalogHttpClient {
    /// Create a new HTTP client
    pub fn new(auth: Arc<AuthManager>, connect_timeout: u64, request_timeout: u64) -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(connect_timeout))
            .timeout(Duration::from_secs(request_timeout))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client, auth })
    }

    /// Execute a request through the auth interceptor pair
    pub async fn execute(&self, mut request: Request) -> Result<Response> {
        let method = request.method().clone();
        let url = request.url().clone();

        // requests without a stored session go out unauthenticated
        if let Some(token) = self.auth.bearer_token().await? {
            request.headers_mut().insert(AUTHORIZATION, bearer_header(&token)?);
        }

        // keep a clone around for the single allowed retry; streaming bodies
        // cannot be replayed
        let retry = request.try_clone();

        tracing::debug!(method = %method, url = %url, "Sending request");
        let response = self.client.execute(request).await?;

        if response.status() != StatusCode::UNAUTHORIZED {
            return Ok(response);
        }

        let Some(mut retry_request) = retry else {
            tracing::warn!(url = %url, "Got 401 on a non-replayable request");
            return Ok(response);
        };

        tracing::warn!(url = %url, "Got 401, renewing session and retrying once");
        let token = self.auth.refresh_access_token().await?;
        retry_request
            .headers_mut()
            .insert(AUTHORIZATION, bearer_header(&token)?);

        let retried = self.client.execute(retry_request).await?;
        tracing::debug!(status = %retried.status(), url = %url, "Retry settled");
        Ok(retried)
    }

    /// Underlying client, for building requests
    pub fn client(&self) -> &Client {
        &self.client
    }
}

fn bearer_header(token: &str) -> Result<HeaderValue> {
    HeaderValue::from_str(&format!("Bearer {token}"))
        .map_err(|e| ClientError::Internal(anyhow::anyhow!("invalid bearer token: {e}")))
}
