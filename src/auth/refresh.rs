// Token renewal call
// Issued on a bare client so the interceptor pair never recurses into itself

use reqwest::Client;

use crate::error::RefreshError;
use crate::models::{AuthResponse, RefreshRequest};

/// Exchange the stored refresh token for a new token pair
pub async fn exchange_refresh_token(
    client: &Client,
    refresh_url: &str,
    refresh_token: &str,
) -> Result<AuthResponse, RefreshError> {
    tracing::debug!("Exchanging refresh token...");

    let request = RefreshRequest {
        refresh_token: refresh_token.to_string(),
    };

    let response = client
        .post(refresh_url)
        .json(&request)
        .send()
        .await
        .map_err(|e| RefreshError::Rejected(format!("refresh request failed: {e}")))?;

    let status = response.status();
    if !status.is_success() {
        let error_text = response.text().await.unwrap_or_default();
        return Err(RefreshError::Rejected(format!("{status} - {error_text}")));
    }

    let data: AuthResponse = response
        .json()
        .await
        .map_err(|e| RefreshError::Rejected(format!("invalid refresh response: {e}")))?;

    if data.access_token.is_empty() {
        return Err(RefreshError::Rejected(
            "refresh response does not contain access_token".to_string(),
        ));
    }

    tracing::info!("Token pair renewed");
    Ok(data)
}
