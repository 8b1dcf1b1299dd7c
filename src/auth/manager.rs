use anyhow::Context;
use futures::future::{BoxFuture, Shared};
use futures::FutureExt;
use reqwest::Client;
use std::sync::Arc;
use tokio::sync::Mutex;

use super::jwt;
use super::refresh;
use super::session::{Session, SessionStore};
use crate::error::{RefreshError, Result};

type SharedRefresh = Shared<BoxFuture<'static, std::result::Result<String, RefreshError>>>;

/// Session manager
/// Owns the persisted token pair and coordinates renewals so that at most one
/// refresh call is in flight at a time; concurrent triggers share its outcome
pub struct AuthManager {
    /// Session persistence
    store: Arc<dyn SessionStore>,

    /// Bare HTTP client for renewal calls
    client: Client,

    /// Renewal endpoint
    refresh_url: String,

    /// Proactive renewal window in seconds
    expiry_buffer: i64,

    /// In-flight renewal, joined by every trigger that arrives while it runs
    pending: Arc<Mutex<Option<SharedRefresh>>>,
}

impl AuthManager {
    pub fn new(
        store: Arc<dyn SessionStore>,
        refresh_url: impl Into<String>,
        expiry_buffer: u64,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            store,
            client,
            refresh_url: refresh_url.into(),
            expiry_buffer: expiry_buffer as i64,
            pending: Arc::new(Mutex::new(None)),
        })
    }

    /// The session store backing this manager
    pub fn session_store(&self) -> &dyn SessionStore {
        self.store.as_ref()
    }

    /// Token to attach to an outgoing request, renewing proactively when the
    /// stored one is inside the expiry buffer
    ///
    /// `None` means no session is stored and the request goes out
    /// unauthenticated.
    pub async fn bearer_token(&self) -> Result<Option<String>> {
        let Some(session) = self.store.load()? else {
            return Ok(None);
        };

        if jwt::is_expiring_soon(&session.access_token, self.expiry_buffer) {
            tracing::debug!("Access token expiring soon, renewing before request");
            let token = self.refresh_access_token().await?;
            return Ok(Some(token));
        }

        Ok(Some(session.access_token))
    }

    /// Join the in-flight renewal or start a new one
    ///
    /// Resolves with the new access token once the single underlying call
    /// settles. On failure the session is cleared and every joined caller
    /// receives the same error.
    pub async fn refresh_access_token(&self) -> Result<String> {
        let shared = self.get_or_start_refresh().await;
        Ok(shared.await?)
    }

    async fn get_or_start_refresh(&self) -> SharedRefresh {
        let mut pending = self.pending.lock().await;

        if let Some(inflight) = pending.as_ref() {
            tracing::debug!("Joining in-flight token renewal");
            return inflight.clone();
        }

        let store = Arc::clone(&self.store);
        let client = self.client.clone();
        let refresh_url = self.refresh_url.clone();
        let slot = Arc::clone(&self.pending);

        let operation = async move {
            let outcome = run_refresh(&client, &refresh_url, store.as_ref()).await;
            // settle back to idle before handing out the result
            slot.lock().await.take();
            outcome
        }
        .boxed()
        .shared();

        *pending = Some(operation.clone());
        operation
    }
}

async fn run_refresh(
    client: &Client,
    refresh_url: &str,
    store: &dyn SessionStore,
) -> std::result::Result<String, RefreshError> {
    let refresh_token = match store.load() {
        Ok(Some(session)) => session.refresh_token,
        Ok(None) => {
            tracing::warn!("Renewal attempted with no stored session");
            let _ = store.clear();
            return Err(RefreshError::MissingRefreshToken);
        }
        Err(e) => {
            return Err(RefreshError::Rejected(format!(
                "session store read failed: {e}"
            )));
        }
    };

    match refresh::exchange_refresh_token(client, refresh_url, &refresh_token).await {
        Ok(pair) => {
            let session = Session {
                access_token: pair.access_token.clone(),
                refresh_token: pair.refresh_token,
            };
            if let Err(e) = store.save(&session) {
                let _ = store.clear();
                return Err(RefreshError::Rejected(format!(
                    "failed to persist renewed session: {e}"
                )));
            }
            Ok(pair.access_token)
        }
        Err(e) => {
            tracing::warn!("Token renewal failed: {e}");
            if let Err(clear_err) = store.clear() {
                tracing::warn!("Failed to clear session after renewal failure: {clear_err}");
            }
            Err(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::jwt::test_tokens;
    use crate::auth::session::MemorySessionStore;
    use crate::error::ClientError;

    fn manager_with_session(refresh_url: &str, session: Session) -> AuthManager {
        let store = Arc::new(MemorySessionStore::with_session(session));
        AuthManager::new(store, refresh_url, 60).expect("Failed to create manager")
    }

    fn refresh_body(access: &str, refresh: &str) -> String {
        format!(r#"{{"access_token":"{access}","refresh_token":"{refresh}"}}"#)
    }

    #[tokio::test]
    async fn test_concurrent_triggers_share_one_renewal_call() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/auth/refresh")
            .match_body(mockito::Matcher::PartialJson(serde_json::json!({
                "refresh_token": "old-refresh"
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(refresh_body("new-access", "new-refresh"))
            .expect(1)
            .create_async()
            .await;

        let manager = manager_with_session(
            &format!("{}/auth/refresh", server.url()),
            Session {
                access_token: "old-access".to_string(),
                refresh_token: "old-refresh".to_string(),
            },
        );

        let (a, b, c) = tokio::join!(
            manager.refresh_access_token(),
            manager.refresh_access_token(),
            manager.refresh_access_token(),
        );

        assert_eq!(a.unwrap(), "new-access");
        assert_eq!(b.unwrap(), "new-access");
        assert_eq!(c.unwrap(), "new-access");
        mock.assert_async().await;

        // the new pair is persisted
        let session = manager.session_store().load().unwrap().unwrap();
        assert_eq!(session.access_token, "new-access");
        assert_eq!(session.refresh_token, "new-refresh");
    }

    #[tokio::test]
    async fn test_settled_operation_allows_a_new_one() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/auth/refresh")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(refresh_body("newer-access", "newer-refresh"))
            .expect(2)
            .create_async()
            .await;

        let manager = manager_with_session(
            &format!("{}/auth/refresh", server.url()),
            Session {
                access_token: "old-access".to_string(),
                refresh_token: "old-refresh".to_string(),
            },
        );

        manager.refresh_access_token().await.unwrap();
        manager.refresh_access_token().await.unwrap();

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_failed_renewal_clears_session_for_all_callers() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/auth/refresh")
            .with_status(401)
            .with_body("Unauthorized")
            .expect(1)
            .create_async()
            .await;

        let manager = manager_with_session(
            &format!("{}/auth/refresh", server.url()),
            Session {
                access_token: "old-access".to_string(),
                refresh_token: "stale-refresh".to_string(),
            },
        );

        let (a, b) = tokio::join!(
            manager.refresh_access_token(),
            manager.refresh_access_token(),
        );

        assert!(matches!(a, Err(ClientError::RefreshRejected(_))));
        assert!(matches!(b, Err(ClientError::RefreshRejected(_))));
        mock.assert_async().await;

        assert_eq!(manager.session_store().load().unwrap(), None);
    }

    #[tokio::test]
    async fn test_missing_refresh_token_fails_without_network_call() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/auth/refresh")
            .expect(0)
            .create_async()
            .await;

        let store = Arc::new(MemorySessionStore::new());
        let manager = AuthManager::new(store, format!("{}/auth/refresh", server.url()), 60)
            .expect("Failed to create manager");

        let err = manager.refresh_access_token().await.unwrap_err();
        assert!(matches!(err, ClientError::MissingRefreshToken));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_bearer_token_without_session() {
        let store = Arc::new(MemorySessionStore::new());
        let manager = AuthManager::new(store, "http://unused/auth/refresh", 60)
            .expect("Failed to create manager");

        assert_eq!(manager.bearer_token().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_bearer_token_returns_stored_token_when_fresh() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/auth/refresh")
            .expect(0)
            .create_async()
            .await;

        let token = test_tokens::expiring_in(3600);
        let manager = manager_with_session(
            &format!("{}/auth/refresh", server.url()),
            Session {
                access_token: token.clone(),
                refresh_token: "refresh".to_string(),
            },
        );

        assert_eq!(manager.bearer_token().await.unwrap(), Some(token));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_bearer_token_renews_expiring_token() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/auth/refresh")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(refresh_body("renewed-access", "renewed-refresh"))
            .expect(1)
            .create_async()
            .await;

        // expires in 5 seconds, buffer is 60
        let manager = manager_with_session(
            &format!("{}/auth/refresh", server.url()),
            Session {
                access_token: test_tokens::expiring_in(5),
                refresh_token: "old-refresh".to_string(),
            },
        );

        let token = manager.bearer_token().await.unwrap();
        assert_eq!(token, Some("renewed-access".to_string()));
        mock.assert_async().await;

        // stale tokens are no longer used by subsequent requests
        let session = manager.session_store().load().unwrap().unwrap();
        assert_eq!(session.access_token, "renewed-access");
    }
}
