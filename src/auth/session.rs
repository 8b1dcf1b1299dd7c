// Session persistence
// The token pair lives under two fixed keys in a local SQLite key-value
// table and survives process restarts

use anyhow::Context;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::PathBuf;

use crate::error::Result;

const ACCESS_TOKEN_KEY: &str = "access_token";
const REFRESH_TOKEN_KEY: &str = "refresh_token";

/// Persisted access/refresh token pair
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub access_token: String,
    pub refresh_token: String,
}

/// Storage for the current session
///
/// Written only on login success, refresh success, logout and refresh
/// failure; read on every outgoing request.
pub trait SessionStore: Send + Sync {
    /// Load the stored pair, or `None` when no complete session exists
    fn load(&self) -> Result<Option<Session>>;

    /// Replace the stored pair atomically
    fn save(&self, session: &Session) -> Result<()>;

    /// Remove both tokens
    fn clear(&self) -> Result<()>;
}

/// SQLite-backed session store
pub struct SqliteSessionStore {
    path: PathBuf,
}

impl SqliteSessionStore {
    /// Open (and if needed create) the session database at `path`
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create session directory: {}", parent.display())
                })?;
            }
        }

        let conn = Connection::open(&path)?;
        conn.execute(
            "CREATE TABLE IF NOT EXISTS session_kv (key TEXT PRIMARY KEY, value TEXT NOT NULL)",
            [],
        )?;

        Ok(Self { path })
    }

    fn connect(&self) -> Result<Connection> {
        Ok(Connection::open(&self.path)?)
    }
}

impl SessionStore for SqliteSessionStore {
    fn load(&self) -> Result<Option<Session>> {
        let conn = self.connect()?;

        let get = |key: &str| -> rusqlite::Result<Option<String>> {
            conn.query_row(
                "SELECT value FROM session_kv WHERE key = ?1",
                [key],
                |row| row.get(0),
            )
            .optional()
        };

        match (get(ACCESS_TOKEN_KEY)?, get(REFRESH_TOKEN_KEY)?) {
            (Some(access_token), Some(refresh_token)) => Ok(Some(Session {
                access_token,
                refresh_token,
            })),
            _ => Ok(None),
        }
    }

    fn save(&self, session: &Session) -> Result<()> {
        let mut conn = self.connect()?;

        let tx = conn.transaction()?;
        for (key, value) in [
            (ACCESS_TOKEN_KEY, &session.access_token),
            (REFRESH_TOKEN_KEY, &session.refresh_token),
        ] {
            tx.execute(
                "INSERT INTO session_kv (key, value) VALUES (?1, ?2)
                 ON CONFLICT(key) DO UPDATE SET value = excluded.value",
                params![key, value],
            )?;
        }
        tx.commit()?;

        Ok(())
    }

    fn clear(&self) -> Result<()> {
        let conn = self.connect()?;
        conn.execute(
            "DELETE FROM session_kv WHERE key IN (?1, ?2)",
            params![ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY],
        )?;

        Ok(())
    }
}

/// In-memory session store for tests
#[cfg(any(test, feature = "test-utils"))]
pub struct MemorySessionStore {
    session: std::sync::Mutex<Option<Session>>,
}

#[cfg(any(test, feature = "test-utils"))]
impl MemorySessionStore {
    pub fn new() -> Self {
        Self {
            session: std::sync::Mutex::new(None),
        }
    }

    pub fn with_session(session: Session) -> Self {
        Self {
            session: std::sync::Mutex::new(Some(session)),
        }
    }
}

#[cfg(any(test, feature = "test-utils"))]
impl Default for MemorySessionStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(any(test, feature = "test-utils"))]
impl SessionStore for MemorySessionStore {
    fn load(&self) -> Result<Option<Session>> {
        Ok(self.session.lock().ok().and_then(|guard| guard.clone()))
    }

    fn save(&self, session: &Session) -> Result<()> {
        if let Ok(mut guard) = self.session.lock() {
            *guard = Some(session.clone());
        }
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        if let Ok(mut guard) = self.session.lock() {
            *guard = None;
        }
        Ok(())
    }
}
