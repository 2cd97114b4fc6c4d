use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::debug;

use crate::models::User;

/// Session file name in the data directory
const SESSION_FILE: &str = "session.json";

/// The credential pair issued at login.
///
/// The access token is short-lived and attached to every authenticated
/// request; the refresh token is longer-lived and used only to mint new
/// access tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionTokens {
    pub access: String,
    pub refresh: String,
    pub user: Option<User>,
    pub created_at: DateTime<Utc>,
}

impl SessionTokens {
    pub fn new(access: String, refresh: String, user: Option<User>) -> Self {
        Self {
            access,
            refresh,
            user,
            created_at: Utc::now(),
        }
    }
}

pub struct Session {
    data_dir: PathBuf,
    data: Option<SessionTokens>,
}

impl Session {
    pub fn new(data_dir: PathBuf) -> Self {
        Self {
            data_dir,
            data: None,
        }
    }

    /// Load session from disk. Returns true if a session was found.
    pub fn load(&mut self) -> Result<bool> {
        let path = self.session_path();
        if path.exists() {
            let contents =
                std::fs::read_to_string(&path).context("Failed to read session file")?;
            let data: SessionTokens =
                serde_json::from_str(&contents).context("Failed to parse session file")?;
            self.data = Some(data);
            return Ok(true);
        }
        Ok(false)
    }

    /// Save session to disk
    pub fn save(&self) -> Result<()> {
        if let Some(ref data) = self.data {
            let path = self.session_path();
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let contents = serde_json::to_string_pretty(data)?;
            std::fs::write(path, contents)?;
        }
        Ok(())
    }

    /// Clear session data, in memory and on disk
    pub fn clear(&mut self) -> Result<()> {
        self.data = None;
        let path = self.session_path();
        if path.exists() {
            std::fs::remove_file(path)?;
        }
        Ok(())
    }

    /// Replace the session with a freshly issued token pair (login)
    pub fn set_tokens(&mut self, tokens: SessionTokens) {
        self.data = Some(tokens);
    }

    /// Swap in a new access token after a successful refresh.
    /// No-op when no session exists (it was torn down concurrently).
    pub fn set_access_token(&mut self, access: String) {
        if let Some(ref mut data) = self.data {
            data.access = access;
        }
    }

    pub fn access_token(&self) -> Option<&str> {
        self.data.as_ref().map(|d| d.access.as_str())
    }

    pub fn refresh_token(&self) -> Option<&str> {
        self.data.as_ref().map(|d| d.refresh.as_str())
    }

    pub fn user(&self) -> Option<&User> {
        self.data.as_ref().and_then(|d| d.user.as_ref())
    }

    pub fn is_authenticated(&self) -> bool {
        self.data.is_some()
    }

    fn session_path(&self) -> PathBuf {
        self.data_dir.join(SESSION_FILE)
    }
}

/// Shared handle to the session, injected into `ApiClient`.
///
/// Cloning is cheap. The lock makes each token read and each store
/// atomic; it does not serialize whole refresh operations (concurrent
/// 401s may each refresh, last write wins).
#[derive(Clone)]
pub struct SessionHandle {
    inner: Arc<RwLock<Session>>,
}

impl SessionHandle {
    pub fn new(session: Session) -> Self {
        Self {
            inner: Arc::new(RwLock::new(session)),
        }
    }

    /// Open the persisted session in `data_dir`, if one exists.
    pub fn open(data_dir: PathBuf) -> Result<Self> {
        let mut session = Session::new(data_dir);
        if session.load()? {
            debug!("Loaded persisted session");
        }
        Ok(Self::new(session))
    }

    pub async fn access_token(&self) -> Option<String> {
        self.inner.read().await.access_token().map(str::to_owned)
    }

    pub async fn refresh_token(&self) -> Option<String> {
        self.inner.read().await.refresh_token().map(str::to_owned)
    }

    pub async fn user(&self) -> Option<User> {
        self.inner.read().await.user().cloned()
    }

    pub async fn is_authenticated(&self) -> bool {
        self.inner.read().await.is_authenticated()
    }

    /// Store a freshly issued token pair and persist it (login path)
    pub async fn store_tokens(&self, tokens: SessionTokens) -> Result<()> {
        let mut session = self.inner.write().await;
        session.set_tokens(tokens);
        session.save()
    }

    /// Store a new access token and persist it (refresh path)
    pub async fn store_access_token(&self, access: String) -> Result<()> {
        let mut session = self.inner.write().await;
        session.set_access_token(access);
        session.save()
    }

    /// Tear the session down (logout or unrecoverable refresh failure)
    pub async fn clear(&self) -> Result<()> {
        self.inner.write().await.clear()
    }
}
