//! Session management
//!
//! Access-code login and the rest-mode inactivity timer. Codes are never
//! stored or compared in clear text: the typed code is hashed with SHA-256
//! and the hex digest is matched against the configured digest list.
//!
//! Rest mode dims the session without ending it. Entering it arms a single
//! timer; if the timer expires before rest mode is exited the session is
//! logged out. Re-entering rest mode re-arms the timer, so there is never
//! more than one live timer per session.

use std::sync::Arc;
use std::time::Duration;

use sha2::{Digest, Sha256};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

use crate::config::Config;
use crate::error::AppResult;
use crate::store::DataStore;

/// Hex SHA-256 digest of an access code.
pub fn code_digest(code: &str) -> String {
    hex::encode(Sha256::digest(code.as_bytes()))
}

pub struct SessionManager {
    store: Arc<Mutex<DataStore>>,
    auth_digests: Vec<String>,
    rest_timeout: Duration,
    rest_timer: Option<JoinHandle<()>>,
}

impl SessionManager {
    pub fn new(store: Arc<Mutex<DataStore>>, config: &Config) -> Self {
        Self {
            store,
            auth_digests: config.auth_digests.clone(),
            rest_timeout: Duration::from_secs(config.rest_timeout_secs),
            rest_timer: None,
        }
    }

    /// Attempt to authenticate with an access code.
    ///
    /// Returns whether the code was accepted. A rejected code is not an
    /// error; callers surface it as a failed attempt.
    pub async fn login(&mut self, code: &str) -> AppResult<bool> {
        let digest = code_digest(code);
        if !self.auth_digests.contains(&digest) {
            tracing::warn!("Rejected login attempt");
            return Ok(false);
        }

        self.disarm_timer();
        let mut store = self.store.lock().await;
        store.set_resting(false);
        store.set_authenticated(true)?;
        tracing::info!("Session authenticated");
        Ok(true)
    }

    /// End the session and cancel any armed rest timer.
    pub async fn logout(&mut self) -> AppResult<()> {
        self.disarm_timer();
        self.store.lock().await.logout()
    }

    /// Enter rest mode and arm the inactivity timer. If already resting,
    /// the running timer is replaced.
    pub async fn enter_rest_mode(&mut self) {
        self.disarm_timer();
        self.store.lock().await.set_resting(true);

        let store = Arc::clone(&self.store);
        let timeout = self.rest_timeout;
        self.rest_timer = Some(tokio::spawn(async move {
            tokio::time::sleep(timeout).await;
            tracing::warn!(
                timeout_secs = timeout.as_secs(),
                "Rest mode timed out, ending session"
            );
            if let Err(e) = store.lock().await.logout() {
                tracing::error!(error = %e, "Failed to persist timed-out logout");
            }
        }));
    }

    /// Leave rest mode, keeping the session alive.
    pub async fn exit_rest_mode(&mut self) {
        self.disarm_timer();
        self.store.lock().await.set_resting(false);
    }

    fn disarm_timer(&mut self) {
        if let Some(timer) = self.rest_timer.take() {
            timer.abort();
        }
    }
}

impl Drop for SessionManager {
    fn drop(&mut self) {
        self.disarm_timer();
    }
}
