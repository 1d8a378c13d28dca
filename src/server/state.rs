//! Server shared state
//!
//! Holds configuration, the geocoding backend and the open picker sessions.
//! Sessions leave the registry when confirmed, deleted or left idle.

use crate::config::Config;
use crate::error::{Error, Result};
use crate::geo::GeoBackend;
use crate::location::Location;
use crate::picker::{PickerSession, PickerSettings};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{Arc, Weak};
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, info};
use uuid::Uuid;

/// An open session and when it was created
pub struct SessionEntry<B> {
    pub session: PickerSession<B>,
    pub created_at: DateTime<Utc>,
    last_used: Instant,
}

impl<B> Clone for SessionEntry<B> {
    fn clone(&self) -> Self {
        Self {
            session: self.session.clone(),
            created_at: self.created_at,
            last_used: self.last_used,
        }
    }
}

/// Shared state for the HTTP server
pub struct AppState<B> {
    /// Configuration
    pub config: Config,

    backend: Arc<B>,
    settings: PickerSettings,
    sessions: RwLock<HashMap<Uuid, SessionEntry<B>>>,
    started_at: DateTime<Utc>,
}

impl<B: GeoBackend> AppState<B> {
    /// Create new application state
    pub fn new(config: Config, backend: B) -> Self {
        let settings = PickerSettings::from(&config.search);
        Self {
            config,
            backend: Arc::new(backend),
            settings,
            sessions: RwLock::new(HashMap::new()),
            started_at: Utc::now(),
        }
    }

    /// Open a new picker session, optionally on an existing location
    pub async fn open_session(&self, initial: Option<Location>) -> Result<(Uuid, SessionEntry<B>)> {
        let session = match initial {
            Some(location) => {
                PickerSession::with_initial(Arc::clone(&self.backend), self.settings, location)?
            }
            None => PickerSession::new(Arc::clone(&self.backend), self.settings),
        };
        let entry = SessionEntry {
            session,
            created_at: Utc::now(),
            last_used: Instant::now(),
        };

        let id = Uuid::new_v4();
        self.sessions.write().await.insert(id, entry.clone());
        Ok((id, entry))
    }

    /// Look up an open session and mark it as used
    pub async fn session(&self, id: Uuid) -> Result<SessionEntry<B>> {
        let mut sessions = self.sessions.write().await;
        let entry = sessions
            .get_mut(&id)
            .ok_or_else(|| Error::SessionNotFound(id.to_string()))?;
        entry.last_used = Instant::now();
        Ok(entry.clone())
    }

    /// Confirm a session and drop it from the registry
    ///
    /// A refused confirmation keeps the session open.
    pub async fn confirm_session(&self, id: Uuid) -> Result<Location> {
        let entry = self.session(id).await?;
        let location = entry.session.confirm().await?;
        self.sessions.write().await.remove(&id);
        debug!(session = %id, "Session confirmed and closed");
        Ok(location)
    }

    /// Cancel and forget a session
    pub async fn close_session(&self, id: Uuid) -> Result<()> {
        let entry = self
            .sessions
            .write()
            .await
            .remove(&id)
            .ok_or_else(|| Error::SessionNotFound(id.to_string()))?;
        entry.session.cancel().await;
        Ok(())
    }

    /// Cancel and forget sessions unused for at least `ttl`
    ///
    /// Returns how many were dropped.
    pub async fn sweep_idle(&self, ttl: Duration) -> usize {
        let now = Instant::now();
        let mut expired = Vec::new();
        self.sessions.write().await.retain(|_, entry| {
            if now.duration_since(entry.last_used) >= ttl {
                expired.push(entry.clone());
                false
            } else {
                true
            }
        });

        for entry in &expired {
            entry.session.cancel().await;
        }
        if !expired.is_empty() {
            info!(count = expired.len(), "Dropped idle sessions");
        }
        expired.len()
    }

    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Seconds since the server started
    pub fn uptime_secs(&self) -> u64 {
        (Utc::now() - self.started_at).num_seconds().max(0) as u64
    }
}

/// Periodically drop idle sessions until the state is gone
pub fn spawn_sweeper<B: GeoBackend>(state: &Arc<AppState<B>>, ttl: Duration) -> JoinHandle<()> {
    let weak: Weak<AppState<B>> = Arc::downgrade(state);
    let period = (ttl / 4).max(Duration::from_secs(1));

    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        loop {
            ticker.tick().await;
            let Some(state) = weak.upgrade() else {
                return;
            };
            state.sweep_idle(ttl).await;
        }
    })
}
