use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Session file name in the data directory
const SESSION_FILE: &str = "session.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionData {
    /// Bearer token; absent for anonymous browsing
    pub jwt: Option<String>,
    /// `username@instance` of the logged-in account
    pub handle: Option<String>,
    pub instance_url: String,
    pub created_at: DateTime<Utc>,
}

impl SessionData {
    pub fn anonymous(instance_url: impl Into<String>) -> Self {
        Self {
            jwt: None,
            handle: None,
            instance_url: instance_url.into(),
            created_at: Utc::now(),
        }
    }

    pub fn logged_in(
        instance_url: impl Into<String>,
        handle: impl Into<String>,
        jwt: impl Into<String>,
    ) -> Self {
        Self {
            jwt: Some(jwt.into()),
            handle: Some(handle.into()),
            instance_url: instance_url.into(),
            created_at: Utc::now(),
        }
    }
}

/// Per-call session context.
///
/// Sessions created with [`Session::new`] are backed by a file; ephemeral
/// sessions never touch disk.
#[derive(Debug, Clone)]
pub struct Session {
    data_dir: Option<PathBuf>,
    pub data: Option<SessionData>,
}

impl Session {
    pub fn new(data_dir: PathBuf) -> Self {
        Self {
            data_dir: Some(data_dir),
            data: None,
        }
    }

    pub fn ephemeral(data: Option<SessionData>) -> Self {
        Self {
            data_dir: None,
            data,
        }
    }

    /// Load session from disk
    pub fn load(&mut self) -> Result<bool> {
        let Some(path) = self.session_path() else {
            return Ok(false);
        };
        if path.exists() {
            let contents = std::fs::read_to_string(&path)
                .context("Failed to read session file")?;
            let data: SessionData = serde_json::from_str(&contents)
                .context("Failed to parse session file")?;
            self.data = Some(data);
            return Ok(true);
        }
        Ok(false)
    }

    /// Save session to disk
    pub fn save(&self) -> Result<()> {
        if let (Some(data), Some(path)) = (&self.data, self.session_path()) {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let contents = serde_json::to_string_pretty(data)?;
            std::fs::write(path, contents)?;
        }
        Ok(())
    }

    /// Clear session data
    pub fn clear(&mut self) -> Result<()> {
        self.data = None;
        if let Some(path) = self.session_path() {
            if path.exists() {
                std::fs::remove_file(path)?;
            }
        }
        Ok(())
    }

    /// Update session with new data
    pub fn update(&mut self, data: SessionData) {
        self.data = Some(data);
    }

    /// Get the auth token if logged in
    pub fn token(&self) -> Option<&str> {
        self.data.as_ref().and_then(|d| d.jwt.as_deref())
    }

    /// Get the active user handle if logged in
    pub fn active_handle(&self) -> Option<&str> {
        self.data.as_ref().and_then(|d| d.handle.as_deref())
    }

    pub fn is_logged_in(&self) -> bool {
        self.token().is_some()
    }

    fn session_path(&self) -> Option<PathBuf> {
        self.data_dir.as_ref().map(|dir| dir.join(SESSION_FILE))
    }
}
