//! Cookie-like persistence for the session token.
//!
//! The token is written once after a successful login and read back once at
//! startup so a restarted console does not prompt for credentials again.
//! Entries past their expiry read as absent.

use crate::config;
use crate::error::{ConsoleError, Result};
use crate::models::SessionToken;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

pub trait TokenStore: Send {
    /// Read the stored token, if one exists and has not expired.
    fn load(&mut self) -> Result<Option<SessionToken>>;

    /// Persist `token`, replacing any previous one.
    fn save(&mut self, token: &SessionToken) -> Result<()>;
}

// ---------------------------------------------------------------------------
// FileTokenStore
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
struct CookieEntry {
    value: String,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    expires: DateTime<Utc>,
}

type CookieJar = BTreeMap<String, CookieEntry>;

/// A small JSON cookie jar on disk, keyed by cookie name.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
    name: String,
}

impl FileTokenStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            name: config::TOKEN_COOKIE.to_string(),
        }
    }

    /// Store at the platform default location.
    pub fn default_location() -> Self {
        Self::new(config::default_token_store_path())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the jar. A missing file is an empty jar; a corrupt one is removed
    /// and treated as empty.
    fn read_jar(&self) -> Result<CookieJar> {
        if !self.path.exists() {
            return Ok(CookieJar::new());
        }
        let contents = fs::read_to_string(&self.path)?;
        match serde_json::from_str(&contents) {
            Ok(jar) => Ok(jar),
            Err(e) => {
                log::warn!(
                    "corrupt cookie store {}: {} -- removing",
                    self.path.display(),
                    e
                );
                let _ = fs::remove_file(&self.path);
                Ok(CookieJar::new())
            }
        }
    }

    /// Write to a temp file and rename, so an interrupted write never leaves
    /// a truncated jar behind.
    fn write_jar(&self, jar: &CookieJar) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let tmp = self.path.with_extension("json.tmp");
        let result = (|| -> Result<()> {
            fs::write(&tmp, serde_json::to_vec_pretty(jar)?)?;
            fs::rename(&tmp, &self.path)?;
            Ok(())
        })();
        if result.is_err() {
            let _ = fs::remove_file(&tmp);
        }
        result
    }
}

impl TokenStore for FileTokenStore {
    fn load(&mut self) -> Result<Option<SessionToken>> {
        let mut jar = self.read_jar()?;
        let Some(entry) = jar.get(&self.name) else {
            return Ok(None);
        };
        let token = SessionToken::new(entry.value.clone(), entry.expires);
        if token.is_expired() {
            log::debug!("stored session token expired at {} -- removing", token.expires);
            jar.remove(&self.name);
            self.write_jar(&jar)?;
            return Ok(None);
        }
        Ok(Some(token))
    }

    fn save(&mut self, token: &SessionToken) -> Result<()> {
        let mut jar = self.read_jar()?;
        jar.insert(
            self.name.clone(),
            CookieEntry {
                value: token.token.clone(),
                expires: token.expires,
            },
        );
        self.write_jar(&jar)?;
        log::info!("session token saved to {}", self.path.display());
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// MemoryTokenStore
// ---------------------------------------------------------------------------

/// In-process store. Clones share the same slot, so a caller can keep a
/// handle after giving one to the console.
#[derive(Debug, Clone, Default)]
pub struct MemoryTokenStore {
    slot: Arc<Mutex<Option<SessionToken>>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: SessionToken) -> Self {
        Self {
            slot: Arc::new(Mutex::new(Some(token))),
        }
    }

    /// The stored token regardless of expiry.
    pub fn peek(&self) -> Option<SessionToken> {
        self.slot.lock().ok().and_then(|t| t.clone())
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&mut self) -> Result<Option<SessionToken>> {
        let slot = self
            .slot
            .lock()
            .map_err(|_| ConsoleError::InvalidArgument("token store lock poisoned".into()))?;
        Ok(slot.clone().filter(|t| !t.is_expired()))
    }

    fn save(&mut self, token: &SessionToken) -> Result<()> {
        let mut slot = self
            .slot
            .lock()
            .map_err(|_| ConsoleError::InvalidArgument("token store lock poisoned".into()))?;
        *slot = Some(token.clone());
        Ok(())
    }
}
