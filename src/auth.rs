//! Signed-in visitor state.
//!
//! The profile lives in memory behind an async lock and is mirrored into a
//! small JSON key-value file under [`STORAGE_KEY`], so a restart keeps the
//! visitor signed in. The store is handed to handlers through application
//! state.

use crate::error::Result;
use crate::models::UserProfile;
use serde_json::{Map, Value};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info, warn};

pub const STORAGE_KEY: &str = "portfolio_user";

/// Key-value JSON file; memory-only when no path is given
#[derive(Debug, Clone, Default)]
pub struct LocalStorage {
    path: Option<PathBuf>,
    // serialises read-modify-write cycles on the file
    write_lock: Arc<Mutex<()>>,
}

impl LocalStorage {
    pub fn new(path: Option<PathBuf>) -> Self {
        Self {
            path,
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn memory() -> Self {
        Self::new(None)
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    async fn read_all(&self) -> Result<Map<String, Value>> {
        let Some(path) = &self.path else {
            return Ok(Map::new());
        };

        let bytes = match tokio::fs::read(path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Map::new()),
            Err(e) => return Err(e.into()),
        };

        if bytes.is_empty() {
            return Ok(Map::new());
        }

        // An unreadable file is treated as empty storage and replaced on the next write
        match serde_json::from_slice::<Value>(&bytes) {
            Ok(Value::Object(entries)) => Ok(entries),
            Ok(_) => {
                warn!(path = %path.display(), "Storage file is not a JSON object, starting empty");
                Ok(Map::new())
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Storage file is unreadable, starting empty");
                Ok(Map::new())
            }
        }
    }

    /// Write to a sibling temp file, then rename over the real one
    async fn write_all(&self, entries: &Map<String, Value>) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        let bytes = serde_json::to_vec_pretty(entries)?;
        let tmp = temp_path(path);
        tokio::fs::write(&tmp, bytes).await?;
        tokio::fs::rename(&tmp, path).await?;
        Ok(())
    }

    pub async fn get(&self, key: &str) -> Result<Option<Value>> {
        Ok(self.read_all().await?.remove(key))
    }

    pub async fn set(&self, key: &str, value: Value) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        let mut entries = self.read_all().await?;
        entries.insert(key.to_string(), value);
        self.write_all(&entries).await
    }

    pub async fn remove(&self, key: &str) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        let mut entries = self.read_all().await?;
        if entries.remove(key).is_some() {
            self.write_all(&entries).await?;
        }
        Ok(())
    }
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(OsString::from)
        .unwrap_or_else(|| OsString::from("storage"));
    name.push(".tmp");
    path.with_file_name(name)
}

#[derive(Debug, Clone)]
pub struct AuthStore {
    user: Arc<RwLock<Option<UserProfile>>>,
    storage: LocalStorage,
}

impl AuthStore {
    /// Restore the persisted profile, if any. A corrupt entry is discarded.
    pub async fn open(storage: LocalStorage) -> Result<Self> {
        let user = match storage.get(STORAGE_KEY).await? {
            Some(value) => match serde_json::from_value::<UserProfile>(value) {
                Ok(profile) => {
                    info!(username = %profile.username, provider = %profile.provider, "Restored signed-in profile");
                    Some(profile)
                }
                Err(e) => {
                    warn!(error = %e, "Discarding unreadable stored profile");
                    storage.remove(STORAGE_KEY).await?;
                    None
                }
            },
            None => None,
        };

        Ok(Self {
            user: Arc::new(RwLock::new(user)),
            storage,
        })
    }

    pub fn memory() -> Self {
        Self {
            user: Arc::new(RwLock::new(None)),
            storage: LocalStorage::memory(),
        }
    }

    pub async fn current(&self) -> Option<UserProfile> {
        self.user.read().await.clone()
    }

    pub async fn is_authenticated(&self) -> bool {
        self.user.read().await.is_some()
    }

    pub async fn login(&self, profile: UserProfile) -> Result<()> {
        self.login_unless(profile, &AtomicBool::new(false))
            .await
            .map(|_| ())
    }

    /// Sign in unless `cancelled` is set once the write lock is held.
    /// Returns whether the profile was stored.
    pub async fn login_unless(&self, profile: UserProfile, cancelled: &AtomicBool) -> Result<bool> {
        let mut user = self.user.write().await;
        if cancelled.load(Ordering::SeqCst) {
            debug!("Login cancelled before it was stored");
            return Ok(false);
        }

        self.storage
            .set(STORAGE_KEY, serde_json::to_value(&profile)?)
            .await?;
        info!(username = %profile.username, provider = %profile.provider, "Signed in");
        *user = Some(profile);
        Ok(true)
    }

    pub async fn logout(&self) -> Result<()> {
        let mut user = self.user.write().await;
        self.storage.remove(STORAGE_KEY).await?;
        if user.take().is_some() {
            info!("Signed out");
        } else {
            debug!("Logout with no signed-in profile");
        }
        Ok(())
    }

    pub fn storage(&self) -> &LocalStorage {
        &self.storage
    }
}
