//! Durable client-side session state.
//!
//! A tiny string key/value store holds everything that must survive a
//! restart: the token pair and the onboarding flag. Persistence is
//! best-effort: a failed write degrades the session to "log in again
//! next run", so failures are logged and swallowed rather than
//! propagated into every call site.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

use tracing::warn;

// ---------------------------------------------------------------------------
// Well-known keys
// ---------------------------------------------------------------------------

/// Short-lived bearer token attached to authenticated requests.
pub const KEY_ACCESS_TOKEN: &str = "access_token";

/// Long-lived token exchanged for a fresh pair on expiry.
pub const KEY_REFRESH_TOKEN: &str = "refresh_token";

/// Set once the user has completed (or skipped) the first-run walkthrough.
pub const KEY_WALKTHROUGH_SEEN: &str = "has_seen_walkthrough";

// ---------------------------------------------------------------------------
// Store trait and implementations
// ---------------------------------------------------------------------------

/// String key/value storage with wholesale clearing.
///
/// Implementations must tolerate concurrent access; all methods take
/// `&self`.
pub trait StateStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
    fn remove(&self, key: &str);
    /// Drop every key, not just the well-known ones.
    fn clear(&self);
}

/// Volatile store; state lives only as long as the process.
#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn locked(&self) -> MutexGuard<'_, HashMap<String, String>> {
        self.entries.lock().expect("state store lock poisoned")
    }
}

impl StateStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.locked().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.locked().insert(key.to_string(), value.to_string());
    }

    fn remove(&self, key: &str) {
        self.locked().remove(key);
    }

    fn clear(&self) {
        self.locked().clear();
    }
}

/// Write-through store backed by a single JSON file.
///
/// The whole map is rewritten on every mutation; the file is small
/// (three short keys) so this is not worth batching.
pub struct FileStore {
    path: PathBuf,
    entries: Mutex<HashMap<String, String>>,
}

impl FileStore {
    /// Open the store at `path`, loading existing state when present.
    /// A missing or unreadable file starts the store empty.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = match std::fs::read_to_string(&path) {
            Ok(raw) => match serde_json::from_str::<HashMap<String, String>>(&raw) {
                Ok(entries) => entries,
                Err(err) => {
                    warn!(path = %path.display(), error = %err, "discarding corrupt state file");
                    HashMap::new()
                }
            },
            Err(_) => HashMap::new(),
        };
        Self {
            path,
            entries: Mutex::new(entries),
        }
    }

    fn locked(&self) -> MutexGuard<'_, HashMap<String, String>> {
        self.entries.lock().expect("state store lock poisoned")
    }

    fn persist(&self, entries: &HashMap<String, String>) {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                if let Err(err) = std::fs::create_dir_all(parent) {
                    warn!(path = %self.path.display(), error = %err, "failed to create state directory");
                    return;
                }
            }
        }
        match serde_json::to_string_pretty(entries) {
            Ok(raw) => {
                if let Err(err) = std::fs::write(&self.path, raw) {
                    warn!(path = %self.path.display(), error = %err, "failed to persist client state");
                }
            }
            Err(err) => {
                warn!(error = %err, "failed to serialize client state");
            }
        }
    }

    /// The file this store writes to.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl StateStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.locked().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        let mut entries = self.locked();
        entries.insert(key.to_string(), value.to_string());
        self.persist(&entries);
    }

    fn remove(&self, key: &str) {
        let mut entries = self.locked();
        entries.remove(key);
        self.persist(&entries);
    }

    fn clear(&self) {
        let mut entries = self.locked();
        entries.clear();
        self.persist(&entries);
    }
}

// ---------------------------------------------------------------------------
// Typed view
// ---------------------------------------------------------------------------

/// Typed accessors over a shared [`StateStore`].
///
/// Cheap to clone; every clone sees the same underlying store.
#[derive(Clone)]
pub struct ClientState {
    store: Arc<dyn StateStore>,
}

impl ClientState {
    pub fn new(store: Arc<dyn StateStore>) -> Self {
        Self { store }
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()))
    }

    pub fn access_token(&self) -> Option<String> {
        self.store.get(KEY_ACCESS_TOKEN)
    }

    pub fn refresh_token(&self) -> Option<String> {
        self.store.get(KEY_REFRESH_TOKEN)
    }

    /// Store both halves of a freshly issued token pair.
    pub fn store_token_pair(&self, access_token: &str, refresh_token: &str) {
        self.store.set(KEY_ACCESS_TOKEN, access_token);
        self.store.set(KEY_REFRESH_TOKEN, refresh_token);
    }

    pub fn has_seen_walkthrough(&self) -> bool {
        self.store
            .get(KEY_WALKTHROUGH_SEEN)
            .map_or(false, |v| v == "true")
    }

    pub fn set_walkthrough_seen(&self) {
        self.store.set(KEY_WALKTHROUGH_SEEN, "true");
    }

    pub fn reset_walkthrough(&self) {
        self.store.remove(KEY_WALKTHROUGH_SEEN);
    }

    /// Wholesale wipe: tokens, flags, and anything else present.
    ///
    /// Used on logout and on fatal session errors. Deliberately not
    /// selective, since leaving stale keys behind is worse than re-running
    /// the walkthrough.
    pub fn clear_all(&self) {
        self.store.clear();
    }
}
