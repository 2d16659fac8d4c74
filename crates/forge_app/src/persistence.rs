use std::path::PathBuf;

use forge_core::PersistedSession;
use forge_engine::KeyedStore;
use forge_logging::{forge_error, forge_info, forge_warn};

/// Storage key the session document is saved under.
pub const STORAGE_KEY: &str = "rusty-pixel-forge-storage";
const STORAGE_EXTENSION: &str = "ron";

pub struct SessionStore {
    store: KeyedStore,
}

impl SessionStore {
    pub fn new(state_dir: impl Into<PathBuf>) -> Self {
        Self {
            store: KeyedStore::new(state_dir, STORAGE_KEY, STORAGE_EXTENSION),
        }
    }

    pub fn path(&self) -> PathBuf {
        self.store.path()
    }

    /// Returns `None` when there is no usable saved session.
    pub fn load(&self) -> Option<PersistedSession> {
        let path = self.store.path();
        let content = match self.store.load() {
            Ok(Some(text)) => text,
            Ok(None) => return None,
            Err(err) => {
                forge_warn!("Failed to read saved session from {:?}: {}", path, err);
                return None;
            }
        };

        match ron::from_str::<PersistedSession>(&content) {
            Ok(session) => {
                forge_info!(
                    "Loaded saved session from {:?} ({} item(s))",
                    path,
                    session.items.len()
                );
                Some(session)
            }
            Err(err) => {
                forge_warn!("Failed to parse saved session from {:?}: {}", path, err);
                None
            }
        }
    }

    pub fn save(&self, session: &PersistedSession) {
        let pretty = ron::ser::PrettyConfig::new();
        let content = match ron::ser::to_string_pretty(session, pretty) {
            Ok(text) => text,
            Err(err) => {
                forge_error!("Failed to serialize session: {}", err);
                return;
            }
        };

        if let Err(err) = self.store.save(&content) {
            forge_error!("Failed to write session to {:?}: {}", self.store.path(), err);
        }
    }
}

/// State directory used when none is given on the command line.
pub fn default_state_dir() -> PathBuf {
    std::env::current_dir()
        .unwrap_or_else(|_| PathBuf::from("."))
        .join(".pixel_forge")
}
