//! Wires the transport, stores, and facades into one [`Session`].
//!
//! A [`Session`] is the single entry point an application holds. All
//! components share the same transport and persisted state, so a token
//! refresh performed for one request is immediately visible to every
//! other component, and a session reset clears them all at once.

use std::sync::Arc;

use crate::activity::ActivityLog;
use crate::auth::{AuthFacade, AuthState};
use crate::collections::CollectionStore;
use crate::config::ClientConfig;
use crate::http::ApiTransport;
use crate::import::ImportPipeline;
use crate::notify::{Notifier, TracingNotifier};
use crate::onboarding::Onboarding;
use crate::storage::{ClientState, FileStore, MemoryStore, StateStore};

pub struct Session {
    config: ClientConfig,
    state: ClientState,
    auth: AuthFacade,
    collections: CollectionStore,
    activity: ActivityLog,
    import: ImportPipeline,
    onboarding: Onboarding,
}

impl Session {
    /// Build a session against `config`, persisting to `store` and
    /// reporting outcomes through `notifier`.
    pub fn new(
        config: ClientConfig,
        store: Arc<dyn StateStore>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let state = ClientState::new(store);
        let auth_state = AuthState::default();
        let transport = Arc::new(ApiTransport::new(
            &config,
            state.clone(),
            auth_state.clone(),
        ));

        Self {
            auth: AuthFacade::new(
                Arc::clone(&transport),
                state.clone(),
                auth_state,
                Arc::clone(&notifier),
            ),
            collections: CollectionStore::new(Arc::clone(&transport), Arc::clone(&notifier)),
            activity: ActivityLog::new(Arc::clone(&transport), Arc::clone(&notifier)),
            import: ImportPipeline::new(transport, Arc::clone(&notifier)),
            onboarding: Onboarding::new(state.clone()),
            config,
            state,
        }
    }

    /// Build a session from the environment.
    ///
    /// Reads a `.env` file when present, then [`ClientConfig::from_env`].
    /// With `SATCHEL_STATE_FILE` set the session persists across runs;
    /// otherwise state lives in memory and vanishes on drop. Outcomes
    /// are logged via [`TracingNotifier`].
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        let config = ClientConfig::from_env();
        let store: Arc<dyn StateStore> = match &config.state_file {
            Some(path) => Arc::new(FileStore::open(path.clone())),
            None => Arc::new(MemoryStore::new()),
        };
        Self::new(config, store, Arc::new(TracingNotifier))
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Raw persisted state, mainly for diagnostics.
    pub fn state(&self) -> &ClientState {
        &self.state
    }

    pub fn auth(&self) -> &AuthFacade {
        &self.auth
    }

    pub fn collections(&self) -> &CollectionStore {
        &self.collections
    }

    pub fn activity(&self) -> &ActivityLog {
        &self.activity
    }

    pub fn import(&self) -> &ImportPipeline {
        &self.import
    }

    pub fn onboarding(&self) -> &Onboarding {
        &self.onboarding
    }

    /// Log out and drop everything tied to the departing user. The
    /// cached folders and records go too, so a following login starts
    /// from an empty cache instead of briefly showing stale data.
    pub async fn logout(&self) {
        self.auth.logout().await;
        self.collections.clear_cached();
    }
}
