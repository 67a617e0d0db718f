//! The composition root.
//!
//! All client state lives here: the durable storage, the backend client, the session store
//! and the data store are constructed once per process and injected into whatever consumes
//! them. There are no module-level singletons; a test can build as many independent `App`
//! values as it likes.

use crate::api::{self, Backend, Mode};
use crate::{Config, DataStore, Session, Storage};
use std::sync::Arc;

pub struct App {
    config: Config,
    storage: Storage,
    backend: Arc<dyn Backend>,
    session: Session,
    store: DataStore,
}

impl App {
    /// Wires up the full object graph over the given configuration.
    pub fn new(config: Config, mode: Mode) -> Self {
        let storage = Storage::open(config.storage_path());
        let backend = api::backend(&config, storage.clone(), mode);
        let session = Session::new(Arc::clone(&backend), storage.clone());
        let store = DataStore::new(Arc::clone(&backend));
        Self {
            config,
            storage,
            backend,
            session,
            store,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn storage(&self) -> &Storage {
        &self.storage
    }

    pub fn backend(&self) -> &Arc<dyn Backend> {
        &self.backend
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn store(&self) -> &DataStore {
        &self.store
    }
}

#[cfg(test)]
mod tests {
    use crate::test::TestEnv;

    #[tokio::test]
    async fn test_two_apps_are_independent() {
        let env_a = TestEnv::new().await;
        let env_b = TestEnv::new().await;
        let app_a = env_a.app();
        let app_b = env_b.app();

        app_a
            .session()
            .login("demo@example.com", "password")
            .await
            .unwrap();

        assert!(app_a.session().state().authenticated);
        assert!(!app_b.session().state().authenticated);
    }

    #[tokio::test]
    async fn test_app_store_loads_from_test_backend() {
        let env = TestEnv::new().await;
        let app = env.app();
        app.store().load_all().await;
        assert!(!app.store().categories().is_empty());
        assert!(!app.store().transactions().is_empty());
    }
}
