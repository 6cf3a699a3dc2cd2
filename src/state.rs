//! Application state shared across all request handlers.

use std::sync::Arc;

use axum::extract::FromRef;
use axum_extra::extract::cookie::Key;

use crate::config::Config;
use crate::store::SnippetStore;
use crate::templates::TemplateCache;

/// Shared application state available to all request handlers.
///
/// Cheap to clone: the store shares its connection, the template cache and
/// config are behind `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// Snippet repository.
    pub store: SnippetStore,

    /// Immutable template cache, built once at startup.
    pub templates: Arc<TemplateCache>,

    /// Application configuration.
    pub config: Arc<Config>,

    /// Signing key for the flash cookie.
    pub key: Key,
}

impl AppState {
    /// Create the application state from configuration.
    ///
    /// Opens (or creates) the database and compiles the template cache.
    /// A template parse failure is a startup-time fatal condition.
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let store = SnippetStore::open(&config.db_path)?;
        let templates = TemplateCache::build(&config.template_dir)?;
        let key = Key::derive_from(config.session_secret.as_bytes());

        Ok(Self {
            store,
            templates: Arc::new(templates),
            config: Arc::new(config),
            key,
        })
    }
}

// Lets SignedCookieJar extract its key from our state.
impl FromRef<AppState> for Key {
    fn from_ref(state: &AppState) -> Self {
        state.key.clone()
    }
}
