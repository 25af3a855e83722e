// ABOUTME: Shared application state handed to every route handler.

use std::path::PathBuf;
use std::sync::Arc;

use digests_harvest::Client;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub client: Arc<Client>,
    pub static_dir: PathBuf,
}

impl AppState {
    pub fn new(client: Client, static_dir: impl Into<PathBuf>) -> Self {
        Self {
            client: Arc::new(client),
            static_dir: static_dir.into(),
        }
    }
}
