use std::sync::Arc;

use crate::config::ServerConfig;
use crate::flash::FlashStore;
use crate::forms::Forms;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Form validators.
    pub forms: Arc<Forms>,
    /// Errors and old input carried across form redirects.
    pub flash: Arc<FlashStore>,
}

impl AppState {
    /// Build state from configuration. Fails if a form's rule declarations
    /// do not parse.
    pub fn from_config(config: ServerConfig) -> Result<Self, formcheck_core::error::CoreError> {
        let forms = Forms::build(&config.locale)?;
        let flash = FlashStore::new(config.flash_ttl_secs);
        Ok(Self {
            config: Arc::new(config),
            forms: Arc::new(forms),
            flash: Arc::new(flash),
        })
    }
}
