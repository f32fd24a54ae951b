use std::sync::Arc;

use skudesk_store::{CatalogStore, CredentialStore, UploadDir};

use crate::config::ServerConfig;
use crate::sheets::SheetsClient;
use crate::ws::WsManager;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable: everything is behind `Arc` or already `Clone`.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServerConfig>,
    /// The catalog file and its writer lock.
    pub catalog: Arc<CatalogStore>,
    pub uploads: UploadDir,
    pub credentials: Arc<CredentialStore>,
    /// WebSocket connection manager (browser clients).
    pub ws_manager: Arc<WsManager>,
    /// Catalog change events, fanned out to WebSocket clients.
    pub event_bus: Arc<skudesk_events::EventBus>,
    /// Client for the spreadsheet service used by sheet imports.
    pub sheets: SheetsClient,
}

impl AppState {
    /// Build state from configuration. Touches no files.
    pub fn new(config: ServerConfig) -> Self {
        Self {
            catalog: Arc::new(CatalogStore::new(config.data_file.clone())),
            uploads: UploadDir::new(config.uploads_dir.clone()),
            credentials: Arc::new(CredentialStore::new(config.credentials_file.clone())),
            ws_manager: Arc::new(WsManager::new()),
            event_bus: Arc::new(skudesk_events::EventBus::default()),
            sheets: SheetsClient::new(&config.sheets_base_url),
            config: Arc::new(config),
        }
    }
}
