//! Application state shared by all handlers.

use std::sync::Arc;

use nice_embed_core::AppConfig;
use nice_embed_infra::Notifier;

use crate::services::upload::UploadService;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub uploads: UploadService,
    pub notifier: Arc<dyn Notifier>,
}

impl AppState {
    pub fn new(config: AppConfig, notifier: Arc<dyn Notifier>) -> Self {
        let config = Arc::new(config);
        Self {
            uploads: UploadService::new(config.clone()),
            config,
            notifier,
        }
    }
}
