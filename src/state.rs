use std::sync::Arc;

use crate::config::AppConfig;
use crate::database::Querier;

/// Everything a handler needs, handed to the router at construction
#[derive(Clone)]
pub struct AppState {
    pub querier: Arc<dyn Querier>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(querier: Arc<dyn Querier>, config: AppConfig) -> Self {
        Self {
            querier,
            config: Arc::new(config),
        }
    }
}
