use std::sync::Arc;

use plainly_config::Config;
use tokio::sync::RwLock;

use crate::flags::FlagStore;

pub struct AppState {
    pub config: Arc<RwLock<Config>>,
    pub flags: Arc<FlagStore>,
}

impl AppState {
    pub fn new(config: Config, flags: FlagStore) -> Self {
        Self {
            config: Arc::new(RwLock::new(config)),
            flags: Arc::new(flags),
        }
    }
}
