use serde::{Deserialize, Serialize};

use self::feedback::FeedbackConfig;
use self::network::{NetworkConfig, TransportConfig};
use self::timing::TimingConfig;
use self::ui::UiConfig;

pub mod feedback;
pub mod network;
pub mod timing;
pub mod ui;

pub use plainly_types::FeatureFlags;

#[derive(Serialize, Deserialize, Clone, Default)]
#[serde(default)]
pub struct Config {
    pub network: NetworkConfig,
    pub transport: TransportConfig,
    pub timing: TimingConfig,
    pub ui: UiConfig,
    pub feedback: FeedbackConfig,
    /// Flags used when the flag store has never been written
    pub default_flags: FeatureFlags,
}

impl Config {
    pub fn new() -> Self {
        Config {
            network: NetworkConfig::new(),
            transport: TransportConfig::new(),
            timing: TimingConfig::default(),
            ui: UiConfig::default(),
            feedback: FeedbackConfig::default(),
            default_flags: FeatureFlags::default(),
        }
    }
}
