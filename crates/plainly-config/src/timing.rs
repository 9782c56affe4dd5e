use std::time::Duration;

use serde::{Deserialize, Serialize};

fn default_settle_delay_ms() -> u64 {
    10
}

fn default_speech_restart_delay_ms() -> u64 {
    50
}

fn default_copy_feedback_ms() -> u64 {
    1000
}

#[derive(Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct TimingConfig {
    /// Wait after pointer release before reading the selection
    #[serde(default = "default_settle_delay_ms")]
    pub settle_delay_ms: u64,
    /// Gap between cancelling speech and starting the next utterance
    #[serde(default = "default_speech_restart_delay_ms")]
    pub speech_restart_delay_ms: u64,
    /// How long the copy checkmark stays visible
    #[serde(default = "default_copy_feedback_ms")]
    pub copy_feedback_ms: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            settle_delay_ms: default_settle_delay_ms(),
            speech_restart_delay_ms: default_speech_restart_delay_ms(),
            copy_feedback_ms: default_copy_feedback_ms(),
        }
    }
}

impl TimingConfig {
    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    pub fn speech_restart_delay(&self) -> Duration {
        Duration::from_millis(self.speech_restart_delay_ms)
    }

    pub fn copy_feedback(&self) -> Duration {
        Duration::from_millis(self.copy_feedback_ms)
    }
}
