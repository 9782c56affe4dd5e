use serde::{Deserialize, Serialize};

/// Ratings are only logged unless enabled
#[derive(Default, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct FeedbackConfig {
    /// POST ratings to `<endpoint>/feedback`
    pub enabled: bool,
}
