use serde::{Deserialize, Serialize};

use crate::protocol::{NodeId, PageEvent};

/// Events consumed by the session loop
#[derive(Debug, Clone)]
pub enum AppEvent {
    /// Something reported by the page shim
    Page(PageEvent),
    /// Flag store changed (settings surface or page toggle)
    FlagsChanged(FeatureFlags),
    /// Settle delay after a pointer release elapsed
    SelectionSettled,
    /// A simplification request finished
    PreloadSettled {
        generation: u64,
        outcome: SimplifyOutcome,
    },
    /// Restart delay after cancelling speech elapsed
    SpeechRestart { utterance: u64 },
    /// Copy checkmark should revert to the idle icon
    CopyReverted { node: NodeId },
}

/// Persisted feature toggles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FeatureFlags {
    pub simplify_enabled: bool,
    pub tts_enabled: bool,
}

impl FeatureFlags {
    pub fn any_enabled(&self) -> bool {
        self.simplify_enabled || self.tts_enabled
    }
}

impl Default for FeatureFlags {
    fn default() -> Self {
        Self {
            simplify_enabled: true,
            tts_enabled: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Client rectangle as reported by `getBoundingClientRect`
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

/// Successful reply of the simplification service
#[derive(Debug, Clone, PartialEq)]
pub struct Simplification {
    pub original_text: String,
    pub reformulated_text: String,
    pub original_score: Option<f64>,
    pub simplified_score: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Transport failed (connection refused, timeout)
    Network,
    /// Service answered with an error payload
    Api,
    /// Service answered with something that is not the expected JSON
    Format,
}

/// Settled value of a simplification request. Failures are data, not errors.
#[derive(Debug, Clone, PartialEq)]
pub enum SimplifyOutcome {
    Success(Simplification),
    Failure { kind: FailureKind, message: String },
    Disabled { message: String },
}

impl SimplifyOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, SimplifyOutcome::Success(_))
    }
}
