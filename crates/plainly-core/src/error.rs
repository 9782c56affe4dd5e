use plainly_types::{FailureKind, Tone};

/// Ways a selection lifecycle step can end without a simplified result
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum LifecycleError {
    #[error("network error")]
    Network,

    #[error("api error")]
    Api,

    #[error("format error")]
    Format,

    #[error("skipped: disabled")]
    FeatureDisabled,

    #[error("no text selected")]
    NoSelection,

    #[error("skipped: unsupported")]
    PlatformUnsupported,
}

impl LifecycleError {
    /// Red for transport and format problems, amber for everything expected
    pub fn tone(&self) -> Tone {
        match self {
            LifecycleError::Network | LifecycleError::Format => Tone::Error,
            _ => Tone::Warning,
        }
    }
}

impl From<FailureKind> for LifecycleError {
    fn from(kind: FailureKind) -> Self {
        match kind {
            FailureKind::Network => LifecycleError::Network,
            FailureKind::Api => LifecycleError::Api,
            FailureKind::Format => LifecycleError::Format,
        }
    }
}

/// Status string answered to an inbound shortcut command
pub fn command_status(result: Result<(), LifecycleError>) -> String {
    match result {
        Ok(()) => "initiated".to_string(),
        Err(e) => e.to_string(),
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ClipboardError {
    #[error("Clipboard unavailable: {0}")]
    Unavailable(String),

    #[error("Clipboard write failed: {0}")]
    WriteFailed(String),
}
