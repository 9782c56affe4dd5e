use std::sync::Arc;

use plainly_client::{Simplifier, SimplifyError};
use plainly_types::{AppEvent, FailureKind, FeatureFlags, SimplifyOutcome};

use crate::effects::Scheduler;

pub const DISABLED_MESSAGE: &str = "Simplification is turned off in the extension settings.";

/// Request bound to one selection snapshot
#[derive(Debug, Clone, PartialEq)]
pub struct PendingResult {
    pub generation: u64,
    pub text: String,
    /// `None` while the request is in flight
    pub outcome: Option<SimplifyOutcome>,
}

impl PendingResult {
    pub fn is_settled(&self) -> bool {
        self.outcome.is_some()
    }

    /// Whether this result can serve `text` under the given flags
    pub fn serves(&self, text: &str, flags: FeatureFlags) -> bool {
        if self.text != text {
            return false;
        }
        // a result computed while the flag was off is stale once it is back on
        !(flags.simplify_enabled && matches!(self.outcome, Some(SimplifyOutcome::Disabled { .. })))
    }
}

/// Ask the service for a simplification, folding every failure into the outcome
pub async fn request_simplification(
    simplifier: &dyn Simplifier,
    text: &str,
    flags: FeatureFlags,
) -> SimplifyOutcome {
    if !flags.simplify_enabled {
        return SimplifyOutcome::Disabled {
            message: DISABLED_MESSAGE.to_string(),
        };
    }

    match simplifier.simplify(text).await {
        Ok(simplification) => SimplifyOutcome::Success(simplification),
        Err(e) => {
            let kind = match &e {
                SimplifyError::NetworkError(_) => FailureKind::Network,
                SimplifyError::ApiError { .. }
                | SimplifyError::Rejected(_) => FailureKind::Api,
                SimplifyError::FormatError(_) => FailureKind::Format,
            };
            tracing::warn!("[PRELOAD] Request failed: {}", e);
            SimplifyOutcome::Failure {
                kind,
                message: e.user_message(),
            }
        }
    }
}

/// Start the request for a snapshot right away.
///
/// With the flag off the result is settled immediately and no task is spawned.
/// Otherwise the outcome comes back as `AppEvent::PreloadSettled`.
pub fn start(
    simplifier: Arc<dyn Simplifier>,
    scheduler: &Scheduler,
    generation: u64,
    text: &str,
    flags: FeatureFlags,
) -> PendingResult {
    if !flags.simplify_enabled {
        return PendingResult {
            generation,
            text: text.to_string(),
            outcome: Some(SimplifyOutcome::Disabled {
                message: DISABLED_MESSAGE.to_string(),
            }),
        };
    }

    tracing::debug!("[PRELOAD] Starting request #{} ({} chars)", generation, text.len());

    let request_text = text.to_string();
    scheduler.spawn(async move {
        let outcome = request_simplification(&*simplifier, &request_text, flags).await;
        AppEvent::PreloadSettled { generation, outcome }
    });

    PendingResult {
        generation,
        text: text.to_string(),
        outcome: None,
    }
}
