use plainly_client::FeedbackRecord;
use plainly_config::ui::UiConfig;
use plainly_types::{NodeId, PopupBody, Rating, SimplifyOutcome, UiCommand};

use crate::effects::{ClipboardWriter, Renderer};
use crate::error::LifecycleError;
use crate::metric;

pub const FEEDBACK_PROMPT: &str = "Was this simplification helpful?";
pub const FEEDBACK_THANKS: &str = "Thanks for your feedback!";
const EMPTY_RESULT: &str = "No reformulated text";
const ERROR_TOOLTIP: &str = "Error loading data";
const UNAVAILABLE_TOOLTIP: &str = "Simplification unavailable";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresentStatus {
    Success,
    Failure,
    Disabled,
    Error,
}

/// What the popup ends up showing for a settled request
#[derive(Debug, Clone, PartialEq)]
pub struct PresentedResult {
    pub original_text: String,
    /// Simplified text on success, otherwise the message to show
    pub simplified_text: String,
    pub original_score: Option<f64>,
    pub simplified_score: Option<f64>,
    pub status: PresentStatus,
}

impl PresentedResult {
    pub fn from_outcome(outcome: &SimplifyOutcome, original_text: &str) -> Self {
        match outcome {
            SimplifyOutcome::Success(s) => Self {
                original_text: s.original_text.clone(),
                simplified_text: if s.reformulated_text.is_empty() {
                    EMPTY_RESULT.to_string()
                } else {
                    s.reformulated_text.clone()
                },
                original_score: s.original_score,
                simplified_score: s.simplified_score,
                status: PresentStatus::Success,
            },
            SimplifyOutcome::Failure { kind, message } => Self {
                original_text: original_text.to_string(),
                simplified_text: message.clone(),
                original_score: None,
                simplified_score: None,
                status: match LifecycleError::from(*kind) {
                    LifecycleError::Api => PresentStatus::Failure,
                    _ => PresentStatus::Error,
                },
            },
            SimplifyOutcome::Disabled { message } => Self {
                original_text: original_text.to_string(),
                simplified_text: message.clone(),
                original_score: None,
                simplified_score: None,
                status: PresentStatus::Disabled,
            },
        }
    }

    pub fn difficulty_drop(&self) -> Option<f64> {
        metric::difficulty_drop(self.original_score, self.simplified_score)
    }

    pub fn is_success(&self) -> bool {
        self.status == PresentStatus::Success
    }
}

/// The floating result panel bound to one request generation
#[derive(Debug, Clone, PartialEq)]
pub struct ResultPopup {
    pub node: NodeId,
    pub generation: u64,
    presented: Option<PresentedResult>,
    rating: Option<Rating>,
}

impl ResultPopup {
    /// Render an empty panel below the selection with a loading placeholder
    pub fn open(
        node: NodeId,
        generation: u64,
        center_x: f64,
        bottom_y: f64,
        ui: &UiConfig,
        renderer: &mut dyn Renderer,
    ) -> Self {
        renderer.render(UiCommand::ShowPopup {
            node,
            left: center_x - ui.popup_width / 2.0,
            top: bottom_y + ui.popup_offset_y,
            width: ui.popup_width,
        });
        renderer.render(UiCommand::SetPopupBody {
            node,
            body: PopupBody::Loading,
        });

        Self {
            node,
            generation,
            presented: None,
            rating: None,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.presented.is_none()
    }

    pub fn presented(&self) -> Option<&PresentedResult> {
        self.presented.as_ref()
    }

    pub fn rating(&self) -> Option<Rating> {
        self.rating
    }

    /// Fill the panel once the request settled
    pub fn present(&mut self, outcome: &SimplifyOutcome, original_text: &str, renderer: &mut dyn Renderer) {
        let presented = PresentedResult::from_outcome(outcome, original_text);
        let node = self.node;

        match (presented.status, outcome) {
            (PresentStatus::Success, _) => {
                renderer.render(UiCommand::SetPopupBody {
                    node,
                    body: PopupBody::Text {
                        text: presented.simplified_text.clone(),
                    },
                });
                renderer.render(UiCommand::SetTooltip {
                    node,
                    text: metric::difficulty_tooltip(presented.difficulty_drop()),
                });
                renderer.render(UiCommand::ShowFeedback {
                    node,
                    prompt: FEEDBACK_PROMPT.to_string(),
                });
            }
            (_, SimplifyOutcome::Failure { kind, .. }) => {
                let error = LifecycleError::from(*kind);
                renderer.render(UiCommand::SetPopupBody {
                    node,
                    body: PopupBody::Message {
                        text: presented.simplified_text.clone(),
                        tone: error.tone(),
                    },
                });
                renderer.render(UiCommand::SetTooltip {
                    node,
                    text: match presented.status {
                        PresentStatus::Error => ERROR_TOOLTIP,
                        _ => UNAVAILABLE_TOOLTIP,
                    }
                    .to_string(),
                });
            }
            _ => {
                renderer.render(UiCommand::SetPopupBody {
                    node,
                    body: PopupBody::Message {
                        text: presented.simplified_text.clone(),
                        tone: LifecycleError::FeatureDisabled.tone(),
                    },
                });
                renderer.render(UiCommand::SetTooltip {
                    node,
                    text: UNAVAILABLE_TOOLTIP.to_string(),
                });
            }
        }

        tracing::debug!("[POPUP] Presented {:?} for #{}", presented.status, self.generation);
        self.presented = Some(presented);
    }

    /// Copy the simplified text. Returns true when the checkmark should show.
    pub fn copy(&self, clipboard: &mut dyn ClipboardWriter, renderer: &mut dyn Renderer) -> bool {
        let Some(presented) = self.presented.as_ref().filter(|p| p.is_success()) else {
            tracing::debug!("[POPUP] Copy ignored, nothing to copy yet");
            return false;
        };

        match clipboard.write_text(&presented.simplified_text) {
            Ok(()) => {
                renderer.render(UiCommand::SetCopyState {
                    node: self.node,
                    copied: true,
                });
                true
            }
            Err(e) => {
                tracing::error!("[POPUP] Copy failed: {}", e);
                false
            }
        }
    }

    /// Record a thumbs-up/down. Only the first rating of a successful result counts.
    pub fn rate(&mut self, rating: Rating, renderer: &mut dyn Renderer) -> Option<FeedbackRecord> {
        if self.rating.is_some() {
            return None;
        }
        let presented = self.presented.as_ref().filter(|p| p.is_success())?;

        renderer.render(UiCommand::FeedbackRecorded {
            node: self.node,
            rating,
            message: FEEDBACK_THANKS.to_string(),
        });

        self.rating = Some(rating);
        Some(FeedbackRecord {
            original: presented.original_text.clone(),
            simplified: presented.simplified_text.clone(),
            rating,
        })
    }

    pub fn remove(self, renderer: &mut dyn Renderer) {
        renderer.render(UiCommand::Remove { node: self.node });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::{MemoryClipboard, RecordingRenderer, success};
    use plainly_types::{FailureKind, Tone};

    fn open(renderer: &mut RecordingRenderer) -> ResultPopup {
        ResultPopup::open(NodeId(9), 1, 400.0, 300.0, &UiConfig::default(), renderer)
    }

    #[test]
    fn opens_centered_below_selection_with_placeholder() {
        let mut renderer = RecordingRenderer::default();
        let popup = open(&mut renderer);

        assert!(popup.is_loading());
        assert_eq!(
            renderer.commands(),
            vec![
                UiCommand::ShowPopup {
                    node: NodeId(9),
                    left: 150.0,
                    top: 320.0,
                    width: 500.0,
                },
                UiCommand::SetPopupBody {
                    node: NodeId(9),
                    body: PopupBody::Loading,
                },
            ]
        );
    }

    #[test]
    fn success_shows_text_tooltip_and_feedback() {
        let mut renderer = RecordingRenderer::default();
        let mut popup = open(&mut renderer);
        renderer.clear();

        popup.present(&success("The cat sat.", "A cat sat.", 8.0, 4.0), "The cat sat.", &mut renderer);

        let commands = renderer.commands();
        assert!(commands.contains(&UiCommand::SetPopupBody {
            node: NodeId(9),
            body: PopupBody::Text {
                text: "A cat sat.".into()
            },
        }));
        assert!(commands.contains(&UiCommand::SetTooltip {
            node: NodeId(9),
            text: "Difficulty decreased by 50.0%".into(),
        }));
        assert!(commands.iter().any(|c| matches!(c, UiCommand::ShowFeedback { .. })));
    }

    #[test]
    fn api_failure_is_amber_without_feedback() {
        let mut renderer = RecordingRenderer::default();
        let mut popup = open(&mut renderer);
        renderer.clear();

        let outcome = SimplifyOutcome::Failure {
            kind: FailureKind::Api,
            message: "Unable to reformulate.".into(),
        };
        popup.present(&outcome, "text", &mut renderer);

        let commands = renderer.commands();
        assert!(commands.contains(&UiCommand::SetPopupBody {
            node: NodeId(9),
            body: PopupBody::Message {
                text: "Unable to reformulate.".into(),
                tone: Tone::Warning,
            },
        }));
        assert!(!commands.iter().any(|c| matches!(c, UiCommand::ShowFeedback { .. })));
        assert_eq!(popup.presented().unwrap().status, PresentStatus::Failure);
    }

    #[test]
    fn disabled_is_amber() {
        let mut renderer = RecordingRenderer::default();
        let mut popup = open(&mut renderer);
        renderer.clear();

        let outcome = SimplifyOutcome::Disabled {
            message: "off".into(),
        };
        popup.present(&outcome, "text", &mut renderer);

        assert!(renderer.commands().contains(&UiCommand::SetPopupBody {
            node: NodeId(9),
            body: PopupBody::Message {
                text: "off".into(),
                tone: Tone::Warning,
            },
        }));
        assert_eq!(popup.presented().unwrap().status, PresentStatus::Disabled);
    }

    #[test]
    fn empty_reformulation_has_placeholder_text() {
        let presented = PresentedResult::from_outcome(&success("a", "", 1.0, 1.0), "a");
        assert_eq!(presented.simplified_text, "No reformulated text");
    }

    #[test]
    fn copy_requires_success_and_writes_simplified_text() {
        let mut renderer = RecordingRenderer::default();
        let mut clipboard = MemoryClipboard::default();
        let mut popup = open(&mut renderer);

        assert!(!popup.copy(&mut clipboard, &mut renderer));

        popup.present(&success("The cat sat.", "A cat sat.", 8.0, 4.0), "The cat sat.", &mut renderer);
        assert!(popup.copy(&mut clipboard, &mut renderer));
        assert_eq!(clipboard.contents(), Some("A cat sat.".to_string()));
        assert!(renderer.commands().contains(&UiCommand::SetCopyState {
            node: NodeId(9),
            copied: true,
        }));
    }

    #[test]
    fn first_rating_wins() {
        let mut renderer = RecordingRenderer::default();
        let mut popup = open(&mut renderer);
        popup.present(&success("The cat sat.", "A cat sat.", 8.0, 4.0), "The cat sat.", &mut renderer);

        let record = popup.rate(Rating::Like, &mut renderer).unwrap();
        assert_eq!(record.original, "The cat sat.");
        assert_eq!(record.simplified, "A cat sat.");
        assert_eq!(record.rating, Rating::Like);

        assert!(popup.rate(Rating::Dislike, &mut renderer).is_none());
        assert_eq!(popup.rating(), Some(Rating::Like));
    }

    #[test]
    fn rating_needs_a_successful_result() {
        let mut renderer = RecordingRenderer::default();
        let mut popup = open(&mut renderer);
        assert!(popup.rate(Rating::Like, &mut renderer).is_none());
    }
}
