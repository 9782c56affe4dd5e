use std::time::Duration;

use plainly_types::{AppEvent, FeatureFlags, UiCommand};

use crate::effects::{Renderer, Scheduler};
use crate::error::LifecycleError;

pub const UNSUPPORTED_NOTICE: &str = "Sorry, your browser doesn't support Text-to-Speech.";
pub const DISABLED_NOTICE: &str = "Read aloud is turned off in the extension settings.";
pub const EMPTY_NOTICE: &str = "No text selected to read aloud.";

/// Drives the page's speech synthesis with cancel-before-restart semantics
pub struct SpeechPlayer {
    supported: bool,
    /// Utterance the page is currently speaking
    current: Option<u64>,
    /// Utterance waiting for the restart delay after a cancel
    queued: Option<(u64, String)>,
    last_utterance: u64,
}

impl Default for SpeechPlayer {
    fn default() -> Self {
        Self {
            supported: true,
            current: None,
            queued: None,
            last_utterance: 0,
        }
    }
}

impl SpeechPlayer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_supported(&mut self, supported: bool) {
        self.supported = supported;
    }

    pub fn is_speaking(&self) -> bool {
        self.current.is_some() || self.queued.is_some()
    }

    pub fn speak(
        &mut self,
        text: &str,
        flags: FeatureFlags,
        restart_delay: Duration,
        renderer: &mut dyn Renderer,
        scheduler: &Scheduler,
    ) -> Result<(), LifecycleError> {
        let refusal = if !flags.tts_enabled {
            Some((LifecycleError::FeatureDisabled, DISABLED_NOTICE))
        } else if text.trim().is_empty() {
            Some((LifecycleError::NoSelection, EMPTY_NOTICE))
        } else if !self.supported {
            Some((LifecycleError::PlatformUnsupported, UNSUPPORTED_NOTICE))
        } else {
            None
        };

        if let Some((error, notice)) = refusal {
            tracing::warn!("[SPEECH] Not speaking: {}", error);
            renderer.render(UiCommand::Notice {
                message: notice.to_string(),
            });
            return Err(error);
        }

        self.last_utterance += 1;
        let utterance = self.last_utterance;

        if self.is_speaking() {
            tracing::debug!("[SPEECH] Cancelling previous speech");
            renderer.render(UiCommand::CancelSpeech);
            self.current = None;
            self.queued = Some((utterance, text.to_string()));
            scheduler.after(restart_delay, AppEvent::SpeechRestart { utterance });
        } else {
            self.start(utterance, text.to_string(), renderer);
        }

        Ok(())
    }

    /// Restart delay elapsed; speak the queued text unless it was superseded
    pub fn on_restart(&mut self, utterance: u64, renderer: &mut dyn Renderer) {
        match self.queued.take() {
            Some((queued, text)) if queued == utterance => self.start(utterance, text, renderer),
            other => self.queued = other,
        }
    }

    /// Page reported the end (or failure) of an utterance
    pub fn on_finished(&mut self, utterance: u64) {
        if self.current == Some(utterance) {
            self.current = None;
        }
    }

    /// Stop whatever is playing or queued
    pub fn cancel(&mut self, renderer: &mut dyn Renderer) {
        if self.is_speaking() {
            tracing::debug!("[SPEECH] Cancelled");
            renderer.render(UiCommand::CancelSpeech);
        }
        self.current = None;
        self.queued = None;
    }

    fn start(&mut self, utterance: u64, text: String, renderer: &mut dyn Renderer) {
        tracing::debug!(
            "[SPEECH] Speaking #{}: {}",
            utterance,
            text.chars().take(50).collect::<String>()
        );
        self.current = Some(utterance);
        renderer.render(UiCommand::Speak { utterance, text });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::RecordingRenderer;

    const DELAY: Duration = Duration::from_millis(5);

    fn scheduler() -> (Scheduler, kanal::AsyncReceiver<AppEvent>) {
        let (tx, rx) = kanal::unbounded_async();
        (Scheduler::new(tx), rx)
    }

    #[tokio::test]
    async fn idle_player_speaks_immediately() {
        let (scheduler, _rx) = scheduler();
        let mut renderer = RecordingRenderer::default();
        let mut player = SpeechPlayer::new();

        player
            .speak("hello", FeatureFlags::default(), DELAY, &mut renderer, &scheduler)
            .unwrap();

        assert_eq!(
            renderer.commands(),
            vec![UiCommand::Speak {
                utterance: 1,
                text: "hello".into()
            }]
        );
        assert!(player.is_speaking());
    }

    #[tokio::test]
    async fn busy_player_cancels_then_restarts_after_delay() {
        let (scheduler, rx) = scheduler();
        let mut renderer = RecordingRenderer::default();
        let mut player = SpeechPlayer::new();

        player
            .speak("first", FeatureFlags::default(), DELAY, &mut renderer, &scheduler)
            .unwrap();
        renderer.clear();
        player
            .speak("second", FeatureFlags::default(), DELAY, &mut renderer, &scheduler)
            .unwrap();
        assert_eq!(renderer.commands(), vec![UiCommand::CancelSpeech]);

        let AppEvent::SpeechRestart { utterance } = rx.recv().await.unwrap() else {
            panic!("expected restart event");
        };
        player.on_restart(utterance, &mut renderer);
        assert_eq!(
            renderer.commands().last(),
            Some(&UiCommand::Speak {
                utterance: 2,
                text: "second".into()
            })
        );
    }

    #[tokio::test]
    async fn cancel_drops_queued_restart() {
        let (scheduler, rx) = scheduler();
        let mut renderer = RecordingRenderer::default();
        let mut player = SpeechPlayer::new();

        player
            .speak("first", FeatureFlags::default(), DELAY, &mut renderer, &scheduler)
            .unwrap();
        player
            .speak("second", FeatureFlags::default(), DELAY, &mut renderer, &scheduler)
            .unwrap();
        player.cancel(&mut renderer);
        renderer.clear();

        let AppEvent::SpeechRestart { utterance } = rx.recv().await.unwrap() else {
            panic!("expected restart event");
        };
        player.on_restart(utterance, &mut renderer);
        assert!(renderer.commands().is_empty());
        assert!(!player.is_speaking());
    }

    #[tokio::test]
    async fn finished_utterance_clears_reference() {
        let (scheduler, _rx) = scheduler();
        let mut renderer = RecordingRenderer::default();
        let mut player = SpeechPlayer::new();

        player
            .speak("hello", FeatureFlags::default(), DELAY, &mut renderer, &scheduler)
            .unwrap();
        player.on_finished(99);
        assert!(player.is_speaking());
        player.on_finished(1);
        assert!(!player.is_speaking());

        renderer.clear();
        player.cancel(&mut renderer);
        assert!(renderer.commands().is_empty());
    }

    #[tokio::test]
    async fn refusals_show_notice() {
        let (scheduler, _rx) = scheduler();
        let mut renderer = RecordingRenderer::default();
        let mut player = SpeechPlayer::new();

        let off = FeatureFlags {
            simplify_enabled: true,
            tts_enabled: false,
        };
        assert_eq!(
            player.speak("hello", off, DELAY, &mut renderer, &scheduler),
            Err(LifecycleError::FeatureDisabled)
        );
        assert_eq!(
            player.speak("  ", FeatureFlags::default(), DELAY, &mut renderer, &scheduler),
            Err(LifecycleError::NoSelection)
        );

        player.set_supported(false);
        assert_eq!(
            player.speak("hello", FeatureFlags::default(), DELAY, &mut renderer, &scheduler),
            Err(LifecycleError::PlatformUnsupported)
        );
        assert_eq!(
            renderer.commands().last(),
            Some(&UiCommand::Notice {
                message: UNSUPPORTED_NOTICE.into()
            })
        );
        assert!(!player.is_speaking());
    }
}
