use std::sync::Arc;

use plainly_client::{FeedbackSink, Simplifier};
use plainly_config::Config;
use plainly_types::{
    AppEvent, Control, FeatureFlags, NodeId, PageCommand, PageEvent, Rating, SimplifyOutcome,
    UiCommand,
};

use crate::action::ActionSurface;
use crate::effects::{ClipboardWriter, Renderer, Scheduler};
use crate::error::{LifecycleError, command_status};
use crate::preload::{self, PendingResult};
use crate::presenter::ResultPopup;
use crate::selection::{SelectionChange, SelectionSnapshot, SelectionWatcher};
use crate::speech::SpeechPlayer;

/// Collaborators the session talks to
pub struct SessionContext {
    pub simplifier: Arc<dyn Simplifier>,
    pub feedback: Arc<dyn FeedbackSink>,
    pub clipboard: Box<dyn ClipboardWriter>,
    pub renderer: Box<dyn Renderer>,
    pub scheduler: Scheduler,
}

/// All lifecycle state of one page: at most one snapshot, one pending
/// request, one action surface and one result popup.
pub struct Session {
    config: Config,
    flags: FeatureFlags,
    ctx: SessionContext,
    watcher: SelectionWatcher,
    pending: Option<PendingResult>,
    action: Option<ActionSurface>,
    popup: Option<ResultPopup>,
    speech: SpeechPlayer,
    last_node: u64,
}

impl Session {
    pub fn new(config: Config, flags: FeatureFlags, ctx: SessionContext) -> Self {
        Self {
            config,
            flags,
            ctx,
            watcher: SelectionWatcher::new(),
            pending: None,
            action: None,
            popup: None,
            speech: SpeechPlayer::new(),
            last_node: 0,
        }
    }

    pub fn flags(&self) -> FeatureFlags {
        self.flags
    }

    pub fn snapshot(&self) -> Option<&SelectionSnapshot> {
        self.watcher.current()
    }

    pub fn pending(&self) -> Option<&PendingResult> {
        self.pending.as_ref()
    }

    pub fn action_surface(&self) -> Option<&ActionSurface> {
        self.action.as_ref()
    }

    pub fn popup(&self) -> Option<&ResultPopup> {
        self.popup.as_ref()
    }

    pub fn is_speaking(&self) -> bool {
        self.speech.is_speaking()
    }

    pub fn handle(&mut self, event: AppEvent) {
        match event {
            AppEvent::Page(event) => self.handle_page(event),
            AppEvent::FlagsChanged(flags) => {
                tracing::info!(
                    "[SESSION] Flags changed: simplify={} tts={}",
                    flags.simplify_enabled,
                    flags.tts_enabled
                );
                self.flags = flags;
            }
            AppEvent::SelectionSettled => self.on_selection_settled(),
            AppEvent::PreloadSettled {
                generation,
                outcome,
            } => self.on_preload_settled(generation, outcome),
            AppEvent::SpeechRestart { utterance } => {
                self.speech.on_restart(utterance, self.ctx.renderer.as_mut())
            }
            AppEvent::CopyReverted { node } => {
                if self.popup.as_ref().is_some_and(|p| p.node == node) {
                    self.ctx
                        .renderer
                        .render(UiCommand::SetCopyState { node, copied: false });
                }
            }
        }
    }

    /// Remove every transient UI piece and forget the selection
    pub fn reset(&mut self) {
        self.remove_popup();
        self.remove_action_surface();
        self.speech.cancel(self.ctx.renderer.as_mut());
        self.watcher.clear();
        self.pending = None;
    }

    fn handle_page(&mut self, event: PageEvent) {
        match event {
            PageEvent::Hello { speech_supported } => {
                tracing::info!("[SESSION] Page attached (speech supported: {})", speech_supported);
                self.speech.set_supported(speech_supported);
            }
            PageEvent::SelectionChanged { selection } => self.watcher.record(selection),
            PageEvent::PointerUp { target } => {
                if self.owns(target) {
                    return;
                }
                self.ctx
                    .scheduler
                    .after(self.config.timing.settle_delay(), AppEvent::SelectionSettled);
            }
            PageEvent::PointerDown { target } => self.on_pointer_down(target),
            PageEvent::ControlClicked { node, control } => self.on_control(node, control),
            PageEvent::Command {
                request_id,
                command,
            } => {
                let result = match command {
                    PageCommand::SimplifyText => self.simplify_selection(),
                    PageCommand::ReadAloud => self.read_selection(),
                };
                let status = command_status(result);
                tracing::info!("[SESSION] Command {:?}: {}", command, status);
                self.ctx
                    .renderer
                    .render(UiCommand::CommandStatus { request_id, status });
            }
            PageEvent::FlagsChanged { flags } => self.handle(AppEvent::FlagsChanged(flags)),
            PageEvent::SpeechEnded { utterance } => self.speech.on_finished(utterance),
            PageEvent::SpeechFailed { utterance, error } => {
                tracing::error!("[SPEECH] Utterance #{} failed: {}", utterance, error);
                self.speech.on_finished(utterance);
            }
        }
    }

    fn owns(&self, target: Option<NodeId>) -> bool {
        let Some(target) = target else {
            return false;
        };
        self.action.as_ref().is_some_and(|a| a.node == target)
            || self.popup.as_ref().is_some_and(|p| p.node == target)
    }

    fn on_selection_settled(&mut self) {
        match self.watcher.settle(&self.config.ui) {
            SelectionChange::New(snapshot) => {
                tracing::info!(
                    "[SESSION] Selected #{}: {}",
                    snapshot.generation,
                    snapshot.text.chars().take(50).collect::<String>()
                );
                self.speech.cancel(self.ctx.renderer.as_mut());
                self.pending = Some(preload::start(
                    self.ctx.simplifier.clone(),
                    &self.ctx.scheduler,
                    snapshot.generation,
                    &snapshot.text,
                    self.flags,
                ));
                self.show_action_surface(&snapshot);
            }
            SelectionChange::Cleared => {
                tracing::info!("[SESSION] Selection cleared");
                self.reset();
            }
            SelectionChange::Unchanged => {}
        }
    }

    fn on_pointer_down(&mut self, target: Option<NodeId>) {
        if self.action.is_none() && self.popup.is_none() {
            return;
        }
        if self.owns(target) {
            return;
        }
        tracing::debug!("[SESSION] Clicked outside UI elements, cleaning up");
        self.reset();
    }

    fn on_preload_settled(&mut self, generation: u64, outcome: SimplifyOutcome) {
        let Some(pending) = self
            .pending
            .as_mut()
            .filter(|p| p.generation == generation && !p.is_settled())
        else {
            tracing::debug!("[SESSION] Discarding stale result #{}", generation);
            return;
        };
        pending.outcome = Some(outcome.clone());
        let text = pending.text.clone();

        if let Some(popup) = self.popup.as_mut()
            && popup.generation == generation
            && popup.is_loading()
        {
            popup.present(&outcome, &text, self.ctx.renderer.as_mut());
        }
    }

    fn on_control(&mut self, node: NodeId, control: Control) {
        if self.action.as_ref().is_some_and(|a| a.node == node) {
            match control {
                Control::Simplify => self.on_simplify_clicked(),
                Control::ReadAloud => {
                    let text = self.action.as_ref().map(|a| a.text.clone()).unwrap_or_default();
                    if let Err(e) = self.speak(&text) {
                        // the player already rendered the notice
                        tracing::debug!("[SESSION] Read aloud not started: {}", e);
                    }
                }
                other => tracing::debug!("[SESSION] {:?} is not an action surface control", other),
            }
            return;
        }

        if self.popup.as_ref().is_some_and(|p| p.node == node) {
            match control {
                Control::Close => self.remove_popup(),
                Control::Copy => self.copy_result(),
                Control::Rate(rating) => self.rate_result(rating),
                other => tracing::debug!("[SESSION] {:?} is not a popup control", other),
            }
            return;
        }

        tracing::debug!("[SESSION] Click on stale node {:?} ignored", node);
    }

    fn on_simplify_clicked(&mut self) {
        let Some(snapshot) = self.watcher.current().cloned() else {
            return;
        };
        tracing::debug!("[SESSION] Simplify clicked for #{}", snapshot.generation);
        self.show_result_popup(&snapshot);
        self.remove_action_surface();
    }

    /// Inbound "simplify current selection" command
    pub fn simplify_selection(&mut self) -> Result<(), LifecycleError> {
        if !self.flags.simplify_enabled {
            return Err(LifecycleError::FeatureDisabled);
        }
        let (snapshot, created) = self
            .watcher
            .capture(&self.config.ui)
            .ok_or(LifecycleError::NoSelection)?;

        if created {
            self.speech.cancel(self.ctx.renderer.as_mut());
            self.pending = None;
        }
        self.show_result_popup(&snapshot);
        self.remove_action_surface();
        Ok(())
    }

    /// Inbound "read current selection aloud" command
    pub fn read_selection(&mut self) -> Result<(), LifecycleError> {
        if !self.flags.tts_enabled {
            return Err(LifecycleError::FeatureDisabled);
        }
        let text = self.watcher.selected_text();
        if text.is_empty() {
            return Err(LifecycleError::NoSelection);
        }
        self.speak(&text)
    }

    fn speak(&mut self, text: &str) -> Result<(), LifecycleError> {
        self.speech.speak(
            text,
            self.flags,
            self.config.timing.speech_restart_delay(),
            self.ctx.renderer.as_mut(),
            &self.ctx.scheduler,
        )
    }

    fn show_action_surface(&mut self, snapshot: &SelectionSnapshot) {
        self.remove_popup();
        self.remove_action_surface();

        let node = self.next_node();
        self.action = ActionSurface::show(node, snapshot, self.flags, self.ctx.renderer.as_mut());
    }

    /// Bind the snapshot's request to a fresh popup, starting one if needed
    fn show_result_popup(&mut self, snapshot: &SelectionSnapshot) {
        let reusable = self
            .pending
            .as_ref()
            .is_some_and(|p| p.generation == snapshot.generation && p.serves(&snapshot.text, self.flags));
        if !reusable {
            self.pending = Some(preload::start(
                self.ctx.simplifier.clone(),
                &self.ctx.scheduler,
                snapshot.generation,
                &snapshot.text,
                self.flags,
            ));
        }

        self.remove_popup();
        let node = self.next_node();
        let mut popup = ResultPopup::open(
            node,
            snapshot.generation,
            snapshot.center_x,
            snapshot.bottom_y,
            &self.config.ui,
            self.ctx.renderer.as_mut(),
        );

        if let Some(outcome) = self.pending.as_ref().and_then(|p| p.outcome.as_ref()) {
            popup.present(outcome, &snapshot.text, self.ctx.renderer.as_mut());
        }
        self.popup = Some(popup);
    }

    fn copy_result(&mut self) {
        let Some(popup) = self.popup.as_ref() else {
            return;
        };
        if popup.copy(self.ctx.clipboard.as_mut(), self.ctx.renderer.as_mut()) {
            self.ctx.scheduler.after(
                self.config.timing.copy_feedback(),
                AppEvent::CopyReverted { node: popup.node },
            );
        }
    }

    fn rate_result(&mut self, rating: Rating) {
        let Some(record) = self
            .popup
            .as_mut()
            .and_then(|p| p.rate(rating, self.ctx.renderer.as_mut()))
        else {
            return;
        };

        let sink = self.ctx.feedback.clone();
        tokio::spawn(async move {
            if let Err(e) = sink.submit(record).await {
                tracing::warn!("[FEEDBACK] Submission failed: {}", e);
            }
        });
    }

    fn remove_popup(&mut self) {
        if let Some(popup) = self.popup.take() {
            popup.remove(self.ctx.renderer.as_mut());
            self.speech.cancel(self.ctx.renderer.as_mut());
        }
    }

    fn remove_action_surface(&mut self) {
        if let Some(action) = self.action.take() {
            action.remove(self.ctx.renderer.as_mut());
            self.speech.cancel(self.ctx.renderer.as_mut());
        }
    }

    fn next_node(&mut self) -> NodeId {
        self.last_node += 1;
        NodeId(self.last_node)
    }
}
