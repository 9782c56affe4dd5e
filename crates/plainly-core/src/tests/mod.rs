//! Fakes and a session harness shared by the unit tests


use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use kanal::AsyncReceiver;
use plainly_client::{
    FeedbackError, FeedbackRecord, FeedbackSink, ProviderMetadata, Simplifier, SimplifyError,
};
use plainly_config::Config;
use plainly_types::{
    AppEvent, FeatureFlags, NodeId, PageEvent, Point, Rect, SelectionState, Simplification,
    SimplifyOutcome, UiCommand,
};
use tokio::time::timeout;

use crate::effects::{ClipboardWriter, Renderer, Scheduler};
use crate::error::ClipboardError;
use crate::session::{Session, SessionContext};

pub fn success(original: &str, simplified: &str, original_score: f64, simplified_score: f64) -> SimplifyOutcome {
    SimplifyOutcome::Success(Simplification {
        original_text: original.to_string(),
        reformulated_text: simplified.to_string(),
        original_score: Some(original_score),
        simplified_score: Some(simplified_score),
    })
}

#[derive(Clone, Default)]
pub struct RecordingRenderer {
    commands: Arc<Mutex<Vec<UiCommand>>>,
}

impl RecordingRenderer {
    pub fn commands(&self) -> Vec<UiCommand> {
        self.commands.lock().unwrap().clone()
    }

    pub fn clear(&self) {
        self.commands.lock().unwrap().clear();
    }
}

impl Renderer for RecordingRenderer {
    fn render(&mut self, command: UiCommand) {
        self.commands.lock().unwrap().push(command);
    }
}

#[derive(Clone, Default)]
pub struct MemoryClipboard {
    contents: Arc<Mutex<Option<String>>>,
}

impl MemoryClipboard {
    pub fn contents(&self) -> Option<String> {
        self.contents.lock().unwrap().clone()
    }
}

impl ClipboardWriter for MemoryClipboard {
    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        *self.contents.lock().unwrap() = Some(text.to_string());
        Ok(())
    }
}

#[derive(Clone, Default)]
pub struct RecordingFeedback {
    records: Arc<Mutex<Vec<FeedbackRecord>>>,
}

impl RecordingFeedback {
    pub fn records(&self) -> Vec<FeedbackRecord> {
        self.records.lock().unwrap().clone()
    }
}

#[async_trait]
impl FeedbackSink for RecordingFeedback {
    async fn submit(&self, record: FeedbackRecord) -> Result<(), FeedbackError> {
        self.records.lock().unwrap().push(record);
        Ok(())
    }
}

#[derive(Clone)]
enum Reply {
    Success(Simplification),
    Network,
    Api(String),
}

/// Scripted simplifier keyed by request text
#[derive(Default)]
pub struct FakeSimplifier {
    replies: Mutex<HashMap<String, (Reply, Duration)>>,
    requests: Mutex<Vec<String>>,
    calls: AtomicUsize,
}

impl FakeSimplifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn succeed(&self, text: &str, simplified: &str, original_score: f64, simplified_score: f64) {
        self.succeed_after(text, simplified, original_score, simplified_score, Duration::ZERO);
    }

    pub fn succeed_after(
        &self,
        text: &str,
        simplified: &str,
        original_score: f64,
        simplified_score: f64,
        delay: Duration,
    ) {
        let reply = Reply::Success(Simplification {
            original_text: text.to_string(),
            reformulated_text: simplified.to_string(),
            original_score: Some(original_score),
            simplified_score: Some(simplified_score),
        });
        self.replies.lock().unwrap().insert(text.to_string(), (reply, delay));
    }

    pub fn fail_network(&self, text: &str) {
        self.replies
            .lock()
            .unwrap()
            .insert(text.to_string(), (Reply::Network, Duration::ZERO));
    }

    pub fn fail_api(&self, text: &str, message: &str) {
        self.replies
            .lock()
            .unwrap()
            .insert(text.to_string(), (Reply::Api(message.to_string()), Duration::ZERO));
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

/// A genuine transport-class error without touching the network
fn transport_error() -> reqwest::Error {
    reqwest::Client::new()
        .get("not a url")
        .build()
        .expect_err("relative url must not build")
}

#[async_trait]
impl Simplifier for FakeSimplifier {
    async fn simplify(&self, text: &str) -> Result<Simplification, SimplifyError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(text.to_string());

        let scripted = self.replies.lock().unwrap().get(text).cloned();
        let (reply, delay) =
            scripted.unwrap_or_else(|| (Reply::Api("no reply scripted".into()), Duration::ZERO));
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        match reply {
            Reply::Success(s) => Ok(s),
            Reply::Network => Err(SimplifyError::NetworkError(transport_error())),
            Reply::Api(message) => Err(SimplifyError::ApiError {
                status: 422,
                message,
            }),
        }
    }

    fn metadata(&self) -> ProviderMetadata {
        ProviderMetadata {
            name: "fake".into(),
            endpoint: "memory".into(),
        }
    }
}

pub fn selection(text: &str) -> SelectionState {
    SelectionState {
        text: text.to_string(),
        start_rect: Rect {
            left: 100.0,
            top: 200.0,
            right: 100.0,
            bottom: 220.0,
        },
        full_rect: Rect {
            left: 100.0,
            top: 200.0,
            right: 500.0,
            bottom: 240.0,
        },
        scroll: Point::default(),
    }
}

/// Session wired to fakes, with the loop driven by hand
pub struct Harness {
    pub session: Session,
    pub renderer: RecordingRenderer,
    pub simplifier: Arc<FakeSimplifier>,
    pub feedback: RecordingFeedback,
    pub clipboard: MemoryClipboard,
    rx: AsyncReceiver<AppEvent>,
}

impl Harness {
    pub fn new(flags: FeatureFlags) -> Self {
        let mut config = Config::default();
        config.timing.settle_delay_ms = 1;
        config.timing.speech_restart_delay_ms = 5;
        config.timing.copy_feedback_ms = 20;

        let (tx, rx) = kanal::unbounded_async();
        let renderer = RecordingRenderer::default();
        let simplifier = Arc::new(FakeSimplifier::new());
        let feedback = RecordingFeedback::default();
        let clipboard = MemoryClipboard::default();

        let ctx = SessionContext {
            simplifier: simplifier.clone(),
            feedback: Arc::new(feedback.clone()),
            clipboard: Box::new(clipboard.clone()),
            renderer: Box::new(renderer.clone()),
            scheduler: Scheduler::new(tx),
        };

        Self {
            session: Session::new(config, flags, ctx),
            renderer,
            simplifier,
            feedback,
            clipboard,
            rx,
        }
    }

    pub fn page(&mut self, event: PageEvent) {
        self.session.handle(AppEvent::Page(event));
    }

    pub async fn next_event(&mut self) -> AppEvent {
        timeout(Duration::from_secs(2), self.rx.recv())
            .await
            .expect("timed out waiting for a session event")
            .expect("scheduler channel closed")
    }

    /// Handle events until one matching `done` has been handled
    pub async fn pump_until(&mut self, done: impl Fn(&AppEvent) -> bool) {
        loop {
            let event = self.next_event().await;
            let finished = done(&event);
            self.session.handle(event);
            if finished {
                break;
            }
        }
    }

    /// Report a selection and release the pointer, then wait for the settle tick
    pub async fn select(&mut self, text: &str) {
        self.page(PageEvent::SelectionChanged {
            selection: Some(selection(text)),
        });
        self.page(PageEvent::PointerUp { target: None });
        self.pump_until(|e| matches!(e, AppEvent::SelectionSettled)).await;
    }

    pub async fn settle_preload(&mut self, generation: u64) {
        self.pump_until(|e| matches!(e, AppEvent::PreloadSettled { generation: g, .. } if *g == generation))
            .await;
    }

    pub fn surface_node(&self) -> NodeId {
        self.session.action_surface().expect("action surface shown").node
    }

    pub fn popup_node(&self) -> NodeId {
        self.session.popup().expect("popup shown").node
    }
}
