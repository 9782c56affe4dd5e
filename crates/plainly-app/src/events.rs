use std::sync::Arc;

use kanal::{AsyncReceiver, AsyncSender};
use plainly_client::{FeedbackSink, HttpFeedbackSink, HttpSimplifier, LogFeedbackSink, Simplifier};
use plainly_core::{Scheduler, Session, SessionContext};
use plainly_io::SystemClipboard;
use plainly_types::{AppEvent, PageEvent, UiCommand};
use tokio_util::sync::CancellationToken;
use tracing::Instrument;
use uuid::Uuid;

use crate::flags::FlagStore;
use crate::renderer::ChannelRenderer;
use crate::state::AppState;

/// App's main loop: builds the session and feeds it every event
pub async fn event_loop(
    state: Arc<AppState>,
    page_rx: AsyncReceiver<PageEvent>,
    ui_tx: AsyncSender<UiCommand>,
    cancel: CancellationToken,
) -> anyhow::Result<()> {
    let config = state.config.read().await.clone();

    let simplifier = HttpSimplifier::new(
        config.network.simplify_url(),
        config.network.request_timeout(),
    )?;
    let provider = simplifier.metadata();
    tracing::info!("[EVENT_LOOP] Using {} at {}", provider.name, provider.endpoint);

    let feedback: Arc<dyn FeedbackSink> = if config.feedback.enabled {
        Arc::new(HttpFeedbackSink::new(config.network.feedback_url()))
    } else {
        Arc::new(LogFeedbackSink)
    };

    let (event_tx, event_rx) = kanal::unbounded_async();
    let ctx = SessionContext {
        simplifier: Arc::new(simplifier),
        feedback,
        clipboard: Box::new(SystemClipboard::new()),
        renderer: Box::new(ChannelRenderer::new(ui_tx)),
        scheduler: Scheduler::new(event_tx),
    };
    let session = Session::new(config, state.flags.get(), ctx);

    let span = tracing::info_span!("session", id = %Uuid::new_v4());
    run_session(session, &state.flags, page_rx, event_rx, cancel)
        .instrument(span)
        .await
}

/// Drive `session` until cancelled. Page flag changes go through the store,
/// which then notifies the session like any other flag change.
pub async fn run_session(
    mut session: Session,
    flags: &FlagStore,
    page_rx: AsyncReceiver<PageEvent>,
    event_rx: AsyncReceiver<AppEvent>,
    cancel: CancellationToken,
) -> anyhow::Result<()> {
    let mut flags_rx = flags.subscribe();
    // the store may have moved on since the session was built
    let current = *flags_rx.borrow_and_update();
    if current != session.flags() {
        session.handle(AppEvent::FlagsChanged(current));
    }

    tracing::info!("[EVENT_LOOP] Starting main loop, waiting for events");
    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("[EVENT_LOOP] Shutting down");
                session.reset();
                break;
            }
            event = page_rx.recv() => match event? {
                PageEvent::FlagsChanged { flags: changed } => {
                    if let Err(e) = flags.set(changed) {
                        tracing::error!("[EVENT_LOOP] Failed to persist flags: {}", e);
                        session.handle(AppEvent::FlagsChanged(changed));
                    }
                }
                event => session.handle(AppEvent::Page(event)),
            },
            event = event_rx.recv() => session.handle(event?),
            changed = flags_rx.changed() => {
                changed?;
                let current = *flags_rx.borrow_and_update();
                session.handle(AppEvent::FlagsChanged(current));
            }
        }
    }

    Ok(())
}
