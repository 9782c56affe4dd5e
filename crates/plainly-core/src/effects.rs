use std::future::Future;
use std::time::Duration;

use kanal::AsyncSender;
use plainly_types::{AppEvent, UiCommand};

use crate::error::ClipboardError;

/// Sink for render commands addressed to the page shim
pub trait Renderer: Send {
    fn render(&mut self, command: UiCommand);
}

/// Destination of the popup's copy button
pub trait ClipboardWriter: Send {
    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError>;
}

/// Posts deferred work back into the session loop.
///
/// Every suspension point of the lifecycle (settle delay, HTTP call, speech
/// restart, copy feedback) runs as a detached task that ends by sending one
/// `AppEvent`. The session itself never awaits.
#[derive(Clone)]
pub struct Scheduler {
    tx: AsyncSender<AppEvent>,
}

impl Scheduler {
    pub fn new(tx: AsyncSender<AppEvent>) -> Self {
        Self { tx }
    }

    /// Deliver `event` after `delay`
    pub fn after(&self, delay: Duration, event: AppEvent) {
        self.spawn(async move {
            tokio::time::sleep(delay).await;
            event
        });
    }

    /// Run `work` in the background and deliver the event it produces
    pub fn spawn<F>(&self, work: F)
    where
        F: Future<Output = AppEvent> + Send + 'static,
    {
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let event = work.await;
            if let Err(e) = tx.send(event).await {
                tracing::debug!("[SCHEDULER] Session loop gone, dropping event: {}", e);
            }
        });
    }
}
