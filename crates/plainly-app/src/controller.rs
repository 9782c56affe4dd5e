use std::sync::Arc;

use kanal::{AsyncReceiver, AsyncSender};
use plainly_types::{PageEvent, UiCommand};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

use crate::events::event_loop;
use crate::io::watcher_io;
use crate::state::AppState;

/// Centralized channel management
pub struct ChannelSet {
    pub page_to_app: (AsyncSender<PageEvent>, AsyncReceiver<PageEvent>),
    pub app_to_page: (AsyncSender<UiCommand>, AsyncReceiver<UiCommand>),
}

impl ChannelSet {
    pub fn new() -> Self {
        Self {
            page_to_app: kanal::bounded_async(64),  // pointer/selection bursts
            app_to_page: kanal::unbounded_async(),  // render commands, never dropped
        }
    }
}

impl Default for ChannelSet {
    fn default() -> Self {
        Self::new()
    }
}

/// Application controller for task spawning and lifecycle
pub struct AppController {
    channels: ChannelSet,
    state: Arc<AppState>,
    cancel_token: CancellationToken,
}

impl AppController {
    pub fn new(state: Arc<AppState>) -> Self {
        Self {
            channels: ChannelSet::new(),
            state,
            cancel_token: CancellationToken::new(),
        }
    }

    pub fn spawn_tasks(&self) -> JoinSet<anyhow::Result<()>> {
        let mut tasks = JoinSet::new();

        // Session loop
        tasks.spawn(event_loop(
            self.state.clone(),
            self.channels.page_to_app.1.clone(),
            self.channels.app_to_page.0.clone(),
            self.cancel_token.child_token(),
        ));

        // Transport
        tasks.spawn(watcher_io(
            self.state.clone(),
            self.channels.page_to_app.0.clone(),
            self.channels.app_to_page.1.clone(),
            self.cancel_token.child_token(),
        ));

        // Flags changed by other processes
        match self.state.flags.watch_file() {
            Ok(watcher) => {
                tasks.spawn(watcher.run(self.cancel_token.child_token()));
            }
            Err(e) => tracing::warn!("[FLAGS] Not following external changes: {:#}", e),
        }

        tasks
    }

    pub fn shutdown(&self) {
        self.cancel_token.cancel();
    }
}
