use std::sync::Arc;

use kanal::{AsyncReceiver, AsyncSender};
use plainly_types::{PageEvent, UiCommand};
use tokio_util::sync::CancellationToken;

use crate::state::AppState;

/// Connect the session channels to the page, over websocket or stdio
pub async fn watcher_io(
    state: Arc<AppState>,
    page_tx: AsyncSender<PageEvent>,
    ui_rx: AsyncReceiver<UiCommand>,
    cancel: CancellationToken,
) -> anyhow::Result<()> {
    // Check config
    let (listen_to_ws, ws_url) = {
        let config = state.config.read().await;
        (config.transport.listen_to_ws, config.transport.ws_url.clone())
    };

    if listen_to_ws {
        tracing::info!("Starting WebSocket session with {}", ws_url);
        plainly_io::ws::start_ws_session(&ws_url, page_tx, ui_rx, cancel).await
    } else {
        plainly_io::stdio::run_stdio(page_tx, ui_rx, cancel).await
    }
}
