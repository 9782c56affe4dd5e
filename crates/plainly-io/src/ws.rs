use futures_util::{SinkExt, StreamExt};
use kanal::{AsyncReceiver, AsyncSender};
use plainly_types::{PageEvent, UiCommand};
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;
use tokio_util::sync::CancellationToken;

/// Talk to a page bridge over a websocket using JSON text frames
pub async fn start_ws_session(
    url: &str,
    page_tx: AsyncSender<PageEvent>,
    ui_rx: AsyncReceiver<UiCommand>,
    cancel: CancellationToken,
) -> Result<(), anyhow::Error> {
    let (ws_stream, _) = connect_async(url).await?;
    let (mut write, mut read) = ws_stream.split();
    tracing::info!("[WS] Connected to {}", url);

    let inbound = async {
        while let Some(msg) = read.next().await {
            let msg = msg?;
            if msg.is_close() {
                break;
            }
            if !msg.is_text() {
                continue;
            }
            match serde_json::from_str::<PageEvent>(msg.to_text()?) {
                Ok(event) => page_tx.send(event).await?,
                Err(e) => tracing::warn!("[WS] Dropping malformed message: {}", e),
            }
        }
        tracing::info!("[WS] Page bridge closed the connection");
        Ok::<_, anyhow::Error>(())
    };

    let outbound = async {
        while let Ok(command) = ui_rx.recv().await {
            let text = serde_json::to_string(&command)?;
            write.send(Message::text(text)).await?;
        }
        Ok::<_, anyhow::Error>(())
    };

    tokio::select! {
        _ = cancel.cancelled() => {
            tracing::info!("[WS] Stopping");
            Ok(())
        }
        result = inbound => result,
        result = outbound => result,
    }
}
