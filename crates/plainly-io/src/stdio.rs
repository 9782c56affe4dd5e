use kanal::{AsyncReceiver, AsyncSender};
use plainly_types::{PageEvent, UiCommand};
use tokio::io::{AsyncRead, AsyncWrite};
use tokio_util::sync::CancellationToken;

use crate::framing::{FrameError, read_frame, write_frame};

/// Native messaging host over the process's stdin/stdout
pub async fn run_stdio(
    page_tx: AsyncSender<PageEvent>,
    ui_rx: AsyncReceiver<UiCommand>,
    cancel: CancellationToken,
) -> anyhow::Result<()> {
    tracing::info!("[STDIO] Serving native messaging on stdin/stdout");
    serve(tokio::io::stdin(), tokio::io::stdout(), page_tx, ui_rx, cancel).await
}

/// Pump frames in both directions until the page disconnects or `cancel` fires.
///
/// Reading and writing run as independent loops so a partially read frame is
/// never abandoned by an outbound message.
pub async fn serve<R, W>(
    mut reader: R,
    mut writer: W,
    page_tx: AsyncSender<PageEvent>,
    ui_rx: AsyncReceiver<UiCommand>,
    cancel: CancellationToken,
) -> anyhow::Result<()>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let inbound = async {
        loop {
            match read_frame::<_, PageEvent>(&mut reader).await {
                Ok(Some(event)) => page_tx.send(event).await?,
                Ok(None) => break,
                Err(FrameError::Json(e)) => {
                    tracing::warn!("[STDIO] Dropping malformed message: {}", e);
                }
                Err(e) => return Err(anyhow::Error::from(e)),
            }
        }
        tracing::info!("[STDIO] Page disconnected");
        Ok::<_, anyhow::Error>(())
    };

    let outbound = async {
        while let Ok(command) = ui_rx.recv().await {
            match write_frame(&mut writer, &command).await {
                Ok(()) => {}
                Err(FrameError::TooLarge { len, limit }) => {
                    tracing::error!("[STDIO] Dropping {} byte message (limit {})", len, limit);
                }
                Err(e) => return Err(anyhow::Error::from(e)),
            }
        }
        Ok::<_, anyhow::Error>(())
    };

    tokio::select! {
        _ = cancel.cancelled() => {
            tracing::info!("[STDIO] Stopping");
            Ok(())
        }
        result = inbound => result,
        result = outbound => result,
    }
}
