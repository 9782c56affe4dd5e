//! Length-prefixed JSON frames as spoken by browser native messaging.
//!
//! Each message is a `u32` byte count in native byte order followed by that
//! many bytes of UTF-8 JSON.

use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

/// Largest message the browser may send to the host
pub const MAX_INBOUND_FRAME: usize = 64 * 1024 * 1024;
/// Largest message the host may send to the browser
pub const MAX_OUTBOUND_FRAME: usize = 1024 * 1024;

#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Frame of {len} bytes exceeds the {limit} byte limit")]
    TooLarge { len: usize, limit: usize },

    #[error("Invalid JSON payload: {0}")]
    Json(#[from] serde_json::Error),
}

/// Read one message. `Ok(None)` means the peer closed the stream between frames.
pub async fn read_frame<R, T>(reader: &mut R) -> Result<Option<T>, FrameError>
where
    R: AsyncRead + Unpin,
    T: DeserializeOwned,
{
    let mut header = [0u8; 4];
    match reader.read_exact(&mut header).await {
        Ok(_) => {}
        Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => return Ok(None),
        Err(e) => return Err(e.into()),
    }

    let len = u32::from_ne_bytes(header) as usize;
    if len > MAX_INBOUND_FRAME {
        return Err(FrameError::TooLarge {
            len,
            limit: MAX_INBOUND_FRAME,
        });
    }

    let mut body = vec![0u8; len];
    reader.read_exact(&mut body).await?;
    Ok(Some(serde_json::from_slice(&body)?))
}

/// Serialize and write one message, flushing so the peer sees it immediately
pub async fn write_frame<W, T>(writer: &mut W, message: &T) -> Result<(), FrameError>
where
    W: AsyncWrite + Unpin,
    T: Serialize,
{
    let body = serde_json::to_vec(message)?;
    if body.len() > MAX_OUTBOUND_FRAME {
        return Err(FrameError::TooLarge {
            len: body.len(),
            limit: MAX_OUTBOUND_FRAME,
        });
    }

    writer.write_all(&(body.len() as u32).to_ne_bytes()).await?;
    writer.write_all(&body).await?;
    writer.flush().await?;
    Ok(())
}
