pub mod clipboard;
pub mod framing;
pub mod stdio;
pub mod ws;

pub use clipboard::SystemClipboard;
pub use framing::{FrameError, MAX_INBOUND_FRAME, MAX_OUTBOUND_FRAME};
