use arboard::Clipboard;
use plainly_core::{ClipboardError, ClipboardWriter};

/// System clipboard, opened on first use
#[derive(Default)]
pub struct SystemClipboard {
    inner: Option<Clipboard>,
}

impl SystemClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    fn handle(&mut self) -> Result<&mut Clipboard, ClipboardError> {
        if self.inner.is_none() {
            let clipboard =
                Clipboard::new().map_err(|e| ClipboardError::Unavailable(e.to_string()))?;
            self.inner = Some(clipboard);
        }
        self.inner
            .as_mut()
            .ok_or_else(|| ClipboardError::Unavailable("clipboard not initialized".into()))
    }
}

impl ClipboardWriter for SystemClipboard {
    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        let result = self.handle()?.set_text(text.to_string());
        if let Err(e) = result {
            // a broken handle is reopened next time
            self.inner = None;
            return Err(ClipboardError::WriteFailed(e.to_string()));
        }
        Ok(())
    }
}
