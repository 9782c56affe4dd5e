use kanal::AsyncSender;
use plainly_core::Renderer;
use plainly_types::UiCommand;

/// Forwards session output to the transport without blocking the session.
/// Expects an unbounded channel so no command is ever lost.
pub struct ChannelRenderer {
    tx: AsyncSender<UiCommand>,
}

impl ChannelRenderer {
    pub fn new(tx: AsyncSender<UiCommand>) -> Self {
        Self { tx }
    }
}

impl Renderer for ChannelRenderer {
    fn render(&mut self, command: UiCommand) {
        match self.tx.try_send(command) {
            Ok(true) => {}
            Ok(false) => tracing::error!("[UI] Outbound queue full, command lost"),
            Err(e) => tracing::debug!("[UI] Transport gone: {}", e),
        }
    }
}
