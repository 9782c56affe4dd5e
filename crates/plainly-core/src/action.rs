use plainly_types::{FeatureFlags, NodeId, UiCommand};

use crate::effects::Renderer;
use crate::selection::SelectionSnapshot;

/// Floating simplify / read-aloud cluster above the selection
#[derive(Debug, Clone, PartialEq)]
pub struct ActionSurface {
    pub node: NodeId,
    pub generation: u64,
    pub text: String,
    pub simplify: bool,
    pub read_aloud: bool,
}

impl ActionSurface {
    /// Render the controls allowed by `flags`. Callers tear down previous UI first.
    pub fn show(
        node: NodeId,
        snapshot: &SelectionSnapshot,
        flags: FeatureFlags,
        renderer: &mut dyn Renderer,
    ) -> Option<Self> {
        if snapshot.text.is_empty() {
            tracing::warn!("[SURFACE] No selected text provided");
            return None;
        }
        if !flags.any_enabled() {
            tracing::debug!("[SURFACE] Both features disabled, nothing to show");
            return None;
        }

        renderer.render(UiCommand::ShowActionSurface {
            node,
            at: snapshot.anchor,
            simplify: flags.simplify_enabled,
            read_aloud: flags.tts_enabled,
        });

        Some(Self {
            node,
            generation: snapshot.generation,
            text: snapshot.text.clone(),
            simplify: flags.simplify_enabled,
            read_aloud: flags.tts_enabled,
        })
    }

    pub fn remove(self, renderer: &mut dyn Renderer) {
        renderer.render(UiCommand::Remove { node: self.node });
    }
}
