//! Messages exchanged with the page shim.
//!
//! Every message is a JSON object tagged by `type`. The shim reports DOM facts
//! (`PageEvent`) and renders whatever the host asks for (`UiCommand`).

use serde::{Deserialize, Serialize};

use crate::types::{FeatureFlags, Point, Rect};

/// Identity of a host-owned node rendered by the shim
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub u64);

/// Current page selection, captured by the shim on `selectionchange`
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SelectionState {
    pub text: String,
    /// Rect of the collapsed range at the selection start
    pub start_rect: Rect,
    /// Bounding rect of the whole range
    pub full_rect: Rect,
    /// `window.scrollX` / `window.scrollY`
    #[serde(default)]
    pub scroll: Point,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rating {
    Like,
    Dislike,
}

impl Rating {
    pub fn as_str(&self) -> &'static str {
        match self {
            Rating::Like => "like",
            Rating::Dislike => "dislike",
        }
    }
}

/// Clickable controls inside host-owned nodes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Control {
    Simplify,
    ReadAloud,
    Close,
    Copy,
    Rate(Rating),
}

/// Shortcut commands dispatched by the browser
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PageCommand {
    SimplifyText,
    ReadAloud,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PageEvent {
    Hello {
        #[serde(default = "default_true")]
        speech_supported: bool,
    },
    SelectionChanged {
        selection: Option<SelectionState>,
    },
    /// `target` is the host node containing the event target, if any
    PointerUp {
        #[serde(default)]
        target: Option<NodeId>,
    },
    PointerDown {
        #[serde(default)]
        target: Option<NodeId>,
    },
    ControlClicked {
        node: NodeId,
        control: Control,
    },
    Command {
        request_id: String,
        command: PageCommand,
    },
    FlagsChanged {
        flags: FeatureFlags,
    },
    SpeechEnded {
        utterance: u64,
    },
    SpeechFailed {
        utterance: u64,
        error: String,
    },
}

/// Visual treatment of an inline popup message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tone {
    /// Amber: expected failure or feature switched off
    Warning,
    /// Red: transport or format failure
    Error,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PopupBody {
    Loading,
    Text { text: String },
    Message { text: String, tone: Tone },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum UiCommand {
    ShowActionSurface {
        node: NodeId,
        at: Point,
        simplify: bool,
        read_aloud: bool,
    },
    ShowPopup {
        node: NodeId,
        left: f64,
        top: f64,
        width: f64,
    },
    SetPopupBody {
        node: NodeId,
        body: PopupBody,
    },
    SetTooltip {
        node: NodeId,
        text: String,
    },
    SetCopyState {
        node: NodeId,
        copied: bool,
    },
    ShowFeedback {
        node: NodeId,
        prompt: String,
    },
    FeedbackRecorded {
        node: NodeId,
        rating: Rating,
        message: String,
    },
    Remove {
        node: NodeId,
    },
    Speak {
        utterance: u64,
        text: String,
    },
    CancelSpeech,
    Notice {
        message: String,
    },
    CommandStatus {
        request_id: String,
        status: String,
    },
}
