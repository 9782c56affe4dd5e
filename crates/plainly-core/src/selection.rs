use plainly_config::ui::UiConfig;
use plainly_types::{Point, SelectionState};

use crate::preprocess::{DefaultPreprocessor, Preprocessor};

/// Text and coordinates captured from one selection gesture
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionSnapshot {
    /// Identity used to tag the request started for this snapshot
    pub generation: u64,
    pub text: String,
    /// Where the action surface is placed
    pub anchor: Point,
    pub center_x: f64,
    pub bottom_y: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SelectionChange {
    New(SelectionSnapshot),
    Cleared,
    Unchanged,
}

/// Tracks the page selection and decides when it really changed
#[derive(Default)]
pub struct SelectionWatcher {
    latest: Option<SelectionState>,
    current: Option<SelectionSnapshot>,
    last_generation: u64,
}

impl SelectionWatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store the selection most recently reported by the page
    pub fn record(&mut self, selection: Option<SelectionState>) {
        self.latest = selection;
    }

    pub fn current(&self) -> Option<&SelectionSnapshot> {
        self.current.as_ref()
    }

    /// Forget the live snapshot; the page selection itself is kept
    pub fn clear(&mut self) {
        self.current = None;
    }

    /// Preprocessed text of the page selection right now
    pub fn selected_text(&self) -> String {
        self.latest
            .as_ref()
            .map(|s| DefaultPreprocessor.process(&s.text))
            .unwrap_or_default()
    }

    /// Compare the settled page selection with the live snapshot
    pub fn settle(&mut self, ui: &UiConfig) -> SelectionChange {
        let text = self.selected_text();

        if text.is_empty() {
            return match self.current.take() {
                Some(_) => SelectionChange::Cleared,
                None => SelectionChange::Unchanged,
            };
        }

        if self
            .current
            .as_ref()
            .is_some_and(|c| DefaultPreprocessor.same_text(&c.text, &text))
        {
            return SelectionChange::Unchanged;
        }

        SelectionChange::New(self.replace(text, ui))
    }

    /// Snapshot for an on-demand command, reusing the live one when the text
    /// has not changed. The flag tells whether a new snapshot was created.
    pub fn capture(&mut self, ui: &UiConfig) -> Option<(SelectionSnapshot, bool)> {
        let text = self.selected_text();
        if text.is_empty() {
            return None;
        }

        if let Some(current) = self.current.as_ref()
            && DefaultPreprocessor.same_text(&current.text, &text)
        {
            return Some((current.clone(), false));
        }

        Some((self.replace(text, ui), true))
    }

    fn replace(&mut self, text: String, ui: &UiConfig) -> SelectionSnapshot {
        let selection = self.latest.clone().unwrap_or_default();
        let start = selection.start_rect;
        let full = selection.full_rect;
        let scroll = selection.scroll;

        self.last_generation += 1;
        let snapshot = SelectionSnapshot {
            generation: self.last_generation,
            text,
            anchor: Point::new(
                scroll.x + start.left + ui.surface_offset_x,
                scroll.y + start.top + ui.surface_offset_y,
            ),
            center_x: scroll.x + (full.left + full.right) / 2.0,
            bottom_y: scroll.y + full.bottom,
        };

        self.current = Some(snapshot.clone());
        snapshot
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use plainly_types::Rect;

    fn selection(text: &str) -> SelectionState {
        SelectionState {
            text: text.to_string(),
            start_rect: Rect {
                left: 100.0,
                top: 200.0,
                right: 100.0,
                bottom: 218.0,
            },
            full_rect: Rect {
                left: 100.0,
                top: 200.0,
                right: 300.0,
                bottom: 240.0,
            },
            scroll: Point::new(0.0, 50.0),
        }
    }

    #[test]
    fn new_text_creates_snapshot_with_coordinates() {
        let ui = UiConfig::default();
        let mut watcher = SelectionWatcher::new();
        watcher.record(Some(selection("  The cat sat.  ")));

        let SelectionChange::New(snapshot) = watcher.settle(&ui) else {
            panic!("expected a new snapshot");
        };
        assert_eq!(snapshot.text, "The cat sat.");
        assert_eq!(snapshot.generation, 1);
        assert_eq!(snapshot.anchor, Point::new(98.0, 215.0));
        assert_eq!(snapshot.center_x, 200.0);
        assert_eq!(snapshot.bottom_y, 290.0);
    }

    #[test]
    fn same_text_is_unchanged() {
        let ui = UiConfig::default();
        let mut watcher = SelectionWatcher::new();
        watcher.record(Some(selection("alpha")));
        assert!(matches!(watcher.settle(&ui), SelectionChange::New(_)));

        watcher.record(Some(selection("alpha ")));
        assert_eq!(watcher.settle(&ui), SelectionChange::Unchanged);
        assert_eq!(watcher.current().map(|s| s.generation), Some(1));
    }

    #[test]
    fn decomposed_reselection_keeps_original_text() {
        let ui = UiConfig::default();
        let mut watcher = SelectionWatcher::new();
        watcher.record(Some(selection(" cafe\u{301} ")));
        let SelectionChange::New(snapshot) = watcher.settle(&ui) else {
            panic!("expected a new snapshot");
        };
        assert_eq!(snapshot.text, "cafe\u{301}");

        watcher.record(Some(selection("caf\u{e9}")));
        assert_eq!(watcher.settle(&ui), SelectionChange::Unchanged);
        assert_eq!(watcher.current().map(|s| s.text.as_str()), Some("cafe\u{301}"));
    }

    #[test]
    fn empty_selection_clears_only_once() {
        let ui = UiConfig::default();
        let mut watcher = SelectionWatcher::new();
        watcher.record(Some(selection("alpha")));
        watcher.settle(&ui);

        watcher.record(None);
        assert_eq!(watcher.settle(&ui), SelectionChange::Cleared);
        assert!(watcher.current().is_none());
        assert_eq!(watcher.settle(&ui), SelectionChange::Unchanged);
    }

    #[test]
    fn different_text_supersedes_snapshot() {
        let ui = UiConfig::default();
        let mut watcher = SelectionWatcher::new();
        watcher.record(Some(selection("alpha")));
        watcher.settle(&ui);
        watcher.record(Some(selection("beta")));

        let SelectionChange::New(snapshot) = watcher.settle(&ui) else {
            panic!("expected a new snapshot");
        };
        assert_eq!(snapshot.generation, 2);
        assert_eq!(watcher.current().map(|s| s.text.as_str()), Some("beta"));
    }

    #[test]
    fn capture_reuses_live_snapshot() {
        let ui = UiConfig::default();
        let mut watcher = SelectionWatcher::new();
        assert!(watcher.capture(&ui).is_none());

        watcher.record(Some(selection("alpha")));
        let (first, created) = watcher.capture(&ui).unwrap();
        assert!(created);
        let (again, created) = watcher.capture(&ui).unwrap();
        assert!(!created);
        assert_eq!(first, again);
    }
}
