#![allow(dead_code)] // Shared across integration tests; each test binary uses a subset of helpers.

use core_actions::{LineEditor, Outcome};
use core_events::{ControlKey, KeyEvent};
use core_render::screen::VirtualScreen;
use core_text::LineBuffer;

/// Drives a [`LineEditor`] against an in-memory terminal and tracks where
/// the active segment starts on screen.
pub struct Harness {
    pub editor: LineEditor,
    pub screen: VirtualScreen,
    prompt: String,
    origin_row: usize,
}

impl Harness {
    pub fn new(prompt: &str, prefill: &[u8], columns: u16) -> Self {
        Self::build(prompt, prefill, columns, None)
    }

    pub fn masked(prompt: &str, columns: u16, glyph: u8) -> Self {
        Self::build(prompt, b"", columns, Some(glyph))
    }

    fn build(prompt: &str, prefill: &[u8], columns: u16, mask: Option<u8>) -> Self {
        let buffer = LineBuffer::with_prefill(prefill).expect("prefill fits");
        let mut editor = LineEditor::new(prompt, buffer, columns, mask);
        let mut screen = VirtualScreen::new(columns);
        editor.redraw();
        screen.apply_all(&editor.take_ops());
        Self {
            editor,
            screen,
            prompt: prompt.to_string(),
            origin_row: 0,
        }
    }

    pub fn key(&mut self, key: KeyEvent) -> Outcome {
        let segment_before = self.editor.buffer().segment_start();
        let outcome = self.editor.apply(key);
        self.screen.apply_all(&self.editor.take_ops());
        let moved = segment_before != self.editor.buffer().segment_start()
            || matches!(key, KeyEvent::UnknownSequence(_));
        if moved && matches!(outcome, Outcome::Continue) {
            // The segment was redrawn on fresh rows; re-anchor on the cursor.
            let g = self.editor.geometry();
            self.origin_row = self.screen.cursor().0 - g.row_of(self.editor.buffer().cursor());
        }
        outcome
    }

    pub fn control(&mut self, key: ControlKey) -> Outcome {
        self.key(KeyEvent::control(key))
    }

    pub fn type_bytes(&mut self, bytes: &[u8]) {
        for b in bytes {
            self.key(KeyEvent::Char(*b));
        }
    }

    pub fn origin_row(&self) -> usize {
        self.origin_row
    }

    /// Where the cursor should be according to the wrap arithmetic.
    pub fn expected_cursor(&self) -> (usize, usize) {
        let g = self.editor.geometry();
        let cur = self.editor.buffer().cursor();
        (self.origin_row + g.row_of(cur), g.column_of(cur))
    }

    /// What the rows of the active segment should read.
    pub fn expected_text(&self, mask: Option<u8>) -> String {
        let mut text = String::new();
        if self.editor.buffer().segment_start() == 0 {
            text.push_str(&self.prompt);
        }
        for &unit in self.editor.buffer().segment() {
            text.push(char::from(mask.unwrap_or(unit)));
        }
        text.trim_end().to_string()
    }

    pub fn screen_text(&self) -> String {
        self.screen.text_from(self.origin_row)
    }
}
