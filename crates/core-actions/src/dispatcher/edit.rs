//! Buffer-changing keys: printable insert, Backspace, Delete and the
//! Escape line clear.

use super::LineEditor;
use core_events::{LINE_LEN, is_printable_byte};
use core_render::RenderOp;
use tracing::debug;

impl LineEditor {
    pub(super) fn insert(&mut self, unit: u8) {
        if !is_printable_byte(unit) || self.buffer.len() >= LINE_LEN {
            self.bell();
            return;
        }
        let cur = self.buffer.cursor();
        let at_end = self.buffer.cursor_at_end();
        if self.buffer.insert(unit).is_err() {
            self.bell();
            return;
        }
        if at_end {
            let glyph = self.mask.unwrap_or(unit);
            self.ops.push(RenderOp::Glyph(glyph));
            self.soft_pad(cur + 1);
        } else {
            let end = self.buffer.segment_len();
            self.repaint(cur, end);
            self.geometry().walk_back(end, cur + 1, &mut self.ops);
        }
    }

    pub(super) fn backspace(&mut self) {
        let cur = self.buffer.cursor();
        if cur == 0 || self.buffer.segment_len() == 0 {
            self.bell();
            return;
        }
        if self.buffer.cursor_at_end() {
            if self.buffer.pop().is_none() {
                self.bell();
                return;
            }
            self.erase_before(cur);
        } else {
            let g = self.geometry();
            g.push_step(g.step_toward_start(cur), &mut self.ops);
            self.buffer.move_left();
            self.delete_under_cursor();
        }
    }

    /// Silent when there is nothing under the cursor.
    pub(super) fn delete(&mut self) {
        if self.buffer.segment_len() == 0 || self.buffer.cursor_at_end() {
            return;
        }
        self.delete_under_cursor();
    }

    /// Clear the whole line back to the prompt. Ignored once a continuation
    /// has frozen part of the line.
    pub(super) fn escape(&mut self) {
        if self.buffer.segment_start() != 0 {
            return;
        }
        let end = self.buffer.segment_len();
        self.repaint(self.buffer.cursor(), end);
        for at in (1..=end).rev() {
            self.erase_before(at);
        }
        self.buffer.clear_segment();
        debug!(target: "edit.engine", erased = end, "line_cleared");
    }
}
