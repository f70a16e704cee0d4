//! Enter: submit the line or continue it on a fresh row.

use super::{LineEditor, Outcome};
use core_events::MAX_CMD_SIZE;
use core_render::RenderOp;
use tracing::{debug, warn};

impl LineEditor {
    pub(super) fn enter(&mut self) -> Outcome {
        if self.buffer.ends_with_continuation() {
            self.continue_line();
            return Outcome::Continue;
        }
        if self.buffer.len() >= MAX_CMD_SIZE - 1 {
            warn!(target: "edit.engine", len = self.buffer.len(), "submit_rejected");
            return Outcome::Rejected;
        }
        // Park the cursor below the last row the line occupies.
        let g = self.geometry();
        let rows_below = g.row_of(self.buffer.segment_len()) - g.row_of(self.buffer.cursor());
        self.ops.push(RenderOp::Newline);
        self.ops
            .extend(std::iter::repeat_n(RenderOp::Newline, rows_below));
        match self.take_buffer().into_line() {
            Ok(line) => {
                debug!(target: "edit.engine", len = line.len(), "submitted");
                Outcome::Submitted(line)
            }
            Err(e) => {
                warn!(target: "edit.engine", error = %e, "submit_rejected");
                Outcome::Rejected
            }
        }
    }

    fn continue_line(&mut self) {
        let end = self.buffer.segment_len();
        self.repaint(self.buffer.cursor(), end);
        if self.buffer.segment_start() == 0 && end == 1 {
            // A line holding only the marker drops it instead of continuing.
            self.erase_before(end);
            self.buffer.clear_segment();
            return;
        }
        self.ops.push(RenderOp::Newline);
        self.buffer.begin_continuation();
        // The marker heads the new segment; echo it at column 0.
        let marker = self.buffer.segment()[0];
        self.ops.push(RenderOp::Glyph(self.mask.unwrap_or(marker)));
        self.soft_pad(1);
        debug!(target: "edit.engine", segment_start = self.buffer.segment_start(), "line_continued");
    }
}

#[cfg(test)]
mod tests {
    use crate::dispatcher::{LineEditor, Outcome};
    use core_events::{ControlKey, KeyEvent, MAX_CMD_SIZE};
    use core_render::RenderOp;
    use core_text::{LineBuffer, MAX_STORED};
    use pretty_assertions::assert_eq;

    fn editor(text: &str, columns: u16) -> LineEditor {
        LineEditor::new("", LineBuffer::with_prefill(text.as_bytes()).unwrap(), columns, None)
    }

    fn enter(ed: &mut LineEditor) -> Outcome {
        ed.apply(KeyEvent::control(ControlKey::Enter))
    }

    #[test]
    fn submit_returns_line_and_resets_buffer() {
        let mut ed = editor("hello", 80);
        match enter(&mut ed) {
            Outcome::Submitted(line) => assert_eq!(line.as_bytes(), b"hello"),
            other => panic!("unexpected outcome {other:?}"),
        }
        assert_eq!(ed.take_ops(), vec![RenderOp::Newline]);
        assert!(ed.buffer().is_empty());
    }

    #[test]
    fn submit_from_an_earlier_row_moves_below_the_line() {
        // 10 units on width 4: rows 0..=2, cursor parked on row 0.
        let mut ed = editor("0123456789", 4);
        ed.apply(KeyEvent::control(ControlKey::Home));
        ed.take_ops();
        assert!(matches!(enter(&mut ed), Outcome::Submitted(_)));
        assert_eq!(ed.take_ops(), vec![RenderOp::Newline; 3]);
    }

    #[test]
    fn submit_without_room_for_terminator_is_rejected() {
        let mut ed = LineEditor::new("", LineBuffer::with_prefill(&[b'z'; MAX_STORED]).unwrap(), 80, None);
        assert_eq!(MAX_STORED, MAX_CMD_SIZE - 1);
        assert_eq!(enter(&mut ed), Outcome::Rejected);
        assert!(ed.take_ops().is_empty());
    }

    #[test]
    fn trailing_marker_continues_the_line() {
        let mut ed = editor("abc\\", 80);
        assert_eq!(enter(&mut ed), Outcome::Continue);
        assert_eq!(
            ed.take_ops(),
            vec![RenderOp::Newline, RenderOp::Glyph(b'\\')]
        );
        assert_eq!(ed.buffer().segment_start(), 3);
        assert_eq!(ed.buffer().cursor(), 1);
        for unit in *b"def" {
            ed.apply(KeyEvent::Char(unit));
        }
        match enter(&mut ed) {
            Outcome::Submitted(line) => {
                assert_eq!(line.as_bytes(), b"abc\\def");
                assert_eq!(line.len(), 7);
            }
            other => panic!("unexpected outcome {other:?}"),
        }
    }

    #[test]
    fn enter_on_a_fresh_continuation_row_submits() {
        let mut ed = editor("abc\\", 80);
        assert_eq!(enter(&mut ed), Outcome::Continue);
        ed.take_ops();
        match enter(&mut ed) {
            Outcome::Submitted(line) => assert_eq!(line.as_bytes(), b"abc\\"),
            other => panic!("unexpected outcome {other:?}"),
        }
        assert_eq!(ed.take_ops(), vec![RenderOp::Newline]);
    }

    #[test]
    fn marker_typed_on_a_continuation_row_continues_again() {
        let mut ed = editor("ab\\", 80);
        enter(&mut ed);
        ed.apply(KeyEvent::Char(b'\\'));
        ed.take_ops();
        assert_eq!(enter(&mut ed), Outcome::Continue);
        assert_eq!(ed.buffer().segment_start(), 3);
        assert_eq!(ed.take_ops(), vec![RenderOp::Newline, RenderOp::Glyph(b'\\')]);
        assert!(matches!(enter(&mut ed), Outcome::Submitted(_)));
    }

    #[test]
    fn continuation_from_mid_line_reprints_tail_first() {
        let mut ed = editor("ab\\", 80);
        ed.apply(KeyEvent::control(ControlKey::Left));
        ed.take_ops();
        enter(&mut ed);
        assert_eq!(
            ed.take_ops(),
            vec![RenderOp::Glyph(b'\\'), RenderOp::Newline, RenderOp::Glyph(b'\\')]
        );
    }

    #[test]
    fn lone_marker_is_erased() {
        let mut ed = editor("\\", 80);
        assert_eq!(enter(&mut ed), Outcome::Continue);
        assert_eq!(
            ed.take_ops(),
            vec![RenderOp::Backspace, RenderOp::Glyph(b' '), RenderOp::Backspace]
        );
        assert!(ed.buffer().is_empty());
        assert_eq!(ed.buffer().segment_start(), 0);
    }

    #[test]
    fn continuation_rows_ignore_the_prompt_width() {
        let mut ed = LineEditor::new("> ", LineBuffer::with_prefill(b"x\\").unwrap(), 4, None);
        enter(&mut ed);
        ed.take_ops();
        assert_eq!(ed.geometry().prompt_len(), 0);
        for unit in *b"ab" {
            ed.apply(KeyEvent::Char(unit));
        }
        // Marker plus "ab" ends at offset 3; one more fills the row.
        assert_eq!(ed.take_ops(), vec![RenderOp::Glyph(b'a'), RenderOp::Glyph(b'b')]);
        ed.apply(KeyEvent::Char(b'c'));
        assert_eq!(
            ed.take_ops(),
            vec![RenderOp::Glyph(b'c'), RenderOp::Glyph(b' '), RenderOp::CursorBack(1)]
        );
    }
}
