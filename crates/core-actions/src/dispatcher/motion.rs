//! Cursor movement within the active segment.
//!
//! Left and Right move one offset with a wrap-aware step. Home walks back
//! without printing. End (and Tab) reprints the tail instead of stepping over
//! it, which also resynchronises the screen with the buffer.

use super::LineEditor;

impl LineEditor {
    pub(super) fn home(&mut self) {
        let g = self.geometry();
        g.walk_back(self.buffer.cursor(), 0, &mut self.ops);
        self.buffer.move_home();
    }

    /// Also serves Tab: snapping to the end has to reprint the tail for the
    /// terminal cursor to land there.
    pub(super) fn end(&mut self) {
        let from = self.buffer.cursor();
        let to = self.buffer.segment_len();
        self.repaint(from, to);
        self.buffer.move_end();
    }

    pub(super) fn left(&mut self) {
        let cur = self.buffer.cursor();
        if cur == 0 {
            return;
        }
        let g = self.geometry();
        g.push_step(g.step_toward_start(cur), &mut self.ops);
        self.buffer.move_left();
    }

    pub(super) fn right(&mut self) {
        let cur = self.buffer.cursor();
        if self.buffer.cursor_at_end() {
            return;
        }
        let g = self.geometry();
        g.push_step(g.step_toward_end(cur), &mut self.ops);
        self.buffer.move_right();
    }
}

#[cfg(test)]
mod tests {
    use crate::dispatcher::LineEditor;
    use core_events::{ControlKey, KeyEvent};
    use core_render::RenderOp;
    use core_text::LineBuffer;
    use pretty_assertions::assert_eq;

    fn editor(text: &str, prompt: &str, columns: u16) -> LineEditor {
        LineEditor::new(prompt, LineBuffer::with_prefill(text.as_bytes()).unwrap(), columns, None)
    }

    fn press(ed: &mut LineEditor, key: ControlKey) -> Vec<RenderOp> {
        ed.apply(KeyEvent::control(key));
        ed.take_ops()
    }

    #[test]
    fn left_at_start_and_right_at_end_are_silent() {
        let mut ed = editor("ab", "", 80);
        assert!(press(&mut ed, ControlKey::Right).is_empty());
        press(&mut ed, ControlKey::Home);
        assert!(press(&mut ed, ControlKey::Left).is_empty());
        assert_eq!(ed.buffer().cursor(), 0);
    }

    #[test]
    fn home_walks_back_across_rows() {
        // "$ " + 6 units on width 4: offsets 2 and 6 start rows.
        let mut ed = editor("abcdef", "$ ", 4);
        assert_eq!(
            press(&mut ed, ControlKey::Home),
            vec![
                RenderOp::CursorUp(1),
                RenderOp::CursorForward(3),
                RenderOp::Backspace,
                RenderOp::Backspace,
                RenderOp::Backspace,
                RenderOp::CursorUp(1),
                RenderOp::CursorForward(3),
                RenderOp::Backspace,
            ]
        );
        assert_eq!(ed.buffer().cursor(), 0);
    }

    #[test]
    fn right_drops_a_row_before_boundary() {
        let mut ed = editor("abcde", "", 4);
        press(&mut ed, ControlKey::Home);
        for _ in 0..3 {
            assert_eq!(press(&mut ed, ControlKey::Right), vec![RenderOp::CursorForward(1)]);
        }
        assert_eq!(
            press(&mut ed, ControlKey::Right),
            vec![RenderOp::CursorDown(1), RenderOp::CursorBack(3)]
        );
        assert_eq!(ed.buffer().cursor(), 4);
    }

    #[test]
    fn end_reprints_tail_and_tab_matches() {
        let mut ed = editor("abc", "", 80);
        press(&mut ed, ControlKey::Home);
        assert_eq!(
            press(&mut ed, ControlKey::End),
            vec![RenderOp::Glyph(b'a'), RenderOp::Glyph(b'b'), RenderOp::Glyph(b'c')]
        );
        press(&mut ed, ControlKey::Left);
        assert_eq!(press(&mut ed, ControlKey::Tab), vec![RenderOp::Glyph(b'c')]);
        assert!(ed.buffer().cursor_at_end());
    }

    #[test]
    fn end_on_boundary_is_padded() {
        let mut ed = editor("abcd", "", 4);
        press(&mut ed, ControlKey::Left);
        assert_eq!(
            press(&mut ed, ControlKey::End),
            vec![RenderOp::Glyph(b'd'), RenderOp::Glyph(b' '), RenderOp::CursorBack(1)]
        );
    }

    #[test]
    fn masked_end_prints_mask_glyphs() {
        let mut ed = LineEditor::new("", LineBuffer::with_prefill(b"pw").unwrap(), 80, Some(b'*'));
        press(&mut ed, ControlKey::Home);
        assert_eq!(
            press(&mut ed, ControlKey::End),
            vec![RenderOp::Glyph(b'*'), RenderOp::Glyph(b'*')]
        );
    }
}
