//! Edit engine: applies decoded keys to a [`LineBuffer`] and records the
//! repaint needed to keep the terminal in step.
//!
//! Sub-modules:
//! * `motion` - Home, End, Left, Right, Tab
//! * `edit`   - printable insert, Backspace, Delete, Escape clear
//! * `submit` - Enter, including line continuation
//!
//! All offsets handled here are relative to the buffer's segment start. The
//! engine keeps no screen coordinates; every repaint is derived from the
//! offsets and the current [`Geometry`], so a width change applies from the
//! next key on.
//!
//! Every run of printed glyphs that ends exactly on a wrap boundary is
//! followed by a soft pad (a space and one column back) so the terminal
//! cursor really sits on the next row instead of in the pending-wrap state.
//! With that in place every reposition can use the same wrap-aware steps.

use core_events::{BELLS_EMITTED, ControlKey, KeyEvent};
use core_render::{Geometry, RenderOp};
use core_text::{Line, LineBuffer};
use std::sync::atomic::Ordering;
use tracing::trace;

mod edit;
mod motion;
mod submit;

/// Result of applying one key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Keep reading keys.
    Continue,
    /// Enter terminated the line.
    Submitted(Line),
    /// Enter with no room left for the terminator. Nothing is committed.
    Rejected,
}

#[derive(Debug)]
pub struct LineEditor {
    buffer: LineBuffer,
    prompt: String,
    geometry: Geometry,
    mask: Option<u8>,
    ops: Vec<RenderOp>,
}

impl LineEditor {
    /// `prompt` is drawn by [`LineEditor::redraw`] and fixes the prompt width used
    /// by the wrap arithmetic. `mask` replaces every echoed unit when set.
    pub fn new(prompt: &str, buffer: LineBuffer, columns: u16, mask: Option<u8>) -> Self {
        let prompt_len = u16::try_from(prompt.len()).unwrap_or(u16::MAX);
        Self {
            buffer,
            prompt: prompt.to_string(),
            geometry: Geometry::new(columns, prompt_len),
            mask,
            ops: Vec::new(),
        }
    }

    pub fn buffer(&self) -> &LineBuffer {
        &self.buffer
    }

    pub fn is_masked(&self) -> bool {
        self.mask.is_some()
    }

    pub fn columns(&self) -> u16 {
        self.geometry.columns()
    }

    pub fn set_columns(&mut self, columns: u16) {
        self.geometry.set_columns(columns);
    }

    /// Drain the ops recorded since the last call.
    pub fn take_ops(&mut self) -> Vec<RenderOp> {
        std::mem::take(&mut self.ops)
    }

    /// Geometry of the active segment. Continuation rows carry no prompt.
    pub fn geometry(&self) -> Geometry {
        if self.buffer.segment_start() == 0 {
            self.geometry
        } else {
            self.geometry.with_prompt_len(0)
        }
    }

    /// Draw the prompt (first segment only) and the segment, then put the
    /// cursor back on its offset. Assumes the terminal cursor is at column 0.
    pub fn redraw(&mut self) {
        if self.buffer.segment_start() == 0 && !self.prompt.is_empty() {
            self.ops.push(RenderOp::Text(self.prompt.clone()));
            self.soft_pad(0);
        }
        let end = self.buffer.segment_len();
        self.repaint(0, end);
        self.geometry().walk_back(end, self.buffer.cursor(), &mut self.ops);
    }

    /// Apply one decoded key.
    pub fn apply(&mut self, key: KeyEvent) -> Outcome {
        if self.mask.is_none() {
            trace!(target: "edit.engine", %key, cursor = self.buffer.cursor(), len = self.buffer.len(), "apply");
        } else {
            trace!(target: "edit.engine", masked = true, len = self.buffer.len(), "apply");
        }
        match key {
            KeyEvent::Char(unit) => {
                self.insert(unit);
                Outcome::Continue
            }
            KeyEvent::UnknownSequence(code) => {
                self.unknown_sequence(code);
                Outcome::Continue
            }
            KeyEvent::Control(control) => self.apply_control(control),
        }
    }

    fn apply_control(&mut self, key: ControlKey) -> Outcome {
        match key {
            ControlKey::Home => self.home(),
            ControlKey::End | ControlKey::Tab => self.end(),
            ControlKey::Left => self.left(),
            ControlKey::Right => self.right(),
            ControlKey::Backspace => self.backspace(),
            ControlKey::Delete => self.delete(),
            ControlKey::Escape => self.escape(),
            ControlKey::Enter => return self.enter(),
            ControlKey::Up
            | ControlKey::Down
            | ControlKey::PageUp
            | ControlKey::PageDown
            | ControlKey::Insert
            | ControlKey::Function(_) => self.bell(),
        }
        Outcome::Continue
    }

    /// Diagnostic on its own row, then a full redraw so screen and buffer agree again.
    fn unknown_sequence(&mut self, code: u8) {
        let end = self.buffer.segment_len();
        self.repaint(self.buffer.cursor(), end);
        self.ops.push(RenderOp::Newline);
        self.ops
            .push(RenderOp::Text(format!("unknown escape sequence code {code}")));
        self.ops.push(RenderOp::Newline);
        self.bell();
        self.redraw();
    }

    // ---------------------------------------------------------------------------------------------
    // Shared repaint primitives
    // ---------------------------------------------------------------------------------------------

    pub(crate) fn bell(&mut self) {
        BELLS_EMITTED.fetch_add(1, Ordering::Relaxed);
        trace!(target: "edit.engine", "bell");
        self.ops.push(RenderOp::Bell);
    }

    /// Print segment units `from..to` with the cursor at `from`, leaving it at `to`.
    pub(crate) fn repaint(&mut self, from: usize, to: usize) {
        if from >= to {
            return;
        }
        let mask = self.mask;
        self.ops.extend(
            self.buffer.segment()[from..to]
                .iter()
                .map(|&unit| RenderOp::Glyph(mask.unwrap_or(unit))),
        );
        self.soft_pad(to);
    }

    /// After printing up to `at`, force the wrap if `at` starts a new row.
    pub(crate) fn soft_pad(&mut self, at: usize) {
        if self.geometry().boundary_crossed(at) {
            self.ops.push(RenderOp::Glyph(b' '));
            self.ops.push(RenderOp::CursorBack(1));
        }
    }

    /// Erase the glyph just before `at`, the cursor sitting at `at` at the end of the line.
    pub(crate) fn erase_before(&mut self, at: usize) {
        let g = self.geometry();
        if g.boundary_crossed(at) {
            self.ops.push(RenderOp::CursorUp(1));
            if g.columns() > 1 {
                self.ops.push(RenderOp::CursorForward(g.columns() - 1));
            }
            self.ops.push(RenderOp::ClearToEndOfLine);
        } else {
            self.ops.push(RenderOp::Backspace);
            self.ops.push(RenderOp::Glyph(b' '));
            self.ops.push(RenderOp::Backspace);
        }
    }

    /// Remove the unit under the cursor: shift the tail left on screen, blank the
    /// vacated last slot and walk back to the cursor.
    pub(crate) fn delete_under_cursor(&mut self) {
        let at = self.buffer.cursor();
        let old_end = self.buffer.segment_len();
        let pos = self.buffer.absolute_cursor();
        if self.buffer.remove(pos).is_err() {
            return;
        }
        let mask = self.mask;
        self.ops.extend(
            self.buffer.segment()[at..]
                .iter()
                .map(|&unit| RenderOp::Glyph(mask.unwrap_or(unit))),
        );
        self.ops.push(RenderOp::Glyph(b' '));
        self.soft_pad(old_end);
        self.geometry().walk_back(old_end, at, &mut self.ops);
    }

    /// Hand the finished buffer over, leaving an empty one behind.
    pub(crate) fn take_buffer(&mut self) -> LineBuffer {
        std::mem::take(&mut self.buffer)
    }
}
