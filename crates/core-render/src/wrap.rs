//! Cursor-wrap arithmetic.
//!
//! The engine never learns the real cursor coordinates. It tracks a logical
//! offset and replays, one column at a time, the moves it believes the
//! terminal performs. Offset `k` renders at column `(k + prompt_len) % columns`
//! of row `(k + prompt_len) / columns`, counted from the row the prompt sits on.
//!
//! A plain backspace at column 0 does not climb to the previous row on the
//! terminals we target, and a forward move at the last column does not drop to
//! the next one. Both cases need an explicit row change, which is what the two
//! step functions encode.

use crate::writer::RenderOp;
use core_events::DEFAULT_COLUMNS;

/// Terminal width and prompt width for one read session.
///
/// Recomputed from scratch on every step; a width change between two edits
/// takes effect on the next step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Geometry {
    columns: u16,
    prompt_len: u16,
}

impl Default for Geometry {
    fn default() -> Self {
        Self::new(DEFAULT_COLUMNS, 0)
    }
}

impl Geometry {
    /// `columns` is clamped to at least one.
    pub fn new(columns: u16, prompt_len: u16) -> Self {
        Self {
            columns: columns.max(1),
            prompt_len,
        }
    }

    pub fn columns(&self) -> u16 {
        self.columns
    }

    pub fn prompt_len(&self) -> u16 {
        self.prompt_len
    }

    pub fn set_columns(&mut self, columns: u16) {
        self.columns = columns.max(1);
    }

    /// Same width, different prompt. Continuation rows use a zero prompt.
    pub fn with_prompt_len(self, prompt_len: u16) -> Self {
        Self { prompt_len, ..self }
    }

    #[inline]
    fn shifted(&self, offset: usize) -> usize {
        offset + usize::from(self.prompt_len)
    }

    /// True when `offset` lands on the first column of a row.
    pub fn boundary_crossed(&self, offset: usize) -> bool {
        self.shifted(offset) % usize::from(self.columns) == 0
    }

    /// Row index (0 = prompt row) that `offset` renders on.
    pub fn row_of(&self, offset: usize) -> usize {
        self.shifted(offset) / usize::from(self.columns)
    }

    pub fn column_of(&self, offset: usize) -> usize {
        self.shifted(offset) % usize::from(self.columns)
    }

    /// Move from `offset` to `offset - 1`.
    pub fn step_toward_start(&self, offset: usize) -> Step {
        if self.boundary_crossed(offset) {
            Step::RowUp
        } else {
            Step::Back
        }
    }

    /// Move from `offset` to `offset + 1`.
    pub fn step_toward_end(&self, offset: usize) -> Step {
        if self.boundary_crossed(offset + 1) {
            Step::RowDown
        } else {
            Step::Forward
        }
    }

    /// Append the ops that realise `step` under this geometry.
    pub fn push_step(&self, step: Step, out: &mut Vec<RenderOp>) {
        let span = self.columns - 1;
        match step {
            Step::Back => out.push(RenderOp::Backspace),
            Step::Forward => out.push(RenderOp::CursorForward(1)),
            Step::RowUp => {
                out.push(RenderOp::CursorUp(1));
                if span > 0 {
                    out.push(RenderOp::CursorForward(span));
                }
            }
            Step::RowDown => {
                out.push(RenderOp::CursorDown(1));
                if span > 0 {
                    out.push(RenderOp::CursorBack(span));
                }
            }
        }
    }

    /// Walk the cursor from `from` back to `to`, one wrap-aware step per offset.
    pub fn walk_back(&self, from: usize, to: usize, out: &mut Vec<RenderOp>) {
        let mut at = from;
        while at > to {
            self.push_step(self.step_toward_start(at), out);
            at -= 1;
        }
    }

    /// Walk the cursor from `from` forward to `to` without printing.
    pub fn walk_forward(&self, from: usize, to: usize, out: &mut Vec<RenderOp>) {
        let mut at = from;
        while at < to {
            self.push_step(self.step_toward_end(at), out);
            at += 1;
        }
    }
}

/// A single-column cursor move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Visual backspace within the row; nothing is erased.
    Back,
    Forward,
    /// From column 0 to the last column of the row above.
    RowUp,
    /// From the last column to column 0 of the row below.
    RowDown,
}
