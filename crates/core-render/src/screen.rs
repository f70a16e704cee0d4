//! In-memory terminal for tests.
//!
//! Interprets [`RenderOp`]s with the cursor rules of an xterm-class terminal:
//! printing in the last column leaves the cursor there with a pending wrap,
//! the next printed glyph wraps first, and every cursor motion clears the
//! pending flag. Motions never leave the row they start on except the
//! explicit up/down moves and line feeds.

use crate::writer::RenderOp;

#[derive(Debug, Clone)]
pub struct VirtualScreen {
    columns: usize,
    rows: Vec<Vec<u8>>,
    row: usize,
    col: usize,
    pending_wrap: bool,
    bells: usize,
}

impl VirtualScreen {
    pub fn new(columns: u16) -> Self {
        let columns = usize::from(columns.max(1));
        Self {
            columns,
            rows: vec![vec![b' '; columns]],
            row: 0,
            col: 0,
            pending_wrap: false,
            bells: 0,
        }
    }

    pub fn cursor(&self) -> (usize, usize) {
        (self.row, self.col)
    }

    pub fn pending_wrap(&self) -> bool {
        self.pending_wrap
    }

    pub fn bells(&self) -> usize {
        self.bells
    }

    /// Row text with trailing blanks removed.
    pub fn row_text(&self, row: usize) -> String {
        self.rows
            .get(row)
            .map(|r| String::from_utf8_lossy(r).trim_end().to_string())
            .unwrap_or_default()
    }

    /// Rows `from..` joined without separators, trailing blanks removed.
    pub fn text_from(&self, from: usize) -> String {
        let mut joined = Vec::new();
        for r in self.rows.iter().skip(from) {
            joined.extend_from_slice(r);
        }
        String::from_utf8_lossy(&joined).trim_end().to_string()
    }

    pub fn apply_all(&mut self, ops: &[RenderOp]) {
        for op in ops {
            self.apply(op);
        }
    }

    pub fn apply(&mut self, op: &RenderOp) {
        match op {
            RenderOp::Glyph(b) => self.put(*b),
            RenderOp::Text(s) => {
                for b in s.bytes() {
                    match b {
                        b'\r' => self.carriage_return(),
                        b'\n' => self.line_feed(),
                        other => self.put(other),
                    }
                }
            }
            RenderOp::Backspace => {
                self.pending_wrap = false;
                self.col = self.col.saturating_sub(1);
            }
            RenderOp::CursorBack(n) => {
                self.pending_wrap = false;
                self.col = self.col.saturating_sub(usize::from(*n));
            }
            RenderOp::CursorForward(n) => {
                self.pending_wrap = false;
                self.col = (self.col + usize::from(*n)).min(self.columns - 1);
            }
            RenderOp::CursorUp(n) => {
                self.pending_wrap = false;
                self.row = self.row.saturating_sub(usize::from(*n));
            }
            RenderOp::CursorDown(n) => {
                self.pending_wrap = false;
                self.row += usize::from(*n);
                self.ensure_row();
            }
            RenderOp::ClearToEndOfLine => {
                self.pending_wrap = false;
                let col = self.col;
                self.rows[self.row][col..].fill(b' ');
            }
            RenderOp::Newline => {
                self.carriage_return();
                self.line_feed();
            }
            RenderOp::Bell => self.bells += 1,
        }
    }

    fn put(&mut self, b: u8) {
        if self.pending_wrap {
            self.pending_wrap = false;
            self.col = 0;
            self.row += 1;
            self.ensure_row();
        }
        self.rows[self.row][self.col] = b;
        if self.col + 1 == self.columns {
            self.pending_wrap = true;
        } else {
            self.col += 1;
        }
    }

    fn carriage_return(&mut self) {
        self.pending_wrap = false;
        self.col = 0;
    }

    fn line_feed(&mut self) {
        self.pending_wrap = false;
        self.row += 1;
        self.ensure_row();
    }

    fn ensure_row(&mut self) {
        while self.rows.len() <= self.row {
            self.rows.push(vec![b' '; self.columns]);
        }
    }
}
