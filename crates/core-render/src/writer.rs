//! Render ops and the emitter that writes them to the terminal.
//!
//! The edit engine only produces [`RenderOp`] lists; nothing above this module
//! knows about escape sequences. Ops keep their order and one `emit` call ends
//! with a single flush.

use crossterm::{
    cursor::{MoveDown, MoveLeft, MoveRight, MoveUp},
    queue,
    style::Print,
    terminal::{Clear, ClearType},
};
use std::io::{self, Write};
use tracing::trace;

const BACKSPACE: u8 = 0x08;
const BELL: u8 = 0x07;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderOp {
    /// One stored unit (or the mask glyph) at the cursor.
    Glyph(u8),
    /// Free text such as the prompt or a diagnostic.
    Text(String),
    /// Move back one column without erasing.
    Backspace,
    CursorUp(u16),
    CursorDown(u16),
    CursorForward(u16),
    CursorBack(u16),
    ClearToEndOfLine,
    /// Carriage return plus line feed; output post-processing is off in raw mode.
    Newline,
    Bell,
}

#[derive(Debug)]
pub struct Emitter<W: Write> {
    out: W,
    ops_written: u64,
}

impl<W: Write> Emitter<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            ops_written: 0,
        }
    }

    pub fn ops_written(&self) -> u64 {
        self.ops_written
    }

    pub fn get_ref(&self) -> &W {
        &self.out
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    pub fn emit(&mut self, ops: &[RenderOp]) -> io::Result<()> {
        if ops.is_empty() {
            return Ok(());
        }
        for op in ops {
            self.queue_op(op)?;
        }
        self.out.flush()?;
        self.ops_written += ops.len() as u64;
        trace!(target: "render.emit", ops = ops.len(), "flush");
        Ok(())
    }

    fn queue_op(&mut self, op: &RenderOp) -> io::Result<()> {
        let out = &mut self.out;
        match op {
            RenderOp::Glyph(b) => out.write_all(&[*b]),
            RenderOp::Text(s) => queue!(out, Print(s)),
            RenderOp::Backspace => out.write_all(&[BACKSPACE]),
            RenderOp::CursorUp(n) if *n > 0 => queue!(out, MoveUp(*n)),
            RenderOp::CursorDown(n) if *n > 0 => queue!(out, MoveDown(*n)),
            RenderOp::CursorForward(n) if *n > 0 => queue!(out, MoveRight(*n)),
            RenderOp::CursorBack(n) if *n > 0 => queue!(out, MoveLeft(*n)),
            RenderOp::CursorUp(_)
            | RenderOp::CursorDown(_)
            | RenderOp::CursorForward(_)
            | RenderOp::CursorBack(_) => Ok(()),
            RenderOp::ClearToEndOfLine => queue!(out, Clear(ClearType::UntilNewLine)),
            RenderOp::Newline => out.write_all(b"\r\n"),
            RenderOp::Bell => out.write_all(&[BELL]),
        }
    }
}
