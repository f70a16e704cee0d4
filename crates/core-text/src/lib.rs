//! Fixed-capacity line buffer.
//!
//! The buffer tracks three offsets: the stored `len`, the cursor relative to
//! the active segment, and `segment_start`, the first offset still editable
//! after one or more line continuations. Content before `segment_start` has
//! scrolled past and is frozen.
//!
//! Invariant, checked by every mutating method:
//! `segment_start <= segment_start + cursor <= len <= MAX_CMD_SIZE - 1`.

use core_events::{CONTINUATION_MARKER, MAX_CMD_SIZE};
use std::fmt;
use thiserror::Error;

/// Highest stored length; the final slot is reserved for the terminator.
pub const MAX_STORED: usize = MAX_CMD_SIZE - 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum BufferError {
    #[error("prefill of {len} units exceeds the {max}-unit line capacity")]
    PrefillTooLong { len: usize, max: usize },
    #[error("line capacity of {max} units exceeded")]
    CapacityExceeded { max: usize },
    #[error("offset {pos} outside editable range {start}..{end}")]
    PositionOutOfRange { pos: usize, start: usize, end: usize },
}

#[derive(Clone, Default, PartialEq, Eq)]
pub struct LineBuffer {
    content: Vec<u8>,
    cursor: usize,
    segment_start: usize,
}

impl fmt::Debug for LineBuffer {
    // Content is omitted so masked input never reaches logs through `{:?}`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LineBuffer")
            .field("len", &self.len())
            .field("cursor", &self.cursor)
            .field("segment_start", &self.segment_start)
            .finish()
    }
}

impl LineBuffer {
    pub fn new() -> Self {
        Self {
            content: Vec::with_capacity(MAX_CMD_SIZE),
            cursor: 0,
            segment_start: 0,
        }
    }

    /// Start from existing content with the cursor at its end.
    pub fn with_prefill(bytes: &[u8]) -> Result<Self, BufferError> {
        if bytes.len() > MAX_STORED {
            return Err(BufferError::PrefillTooLong {
                len: bytes.len(),
                max: MAX_STORED,
            });
        }
        let mut content = Vec::with_capacity(MAX_CMD_SIZE);
        content.extend_from_slice(bytes);
        Ok(Self {
            cursor: content.len(),
            content,
            segment_start: 0,
        })
    }

    pub fn len(&self) -> usize {
        self.content.len()
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    /// Cursor offset relative to `segment_start`.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn segment_start(&self) -> usize {
        self.segment_start
    }

    pub fn absolute_cursor(&self) -> usize {
        self.segment_start + self.cursor
    }

    /// Length of the editable segment.
    pub fn segment_len(&self) -> usize {
        self.len() - self.segment_start
    }

    pub fn cursor_at_end(&self) -> bool {
        self.absolute_cursor() == self.len()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.content
    }

    /// The editable segment only.
    pub fn segment(&self) -> &[u8] {
        &self.content[self.segment_start..]
    }

    /// Units from the cursor to the end of the line.
    pub fn tail(&self) -> &[u8] {
        &self.content[self.absolute_cursor()..]
    }

    pub fn last(&self) -> Option<u8> {
        self.content.last().copied()
    }

    /// Insert at the cursor and advance past the new unit.
    pub fn insert(&mut self, unit: u8) -> Result<(), BufferError> {
        if self.len() >= MAX_STORED {
            return Err(BufferError::CapacityExceeded { max: MAX_STORED });
        }
        let at = self.absolute_cursor();
        self.content.insert(at, unit);
        self.cursor += 1;
        self.debug_check();
        Ok(())
    }

    /// Remove the unit at absolute offset `pos`, shifting the rest left.
    ///
    /// A cursor left past the new end is pulled back onto it.
    pub fn remove(&mut self, pos: usize) -> Result<u8, BufferError> {
        if pos < self.segment_start || pos >= self.len() {
            return Err(BufferError::PositionOutOfRange {
                pos,
                start: self.segment_start,
                end: self.len(),
            });
        }
        let unit = self.content.remove(pos);
        if self.absolute_cursor() > self.len() {
            self.cursor = self.segment_len();
        }
        self.debug_check();
        Ok(unit)
    }

    /// Drop the last unit of the segment.
    pub fn pop(&mut self) -> Option<u8> {
        if self.segment_len() == 0 {
            return None;
        }
        let unit = self.content.pop();
        self.cursor = self.cursor.min(self.segment_len());
        self.debug_check();
        unit
    }

    pub fn move_left(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        self.cursor -= 1;
        true
    }

    pub fn move_right(&mut self) -> bool {
        if self.cursor_at_end() {
            return false;
        }
        self.cursor += 1;
        true
    }

    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.segment_len();
    }

    /// Whether Enter would continue the line rather than submit it.
    ///
    /// The marker carried over from the previous row heads a continuation
    /// segment; only a marker typed after it continues again.
    pub fn ends_with_continuation(&self) -> bool {
        let carried = usize::from(self.segment_start > 0);
        self.segment_len() > carried && self.last() == Some(CONTINUATION_MARKER)
    }

    /// Freeze everything before the trailing marker. The marker opens the new
    /// segment and the cursor sits just after it.
    pub fn begin_continuation(&mut self) -> bool {
        if !self.ends_with_continuation() {
            return false;
        }
        self.segment_start = self.len() - 1;
        self.cursor = 1;
        self.debug_check();
        true
    }

    /// Discard the editable segment, keeping any frozen prefix.
    pub fn clear_segment(&mut self) {
        self.content.truncate(self.segment_start);
        self.cursor = 0;
    }

    /// Terminate the line. Fails when no slot is left for the terminator.
    pub fn into_line(self) -> Result<Line, BufferError> {
        if self.len() >= MAX_STORED {
            return Err(BufferError::CapacityExceeded { max: MAX_STORED });
        }
        Ok(Line {
            bytes: self.content,
        })
    }

    #[inline]
    fn debug_check(&self) {
        debug_assert!(self.segment_start + self.cursor <= self.content.len());
        debug_assert!(self.content.len() <= MAX_STORED);
    }
}

/// A submitted, terminated line.
#[derive(Clone, PartialEq, Eq)]
pub struct Line {
    bytes: Vec<u8>,
}

impl Line {
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    /// Stored units are printable ASCII, so this is lossless in practice.
    pub fn to_string_lossy(&self) -> String {
        String::from_utf8_lossy(&self.bytes).into_owned()
    }
}

impl fmt::Debug for Line {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Line").field("len", &self.len()).finish()
    }
}
