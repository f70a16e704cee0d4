//! Core key event types and shared limits for rawline.
//!
//! Everything that crosses a crate boundary between the decoder, the edit
//! engine and the terminal glue lives here so the leaf crates stay free of
//! each other.

use std::fmt;
use std::sync::atomic::AtomicU64;

// -------------------------------------------------------------------------------------------------
// Capacity contract
// -------------------------------------------------------------------------------------------------
// `MAX_CMD_SIZE` bounds the stored line including the terminator slot; `LINE_LEN` bounds the
// visible, user-typed content. Printable input stops at `LINE_LEN`, submit is rejected once the
// stored length reaches `MAX_CMD_SIZE - 1`.
// -------------------------------------------------------------------------------------------------
pub const MAX_CMD_SIZE: usize = 255;
pub const LINE_LEN: usize = 250;
/// Terminal width assumed when the real geometry cannot be queried.
pub const DEFAULT_COLUMNS: u16 = 80;

/// Lead byte of every terminal escape sequence.
pub const ESCAPE: u8 = 0x1b;
/// Byte that marks a line as continued when it is the last one before Enter.
pub const CONTINUATION_MARKER: u8 = b'\\';

// -------------------------------------------------------------------------------------------------
// Telemetry
// -------------------------------------------------------------------------------------------------
// Relaxed atomic counters. They exist for tests and the shutdown summary log; nothing reads them
// on the hot path.
// -------------------------------------------------------------------------------------------------
pub static KEYS_DECODED: AtomicU64 = AtomicU64::new(0);
pub static UNKNOWN_SEQUENCES: AtomicU64 = AtomicU64::new(0);
pub static BELLS_EMITTED: AtomicU64 = AtomicU64::new(0);
pub static RESIZE_EVENTS: AtomicU64 = AtomicU64::new(0);

/// Non-printing keys the decoder can resolve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControlKey {
    Up,
    Down,
    Left,
    Right,
    PageUp,
    PageDown,
    Delete,
    Insert,
    Home,
    End,
    /// `F1`..=`F4`; the ordinal is 1-based.
    Function(u8),
    Backspace,
    Tab,
    Enter,
    Escape,
}

/// One logical key produced by a single decode call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyEvent {
    /// A raw unit passed through unchanged. Not necessarily printable.
    Char(u8),
    Control(ControlKey),
    /// Escape sequence whose terminal code has no mapping. Carries the offending code.
    UnknownSequence(u8),
}

impl KeyEvent {
    pub const fn control(key: ControlKey) -> Self {
        KeyEvent::Control(key)
    }

    /// Printable ASCII (space through tilde), the only bytes the engine stores.
    pub fn is_printable(&self) -> bool {
        matches!(self, KeyEvent::Char(b) if is_printable_byte(*b))
    }
}

impl fmt::Display for KeyEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyEvent::Char(b) if is_printable_byte(*b) => write!(f, "'{}'", *b as char),
            KeyEvent::Char(b) => write!(f, "0x{b:02x}"),
            KeyEvent::Control(ControlKey::Function(n)) => write!(f, "F{n}"),
            KeyEvent::Control(key) => write!(f, "{key:?}"),
            KeyEvent::UnknownSequence(code) => write!(f, "unknown(0x{code:02x})"),
        }
    }
}

#[inline]
pub fn is_printable_byte(b: u8) -> bool {
    (0x20..=0x7e).contains(&b)
}

/// New terminal width published by the resize watcher.
///
/// Consumed by the read loop between decode steps; never applied from the
/// notifying context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResizeEvent {
    pub columns: u16,
}

impl ResizeEvent {
    /// Zero-width reports are clamped to one column so geometry stays valid.
    pub fn new(columns: u16) -> Self {
        Self {
            columns: columns.max(1),
        }
    }
}
