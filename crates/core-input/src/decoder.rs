//! Escape-sequence key decoder.
//!
//! One call to [`KeyDecoder::decode`] yields exactly one [`KeyEvent`] and may
//! consume several units. Recognised shapes:
//!
//! * `ESC` alone (nothing follows within the escape timeout) -> `Escape`.
//! * `ESC [ <code>` and `ESC O <code>` for arrows, `Home`/`End` letter forms,
//!   `F1`..`F4` and `Insert`.
//! * `ESC [ <digit> <trailer>` for `PageUp`, `PageDown`, `Home`, `End` and
//!   `Delete`; the trailer (normally `~`) is read and discarded.
//!
//! When the unit after `ESC` is neither `[` nor `O` it is consumed and
//! dropped, and a bare `Escape` is returned. Unknown codes produce
//! [`KeyEvent::UnknownSequence`]; the decoder holds no state between calls so
//! the next call starts clean.

use crate::InputSource;
use core_events::{ControlKey, ESCAPE, KEYS_DECODED, KeyEvent, UNKNOWN_SEQUENCES};
use std::io;
use std::sync::atomic::Ordering;
use std::time::Duration;
use tracing::{debug, trace, warn};

/// Bounded wait used to tell a lone `ESC` from the start of a sequence.
pub const DEFAULT_ESCAPE_TIMEOUT: Duration = Duration::from_millis(25);

#[derive(Debug, Clone, Copy)]
pub struct KeyDecoder {
    escape_timeout: Duration,
}

impl Default for KeyDecoder {
    fn default() -> Self {
        Self::new(DEFAULT_ESCAPE_TIMEOUT)
    }
}

impl KeyDecoder {
    pub fn new(escape_timeout: Duration) -> Self {
        Self { escape_timeout }
    }

    pub fn escape_timeout(&self) -> Duration {
        self.escape_timeout
    }

    /// Read and resolve the next key from `src`.
    pub fn decode<S: InputSource + ?Sized>(&self, src: &mut S) -> io::Result<KeyEvent> {
        let unit = src.read_unit()?;
        let key = if unit == ESCAPE {
            self.decode_escape(src)?
        } else {
            map_plain(unit)
        };
        KEYS_DECODED.fetch_add(1, Ordering::Relaxed);
        // Printable units may belong to a masked read and are never logged.
        if !key.is_printable() {
            trace!(target: "input.decode", %key, "key");
        }
        Ok(key)
    }

    fn decode_escape<S: InputSource + ?Sized>(&self, src: &mut S) -> io::Result<KeyEvent> {
        if !src.peek_available(self.escape_timeout)? {
            return Ok(KeyEvent::control(ControlKey::Escape));
        }

        let introducer = src.read_unit()?;
        if introducer != b'[' && introducer != b'O' {
            debug!(target: "input.decode", introducer, "escape_introducer_dropped");
            return Ok(KeyEvent::control(ControlKey::Escape));
        }

        let code = src.read_unit()?;
        let key = match code {
            b'A' => ControlKey::Up,
            b'B' => ControlKey::Down,
            b'C' => ControlKey::Right,
            b'D' => ControlKey::Left,
            b'H' => ControlKey::Home,
            b'F' => ControlKey::End,
            b'P' => ControlKey::Function(1),
            b'Q' => ControlKey::Function(2),
            b'R' => ControlKey::Function(3),
            b'S' => ControlKey::Function(4),
            b'2' => ControlKey::Insert,
            b'5' | b'6' | b'1' | b'4' | b'3' => {
                let trailer = src.read_unit()?;
                trace!(target: "input.decode", code, trailer, "trailer_discarded");
                match code {
                    b'5' => ControlKey::PageUp,
                    b'6' => ControlKey::PageDown,
                    b'3' => ControlKey::Delete,
                    // `1` and `4` carry no key of their own; the null unit rings the bell.
                    _ => return Ok(KeyEvent::Char(0)),
                }
            }
            other => {
                UNKNOWN_SEQUENCES.fetch_add(1, Ordering::Relaxed);
                warn!(target: "input.decode", introducer, code = other, "unknown_escape_sequence");
                return Ok(KeyEvent::UnknownSequence(other));
            }
        };
        Ok(KeyEvent::control(key))
    }
}

/// Map a unit that does not start an escape sequence.
fn map_plain(unit: u8) -> KeyEvent {
    match unit {
        b'\r' | b'\n' => KeyEvent::control(ControlKey::Enter),
        0x08 | 0x7f => KeyEvent::control(ControlKey::Backspace),
        b'\t' => KeyEvent::control(ControlKey::Tab),
        other => KeyEvent::Char(other),
    }
}
