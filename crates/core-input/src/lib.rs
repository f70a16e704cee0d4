//! Raw input sources and the escape-sequence key decoder.

mod decoder;
mod source;

pub use decoder::{DEFAULT_ESCAPE_TIMEOUT, KeyDecoder};
pub use source::{ScriptedSource, ThreadedSource};

use std::io;
use std::time::Duration;

/// Byte-level input collaborator consumed by [`KeyDecoder`].
///
/// `read_unit` blocks until a unit arrives. `peek_available` must return
/// within `deadline`; a unit it observes stays queued for the next
/// `read_unit`. End of input surfaces as `ErrorKind::UnexpectedEof`.
pub trait InputSource {
    fn read_unit(&mut self) -> io::Result<u8>;
    fn peek_available(&mut self, deadline: Duration) -> io::Result<bool>;
}

impl<S: InputSource + ?Sized> InputSource for &mut S {
    fn read_unit(&mut self) -> io::Result<u8> {
        (**self).read_unit()
    }

    fn peek_available(&mut self, deadline: Duration) -> io::Result<bool> {
        (**self).peek_available(deadline)
    }
}

#[inline]
pub(crate) fn end_of_input() -> io::Error {
    io::Error::new(io::ErrorKind::UnexpectedEof, "input source closed")
}
