use core_text::BufferError;
use std::io;
use thiserror::Error;

/// Ways a read can end without producing a line.
#[derive(Debug, Error)]
pub enum ReadLineError {
    #[error("terminal I/O failed: {0}")]
    Io(#[from] io::Error),
    #[error("invalid prefill: {0}")]
    Prefill(#[from] BufferError),
    /// Ctrl-C while reading.
    #[error("read interrupted")]
    Interrupted,
    /// The input source reached end of file.
    #[error("input closed")]
    InputClosed,
}

impl ReadLineError {
    /// Map a source error, turning end of input into [`ReadLineError::InputClosed`].
    pub(crate) fn from_source(err: io::Error) -> Self {
        if err.kind() == io::ErrorKind::UnexpectedEof {
            ReadLineError::InputClosed
        } else {
            ReadLineError::Io(err)
        }
    }
}
