use crate::{InputSource, end_of_input};
use crossbeam_channel::{Receiver, RecvTimeoutError, bounded};
use std::collections::VecDeque;
use std::io::{self, Read};
use std::thread;
use std::time::Duration;
use tracing::{debug, info};

const READER_CHANNEL_CAP: usize = 1024;

/// In-memory source fed from a byte script. Every queued unit counts as
/// immediately available.
#[derive(Debug, Default, Clone)]
pub struct ScriptedSource {
    units: VecDeque<u8>,
}

impl ScriptedSource {
    pub fn new(bytes: &[u8]) -> Self {
        Self {
            units: bytes.iter().copied().collect(),
        }
    }

    pub fn push(&mut self, bytes: &[u8]) {
        self.units.extend(bytes.iter().copied());
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    pub fn remaining(&self) -> usize {
        self.units.len()
    }
}

impl InputSource for ScriptedSource {
    fn read_unit(&mut self) -> io::Result<u8> {
        self.units.pop_front().ok_or_else(end_of_input)
    }

    fn peek_available(&mut self, _deadline: Duration) -> io::Result<bool> {
        Ok(!self.units.is_empty())
    }
}

/// Source backed by a reader thread.
///
/// The thread pushes single bytes into a bounded channel; `peek_available`
/// waits on it with `recv_timeout` and parks the received unit in `pending`.
/// The thread stays blocked in `read` after the last session ends and exits
/// with the process.
#[derive(Debug)]
pub struct ThreadedSource {
    rx: Receiver<u8>,
    pending: Option<u8>,
}

impl ThreadedSource {
    /// Spawn the reader thread over the process's standard input.
    pub fn stdin() -> io::Result<Self> {
        Self::spawn(io::stdin())
    }

    pub fn spawn<R>(mut reader: R) -> io::Result<Self>
    where
        R: Read + Send + 'static,
    {
        let (tx, rx) = bounded::<u8>(READER_CHANNEL_CAP);
        thread::Builder::new()
            .name("rawline-input".into())
            .spawn(move || {
                info!(target: "input.thread", "reader_started");
                let mut unit = [0u8; 1];
                loop {
                    match reader.read(&mut unit) {
                        Ok(0) => break,
                        Ok(_) => {
                            if tx.send(unit[0]).is_err() {
                                break;
                            }
                        }
                        Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                        Err(e) => {
                            debug!(target: "input.thread", ?e, "read_failed");
                            break;
                        }
                    }
                }
                info!(target: "input.thread", "reader_stopped");
            })?;
        Ok(Self { rx, pending: None })
    }
}

impl InputSource for ThreadedSource {
    fn read_unit(&mut self) -> io::Result<u8> {
        if let Some(unit) = self.pending.take() {
            return Ok(unit);
        }
        self.rx.recv().map_err(|_| end_of_input())
    }

    fn peek_available(&mut self, deadline: Duration) -> io::Result<bool> {
        if self.pending.is_some() {
            return Ok(true);
        }
        match self.rx.recv_timeout(deadline) {
            Ok(unit) => {
                self.pending = Some(unit);
                Ok(true)
            }
            Err(RecvTimeoutError::Timeout | RecvTimeoutError::Disconnected) => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn scripted_source_reports_eof_when_drained() {
        let mut src = ScriptedSource::new(b"a");
        assert!(src.peek_available(Duration::ZERO).unwrap());
        assert_eq!(src.read_unit().unwrap(), b'a');
        assert!(!src.peek_available(Duration::ZERO).unwrap());
        assert_eq!(
            src.read_unit().unwrap_err().kind(),
            io::ErrorKind::UnexpectedEof
        );
    }

    #[test]
    fn threaded_source_keeps_peeked_unit() {
        let mut src = ThreadedSource::spawn(Cursor::new(b"xy".to_vec())).unwrap();
        assert!(src.peek_available(Duration::from_secs(2)).unwrap());
        // Peeking again must not consume a second unit.
        assert!(src.peek_available(Duration::from_secs(2)).unwrap());
        assert_eq!(src.read_unit().unwrap(), b'x');
        assert_eq!(src.read_unit().unwrap(), b'y');
        assert_eq!(
            src.read_unit().unwrap_err().kind(),
            io::ErrorKind::UnexpectedEof
        );
        assert!(!src.peek_available(Duration::from_millis(10)).unwrap());
    }
}
