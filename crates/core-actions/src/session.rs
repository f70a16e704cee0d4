//! Blocking read loop tying the decoder, the edit engine, the emitter and
//! the terminal backend together.
//!
//! One [`Session::read_line`] call holds raw mode for its whole duration and
//! hands it back on every exit path, including errors. Width changes arrive
//! on an optional [`ResizeEvent`] channel and are applied after each decoded
//! key, before the key is acted on.

use crate::dispatcher::{LineEditor, Outcome};
use crate::error::ReadLineError;
use core_events::{KeyEvent, RESIZE_EVENTS, ResizeEvent};
use core_input::{InputSource, KeyDecoder};
use core_render::{Emitter, RenderOp};
use core_terminal::{TerminalBackend, raw_mode_guard};
use core_text::{Line, LineBuffer};
use crossbeam_channel::Receiver;
use std::io::Write;
use std::sync::atomic::Ordering;
use tracing::{debug, info};

const CTRL_C: u8 = 0x03;
/// Echoed in place of every unit of a masked read unless overridden.
pub const DEFAULT_MASK_GLYPH: u8 = b'*';

/// Parameters of a single read.
#[derive(Debug, Clone, Default)]
pub struct ReadLineRequest {
    pub prompt: String,
    pub prefill: Vec<u8>,
    pub masked: bool,
}

impl ReadLineRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            ..Self::default()
        }
    }

    pub fn prefill(mut self, bytes: &[u8]) -> Self {
        self.prefill = bytes.to_vec();
        self
    }

    pub fn masked(mut self, masked: bool) -> Self {
        self.masked = masked;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadOutcome {
    Submitted(Line),
    /// Enter was pressed with no slot left for the terminator.
    Rejected,
}

pub struct Session<S, W, B>
where
    S: InputSource,
    W: Write,
    B: TerminalBackend,
{
    decoder: KeyDecoder,
    source: S,
    emitter: Emitter<W>,
    backend: B,
    resize: Option<Receiver<ResizeEvent>>,
    mask_glyph: u8,
}

impl<S, W, B> Session<S, W, B>
where
    S: InputSource,
    W: Write,
    B: TerminalBackend,
{
    pub fn new(source: S, out: W, backend: B) -> Self {
        Self {
            decoder: KeyDecoder::default(),
            source,
            emitter: Emitter::new(out),
            backend,
            resize: None,
            mask_glyph: DEFAULT_MASK_GLYPH,
        }
    }

    pub fn with_decoder(mut self, decoder: KeyDecoder) -> Self {
        self.decoder = decoder;
        self
    }

    pub fn with_resize_feed(mut self, feed: Receiver<ResizeEvent>) -> Self {
        self.resize = Some(feed);
        self
    }

    pub fn with_mask_glyph(mut self, glyph: u8) -> Self {
        self.mask_glyph = glyph;
        self
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn output(&self) -> &W {
        self.emitter.get_ref()
    }

    pub fn into_parts(self) -> (S, W, B) {
        (self.source, self.emitter.into_inner(), self.backend)
    }

    /// Print the prompt, echo the prefill and edit until Enter.
    pub fn read_line(&mut self, request: &ReadLineRequest) -> Result<ReadOutcome, ReadLineError> {
        let buffer = LineBuffer::with_prefill(&request.prefill)?;
        let Self {
            decoder,
            source,
            emitter,
            backend,
            resize,
            mask_glyph,
        } = self;

        let guard = raw_mode_guard(backend)?;
        let columns = guard.backend().column_width();
        let mask = request.masked.then_some(*mask_glyph);
        let mut editor = LineEditor::new(&request.prompt, buffer, columns, mask);
        info!(target: "runtime", columns, masked = request.masked, prefill = request.prefill.len(), "read_started");

        let result = edit_loop(&mut editor, decoder, source, emitter, resize.as_ref());
        let released = guard.release();
        let outcome = result?;
        released?;
        match &outcome {
            ReadOutcome::Submitted(line) => info!(target: "runtime", len = line.len(), "read_finished"),
            ReadOutcome::Rejected => info!(target: "runtime", "read_rejected"),
        }
        Ok(outcome)
    }
}

fn edit_loop<S: InputSource, W: Write>(
    editor: &mut LineEditor,
    decoder: &KeyDecoder,
    source: &mut S,
    emitter: &mut Emitter<W>,
    resize: Option<&Receiver<ResizeEvent>>,
) -> Result<ReadOutcome, ReadLineError> {
    editor.redraw();
    flush(editor, emitter)?;
    loop {
        let key = decoder.decode(source).map_err(ReadLineError::from_source)?;
        if let Some(feed) = resize {
            apply_resizes(editor, feed);
        }
        if key == KeyEvent::Char(CTRL_C) {
            emitter.emit(&[RenderOp::Newline])?;
            info!(target: "runtime", "read_interrupted");
            return Err(ReadLineError::Interrupted);
        }
        let outcome = editor.apply(key);
        flush(editor, emitter)?;
        match outcome {
            Outcome::Continue => {}
            Outcome::Submitted(line) => return Ok(ReadOutcome::Submitted(line)),
            Outcome::Rejected => return Ok(ReadOutcome::Rejected),
        }
    }
}

/// Only the latest width matters; earlier events are counted and skipped.
fn apply_resizes(editor: &mut LineEditor, feed: &Receiver<ResizeEvent>) {
    let mut latest = None;
    for event in feed.try_iter() {
        RESIZE_EVENTS.fetch_add(1, Ordering::Relaxed);
        latest = Some(event);
    }
    if let Some(event) = latest {
        debug!(target: "terminal.resize", from = editor.columns(), to = event.columns, "width_applied");
        editor.set_columns(event.columns);
    }
}

fn flush<W: Write>(editor: &mut LineEditor, emitter: &mut Emitter<W>) -> Result<(), ReadLineError> {
    emitter.emit(&editor.take_ops())?;
    Ok(())
}
