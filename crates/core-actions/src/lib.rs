//! Line editing: the key-to-repaint engine and the blocking read session.
//!
//! [`LineEditor`] is pure with respect to I/O. It consumes decoded keys and
//! records [`core_render::RenderOp`]s; [`Session`] owns the input source,
//! the output writer and the terminal backend and drives the editor from
//! raw bytes to a submitted [`core_text::Line`].

pub mod dispatcher;
pub mod error;
pub mod session;

pub use dispatcher::{LineEditor, Outcome};
pub use error::ReadLineError;
pub use session::{DEFAULT_MASK_GLYPH, ReadLineRequest, ReadOutcome, Session};
