//! Wrap-aware cursor arithmetic and terminal output for the line editor.
//!
//! * [`wrap`]: maps logical offsets to rows and columns and yields the
//!   single-column moves that keep the terminal cursor in step.
//! * [`writer`]: the [`RenderOp`] vocabulary and the [`Emitter`] that turns
//!   it into bytes through crossterm commands.

pub mod wrap;
pub mod writer;
#[cfg(any(test, feature = "test-support"))]
pub mod screen;

pub use wrap::{Geometry, Step};
pub use writer::{Emitter, RenderOp};
