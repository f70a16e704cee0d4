//! Terminal mode control, width queries and resize notification.

use crossterm::terminal::{disable_raw_mode, enable_raw_mode, size};
use core_events::DEFAULT_COLUMNS;
use std::io;
use tracing::{debug, info};

pub mod resize;
pub use resize::{ResizeWatcher, spawn_resize_watcher};

pub trait TerminalBackend {
    fn enter_raw(&mut self) -> io::Result<()>;
    fn restore(&mut self) -> io::Result<()>;
    /// Current width in columns, never zero.
    fn column_width(&self) -> u16;
}

pub struct CrosstermBackend {
    raw: bool,
    fallback_columns: u16,
}

/// RAII guard ensuring the terminal mode is restored even if the caller early-returns or panics.
pub struct RawModeGuard<'a, B: TerminalBackend + ?Sized> {
    backend: &'a mut B,
    active: bool,
}

impl Default for CrosstermBackend {
    fn default() -> Self {
        Self::new(DEFAULT_COLUMNS)
    }
}

impl CrosstermBackend {
    pub fn new(fallback_columns: u16) -> Self {
        Self {
            raw: false,
            fallback_columns: fallback_columns.max(1),
        }
    }
}

/// Enter raw mode on `backend` and return a guard that restores it on drop.
pub fn raw_mode_guard<B: TerminalBackend + ?Sized>(
    backend: &mut B,
) -> io::Result<RawModeGuard<'_, B>> {
    backend.enter_raw()?;
    Ok(RawModeGuard {
        backend,
        active: true,
    })
}

impl<B: TerminalBackend + ?Sized> RawModeGuard<'_, B> {
    pub fn backend(&self) -> &B {
        self.backend
    }

    /// Restore now and report failures instead of swallowing them in `Drop`.
    pub fn release(mut self) -> io::Result<()> {
        self.active = false;
        self.backend.restore()
    }
}

impl TerminalBackend for CrosstermBackend {
    fn enter_raw(&mut self) -> io::Result<()> {
        if !self.raw {
            enable_raw_mode()?;
            self.raw = true;
            debug!(target: "terminal", "raw_mode_entered");
        }
        Ok(())
    }

    fn restore(&mut self) -> io::Result<()> {
        if self.raw {
            disable_raw_mode()?;
            self.raw = false;
            debug!(target: "terminal", "raw_mode_restored");
        }
        Ok(())
    }

    fn column_width(&self) -> u16 {
        query_columns(self.fallback_columns)
    }
}

impl Drop for CrosstermBackend {
    fn drop(&mut self) {
        let _ = self.restore();
    }
}

impl<B: TerminalBackend + ?Sized> Drop for RawModeGuard<'_, B> {
    fn drop(&mut self) {
        if self.active {
            let _ = self.backend.restore();
        }
    }
}

/// Ask the terminal for its width, falling back when the query fails or reports zero.
pub fn query_columns(fallback: u16) -> u16 {
    match size() {
        Ok((cols, _)) if cols > 0 => cols,
        Ok(_) => fallback.max(1),
        Err(e) => {
            info!(target: "terminal", ?e, fallback, "width_query_failed");
            fallback.max(1)
        }
    }
}

/// Backend for tests and non-interactive runs: fixed width, mode changes are only counted.
#[derive(Debug, Default)]
pub struct HeadlessBackend {
    columns: u16,
    raw: bool,
    pub enter_count: usize,
    pub restore_count: usize,
}

impl HeadlessBackend {
    pub fn new(columns: u16) -> Self {
        Self {
            columns: columns.max(1),
            ..Self::default()
        }
    }

    pub fn is_raw(&self) -> bool {
        self.raw
    }
}

impl TerminalBackend for HeadlessBackend {
    fn enter_raw(&mut self) -> io::Result<()> {
        self.raw = true;
        self.enter_count += 1;
        Ok(())
    }

    fn restore(&mut self) -> io::Result<()> {
        if self.raw {
            self.raw = false;
            self.restore_count += 1;
        }
        Ok(())
    }

    fn column_width(&self) -> u16 {
        self.columns
    }
}
