//! Resize notification as a channel of [`ResizeEvent`]s.
//!
//! A watcher thread polls the terminal width on a fixed period and publishes
//! changes. The read loop drains the channel between decode steps, so width
//! updates never interrupt an edit half way through.

use crate::query_columns;
use core_events::ResizeEvent;
use crossbeam_channel::{Receiver, Sender, TrySendError, bounded};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::{debug, info};

const RESIZE_CHANNEL_CAP: usize = 16;

/// Handle to a running watcher. Dropping it stops the thread.
#[derive(Debug)]
pub struct ResizeWatcher {
    stop: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl ResizeWatcher {
    pub fn stop(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for ResizeWatcher {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Spawn a watcher polling the real terminal every `interval`.
pub fn spawn_resize_watcher(
    interval: Duration,
    fallback_columns: u16,
) -> std::io::Result<(Receiver<ResizeEvent>, ResizeWatcher)> {
    spawn_with_probe(interval, move || query_columns(fallback_columns))
}

/// Same as [`spawn_resize_watcher`] with an injectable width probe.
pub fn spawn_with_probe<F>(
    interval: Duration,
    mut probe: F,
) -> std::io::Result<(Receiver<ResizeEvent>, ResizeWatcher)>
where
    F: FnMut() -> u16 + Send + 'static,
{
    let (tx, rx) = bounded(RESIZE_CHANNEL_CAP);
    let stop = Arc::new(AtomicBool::new(false));
    let thread_stop = stop.clone();
    let handle = thread::Builder::new()
        .name("rawline-resize".into())
        .spawn(move || {
            info!(target: "terminal.resize", ?interval, "watcher_started");
            let mut last = probe();
            while !thread_stop.load(Ordering::Relaxed) {
                thread::sleep(interval);
                let now = probe();
                if now != last {
                    last = now;
                    if !publish(&tx, ResizeEvent::new(now)) {
                        break;
                    }
                }
            }
            info!(target: "terminal.resize", "watcher_stopped");
        })?;
    Ok((
        rx,
        ResizeWatcher {
            stop,
            handle: Some(handle),
        },
    ))
}

/// Returns false once the consumer is gone.
fn publish(tx: &Sender<ResizeEvent>, event: ResizeEvent) -> bool {
    match tx.try_send(event) {
        Ok(()) => {
            debug!(target: "terminal.resize", columns = event.columns, "resize_published");
            true
        }
        // A full queue means the reader is mid-line; it only needs the latest width and
        // the next change will be published again.
        Err(TrySendError::Full(_)) => true,
        Err(TrySendError::Disconnected(_)) => false,
    }
}
