//! Background hover watcher.
//!
//! Watches pointer snapshots published from the event thread and reports
//! when the pointer has rested in one place for the hover delay. The event
//! thread owns all interpretation: the watcher only sends a
//! [`HoverRequest`], which the dispatcher applies from
//! [`poll_hover`](crate::dispatch::ActionDispatcher::poll_hover).

use std::sync::mpsc;

use web_time::{Duration, Instant};

use super::{ButtonMods, MouseSnapshot};
use crate::error::InteractError;

/// The pointer came to rest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HoverRequest {
    /// Snapshot sequence number the request refers to.
    pub seq: u64,
    /// Horizontal position in pixels.
    pub x: i32,
    /// Vertical position in pixels.
    pub y: i32,
    /// Modifier keys held.
    pub modifiers: ButtonMods,
}

/// Handle to the hover thread. Dropping it stops the thread without
/// joining.
pub struct HoverWatcher {
    publisher: triple_buffer::Input<MouseSnapshot>,
    stop_tx: Option<mpsc::Sender<()>>,
    requests: mpsc::Receiver<HoverRequest>,
    thread: Option<std::thread::JoinHandle<()>>,
}

impl HoverWatcher {
    /// Spawn the watcher with `initial` as the first visible snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`InteractError::ThreadSpawn`] if the thread fails to spawn.
    pub fn spawn(delay: Duration, initial: MouseSnapshot) -> Result<Self, InteractError> {
        let (stop_tx, stop_rx) = mpsc::channel::<()>();
        let (request_tx, requests) = mpsc::channel::<HoverRequest>();
        let (publisher, snapshots) = triple_buffer::triple_buffer(&initial);

        let thread = std::thread::Builder::new()
            .name("hover-watcher".into())
            .spawn(move || {
                Self::thread_loop(delay, &stop_rx, snapshots, &request_tx);
            })
            .map_err(InteractError::ThreadSpawn)?;

        log::debug!("hover watcher started ({} ms)", delay.as_millis());
        Ok(Self {
            publisher,
            stop_tx: Some(stop_tx),
            requests,
            thread: Some(thread),
        })
    }

    /// Publish the latest pointer state (non-blocking).
    pub fn publish(&mut self, snapshot: MouseSnapshot) {
        self.publisher.write(snapshot);
    }

    /// Newest pending request, discarding older ones.
    pub fn try_recv(&self) -> Option<HoverRequest> {
        let mut latest = None;
        while let Ok(request) = self.requests.try_recv() {
            latest = Some(request);
        }
        latest
    }

    /// Whether the thread is still attached.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.stop_tx.is_some()
    }

    /// Signal the thread to exit and detach it. Idempotent.
    pub fn stop(&mut self) {
        if let Some(stop_tx) = self.stop_tx.take() {
            if stop_tx.send(()).is_err() {
                log::debug!("hover watcher already exited");
            }
            drop(self.thread.take());
            log::debug!("hover watcher stopped");
        }
    }

    fn thread_loop(
        delay: Duration,
        stop_rx: &mpsc::Receiver<()>,
        mut snapshots: triple_buffer::Output<MouseSnapshot>,
        request_tx: &mpsc::Sender<HoverRequest>,
    ) {
        let mut last_seq = None;
        let mut still_since = Instant::now();
        let mut reported = false;

        while let Err(mpsc::RecvTimeoutError::Timeout) = stop_rx.recv_timeout(delay) {
            let _ = snapshots.update();
            let snapshot = *snapshots.output_buffer_mut();
            if last_seq != Some(snapshot.seq) {
                last_seq = Some(snapshot.seq);
                still_since = Instant::now();
                reported = false;
                continue;
            }
            if reported || !snapshot.is_move || snapshot.state.time < 0 {
                continue;
            }
            if still_since.elapsed() < delay {
                continue;
            }
            reported = true;
            let request = HoverRequest {
                seq: snapshot.seq,
                x: snapshot.state.x,
                y: snapshot.state.y,
                modifiers: snapshot.state.modifiers,
            };
            if request_tx.send(request).is_err() {
                log::debug!("hover receiver dropped; watcher exiting");
                break;
            }
        }
    }
}

impl Drop for HoverWatcher {
    fn drop(&mut self) {
        self.stop();
    }
}

impl std::fmt::Debug for HoverWatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HoverWatcher")
            .field("running", &self.is_running())
            .finish_non_exhaustive()
    }
}
