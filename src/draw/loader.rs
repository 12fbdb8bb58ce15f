//! Background PNG decoding for retrieve and undo redraws.
//!
//! Decoding runs on the Tokio blocking pool; results come back over a channel
//! and are applied by the event-loop thread. Requests are never cancelled, so
//! a stale decode can land after a newer one and both are applied in
//! completion order.

use super::surface::{DecodedImage, SurfaceError, decode_png};
use std::panic::{self, AssertUnwindSafe};
use tokio::sync::mpsc;

/// Why an image is being decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadPurpose {
    /// Restoring the persisted snapshot.
    Retrieve,
    /// Redrawing the buffer from the previous history entry.
    Undo,
}

/// A finished decode, successful or not.
#[derive(Debug)]
pub struct LoadOutcome {
    pub purpose: LoadPurpose,
    pub result: Result<DecodedImage, SurfaceError>,
}

/// Queues decode jobs and hands back their results.
pub struct ImageLoader {
    runtime: tokio::runtime::Handle,
    tx: mpsc::UnboundedSender<LoadOutcome>,
    rx: mpsc::UnboundedReceiver<LoadOutcome>,
    in_flight: usize,
    waker: Option<calloop::ping::Ping>,
}

impl ImageLoader {
    /// Create a loader that decodes on the given runtime.
    pub fn new(runtime: &tokio::runtime::Handle) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            runtime: runtime.clone(),
            tx,
            rx,
            in_flight: 0,
            waker: None,
        }
    }

    /// Ping used to wake the event loop whenever a decode completes.
    pub fn set_waker(&mut self, waker: calloop::ping::Ping) {
        self.waker = Some(waker);
    }

    /// Starts decoding `png` in the background.
    pub fn request(&mut self, purpose: LoadPurpose, png: Vec<u8>) {
        log::debug!("Decoding {} byte image for {:?}", png.len(), purpose);
        self.spawn(purpose, move || decode_png(&png));
    }

    /// Runs `decode` on the blocking pool and queues exactly one outcome for it.
    ///
    /// A panicking decode is reported as [`SurfaceError::DecodePanicked`] so
    /// `in_flight` always drains.
    fn spawn<F>(&mut self, purpose: LoadPurpose, decode: F)
    where
        F: FnOnce() -> Result<DecodedImage, SurfaceError> + Send + 'static,
    {
        self.in_flight += 1;
        let tx = self.tx.clone();
        let waker = self.waker.clone();

        self.runtime.spawn_blocking(move || {
            let result = panic::catch_unwind(AssertUnwindSafe(decode)).unwrap_or_else(|_| {
                log::error!("Image decode for {:?} panicked", purpose);
                Err(SurfaceError::DecodePanicked)
            });
            if tx.send(LoadOutcome { purpose, result }).is_err() {
                log::debug!("Image loader dropped before decode finished");
                return;
            }
            if let Some(waker) = waker {
                waker.ping();
            }
        });
    }

    /// Number of decodes requested but not yet taken.
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    /// Takes a finished decode without waiting.
    pub fn try_take_result(&mut self) -> Option<LoadOutcome> {
        let outcome = self.rx.try_recv().ok()?;
        self.in_flight = self.in_flight.saturating_sub(1);
        Some(outcome)
    }

    /// Waits for the next finished decode, if any are in flight.
    ///
    /// Must not be called from inside the Tokio runtime.
    pub fn blocking_take_result(&mut self) -> Option<LoadOutcome> {
        if self.in_flight == 0 {
            return None;
        }
        let outcome = self.rx.blocking_recv()?;
        self.in_flight = self.in_flight.saturating_sub(1);
        Some(outcome)
    }
}
