use std::sync::mpsc::{channel, Receiver, RecvTimeoutError, Sender, TryRecvError};
use std::time::Duration;

use log::debug;

use crate::types::Capture;

/// Result of asking the channel for a capture without waiting on the producer.
#[derive(Debug)]
pub enum Take {
    Ready(Capture),
    Empty,
    /// The producer is gone and every capture it sent has been taken.
    Closed,
}

/// Unbounded hand-off of completed captures from the acquisition thread to
/// the display. Publishing never blocks and nothing is dropped while the
/// consumer is alive.
pub fn capture_channel() -> (CapturePublisher, CaptureReceiver) {
    let (tx, rx) = channel();
    (CapturePublisher { tx }, CaptureReceiver { rx })
}

#[derive(Debug)]
pub struct CapturePublisher {
    tx: Sender<Capture>,
}

impl CapturePublisher {
    /// Moves the capture to the consumer.
    pub fn publish(&self, capture: Capture) {
        if let Err(lost) = self.tx.send(capture) {
            debug!(
                "display has gone away, dropping capture of {} samples",
                lost.0.samples.len()
            );
        }
    }
}

#[derive(Debug)]
pub struct CaptureReceiver {
    rx: Receiver<Capture>,
}

impl CaptureReceiver {
    pub fn try_take(&self) -> Take {
        match self.rx.try_recv() {
            Ok(capture) => Take::Ready(capture),
            Err(TryRecvError::Empty) => Take::Empty,
            Err(TryRecvError::Disconnected) => Take::Closed,
        }
    }

    /// Waits up to `timeout` for the next capture.
    pub fn take_timeout(&self, timeout: Duration) -> Take {
        match self.rx.recv_timeout(timeout) {
            Ok(capture) => Take::Ready(capture),
            Err(RecvTimeoutError::Timeout) => Take::Empty,
            Err(RecvTimeoutError::Disconnected) => Take::Closed,
        }
    }
}
