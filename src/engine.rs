// src/engine.rs
use crate::drivers::{Acquisition, AcquisitionError, CapturePublisher, FeedOutcome, LineSource};
use log::{debug, error, info, warn};
use std::thread::{self, JoinHandle};

pub type EngineHandle = JoinHandle<Result<u64, AcquisitionError>>;

/// Starts the acquisition thread. It owns the line source and only talks to
/// the rest of the program through `publisher`.
pub fn spawn_thread(
    source: Box<dyn LineSource + Send>,
    publisher: CapturePublisher,
) -> EngineHandle {
    thread::spawn(move || {
        let result = run(source, &publisher);
        match &result {
            Ok(count) => info!("line source ended after {count} captures"),
            Err(e) => error!("acquisition stopped: {e}"),
        }
        result
    })
}

/// Feeds every line into the state machine until the source ends.
/// Returns how many captures were published.
pub fn run<S: LineSource>(
    mut source: S,
    publisher: &CapturePublisher,
) -> Result<u64, AcquisitionError> {
    let mut acquisition = Acquisition::new();
    let mut published = 0;
    info!("Waiting for data...");
    while let Some(line) = source.next_line()? {
        match acquisition.feed(&line) {
            FeedOutcome::CaptureStarted => info!("Receiving samples..."),
            FeedOutcome::Completed(capture) => {
                info!("Received {} samples", capture.samples.len());
                publisher.publish(capture);
                published += 1;
            }
            FeedOutcome::ResendRequested => warn!("Sample reception error, please resend"),
            FeedOutcome::Ignored => debug!("discarded line {line:?}"),
            FeedOutcome::Configured | FeedOutcome::SampleStored => {}
        }
    }
    Ok(published)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drivers::{capture_channel, LineReader, ManualSource, Take};
    use std::io::{self, Cursor, Read};
    use std::time::Duration;

    fn record(length: usize, value: f64) -> Vec<String> {
        let mut lines = vec![format!("RecordLength,{length}"), "Timebase,20us".to_owned()];
        lines.extend((0..length).map(|i| format!("{i},{},{value}", i * 2)));
        lines
    }
    #[test]
    fn publishes_every_record_in_order() {
        let (publisher, receiver) = capture_channel();
        let mut lines = record(4, 0.5);
        lines.push("noise".into());
        lines.extend(record(2, 1.5));
        let count = run(ManualSource::new(lines), &publisher).unwrap();
        assert_eq!(count, 2);
        let Take::Ready(first) = receiver.try_take() else {
            panic!("first capture missing");
        };
        let Take::Ready(second) = receiver.try_take() else {
            panic!("second capture missing");
        };
        assert_eq!(first.samples.len(), 4);
        assert!(first.samples.iter().all(|s| s.value == 0.5));
        assert_eq!(second.samples.len(), 2);
        assert_eq!(second.configuration.record_length, 2);
        let indices: Vec<u64> = first.samples.iter().map(|s| s.index).collect();
        assert_eq!(indices, vec![0, 1, 2, 3]);
    }
    #[test]
    fn corrupted_record_is_not_published() {
        let (publisher, receiver) = capture_channel();
        let mut lines = record(3, 1.0);
        lines[3] = "1,??,1.0".into();
        lines.extend(record(3, 2.0));
        assert_eq!(run(ManualSource::new(lines), &publisher).unwrap(), 1);
        let Take::Ready(capture) = receiver.try_take() else {
            panic!("capture missing");
        };
        assert!(capture.samples.iter().all(|s| s.value == 2.0));
    }
    #[test]
    fn end_of_stream_is_a_clean_exit() {
        let (publisher, receiver) = capture_channel();
        let replay = LineReader::new(Cursor::new(b"RecordLength,1\n0,0,1\n".to_vec()));
        let handle = spawn_thread(Box::new(replay), publisher);
        assert_eq!(handle.join().unwrap().unwrap(), 1);
        assert!(matches!(receiver.try_take(), Take::Ready(_)));
        assert!(matches!(receiver.try_take(), Take::Closed));
    }
    #[test]
    fn transport_error_ends_the_thread() {
        struct Unplugged;
        impl Read for Unplugged {
            fn read(&mut self, _: &mut [u8]) -> io::Result<usize> {
                Err(io::Error::new(io::ErrorKind::BrokenPipe, "gone"))
            }
        }
        let (publisher, receiver) = capture_channel();
        let handle = spawn_thread(Box::new(LineReader::new(Unplugged)), publisher);
        assert!(handle.join().unwrap().is_err());
        assert!(matches!(
            receiver.take_timeout(Duration::from_millis(10)),
            Take::Closed
        ));
    }
}
