use std::collections::VecDeque;
use std::fs::File;
use std::io::{BufRead, BufReader, ErrorKind, Read};
use std::path::Path;
use std::time::Duration;

use log::debug;

use crate::drivers::AcquisitionError;

/// Serial reads wake up this often; the caller still sees a blocking read.
const SERIAL_POLL_TIMEOUT: Duration = Duration::from_secs(1);
/// Longest line kept, terminator excluded. Longer runs are dropped up to the next newline.
pub const MAX_LINE_BYTES: usize = 4096;

/// Trait representing something that yields protocol lines one at a time.
pub trait LineSource {
    /// Blocks until the next line is available. `Ok(None)` is end of stream.
    fn next_line(&mut self) -> Result<Option<String>, AcquisitionError>;
}

impl<S: LineSource + ?Sized> LineSource for Box<S> {
    fn next_line(&mut self) -> Result<Option<String>, AcquisitionError> {
        (**self).next_line()
    }
}

/// Splits any byte stream into newline-terminated text lines.
pub struct LineReader<R> {
    reader: BufReader<R>,
    pending: Vec<u8>,
    // 当前行超长, 丢弃到下一个换行为止
    overlong: bool,
}

impl<R: Read> LineReader<R> {
    pub fn new(inner: R) -> Self {
        Self {
            reader: BufReader::new(inner),
            pending: Vec::new(),
            overlong: false,
        }
    }
}

impl<R: Read> LineSource for LineReader<R> {
    fn next_line(&mut self) -> Result<Option<String>, AcquisitionError> {
        loop {
            // Bytes read before a timeout stay in `pending` for the next attempt.
            let budget = (MAX_LINE_BYTES + 1).saturating_sub(self.pending.len()) as u64;
            match (&mut self.reader).take(budget).read_until(b'\n', &mut self.pending) {
                Ok(0) if self.pending.is_empty() => return Ok(None),
                Ok(_) if !self.pending.ends_with(b"\n") && self.pending.len() > MAX_LINE_BYTES => {
                    if !self.overlong {
                        debug!("dropping line longer than {MAX_LINE_BYTES} bytes");
                    }
                    self.overlong = true;
                    self.pending.clear();
                }
                Ok(_) if self.overlong => {
                    // Tail of the dropped line.
                    self.overlong = false;
                    self.pending.clear();
                }
                Ok(_) => break,
                Err(e) if matches!(e.kind(), ErrorKind::TimedOut | ErrorKind::Interrupted) => {
                    continue
                }
                Err(e) => return Err(e.into()),
            }
        }
        // Undecodable bytes become replacement chars and the classifier drops the line.
        let line = String::from_utf8_lossy(&self.pending)
            .trim_end_matches(&['\r', '\n'][..])
            .to_owned();
        self.pending.clear();
        Ok(Some(line))
    }
}

/// Opens the instrument's serial port (8N1, no flow control).
pub fn open_serial(
    port: &str,
    baud: u32,
) -> Result<LineReader<Box<dyn serialport::SerialPort>>, AcquisitionError> {
    let handle = serialport::new(port, baud)
        .timeout(SERIAL_POLL_TIMEOUT)
        .open()
        .map_err(|source| AcquisitionError::OpenPort {
            port: port.to_owned(),
            source,
        })?;
    Ok(LineReader::new(handle))
}

/// Replays a text dump of the protocol, one line per line.
pub fn open_replay(path: &Path) -> Result<LineReader<File>, AcquisitionError> {
    let file = File::open(path).map_err(|source| AcquisitionError::OpenReplay {
        path: path.display().to_string(),
        source,
    })?;
    Ok(LineReader::new(file))
}

/// In-memory source useful for tests and deterministic playback.
pub struct ManualSource {
    queue: VecDeque<String>,
}

impl ManualSource {
    pub fn new<I, L>(lines: I) -> Self
    where
        I: IntoIterator<Item = L>,
        L: Into<String>,
    {
        Self {
            queue: lines.into_iter().map(Into::into).collect(),
        }
    }
}

impl LineSource for ManualSource {
    fn next_line(&mut self) -> Result<Option<String>, AcquisitionError> {
        Ok(self.queue.pop_front())
    }
}
