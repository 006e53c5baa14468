use std::mem;

use log::{debug, warn};

use crate::drivers::frame::{classify, Frame, SampleFields};
use crate::drivers::settings::{parse_record_length, parse_timebase, parse_volts, Setting};
use crate::types::{Capture, Configuration, RawConfiguration, Sample};

#[derive(PartialEq, Eq, Clone, Copy, Debug, Default)]
pub enum State {
    #[default]
    AwaitingConfiguration,
    AccumulatingSamples,
}

/// What a single line did to the acquisition.
#[derive(Debug)]
pub enum FeedOutcome {
    /// Noise, or a sample nobody asked for.
    Ignored,
    Configured,
    CaptureStarted,
    SampleStored,
    Completed(Capture),
    /// The partial record was dropped; the instrument has to send it again.
    ResendRequested,
}

/// Rebuilds complete records from the instrument's line stream.
///
/// Configuration lines update the current settings until an index-0 line
/// starts a record. Samples are then buffered until `RecordLength` of them
/// have arrived in order, at which point the record is handed out as a
/// [`Capture`] and a fresh buffer takes its place.
#[derive(Debug, Default)]
pub struct Acquisition {
    state: State,
    configuration: Configuration,
    raw: RawConfiguration,
    samples: Vec<Sample>,
    // Set once a capture has gone out; the next setting opens a new raw map.
    published: bool,
}

impl Acquisition {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn state(&self) -> State {
        self.state
    }
    pub fn configuration(&self) -> &Configuration {
        &self.configuration
    }
    pub fn raw(&self) -> &RawConfiguration {
        &self.raw
    }
    pub fn buffered(&self) -> usize {
        self.samples.len()
    }

    pub fn feed(&mut self, line: &str) -> FeedOutcome {
        match classify(line) {
            Frame::Noise => FeedOutcome::Ignored,
            Frame::StartMarker(first) => {
                self.samples = Vec::with_capacity(self.configuration.record_length);
                self.state = State::AccumulatingSamples;
                match first.map(|fields| self.accept_sample(fields)) {
                    None | Some(FeedOutcome::SampleStored) => FeedOutcome::CaptureStarted,
                    Some(outcome) => outcome,
                }
            }
            Frame::Sample(fields) => match self.state {
                State::AwaitingConfiguration => FeedOutcome::Ignored,
                State::AccumulatingSamples => self.accept_sample(fields),
            },
            Frame::Config { name, value } => {
                self.state = State::AwaitingConfiguration;
                self.apply_setting(name, value);
                FeedOutcome::Configured
            }
            Frame::MalformedConfig => {
                self.state = State::AwaitingConfiguration;
                FeedOutcome::Ignored
            }
        }
    }

    fn accept_sample(&mut self, fields: SampleFields<'_>) -> FeedOutcome {
        let Some(sample) = fields.parse() else {
            self.reset();
            return FeedOutcome::ResendRequested;
        };
        let expected = self.samples.len() as u64;
        if sample.index != expected {
            debug!("sample index {} out of order, expected {expected}", sample.index);
            self.reset();
            return FeedOutcome::ResendRequested;
        }
        self.samples.push(sample);
        if sample.index + 1 == self.configuration.record_length as u64 {
            FeedOutcome::Completed(self.publish())
        } else {
            FeedOutcome::SampleStored
        }
    }

    fn publish(&mut self) -> Capture {
        self.state = State::AwaitingConfiguration;
        self.published = true;
        Capture {
            configuration: self.configuration,
            raw: self.raw.clone(),
            samples: mem::take(&mut self.samples),
        }
    }

    fn reset(&mut self) {
        self.samples = Vec::new();
        self.state = State::AwaitingConfiguration;
    }

    fn apply_setting(&mut self, name: &str, value: &str) {
        if mem::take(&mut self.published) {
            self.raw = RawConfiguration::new();
        }
        self.raw.insert(name.to_owned(), value.to_owned());
        let Some(setting) = Setting::from_name(name) else {
            return;
        };
        let config = &mut self.configuration;
        let decoded = match setting {
            Setting::VPos => parse_volts(value).map(|v| config.v_pos = v),
            Setting::VSen => parse_volts(value).map(|v| config.v_sen = v),
            Setting::TriggerLevel => parse_volts(value).map(|v| config.trigger_level = v),
            Setting::RecordLength => parse_record_length(value).map(|n| config.record_length = n),
            Setting::Timebase => parse_timebase(value).map(|t| config.timebase = t),
        };
        if decoded.is_none() {
            warn!("could not decode {name} value {value:?}, keeping previous setting");
        }
    }
}
