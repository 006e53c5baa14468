// src/types.rs
use serde::Serialize;
use std::collections::BTreeMap;

/// Every configuration field seen for the current session, as received.
pub type RawConfiguration = BTreeMap<String, String>;

// 输入源模式
#[derive(PartialEq, Clone, Debug)]
pub enum ConnectionMode {
    Simulation,
    Hardware { port: String, baud: u32 },
    Replay(std::path::PathBuf),
}

/// Display unit the instrument declared for its timebase.
#[derive(PartialEq, Eq, Clone, Copy, Debug, Default, Serialize)]
pub enum TimeUnit {
    #[default]
    Seconds,
    Millis,
    Micros,
}

impl TimeUnit {
    pub fn label(self) -> &'static str {
        match self {
            TimeUnit::Seconds => "s",
            TimeUnit::Millis => "ms",
            TimeUnit::Micros => "µs",
        }
    }

    /// How many of this unit fit in one second.
    pub fn per_second(self) -> f64 {
        match self {
            TimeUnit::Seconds => 1.0,
            TimeUnit::Millis => 1_000.0,
            TimeUnit::Micros => 1_000_000.0,
        }
    }
}

#[derive(PartialEq, Clone, Copy, Debug, Serialize)]
pub struct Timebase {
    /// Seconds per division.
    pub seconds: f64,
    /// Magnitude as written on the wire, in `unit`.
    pub scaled: f64,
    pub unit: TimeUnit,
}

impl Default for Timebase {
    fn default() -> Self {
        Self {
            seconds: 1.0,
            scaled: 1.0,
            unit: TimeUnit::Seconds,
        }
    }
}

/// Typed subset of the raw configuration needed to interpret and scale a capture.
#[derive(PartialEq, Clone, Copy, Debug, Serialize)]
pub struct Configuration {
    pub v_pos: f64,
    pub v_sen: f64,
    pub trigger_level: f64,
    pub record_length: usize,
    pub timebase: Timebase,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            v_pos: 0.0,
            v_sen: 1.0,
            trigger_level: 0.0,
            record_length: 0,
            timebase: Timebase::default(),
        }
    }
}

#[derive(PartialEq, Clone, Copy, Debug, Serialize)]
pub struct Sample {
    pub index: u64,
    /// Seconds since the trigger.
    pub time: f64,
    /// Volts.
    pub value: f64,
}

/// One complete waveform record, handed from the acquisition thread to the display.
#[derive(Clone, Debug, Serialize)]
pub struct Capture {
    pub configuration: Configuration,
    pub raw: RawConfiguration,
    pub samples: Vec<Sample>,
}
