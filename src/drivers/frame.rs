//! Classification of raw protocol lines.
//!
//! The instrument never tags its lines. A line is split on `,` and its type
//! is inferred from the number of fields and from whether the first field
//! is an integer.
use crate::types::Sample;

pub const DELIMITER: char = ',';
/// Sample times arrive in microseconds.
const WIRE_TIME_PER_SECOND: f64 = 1_000_000.0;

/// Fields of a `<index>,<time>,<value>` line, still unparsed past the index.
#[derive(PartialEq, Clone, Copy, Debug)]
pub struct SampleFields<'a> {
    pub index: u64,
    pub time: &'a str,
    pub value: &'a str,
}

impl SampleFields<'_> {
    /// Parses time and value, converting the time to seconds.
    /// `None` means the line was corrupted in transit.
    pub fn parse(&self) -> Option<Sample> {
        let time: f64 = self.time.parse().ok()?;
        let value: f64 = self.value.parse().ok()?;
        Some(Sample {
            index: self.index,
            time: time / WIRE_TIME_PER_SECOND,
            value,
        })
    }
}

#[derive(PartialEq, Clone, Copy, Debug)]
pub enum Frame<'a> {
    /// Index 0. Carries the first sample when the line has three fields.
    StartMarker(Option<SampleFields<'a>>),
    Sample(SampleFields<'a>),
    Config { name: &'a str, value: &'a str },
    /// Non-numeric first field with the wrong arity for a setting.
    MalformedConfig,
    Noise,
}

pub fn classify(line: &str) -> Frame<'_> {
    let fields: Vec<&str> = line.split(DELIMITER).map(str::trim).collect();
    if !(2..=3).contains(&fields.len()) {
        return Frame::Noise;
    }
    let Ok(head) = fields[0].parse::<i64>() else {
        return match fields[..] {
            [name, value] => Frame::Config { name, value },
            _ => Frame::MalformedConfig,
        };
    };
    let Ok(index) = u64::try_from(head) else {
        return Frame::Noise;
    };
    let sample = match fields[..] {
        [_, time, value] => Some(SampleFields { index, time, value }),
        _ => None,
    };
    match (index, sample) {
        (0, sample) => Frame::StartMarker(sample),
        (_, Some(sample)) => Frame::Sample(sample),
        (_, None) => Frame::Noise,
    }
}
