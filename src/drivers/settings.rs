use crate::types::{TimeUnit, Timebase};

/// Settings the acquisition decodes. Every other name is only kept raw.
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum Setting {
    VPos,
    VSen,
    TriggerLevel,
    RecordLength,
    Timebase,
}

impl Setting {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "VPos" => Some(Setting::VPos),
            "VSen" => Some(Setting::VSen),
            "TriggerLevel" => Some(Setting::TriggerLevel),
            "RecordLength" => Some(Setting::RecordLength),
            "Timebase" => Some(Setting::Timebase),
            _ => None,
        }
    }
}

/// `"1.20V"`, `"-0.5 V"`, `"50mV"` or a bare number.
pub fn parse_volts(value: &str) -> Option<f64> {
    let value = value.trim();
    let parsed = if let Some(millis) = value.strip_suffix("mV") {
        millis.trim().parse::<f64>().ok()? / 1_000.0
    } else {
        value.strip_suffix('V').unwrap_or(value).trim().parse().ok()?
    };
    parsed.is_finite().then_some(parsed)
}

/// Longest record the acquisition will buffer. Larger values are line noise.
pub const MAX_RECORD_LENGTH: usize = 1 << 20;

pub fn parse_record_length(value: &str) -> Option<usize> {
    let length = parse_volts(value)?;
    let whole = length >= 0.0 && length.fract() == 0.0;
    (whole && length <= MAX_RECORD_LENGTH as f64).then_some(length as usize)
}

/// Splits a timebase such as `"5ms"` into seconds per division plus the
/// magnitude and unit as written, so the grid can be drawn in that unit.
pub fn parse_timebase(value: &str) -> Option<Timebase> {
    let value = value.trim();
    // "ms" and "us" before the bare "s" they end with.
    let (magnitude, unit) = if let Some(m) = value.strip_suffix("ms") {
        (m, TimeUnit::Millis)
    } else if let Some(m) = value
        .strip_suffix("us")
        .or_else(|| value.strip_suffix("µs"))
    {
        (m, TimeUnit::Micros)
    } else {
        (value.strip_suffix('s').unwrap_or(value), TimeUnit::Seconds)
    };
    let scaled: f64 = magnitude.trim().parse().ok()?;
    if !scaled.is_finite() || scaled <= 0.0 {
        return None;
    }
    Some(Timebase {
        seconds: scaled / unit.per_second(),
        scaled,
        unit,
    })
}
