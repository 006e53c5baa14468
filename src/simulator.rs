// src/simulator.rs
use crate::drivers::{AcquisitionError, LineSource};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::VecDeque;
use std::thread;
use std::time::Duration;

/// A record spans this many horizontal divisions.
const DIVISIONS: f64 = 10.0;
const HIGH_VOLTS: f64 = 3.3;
const NOISE_VOLTS: f64 = 0.02;
/// Square-wave periods per record.
const PERIODS: f64 = 2.5;

/// Stand-in for the instrument: emits a settings block followed by one
/// record of a noisy square wave, then waits before sending the next one.
pub struct SimulatedInstrument {
    rng: StdRng,
    record_length: usize,
    timebase_seconds: f64,
    pace: Duration,
    pending: VecDeque<String>,
    sent_records: u64,
}

impl SimulatedInstrument {
    pub fn new(record_length: usize, timebase_seconds: f64, pace: Duration) -> Self {
        Self::with_rng(StdRng::from_entropy(), record_length, timebase_seconds, pace)
    }

    pub fn with_seed(seed: u64, record_length: usize, timebase_seconds: f64) -> Self {
        Self::with_rng(
            StdRng::seed_from_u64(seed),
            record_length,
            timebase_seconds,
            Duration::ZERO,
        )
    }

    fn with_rng(rng: StdRng, record_length: usize, timebase_seconds: f64, pace: Duration) -> Self {
        Self {
            rng,
            record_length: record_length.max(1),
            timebase_seconds,
            pace,
            pending: VecDeque::new(),
            sent_records: 0,
        }
    }

    fn queue_record(&mut self) {
        let span_us = self.timebase_seconds * DIVISIONS * 1e6;
        let step_us = span_us / self.record_length as f64;
        let period_us = span_us / PERIODS;
        let samples: Vec<f64> = (0..self.record_length)
            .map(|i| {
                let phase = (i as f64 * step_us / period_us).fract();
                let level = if phase < 0.5 { HIGH_VOLTS } else { 0.0 };
                level + self.rng.gen_range(-NOISE_VOLTS..=NOISE_VOLTS)
            })
            .collect();

        let v_max = samples.iter().copied().fold(f64::MIN, f64::max);
        let v_min = samples.iter().copied().fold(f64::MAX, f64::min);
        let v_avr = samples.iter().sum::<f64>() / samples.len() as f64;
        let cycle_ms = period_us / 1e3;
        let settings = [
            ("VSen", "1V".to_owned()),
            ("Couple", "DC".to_owned()),
            ("VPos", "-1.60V".to_owned()),
            ("Timebase", format_timebase(self.timebase_seconds)),
            ("TriggerMode", "AUTO".to_owned()),
            ("TriggerSlope", "Rising".to_owned()),
            ("TriggerLevel", "1.20V".to_owned()),
            ("RecordLength", self.record_length.to_string()),
            ("Vmax", format!("{v_max:.2}V")),
            ("Vmin", format!("{v_min:.2}V")),
            ("Vavr", format!("{v_avr:.2}V")),
            ("Vpp", format!("{:.2}V", v_max - v_min)),
            ("Freq", format!("{:.1}Hz", 1e3 / cycle_ms)),
            ("Cycl", format!("{cycle_ms:.3}ms")),
            ("PW", format!("{:.3}ms", cycle_ms / 2.0)),
            ("Duty", "50.0%".to_owned()),
        ];
        self.pending
            .extend(settings.into_iter().map(|(name, value)| format!("{name},{value}")));
        self.pending.extend(
            samples
                .iter()
                .enumerate()
                .map(|(i, v)| format!("{i},{:.2},{v:.2}", i as f64 * step_us)),
        );
        self.sent_records += 1;
    }
}

fn format_timebase(seconds: f64) -> String {
    // Three decimals is more than the instrument ever prints.
    let tidy = |v: f64| (v * 1e3).round() / 1e3;
    if seconds < 1e-3 {
        format!("{}us", tidy(seconds * 1e6))
    } else if seconds < 1.0 {
        format!("{}ms", tidy(seconds * 1e3))
    } else {
        format!("{}s", tidy(seconds))
    }
}

impl LineSource for SimulatedInstrument {
    fn next_line(&mut self) -> Result<Option<String>, AcquisitionError> {
        if self.pending.is_empty() {
            if self.sent_records > 0 {
                thread::sleep(self.pace);
            }
            self.queue_record();
        }
        Ok(self.pending.pop_front())
    }
}
