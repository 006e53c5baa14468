// src/render.rs
use crate::drivers::{CaptureReceiver, Take};
use crate::engine::EngineHandle;
use crate::types::{Configuration, RawConfiguration, Sample};
use anyhow::{anyhow, Context, Result};
use log::{info, warn};
use serde::Serialize;
use std::io::Write;
use std::time::Duration;

/// How long the presentation side waits on the channel before checking in again.
pub const POLL_INTERVAL: Duration = Duration::from_millis(200);

/// Presentation of completed captures. Called once per capture, in publish order.
pub trait CaptureRenderer {
    fn render(
        &mut self,
        configuration: &Configuration,
        raw: &RawConfiguration,
        samples: &[Sample],
    );
}

/// Reports each capture through the log.
#[derive(Debug, Default)]
pub struct ConsoleRenderer;

impl CaptureRenderer for ConsoleRenderer {
    fn render(
        &mut self,
        configuration: &Configuration,
        raw: &RawConfiguration,
        samples: &[Sample],
    ) {
        info!("Plotting {} samples", samples.len());
        info!("VPos:\t{}", configuration.v_pos);
        info!("VSen:\t{}", configuration.v_sen);
        info!("TriggerLevel:\t{}", configuration.trigger_level);
        info!("RecordLength:\t{}", configuration.record_length);
        let timebase = configuration.timebase;
        info!(
            "Timebase:\t{} ({}{})",
            timebase.seconds,
            timebase.scaled,
            timebase.unit.label()
        );
        for (key, value) in raw {
            info!("  {key} = {value}");
        }
    }
}

/// Writes one JSON object per capture, one per line.
pub struct JsonRenderer<W: Write> {
    out: W,
}

#[derive(Serialize)]
struct JsonCapture<'a> {
    configuration: &'a Configuration,
    raw: &'a RawConfiguration,
    samples: &'a [Sample],
}

impl<W: Write> JsonRenderer<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }
}

impl<W: Write> CaptureRenderer for JsonRenderer<W> {
    fn render(
        &mut self,
        configuration: &Configuration,
        raw: &RawConfiguration,
        samples: &[Sample],
    ) {
        let capture = JsonCapture {
            configuration,
            raw,
            samples,
        };
        let written = serde_json::to_writer(&mut self.out, &capture)
            .map_err(anyhow::Error::from)
            .and_then(|()| writeln!(self.out).map_err(anyhow::Error::from))
            .and_then(|()| self.out.flush().map_err(anyhow::Error::from));
        if let Err(e) = written {
            warn!("could not write capture: {e}");
        }
    }
}

/// Presentation loop without a window. Returns once the acquisition thread
/// has ended and every capture it published has been rendered.
pub fn run_headless(
    receiver: &CaptureReceiver,
    renderer: &mut dyn CaptureRenderer,
    engine: EngineHandle,
) -> Result<u64> {
    let mut rendered = 0;
    loop {
        match receiver.take_timeout(POLL_INTERVAL) {
            Take::Ready(capture) => {
                renderer.render(&capture.configuration, &capture.raw, &capture.samples);
                rendered += 1;
            }
            Take::Empty => continue,
            Take::Closed => break,
        }
    }
    engine
        .join()
        .map_err(|_| anyhow!("acquisition thread panicked"))?
        .context("acquisition failed")?;
    Ok(rendered)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drivers::{capture_channel, ManualSource};
    use crate::engine;

    #[derive(Default)]
    struct Recording {
        lengths: Vec<usize>,
    }
    impl CaptureRenderer for Recording {
        fn render(&mut self, _: &Configuration, _: &RawConfiguration, samples: &[Sample]) {
            self.lengths.push(samples.len());
        }
    }
    fn lines() -> Vec<String> {
        let mut lines = Vec::new();
        for length in [2, 3] {
            lines.push(format!("RecordLength,{length}"));
            lines.extend((0..length).map(|i| format!("{i},{i}0,0.5")));
        }
        lines
    }
    #[test]
    fn headless_renders_every_capture_then_returns() {
        let (publisher, receiver) = capture_channel();
        let handle = engine::spawn_thread(Box::new(ManualSource::new(lines())), publisher);
        let mut recording = Recording::default();
        let rendered = run_headless(&receiver, &mut recording, handle).unwrap();
        assert_eq!(rendered, 2);
        assert_eq!(recording.lengths, vec![2, 3]);
    }
    #[test]
    fn json_lines_hold_the_whole_capture() {
        let mut out = Vec::new();
        let mut renderer = JsonRenderer::new(&mut out);
        let mut raw = RawConfiguration::new();
        raw.insert("Couple".into(), "DC".into());
        let samples = [Sample {
            index: 0,
            time: 0.5,
            value: 1.0,
        }];
        renderer.render(&Configuration::default(), &raw, &samples);
        renderer.render(&Configuration::default(), &raw, &samples);
        let text = String::from_utf8(out).unwrap();
        let rows: Vec<serde_json::Value> = text
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["raw"]["Couple"], "DC");
        assert_eq!(rows[0]["samples"][0]["time"], 0.5);
        assert_eq!(rows[0]["configuration"]["timebase"]["unit"], "Seconds");
    }
}
