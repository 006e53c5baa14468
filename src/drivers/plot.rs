use eframe::egui::Color32;

use crate::types::{Configuration, RawConfiguration, Sample};

/// Raw settings listed beside the plot, in this order.
pub const MEASUREMENT_KEYS: [&str; 8] =
    ["Vmax", "Vmin", "Vavr", "Vpp", "Freq", "Cycl", "PW", "Duty"];
/// Raw settings joined into the plot title, in this order.
const TITLE_KEYS: [&str; 6] = [
    "VSen",
    "Couple",
    "Timebase",
    "TriggerMode",
    "TriggerSlope",
    "TriggerLevel",
];
/// Vertical divisions either side of the centre line.
const HALF_SCREEN_DIVISIONS: f64 = 4.0;

#[derive(Clone, Debug)]
pub struct PlotStyle {
    pub trace: Color32,
    pub trigger: Color32,
}

impl Default for PlotStyle {
    fn default() -> Self {
        Self {
            trace: Color32::from_rgb(255, 165, 0),
            trigger: Color32::from_rgb(160, 32, 240),
        }
    }
}

/// Everything needed to draw one capture, already in display units.
#[derive(Clone, Debug, PartialEq)]
pub struct PlotModel {
    pub title: String,
    pub x_label: &'static str,
    pub x_range: (f64, f64),
    pub y_range: (f64, f64),
    /// Minor x grid step: one division at the timebase's own precision.
    pub x_grid_step: f64,
    /// Major y grid step: one vertical division.
    pub y_grid_step: f64,
    pub trace: Vec<[f64; 2]>,
    pub trigger: [[f64; 2]; 2],
    pub measurements: String,
    pub sample_count: usize,
}

impl PlotModel {
    pub fn from_capture(
        configuration: &Configuration,
        raw: &RawConfiguration,
        samples: &[Sample],
    ) -> Self {
        let timebase = configuration.timebase;
        let per_second = timebase.unit.per_second();
        let x_grid_step = timebase.scaled;
        let x_end = samples.last().map_or(0.0, |s| s.time * per_second);
        let x_end = if x_end > 0.0 { x_end } else { x_grid_step };
        let v_sen = if configuration.v_sen > 0.0 { configuration.v_sen } else { 1.0 };
        let half_height = HALF_SCREEN_DIVISIONS * v_sen;
        let trace = samples
            .iter()
            .map(|s| [s.time * per_second, s.value])
            .collect();
        Self {
            title: title_of(raw),
            x_label: timebase.unit.label(),
            x_range: (0.0, x_end),
            y_range: (-half_height - configuration.v_pos, half_height - configuration.v_pos),
            x_grid_step,
            y_grid_step: v_sen,
            trace,
            trigger: [[0.0, configuration.trigger_level], [x_end, configuration.trigger_level]],
            measurements: measurements_of(raw),
            sample_count: samples.len(),
        }
    }
}

fn title_of(raw: &RawConfiguration) -> String {
    TITLE_KEYS
        .iter()
        .map(|key| {
            let value = raw.get(*key).map_or("", String::as_str);
            if *key == "Timebase" {
                value.replace('u', "µ")
            } else {
                value.to_owned()
            }
        })
        .collect::<Vec<_>>()
        .join("  ")
}

fn measurements_of(raw: &RawConfiguration) -> String {
    MEASUREMENT_KEYS
        .iter()
        .filter_map(|key| raw.get(*key).map(|value| format!("{key}: {value}")))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{TimeUnit, Timebase};
    fn capture() -> (Configuration, RawConfiguration, Vec<Sample>) {
        let configuration = Configuration {
            v_pos: 0.5,
            v_sen: 1.0,
            trigger_level: 1.2,
            record_length: 3,
            timebase: Timebase {
                seconds: 0.002,
                scaled: 2.0,
                unit: TimeUnit::Millis,
            },
        };
        let raw: RawConfiguration = [
            ("VSen", "1V"),
            ("Timebase", "2ms"),
            ("Vpp", "3.3V"),
            ("Freq", "1kHz"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_owned(), v.to_owned()))
        .collect();
        let samples = vec![
            Sample {
                index: 0,
                time: 0.0,
                value: 0.1,
            },
            Sample {
                index: 1,
                time: 0.002,
                value: 0.2,
            },
            Sample {
                index: 2,
                time: 0.004,
                value: 0.15,
            },
        ];
        (configuration, raw, samples)
    }
    #[test]
    fn axes_follow_the_settings() {
        let (configuration, raw, samples) = capture();
        let model = PlotModel::from_capture(&configuration, &raw, &samples);
        assert_eq!(model.x_label, "ms");
        assert!((model.x_range.1 - 4.0).abs() < 1e-9);
        assert!((model.trace[1][0] - 2.0).abs() < 1e-9);
        assert_eq!(model.x_grid_step, 2.0);
        assert_eq!(model.y_range, (-4.5, 3.5));
        assert_eq!(model.y_grid_step, 1.0);
        assert_eq!(model.trigger[0], [0.0, 1.2]);
        assert_eq!(model.sample_count, 3);
    }
    #[test]
    fn title_and_measurements_come_from_raw_settings() {
        let (configuration, mut raw, samples) = capture();
        raw.insert("Timebase".into(), "20us".into());
        let model = PlotModel::from_capture(&configuration, &raw, &samples);
        assert_eq!(model.title, "1V    20µs      ");
        assert_eq!(model.measurements, "Vpp: 3.3V\nFreq: 1kHz");
    }
    #[test]
    fn degenerate_settings_still_give_a_usable_view() {
        let (mut configuration, raw, _) = capture();
        configuration.v_sen = 0.0;
        let single = [Sample {
            index: 0,
            time: 0.0,
            value: 1.0,
        }];
        let model = PlotModel::from_capture(&configuration, &raw, &single);
        assert_eq!(model.x_range, (0.0, 2.0));
        assert_eq!(model.y_grid_step, 1.0);
    }
}
