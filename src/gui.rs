// src/gui.rs
use crate::drivers::{CaptureReceiver, PlotModel, PlotStyle, Take};
use crate::engine::EngineHandle;
use crate::render::{CaptureRenderer, POLL_INTERVAL};
use crate::types::{Configuration, RawConfiguration, Sample};
use crate::visualizer;
use anyhow::{anyhow, Result};
use eframe::egui;
use egui::Color32;
use log::{error, info};

const WAITING_TITLE: &str = "Waiting for data...";
const PLOT_TITLE: &str = "Plot";

pub struct ScopeApp {
    receiver: CaptureReceiver,
    engine: Option<EngineHandle>,
    style: PlotStyle,
    model: Option<PlotModel>,
    captures: u64,
    window_title: &'static str,
    status: String,
}

impl ScopeApp {
    pub fn new(receiver: CaptureReceiver, engine: EngineHandle) -> Self {
        Self {
            receiver,
            engine: Some(engine),
            style: PlotStyle::default(),
            model: None,
            captures: 0,
            window_title: WAITING_TITLE,
            status: WAITING_TITLE.to_owned(),
        }
    }

    /// Renders everything queued so far without waiting for more.
    fn drain_captures(&mut self, ctx: &egui::Context) {
        loop {
            match self.receiver.try_take() {
                Take::Ready(capture) => {
                    self.render(&capture.configuration, &capture.raw, &capture.samples)
                }
                Take::Empty => break,
                Take::Closed => {
                    self.reap_engine(ctx);
                    break;
                }
            }
        }
    }

    // 后台线程结束: 数据源读完就保留最后一帧, 传输出错则关闭窗口
    fn reap_engine(&mut self, ctx: &egui::Context) {
        let Some(handle) = self.engine.take() else {
            return;
        };
        match handle.join() {
            Ok(Ok(count)) => {
                info!("input finished after {count} captures");
                self.status = format!("Input finished ({count} captures)");
            }
            Ok(Err(e)) => {
                error!("acquisition failed: {e}");
                ctx.send_viewport_cmd(egui::ViewportCommand::Close);
            }
            Err(_) => {
                error!("acquisition thread panicked");
                ctx.send_viewport_cmd(egui::ViewportCommand::Close);
            }
        }
    }
}

impl CaptureRenderer for ScopeApp {
    fn render(
        &mut self,
        configuration: &Configuration,
        raw: &RawConfiguration,
        samples: &[Sample],
    ) {
        self.model = Some(PlotModel::from_capture(configuration, raw, samples));
        self.captures += 1;
        self.status = format!("Capture #{} ({} samples)", self.captures, samples.len());
    }
}

impl eframe::App for ScopeApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.drain_captures(ctx);

        let title = if self.model.is_some() { PLOT_TITLE } else { WAITING_TITLE };
        if title != self.window_title {
            self.window_title = title;
            ctx.send_viewport_cmd(egui::ViewportCommand::Title(title.to_owned()));
        }

        egui::SidePanel::left("measurements").min_width(180.0).show(ctx, |ui| {
            ui.add_space(10.0);
            ui.heading("dsoview");
            ui.separator();
            ui.label(self.status.as_str());
            if let Some(model) = &self.model {
                ui.add_space(10.0);
                ui.monospace(model.measurements.as_str());
            }
        });

        egui::CentralPanel::default().show(ctx, |ui| match &self.model {
            Some(model) => {
                ui.label(
                    egui::RichText::new(model.title.as_str())
                        .strong()
                        .color(Color32::LIGHT_GRAY),
                );
                visualizer::draw_capture(ui, model, &self.style);
            }
            None => {
                ui.centered_and_justified(|ui| ui.label(WAITING_TITLE));
            }
        });

        // Keep polling the channel while the window is idle.
        ctx.request_repaint_after(POLL_INTERVAL);
    }
}

// 入口函数
pub fn run(receiver: CaptureReceiver, engine: EngineHandle) -> Result<()> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1024.0, 640.0])
            .with_min_inner_size([480.0, 320.0])
            .with_title(WAITING_TITLE),
        ..Default::default()
    };
    eframe::run_native(
        "dsoview",
        options,
        Box::new(move |_cc| Box::new(ScopeApp::new(receiver, engine))),
    )
    .map_err(|e| anyhow!("display failed: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drivers::{capture_channel, ManualSource};
    use crate::engine;

    fn app_over(lines: &[&str]) -> ScopeApp {
        let (publisher, receiver) = capture_channel();
        let source = ManualSource::new(lines.iter().copied());
        ScopeApp::new(receiver, engine::spawn_thread(Box::new(source), publisher))
    }
    #[test]
    fn waits_until_first_capture() {
        let mut app = app_over(&[]);
        assert!(app.model.is_none());
        app.render(&Configuration::default(), &RawConfiguration::new(), &[]);
        assert!(app.model.is_some());
        assert_eq!(app.captures, 1);
    }
    #[test]
    fn drains_published_captures_and_reaps_finished_source() {
        let mut app = app_over(&[
            "RecordLength,2",
            "0,0,1",
            "1,5,2",
            "RecordLength,1",
            "0,0,3",
        ]);
        let ctx = egui::Context::default();
        // The channel only reports closed once the thread has exited and the queue is empty.
        while app.engine.is_some() {
            app.drain_captures(&ctx);
            std::thread::sleep(std::time::Duration::from_millis(5));
        }
        assert_eq!(app.captures, 2);
        assert_eq!(app.model.as_ref().map(|m| m.sample_count), Some(1));
        assert_eq!(app.status, "Input finished (2 captures)");
    }
}
