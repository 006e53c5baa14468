// src/visualizer.rs
use crate::drivers::{PlotModel, PlotStyle};
use eframe::egui;
use egui_plot::{uniform_grid_spacer, Line, LineStyle, Plot, PlotBounds, PlotPoints};

/// Draws one capture on a fixed, scope-like grid.
pub fn draw_capture(ui: &mut egui::Ui, model: &PlotModel, style: &PlotStyle) {
    let x_step = model.x_grid_step;
    let y_step = model.y_grid_step;
    let (x_min, x_max) = model.x_range;
    let (y_min, y_max) = model.y_range;
    Plot::new("capture_plot")
        .x_axis_label(model.x_label)
        .y_axis_label("Volt")
        .x_grid_spacer(uniform_grid_spacer(move |_| [x_step, x_step * 5.0, x_step * 10.0]))
        .y_grid_spacer(uniform_grid_spacer(move |_| [y_step / 5.0, y_step, y_step * 4.0]))
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            plot_ui.set_plot_bounds(PlotBounds::from_min_max([x_min, y_min], [x_max, y_max]));
            plot_ui.line(
                Line::new(PlotPoints::new(model.trigger.to_vec()))
                    .color(style.trigger)
                    .style(LineStyle::dotted_dense())
                    .name("Trigger"),
            );
            plot_ui.line(
                Line::new(PlotPoints::new(model.trace.clone()))
                    .color(style.trace)
                    .name("CH1"),
            );
        });
}
