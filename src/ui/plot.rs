use eframe::egui::{Color32, Ui};
use egui_plot::{Line, Plot, PlotPoints, Points};

use crate::state::AppState;

// ---------------------------------------------------------------------------
// Price trend of the clicked state
// ---------------------------------------------------------------------------

/// Render the yearly mean residential price of the clicked state.
pub fn trend_plot(ui: &mut Ui, state: &AppState) {
    let Some(code) = state.dispatcher.selection().clicked_state.as_deref() else {
        return;
    };
    let trend = state.dispatcher.trend();

    Plot::new("trend_plot")
        .legend(egui_plot::Legend::default())
        .x_axis_label("Year")
        .y_axis_label("Residential Price")
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            let points: Vec<[f64; 2]> = trend
                .iter()
                .map(|&(year, price)| [year as f64, price])
                .collect();

            plot_ui.line(
                Line::new(PlotPoints::from(points.clone()))
                    .name(code)
                    .color(Color32::from_rgb(200, 40, 40))
                    .width(1.5),
            );
            plot_ui.points(
                Points::new(PlotPoints::from(points))
                    .color(Color32::from_rgb(200, 40, 40))
                    .radius(3.0),
            );
        });
}
