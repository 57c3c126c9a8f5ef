use std::sync::Arc;

use eframe::egui;

use crate::data::model::Dataset;
use crate::state::AppState;
use crate::ui::{map, panels, plot, table};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct DashboardApp {
    pub state: AppState,
}

impl DashboardApp {
    pub fn new(dataset: Arc<Dataset>) -> Self {
        Self {
            state: AppState::new(dataset),
        }
    }
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: title bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Year range control ----
        egui::TopBottomPanel::top("year_slider").show(ctx, |ui| {
            panels::year_controls(ui, &mut self.state);
        });

        // ---- Bottom panel: detail table + trend ----
        egui::TopBottomPanel::bottom("price_info")
            .default_height(280.0)
            .resizable(true)
            .show(ctx, |ui| {
                ui.columns(2, |cols| {
                    table::detail_table(&mut cols[0], &self.state);
                    plot::trend_plot(&mut cols[1], &self.state);
                });
            });

        // ---- Central panel: map ----
        egui::CentralPanel::default().show(ctx, |ui| {
            map::choropleth(ui, &mut self.state);
        });

        if !self.state.pending.is_empty() {
            self.state.flush_events();
            ctx.request_repaint();
        }
    }
}
