use eframe::egui::{self, Color32, RichText, Ui};

use crate::dispatch::{TableView, UiEvent};
use crate::state::AppState;
use crate::ui::range_slider::YearRangeSlider;

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the title bar with dataset summary and export action.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.heading("Electricity Prices by US State");
        ui.separator();

        let ds = state.dataset();
        ui.label(format!(
            "{} rows, {}–{}",
            ds.len(),
            ds.year_min,
            ds.year_max
        ));

        ui.separator();

        let can_export = matches!(state.dispatcher.table(), TableView::Showing { .. });
        if ui
            .add_enabled(can_export, egui::Button::new("Export rows…"))
            .clicked()
        {
            save_file_dialog(state);
        }

        if let Some(msg) = &state.status_message {
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// Year range control
// ---------------------------------------------------------------------------

/// Render the year range slider. Changes raise [`UiEvent::YearRangeChanged`].
pub fn year_controls(ui: &mut Ui, state: &mut AppState) {
    let bounds = state.dataset().full_range();
    let mut years = state.dispatcher.selection().years;

    ui.horizontal(|ui: &mut Ui| {
        ui.strong("Years");
        ui.label(years.to_string());
        if ui
            .add_enabled(years != bounds, egui::Button::new("All years").small())
            .clicked()
        {
            years = bounds;
        }
    });
    ui.add(YearRangeSlider::new(&mut years, bounds));

    if years != state.dispatcher.selection().years {
        state.emit(UiEvent::YearRangeChanged(years));
    }
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn save_file_dialog(state: &mut AppState) {
    let name = match state.dispatcher.table() {
        TableView::Showing { state: code, .. } => format!("{code}_electricity.csv"),
        TableView::Idle => "electricity.csv".to_string(),
    };

    let file = rfd::FileDialog::new()
        .set_title("Export table rows")
        .set_file_name(name)
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .save_file();

    if let Some(path) = file {
        match state.export_table(&path) {
            Ok(n) => {
                log::info!("Exported {n} rows to {}", path.display());
                state.status_message = None;
            }
            Err(e) => {
                log::error!("Failed to export rows: {e:#}");
                state.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }
}
