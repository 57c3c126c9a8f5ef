use eframe::egui::{Align, Layout, RichText, Ui};
use egui_extras::{Column, TableBuilder};

use crate::dispatch::TableView;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Detail table
// ---------------------------------------------------------------------------

/// Render the raw rows of the clicked state, one column per dataset column.
pub fn detail_table(ui: &mut Ui, state: &AppState) {
    let columns = &state.dataset().columns;

    let view = state.dispatcher.table();
    match view {
        TableView::Idle => {
            ui.label(RichText::new("Click a state on the map to list its rows.").italics());
            return;
        }
        TableView::Showing { state: code, years, rows } => {
            ui.strong(format!("{code}, {years}: {} rows", rows.len()));
        }
    }
    let rows = view.rows();

    TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .cell_layout(Layout::left_to_right(Align::Center))
        .columns(Column::auto().at_least(60.0), columns.len())
        .header(20.0, |mut header| {
            for col in columns {
                header.col(|ui: &mut Ui| {
                    ui.strong(col);
                });
            }
        })
        .body(|body| {
            body.rows(18.0, rows.len(), |mut row| {
                let rec = &rows[row.index()];
                for cell in &rec.cells {
                    row.col(|ui: &mut Ui| {
                        ui.label(cell.to_string());
                    });
                }
            });
        });
}
