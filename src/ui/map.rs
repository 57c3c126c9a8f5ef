use eframe::egui::{
    pos2, vec2, Align2, Color32, FontId, Rect, RichText, Sense, Stroke, StrokeKind, Ui,
};

use crate::color::NO_DATA_COLOR;
use crate::dispatch::{MapFigure, UiEvent};
use crate::geo::{tile_at, GRID_COLS, GRID_ROWS, STATE_TILES};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Choropleth (central panel)
// ---------------------------------------------------------------------------

const LEGEND_HEIGHT: f32 = 36.0;
const TILE_GAP: f32 = 3.0;

/// Render the tile map coloured by mean residential price. Clicking a tile
/// raises [`UiEvent::StateClicked`].
pub fn choropleth(ui: &mut Ui, state: &mut AppState) {
    let Some(figure) = state.dispatcher.map() else {
        return;
    };
    let selected = state.dispatcher.selection().clicked_state.as_deref();

    // Square tiles, as large as the panel allows.
    let avail = ui.available_size() - vec2(0.0, LEGEND_HEIGHT);
    let cell = (avail.x / GRID_COLS as f32)
        .min(avail.y / GRID_ROWS as f32)
        .max(12.0);
    let size = vec2(cell * GRID_COLS as f32, cell * GRID_ROWS as f32);

    let (rect, response) = ui.allocate_exact_size(size, Sense::click());
    let painter = ui.painter_at(rect);

    for tile in STATE_TILES {
        let min = rect.min + vec2(tile.col as f32 * cell, tile.row as f32 * cell);
        let tile_rect = Rect::from_min_size(min, vec2(cell, cell)).shrink(TILE_GAP / 2.0);

        let (fill, dark) = match (figure.averages.get(tile.code), figure.scale) {
            (Some(mean), Some(scale)) => {
                let t = scale.position(mean);
                (scale.color_for(mean), t > 0.5)
            }
            _ => (NO_DATA_COLOR, true),
        };
        painter.rect_filled(tile_rect, 3.0, fill);
        if selected == Some(tile.code) {
            painter.rect_stroke(
                tile_rect,
                3.0,
                Stroke::new(2.5, ui.visuals().strong_text_color()),
                StrokeKind::Inside,
            );
        }
        painter.text(
            tile_rect.center(),
            Align2::CENTER_CENTER,
            tile.code,
            FontId::proportional((cell * 0.3).clamp(8.0, 18.0)),
            if dark { Color32::WHITE } else { Color32::BLACK },
        );
    }

    // Map pointer position to the tile under it.
    let tile_under = |pos: eframe::egui::Pos2| {
        let rel = pos - rect.min;
        if rel.x < 0.0 || rel.y < 0.0 {
            return None;
        }
        let col = (rel.x / cell) as u32;
        let row = (rel.y / cell) as u32;
        if col >= GRID_COLS as u32 || row >= GRID_ROWS as u32 {
            return None;
        }
        tile_at(col as u8, row as u8)
    };

    let clicked = if response.clicked() {
        response.interact_pointer_pos().and_then(tile_under)
    } else {
        None
    };

    let hovered = response.hover_pos().and_then(tile_under);
    if let Some(tile) = hovered {
        let mean = figure.averages.get(tile.code);
        let rows = figure.averages.row_count(tile.code);
        let years = figure.years;
        response.on_hover_ui_at_pointer(|ui: &mut Ui| {
            ui.strong(format!("{} ({})", tile.name, tile.code));
            match mean {
                Some(mean) => {
                    ui.label(format!("Residential price: {mean:.2}"));
                    ui.label(format!("{rows} rows, {years}"));
                }
                None => {
                    ui.label(format!("No data for {years}"));
                }
            }
        });
    }

    legend(ui, figure);

    if let Some(tile) = clicked {
        log::debug!("map click on {}", tile.code);
        state.emit(UiEvent::StateClicked(tile.code.to_string()));
    }
}

fn legend(ui: &mut Ui, figure: &MapFigure) {
    let years = figure.years;
    ui.horizontal(|ui: &mut Ui| {
        let Some(scale) = figure.scale else {
            ui.label(RichText::new(format!("No prices for {years}")).italics());
            return;
        };
        ui.label(format!(
            "Mean residential price, {years} ({} states):",
            figure.averages.len()
        ));

        let stops = scale.legend_stops(5);
        let (bar, _) = ui.allocate_exact_size(vec2(220.0, 14.0), Sense::hover());
        let step = bar.width() / stops.len() as f32;
        for (i, (_, color)) in stops.iter().enumerate() {
            let x = bar.left() + step * i as f32;
            ui.painter().rect_filled(
                Rect::from_min_max(pos2(x, bar.top()), pos2(x + step, bar.bottom())),
                0.0,
                *color,
            );
        }
        ui.label(format!("{:.2} – {:.2}", scale.min, scale.max));

        ui.add_space(12.0);
        let (swatch, _) = ui.allocate_exact_size(vec2(14.0, 14.0), Sense::hover());
        ui.painter().rect_filled(swatch, 2.0, NO_DATA_COLOR);
        ui.label("no data");
    });
}
