use eframe::egui::{self, pos2, Align2, FontId, Rect, Response, Sense, Stroke, Ui, Vec2, Widget};

use crate::data::model::YearRange;

const HEIGHT: f32 = 46.0;
const KNOB_RADIUS: f32 = 8.0;
const TRACK_Y: f32 = 14.0;
const LABEL_WIDTH: f32 = 34.0;

/// Two-handle slider over whole years, with a tick for every year.
///
/// Clicking or dragging moves whichever handle is closer to the pointer.
pub struct YearRangeSlider<'a> {
    range: &'a mut YearRange,
    bounds: YearRange,
}

impl<'a> YearRangeSlider<'a> {
    pub fn new(range: &'a mut YearRange, bounds: YearRange) -> Self {
        Self { range, bounds }
    }
}

impl Widget for YearRangeSlider<'_> {
    fn ui(self, ui: &mut Ui) -> Response {
        let desired = Vec2::new(ui.available_width().max(120.0), HEIGHT);
        let (rect, mut response) = ui.allocate_exact_size(desired, Sense::click_and_drag());

        let bounds = self.bounds;
        let span = (bounds.hi - bounds.lo).max(1);
        let left = rect.left() + KNOB_RADIUS + LABEL_WIDTH / 2.0;
        let right = rect.right() - KNOB_RADIUS - LABEL_WIDTH / 2.0;
        let width = (right - left).max(1.0);
        let y = rect.top() + TRACK_Y;

        let x_of = |year: i64| left + width * (year - bounds.lo) as f32 / span as f32;
        let year_at = |x: f32| {
            let t = ((x - left) / width).clamp(0.0, 1.0);
            bounds.lo + (t * span as f32).round() as i64
        };

        if let Some(pointer) = response.interact_pointer_pos() {
            let before = *self.range;
            let year = year_at(pointer.x);
            let d_lo = (x_of(self.range.lo) - pointer.x).abs();
            let d_hi = (x_of(self.range.hi) - pointer.x).abs();
            let move_lo = d_lo < d_hi || (d_lo == d_hi && pointer.x < x_of(self.range.lo));
            if move_lo {
                self.range.lo = year;
            } else {
                self.range.hi = year;
            }
            if self.range.lo > self.range.hi {
                std::mem::swap(&mut self.range.lo, &mut self.range.hi);
            }
            if *self.range != before {
                response.mark_changed();
            }
        }

        if ui.is_rect_visible(rect) {
            let visuals = ui.visuals();
            let painter = ui.painter();
            let track_color = visuals.widgets.inactive.bg_fill;
            let selected_color = visuals.selection.bg_fill;
            let text_color = visuals.text_color();
            let tick_stroke = Stroke::new(1.0, visuals.weak_text_color());

            painter.rect_filled(
                Rect::from_min_max(pos2(left, y - 2.0), pos2(right, y + 2.0)),
                2.0,
                track_color,
            );
            painter.rect_filled(
                Rect::from_min_max(
                    pos2(x_of(self.range.lo), y - 3.0),
                    pos2(x_of(self.range.hi), y + 3.0),
                ),
                2.0,
                selected_color,
            );

            // Label every n-th year so labels never overlap.
            let years = bounds.hi - bounds.lo + 1;
            let per_label = ((LABEL_WIDTH * years as f32) / width).ceil().max(1.0) as i64;
            for year in bounds.lo..=bounds.hi {
                let x = x_of(year);
                painter.line_segment([pos2(x, y + 5.0), pos2(x, y + 10.0)], tick_stroke);
                if (year - bounds.lo) % per_label == 0 || year == bounds.hi {
                    painter.text(
                        pos2(x, y + 12.0),
                        Align2::CENTER_TOP,
                        year.to_string(),
                        FontId::proportional(11.0),
                        text_color,
                    );
                }
            }

            for year in [self.range.lo, self.range.hi] {
                let center = pos2(x_of(year), y);
                painter.circle_filled(center, KNOB_RADIUS, selected_color);
                painter.circle_stroke(center, KNOB_RADIUS, Stroke::new(1.5, text_color));
            }
        }

        response.on_hover_cursor(egui::CursorIcon::PointingHand)
    }
}
