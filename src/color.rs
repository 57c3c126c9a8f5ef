use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

// ---------------------------------------------------------------------------
// Sequential "reds" colour scale
// ---------------------------------------------------------------------------

/// Colour for tiles without data in the current selection.
pub const NO_DATA_COLOR: Color32 = Color32::from_gray(70);

const HUE: f32 = 0.0;
const SATURATION: f32 = 0.80;
const LIGHTNESS_LOW: f32 = 0.92;
const LIGHTNESS_HIGH: f32 = 0.28;

/// Position `t` in `[0, 1]` on the pale → dark red ramp.
pub fn reds(t: f32) -> Color32 {
    let t = t.clamp(0.0, 1.0);
    let lightness = LIGHTNESS_LOW + (LIGHTNESS_HIGH - LIGHTNESS_LOW) * t;
    let hsl = Hsl::new(HUE, SATURATION, lightness);
    let rgb: Srgb = hsl.into_color();
    Color32::from_rgb(
        (rgb.red * 255.0).round() as u8,
        (rgb.green * 255.0).round() as u8,
        (rgb.blue * 255.0).round() as u8,
    )
}

/// Maps numeric values in `[min, max]` onto the reds ramp.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorScale {
    pub min: f64,
    pub max: f64,
}

impl ColorScale {
    pub fn new(min: f64, max: f64) -> Self {
        ColorScale { min, max }
    }

    /// Relative position of `value` on the scale. A degenerate scale puts
    /// every value in the middle.
    pub fn position(&self, value: f64) -> f32 {
        let span = self.max - self.min;
        if span.abs() < f64::EPSILON {
            return 0.5;
        }
        ((value - self.min) / span).clamp(0.0, 1.0) as f32
    }

    pub fn color_for(&self, value: f64) -> Color32 {
        reds(self.position(value))
    }

    /// Evenly spaced (value, colour) stops for the legend.
    pub fn legend_stops(&self, n: usize) -> Vec<(f64, Color32)> {
        if n < 2 {
            return vec![(self.min, self.color_for(self.min))];
        }
        (0..n)
            .map(|i| {
                let value = self.min + (self.max - self.min) * i as f64 / (n - 1) as f64;
                (value, self.color_for(value))
            })
            .collect()
    }
}
