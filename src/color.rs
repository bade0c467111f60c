use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    (0..n)
        .map(|i| {
            let hue = ((i as f32 / n as f32) * 360.0 + 210.0) % 360.0;
            let hsl = Hsl::new(hue, 0.70, 0.55);
            let rgb: Srgb = hsl.into_color();
            Color32::from_rgb(
                (rgb.red * 255.0) as u8,
                (rgb.green * 255.0) as u8,
                (rgb.blue * 255.0) as u8,
            )
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Per-plot colours
// ---------------------------------------------------------------------------

/// One colour per diagnostic plot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeriesColors {
    pub angle_vs_time: Color32,
    pub angle_vs_frame: Color32,
    pub histogram: Color32,
    pub delta_vs_frame: Color32,
}

impl Default for SeriesColors {
    fn default() -> Self {
        match generate_palette(4).as_slice() {
            &[a, b, c, d] => SeriesColors {
                angle_vs_time: a,
                angle_vs_frame: b,
                histogram: c,
                delta_vs_frame: d,
            },
            _ => SeriesColors {
                angle_vs_time: Color32::LIGHT_BLUE,
                angle_vs_frame: Color32::LIGHT_BLUE,
                histogram: Color32::LIGHT_BLUE,
                delta_vs_frame: Color32::LIGHT_BLUE,
            },
        }
    }
}
