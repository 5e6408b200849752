use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Mix, Srgb};

// ---------------------------------------------------------------------------
// Categorical palette (genre donut)
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            to_color32(Hsl::new(hue, 0.75, 0.55))
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Sequential scale (country bars)
// ---------------------------------------------------------------------------

/// Light-to-dark red ramp: `t = 0` is the palest shade, `t = 1` the deepest.
pub fn reds(t: f32) -> Color32 {
    let pale = Hsl::new(0.0, 0.85, 0.88);
    let deep = Hsl::new(355.0, 0.90, 0.35);
    to_color32(pale.mix(deep, t.clamp(0.0, 1.0)))
}

/// Colour each count by its share of the largest one.
pub fn reds_for_counts(counts: &[usize]) -> Vec<Color32> {
    let max = counts.iter().copied().max().unwrap_or(0);
    counts
        .iter()
        .map(|&n| if max == 0 { reds(0.0) } else { reds(n as f32 / max as f32) })
        .collect()
}

fn to_color32(hsl: Hsl) -> Color32 {
    let rgb: Srgb = hsl.into_color();
    Color32::from_rgb(
        (rgb.red * 255.0) as u8,
        (rgb.green * 255.0) as u8,
        (rgb.blue * 255.0) as u8,
    )
}
