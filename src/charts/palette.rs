//! Colors and marker sizing shared by the interactive and static renderers.

use serde::Serialize;

/// Plain RGB color, independent of any drawing backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub fn to_hex(self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.0, self.1, self.2)
    }

    fn lerp(self, other: Rgb, t: f64) -> Rgb {
        let mix = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * t).round() as u8;
        Rgb(
            mix(self.0, other.0),
            mix(self.1, other.1),
            mix(self.2, other.2),
        )
    }
}

/// D3 qualitative palette, used for per-player and per-category colors.
pub const D3: [Rgb; 10] = [
    Rgb(31, 119, 180),  // Blue
    Rgb(255, 127, 14),  // Orange
    Rgb(44, 160, 44),   // Green
    Rgb(214, 39, 40),   // Red
    Rgb(148, 103, 189), // Purple
    Rgb(140, 86, 75),   // Brown
    Rgb(227, 119, 194), // Pink
    Rgb(127, 127, 127), // Grey
    Rgb(188, 189, 34),  // Olive
    Rgb(23, 190, 207),  // Cyan
];

/// Viridis stops for continuous color encodings.
const VIRIDIS: [Rgb; 10] = [
    Rgb(68, 1, 84),
    Rgb(72, 40, 120),
    Rgb(62, 73, 137),
    Rgb(49, 104, 142),
    Rgb(38, 130, 142),
    Rgb(31, 158, 137),
    Rgb(53, 183, 121),
    Rgb(110, 206, 88),
    Rgb(181, 222, 43),
    Rgb(253, 231, 37),
];

/// Actual SLG in the power gap chart.
pub const ACTUAL_COLOR: Rgb = Rgb(214, 39, 40);
/// Expected SLG in the power gap chart.
pub const EXPECTED_COLOR: Rgb = Rgb(44, 160, 44);
/// Connector between the two lollipop heads.
pub const CONNECTOR_COLOR: Rgb = Rgb(170, 170, 170);
/// Population density curve and rug ticks.
pub const CURVE_COLOR: Rgb = Rgb(0, 0, 0);

pub const MIN_MARKER_RADIUS: f32 = 3.0;
pub const MAX_MARKER_RADIUS: f32 = 12.0;

/// Palette color for the `index`-th series, cycling.
pub fn categorical(index: usize) -> Rgb {
    D3[index % D3.len()]
}

/// Position of `value` within `[min, max]`, clamped to `[0, 1]`.
/// A zero-width range maps everything to the middle.
pub fn normalize(value: f64, min: f64, max: f64) -> f64 {
    let span = max - min;
    if !(span > 0.0) || !value.is_finite() {
        return 0.5;
    }
    ((value - min) / span).clamp(0.0, 1.0)
}

/// Continuous color for `t` in `[0, 1]`.
pub fn colorscale(t: f64) -> Rgb {
    let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.5 };
    let scaled = t * (VIRIDIS.len() - 1) as f64;
    let lower = scaled.floor() as usize;
    let upper = (lower + 1).min(VIRIDIS.len() - 1);
    VIRIDIS[lower].lerp(VIRIDIS[upper], scaled - lower as f64)
}

/// Marker radius for `t` in `[0, 1]`.
pub fn marker_radius(t: f64) -> f32 {
    let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.5 };
    MIN_MARKER_RADIUS + (MAX_MARKER_RADIUS - MIN_MARKER_RADIUS) * t as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn colorscale_hits_endpoints() {
        assert_eq!(colorscale(0.0), VIRIDIS[0]);
        assert_eq!(colorscale(1.0), VIRIDIS[9]);
        assert_eq!(colorscale(-3.0), VIRIDIS[0]);
    }

    #[test]
    fn normalize_handles_flat_range() {
        assert_eq!(normalize(5.0, 5.0, 5.0), 0.5);
        assert_eq!(normalize(7.5, 5.0, 10.0), 0.5);
        assert_eq!(normalize(20.0, 5.0, 10.0), 1.0);
    }

    #[test]
    fn categorical_cycles() {
        assert_eq!(categorical(0), categorical(10));
        assert_eq!(Rgb(31, 119, 180).to_hex(), "#1F77B4");
    }

    #[test]
    fn radius_spans_marker_range() {
        assert_eq!(marker_radius(0.0), MIN_MARKER_RADIUS);
        assert_eq!(marker_radius(1.0), MAX_MARKER_RADIUS);
    }
}
