//! Chart colors.

use plotters::style::RGBColor;

/// Bar fill
pub const BAR_COLOR: RGBColor = RGBColor(52, 152, 219);

/// Title and axis description color (darkblue)
pub const TITLE_COLOR: RGBColor = RGBColor(0, 0, 139);

/// Qualitative palette for per-country lines (ColorBrewer Set1)
pub const SET1: [RGBColor; 9] = [
    RGBColor(228, 26, 28),   // Red
    RGBColor(55, 126, 184),  // Blue
    RGBColor(77, 175, 74),   // Green
    RGBColor(152, 78, 163),  // Purple
    RGBColor(255, 127, 0),   // Orange
    RGBColor(255, 255, 51),  // Yellow
    RGBColor(166, 86, 40),   // Brown
    RGBColor(247, 129, 191), // Pink
    RGBColor(153, 153, 153), // Grey
];

/// Pie slices, cycled
pub const PIE_COLORS: [RGBColor; 2] = [RGBColor(0xff, 0x99, 0x99), RGBColor(0x66, 0xb3, 0xff)];

const COOL: (f64, f64, f64) = (59.0, 76.0, 192.0);
const NEUTRAL: (f64, f64, f64) = (221.0, 221.0, 221.0);
const WARM: (f64, f64, f64) = (180.0, 4.0, 38.0);
const MISSING: RGBColor = RGBColor(235, 235, 235);

pub fn series_color(index: usize) -> RGBColor {
    SET1[index % SET1.len()]
}

pub fn pie_color(index: usize) -> RGBColor {
    PIE_COLORS[index % PIE_COLORS.len()]
}

fn lerp(a: (f64, f64, f64), b: (f64, f64, f64), t: f64) -> RGBColor {
    let ch = |x: f64, y: f64| (x + (y - x) * t).round().clamp(0.0, 255.0) as u8;
    RGBColor(ch(a.0, b.0), ch(a.1, b.1), ch(a.2, b.2))
}

/// Diverging blue-grey-red map over [-1, 1]. NaN maps to light grey.
pub fn coolwarm(value: f64) -> RGBColor {
    if value.is_nan() {
        return MISSING;
    }
    let v = value.clamp(-1.0, 1.0);
    if v < 0.0 {
        lerp(NEUTRAL, COOL, -v)
    } else {
        lerp(NEUTRAL, WARM, v)
    }
}

/// Whether annotation text on this cell value should be light.
pub fn needs_light_text(value: f64) -> bool {
    !value.is_nan() && value.abs() >= 0.6
}
