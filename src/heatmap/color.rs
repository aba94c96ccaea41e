//! Occupancy color scale.
//!
//! Counts map onto a four-stop palette (white through yellow and red to
//! purple) anchored at thirds of the current maximum, with each RGB channel
//! interpolated linearly between the bracketing stops. The function is pure:
//! the same `(count, max)` pair always produces the same color, which the
//! snapshot tests rely on.

use std::fmt;

/// Simple RGB color, displayed as a CSS hex literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Palette stops at domain points `0, max/3, 2*max/3, max`.
pub const STOPS: [Rgb; 4] = [
    Rgb::new(0xff, 0xff, 0xff), // white    (idle)
    Rgb::new(0xfc, 0xf8, 0x81), // yellow
    Rgb::new(0xeb, 0x00, 0x00), // red
    Rgb::new(0x80, 0x00, 0x80), // purple   (busiest)
];

/// Fill for a detail-view block with a course in session.
pub const OCCUPIED: Rgb = Rgb::new(0xcf, 0xb9, 0x88);
/// Fill for a detail-view block with no course.
pub const VACANT: Rgb = Rgb::new(0xff, 0xff, 0xff);

/// Map an occupancy count onto the palette for a scale topping out at `max`.
///
/// A zero `max` (nothing in use anywhere in the filtered set) pins the whole
/// scale to white rather than dividing by zero. Counts outside `0..=max`
/// clamp to the end stops.
pub fn color_for(count: u32, max: u32) -> Rgb {
    if max == 0 {
        return STOPS[0];
    }

    let t = (f64::from(count) / f64::from(max)).clamp(0.0, 1.0);
    let segments = (STOPS.len() - 1) as f64;
    let position = t * segments;
    let index = (position as usize).min(STOPS.len() - 2);
    let fraction = position - index as f64;

    let lo = STOPS[index];
    let hi = STOPS[index + 1];
    Rgb::new(
        lerp(lo.r, hi.r, fraction),
        lerp(lo.g, hi.g, fraction),
        lerp(lo.b, hi.b, fraction),
    )
}

fn lerp(lo: u8, hi: u8, fraction: f64) -> u8 {
    (f64::from(lo) + (f64::from(hi) - f64::from(lo)) * fraction).round() as u8
}

/// Gradient stops for the legend strip as `(offset-percent, color)` pairs,
/// evenly spaced to mirror the heatmap's domain thirds.
pub fn legend_stops() -> Vec<(f64, Rgb)> {
    let step = 100.0 / (STOPS.len() - 1) as f64;
    STOPS
        .iter()
        .enumerate()
        .map(|(i, &color)| (step * i as f64, color))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_hit_the_outer_stops() {
        assert_eq!(color_for(0, 12), STOPS[0]);
        assert_eq!(color_for(12, 12), STOPS[3]);
    }

    #[test]
    fn zero_max_is_always_white() {
        for count in [0, 1, 7, 500] {
            assert_eq!(color_for(count, 0), STOPS[0]);
        }
    }

    #[test]
    fn interior_stops_are_exact_at_thirds() {
        assert_eq!(color_for(4, 12), STOPS[1]);
        assert_eq!(color_for(8, 12), STOPS[2]);
    }

    #[test]
    fn counts_beyond_max_clamp_to_purple() {
        assert_eq!(color_for(99, 12), STOPS[3]);
    }

    #[test]
    fn interpolation_stays_between_stops() {
        // Halfway through the first segment: every channel between the
        // white and yellow stop values.
        let mid = color_for(2, 12);
        assert!(mid.r >= STOPS[1].r && mid.r <= STOPS[0].r);
        assert!(mid.b >= STOPS[1].b && mid.b <= STOPS[0].b);
    }

    #[test]
    fn hex_formatting() {
        assert_eq!(STOPS[1].to_string(), "#fcf881");
        assert_eq!(STOPS[3].to_string(), "#800080");
        assert_eq!(OCCUPIED.to_string(), "#cfb988");
    }

    #[test]
    fn legend_offsets_are_even() {
        let stops = legend_stops();
        assert_eq!(stops.len(), 4);
        assert_eq!(stops[0].0, 0.0);
        assert_eq!(stops[3].0, 100.0);
        assert_eq!(stops[1].1, STOPS[1]);
    }
}
