use std::f64::consts::{PI, TAU};

/// Outer edge of the radial scale
pub const SCALE_MAX: f64 = 5.0;

/// Values that get a gridline ring
pub const GRID_LEVELS: [u8; 5] = [1, 2, 3, 4, 5];

/// How far past the outer ring facet labels sit, in score units
pub const LABEL_OFFSET: f64 = 0.35;

pub const TITLE: &str = "Financial Balance Wheel";

/// Fraction of the angular slot a wedge occupies
const WEDGE_FILL: f64 = 0.9;

/// Arc segments per wedge outline
const WEDGE_SEGMENTS: usize = 16;

/// Pixel geometry of the wheel.
///
/// Position 0 is at the top and positions advance clockwise. Two layouts
/// built from the same size and spoke count are equal.
#[derive(Debug, Clone, PartialEq)]
pub struct WheelLayout {
    pub width: u32,
    pub height: u32,
    pub center: (f64, f64),
    /// Pixels per score point
    pub unit: f64,
    pub spokes: usize,
}

impl WheelLayout {
    pub fn new(size_px: u32, spokes: usize) -> Self {
        let size = f64::from(size_px);
        Self {
            width: size_px,
            height: size_px,
            // nudged down to leave room for the title
            center: (size / 2.0, size * 0.54),
            unit: size * 0.34 / SCALE_MAX,
            spokes,
        }
    }

    /// Angle of spoke `i` in radians, measured clockwise from the top
    pub fn angle(&self, i: usize) -> f64 {
        TAU * i as f64 / self.spokes as f64
    }

    /// Pixel position at `angle` (clockwise from top) and score `value`
    pub fn point(&self, angle: f64, value: f64) -> (f64, f64) {
        let r = value * self.unit;
        (self.center.0 + r * angle.sin(), self.center.1 - r * angle.cos())
    }

    pub fn vertex(&self, i: usize, value: f64) -> (f64, f64) {
        self.point(self.angle(i), value)
    }

    pub fn radius(&self, value: f64) -> f64 {
        value * self.unit
    }

    pub fn label_anchor(&self, i: usize) -> (f64, f64) {
        self.vertex(i, SCALE_MAX + LABEL_OFFSET)
    }

    /// Tick labels sit halfway between the first two spokes
    pub fn tick_anchor(&self, level: u8) -> (f64, f64) {
        self.point(PI / self.spokes as f64, f64::from(level))
    }

    pub fn title_anchor(&self) -> (f64, f64) {
        (self.center.0, f64::from(self.height) * 0.06)
    }

    pub fn wedge_width(&self) -> f64 {
        TAU / self.spokes as f64 * WEDGE_FILL
    }

    /// Closed outline of the wedge for spoke `i` reaching out to `value`
    pub fn wedge(&self, i: usize, value: f64) -> Vec<(f64, f64)> {
        let mid = self.angle(i);
        let half = self.wedge_width() / 2.0;
        let mut points = Vec::with_capacity(WEDGE_SEGMENTS + 3);
        points.push(self.center);
        for step in 0..=WEDGE_SEGMENTS {
            let a = mid - half + self.wedge_width() * step as f64 / WEDGE_SEGMENTS as f64;
            points.push(self.point(a, value));
        }
        points.push(self.center);
        points
    }

    pub fn text_size(&self) -> f64 {
        f64::from(self.width) / 50.0
    }

    pub fn title_size(&self) -> f64 {
        f64::from(self.width) / 36.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: (f64, f64), b: (f64, f64)) -> bool {
        (a.0 - b.0).abs() < 1e-6 && (a.1 - b.1).abs() < 1e-6
    }

    #[test]
    fn test_first_spoke_points_up() {
        let layout = WheelLayout::new(1000, 8);
        let (cx, cy) = layout.center;
        let top = layout.vertex(0, 5.0);
        assert!(close(top, (cx, cy - 5.0 * layout.unit)));
    }

    #[test]
    fn test_spokes_advance_clockwise() {
        let layout = WheelLayout::new(1000, 8);
        let (cx, cy) = layout.center;
        // a quarter turn clockwise from the top is the right-hand side
        let right = layout.vertex(2, 1.0);
        assert!(close(right, (cx + layout.unit, cy)));
        let bottom = layout.vertex(4, 1.0);
        assert!(close(bottom, (cx, cy + layout.unit)));
    }

    #[test]
    fn test_spokes_are_equidistant() {
        let layout = WheelLayout::new(800, 8);
        for i in 0..8 {
            let step = layout.angle(i + 1) - layout.angle(i);
            assert!((step - TAU / 8.0).abs() < 1e-12);
        }
    }

    #[test]
    fn test_labels_sit_outside_the_scale() {
        let layout = WheelLayout::new(1134, 8);
        let (cx, cy) = layout.center;
        for i in 0..8 {
            let (x, y) = layout.label_anchor(i);
            let dist = ((x - cx).powi(2) + (y - cy).powi(2)).sqrt();
            assert!(dist > layout.radius(SCALE_MAX));
            assert!(x > 0.0 && x < 1134.0 && y > 0.0 && y < 1134.0);
        }
    }

    #[test]
    fn test_wedge_is_closed_at_center() {
        let layout = WheelLayout::new(600, 8);
        let wedge = layout.wedge(3, 4.0);
        assert_eq!(wedge.first(), Some(&layout.center));
        assert_eq!(wedge.last(), Some(&layout.center));
        assert_eq!(wedge.len(), WEDGE_SEGMENTS + 3);
    }
}
