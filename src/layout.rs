use std::fmt;

use clap::ValueEnum;

use crate::angle::DivisionScheme;

/// Index of a dial within the current mode, left to right.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DialId(pub usize);

impl DialId {
    /// The leftmost dial, the only one that plots markers.
    pub const PRIMARY: DialId = DialId(0);

    pub fn is_primary(self) -> bool {
        self == Self::PRIMARY
    }
}

impl fmt::Display for DialId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Which dials are shown side by side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum DialMode {
    #[default]
    Single,
    Bi,
    Tri,
}

impl DialMode {
    pub fn schemes(self) -> &'static [DivisionScheme] {
        match self {
            Self::Single => &[DivisionScheme::Ninety],
            Self::Bi => &[DivisionScheme::Ninety, DivisionScheme::OneTwenty],
            Self::Tri => &[
                DivisionScheme::Ninety,
                DivisionScheme::OneTwenty,
                DivisionScheme::OneEighty,
            ],
        }
    }

    pub fn dial_count(self) -> usize {
        self.schemes().len()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Point at `radius` from `self` along screen angle `angle`.
    pub fn polar(self, radius: f64, angle: f64) -> Self {
        Self::new(self.x + radius * angle.cos(), self.y + radius * angle.sin())
    }
}

/// Pixel rectangle on the drawing surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    pub x: usize,
    pub y: usize,
    pub width: usize,
    pub height: usize,
}

impl Rect {
    pub const fn new(x: usize, y: usize, width: usize, height: usize) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// One gauge of the current frame. Rebuilt from the surface bounds every
/// frame and never mutated afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct Dial {
    pub id: DialId,
    pub scheme: DivisionScheme,
    /// Center in surface coordinates.
    pub center: Point,
    pub radius: f64,
    /// The part of the surface this dial's static layer is blitted into.
    pub slot: Rect,
}

impl Dial {
    /// Center relative to the dial's own slot, i.e. inside its layer.
    pub fn local_center(&self) -> Point {
        Point::new(
            self.center.x - self.slot.x as f64,
            self.center.y - self.slot.y as f64,
        )
    }
}

/// Splits the surface into equal vertical strips, one per dial, with a
/// shared radius that fits the narrowest constraint. Empty bounds produce
/// no dials.
pub fn layout(width: usize, height: usize, mode: DialMode, margin_divisor: f64) -> Vec<Dial> {
    if width == 0 || height == 0 {
        return Vec::new();
    }
    let count = mode.dial_count();
    let strip = width / count;
    if strip == 0 {
        return Vec::new();
    }
    let radius = strip.min(height) as f64 / margin_divisor;

    mode.schemes()
        .iter()
        .enumerate()
        .map(|(index, &scheme)| {
            let x = index * width / count;
            let slot_width = (index + 1) * width / count - x;
            Dial {
                id: DialId(index),
                scheme,
                center: Point::new(x as f64 + slot_width as f64 / 2.0, height as f64 / 2.0),
                radius,
                slot: Rect::new(x, 0, slot_width, height),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bi_mode_places_centers_at_quarters() {
        let dials = layout(800, 400, DialMode::Bi, 2.2);
        assert_eq!(dials.len(), 2);
        assert_eq!(dials[0].center, Point::new(200.0, 200.0));
        assert_eq!(dials[1].center, Point::new(600.0, 200.0));
        assert_eq!(dials[0].scheme, DivisionScheme::Ninety);
        assert_eq!(dials[1].scheme, DivisionScheme::OneTwenty);
        assert!((dials[0].radius - 400.0 / 2.2).abs() < 1e-9);
        assert_eq!(dials[1].slot, Rect::new(400, 0, 400, 400));
    }

    #[test]
    fn narrow_strips_shrink_the_radius() {
        let dials = layout(300, 400, DialMode::Tri, 2.2);
        assert_eq!(dials.len(), 3);
        assert!((dials[2].radius - 100.0 / 2.2).abs() < 1e-9);
        assert_eq!(dials[2].local_center(), Point::new(50.0, 200.0));
    }

    #[test]
    fn slots_cover_odd_widths() {
        let dials = layout(301, 10, DialMode::Tri, 2.2);
        let total: usize = dials.iter().map(|d| d.slot.width).sum();
        assert_eq!(total, 301);
    }

    #[test]
    fn empty_bounds_produce_no_dials() {
        assert!(layout(0, 400, DialMode::Single, 2.2).is_empty());
        assert!(layout(400, 0, DialMode::Bi, 2.2).is_empty());
        assert!(layout(2, 400, DialMode::Tri, 2.2).is_empty());
    }
}
