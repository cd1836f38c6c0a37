use crate::angle::{self, DivisionScheme};

/// Stroke length of a minor tick as a share of the band between the
/// inner and outer circle.
pub const MINOR_LENGTH_SHARE: f64 = 0.2;
pub const MAJOR_LENGTH_FACTOR: f64 = 1.4;

#[derive(Debug, Clone, PartialEq)]
pub struct TickMark {
    pub index: u32,
    /// Scan offset in degrees from the dial's reference direction.
    pub offset: f64,
    /// Screen angle in radians.
    pub angle: f64,
    pub major: bool,
    /// Ticks start on the inner circle and point outward by `length`.
    pub length: f64,
    pub label: Option<String>,
}

/// Pure sweep over one full turn of a scale. Cloning restarts it.
#[derive(Debug, Clone)]
pub struct TickSweep {
    scheme: DivisionScheme,
    minor_length: f64,
    next: u32,
}

impl TickSweep {
    pub fn major_length(&self) -> f64 {
        self.minor_length * MAJOR_LENGTH_FACTOR
    }
}

impl Iterator for TickSweep {
    type Item = TickMark;

    fn next(&mut self) -> Option<TickMark> {
        if self.next >= self.scheme.divisions() {
            return None;
        }
        let index = self.next;
        self.next += 1;

        let offset = index as f64 * self.scheme.step_degrees();
        let major = index % self.scheme.major_interval() == 0;
        let label = major.then(|| format_label(angle::label_value(offset, self.scheme)));
        Some(TickMark {
            index,
            offset,
            angle: angle::offset_screen_angle(offset),
            major,
            length: if major {
                self.major_length()
            } else {
                self.minor_length
            },
            label,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = self.scheme.divisions().saturating_sub(self.next) as usize;
        (left, Some(left))
    }
}

impl ExactSizeIterator for TickSweep {}

pub fn generate(scheme: DivisionScheme, outer_radius: f64, inner_radius: f64) -> TickSweep {
    TickSweep {
        scheme,
        minor_length: (outer_radius - inner_radius) * MINOR_LENGTH_SHARE,
        next: 0,
    }
}

fn format_label(value: f64) -> String {
    format!("{}°", value.round() as i64)
}
