//! Conversions between dial values and screen angles.
//!
//! Screen angles are in radians with 0 pointing right and y growing
//! downward, so positive angles turn clockwise on screen. Scales are swept
//! from `90° + offset`, where `offset` is the scan position in degrees.

use strum::{Display, EnumIter};

/// How many equal steps a dial's scale is divided into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
pub enum DivisionScheme {
    #[strum(serialize = "90")]
    Ninety,
    #[strum(serialize = "120")]
    OneTwenty,
    #[strum(serialize = "180")]
    OneEighty,
}

impl DivisionScheme {
    pub const fn divisions(self) -> u32 {
        match self {
            Self::Ninety => 90,
            Self::OneTwenty => 120,
            Self::OneEighty => 180,
        }
    }

    /// Scan step in screen degrees between two adjacent ticks.
    pub fn step_degrees(self) -> f64 {
        360.0 / self.divisions() as f64
    }

    /// Every n-th minor step carries a major tick and a label.
    pub const fn major_interval(self) -> u32 {
        5
    }

    /// Label value shown at scan offset 0.
    pub fn top_label(self) -> f64 {
        self.divisions() as f64 / 2.0
    }
}

/// Wraps any angle in degrees into `[0, 360)`.
pub fn normalize_degrees(degrees: f64) -> f64 {
    let wrapped = degrees.rem_euclid(360.0);
    // rem_euclid rounds tiny negative inputs up to exactly 360.0
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}

/// Mirrored label value for a scan offset: counts down from the top label
/// to zero over the first half turn, then back up over the second.
pub fn label_value(offset_degrees: f64, scheme: DivisionScheme) -> f64 {
    let offset = normalize_degrees(offset_degrees);
    let step = scheme.step_degrees();
    if offset <= 180.0 {
        scheme.top_label() - offset / step
    } else {
        scheme.top_label() + (360.0 - offset) / step
    }
}

/// Scan offset at which `value` sits on the scale. Values larger than the
/// scheme's division count fold around the dial.
pub fn scale_offset(value: f64, scheme: DivisionScheme) -> f64 {
    normalize_degrees(180.0 - value * scheme.step_degrees())
}

/// Screen angle of a scan offset.
pub fn offset_screen_angle(offset_degrees: f64) -> f64 {
    (90.0 + offset_degrees).to_radians()
}

/// Screen angle at which a marker value is plotted on a dial.
pub fn to_screen_angle(value: f64, scheme: DivisionScheme) -> f64 {
    offset_screen_angle(scale_offset(value, scheme))
}

/// Screen angle of an indicator arrow. Arrows read like a compass and do
/// not follow the mirrored labels.
pub fn arrow_screen_angle(angle_degrees: f64) -> f64 {
    (90.0 + angle_degrees).to_radians()
}

/// Inverse of [`arrow_screen_angle`].
pub fn to_domain_value(screen_angle: f64) -> f64 {
    normalize_degrees(screen_angle.to_degrees() - 90.0)
}

/// Arrow angle for a pointer at `(dx, dy)` from a dial center. A pointer
/// exactly on the center reads as 0°.
pub fn pointer_angle(dx: f64, dy: f64) -> f64 {
    if dx == 0.0 && dy == 0.0 {
        return 0.0;
    }
    to_domain_value(dy.atan2(dx))
}
