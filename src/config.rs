use std::f64::consts::PI;
use std::path::PathBuf;

use bon::Builder;

use crate::layout::DialMode;
use crate::markers::SeamPolicy;

/// Color representation for dial elements
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub const fn rgba(self) -> [u8; 4] {
        [self.r, self.g, self.b, 0xff]
    }
}

#[derive(Debug, Clone, Builder)]
pub struct GaugeConfig {
    #[builder(default = "Dials".to_string(), into)]
    pub title: String,
    #[builder(default)]
    pub mode: DialMode,

    // Window configuration
    #[builder(default = 900)]
    pub window_width: usize,
    #[builder(default = 450)]
    pub window_height: usize,
    #[builder(default = 60.0)]
    pub max_framerate: f64,

    // Colors
    #[builder(default = Color::new(0x12, 0x16, 0x24))]
    pub background_color: Color,
    #[builder(default = Color::new(0xff, 0xff, 0xff))]
    pub dial_color: Color,
    pub marker_color: Option<Color>,
    pub arrow_color: Option<Color>,

    // Dial geometry, as shares of the dial radius
    /// Layout radius is the strip's short side divided by this.
    #[builder(default = 2.2)]
    pub margin_divisor: f64,
    #[builder(default = 0.885)]
    pub inner_radius_factor: f64,
    /// Markers sit between this ring and the inner circle.
    #[builder(default = 0.73)]
    pub symbol_ring_factor: f64,
    #[builder(default = 2.0)]
    pub circle_thickness: f32,
    #[builder(default = 5)]
    pub center_dot_radius: i32,

    // Ticks and labels
    #[builder(default = 3.0)]
    pub major_tick_thickness: f32,
    #[builder(default = 1.5)]
    pub minor_tick_thickness: f32,
    #[builder(default = 14.0)]
    pub label_font_size: f32,
    /// Distance from the tip of a major tick to its label center.
    #[builder(default = 14.0)]
    pub label_gap: f64,

    // Markers
    #[builder(default = 28.0)]
    pub symbol_font_size: f32,
    /// Gap kept between a symbol and the start of its connector.
    #[builder(default = 20.0)]
    pub connector_offset: f64,
    #[builder(default = 1.0)]
    pub connector_thickness: f32,
    #[builder(default = 3)]
    pub marker_dot_radius: i32,
    #[builder(default)]
    pub seam_policy: SeamPolicy,

    // Indicator arrows
    #[builder(default = 180.0)]
    pub initial_arrow_angle: f64,
    #[builder(default = 3.0)]
    pub arrow_width: f32,
    #[builder(default = 20.0)]
    pub arrowhead_length: f64,
    #[builder(default = PI / 6.0)]
    pub arrowhead_half_angle: f64,
    /// Length of the shaft behind the center, as a share of its reach.
    #[builder(default = 0.12)]
    pub arrow_tail_factor: f64,

    // Fonts
    #[builder(into)]
    pub label_font_path: Option<PathBuf>,
    #[builder(into)]
    pub symbol_font_path: Option<PathBuf>,
}

impl Default for GaugeConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl GaugeConfig {
    pub fn marker_color(&self) -> Color {
        self.marker_color.unwrap_or(self.dial_color)
    }

    pub fn arrow_color(&self) -> Color {
        self.arrow_color.unwrap_or(self.dial_color)
    }
}
