//! The static face of a dial: circles, ticks, labels, center dot and the
//! resolved marker placements. Everything here ends up in the cached layer.

use rusttype::Scale;

use crate::angle;
use crate::config::{Color, GaugeConfig};
use crate::fonts::FontBook;
use crate::layout::{Dial, Point};
use crate::markers::{self, MarkerPlacement, MarkerSet};
use crate::raster::{measure_text, Canvas};
use crate::ticks;

/// Draws the cacheable part of a dial. The static layer cache calls this
/// only when a layer has to be rebuilt.
pub trait StaticPainter {
    fn background(&self) -> Color;

    fn paint(&self, dial: &Dial, markers: &MarkerSet, canvas: &mut Canvas);
}

// ============================================================================
// RETAINED MODE SCENE
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FontRole {
    Label,
    Symbol,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum DrawCommand {
    Ring {
        center: Point,
        radius: f64,
        thickness: f32,
        color: Color,
    },
    Line {
        from: Point,
        to: Point,
        thickness: f32,
        color: Color,
    },
    Dot {
        center: Point,
        radius: i32,
        color: Color,
    },
    Text {
        anchor: Point,
        text: String,
        role: FontRole,
        size: f32,
        color: Color,
    },
}

#[derive(Debug, Default)]
pub(crate) struct Scene {
    commands: Vec<DrawCommand>,
}

impl Scene {
    fn add_command(&mut self, command: DrawCommand) {
        self.commands.push(command);
    }

    pub(crate) fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    fn render(&self, canvas: &mut Canvas, fonts: &FontBook) {
        for command in &self.commands {
            match command {
                DrawCommand::Ring {
                    center,
                    radius,
                    thickness,
                    color,
                } => canvas.ring(*center, *radius, *thickness, *color),
                DrawCommand::Line {
                    from,
                    to,
                    thickness,
                    color,
                } => canvas.line(*from, *to, *thickness, *color),
                DrawCommand::Dot {
                    center,
                    radius,
                    color,
                } => canvas.disc(*center, *radius, *color),
                DrawCommand::Text {
                    anchor,
                    text,
                    role,
                    size,
                    color,
                } => {
                    let font = match role {
                        FontRole::Label => fonts.label(),
                        FontRole::Symbol => fonts.symbol(),
                    };
                    if let Some(font) = font {
                        canvas.text_centered(*anchor, text, font, Scale::uniform(*size), *color);
                    }
                }
            }
        }
    }
}

// ============================================================================
// DIAL FACE
// ============================================================================

#[derive(Debug, Clone)]
pub struct DialFace {
    config: GaugeConfig,
    fonts: FontBook,
}

impl DialFace {
    pub fn new(config: GaugeConfig, fonts: FontBook) -> Self {
        Self { config, fonts }
    }

    /// Loads the fonts named in `config`, falling back as needed.
    pub fn from_config(config: &GaugeConfig) -> Self {
        let fonts = FontBook::load(
            config.label_font_path.as_deref(),
            config.symbol_font_path.as_deref(),
        );
        Self::new(config.clone(), fonts)
    }

    pub(crate) fn scene(&self, dial: &Dial, markers: &MarkerSet) -> Scene {
        let config = &self.config;
        let color = config.dial_color;
        let center = dial.local_center();
        let outer = dial.radius;
        let inner = outer * config.inner_radius_factor;

        let mut scene = Scene::default();
        for radius in [outer, inner] {
            scene.add_command(DrawCommand::Ring {
                center,
                radius,
                thickness: config.circle_thickness,
                color,
            });
        }

        for tick in ticks::generate(dial.scheme, outer, inner) {
            scene.add_command(DrawCommand::Line {
                from: center.polar(inner, tick.angle),
                to: center.polar(inner + tick.length, tick.angle),
                thickness: if tick.major {
                    config.major_tick_thickness
                } else {
                    config.minor_tick_thickness
                },
                color,
            });
            if let Some(text) = tick.label {
                scene.add_command(DrawCommand::Text {
                    anchor: center.polar(inner + tick.length + config.label_gap, tick.angle),
                    text,
                    role: FontRole::Label,
                    size: config.label_font_size,
                    color,
                });
            }
        }

        scene.add_command(DrawCommand::Dot {
            center,
            radius: config.center_dot_radius,
            color,
        });

        if dial.id.is_primary() {
            let symbol_radius = (outer * config.symbol_ring_factor + inner) / 2.0;
            for placement in markers::resolve(markers.as_slice(), config.seam_policy) {
                self.add_marker(&mut scene, dial, &placement, symbol_radius, inner);
            }
        }
        scene
    }

    fn add_marker(
        &self,
        scene: &mut Scene,
        dial: &Dial,
        placement: &MarkerPlacement,
        symbol_radius: f64,
        inner: f64,
    ) {
        let config = &self.config;
        let color = config.marker_color();
        let center = dial.local_center();
        let symbol_point = center.polar(
            symbol_radius,
            angle::to_screen_angle(placement.adjusted, dial.scheme),
        );
        let pointer_point =
            center.polar(inner, angle::to_screen_angle(placement.original, dial.scheme));

        // keep the connector clear of the glyph
        let glyph_reach = self.fonts.symbol().map_or(0.0, |font| {
            let (w, h) = measure_text(
                &placement.symbol,
                font,
                Scale::uniform(config.symbol_font_size),
            );
            w.max(h) as f64 / 2.0
        });
        let offset = config.connector_offset.max(glyph_reach);
        let toward = (pointer_point.y - symbol_point.y).atan2(pointer_point.x - symbol_point.x);
        let gap = (pointer_point.x - symbol_point.x).hypot(pointer_point.y - symbol_point.y);
        if gap > offset {
            scene.add_command(DrawCommand::Line {
                from: symbol_point.polar(offset, toward),
                to: pointer_point,
                thickness: config.connector_thickness,
                color,
            });
        }
        scene.add_command(DrawCommand::Dot {
            center: pointer_point,
            radius: config.marker_dot_radius,
            color,
        });
        scene.add_command(DrawCommand::Text {
            anchor: symbol_point,
            text: placement.symbol.clone(),
            role: FontRole::Symbol,
            size: config.symbol_font_size,
            color,
        });
    }
}

impl StaticPainter for DialFace {
    fn background(&self) -> Color {
        self.config.background_color
    }

    fn paint(&self, dial: &Dial, markers: &MarkerSet, canvas: &mut Canvas) {
        let scene = self.scene(dial, markers);
        log::debug!(
            "Painting dial {} ({} division) with {} commands",
            dial.id,
            dial.scheme,
            scene.commands().len()
        );
        scene.render(canvas, &self.fonts);
    }
}
