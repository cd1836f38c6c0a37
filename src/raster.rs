//! Software rasterizer over RGBA8 buffers: the frame handed out by
//! `pixels` and the offscreen layers kept by the static cache.

use rusttype::{point, Font, PositionedGlyph, Scale};

use crate::config::Color;
use crate::error::DialError;
use crate::layout::{Point, Rect};

pub struct Canvas<'a> {
    frame: &'a mut [u8],
    width: usize,
    height: usize,
}

impl<'a> Canvas<'a> {
    /// Wraps an RGBA8 buffer. A buffer shorter than `width * height * 4`
    /// clips the rows it lacks.
    pub fn new(frame: &'a mut [u8], width: usize, height: usize) -> Self {
        let height = if width == 0 {
            0
        } else {
            height.min(frame.len() / (width * 4))
        };
        Self {
            frame,
            width,
            height,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn clear(&mut self, color: Color) {
        let rgba = color.rgba();
        for chunk in self.frame[..self.width * self.height * 4].chunks_exact_mut(4) {
            chunk.copy_from_slice(&rgba);
        }
    }

    pub fn pixel(&self, x: usize, y: usize) -> Option<[u8; 4]> {
        if x < self.width && y < self.height {
            let idx = (y * self.width + x) * 4;
            let mut out = [0; 4];
            out.copy_from_slice(&self.frame[idx..idx + 4]);
            Some(out)
        } else {
            None
        }
    }

    /// Blends `color` over the pixel with coverage `alpha`.
    pub fn blend_pixel(&mut self, x: i32, y: i32, color: Color, alpha: f32) {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return;
        }
        let idx = (y as usize * self.width + x as usize) * 4;
        let a = alpha.clamp(0.0, 1.0);
        let src = [color.r as f32, color.g as f32, color.b as f32];
        for (channel, value) in src.iter().enumerate() {
            let dst = self.frame[idx + channel] as f32;
            self.frame[idx + channel] = (value * a + dst * (1.0 - a)).round() as u8;
        }
        self.frame[idx + 3] = 0xff;
    }

    /// Anti-aliased line with round ends.
    pub fn line(&mut self, from: Point, to: Point, thickness: f32, color: Color) {
        let half = thickness as f64 / 2.0;
        let pad = half.ceil() + 1.0;
        let min_x = (from.x.min(to.x) - pad).floor() as i32;
        let max_x = (from.x.max(to.x) + pad).ceil() as i32;
        let min_y = (from.y.min(to.y) - pad).floor() as i32;
        let max_y = (from.y.max(to.y) + pad).ceil() as i32;
        let (dx, dy) = (to.x - from.x, to.y - from.y);
        let len_sq = dx * dx + dy * dy;
        for y in min_y.max(0)..=max_y.min(self.height as i32 - 1) {
            for x in min_x.max(0)..=max_x.min(self.width as i32 - 1) {
                let (px, py) = (x as f64 - from.x, y as f64 - from.y);
                let t = if len_sq > 0.0 {
                    ((px * dx + py * dy) / len_sq).clamp(0.0, 1.0)
                } else {
                    0.0
                };
                let (lx, ly) = (from.x + t * dx, from.y + t * dy);
                let dist = ((lx - x as f64).powi(2) + (ly - y as f64).powi(2)).sqrt();
                let aa = (1.0 - (dist - half).clamp(0.0, 1.0)) as f32;
                if aa > 0.01 {
                    self.blend_pixel(x, y, color, aa);
                }
            }
        }
    }

    /// Circle outline whose stroke is centered on `radius`.
    pub fn ring(&mut self, center: Point, radius: f64, thickness: f32, color: Color) {
        let half = thickness as f64 / 2.0;
        let reach = radius + half + 1.0;
        let min_x = (center.x - reach).floor().max(0.0) as i32;
        let max_x = ((center.x + reach).ceil() as i32).min(self.width as i32 - 1);
        let min_y = (center.y - reach).floor().max(0.0) as i32;
        let max_y = ((center.y + reach).ceil() as i32).min(self.height as i32 - 1);
        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let dist = (x as f64 - center.x).hypot(y as f64 - center.y);
                let off = (dist - radius).abs();
                let aa = (1.0 - (off - half).clamp(0.0, 1.0)) as f32;
                if aa > 0.0 {
                    self.blend_pixel(x, y, color, aa);
                }
            }
        }
    }

    /// Filled, anti-aliased disc.
    pub fn disc(&mut self, center: Point, radius: i32, color: Color) {
        let (cx, cy) = (center.x.round() as i32, center.y.round() as i32);
        for y in -radius - 1..=radius + 1 {
            for x in -radius - 1..=radius + 1 {
                let dist = ((x * x + y * y) as f64).sqrt();
                let aa = if dist > radius as f64 {
                    1.0 - (dist - radius as f64).min(1.0)
                } else {
                    1.0
                };
                if aa > 0.0 {
                    self.blend_pixel(cx + x, cy + y, color, aa as f32);
                }
            }
        }
    }

    /// Filled triangle with a one pixel soft edge.
    pub fn triangle(&mut self, corners: [Point; 3], color: Color) {
        let [a, b, c] = corners;
        let area = (b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x);
        if area == 0.0 {
            return;
        }
        let winding = area.signum();
        let edges = [(a, b), (b, c), (c, a)];

        let min_x = a.x.min(b.x).min(c.x).floor().max(0.0) as i32 - 1;
        let max_x = (a.x.max(b.x).max(c.x).ceil() as i32 + 1).min(self.width as i32 - 1);
        let min_y = a.y.min(b.y).min(c.y).floor().max(0.0) as i32 - 1;
        let max_y = (a.y.max(b.y).max(c.y).ceil() as i32 + 1).min(self.height as i32 - 1);
        for y in min_y.max(0)..=max_y {
            for x in min_x.max(0)..=max_x {
                let inside = edges
                    .iter()
                    .map(|(p, q)| {
                        let len = (q.x - p.x).hypot(q.y - p.y);
                        let cross = (q.x - p.x) * (y as f64 - p.y) - (q.y - p.y) * (x as f64 - p.x);
                        winding * cross / len
                    })
                    .fold(f64::INFINITY, f64::min);
                let aa = (inside + 0.5).clamp(0.0, 1.0) as f32;
                if aa > 0.01 {
                    self.blend_pixel(x, y, color, aa);
                }
            }
        }
    }

    /// Draws `text` with its pixel bounding box centered on `anchor`.
    pub fn text_centered(&mut self, anchor: Point, text: &str, font: &Font, scale: Scale, color: Color) {
        let v_metrics = font.v_metrics(scale);
        let glyphs: Vec<PositionedGlyph> =
            font.layout(text, scale, point(0.0, v_metrics.ascent)).collect();
        let Some(bounds) = glyph_bounds(&glyphs) else {
            return;
        };
        let offset_x = anchor.x.round() as i32 - bounds.width / 2;
        let offset_y = anchor.y.round() as i32 - bounds.height / 2;
        for glyph in &glyphs {
            if let Some(bb) = glyph.pixel_bounding_box() {
                glyph.draw(|gx, gy, v| {
                    let px = offset_x + gx as i32 + bb.min.x - bounds.min_x;
                    let py = offset_y + gy as i32 + bb.min.y - bounds.min_y;
                    self.blend_pixel(px, py, color, v);
                });
            }
        }
    }

    /// Copies an opaque layer into `dest`, nearest-neighbour scaled when
    /// the sizes differ.
    pub fn blit(&mut self, layer: &Layer, dest: Rect) {
        if layer.width == 0 || layer.height == 0 || dest.is_empty() {
            return;
        }
        let right = (dest.x + dest.width).min(self.width);
        let bottom = (dest.y + dest.height).min(self.height);
        if dest.x >= right || dest.y >= bottom {
            return;
        }

        if dest.width == layer.width && dest.height == layer.height {
            let span = (right - dest.x) * 4;
            for y in dest.y..bottom {
                let src = (y - dest.y) * layer.width * 4;
                let dst = (y * self.width + dest.x) * 4;
                self.frame[dst..dst + span].copy_from_slice(&layer.pixels[src..src + span]);
            }
            return;
        }

        for y in dest.y..bottom {
            let sy = (y - dest.y) * layer.height / dest.height;
            for x in dest.x..right {
                let sx = (x - dest.x) * layer.width / dest.width;
                let src = (sy * layer.width + sx) * 4;
                let dst = (y * self.width + x) * 4;
                self.frame[dst..dst + 4].copy_from_slice(&layer.pixels[src..src + 4]);
            }
        }
    }
}

struct GlyphBounds {
    min_x: i32,
    min_y: i32,
    width: i32,
    height: i32,
}

fn glyph_bounds(glyphs: &[PositionedGlyph]) -> Option<GlyphBounds> {
    let (min_x, max_x, min_y, max_y) = glyphs.iter().filter_map(|g| g.pixel_bounding_box()).fold(
        (i32::MAX, i32::MIN, i32::MAX, i32::MIN),
        |(min_x, max_x, min_y, max_y), bb| {
            (
                min_x.min(bb.min.x),
                max_x.max(bb.max.x),
                min_y.min(bb.min.y),
                max_y.max(bb.max.y),
            )
        },
    );
    (min_x < max_x && min_y < max_y).then(|| GlyphBounds {
        min_x,
        min_y,
        width: max_x - min_x,
        height: max_y - min_y,
    })
}

/// Pixel width and height of `text` as laid out by [`Canvas::text_centered`].
pub fn measure_text(text: &str, font: &Font, scale: Scale) -> (i32, i32) {
    let glyphs: Vec<PositionedGlyph> = font.layout(text, scale, point(0.0, 0.0)).collect();
    glyph_bounds(&glyphs).map_or((0, 0), |b| (b.width, b.height))
}

/// Owned, opaque RGBA8 image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layer {
    width: usize,
    height: usize,
    pixels: Vec<u8>,
}

impl Layer {
    /// Allocates a layer filled with `background`. Allocation failure is
    /// reported rather than aborting.
    pub fn new(width: usize, height: usize, background: Color) -> Result<Self, DialError> {
        let len = width
            .checked_mul(height)
            .and_then(|n| n.checked_mul(4))
            .unwrap_or(usize::MAX);
        let mut pixels = Vec::new();
        pixels
            .try_reserve_exact(len)
            .map_err(|source| DialError::LayerAllocation {
                width,
                height,
                source,
            })?;
        let rgba = background.rgba();
        pixels.extend(rgba.iter().copied().cycle().take(len));
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn canvas(&mut self) -> Canvas<'_> {
        Canvas::new(&mut self.pixels, self.width, self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BLACK: Color = Color::new(0, 0, 0);
    const WHITE: Color = Color::new(0xff, 0xff, 0xff);

    fn lit(canvas: &Canvas, x: usize, y: usize) -> bool {
        canvas.pixel(x, y).is_some_and(|p| p[0] > 0x80)
    }

    #[test]
    fn line_covers_its_path_only() {
        let mut layer = Layer::new(20, 20, BLACK).unwrap();
        let mut canvas = layer.canvas();
        canvas.line(Point::new(2.0, 10.0), Point::new(17.0, 10.0), 2.0, WHITE);
        assert!(lit(&canvas, 10, 10));
        assert!(lit(&canvas, 2, 10));
        assert!(!lit(&canvas, 10, 14));
        assert!(!lit(&canvas, 10, 3));
    }

    #[test]
    fn ring_is_hollow() {
        let mut layer = Layer::new(40, 40, BLACK).unwrap();
        let mut canvas = layer.canvas();
        canvas.ring(Point::new(20.0, 20.0), 10.0, 2.0, WHITE);
        assert!(lit(&canvas, 30, 20));
        assert!(lit(&canvas, 20, 10));
        assert!(!lit(&canvas, 20, 20));
        assert!(!lit(&canvas, 36, 20));
    }

    #[test]
    fn triangle_fills_interior_for_either_winding() {
        for corners in [
            [Point::new(2.0, 2.0), Point::new(18.0, 2.0), Point::new(2.0, 18.0)],
            [Point::new(2.0, 2.0), Point::new(2.0, 18.0), Point::new(18.0, 2.0)],
        ] {
            let mut layer = Layer::new(20, 20, BLACK).unwrap();
            let mut canvas = layer.canvas();
            canvas.triangle(corners, WHITE);
            assert!(lit(&canvas, 5, 5));
            assert!(!lit(&canvas, 16, 16));
        }
    }

    #[test]
    fn drawing_clips_at_the_edges() {
        let mut layer = Layer::new(10, 10, BLACK).unwrap();
        let mut canvas = layer.canvas();
        canvas.line(Point::new(-50.0, -50.0), Point::new(60.0, 60.0), 3.0, WHITE);
        canvas.disc(Point::new(0.0, 9.0), 4, WHITE);
        canvas.ring(Point::new(5.0, 5.0), 30.0, 1.0, WHITE);
        assert!(lit(&canvas, 5, 5));
    }

    #[test]
    fn blit_copies_and_scales() {
        let mut small = Layer::new(2, 2, BLACK).unwrap();
        small.canvas().blend_pixel(1, 1, WHITE, 1.0);

        let mut frame = vec![0u8; 4 * 4 * 4];
        let mut canvas = Canvas::new(&mut frame, 4, 4);
        canvas.blit(&small, Rect::new(0, 0, 4, 4));
        assert!(!lit(&canvas, 0, 0));
        assert!(lit(&canvas, 2, 2));
        assert!(lit(&canvas, 3, 3));

        let mut frame = vec![0u8; 4 * 4 * 4];
        let mut canvas = Canvas::new(&mut frame, 4, 4);
        canvas.blit(&small, Rect::new(2, 2, 2, 2));
        assert!(lit(&canvas, 3, 3));
        assert!(!lit(&canvas, 2, 3));
    }

    #[test]
    fn oversized_layer_reports_allocation_failure() {
        let err = Layer::new(usize::MAX / 2, 3, BLACK).unwrap_err();
        assert!(matches!(err, DialError::LayerAllocation { .. }));
    }
}
