use crate::cache::StaticLayerCache;
use crate::config::GaugeConfig;
use crate::error::DialError;
use crate::face::{DialFace, StaticPainter};
use crate::layout::{layout, Dial, DialId, DialMode, Point};
use crate::markers::{Marker, MarkerSet};
use crate::pointer::{
    ArrowStyle, ArrowUpdate, IndicatorArrow, PointerButton, PointerController, PointerState,
};
use crate::raster::Canvas;

/// What a call to [`Renderer::render`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    /// Bounds too small to hold a dial; the frame was left untouched.
    Skipped,
    /// Frame drawn. `rebuilt` counts static layers repainted for it.
    Drawn { rebuilt: u64 },
}

/// Owns every piece of per-frame state: the layer cache, the arrows, the
/// drag controller and the current markers.
#[derive(Debug)]
pub struct Renderer<P = DialFace> {
    config: GaugeConfig,
    painter: P,
    cache: StaticLayerCache,
    markers: MarkerSet,
    arrows: Vec<IndicatorArrow>,
    pointer: PointerController,
    mode: DialMode,
    bounds: (usize, usize),
    dials: Vec<Dial>,
}

impl Renderer<DialFace> {
    pub fn new(config: GaugeConfig) -> Self {
        let painter = DialFace::from_config(&config);
        Self::with_painter(config, painter)
    }
}

impl<P: StaticPainter> Renderer<P> {
    pub fn with_painter(config: GaugeConfig, painter: P) -> Self {
        let mode = config.mode;
        let arrows = vec![IndicatorArrow::new(config.initial_arrow_angle); mode.dial_count()];
        Self {
            config,
            painter,
            cache: StaticLayerCache::new(),
            markers: MarkerSet::new(),
            arrows,
            pointer: PointerController::new(),
            mode,
            bounds: (0, 0),
            dials: Vec::new(),
        }
    }

    /// Draws one frame: fresh layout from the canvas bounds, cached static
    /// layers blitted into their slots, arrows on top.
    pub fn render(&mut self, canvas: &mut Canvas) -> Result<FrameOutcome, DialError> {
        self.relayout(canvas.width(), canvas.height());
        if canvas.is_empty() || self.dials.is_empty() {
            log::trace!("Skipping frame for {}x{}", canvas.width(), canvas.height());
            return Ok(FrameOutcome::Skipped);
        }

        let builds_before = self.cache.build_count();
        canvas.clear(self.config.background_color);
        for dial in &self.dials {
            let layer = self.cache.get_or_build(dial, &self.markers, &self.painter)?;
            canvas.blit(layer, dial.slot);
        }

        let style = self.arrow_style();
        let color = self.config.arrow_color();
        for (dial, arrow) in self.dials.iter().zip(&self.arrows) {
            let shape = arrow.shape(dial, &style);
            canvas.line(shape.tail, shape.tip, self.config.arrow_width, color);
            canvas.triangle(shape.head, color);
        }

        Ok(FrameOutcome::Drawn {
            rebuilt: self.cache.build_count() - builds_before,
        })
    }

    /// Lays the dials out for new surface bounds ahead of the next frame,
    /// so pointer events in between measure against the new centers.
    pub fn resize(&mut self, width: usize, height: usize) {
        if self.bounds != (width, height) {
            self.relayout(width, height);
        }
    }

    fn relayout(&mut self, width: usize, height: usize) {
        self.bounds = (width, height);
        self.dials = layout(width, height, self.mode, self.config.margin_divisor);
    }

    fn arrow_style(&self) -> ArrowStyle {
        ArrowStyle {
            reach_factor: self.config.inner_radius_factor,
            tail_factor: self.config.arrow_tail_factor,
            head_length: self.config.arrowhead_length,
            head_half_angle: self.config.arrowhead_half_angle,
        }
    }

    /// Replaces the plotted markers. A rejected batch keeps the previous
    /// markers on screen.
    pub fn set_markers(&mut self, markers: Vec<Marker>) -> Result<(), DialError> {
        let count = markers.len();
        match self.markers.replace(markers) {
            Ok(()) => {
                log::debug!("Accepted {} markers", count);
                Ok(())
            }
            Err(e) => {
                log::warn!("Rejected marker batch: {}", e);
                Err(e)
            }
        }
    }

    pub fn markers(&self) -> &MarkerSet {
        &self.markers
    }

    /// Switches the number of dials. Arrows of dials that remain keep
    /// their angles.
    pub fn set_mode(&mut self, mode: DialMode) {
        if mode == self.mode {
            return;
        }
        log::info!("Switching to {:?} mode", mode);
        self.mode = mode;
        let count = mode.dial_count();
        self.arrows
            .resize(count, IndicatorArrow::new(self.config.initial_arrow_angle));
        self.cache.retain_dials(count);
        self.pointer.forget_beyond(count);
        let (width, height) = self.bounds;
        self.relayout(width, height);
    }

    pub fn mode(&self) -> DialMode {
        self.mode
    }

    pub fn set_arrow_angle(&mut self, dial: DialId, angle: f64) -> Result<(), DialError> {
        let arrow = self
            .arrows
            .get_mut(dial.0)
            .ok_or(DialError::UnknownDial(dial))?;
        arrow.set_angle(angle);
        Ok(())
    }

    pub fn arrow_angle(&self, dial: DialId) -> Option<f64> {
        self.arrows.get(dial.0).map(IndicatorArrow::angle)
    }

    /// Dials as laid out by the last frame.
    pub fn dials(&self) -> &[Dial] {
        &self.dials
    }

    pub fn pointer_pressed(&mut self, position: Point, button: PointerButton) -> Option<DialId> {
        self.pointer
            .press(position, button, &self.dials, &mut self.arrows)
    }

    pub fn pointer_moved(&mut self, position: Point) -> Option<ArrowUpdate> {
        self.pointer.moved(position, &self.dials, &mut self.arrows)
    }

    pub fn pointer_released(&mut self) -> Option<DialId> {
        self.pointer.release(&mut self.arrows)
    }

    pub fn pointer_state(&self) -> PointerState {
        self.pointer.state()
    }

    /// Static layers painted since creation.
    pub fn build_count(&self) -> u64 {
        self.cache.build_count()
    }
}
