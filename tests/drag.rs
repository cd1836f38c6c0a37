//! Integration tests for dragging indicator arrows over cached dial faces.
//!
//! The harness plays the part of the window: it owns a frame buffer, feeds
//! pointer events to the renderer and draws frames in between, the same
//! order the event loop uses.

use std::cell::Cell;
use std::rc::Rc;

use dialplate::fonts::FontBook;
use dialplate::layout::Dial;
use dialplate::{
    Canvas, DialFace, DialId, DialMode, FrameOutcome, GaugeConfig, Marker, MarkerSet, Point,
    PointerButton, PointerState, Renderer, SeamPolicy, StaticPainter,
};

/// Paints the real face and counts how often it is asked to.
struct CountingFace {
    face: DialFace,
    paints: Rc<Cell<usize>>,
}

impl StaticPainter for CountingFace {
    fn background(&self) -> dialplate::Color {
        self.face.background()
    }

    fn paint(&self, dial: &Dial, markers: &MarkerSet, canvas: &mut Canvas) {
        self.paints.set(self.paints.get() + 1);
        self.face.paint(dial, markers, canvas);
    }
}

struct Window {
    renderer: Renderer<CountingFace>,
    paints: Rc<Cell<usize>>,
    width: usize,
    height: usize,
    frame: Vec<u8>,
}

impl Window {
    fn new(config: GaugeConfig, width: usize, height: usize) -> Self {
        let paints = Rc::new(Cell::new(0));
        let face = CountingFace {
            face: DialFace::new(config.clone(), FontBook::empty()),
            paints: Rc::clone(&paints),
        };
        Self {
            renderer: Renderer::with_painter(config, face),
            paints,
            width,
            height,
            frame: vec![0; width * height * 4],
        }
    }

    fn resize(&mut self, width: usize, height: usize) {
        self.width = width;
        self.height = height;
        self.frame = vec![0; width * height * 4];
    }

    fn redraw(&mut self) -> FrameOutcome {
        let mut canvas = Canvas::new(&mut self.frame, self.width, self.height);
        self.renderer.render(&mut canvas).expect("render failed")
    }
}

fn bi_window() -> Window {
    let config = GaugeConfig::builder().mode(DialMode::Bi).build();
    Window::new(config, 800, 400)
}

#[test]
fn drag_to_left_center_reads_zero_and_spares_the_right_dial() {
    let mut window = bi_window();
    window.redraw();
    let left = window.renderer.dials()[0].center;

    window
        .renderer
        .pointer_pressed(Point::new(left.x + 40.0, 30.0), PointerButton::Primary);
    let update = window.renderer.pointer_moved(left).expect("drag update");
    window.redraw();

    assert_eq!(update.dial, DialId(0));
    assert_eq!(update.angle, 0.0);
    assert_eq!(window.renderer.arrow_angle(DialId(0)), Some(0.0));
    assert_eq!(window.renderer.arrow_angle(DialId(1)), Some(180.0));
}

#[test]
fn long_drag_never_repaints_static_layers() {
    let mut window = bi_window();
    window
        .renderer
        .set_markers(Marker::default_set())
        .expect("default markers are valid");
    window.redraw();
    assert_eq!(window.paints.get(), 2);

    let center = window.renderer.dials()[1].center;
    window
        .renderer
        .pointer_pressed(center, PointerButton::Primary);
    for step in 0..120 {
        let angle = (step as f64 * 3.0).to_radians();
        let position = Point::new(center.x + 100.0 * angle.cos(), center.y + 100.0 * angle.sin());
        let update = window.renderer.pointer_moved(position).expect("drag update");
        assert_eq!(update.dial, DialId(1));
        assert!((0.0..360.0).contains(&update.angle));
        assert_eq!(window.redraw(), FrameOutcome::Drawn { rebuilt: 0 });
    }
    window.renderer.pointer_released();

    assert_eq!(window.paints.get(), 2);
    assert_eq!(window.renderer.pointer_state(), PointerState::Idle);
}

#[test]
fn resize_repaints_once_then_reuses() {
    let config = GaugeConfig::builder().mode(DialMode::Bi).build();
    let mut window = Window::new(config, 400, 400);
    window.redraw();
    window.resize(800, 400);
    assert_eq!(window.redraw(), FrameOutcome::Drawn { rebuilt: 2 });
    assert_eq!(window.redraw(), FrameOutcome::Drawn { rebuilt: 0 });

    window.resize(0, 0);
    assert_eq!(window.redraw(), FrameOutcome::Skipped);
    assert_eq!(window.paints.get(), 4);
}

#[test]
fn moves_without_a_press_change_nothing() {
    let mut window = bi_window();
    window.redraw();
    assert!(window.renderer.pointer_moved(Point::new(10.0, 10.0)).is_none());
    window
        .renderer
        .pointer_pressed(Point::new(10.0, 10.0), PointerButton::Middle);
    assert!(window.renderer.pointer_moved(Point::new(10.0, 10.0)).is_none());
    assert_eq!(window.renderer.arrow_angle(DialId(0)), Some(180.0));
}

#[test]
fn seam_markers_render_with_either_policy() {
    for seam in [SeamPolicy::Open, SeamPolicy::Circular] {
        let config = GaugeConfig::builder().seam_policy(seam).build();
        let mut window = Window::new(config, 300, 300);
        window
            .renderer
            .set_markers(vec![
                Marker::new("Su", "a", 359.5),
                Marker::new("Mo", "b", 0.5),
                Marker::new("Me", "c", 1.0),
            ])
            .expect("markers are valid");
        assert_eq!(window.redraw(), FrameOutcome::Drawn { rebuilt: 1 });
        assert!(window.frame.chunks_exact(4).all(|px| px[3] == 0xff));
    }
}
