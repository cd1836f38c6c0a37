// ============================================================================
// CRATE CONFIGURATION & IMPORTS
// ============================================================================

pub mod angle;
pub mod cache;
pub mod config;
pub mod error;
pub mod face;
pub mod fonts;
pub mod layout;
pub mod markers;
pub mod pointer;
pub mod raster;
pub mod render;
pub mod ticks;

// External crate imports
use pixels::{Pixels, SurfaceTexture};

// Standard library imports
use std::sync::mpsc::{Receiver, Sender};
use std::time::{Duration, Instant};

// Window management imports
use winit::dpi::LogicalSize;
use winit::event::{ElementState, Event, MouseButton, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::window::WindowBuilder;

pub use config::{Color, GaugeConfig};
pub use error::DialError;
pub use face::{DialFace, StaticPainter};
pub use layout::{DialId, DialMode, Point};
pub use markers::{Marker, MarkerSet, SeamPolicy};
pub use pointer::{ArrowUpdate, PointerButton, PointerState};
pub use raster::Canvas;
pub use render::{FrameOutcome, Renderer};

// ============================================================================
// PUBLIC API - MAIN INTERFACE
// ============================================================================

/// Updates a running gauge accepts from other threads.
#[derive(Debug, Clone)]
pub enum GaugeCommand {
    SetMarkers(Vec<Marker>),
    SetMode(DialMode),
    SetArrow(DialId, f64),
}

impl GaugeCommand {
    /// Applies the command. Invalid commands are logged and dropped, the
    /// gauge keeps its previous state.
    pub fn apply<P: StaticPainter>(self, renderer: &mut Renderer<P>) {
        let result = match self {
            GaugeCommand::SetMarkers(markers) => renderer.set_markers(markers),
            GaugeCommand::SetMode(mode) => {
                renderer.set_mode(mode);
                Ok(())
            }
            GaugeCommand::SetArrow(dial, angle) => renderer.set_arrow_angle(dial, angle),
        };
        if let Err(e) = result {
            log::warn!("Ignoring command: {}", e);
        }
    }
}

/// Main gauge struct - the primary public interface
#[derive(Debug)]
pub struct Gauge {
    config: GaugeConfig,
    renderer: Renderer,
}

impl Gauge {
    pub fn new(config: GaugeConfig) -> Self {
        let renderer = Renderer::new(config.clone());
        Self { config, renderer }
    }

    pub fn set_markers(&mut self, markers: Vec<Marker>) -> Result<(), DialError> {
        self.renderer.set_markers(markers)
    }

    pub fn set_arrow_angle(&mut self, dial: DialId, angle: f64) -> Result<(), DialError> {
        self.renderer.set_arrow_angle(dial, angle)
    }

    pub fn arrow_angle(&self, dial: DialId) -> Option<f64> {
        self.renderer.arrow_angle(dial)
    }

    pub fn show(&mut self) -> Result<(), DialError> {
        self.run_window(None, None)
    }

    /// Opens the window, applying `commands` as they arrive and reporting
    /// every drag update on `updates`.
    pub fn show_with_commands(
        &mut self,
        commands: Receiver<GaugeCommand>,
        updates: Option<Sender<ArrowUpdate>>,
    ) -> Result<(), DialError> {
        self.run_window(Some(commands), updates)
    }

    fn run_window(
        &mut self,
        commands: Option<Receiver<GaugeCommand>>,
        mut updates: Option<Sender<ArrowUpdate>>,
    ) -> Result<(), DialError> {
        let event_loop = EventLoop::new()?;
        let window = WindowBuilder::new()
            .with_title(&self.config.title)
            .with_inner_size(LogicalSize::new(
                self.config.window_width as f64,
                self.config.window_height as f64,
            ))
            .with_resizable(true)
            .build(&event_loop)?;

        let window = std::sync::Arc::new(window);
        let window_clone = window.clone();
        let size = window.inner_size();
        let mut fb_width = size.width as usize;
        let mut fb_height = size.height as usize;
        let surface_texture = SurfaceTexture::new(size.width, size.height, &window);
        let mut pixels = Pixels::new(size.width, size.height, surface_texture)?;

        let frame_duration = Duration::from_secs_f64(1.0 / self.config.max_framerate.max(1.0));
        let mut last_poll = Instant::now();
        let mut cursor = Point::default();
        let renderer = &mut self.renderer;

        log::info!(
            "Showing {:?} mode at {}x{}",
            renderer.mode(),
            fb_width,
            fb_height
        );

        event_loop.run(move |event, window_target| match event {
            Event::WindowEvent { event, .. } => match event {
                WindowEvent::CloseRequested => {
                    window_target.exit();
                }
                WindowEvent::Resized(new_size) => {
                    fb_width = new_size.width as usize;
                    fb_height = new_size.height as usize;
                    log::info!("Resized to {}x{}", fb_width, fb_height);
                    renderer.resize(fb_width, fb_height);
                    // a minimized window reports zero; keep the old surface
                    if fb_width > 0 && fb_height > 0 {
                        if let Err(e) = pixels.resize_buffer(new_size.width, new_size.height) {
                            log::warn!("Failed to resize buffer: {}", e);
                        }
                        if let Err(e) = pixels.resize_surface(new_size.width, new_size.height) {
                            log::warn!("Failed to resize surface: {}", e);
                        }
                    }
                    window_clone.request_redraw();
                }
                WindowEvent::CursorMoved { position, .. } => {
                    cursor = Point::new(position.x, position.y);
                    if let Some(update) = renderer.pointer_moved(cursor) {
                        log::trace!("Dial {} arrow at {:.2}", update.dial, update.angle);
                        if let Some(sender) = &updates {
                            if sender.send(update).is_err() {
                                log::debug!("Arrow update receiver hung up");
                                updates = None;
                            }
                        }
                        window_clone.request_redraw();
                    }
                }
                WindowEvent::MouseInput { state, button, .. } => {
                    let button = pointer_button(button);
                    match state {
                        ElementState::Pressed => {
                            renderer.pointer_pressed(cursor, button);
                        }
                        ElementState::Released if button == PointerButton::Primary => {
                            renderer.pointer_released();
                        }
                        ElementState::Released => {}
                    }
                }
                WindowEvent::RedrawRequested => {
                    let mut canvas = Canvas::new(pixels.frame_mut(), fb_width, fb_height);
                    let outcome = renderer.render(&mut canvas);
                    match outcome {
                        Ok(FrameOutcome::Skipped) => {}
                        Ok(FrameOutcome::Drawn { .. }) => {
                            if let Err(e) = pixels.render() {
                                log::error!("Failed to present frame: {}", e);
                                window_target.exit();
                            }
                        }
                        Err(e) => {
                            log::error!("Failed to render frame: {}", e);
                            window_target.exit();
                        }
                    }
                }
                _ => {}
            },
            Event::AboutToWait => {
                let Some(commands) = &commands else {
                    window_target.set_control_flow(ControlFlow::Wait);
                    return;
                };
                if last_poll.elapsed() >= frame_duration {
                    let mut changed = false;
                    while let Ok(command) = commands.try_recv() {
                        command.apply(&mut *renderer);
                        changed = true;
                    }
                    if changed {
                        window_clone.request_redraw();
                    }
                    last_poll = Instant::now();
                }
                window_target.set_control_flow(ControlFlow::WaitUntil(last_poll + frame_duration));
            }
            _ => {}
        })?;

        Ok(())
    }
}

fn pointer_button(button: MouseButton) -> PointerButton {
    match button {
        MouseButton::Left => PointerButton::Primary,
        MouseButton::Right => PointerButton::Secondary,
        MouseButton::Middle => PointerButton::Middle,
        _ => PointerButton::Other,
    }
}
