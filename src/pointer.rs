//! Indicator arrows and the drag state machine that turns pointer
//! positions into arrow angles.

use crate::angle;
use crate::layout::{Dial, DialId, Point};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Secondary,
    Middle,
    Other,
}

/// The user-draggable pointer of one dial.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IndicatorArrow {
    angle: f64,
    dragging: bool,
}

impl IndicatorArrow {
    pub fn new(angle: f64) -> Self {
        Self {
            angle: angle::normalize_degrees(angle),
            dragging: false,
        }
    }

    /// Current angle in degrees, always in [0, 360).
    pub fn angle(&self) -> f64 {
        self.angle
    }

    pub fn set_angle(&mut self, angle: f64) {
        self.angle = angle::normalize_degrees(angle);
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    /// Shaft and head of this arrow drawn on `dial`.
    pub fn shape(&self, dial: &Dial, style: &ArrowStyle) -> ArrowShape {
        let reach = dial.radius * style.reach_factor;
        let direction = angle::arrow_screen_angle(self.angle);
        let tip = dial.center.polar(reach, direction);
        let tail = dial.center.polar(-reach * style.tail_factor, direction);
        let head = [
            tip,
            tip.polar(-style.head_length, direction - style.head_half_angle),
            tip.polar(-style.head_length, direction + style.head_half_angle),
        ];
        ArrowShape { tail, tip, head }
    }
}

/// Proportions of an indicator arrow.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArrowStyle {
    /// Tip distance from the center, as a share of the dial radius.
    pub reach_factor: f64,
    /// Shaft length behind the center, as a share of the reach.
    pub tail_factor: f64,
    pub head_length: f64,
    pub head_half_angle: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArrowShape {
    pub tail: Point,
    pub tip: Point,
    pub head: [Point; 3],
}

/// Reported after every drag update.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArrowUpdate {
    pub dial: DialId,
    pub angle: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerState {
    Idle,
    Dragging(DialId),
}

/// Tracks the single active drag. Holding it as one `Option` means two
/// dials can never be dragged at once.
#[derive(Debug, Default)]
pub struct PointerController {
    active: Option<DialId>,
}

impl PointerController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> PointerState {
        match self.active {
            Some(dial) => PointerState::Dragging(dial),
            None => PointerState::Idle,
        }
    }

    /// Starts a drag on the dial whose center is horizontally closest to
    /// `position`. Ties go to the leftmost dial. Returns the captured dial.
    pub fn press(
        &mut self,
        position: Point,
        button: PointerButton,
        dials: &[Dial],
        arrows: &mut [IndicatorArrow],
    ) -> Option<DialId> {
        if button != PointerButton::Primary {
            return None;
        }
        if let Some(active) = self.active {
            log::debug!("Ignoring press while dial {} holds the pointer", active);
            return None;
        }

        let dial = dials.iter().min_by(|a, b| {
            let da = (position.x - a.center.x).abs();
            let db = (position.x - b.center.x).abs();
            da.total_cmp(&db)
        })?;
        let arrow = arrows.get_mut(dial.id.0)?;
        arrow.dragging = true;
        self.active = Some(dial.id);
        log::debug!("Dial {} captured the pointer", dial.id);
        Some(dial.id)
    }

    /// Points the captured dial's arrow at `position`. Does nothing while
    /// idle.
    pub fn moved(
        &mut self,
        position: Point,
        dials: &[Dial],
        arrows: &mut [IndicatorArrow],
    ) -> Option<ArrowUpdate> {
        let id = self.active?;
        let dial = dials.iter().find(|dial| dial.id == id)?;
        let arrow = arrows.get_mut(id.0)?;
        arrow.set_angle(angle::pointer_angle(
            position.x - dial.center.x,
            position.y - dial.center.y,
        ));
        Some(ArrowUpdate {
            dial: id,
            angle: arrow.angle,
        })
    }

    /// Ends the drag, if any, and releases the capture.
    pub fn release(&mut self, arrows: &mut [IndicatorArrow]) -> Option<DialId> {
        let id = self.active.take()?;
        if let Some(arrow) = arrows.get_mut(id.0) {
            arrow.dragging = false;
        }
        Some(id)
    }

    /// Drops a capture whose dial vanished, e.g. after a mode change.
    pub fn forget_beyond(&mut self, count: usize) {
        if self.active.is_some_and(|id| id.0 >= count) {
            self.active = None;
        }
    }
}
