//! Spinning the dial: pointer drags become time-travel minutes.
//!
//! One full turn of the dial is 720 minutes, the twelve hours the face shows,
//! so half a degree of rotation is one minute.

use std::f64::consts::{PI, TAU};

use serde::{Deserialize, Serialize};

use crate::dial::{CENTER, SURFACE_SIZE};

pub const MINUTES_PER_TURN: f64 = 720.0;

// Tolerance for float noise when a rotation lands on a whole minute.
const SNAP_EPSILON: f64 = 1e-9;

/// Pointer position in dial surface units (0..500 on both axes, y down).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    fn is_valid(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Angle around the dial centre; clockwise on screen is positive.
    fn angle(self) -> f64 {
        (self.y - CENTER.y).atan2(self.x - CENTER.x)
    }
}

/// Folds an angle difference into `(-π, π]` so crossing the 9 o'clock seam
/// does not register as a full turn.
#[must_use]
pub fn wrap_angle(mut delta: f64) -> f64 {
    if delta > PI {
        delta -= TAU;
    }
    if delta <= -PI {
        delta += TAU;
    }
    delta
}

#[must_use]
pub fn minutes_for_rotation(radians: f64) -> f64 {
    radians * MINUTES_PER_TURN / TAU
}

/// Start/move/end state of one drag. Only the latest pointer position
/// matters; partial minutes are carried into the next move.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DragTracker {
    last_angle: Option<f64>,
    carry: f64,
}

impl DragTracker {
    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.last_angle.is_some()
    }

    pub fn start(&mut self, at: Point) {
        if !at.is_valid() {
            tracing::debug!(?at, "ignoring drag start outside the surface");
            return;
        }
        self.last_angle = Some(at.angle());
        self.carry = 0.0;
    }

    /// Returns the whole minutes travelled since the previous position.
    pub fn move_to(&mut self, at: Point) -> i64 {
        let Some(last) = self.last_angle else {
            return 0;
        };
        if !at.is_valid() {
            return 0;
        }

        let angle = at.angle();
        self.last_angle = Some(angle);
        self.carry += minutes_for_rotation(wrap_angle(angle - last));

        let rounded = self.carry.round();
        let whole = if (self.carry - rounded).abs() < SNAP_EPSILON {
            rounded
        } else {
            self.carry.trunc()
        };
        self.carry -= whole;

        #[allow(clippy::cast_possible_truncation)]
        let minutes = whole as i64;
        minutes
    }

    pub fn end(&mut self) {
        self.last_angle = None;
        self.carry = 0.0;
    }
}

/// Point on a circle of `radius` around the centre at `angle`.
#[must_use]
pub fn point_at(angle: f64, radius: f64) -> Point {
    Point::new(
        CENTER.x + angle.cos() * radius,
        CENTER.y + angle.sin() * radius,
    )
}

/// `true` when `at` lies on the drawing surface.
#[must_use]
pub fn on_surface(at: Point) -> bool {
    at.is_valid() && (0.0..=SURFACE_SIZE).contains(&at.x) && (0.0..=SURFACE_SIZE).contains(&at.y)
}
