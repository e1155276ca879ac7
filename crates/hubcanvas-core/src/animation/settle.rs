#![forbid(unsafe_code)]

//! Release settle: carries a widget from where the pointer let go onto its
//! snapped grid position.
//!
//! The committed geometry already holds the snapped target; this animation
//! only tells the host where to draw the widget until it arrives.

use std::time::Duration;

use super::Animation;
use super::spring::Spring;
use crate::geometry::Point;

/// Two independent springs, one per axis.
#[derive(Debug, Clone)]
pub struct SettleAnimation {
    x: Spring,
    y: Spring,
    target: Point,
}

impl SettleAnimation {
    /// Settle from `from` to `to` with default spring parameters.
    #[must_use]
    pub fn new(from: Point, to: Point) -> Self {
        Self {
            x: Spring::new(from.x, to.x),
            y: Spring::new(from.y, to.y),
            target: to,
        }
    }

    /// Override spring parameters on both axes.
    #[must_use]
    pub fn with_params(mut self, stiffness: f64, damping: f64) -> Self {
        self.x = self.x.with_stiffness(stiffness).with_damping(damping);
        self.y = self.y.with_stiffness(stiffness).with_damping(damping);
        self
    }

    /// Where the widget should be drawn now.
    #[must_use]
    pub fn current(&self) -> Point {
        Point::new(self.x.position(), self.y.position())
    }

    /// The snapped position this settle ends at.
    #[inline]
    #[must_use]
    pub fn target(&self) -> Point {
        self.target
    }
}

impl Animation for SettleAnimation {
    fn tick(&mut self, dt: Duration) {
        self.x.tick(dt);
        self.y.tick(dt);
    }

    fn is_complete(&self) -> bool {
        self.x.is_complete() && self.y.is_complete()
    }

    /// The slower axis decides overall progress.
    fn value(&self) -> f32 {
        self.x.value().min(self.y.value())
    }

    fn reset(&mut self) {
        self.x.reset();
        self.y.reset();
    }
}
