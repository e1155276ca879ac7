#![forbid(unsafe_code)]

//! Damped harmonic oscillator on a single axis.
//!
//!   F = -stiffness × (position - target) - damping × velocity
//!
//! Canvas coordinates are unbounded, so the interesting output is
//! [`position`](Spring::position); [`Animation::value`] reports normalized
//! progress from the start point toward the target instead.
//!
//! # Invariants
//!
//! 1. A spring at rest stays at rest until [`set_target`](Spring::set_target)
//!    or [`reset`](Animation::reset).
//! 2. Coming to rest snaps `position` exactly onto `target`.
//! 3. Stiffness is at least [`MIN_STIFFNESS`]; damping is non-negative.
//!
//! # Failure Modes
//!
//! - Large `dt` is subdivided into steps of at most 4ms.
//! - Zero damping oscillates forever and never reports complete.

use std::time::Duration;

use super::Animation;

/// Maximum dt per integration step (4ms).
const MAX_STEP_SECS: f64 = 0.004;

/// Position delta (logical units) below which the spring may rest.
const DEFAULT_REST_THRESHOLD: f64 = 0.01;

/// Speed below which (with the position threshold) the spring may rest.
const DEFAULT_VELOCITY_THRESHOLD: f64 = 0.1;

/// Minimum stiffness.
pub const MIN_STIFFNESS: f64 = 0.1;

/// Default stiffness for the release settle.
pub const DEFAULT_STIFFNESS: f64 = 170.0;

/// Default damping for the release settle (slightly underdamped).
pub const DEFAULT_DAMPING: f64 = 26.0;

/// A damped spring driving one coordinate toward a target.
#[derive(Debug, Clone)]
pub struct Spring {
    position: f64,
    velocity: f64,
    target: f64,
    initial: f64,
    stiffness: f64,
    damping: f64,
    rest_threshold: f64,
    velocity_threshold: f64,
    at_rest: bool,
}

impl Spring {
    /// Spring starting at `initial` and heading for `target`.
    #[must_use]
    pub fn new(initial: f64, target: f64) -> Self {
        let at_rest = initial == target;
        Self {
            position: initial,
            velocity: 0.0,
            target,
            initial,
            stiffness: DEFAULT_STIFFNESS,
            damping: DEFAULT_DAMPING,
            rest_threshold: DEFAULT_REST_THRESHOLD,
            velocity_threshold: DEFAULT_VELOCITY_THRESHOLD,
            at_rest,
        }
    }

    /// Set stiffness (builder). Clamped to [`MIN_STIFFNESS`]; NaN falls back to the default.
    #[must_use]
    pub fn with_stiffness(mut self, k: f64) -> Self {
        self.stiffness = if k.is_nan() { DEFAULT_STIFFNESS } else { k.max(MIN_STIFFNESS) };
        self
    }

    /// Set damping (builder). Clamped to >= 0; NaN falls back to the default.
    #[must_use]
    pub fn with_damping(mut self, c: f64) -> Self {
        self.damping = if c.is_nan() { DEFAULT_DAMPING } else { c.max(0.0) };
        self
    }

    #[inline]
    #[must_use]
    pub fn position(&self) -> f64 {
        self.position
    }

    #[inline]
    #[must_use]
    pub fn velocity(&self) -> f64 {
        self.velocity
    }

    #[inline]
    #[must_use]
    pub fn target(&self) -> f64 {
        self.target
    }

    #[inline]
    #[must_use]
    pub fn stiffness(&self) -> f64 {
        self.stiffness
    }

    #[inline]
    #[must_use]
    pub fn damping(&self) -> f64 {
        self.damping
    }

    /// Retarget. Wakes the spring if the target actually moved.
    pub fn set_target(&mut self, target: f64) {
        if (self.target - target).abs() > self.rest_threshold {
            self.target = target;
            self.at_rest = false;
        }
    }

    #[inline]
    #[must_use]
    pub fn is_at_rest(&self) -> bool {
        self.at_rest
    }

    /// Damping coefficient at which the spring converges without overshoot.
    #[must_use]
    pub fn critical_damping(&self) -> f64 {
        2.0 * self.stiffness.sqrt()
    }

    /// Semi-implicit Euler step of `dt` seconds.
    fn step(&mut self, dt: f64) {
        let displacement = self.position - self.target;
        let acceleration = -self.stiffness * displacement - self.damping * self.velocity;
        self.velocity += acceleration * dt;
        self.position += self.velocity * dt;
    }

    /// Advance by `dt`, subdividing for stability.
    pub fn advance(&mut self, dt: Duration) {
        if self.at_rest {
            return;
        }
        let mut remaining = dt.as_secs_f64();
        while remaining > 0.0 {
            let step_dt = remaining.min(MAX_STEP_SECS);
            self.step(step_dt);
            remaining -= step_dt;
        }
        if (self.position - self.target).abs() < self.rest_threshold
            && self.velocity.abs() < self.velocity_threshold
        {
            self.position = self.target;
            self.velocity = 0.0;
            self.at_rest = true;
        }
    }
}

impl Animation for Spring {
    fn tick(&mut self, dt: Duration) {
        self.advance(dt);
    }

    fn is_complete(&self) -> bool {
        self.at_rest
    }

    /// Progress from `initial` toward `target`, clamped to [0.0, 1.0].
    fn value(&self) -> f32 {
        let span = self.target - self.initial;
        if span == 0.0 || self.at_rest {
            return 1.0;
        }
        (((self.position - self.initial) / span) as f32).clamp(0.0, 1.0)
    }

    fn reset(&mut self) {
        self.position = self.initial;
        self.velocity = 0.0;
        self.at_rest = self.initial == self.target;
    }
}
