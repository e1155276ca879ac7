#![forbid(unsafe_code)]

//! Grid snapping for released widget positions.
//!
//! Snapping is applied once, when a drag ends. Motion during the gesture is
//! left unsnapped; the jump on release is the affordance.
//!
//! # Invariants
//!
//! 1. `snap(k * g, g) == k * g` for every integer `k`.
//! 2. `|snap(x, g) - x| <= g / 2`.
//! 3. Ties round toward positive infinity (`-16` snaps to `0` on a 32 grid,
//!    `16` snaps to `32`).
//!
//! # Failure Modes
//!
//! None. A grid size that is zero, negative, or non-finite disables snapping
//! and returns the input unchanged, as does a non-finite coordinate.

use serde::{Deserialize, Serialize};

use crate::geometry::Point;

/// Default grid pitch in logical units.
pub const DEFAULT_GRID_SIZE: f64 = 32.0;

/// Round `coordinate` to the nearest multiple of `grid_size`.
#[inline]
#[must_use]
pub fn snap(coordinate: f64, grid_size: f64) -> f64 {
    if !grid_size.is_finite() || grid_size <= 0.0 || !coordinate.is_finite() {
        return coordinate;
    }
    let snapped = (coordinate / grid_size + 0.5).floor() * grid_size;
    // Normalize -0.0 so persisted geometry never carries a signed zero.
    if snapped == 0.0 { 0.0 } else { snapped }
}

/// Per-canvas grid configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridSnap {
    grid_size: f64,
}

impl Default for GridSnap {
    fn default() -> Self {
        Self {
            grid_size: DEFAULT_GRID_SIZE,
        }
    }
}

impl GridSnap {
    /// Grid with an explicit pitch. See the module docs for degenerate sizes.
    #[must_use]
    pub const fn new(grid_size: f64) -> Self {
        Self { grid_size }
    }

    #[inline]
    #[must_use]
    pub const fn grid_size(&self) -> f64 {
        self.grid_size
    }

    /// Snap a single coordinate.
    #[inline]
    #[must_use]
    pub fn snap(&self, coordinate: f64) -> f64 {
        snap(coordinate, self.grid_size)
    }

    /// Snap both axes of a point.
    #[inline]
    #[must_use]
    pub fn snap_point(&self, point: Point) -> Point {
        Point::new(self.snap(point.x), self.snap(point.y))
    }
}
