#![forbid(unsafe_code)]

//! Interaction and responsive layout policy for the canvas.
//!
//! - [`drag_resize`]: the per-widget drag/resize lifecycle machine and the
//!   controller that applies it to a [`GeometryModel`](hubcanvas_core::GeometryModel).
//! - [`dock`]: how many launchers the dock shows at a given viewport width.
//! - [`Responsive`]: breakpoint-indexed values with inheritance.

pub mod dock;
pub mod drag_resize;
pub mod responsive;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use dock::{DEFAULT_DESKTOP_COUNT, DEFAULT_MOBILE_COUNT, DEFAULT_TABLET_COUNT, DockPolicy};
pub use drag_resize::{
    DragResizeController, GestureEffect, GestureState, GestureTransition, NoopReason, Step, step,
};
pub use responsive::Responsive;

/// Viewport width tier.
///
/// | Breakpoint | Default min width | Typical device |
/// |-----------|-------------------|----------------|
/// | `Mobile`  | < 768 px          | Phone          |
/// | `Tablet`  | 768–1023 px       | Tablet         |
/// | `Desktop` | 1024+ px          | Laptop/desktop |
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Breakpoint {
    Mobile,
    Tablet,
    Desktop,
}

impl Breakpoint {
    /// All breakpoints in ascending order.
    pub const ALL: [Breakpoint; 3] = [Breakpoint::Mobile, Breakpoint::Tablet, Breakpoint::Desktop];

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Breakpoint::Mobile => "mobile",
            Breakpoint::Tablet => "tablet",
            Breakpoint::Desktop => "desktop",
        }
    }
}

impl fmt::Display for Breakpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Breakpoint thresholds in logical pixels.
///
/// Each field is the inclusive minimum width of its tier; `Mobile` starts at 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Breakpoints {
    pub tablet: u32,
    pub desktop: u32,
}

impl Default for Breakpoints {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl Breakpoints {
    /// 768 / 1024 px.
    pub const DEFAULT: Self = Self {
        tablet: 768,
        desktop: 1024,
    };

    /// Thresholds are sanitized to be non-decreasing.
    #[must_use]
    pub const fn new(tablet: u32, desktop: u32) -> Self {
        let desktop = if desktop < tablet { tablet } else { desktop };
        Self { tablet, desktop }
    }

    /// Classify a viewport width.
    #[inline]
    #[must_use]
    pub const fn classify_width(self, width: u32) -> Breakpoint {
        if width >= self.desktop {
            Breakpoint::Desktop
        } else if width >= self.tablet {
            Breakpoint::Tablet
        } else {
            Breakpoint::Mobile
        }
    }

    /// Minimum width for `bp`.
    #[must_use]
    pub const fn threshold(self, bp: Breakpoint) -> u32 {
        match bp {
            Breakpoint::Mobile => 0,
            Breakpoint::Tablet => self.tablet,
            Breakpoint::Desktop => self.desktop,
        }
    }
}
