#![forbid(unsafe_code)]

//! Responsive dock: how many launchers fit at a given viewport width.
//!
//! The dock shows a prefix of the configured launcher order. Order is the
//! caller's; this module never reorders or filters by anything but count.
//!
//! # Invariants
//!
//! 1. `visible_count` is a pure function of width.
//! 2. `visible_launchers(l, w).len() == min(l.len(), visible_count(w))`.
//! 3. Widening the viewport never hides a launcher that was visible, as long
//!    as the per-tier counts are non-decreasing (the defaults are).

use serde::{Deserialize, Serialize};

use crate::responsive::Responsive;
use crate::{Breakpoint, Breakpoints};

pub const DEFAULT_MOBILE_COUNT: usize = 6;
pub const DEFAULT_TABLET_COUNT: usize = 8;
pub const DEFAULT_DESKTOP_COUNT: usize = 10;

/// Breakpoint thresholds plus the launcher count per tier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DockPolicy {
    breakpoints: Breakpoints,
    counts: Responsive<usize>,
}

impl Default for DockPolicy {
    fn default() -> Self {
        Self::new(
            Breakpoints::DEFAULT,
            DEFAULT_MOBILE_COUNT,
            DEFAULT_TABLET_COUNT,
            DEFAULT_DESKTOP_COUNT,
        )
    }
}

impl DockPolicy {
    #[must_use]
    pub fn new(breakpoints: Breakpoints, mobile: usize, tablet: usize, desktop: usize) -> Self {
        Self {
            breakpoints,
            counts: Responsive::new(mobile)
                .at(Breakpoint::Tablet, tablet)
                .at(Breakpoint::Desktop, desktop),
        }
    }

    #[must_use]
    pub fn breakpoints(&self) -> Breakpoints {
        self.breakpoints
    }

    #[must_use]
    pub fn breakpoint(&self, width: u32) -> Breakpoint {
        self.breakpoints.classify_width(width)
    }

    /// Launcher count at `width`.
    #[must_use]
    pub fn visible_count(&self, width: u32) -> usize {
        *self.counts.resolve(self.breakpoint(width))
    }

    /// The leading launchers that fit at `width`.
    #[must_use]
    pub fn visible_launchers<'a, L>(&self, launchers: &'a [L], width: u32) -> &'a [L] {
        let n = self.visible_count(width).min(launchers.len());
        &launchers[..n]
    }

    /// Serializable snapshot, used for diagnostics.
    #[must_use]
    pub fn snapshot(&self, width: u32) -> DockSnapshot {
        DockSnapshot {
            width,
            breakpoint: self.breakpoint(width),
            visible: self.visible_count(width),
        }
    }
}

/// What the dock decided for one width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DockSnapshot {
    pub width: u32,
    pub breakpoint: Breakpoint,
    pub visible: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    const LAUNCHERS: [&str; 12] = [
        "contacts", "calendar", "notes", "tasks", "mail", "files", "chat", "maps", "photos",
        "music", "clock", "settings",
    ];

    #[test]
    fn default_counts_by_width() {
        let dock = DockPolicy::default();
        assert_eq!(dock.visible_count(1920), 10);
        assert_eq!(dock.visible_count(1024), 10);
        assert_eq!(dock.visible_count(900), 8);
        assert_eq!(dock.visible_count(768), 8);
        assert_eq!(dock.visible_count(767), 6);
        assert_eq!(dock.visible_count(600), 6);
        assert_eq!(dock.visible_count(0), 6);
    }

    #[test]
    fn launchers_are_a_stable_prefix() {
        let dock = DockPolicy::default();
        assert_eq!(dock.visible_launchers(&LAUNCHERS, 600), &LAUNCHERS[..6]);
        assert_eq!(dock.visible_launchers(&LAUNCHERS, 1920), &LAUNCHERS[..10]);
        let few = ["a", "b", "c"];
        assert_eq!(dock.visible_launchers(&few, 1920), &few[..]);
        let none: [&str; 0] = [];
        assert!(dock.visible_launchers(&none, 1920).is_empty());
    }

    #[test]
    fn snapshot_serializes() {
        let snap = DockPolicy::default().snapshot(900);
        let json = serde_json::to_string(&snap).unwrap();
        assert_eq!(json, r#"{"width":900,"breakpoint":"tablet","visible":8}"#);
    }
}
