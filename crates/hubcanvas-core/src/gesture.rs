#![forbid(unsafe_code)]

//! Gesture vocabulary shared by the host and the interaction controller.
//!
//! The host translates raw pointer input into [`GestureEvent`]s tagged with a
//! widget id. Pointer coordinates are absolute canvas coordinates; the
//! controller derives deltas from the gesture-start snapshot, so dropped or
//! jittery intermediate moves never accumulate error.
//!
//! # Ordering
//!
//! Events for one widget must be delivered in arrival order. Events that do
//! not fit the current state (a `Move` with no active gesture, a second
//! `DragStart` mid-gesture, an `End` after a `Cancel`) are ignored by the
//! controller, never rejected.

use serde::{Deserialize, Serialize};

use crate::geometry::{Corner, Point};

/// What kind of gesture is active on a widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GestureMode {
    Dragging,
    Resizing,
}

/// Why a gesture ended without committing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CancelReason {
    /// The pointer was lost (capture released, window blurred, touch cancelled).
    PointerLost,
    /// The host cancelled the gesture.
    Programmatic,
    /// The widget was closed mid-gesture.
    Closed,
}

impl CancelReason {
    /// Stable string for structured logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::PointerLost => "pointer_lost",
            Self::Programmatic => "programmatic",
            Self::Closed => "closed",
        }
    }
}

/// One pointer-level event for a single widget.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum GestureEvent {
    /// Pointer pressed on the widget's title bar.
    DragStart { pointer: Point },
    /// Pointer pressed on one of the resize handles.
    ResizeStart { corner: Corner, pointer: Point },
    /// Pointer moved while pressed.
    Move { pointer: Point },
    /// Pointer released.
    End,
    /// Gesture aborted; geometry reverts to the gesture-start snapshot.
    Cancel { reason: CancelReason },
}

impl GestureEvent {
    /// Stable string for structured logs.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::DragStart { .. } => "drag_start",
            Self::ResizeStart { .. } => "resize_start",
            Self::Move { .. } => "move",
            Self::End => "end",
            Self::Cancel { .. } => "cancel",
        }
    }

    /// Whether this event opens a gesture.
    #[must_use]
    pub const fn is_start(&self) -> bool {
        matches!(self, Self::DragStart { .. } | Self::ResizeStart { .. })
    }
}
