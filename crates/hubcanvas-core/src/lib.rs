#![forbid(unsafe_code)]

//! Core: widget geometry, constraint enforcement, grid snapping, and timing primitives.
//!
//! # Role in HubCanvas
//! `hubcanvas-core` is the data layer of the canvas interaction engine. It owns
//! the per-widget geometry store, the pure grid-snap policy, the update
//! debouncer that rate-limits persistence, and the gesture event vocabulary
//! the interaction controller consumes.
//!
//! # Primary responsibilities
//! - **GeometryModel**: constraint-preserving position/size storage with a
//!   single observer per widget.
//! - **GridSnap**: rounding released positions to the canvas grid.
//! - **Debouncer**: latest-value settling with at most one armed timer.
//! - **Spring / SettleAnimation**: visual settle toward a snapped target.
//!
//! # How it fits in the system
//! `hubcanvas-layout` drives the model through its drag/resize controller, and
//! `hubcanvas-runtime` hosts many widgets, the frame-rate monitor, and the
//! outbound event queue.

pub mod animation;
pub mod debounce;
pub mod geometry;
pub mod gesture;
pub mod logging;
pub mod model;
pub mod snap;

pub use animation::{Animation, Fade, SettleAnimation, Spring};
pub use debounce::{Debouncer, TimerId};
pub use geometry::{
    Corner, GeometryError, Point, Size, SizeConstraints, WidgetDescriptor, WidgetGeometry,
    WidgetId,
};
pub use gesture::{CancelReason, GestureEvent, GestureMode};
pub use model::{ChangeKind, GeometryChange, GeometryModel};
pub use snap::{DEFAULT_GRID_SIZE, GridSnap, snap};

// Re-export tracing macros at crate root for ergonomic use.
#[cfg(feature = "tracing")]
pub use logging::{debug, debug_span, info, trace, trace_span, warn};
