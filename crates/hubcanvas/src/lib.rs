#![forbid(unsafe_code)]

//! HubCanvas public facade crate.
//!
//! Re-exports the geometry model, the interaction controller, and (with the
//! default `runtime` feature) the canvas host, so applications depend on a
//! single crate. Most code only needs the [`prelude`].

// --- Core re-exports -------------------------------------------------------

pub use hubcanvas_core::{
    Animation, CancelReason, ChangeKind, Corner, DEFAULT_GRID_SIZE, Debouncer, Fade,
    GeometryChange, GeometryError, GeometryModel, GestureEvent, GestureMode, GridSnap, Point,
    SettleAnimation, Size, SizeConstraints, Spring, WidgetDescriptor, WidgetGeometry, WidgetId,
};

// --- Layout re-exports -----------------------------------------------------

pub use hubcanvas_layout::{
    Breakpoint, Breakpoints, DockPolicy, DragResizeController, GestureEffect, GestureState,
    GestureTransition, NoopReason, Responsive,
};

// --- Runtime re-exports ----------------------------------------------------

#[cfg(feature = "runtime")]
pub use hubcanvas_runtime::{
    Canvas, CanvasConfig, CanvasConfigError, CanvasError, CanvasOutput, MonitorConfig,
    MonitorHandle, MonitorSummary, PerformanceMonitor, start_monitoring,
};

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        Breakpoint, Corner, GeometryModel, GestureEvent, Point, Size, SizeConstraints,
        WidgetDescriptor, WidgetGeometry, WidgetId,
    };

    #[cfg(feature = "runtime")]
    pub use crate::{Canvas, CanvasConfig, CanvasError, CanvasOutput};

    pub use crate::{core, layout};

    #[cfg(feature = "runtime")]
    pub use crate::runtime;
}

pub use hubcanvas_core as core;
pub use hubcanvas_layout as layout;
#[cfg(feature = "runtime")]
pub use hubcanvas_runtime as runtime;
