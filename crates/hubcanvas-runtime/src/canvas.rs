#![forbid(unsafe_code)]

//! Canvas host: many widgets, one event queue.
//!
//! [`Canvas`] is the boundary between the embedding application and the
//! interaction engine. The host feeds it widget descriptors, gesture events,
//! viewport widths, the immersive flag, and clock ticks; the canvas answers
//! with [`CanvasOutput`] values queued for [`drain_outputs`](Canvas::drain_outputs).
//!
//! Time never advances on its own. `tick(now)` settles debounced commits and
//! finishes exit animations; `frame_tick(now)` feeds the frame-rate monitor
//! and the release settle springs.
//!
//! # Invariants
//!
//! 1. Each widget's geometry is written only by its own controller.
//! 2. Commits are emitted only after their quiet period, and only the latest
//!    geometry of a burst.
//! 3. A closing widget accepts no further gestures, and its pending commit is
//!    dropped. `WidgetRemoved` follows `CloseAnimationStarted` only after the
//!    exit duration has elapsed.
//! 4. After [`teardown`](Canvas::teardown) no call produces output.

use std::collections::VecDeque;
use std::fmt;
use std::time::Duration;

use ahash::AHashMap;
use hubcanvas_core::animation::{Animation, Fade, ease_in};
use hubcanvas_core::{
    GeometryChange, GeometryError, GeometryModel, GestureEvent, Point, WidgetDescriptor,
    WidgetGeometry, WidgetId,
};
use hubcanvas_layout::{
    Breakpoint, DockPolicy, DragResizeController, GestureEffect, GestureTransition,
};
use tracing::{debug, info, warn};
use web_time::Instant;

use crate::config::{CanvasConfig, CanvasConfigError};
use crate::perf_monitor::{MonitorHandle, MonitorSummary, start_monitoring};

// ---------------------------------------------------------------------------
// Outputs and errors
// ---------------------------------------------------------------------------

/// Something the host must act on.
#[derive(Debug, Clone, PartialEq)]
pub enum CanvasOutput {
    /// Persist this geometry (post-debounce).
    GeometryCommitted { id: WidgetId, geometry: WidgetGeometry },
    /// A gesture started; the widget is now front-most.
    Selected { id: WidgetId },
    /// Play the exit animation for this long.
    CloseAnimationStarted { id: WidgetId, duration: Duration },
    /// Remove the widget from the host's collection.
    WidgetRemoved { id: WidgetId },
    /// Adaptive-quality signal flipped.
    DegradedChanged { degraded: bool },
    /// Visible launcher count changed.
    DockChanged { breakpoint: Breakpoint, visible: usize },
}

/// Host-boundary errors. Runtime engine paths never fail.
#[derive(Debug, Clone, PartialEq)]
pub enum CanvasError {
    /// The descriptor was rejected by the geometry store.
    Geometry(GeometryError),
    UnknownWidget { id: WidgetId },
    /// The widget is playing its exit animation.
    WidgetClosing { id: WidgetId },
    /// The canvas has been torn down.
    TornDown,
}

impl fmt::Display for CanvasError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Geometry(e) => write!(f, "invalid widget geometry: {e}"),
            Self::UnknownWidget { id } => write!(f, "unknown widget {id}"),
            Self::WidgetClosing { id } => write!(f, "widget {id} is closing"),
            Self::TornDown => f.write_str("canvas has been torn down"),
        }
    }
}

impl std::error::Error for CanvasError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Geometry(e) => Some(e),
            _ => None,
        }
    }
}

impl From<GeometryError> for CanvasError {
    fn from(e: GeometryError) -> Self {
        Self::Geometry(e)
    }
}

// ---------------------------------------------------------------------------
// Canvas
// ---------------------------------------------------------------------------

#[derive(Debug)]
struct Closing {
    id: WidgetId,
    started: Instant,
    exit: Fade,
}

/// The widget canvas.
pub struct Canvas {
    config: CanvasConfig,
    model: GeometryModel,
    controllers: AHashMap<WidgetId, DragResizeController>,
    /// Back to front.
    z_order: Vec<WidgetId>,
    closing: Vec<Closing>,
    dock: DockPolicy,
    viewport_width: Option<u32>,
    visible_launchers: Option<usize>,
    monitor: Option<MonitorHandle>,
    degraded: bool,
    last_frame: Option<Instant>,
    outputs: VecDeque<CanvasOutput>,
    torn_down: bool,
}

impl fmt::Debug for Canvas {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Canvas")
            .field("widgets", &self.model.len())
            .field("closing", &self.closing.len())
            .field("degraded", &self.degraded)
            .field("queued_outputs", &self.outputs.len())
            .field("torn_down", &self.torn_down)
            .finish()
    }
}

impl Default for Canvas {
    fn default() -> Self {
        Self::build(CanvasConfig::default())
    }
}

impl Canvas {
    /// Canvas with a validated configuration. Monitoring starts immediately.
    pub fn new(config: CanvasConfig) -> Result<Self, CanvasConfigError> {
        Ok(Self::build(config.validated()?))
    }

    fn build(config: CanvasConfig) -> Self {
        let monitor = start_monitoring(config.to_monitor_config());
        Self {
            dock: config.to_dock_policy(),
            config,
            model: GeometryModel::new(),
            controllers: AHashMap::new(),
            z_order: Vec::new(),
            closing: Vec::new(),
            viewport_width: None,
            visible_launchers: None,
            monitor: Some(monitor),
            degraded: false,
            last_frame: None,
            outputs: VecDeque::new(),
            torn_down: false,
        }
    }

    #[must_use]
    pub fn config(&self) -> &CanvasConfig {
        &self.config
    }

    // -- widgets ------------------------------------------------------------

    /// Register a widget. Its size is clamped into its constraints.
    pub fn add_widget(
        &mut self,
        descriptor: &WidgetDescriptor,
    ) -> Result<WidgetGeometry, CanvasError> {
        if self.torn_down {
            return Err(CanvasError::TornDown);
        }
        let geometry = self.model.insert(descriptor)?;
        let controller = DragResizeController::new(
            descriptor.id,
            self.config.to_grid(),
            self.config.quiet_period(),
        )
        .with_settle_params(self.config.settle.stiffness, self.config.settle.damping);
        self.controllers.insert(descriptor.id, controller);
        self.z_order.push(descriptor.id);
        info!(widget = %descriptor.id, title = %descriptor.title, "widget added");
        Ok(geometry)
    }

    /// Install the render host's read-only observer for one widget.
    pub fn observe(
        &mut self,
        id: WidgetId,
        observer: impl FnMut(&GeometryChange) + 'static,
    ) -> Result<(), CanvasError> {
        if self.model.set_observer(id, observer) {
            Ok(())
        } else {
            Err(CanvasError::UnknownWidget { id })
        }
    }

    /// Route one gesture event to the widget's controller.
    pub fn handle_gesture(
        &mut self,
        id: WidgetId,
        event: &GestureEvent,
        now: Instant,
    ) -> Result<GestureTransition, CanvasError> {
        self.ensure_live()?;
        if self.is_closing(id) {
            return Err(CanvasError::WidgetClosing { id });
        }
        let controller = self
            .controllers
            .get_mut(&id)
            .ok_or(CanvasError::UnknownWidget { id })?;
        let transition = controller.handle(&mut self.model, event, now);
        if matches!(transition.effect, GestureEffect::Started { .. }) {
            self.raise(id);
            self.outputs.push_back(CanvasOutput::Selected { id });
        }
        Ok(transition)
    }

    /// Begin closing a widget. Idempotent while the exit animation runs.
    ///
    /// Returns the revert transition when a gesture was in progress.
    pub fn close_widget(
        &mut self,
        id: WidgetId,
        now: Instant,
    ) -> Result<Option<GestureTransition>, CanvasError> {
        self.ensure_live()?;
        if self.is_closing(id) {
            return Ok(None);
        }
        let controller = self
            .controllers
            .get_mut(&id)
            .ok_or(CanvasError::UnknownWidget { id })?;
        let reverted = controller.close(&mut self.model, now);

        let duration = self.config.exit_animation();
        self.closing.push(Closing {
            id,
            started: now,
            exit: Fade::new(duration).easing(ease_in),
        });
        self.outputs
            .push_back(CanvasOutput::CloseAnimationStarted { id, duration });
        debug!(widget = %id, ?duration, "widget closing");
        Ok(reverted)
    }

    fn is_closing(&self, id: WidgetId) -> bool {
        self.closing.iter().any(|c| c.id == id)
    }

    /// Exit animation progress in [0, 1], if the widget is closing.
    #[must_use]
    pub fn close_progress(&self, id: WidgetId) -> Option<f32> {
        self.closing.iter().find(|c| c.id == id).map(|c| c.exit.value())
    }

    fn raise(&mut self, id: WidgetId) {
        if let Some(pos) = self.z_order.iter().position(|w| *w == id) {
            let w = self.z_order.remove(pos);
            self.z_order.push(w);
        }
    }

    fn ensure_live(&self) -> Result<(), CanvasError> {
        if self.torn_down {
            Err(CanvasError::TornDown)
        } else {
            Ok(())
        }
    }

    // -- viewport, dock, immersive ------------------------------------------

    /// Report a new viewport width. Emits `DockChanged` when the launcher
    /// count changes (and for the first width reported).
    pub fn set_viewport_width(&mut self, width: u32) {
        if self.torn_down {
            return;
        }
        self.viewport_width = Some(width);
        let visible = self.dock.visible_count(width);
        if self.visible_launchers != Some(visible) {
            self.visible_launchers = Some(visible);
            self.outputs.push_back(CanvasOutput::DockChanged {
                breakpoint: self.dock.breakpoint(width),
                visible,
            });
        }
    }

    /// Visible launcher count for the last reported width.
    #[must_use]
    pub fn visible_launcher_count(&self) -> Option<usize> {
        self.visible_launchers
    }

    /// The launchers to render for the last reported width. Before any width
    /// is known the full list is returned.
    #[must_use]
    pub fn visible_launchers<'a, L>(&self, launchers: &'a [L]) -> &'a [L] {
        match self.viewport_width {
            Some(width) => self.dock.visible_launchers(launchers, width),
            None => launchers,
        }
    }

    pub fn set_immersive(&mut self, active: bool) {
        if self.torn_down {
            return;
        }
        if let Some(monitor) = self.monitor.as_mut() {
            monitor.set_immersive(active);
        }
        self.sync_degraded();
    }

    #[must_use]
    pub fn is_degraded(&self) -> bool {
        self.degraded
    }

    fn sync_degraded(&mut self) {
        let degraded = self.monitor.as_ref().is_some_and(MonitorHandle::is_degraded);
        if degraded != self.degraded {
            self.degraded = degraded;
            if degraded {
                warn!("sustained low frame rate, degrading canvas quality");
            } else {
                info!("frame rate recovered");
            }
            self.outputs
                .push_back(CanvasOutput::DegradedChanged { degraded });
        }
    }

    // -- time ---------------------------------------------------------------

    /// One rendered frame: feed the monitor and advance settle animations.
    pub fn frame_tick(&mut self, now: Instant) {
        if self.torn_down {
            return;
        }
        if let Some(monitor) = self.monitor.as_mut() {
            monitor.tick(now);
        }
        self.sync_degraded();

        let dt = self
            .last_frame
            .and_then(|last| now.checked_duration_since(last))
            .unwrap_or(Duration::ZERO);
        self.last_frame = Some(now);
        if !dt.is_zero() {
            for controller in self.controllers.values_mut() {
                controller.advance_settle(dt);
            }
        }
    }

    /// Timer work: settle debounced commits and finish exit animations.
    pub fn tick(&mut self, now: Instant) {
        if self.torn_down {
            return;
        }
        for id in &self.z_order {
            if let Some(geometry) = self
                .controllers
                .get_mut(id)
                .and_then(|c| c.poll_commit(now))
            {
                debug!(widget = %id, "geometry committed");
                self.outputs
                    .push_back(CanvasOutput::GeometryCommitted { id: *id, geometry });
            }
        }

        let mut finished = Vec::new();
        for closing in &mut self.closing {
            closing.exit.reset();
            closing
                .exit
                .tick(now.saturating_duration_since(closing.started));
            if closing.exit.is_complete() {
                finished.push(closing.id);
            }
        }
        for id in finished {
            self.remove(id);
        }
    }

    fn remove(&mut self, id: WidgetId) {
        self.closing.retain(|c| c.id != id);
        self.controllers.remove(&id);
        self.z_order.retain(|w| *w != id);
        self.model.remove(id);
        self.outputs.push_back(CanvasOutput::WidgetRemoved { id });
        info!(widget = %id, "widget removed");
    }

    /// Emit every pending commit now, ignoring quiet periods (e.g. before the
    /// host suspends).
    pub fn flush_commits(&mut self) {
        if self.torn_down {
            return;
        }
        for id in &self.z_order {
            if let Some(geometry) = self.controllers.get_mut(id).and_then(|c| c.flush_commit()) {
                self.outputs
                    .push_back(CanvasOutput::GeometryCommitted { id: *id, geometry });
            }
        }
    }

    /// Cancel every timer and gesture and stop the monitor.
    ///
    /// Outputs already queued stay drainable; nothing new is produced.
    pub fn teardown(&mut self, now: Instant) -> Option<MonitorSummary> {
        if self.torn_down {
            return None;
        }
        for controller in self.controllers.values_mut() {
            controller.close(&mut self.model, now);
        }
        self.closing.clear();
        self.torn_down = true;
        let summary = self.monitor.take().map(MonitorHandle::stop);
        info!(widgets = self.model.len(), "canvas torn down");
        summary
    }

    #[must_use]
    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    // -- outputs and queries ------------------------------------------------

    pub fn drain_outputs(&mut self) -> Vec<CanvasOutput> {
        self.outputs.drain(..).collect()
    }

    #[must_use]
    pub fn geometry(&self, id: WidgetId) -> Option<WidgetGeometry> {
        self.model.get(id)
    }

    /// Where to draw the widget this frame (settle-aware).
    #[must_use]
    pub fn display_position(&self, id: WidgetId) -> Option<Point> {
        self.controllers.get(&id)?.display_position(&self.model)
    }

    /// Widget ids from back to front.
    #[must_use]
    pub fn z_order(&self) -> &[WidgetId] {
        &self.z_order
    }

    #[must_use]
    pub fn widget_count(&self) -> usize {
        self.model.len()
    }

    #[must_use]
    pub fn model(&self) -> &GeometryModel {
        &self.model
    }

    #[must_use]
    pub fn fps(&self) -> Option<u32> {
        self.monitor.as_ref().map(|m| m.monitor().fps())
    }
}
