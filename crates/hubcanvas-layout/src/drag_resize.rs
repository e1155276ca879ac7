#![forbid(unsafe_code)]

//! Per-widget drag/resize lifecycle.
//!
//! The lifecycle is a pure function, [`step`], from `(state, event)` plus the
//! widget's current geometry to a next state and one [`GestureEffect`]. The
//! [`DragResizeController`] wraps it for one widget: it feeds the function
//! from the [`GeometryModel`], applies the effect back, owns the release
//! settle animation and the commit debouncer, and numbers transitions.
//!
//! ```text
//! Idle -> Dragging -> Idle   (End: snap + commit, Cancel: revert)
//! Idle -> Resizing -> Idle   (End: commit, Cancel: revert)
//! ```
//!
//! # Invariants
//!
//! 1. Move deltas are taken from the gesture-start pointer, never the
//!    previous event, so jitter and dropped moves never accumulate.
//! 2. During a resize every intermediate size satisfies the constraints, and
//!    the edges opposite the active corner do not move.
//! 3. Cancel restores the gesture-start geometry exactly. It is the only
//!    backward transition.
//! 4. Only drags snap. A resize commits the size the user produced.
//! 5. Events that do not fit the state produce `Noop`; nothing is raised.
//!
//! # Failure Modes
//!
//! - Non-finite pointer coordinates are ignored (`Noop`).
//! - Events for a widget the model no longer holds are ignored (`Noop`).

use std::time::Duration;

use hubcanvas_core::animation::Animation;
use hubcanvas_core::animation::spring::{DEFAULT_DAMPING, DEFAULT_STIFFNESS};
use hubcanvas_core::{
    CancelReason, Corner, Debouncer, GeometryModel, GestureEvent, GestureMode, GridSnap, Point,
    SettleAnimation, Size, SizeConstraints, WidgetGeometry, WidgetId,
};
use serde::{Deserialize, Serialize};
use web_time::Instant;

// ---------------------------------------------------------------------------
// State, effects, transitions
// ---------------------------------------------------------------------------

/// Lifecycle state for one widget.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum GestureState {
    #[default]
    Idle,
    Dragging {
        origin: WidgetGeometry,
        origin_pointer: Point,
        current: WidgetGeometry,
    },
    Resizing {
        corner: Corner,
        origin: WidgetGeometry,
        origin_pointer: Point,
        current: WidgetGeometry,
    },
}

impl GestureState {
    #[must_use]
    pub const fn is_active(&self) -> bool {
        !matches!(self, Self::Idle)
    }

    #[must_use]
    pub const fn mode(&self) -> Option<GestureMode> {
        match self {
            Self::Idle => None,
            Self::Dragging { .. } => Some(GestureMode::Dragging),
            Self::Resizing { .. } => Some(GestureMode::Resizing),
        }
    }

    /// Geometry snapshot taken when the active gesture started.
    #[must_use]
    pub const fn origin(&self) -> Option<WidgetGeometry> {
        match self {
            Self::Idle => None,
            Self::Dragging { origin, .. } | Self::Resizing { origin, .. } => Some(*origin),
        }
    }
}

/// Why an event was ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoopReason {
    /// `Move`, `End` or `Cancel` with no gesture in progress.
    IdleWithoutActiveGesture,
    /// A start event while another gesture is in progress.
    GestureAlreadyActive,
    NonFinitePointer,
    /// The model no longer holds the widget.
    WidgetMissing,
}

/// What one step did.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "effect", rename_all = "snake_case")]
pub enum GestureEffect {
    Started {
        mode: GestureMode,
        origin: WidgetGeometry,
    },
    Moved {
        geometry: WidgetGeometry,
    },
    Committed {
        mode: GestureMode,
        geometry: WidgetGeometry,
        /// Where the widget was when the pointer was released, before snapping.
        released_at: Point,
    },
    Reverted {
        geometry: WidgetGeometry,
        reason: CancelReason,
    },
    Noop {
        reason: NoopReason,
    },
}

impl GestureEffect {
    /// Stable string for structured logs.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Started { .. } => "started",
            Self::Moved { .. } => "moved",
            Self::Committed { .. } => "committed",
            Self::Reverted { .. } => "reverted",
            Self::Noop { .. } => "noop",
        }
    }
}

/// Output of [`step`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Step {
    pub state: GestureState,
    pub effect: GestureEffect,
}

impl Step {
    const fn noop(state: GestureState, reason: NoopReason) -> Self {
        Self {
            state,
            effect: GestureEffect::Noop { reason },
        }
    }
}

/// One numbered controller transition.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GestureTransition {
    pub transition_id: u64,
    pub widget: WidgetId,
    pub from: GestureState,
    pub to: GestureState,
    pub effect: GestureEffect,
}

// ---------------------------------------------------------------------------
// Pure transition function
// ---------------------------------------------------------------------------

/// Advance the lifecycle by one event.
///
/// `geometry` is the widget's current geometry; it becomes the origin
/// snapshot when a gesture starts and is otherwise unused.
#[must_use]
pub fn step(
    state: GestureState,
    event: &GestureEvent,
    geometry: WidgetGeometry,
    constraints: &SizeConstraints,
    grid: &GridSnap,
) -> Step {
    match (state, *event) {
        (GestureState::Idle, GestureEvent::DragStart { pointer }) => {
            if !is_finite(pointer) {
                return Step::noop(state, NoopReason::NonFinitePointer);
            }
            Step {
                state: GestureState::Dragging {
                    origin: geometry,
                    origin_pointer: pointer,
                    current: geometry,
                },
                effect: GestureEffect::Started {
                    mode: GestureMode::Dragging,
                    origin: geometry,
                },
            }
        }
        (GestureState::Idle, GestureEvent::ResizeStart { corner, pointer }) => {
            if !is_finite(pointer) {
                return Step::noop(state, NoopReason::NonFinitePointer);
            }
            Step {
                state: GestureState::Resizing {
                    corner,
                    origin: geometry,
                    origin_pointer: pointer,
                    current: geometry,
                },
                effect: GestureEffect::Started {
                    mode: GestureMode::Resizing,
                    origin: geometry,
                },
            }
        }
        (GestureState::Idle, _) => Step::noop(state, NoopReason::IdleWithoutActiveGesture),
        (_, GestureEvent::DragStart { .. } | GestureEvent::ResizeStart { .. }) => {
            Step::noop(state, NoopReason::GestureAlreadyActive)
        }

        (
            GestureState::Dragging {
                origin,
                origin_pointer,
                ..
            },
            GestureEvent::Move { pointer },
        ) => {
            if !is_finite(pointer) {
                return Step::noop(state, NoopReason::NonFinitePointer);
            }
            let (dx, dy) = pointer.delta_from(origin_pointer);
            let next = WidgetGeometry::new(origin.position.offset(dx, dy), origin.size);
            Step {
                state: GestureState::Dragging {
                    origin,
                    origin_pointer,
                    current: next,
                },
                effect: GestureEffect::Moved { geometry: next },
            }
        }
        (
            GestureState::Resizing {
                corner,
                origin,
                origin_pointer,
                ..
            },
            GestureEvent::Move { pointer },
        ) => {
            if !is_finite(pointer) {
                return Step::noop(state, NoopReason::NonFinitePointer);
            }
            let (dx, dy) = pointer.delta_from(origin_pointer);
            let next = resize_from(origin, corner, dx, dy, constraints);
            Step {
                state: GestureState::Resizing {
                    corner,
                    origin,
                    origin_pointer,
                    current: next,
                },
                effect: GestureEffect::Moved { geometry: next },
            }
        }

        (GestureState::Dragging { current, .. }, GestureEvent::End) => {
            let snapped = WidgetGeometry::new(grid.snap_point(current.position), current.size);
            Step {
                state: GestureState::Idle,
                effect: GestureEffect::Committed {
                    mode: GestureMode::Dragging,
                    geometry: snapped,
                    released_at: current.position,
                },
            }
        }
        (GestureState::Resizing { current, .. }, GestureEvent::End) => Step {
            state: GestureState::Idle,
            effect: GestureEffect::Committed {
                mode: GestureMode::Resizing,
                geometry: current,
                released_at: current.position,
            },
        },

        (
            GestureState::Dragging { origin, .. } | GestureState::Resizing { origin, .. },
            GestureEvent::Cancel { reason },
        ) => Step {
            state: GestureState::Idle,
            effect: GestureEffect::Reverted {
                geometry: origin,
                reason,
            },
        },
    }
}

/// Resize `origin` by a pointer delta applied at `corner`.
///
/// Each axis is clamped on its own. When the moving edge is the left (or
/// top) one, the position shifts by however much the clamped extent changed,
/// which keeps the right (or bottom) edge where it was.
#[must_use]
pub fn resize_from(
    origin: WidgetGeometry,
    corner: Corner,
    dx: f64,
    dy: f64,
    constraints: &SizeConstraints,
) -> WidgetGeometry {
    let Size {
        width: w0,
        height: h0,
    } = origin.size;
    let Point { x: x0, y: y0 } = origin.position;

    let (width, x) = if corner.moves_left_edge() {
        let width = constraints.clamp_width(w0 - dx);
        (width, x0 + (w0 - width))
    } else {
        (constraints.clamp_width(w0 + dx), x0)
    };
    let (height, y) = if corner.moves_top_edge() {
        let height = constraints.clamp_height(h0 - dy);
        (height, y0 + (h0 - height))
    } else {
        (constraints.clamp_height(h0 + dy), y0)
    };
    WidgetGeometry::new(Point::new(x, y), Size::new(width, height))
}

#[inline]
fn is_finite(p: Point) -> bool {
    p.x.is_finite() && p.y.is_finite()
}

// ---------------------------------------------------------------------------
// Controller
// ---------------------------------------------------------------------------

/// Drives [`step`] for one widget against a shared [`GeometryModel`].
#[derive(Debug, Clone)]
pub struct DragResizeController {
    widget: WidgetId,
    state: GestureState,
    grid: GridSnap,
    stiffness: f64,
    damping: f64,
    settle: Option<SettleAnimation>,
    commits: Debouncer<WidgetGeometry>,
    transition_counter: u64,
}

impl DragResizeController {
    /// Controller for `widget`; committed geometry settles after `quiet_period`.
    #[must_use]
    pub fn new(widget: WidgetId, grid: GridSnap, quiet_period: Duration) -> Self {
        Self {
            widget,
            state: GestureState::Idle,
            grid,
            stiffness: DEFAULT_STIFFNESS,
            damping: DEFAULT_DAMPING,
            settle: None,
            commits: Debouncer::new(quiet_period),
            transition_counter: 0,
        }
    }

    /// Spring parameters for the release settle (builder).
    #[must_use]
    pub fn with_settle_params(mut self, stiffness: f64, damping: f64) -> Self {
        self.stiffness = stiffness;
        self.damping = damping;
        self
    }

    #[must_use]
    pub const fn widget(&self) -> WidgetId {
        self.widget
    }

    #[must_use]
    pub const fn state(&self) -> GestureState {
        self.state
    }

    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.state.is_active()
    }

    #[must_use]
    pub const fn grid(&self) -> GridSnap {
        self.grid
    }

    /// Transitions emitted so far.
    #[must_use]
    pub const fn transition_count(&self) -> u64 {
        self.transition_counter
    }

    /// Feed one event, applying its effect to `model`.
    pub fn handle(
        &mut self,
        model: &mut GeometryModel,
        event: &GestureEvent,
        now: Instant,
    ) -> GestureTransition {
        let from = self.state;
        let (Some(geometry), Some(constraints)) =
            (model.get(self.widget), model.constraints(self.widget))
        else {
            return self.record(from, event, GestureEffect::Noop {
                reason: NoopReason::WidgetMissing,
            });
        };

        let next = step(self.state, event, geometry, &constraints, &self.grid);
        self.state = next.state;
        self.apply(model, &next.effect, now);
        self.record(from, event, next.effect)
    }

    /// Cancel an active gesture with [`CancelReason::Programmatic`].
    pub fn force_cancel(
        &mut self,
        model: &mut GeometryModel,
        now: Instant,
    ) -> Option<GestureTransition> {
        self.cancel_with(model, CancelReason::Programmatic, now)
    }

    /// Prepare for the widget closing.
    ///
    /// An active gesture is reverted first (reason `Closed`). The pending
    /// commit and any settle are dropped: a closing widget's geometry is
    /// never persisted after the fact.
    pub fn close(&mut self, model: &mut GeometryModel, now: Instant) -> Option<GestureTransition> {
        let reverted = self.cancel_with(model, CancelReason::Closed, now);
        self.commits.cancel();
        self.settle = None;
        hubcanvas_core::debug!(widget = self.widget.get(), "controller closed");
        reverted
    }

    fn cancel_with(
        &mut self,
        model: &mut GeometryModel,
        reason: CancelReason,
        now: Instant,
    ) -> Option<GestureTransition> {
        if !self.state.is_active() {
            return None;
        }
        Some(self.handle(model, &GestureEvent::Cancel { reason }, now))
    }

    fn apply(&mut self, model: &mut GeometryModel, effect: &GestureEffect, now: Instant) {
        match *effect {
            GestureEffect::Started { .. } => {
                // A new gesture takes over from any settle still in flight.
                self.settle = None;
            }
            GestureEffect::Moved { geometry } | GestureEffect::Reverted { geometry, .. } => {
                model.restore(self.widget, geometry);
            }
            GestureEffect::Committed {
                mode,
                geometry,
                released_at,
            } => {
                let applied = model.restore(self.widget, geometry).unwrap_or(geometry);
                self.commits.schedule(applied, now);
                if mode == GestureMode::Dragging && released_at != applied.position {
                    self.settle = Some(
                        SettleAnimation::new(released_at, applied.position)
                            .with_params(self.stiffness, self.damping),
                    );
                }
            }
            GestureEffect::Noop { .. } => {}
        }
    }

    fn record(
        &mut self,
        from: GestureState,
        event: &GestureEvent,
        effect: GestureEffect,
    ) -> GestureTransition {
        self.transition_counter = self.transition_counter.saturating_add(1);
        hubcanvas_core::trace!(
            widget = self.widget.get(),
            transition_id = self.transition_counter,
            event = event.kind(),
            effect = effect.kind(),
            "gesture transition"
        );
        GestureTransition {
            transition_id: self.transition_counter,
            widget: self.widget,
            from,
            to: self.state,
            effect,
        }
    }

    // -- commit debouncing --------------------------------------------------

    /// Geometry whose quiet period has elapsed and should be persisted.
    pub fn poll_commit(&mut self, now: Instant) -> Option<WidgetGeometry> {
        self.commits.poll(now)
    }

    /// Take the pending commit immediately.
    pub fn flush_commit(&mut self) -> Option<WidgetGeometry> {
        self.commits.flush()
    }

    #[must_use]
    pub fn pending_commit(&self) -> Option<&WidgetGeometry> {
        self.commits.pending()
    }

    #[must_use]
    pub fn commit_deadline(&self) -> Option<Instant> {
        self.commits.deadline()
    }

    // -- release settle -----------------------------------------------------

    /// Advance the settle animation. Returns `true` while it is still running.
    pub fn advance_settle(&mut self, dt: Duration) -> bool {
        let Some(settle) = self.settle.as_mut() else {
            return false;
        };
        settle.tick(dt);
        if settle.is_complete() {
            self.settle = None;
            return false;
        }
        true
    }

    #[must_use]
    pub fn is_settling(&self) -> bool {
        self.settle.is_some()
    }

    /// Where the host should draw the widget: the settle position while one
    /// runs, otherwise the model's position.
    #[must_use]
    pub fn display_position(&self, model: &GeometryModel) -> Option<Point> {
        match &self.settle {
            Some(settle) => Some(settle.current()),
            None => model.get(self.widget).map(|g| g.position),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hubcanvas_core::WidgetDescriptor;

    fn panel() -> SizeConstraints {
        SizeConstraints::new(280.0, 200.0, 800.0, 600.0).unwrap()
    }

    fn origin() -> WidgetGeometry {
        WidgetGeometry::new(Point::new(100.0, 100.0), Size::new(400.0, 300.0))
    }

    fn run(events: &[GestureEvent]) -> (GestureState, Vec<GestureEffect>) {
        let mut state = GestureState::Idle;
        let mut geometry = origin();
        let mut effects = Vec::new();
        for ev in events {
            let s = step(state, ev, geometry, &panel(), &GridSnap::default());
            state = s.state;
            match s.effect {
                GestureEffect::Moved { geometry: g }
                | GestureEffect::Committed { geometry: g, .. }
                | GestureEffect::Reverted { geometry: g, .. } => geometry = g,
                _ => {}
            }
            effects.push(s.effect);
        }
        (state, effects)
    }

    fn at(x: f64, y: f64) -> Point {
        Point::new(x, y)
    }

    #[test]
    fn drag_moves_by_delta_from_start() {
        let (state, effects) = run(&[
            GestureEvent::DragStart { pointer: at(110.0, 110.0) },
            GestureEvent::Move { pointer: at(150.0, 90.0) },
            GestureEvent::Move { pointer: at(123.0, 117.0) },
        ]);
        assert!(matches!(state, GestureState::Dragging { .. }));
        assert_eq!(
            effects[2],
            GestureEffect::Moved {
                geometry: WidgetGeometry::new(at(113.0, 107.0), Size::new(400.0, 300.0))
            }
        );
    }

    #[test]
    fn drag_end_snaps_position_only() {
        let (state, effects) = run(&[
            GestureEvent::DragStart { pointer: at(0.0, 0.0) },
            GestureEvent::Move { pointer: at(13.0, -53.0) },
            GestureEvent::End,
        ]);
        assert_eq!(state, GestureState::Idle);
        assert_eq!(
            effects[2],
            GestureEffect::Committed {
                mode: GestureMode::Dragging,
                geometry: WidgetGeometry::new(at(128.0, 32.0), Size::new(400.0, 300.0)),
                released_at: at(113.0, 47.0),
            }
        );
    }

    #[test]
    fn resize_clamps_each_axis_independently() {
        let (_, effects) = run(&[
            GestureEvent::ResizeStart { corner: Corner::BottomRight, pointer: at(500.0, 400.0) },
            GestureEvent::Move { pointer: at(1000.0, 450.0) },
        ]);
        assert_eq!(
            effects[1],
            GestureEffect::Moved {
                geometry: WidgetGeometry::new(at(100.0, 100.0), Size::new(800.0, 350.0))
            }
        );
    }

    #[test]
    fn resize_end_does_not_snap() {
        let (_, effects) = run(&[
            GestureEvent::ResizeStart { corner: Corner::BottomRight, pointer: at(0.0, 0.0) },
            GestureEvent::Move { pointer: at(7.0, 3.0) },
            GestureEvent::End,
        ]);
        assert_eq!(
            effects[2],
            GestureEffect::Committed {
                mode: GestureMode::Resizing,
                geometry: WidgetGeometry::new(at(100.0, 100.0), Size::new(407.0, 303.0)),
                released_at: at(100.0, 100.0),
            }
        );
    }

    #[test]
    fn top_left_resize_pins_bottom_right_edges() {
        let g = resize_from(origin(), Corner::TopLeft, 300.0, -50.0, &panel());
        assert_eq!(g.size, Size::new(280.0, 350.0));
        assert_eq!(g.right(), origin().right());
        assert_eq!(g.bottom(), origin().bottom());
    }

    #[test]
    fn every_corner_keeps_opposite_edges() {
        for corner in Corner::ALL {
            let g = resize_from(origin(), corner, -40.0, 60.0, &panel());
            if corner.moves_left_edge() {
                assert_eq!(g.right(), origin().right(), "{corner:?}");
            } else {
                assert_eq!(g.position.x, origin().position.x, "{corner:?}");
            }
            if corner.moves_top_edge() {
                assert_eq!(g.bottom(), origin().bottom(), "{corner:?}");
            } else {
                assert_eq!(g.position.y, origin().position.y, "{corner:?}");
            }
            assert!(panel().contains(g.size));
        }
    }

    #[test]
    fn cancel_reverts_exactly() {
        let (state, effects) = run(&[
            GestureEvent::ResizeStart { corner: Corner::BottomLeft, pointer: at(0.0, 0.0) },
            GestureEvent::Move { pointer: at(-90.0, 80.0) },
            GestureEvent::Cancel { reason: CancelReason::PointerLost },
        ]);
        assert_eq!(state, GestureState::Idle);
        assert_eq!(
            effects[2],
            GestureEffect::Reverted {
                geometry: origin(),
                reason: CancelReason::PointerLost
            }
        );
    }

    #[test]
    fn out_of_order_events_are_noops() {
        let (state, effects) = run(&[
            GestureEvent::Move { pointer: at(1.0, 1.0) },
            GestureEvent::End,
            GestureEvent::Cancel { reason: CancelReason::Programmatic },
            GestureEvent::DragStart { pointer: at(0.0, 0.0) },
            GestureEvent::ResizeStart { corner: Corner::TopRight, pointer: at(0.0, 0.0) },
            GestureEvent::Move { pointer: at(f64::NAN, 0.0) },
        ]);
        assert!(matches!(state, GestureState::Dragging { .. }));
        let idle = GestureEffect::Noop { reason: NoopReason::IdleWithoutActiveGesture };
        assert_eq!(&effects[..3], &[idle, idle, idle]);
        assert_eq!(effects[4], GestureEffect::Noop { reason: NoopReason::GestureAlreadyActive });
        assert_eq!(effects[5], GestureEffect::Noop { reason: NoopReason::NonFinitePointer });
    }

    #[test]
    fn state_serde_is_tagged() {
        let json = serde_json::to_string(&GestureState::Idle).unwrap();
        assert_eq!(json, r#"{"state":"idle"}"#);
        let effect = GestureEffect::Noop { reason: NoopReason::GestureAlreadyActive };
        let json = serde_json::to_string(&effect).unwrap();
        assert_eq!(json, r#"{"effect":"noop","reason":"gesture_already_active"}"#);
    }

    // -- controller ---------------------------------------------------------

    const QUIET: Duration = Duration::from_millis(500);

    fn setup() -> (GeometryModel, DragResizeController, WidgetId) {
        let id = WidgetId::new(1);
        let mut model = GeometryModel::new();
        model
            .insert(&WidgetDescriptor::new(
                id,
                "Tasks",
                origin().position,
                origin().size,
                panel(),
            ))
            .unwrap();
        (model, DragResizeController::new(id, GridSnap::default(), QUIET), id)
    }

    #[test]
    fn controller_commits_once_after_quiet_period() {
        let (mut model, mut ctl, id) = setup();
        let t0 = Instant::now();
        ctl.handle(&mut model, &GestureEvent::DragStart { pointer: at(0.0, 0.0) }, t0);
        ctl.handle(&mut model, &GestureEvent::Move { pointer: at(13.0, -53.0) }, t0);
        let end = ctl.handle(&mut model, &GestureEvent::End, t0);
        assert_eq!(end.transition_id, 3);
        assert_eq!(model.get(id).unwrap().position, at(128.0, 32.0));

        assert!(ctl.is_settling());
        assert_eq!(ctl.display_position(&model), Some(at(113.0, 47.0)));

        assert_eq!(ctl.poll_commit(t0 + Duration::from_millis(499)), None);
        let committed = ctl.poll_commit(t0 + QUIET).unwrap();
        assert_eq!(committed.position, at(128.0, 32.0));
        assert_eq!(ctl.poll_commit(t0 + Duration::from_secs(10)), None);
    }

    #[test]
    fn settle_runs_to_completion() {
        let (mut model, mut ctl, _) = setup();
        let t0 = Instant::now();
        ctl.handle(&mut model, &GestureEvent::DragStart { pointer: at(0.0, 0.0) }, t0);
        ctl.handle(&mut model, &GestureEvent::Move { pointer: at(-3.0, -3.0) }, t0);
        ctl.handle(&mut model, &GestureEvent::End, t0);
        assert!(ctl.is_settling());
        let mut frames = 0;
        while ctl.advance_settle(Duration::from_millis(16)) {
            frames += 1;
            assert!(frames < 1_000);
        }
        assert!(!ctl.is_settling());
        assert_eq!(ctl.display_position(&model), Some(at(96.0, 96.0)));
    }

    #[test]
    fn close_mid_gesture_reverts_and_discards_commit() {
        let (mut model, mut ctl, id) = setup();
        let t0 = Instant::now();
        // An earlier committed resize is still waiting for its quiet period.
        let resize = GestureEvent::ResizeStart {
            corner: Corner::BottomRight,
            pointer: at(0.0, 0.0),
        };
        ctl.handle(&mut model, &resize, t0);
        ctl.handle(&mut model, &GestureEvent::Move { pointer: at(20.0, 20.0) }, t0);
        ctl.handle(&mut model, &GestureEvent::End, t0);
        assert!(ctl.pending_commit().is_some());
        let committed = model.get(id).unwrap();

        ctl.handle(&mut model, &GestureEvent::DragStart { pointer: at(0.0, 0.0) }, t0);
        ctl.handle(&mut model, &GestureEvent::Move { pointer: at(300.0, 300.0) }, t0);
        let closed = ctl.close(&mut model, t0).unwrap();
        assert_eq!(
            closed.effect,
            GestureEffect::Reverted { geometry: committed, reason: CancelReason::Closed }
        );
        assert_eq!(model.get(id), Some(committed));
        assert!(ctl.pending_commit().is_none());
        assert_eq!(ctl.poll_commit(t0 + Duration::from_secs(5)), None);
    }

    #[test]
    fn close_while_idle_has_no_transition() {
        let (mut model, mut ctl, _) = setup();
        assert!(ctl.close(&mut model, Instant::now()).is_none());
        assert_eq!(ctl.transition_count(), 0);
    }

    #[test]
    fn missing_widget_is_noop() {
        let (mut model, mut ctl, id) = setup();
        model.remove(id);
        let start = GestureEvent::DragStart { pointer: at(0.0, 0.0) };
        let t = ctl.handle(&mut model, &start, Instant::now());
        assert_eq!(t.effect, GestureEffect::Noop { reason: NoopReason::WidgetMissing });
        assert!(!ctl.is_active());
    }

    #[test]
    fn force_cancel_is_programmatic() {
        let (mut model, mut ctl, id) = setup();
        let t0 = Instant::now();
        ctl.handle(&mut model, &GestureEvent::DragStart { pointer: at(0.0, 0.0) }, t0);
        ctl.handle(&mut model, &GestureEvent::Move { pointer: at(50.0, 0.0) }, t0);
        let t = ctl.force_cancel(&mut model, t0).unwrap();
        assert!(matches!(
            t.effect,
            GestureEffect::Reverted { reason: CancelReason::Programmatic, .. }
        ));
        assert_eq!(model.get(id), Some(origin()));
        assert!(ctl.force_cancel(&mut model, t0).is_none());
    }
}
