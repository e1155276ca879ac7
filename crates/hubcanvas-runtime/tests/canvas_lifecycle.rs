//! Canvas host lifecycle: commits, close, teardown, degraded signalling.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use hubcanvas_core::{
    CancelReason, Corner, GestureEvent, Point, Size, SizeConstraints, WidgetDescriptor,
    WidgetGeometry, WidgetId,
};
use hubcanvas_layout::GestureEffect;
use hubcanvas_runtime::{Canvas, CanvasConfig, CanvasError, CanvasOutput};
use web_time::Instant;

fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

fn descriptor(id: u64, x: f64) -> WidgetDescriptor {
    WidgetDescriptor::new(
        WidgetId::new(id),
        format!("widget {id}"),
        Point::new(x, 0.0),
        Size::new(400.0, 300.0),
        SizeConstraints::new(280.0, 200.0, 800.0, 600.0).unwrap(),
    )
}

fn drag_start() -> GestureEvent {
    GestureEvent::DragStart {
        pointer: Point::new(0.0, 0.0),
    }
}

fn resize_start(corner: Corner) -> GestureEvent {
    GestureEvent::ResizeStart {
        corner,
        pointer: Point::new(0.0, 0.0),
    }
}

fn move_to(x: f64, y: f64) -> GestureEvent {
    GestureEvent::Move {
        pointer: Point::new(x, y),
    }
}

fn drag(canvas: &mut Canvas, id: WidgetId, to: Point, at: Instant) {
    canvas.handle_gesture(id, &drag_start(), at).unwrap();
    canvas.handle_gesture(id, &move_to(to.x, to.y), at).unwrap();
    canvas.handle_gesture(id, &GestureEvent::End, at).unwrap();
}

fn commits(outputs: &[CanvasOutput]) -> Vec<(WidgetId, WidgetGeometry)> {
    outputs
        .iter()
        .filter_map(|o| match o {
            CanvasOutput::GeometryCommitted { id, geometry } => Some((*id, *geometry)),
            _ => None,
        })
        .collect()
}

#[test]
fn drag_commit_is_debounced_and_snapped() {
    let mut canvas = Canvas::default();
    let id = WidgetId::new(1);
    canvas.add_widget(&descriptor(1, 0.0)).unwrap();
    let t0 = Instant::now();

    drag(&mut canvas, id, Point::new(113.0, 47.0), t0);
    assert_eq!(canvas.geometry(id).unwrap().position, Point::new(128.0, 32.0));
    assert_eq!(canvas.display_position(id), Some(Point::new(113.0, 47.0)));

    canvas.tick(t0 + ms(499));
    assert!(commits(&canvas.drain_outputs()).is_empty());
    canvas.tick(t0 + ms(500));
    let out = canvas.drain_outputs();
    assert_eq!(commits(&out).len(), 1);
    assert_eq!(commits(&out)[0].1.position, Point::new(128.0, 32.0));

    // Settle springs converge on the committed target.
    let mut t = t0;
    for _ in 0..120 {
        t += ms(16);
        canvas.frame_tick(t);
    }
    assert_eq!(canvas.display_position(id), Some(Point::new(128.0, 32.0)));
}

#[test]
fn interleaved_widgets_commit_independently() {
    let mut canvas = Canvas::default();
    let (a, b) = (WidgetId::new(1), WidgetId::new(2));
    canvas.add_widget(&descriptor(1, 0.0)).unwrap();
    canvas.add_widget(&descriptor(2, 640.0)).unwrap();
    let t0 = Instant::now();

    canvas.handle_gesture(a, &drag_start(), t0).unwrap();
    canvas.handle_gesture(b, &resize_start(Corner::BottomRight), t0).unwrap();
    canvas.handle_gesture(a, &move_to(64.0, 64.0), t0).unwrap();
    canvas.handle_gesture(b, &move_to(50.0, 10.0), t0).unwrap();
    canvas.handle_gesture(a, &GestureEvent::End, t0).unwrap();
    canvas.handle_gesture(b, &GestureEvent::End, t0 + ms(100)).unwrap();

    canvas.tick(t0 + ms(550));
    let first = commits(&canvas.drain_outputs());
    assert_eq!(first.len(), 1);
    assert_eq!(first[0].0, a);

    canvas.tick(t0 + ms(600));
    let second = commits(&canvas.drain_outputs());
    assert_eq!(second, vec![(
        b,
        WidgetGeometry::new(Point::new(640.0, 0.0), Size::new(450.0, 310.0))
    )]);
    // b was selected last, so it is front-most.
    assert_eq!(canvas.z_order(), &[a, b]);
}

#[test]
fn close_mid_drag_reverts_then_removes_after_exit_animation() {
    let mut canvas = Canvas::default();
    let id = WidgetId::new(7);
    canvas.add_widget(&descriptor(7, 0.0)).unwrap();
    let t0 = Instant::now();

    canvas.handle_gesture(id, &drag_start(), t0).unwrap();
    canvas.handle_gesture(id, &move_to(300.0, 300.0), t0).unwrap();
    let reverted = canvas.close_widget(id, t0 + ms(10)).unwrap();
    assert!(matches!(
        reverted.map(|t| t.effect),
        Some(GestureEffect::Reverted { reason: CancelReason::Closed, .. })
    ));
    assert_eq!(canvas.geometry(id).unwrap().position, Point::new(0.0, 0.0));

    assert_eq!(
        canvas.handle_gesture(id, &GestureEvent::End, t0 + ms(20)),
        Err(CanvasError::WidgetClosing { id })
    );
    // Closing again is harmless.
    assert_eq!(canvas.close_widget(id, t0 + ms(30)), Ok(None));

    canvas.tick(t0 + ms(109));
    assert!(canvas.close_progress(id).unwrap() < 1.0);
    canvas.tick(t0 + ms(209));
    let out = canvas.drain_outputs();
    assert!(!out.contains(&CanvasOutput::WidgetRemoved { id }));
    canvas.tick(t0 + ms(210));
    let out = canvas.drain_outputs();
    assert_eq!(out, vec![CanvasOutput::WidgetRemoved { id }]);
    assert_eq!(canvas.widget_count(), 0);
    assert!(canvas.z_order().is_empty());
    assert_eq!(canvas.geometry(id), None);
}

#[test]
fn close_started_output_carries_duration() {
    let mut canvas = Canvas::default();
    let id = WidgetId::new(3);
    canvas.add_widget(&descriptor(3, 0.0)).unwrap();
    canvas.close_widget(id, Instant::now()).unwrap();
    assert_eq!(
        canvas.drain_outputs(),
        vec![CanvasOutput::CloseAnimationStarted { id, duration: ms(200) }]
    );
}

#[test]
fn close_discards_pending_commit() {
    let mut canvas = Canvas::default();
    let id = WidgetId::new(1);
    canvas.add_widget(&descriptor(1, 0.0)).unwrap();
    let t0 = Instant::now();
    drag(&mut canvas, id, Point::new(64.0, 0.0), t0);
    canvas.close_widget(id, t0 + ms(100)).unwrap();
    canvas.tick(t0 + ms(1_000));
    assert!(commits(&canvas.drain_outputs()).is_empty());
}

#[test]
fn cancel_emits_nothing_to_persist() {
    let mut canvas = Canvas::default();
    let id = WidgetId::new(1);
    canvas.add_widget(&descriptor(1, 0.0)).unwrap();
    let t0 = Instant::now();
    canvas.handle_gesture(id, &resize_start(Corner::TopLeft), t0).unwrap();
    canvas.handle_gesture(id, &move_to(-50.0, -50.0), t0).unwrap();
    canvas
        .handle_gesture(id, &GestureEvent::Cancel { reason: CancelReason::PointerLost }, t0)
        .unwrap();
    canvas.tick(t0 + ms(5_000));
    assert!(commits(&canvas.drain_outputs()).is_empty());
    assert_eq!(canvas.geometry(id).unwrap().size, Size::new(400.0, 300.0));
}

#[test]
fn observer_sees_live_geometry() {
    let mut canvas = Canvas::default();
    let id = WidgetId::new(1);
    canvas.add_widget(&descriptor(1, 0.0)).unwrap();
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    canvas.observe(id, move |c| sink.borrow_mut().push(c.geometry.position)).unwrap();
    let t0 = Instant::now();
    drag(&mut canvas, id, Point::new(40.0, 0.0), t0);
    assert_eq!(
        *seen.borrow(),
        vec![Point::new(40.0, 0.0), Point::new(32.0, 0.0)]
    );
}

#[test]
fn degraded_flips_are_reported_once() {
    let mut config = CanvasConfig::default();
    config.monitor.window_size = 2;
    let mut canvas = Canvas::new(config).unwrap();
    let mut t = Instant::now();
    canvas.frame_tick(t);
    // 3 windows of 2 intervals at 20 fps.
    for _ in 0..6 {
        t += ms(50);
        canvas.frame_tick(t);
    }
    assert!(canvas.is_degraded());
    // Recover with one fast window.
    for _ in 0..2 {
        t += ms(16);
        canvas.frame_tick(t);
    }
    assert!(!canvas.is_degraded());
    assert_eq!(
        canvas.drain_outputs(),
        vec![
            CanvasOutput::DegradedChanged { degraded: true },
            CanvasOutput::DegradedChanged { degraded: false },
        ]
    );
}

#[test]
fn immersive_off_clears_degraded() {
    let mut config = CanvasConfig::default();
    config.monitor.window_size = 1;
    let mut canvas = Canvas::new(config).unwrap();
    let mut t = Instant::now();
    canvas.frame_tick(t);
    for _ in 0..3 {
        t += ms(100);
        canvas.frame_tick(t);
    }
    assert!(canvas.is_degraded());
    canvas.set_immersive(false);
    assert!(!canvas.is_degraded());
    assert_eq!(canvas.fps(), Some(60));
}

#[test]
fn teardown_silences_everything() {
    let mut canvas = Canvas::default();
    let id = WidgetId::new(1);
    canvas.add_widget(&descriptor(1, 0.0)).unwrap();
    let t0 = Instant::now();
    drag(&mut canvas, id, Point::new(64.0, 64.0), t0);
    canvas.handle_gesture(id, &drag_start(), t0).unwrap();
    canvas.drain_outputs();

    let summary = canvas.teardown(t0 + ms(1)).expect("first teardown stops the monitor");
    assert_eq!(summary.windows_completed, 0);
    assert!(canvas.teardown(t0 + ms(2)).is_none());

    canvas.tick(t0 + ms(10_000));
    canvas.frame_tick(t0 + ms(10_000));
    canvas.set_viewport_width(500);
    canvas.set_immersive(false);
    canvas.flush_commits();
    assert!(canvas.drain_outputs().is_empty());
    assert_eq!(canvas.add_widget(&descriptor(2, 0.0)), Err(CanvasError::TornDown));
    assert_eq!(
        canvas.handle_gesture(id, &GestureEvent::End, t0),
        Err(CanvasError::TornDown)
    );
}

#[test]
fn flush_commits_skips_quiet_period() {
    let mut canvas = Canvas::default();
    let id = WidgetId::new(1);
    canvas.add_widget(&descriptor(1, 0.0)).unwrap();
    drag(&mut canvas, id, Point::new(32.0, 32.0), Instant::now());
    canvas.flush_commits();
    assert_eq!(commits(&canvas.drain_outputs()).len(), 1);
}

#[test]
fn close_mid_resize_reverts_before_exit_animation() {
    let mut canvas = Canvas::default();
    let id = WidgetId::new(4);
    canvas.add_widget(&descriptor(4, 0.0)).unwrap();
    let sizes = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&sizes);
    canvas.observe(id, move |c| sink.borrow_mut().push(c.geometry.size)).unwrap();
    let t0 = Instant::now();

    canvas.handle_gesture(id, &resize_start(Corner::BottomRight), t0).unwrap();
    canvas.handle_gesture(id, &move_to(500.0, 50.0), t0).unwrap();
    assert_eq!(canvas.geometry(id).unwrap().size, Size::new(800.0, 350.0));

    let reverted = canvas.close_widget(id, t0 + ms(10)).unwrap().unwrap();
    assert_eq!(
        reverted.effect,
        GestureEffect::Reverted {
            geometry: WidgetGeometry::new(Point::new(0.0, 0.0), Size::new(400.0, 300.0)),
            reason: CancelReason::Closed,
        }
    );
    assert_eq!(
        *sizes.borrow(),
        vec![Size::new(800.0, 350.0), Size::new(400.0, 300.0)]
    );
    assert_eq!(
        canvas.drain_outputs(),
        vec![
            CanvasOutput::Selected { id },
            CanvasOutput::CloseAnimationStarted { id, duration: ms(200) },
        ]
    );

    canvas.tick(t0 + ms(1_000));
    let out = canvas.drain_outputs();
    assert!(commits(&out).is_empty());
    assert_eq!(out, vec![CanvasOutput::WidgetRemoved { id }]);
}

#[test]
fn immersive_toggle_after_teardown_is_silent() {
    let mut config = CanvasConfig::default();
    config.monitor.window_size = 1;
    let mut canvas = Canvas::new(config).unwrap();
    let mut t = Instant::now();
    canvas.frame_tick(t);
    for _ in 0..3 {
        t += ms(100);
        canvas.frame_tick(t);
    }
    assert!(canvas.is_degraded());

    canvas.teardown(t);
    canvas.drain_outputs();
    canvas.set_immersive(true);
    canvas.set_immersive(false);
    assert!(canvas.drain_outputs().is_empty());
}
