#![no_main]

use std::time::Duration;

use arbitrary::Arbitrary;
use hubcanvas_core::{
    CancelReason, Corner, GeometryModel, GestureEvent, GridSnap, Point, Size, SizeConstraints,
    WidgetDescriptor, WidgetId,
};
use hubcanvas_layout::DragResizeController;
use libfuzzer_sys::fuzz_target;
use web_time::Instant;

#[derive(Debug, Arbitrary)]
enum Op {
    DragStart { x: f64, y: f64 },
    ResizeStart { corner: u8, x: f64, y: f64 },
    Move { x: f64, y: f64 },
    End,
    Cancel,
    Advance { ms: u16 },
    Settle { ms: u8 },
}

#[derive(Debug, Arbitrary)]
struct Input {
    min: (u16, u16),
    extra: (u16, u16),
    grid: u8,
    ops: Vec<Op>,
}

fuzz_target!(|input: Input| {
    let min_w = f64::from(input.min.0);
    let min_h = f64::from(input.min.1);
    let Ok(constraints) = SizeConstraints::new(
        min_w,
        min_h,
        min_w + f64::from(input.extra.0),
        min_h + f64::from(input.extra.1),
    ) else {
        return;
    };

    let id = WidgetId::new(7);
    let mut model = GeometryModel::new();
    let descriptor = WidgetDescriptor::new(
        id,
        "fuzz",
        Point::new(0.0, 0.0),
        Size::new(min_w, min_h),
        constraints,
    );
    if model.insert(&descriptor).is_err() {
        return;
    }

    let grid = GridSnap::new(f64::from(input.grid));
    let mut controller = DragResizeController::new(id, grid, Duration::from_millis(500));
    let mut now = Instant::now();
    let mut last_transition = 0;

    for op in input.ops.iter().take(256) {
        let event = match *op {
            Op::DragStart { x, y } => GestureEvent::DragStart {
                pointer: Point::new(x, y),
            },
            Op::ResizeStart { corner, x, y } => GestureEvent::ResizeStart {
                corner: Corner::ALL[usize::from(corner % 4)],
                pointer: Point::new(x, y),
            },
            Op::Move { x, y } => GestureEvent::Move {
                pointer: Point::new(x, y),
            },
            Op::End => GestureEvent::End,
            Op::Cancel => GestureEvent::Cancel {
                reason: CancelReason::PointerLost,
            },
            Op::Advance { ms } => {
                now += Duration::from_millis(u64::from(ms));
                let _ = controller.poll_commit(now);
                continue;
            }
            Op::Settle { ms } => {
                controller.advance_settle(Duration::from_millis(u64::from(ms)));
                continue;
            }
        };
        let transition = controller.handle(&mut model, &event, now);

        // Transition ids are strictly sequential.
        assert_eq!(transition.transition_id, last_transition + 1);
        last_transition = transition.transition_id;

        // Size never leaves the constraint box.
        let geometry = model.get(id).expect("widget stays registered");
        assert!(constraints.contains(geometry.size), "size escaped: {geometry:?}");

        // An idle controller never carries an in-progress gesture.
        assert_eq!(controller.is_active(), transition.to.mode().is_some());
    }
});
