#![no_main]

use hubcanvas_core::snap;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|input: (f64, f64)| {
    let (coordinate, grid) = input;
    let once = snap(coordinate, grid);

    // Degenerate grids and non-finite coordinates pass through untouched.
    if !grid.is_finite() || grid <= 0.0 || !coordinate.is_finite() {
        assert_eq!(once.to_bits(), coordinate.to_bits());
        return;
    }

    // Keep to magnitudes where the grid index is exactly representable.
    if coordinate.abs() > 1e12 || !(1e-3..=1e6).contains(&grid) {
        return;
    }
    assert!(once.is_finite());
    assert!((once - coordinate).abs() <= grid / 2.0 + grid * 1e-9);
    assert_eq!(snap(once, grid), once, "snap not idempotent");
    assert!(once != 0.0 || once.is_sign_positive());
});
