#![forbid(unsafe_code)]

//! Geometric primitives for widgets on the canvas.
//!
//! Canvas space is continuous and unbounded: positions may be negative and are
//! never clamped. Sizes are always bounded by the widget's
//! [`SizeConstraints`], which are fixed at creation.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Stable identifier for a widget. Assigned by the host; never reused by the core.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WidgetId(u64);

impl WidgetId {
    /// Wrap a host-assigned identifier.
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// The raw identifier.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for WidgetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "widget#{}", self.0)
    }
}

/// A point in canvas coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    /// Create a new point.
    #[inline]
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Component-wise `self - other`.
    #[inline]
    #[must_use]
    pub fn delta_from(self, other: Point) -> (f64, f64) {
        (self.x - other.x, self.y - other.y)
    }

    /// Translate by `(dx, dy)`.
    #[inline]
    #[must_use]
    pub fn offset(self, dx: f64, dy: f64) -> Point {
        Point::new(self.x + dx, self.y + dy)
    }
}

/// Width and height in logical units.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    /// Create a new size.
    #[inline]
    #[must_use]
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Errors from constructing geometry inputs or registering widgets.
#[derive(Debug, Clone, PartialEq)]
pub enum GeometryError {
    /// A constraint bound was negative, NaN, or infinite.
    NonFiniteBound { field: &'static str, value: f64 },
    /// `min > max` on one axis.
    InvertedBounds {
        axis: &'static str,
        min: f64,
        max: f64,
    },
    /// The widget id is already registered.
    DuplicateWidget { id: WidgetId },
}

impl fmt::Display for GeometryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonFiniteBound { field, value } => {
                write!(f, "{field} must be finite and non-negative (got {value})")
            }
            Self::InvertedBounds { axis, min, max } => {
                write!(f, "{axis} minimum {min} exceeds maximum {max}")
            }
            Self::DuplicateWidget { id } => write!(f, "{id} is already registered"),
        }
    }
}

impl std::error::Error for GeometryError {}

/// Inclusive size bounds for one widget.
///
/// # Invariants
///
/// 1. Every bound is finite and `>= 0`.
/// 2. `min_width <= max_width` and `min_height <= max_height`.
///
/// Both are checked once in [`SizeConstraints::new`]; the fields are private
/// so a constructed value can never violate them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ConstraintsRepr", into = "ConstraintsRepr")]
pub struct SizeConstraints {
    min_width: f64,
    min_height: f64,
    max_width: f64,
    max_height: f64,
}

impl SizeConstraints {
    /// Validate and build a constraint set.
    pub fn new(
        min_width: f64,
        min_height: f64,
        max_width: f64,
        max_height: f64,
    ) -> Result<Self, GeometryError> {
        for (field, value) in [
            ("min_width", min_width),
            ("min_height", min_height),
            ("max_width", max_width),
            ("max_height", max_height),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(GeometryError::NonFiniteBound { field, value });
            }
        }
        if min_width > max_width {
            return Err(GeometryError::InvertedBounds {
                axis: "width",
                min: min_width,
                max: max_width,
            });
        }
        if min_height > max_height {
            return Err(GeometryError::InvertedBounds {
                axis: "height",
                min: min_height,
                max: max_height,
            });
        }
        Ok(Self {
            min_width,
            min_height,
            max_width,
            max_height,
        })
    }

    #[inline]
    #[must_use]
    pub const fn min_width(&self) -> f64 {
        self.min_width
    }

    #[inline]
    #[must_use]
    pub const fn min_height(&self) -> f64 {
        self.min_height
    }

    #[inline]
    #[must_use]
    pub const fn max_width(&self) -> f64 {
        self.max_width
    }

    #[inline]
    #[must_use]
    pub const fn max_height(&self) -> f64 {
        self.max_height
    }

    /// Clamp a width into `[min_width, max_width]`. NaN is treated as 0.
    #[inline]
    #[must_use]
    pub fn clamp_width(&self, width: f64) -> f64 {
        clamp_axis(width, self.min_width, self.max_width)
    }

    /// Clamp a height into `[min_height, max_height]`. NaN is treated as 0.
    #[inline]
    #[must_use]
    pub fn clamp_height(&self, height: f64) -> f64 {
        clamp_axis(height, self.min_height, self.max_height)
    }

    /// Clamp both axes independently.
    #[inline]
    #[must_use]
    pub fn clamp(&self, size: Size) -> Size {
        Size::new(self.clamp_width(size.width), self.clamp_height(size.height))
    }

    /// Whether `size` already satisfies the bounds.
    #[must_use]
    pub fn contains(&self, size: Size) -> bool {
        size.width >= self.min_width
            && size.width <= self.max_width
            && size.height >= self.min_height
            && size.height <= self.max_height
    }
}

/// Wire form of [`SizeConstraints`]; deserialization goes through
/// [`SizeConstraints::new`] so persisted bounds are re-validated.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct ConstraintsRepr {
    min_width: f64,
    min_height: f64,
    max_width: f64,
    max_height: f64,
}

impl From<SizeConstraints> for ConstraintsRepr {
    fn from(c: SizeConstraints) -> Self {
        Self {
            min_width: c.min_width,
            min_height: c.min_height,
            max_width: c.max_width,
            max_height: c.max_height,
        }
    }
}

impl TryFrom<ConstraintsRepr> for SizeConstraints {
    type Error = GeometryError;

    fn try_from(r: ConstraintsRepr) -> Result<Self, Self::Error> {
        SizeConstraints::new(r.min_width, r.min_height, r.max_width, r.max_height)
    }
}

#[inline]
fn clamp_axis(value: f64, min: f64, max: f64) -> f64 {
    let value = if value.is_nan() { 0.0 } else { value };
    value.clamp(min, max)
}

/// One of the four resize handles of a widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Corner {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl Corner {
    pub const ALL: [Corner; 4] = [
        Corner::TopLeft,
        Corner::TopRight,
        Corner::BottomLeft,
        Corner::BottomRight,
    ];

    /// Whether this handle moves the left edge (the right edge stays pinned).
    #[inline]
    #[must_use]
    pub const fn moves_left_edge(self) -> bool {
        matches!(self, Corner::TopLeft | Corner::BottomLeft)
    }

    /// Whether this handle moves the top edge (the bottom edge stays pinned).
    #[inline]
    #[must_use]
    pub const fn moves_top_edge(self) -> bool {
        matches!(self, Corner::TopLeft | Corner::TopRight)
    }
}

/// Position and size of one widget. This is the payload handed to the
/// persistence sink.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct WidgetGeometry {
    pub position: Point,
    pub size: Size,
}

impl WidgetGeometry {
    #[must_use]
    pub const fn new(position: Point, size: Size) -> Self {
        Self { position, size }
    }

    /// Right edge (`x + width`).
    #[inline]
    #[must_use]
    pub fn right(&self) -> f64 {
        self.position.x + self.size.width
    }

    /// Bottom edge (`y + height`).
    #[inline]
    #[must_use]
    pub fn bottom(&self) -> f64 {
        self.position.y + self.size.height
    }
}

/// Everything the host supplies when handing a widget to the core.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WidgetDescriptor {
    pub id: WidgetId,
    pub title: String,
    pub position: Point,
    pub size: Size,
    pub constraints: SizeConstraints,
}

impl WidgetDescriptor {
    pub fn new(
        id: WidgetId,
        title: impl Into<String>,
        position: Point,
        size: Size,
        constraints: SizeConstraints,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            position,
            size,
            constraints,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn panel() -> SizeConstraints {
        SizeConstraints::new(280.0, 200.0, 800.0, 600.0).unwrap()
    }

    #[test]
    fn clamp_is_per_axis() {
        let c = panel();
        assert_eq!(c.clamp(Size::new(1300.0, 350.0)), Size::new(800.0, 350.0));
        assert_eq!(c.clamp(Size::new(400.0, 10.0)), Size::new(400.0, 200.0));
    }

    #[test]
    fn clamp_treats_nan_as_zero() {
        let c = panel();
        assert_eq!(c.clamp(Size::new(f64::NAN, f64::NAN)), Size::new(280.0, 200.0));
    }

    #[test]
    fn clamp_handles_infinities() {
        let c = panel();
        assert_eq!(
            c.clamp(Size::new(f64::INFINITY, f64::NEG_INFINITY)),
            Size::new(800.0, 200.0)
        );
    }

    #[test]
    fn constraints_reject_inverted_bounds() {
        let err = SizeConstraints::new(500.0, 100.0, 400.0, 200.0).unwrap_err();
        assert!(matches!(err, GeometryError::InvertedBounds { axis: "width", .. }));
    }

    #[test]
    fn constraints_reject_negative_and_nan() {
        assert!(SizeConstraints::new(-1.0, 0.0, 10.0, 10.0).is_err());
        assert!(SizeConstraints::new(0.0, f64::NAN, 10.0, 10.0).is_err());
        assert!(SizeConstraints::new(0.0, 0.0, f64::INFINITY, 10.0).is_err());
    }

    #[test]
    fn degenerate_constraints_pin_size() {
        let c = SizeConstraints::new(300.0, 300.0, 300.0, 300.0).unwrap();
        assert_eq!(c.clamp(Size::new(10.0, 9000.0)), Size::new(300.0, 300.0));
    }

    #[test]
    fn corner_edges() {
        assert!(Corner::TopLeft.moves_left_edge() && Corner::TopLeft.moves_top_edge());
        assert!(!Corner::BottomRight.moves_left_edge() && !Corner::BottomRight.moves_top_edge());
        assert!(Corner::BottomLeft.moves_left_edge() && !Corner::BottomLeft.moves_top_edge());
        assert!(!Corner::TopRight.moves_left_edge() && Corner::TopRight.moves_top_edge());
    }

    #[test]
    fn geometry_serializes_for_persistence() {
        let g = WidgetGeometry::new(Point::new(-32.0, 64.0), Size::new(400.0, 300.0));
        let json = serde_json::to_string(&g).unwrap();
        assert_eq!(
            json,
            r#"{"position":{"x":-32.0,"y":64.0},"size":{"width":400.0,"height":300.0}}"#
        );
        assert_eq!(g.right(), 368.0);
        assert_eq!(g.bottom(), 364.0);
    }

    #[test]
    fn constraints_deserialize_through_validation() {
        let ok: SizeConstraints = serde_json::from_str(
            r#"{"min_width":1.0,"min_height":2.0,"max_width":3.0,"max_height":4.0}"#,
        )
        .unwrap();
        assert_eq!(ok.max_height(), 4.0);
        let bad = serde_json::from_str::<SizeConstraints>(
            r#"{"min_width":5.0,"min_height":2.0,"max_width":3.0,"max_height":4.0}"#,
        );
        assert!(bad.is_err());
    }

    #[test]
    fn widget_id_display() {
        assert_eq!(WidgetId::new(7).to_string(), "widget#7");
    }
}
