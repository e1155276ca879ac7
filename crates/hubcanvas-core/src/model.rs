#![forbid(unsafe_code)]

//! Constraint-preserving geometry store, one entry per active widget.
//!
//! # Invariants
//!
//! 1. Every stored size lies within its widget's [`SizeConstraints`]. The
//!    bounds are enforced on every write path (`insert`, `apply_size`,
//!    `restore`); nothing is validated after the fact.
//! 2. Out-of-range sizes are clamped, never rejected.
//! 3. Writing a value equal to the stored one is a no-op and notifies nobody.
//! 4. Each widget has at most one observer. It is called synchronously,
//!    inside the mutating call, once per accepted change.
//!
//! # Failure Modes
//!
//! - Unknown widget ids: every mutator returns `None` and does nothing.
//! - Non-finite position components keep the stored axis value.

use std::fmt;

use ahash::AHashMap;

use crate::geometry::{
    GeometryError, Point, Size, SizeConstraints, WidgetDescriptor, WidgetGeometry, WidgetId,
};

/// Which part of the geometry changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Position,
    Size,
    Both,
}

/// Notification payload delivered to a widget's observer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeometryChange {
    pub id: WidgetId,
    pub kind: ChangeKind,
    pub geometry: WidgetGeometry,
}

type Observer = Box<dyn FnMut(&GeometryChange)>;

struct Entry {
    geometry: WidgetGeometry,
    constraints: SizeConstraints,
    observer: Option<Observer>,
    version: u64,
}

impl Entry {
    fn commit(&mut self, id: WidgetId, kind: ChangeKind) {
        self.version += 1;
        if let Some(observer) = self.observer.as_mut() {
            observer(&GeometryChange {
                id,
                kind,
                geometry: self.geometry,
            });
        }
    }
}

/// Per-widget geometry with constraint enforcement and change notification.
#[derive(Default)]
pub struct GeometryModel {
    entries: AHashMap<WidgetId, Entry>,
}

impl fmt::Debug for GeometryModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeometryModel")
            .field("widgets", &self.entries.len())
            .finish()
    }
}

impl GeometryModel {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a widget handed over by the host.
    ///
    /// The initial size is clamped into the widget's constraints. Returns the
    /// geometry actually stored.
    pub fn insert(
        &mut self,
        descriptor: &WidgetDescriptor,
    ) -> Result<WidgetGeometry, GeometryError> {
        if self.entries.contains_key(&descriptor.id) {
            return Err(GeometryError::DuplicateWidget { id: descriptor.id });
        }
        let position = Point::new(
            finite_or(descriptor.position.x, 0.0),
            finite_or(descriptor.position.y, 0.0),
        );
        let geometry = WidgetGeometry::new(position, descriptor.constraints.clamp(descriptor.size));
        self.entries.insert(
            descriptor.id,
            Entry {
                geometry,
                constraints: descriptor.constraints,
                observer: None,
                version: 0,
            },
        );
        crate::debug!(widget = descriptor.id.get(), "geometry entry inserted");
        Ok(geometry)
    }

    /// Drop a widget's entry (and its observer).
    pub fn remove(&mut self, id: WidgetId) -> Option<WidgetGeometry> {
        let entry = self.entries.remove(&id)?;
        crate::debug!(widget = id.get(), "geometry entry removed");
        Some(entry.geometry)
    }

    /// Install the single observer for `id`, replacing any previous one.
    ///
    /// Returns `false` if the widget is unknown.
    pub fn set_observer(
        &mut self,
        id: WidgetId,
        observer: impl FnMut(&GeometryChange) + 'static,
    ) -> bool {
        match self.entries.get_mut(&id) {
            Some(entry) => {
                entry.observer = Some(Box::new(observer));
                true
            }
            None => false,
        }
    }

    /// Remove the observer for `id`.
    pub fn clear_observer(&mut self, id: WidgetId) {
        if let Some(entry) = self.entries.get_mut(&id) {
            entry.observer = None;
        }
    }

    /// Store a new position. Canvas space is unbounded, so finite values are
    /// stored as given.
    pub fn apply_position(&mut self, id: WidgetId, raw: Point) -> Option<Point> {
        let entry = self.entries.get_mut(&id)?;
        let current = entry.geometry.position;
        let applied = Point::new(finite_or(raw.x, current.x), finite_or(raw.y, current.y));
        if applied != current {
            entry.geometry.position = applied;
            entry.commit(id, ChangeKind::Position);
        }
        Some(applied)
    }

    /// Clamp `raw` per axis into the widget's constraints and store it.
    pub fn apply_size(&mut self, id: WidgetId, raw: Size) -> Option<Size> {
        let entry = self.entries.get_mut(&id)?;
        let applied = entry.constraints.clamp(raw);
        if applied != entry.geometry.size {
            entry.geometry.size = applied;
            entry.commit(id, ChangeKind::Size);
        }
        Some(applied)
    }

    /// Write a full geometry in one step (used to revert a cancelled gesture).
    ///
    /// Emits a single notification even when both parts change.
    pub fn restore(&mut self, id: WidgetId, geometry: WidgetGeometry) -> Option<WidgetGeometry> {
        let entry = self.entries.get_mut(&id)?;
        let current = entry.geometry;
        let applied = WidgetGeometry::new(
            Point::new(
                finite_or(geometry.position.x, current.position.x),
                finite_or(geometry.position.y, current.position.y),
            ),
            entry.constraints.clamp(geometry.size),
        );
        let kind = match (
            applied.position != current.position,
            applied.size != current.size,
        ) {
            (false, false) => return Some(applied),
            (true, false) => ChangeKind::Position,
            (false, true) => ChangeKind::Size,
            (true, true) => ChangeKind::Both,
        };
        entry.geometry = applied;
        entry.commit(id, kind);
        Some(applied)
    }

    /// Current geometry of `id`.
    #[must_use]
    pub fn get(&self, id: WidgetId) -> Option<WidgetGeometry> {
        self.entries.get(&id).map(|e| e.geometry)
    }

    /// Constraints of `id`.
    #[must_use]
    pub fn constraints(&self, id: WidgetId) -> Option<SizeConstraints> {
        self.entries.get(&id).map(|e| e.constraints)
    }

    /// Number of accepted changes for `id` since insertion.
    #[must_use]
    pub fn version(&self, id: WidgetId) -> Option<u64> {
        self.entries.get(&id).map(|e| e.version)
    }

    #[must_use]
    pub fn contains(&self, id: WidgetId) -> bool {
        self.entries.contains_key(&id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over `(id, geometry)` pairs in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = (WidgetId, WidgetGeometry)> + '_ {
        self.entries.iter().map(|(id, e)| (*id, e.geometry))
    }
}

#[inline]
fn finite_or(value: f64, fallback: f64) -> f64 {
    if value.is_finite() { value } else { fallback }
}
