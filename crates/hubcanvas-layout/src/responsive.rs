#![forbid(unsafe_code)]

//! Responsive value mapping: a value per [`Breakpoint`], inheriting from
//! smaller tiers.
//!
//! ```
//! use hubcanvas_layout::{Breakpoint, Responsive};
//!
//! let columns = Responsive::new(1).at(Breakpoint::Desktop, 3);
//! assert_eq!(*columns.resolve(Breakpoint::Tablet), 1);
//! assert_eq!(*columns.resolve(Breakpoint::Desktop), 3);
//! ```
//!
//! # Invariants
//!
//! 1. `Mobile` always has a value.
//! 2. A missing tier inherits from the nearest smaller tier that has one.
//! 3. `resolve()` never fails.

use std::fmt;

use crate::Breakpoint;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Responsive<T> {
    mobile: T,
    tablet: Option<T>,
    desktop: Option<T>,
}

impl<T> Responsive<T> {
    /// A value for `Mobile`, inherited by every larger tier until overridden.
    #[must_use]
    pub fn new(base: T) -> Self {
        Self {
            mobile: base,
            tablet: None,
            desktop: None,
        }
    }

    /// Set the value for `bp` (builder).
    #[must_use]
    pub fn at(mut self, bp: Breakpoint, value: T) -> Self {
        self.set(bp, value);
        self
    }

    pub fn set(&mut self, bp: Breakpoint, value: T) {
        match bp {
            Breakpoint::Mobile => self.mobile = value,
            Breakpoint::Tablet => self.tablet = Some(value),
            Breakpoint::Desktop => self.desktop = Some(value),
        }
    }

    /// Revert `bp` to inheritance. Clearing `Mobile` is a no-op.
    pub fn clear(&mut self, bp: Breakpoint) {
        match bp {
            Breakpoint::Mobile => {}
            Breakpoint::Tablet => self.tablet = None,
            Breakpoint::Desktop => self.desktop = None,
        }
    }

    #[must_use]
    pub fn resolve(&self, bp: Breakpoint) -> &T {
        let tablet = self.tablet.as_ref().unwrap_or(&self.mobile);
        match bp {
            Breakpoint::Mobile => &self.mobile,
            Breakpoint::Tablet => tablet,
            Breakpoint::Desktop => self.desktop.as_ref().unwrap_or(tablet),
        }
    }

    /// Whether `bp` has its own value rather than an inherited one.
    #[must_use]
    pub fn has_explicit(&self, bp: Breakpoint) -> bool {
        match bp {
            Breakpoint::Mobile => true,
            Breakpoint::Tablet => self.tablet.is_some(),
            Breakpoint::Desktop => self.desktop.is_some(),
        }
    }

    /// Explicitly set tiers in ascending order.
    pub fn explicit_values(&self) -> impl Iterator<Item = (Breakpoint, &T)> {
        [
            (Breakpoint::Mobile, Some(&self.mobile)),
            (Breakpoint::Tablet, self.tablet.as_ref()),
            (Breakpoint::Desktop, self.desktop.as_ref()),
        ]
        .into_iter()
        .filter_map(|(bp, v)| v.map(|v| (bp, v)))
    }

    #[must_use]
    pub fn map<U>(&self, f: impl Fn(&T) -> U) -> Responsive<U> {
        Responsive {
            mobile: f(&self.mobile),
            tablet: self.tablet.as_ref().map(&f),
            desktop: self.desktop.as_ref().map(&f),
        }
    }
}

impl<T: Clone> Responsive<T> {
    #[must_use]
    pub fn resolve_cloned(&self, bp: Breakpoint) -> T {
        self.resolve(bp).clone()
    }
}

impl<T: Default> Default for Responsive<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: fmt::Display> fmt::Display for Responsive<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (bp, v) in self.explicit_values() {
            if !first {
                f.write_str(", ")?;
            }
            write!(f, "{bp}: {v}")?;
            first = false;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inheritance_walks_down() {
        let r = Responsive::new(6).at(Breakpoint::Desktop, 10);
        assert_eq!(*r.resolve(Breakpoint::Mobile), 6);
        assert_eq!(*r.resolve(Breakpoint::Tablet), 6);
        assert_eq!(*r.resolve(Breakpoint::Desktop), 10);
    }

    #[test]
    fn clear_reverts_to_inherited() {
        let mut r = Responsive::new(1).at(Breakpoint::Tablet, 2).at(Breakpoint::Desktop, 3);
        r.clear(Breakpoint::Tablet);
        assert_eq!(*r.resolve(Breakpoint::Tablet), 1);
        assert_eq!(*r.resolve(Breakpoint::Desktop), 3);
        r.clear(Breakpoint::Mobile);
        assert_eq!(*r.resolve(Breakpoint::Mobile), 1);
        assert!(!r.has_explicit(Breakpoint::Tablet));
    }

    #[test]
    fn map_and_display() {
        let r = Responsive::new(6).at(Breakpoint::Tablet, 8);
        assert_eq!(r.to_string(), "mobile: 6, tablet: 8");
        let doubled = r.map(|v| v * 2);
        assert_eq!(doubled.resolve_cloned(Breakpoint::Desktop), 16);
    }
}
