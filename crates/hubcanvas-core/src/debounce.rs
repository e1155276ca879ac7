#![forbid(unsafe_code)]

//! Latest-value debouncing with a single armed timer.
//!
//! [`Debouncer<T>`] defers a rapidly changing value until it has been quiet
//! for a fixed period. It is clock-injected: the host passes `now` into
//! [`schedule`](Debouncer::schedule) and [`poll`](Debouncer::poll) from its
//! event loop, so no background timer exists that could outlive the owner.
//!
//! # Invariants
//!
//! 1. At most one timer is armed per debouncer. Arming always cancels the
//!    outstanding timer first; timers never stack.
//! 2. `poll` yields the most recently scheduled value, never an intermediate.
//! 3. Each armed timer settles at most once.
//! 4. After [`cancel`](Debouncer::cancel) (or drop) the cancelled timer can
//!    never settle.
//!
//! # Usage
//!
//! ```
//! use std::time::Duration;
//! use hubcanvas_core::Debouncer;
//! use web_time::Instant;
//!
//! let mut persist = Debouncer::new(Duration::from_millis(500));
//! let t0 = Instant::now();
//! persist.schedule(1, t0);
//! persist.schedule(2, t0 + Duration::from_millis(100));
//! assert_eq!(persist.poll(t0 + Duration::from_millis(400)), None);
//! assert_eq!(persist.poll(t0 + Duration::from_millis(600)), Some(2));
//! assert_eq!(persist.poll(t0 + Duration::from_millis(900)), None);
//! ```

use std::time::Duration;

use web_time::Instant;

/// Identity of one armed timer. Strictly increasing per debouncer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimerId(u64);

impl TimerId {
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone)]
struct ArmedTimer<T> {
    id: TimerId,
    deadline: Instant,
    value: T,
}

/// A debounce slot holding at most one pending value.
#[derive(Debug, Clone)]
pub struct Debouncer<T> {
    quiet_period: Duration,
    armed: Option<ArmedTimer<T>>,
    next_timer: u64,
    cancelled_total: u64,
    settled_total: u64,
}

impl<T> Debouncer<T> {
    /// Create an idle debouncer with the given quiet period.
    ///
    /// The period is chosen per call site; there is no global default.
    #[must_use]
    pub fn new(quiet_period: Duration) -> Self {
        Self {
            quiet_period,
            armed: None,
            next_timer: 0,
            cancelled_total: 0,
            settled_total: 0,
        }
    }

    /// Replace any pending value with `value` and restart the quiet period.
    pub fn schedule(&mut self, value: T, now: Instant) -> TimerId {
        self.arm(value, now + self.quiet_period)
    }

    /// The only path that installs a timer: cancel the outstanding one, then arm.
    fn arm(&mut self, value: T, deadline: Instant) -> TimerId {
        if self.armed.take().is_some() {
            self.cancelled_total += 1;
            crate::trace!("debounce timer superseded");
        }
        self.next_timer += 1;
        let id = TimerId(self.next_timer);
        self.armed = Some(ArmedTimer {
            id,
            deadline,
            value,
        });
        id
    }

    /// Settle the pending value if its quiet period has elapsed.
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        if self.armed.as_ref()?.deadline > now {
            return None;
        }
        let settled = self.armed.take()?;
        self.settled_total += 1;
        crate::trace!(timer = settled.id.0, "debounce timer settled");
        Some(settled.value)
    }

    /// Drop the pending value without settling it.
    ///
    /// Returns `true` if a timer was armed.
    pub fn cancel(&mut self) -> bool {
        if self.armed.take().is_none() {
            return false;
        }
        self.cancelled_total += 1;
        crate::debug!("debounce timer cancelled");
        true
    }

    /// Take the pending value immediately, ignoring the deadline.
    pub fn flush(&mut self) -> Option<T> {
        let timer = self.armed.take()?;
        self.settled_total += 1;
        Some(timer.value)
    }

    /// Whether a timer is armed.
    #[inline]
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.armed.is_some()
    }

    /// Peek at the pending value.
    #[must_use]
    pub fn pending(&self) -> Option<&T> {
        self.armed.as_ref().map(|t| &t.value)
    }

    /// Identity of the armed timer, if any.
    #[must_use]
    pub fn armed_timer(&self) -> Option<TimerId> {
        self.armed.as_ref().map(|t| t.id)
    }

    /// When the armed timer will settle.
    #[must_use]
    pub fn deadline(&self) -> Option<Instant> {
        self.armed.as_ref().map(|t| t.deadline)
    }

    /// Time remaining until the armed timer settles (zero if overdue).
    #[must_use]
    pub fn time_until_settle(&self, now: Instant) -> Option<Duration> {
        self.deadline()
            .map(|deadline| deadline.saturating_duration_since(now))
    }

    #[inline]
    #[must_use]
    pub fn quiet_period(&self) -> Duration {
        self.quiet_period
    }

    /// Timers cancelled, either superseded by `schedule` or via `cancel`.
    #[must_use]
    pub fn cancelled_total(&self) -> u64 {
        self.cancelled_total
    }

    /// Timers that produced a value.
    #[must_use]
    pub fn settled_total(&self) -> u64 {
        self.settled_total
    }
}
