#![forbid(unsafe_code)]

//! Frame-rate monitor with hysteresis.
//!
//! The host calls [`MonitorHandle::tick`] once per rendered frame. Intervals
//! between ticks are collected into a batch window; each full window yields
//! one rounded fps reading and is then cleared (batches do not overlap).
//!
//! ```text
//!  fps < low_threshold  ──► low_streak += 1
//!  fps >= low_threshold ──► low_streak  = 0
//!  degraded  ⇔  low_streak >= consecutive_low_windows
//! ```
//!
//! # Invariants
//!
//! 1. Degradation needs `consecutive_low_windows` low windows in a row. A
//!    single good window clears the streak.
//! 2. While immersive mode is inactive the monitor reports `baseline_fps`,
//!    never degraded, and holds no samples. Tick timestamps are still
//!    tracked so reactivation measures from the most recent frame.
//! 3. A partial window is never turned into a reading, including on stop.
//!
//! # Failure Modes
//!
//! - Zero intervals and clock regressions are excluded from the window. A
//!   regressed timestamp does not become the new reference point, so one bad
//!   clock reading costs at most one sample.
//! - A zero `window_size` is treated as 1 (and reported by `validate`).

use std::time::Duration;

use tracing::{debug, trace};
use web_time::Instant;

/// Tunables for [`PerformanceMonitor`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonitorConfig {
    /// Intervals per batch window. Default: 60.
    pub window_size: usize,
    /// A window whose rounded fps is below this counts as low. Default: 24.
    pub low_fps_threshold: u32,
    /// Low windows in a row before reporting degraded. Default: 3.
    pub consecutive_low_windows: u32,
    /// Fps reported while immersive mode is inactive. Default: 60.
    pub baseline_fps: u32,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            window_size: 60,
            low_fps_threshold: 24,
            consecutive_low_windows: 3,
            baseline_fps: 60,
        }
    }
}

impl MonitorConfig {
    /// Empty when valid.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        if self.window_size == 0 {
            errors.push("monitor.window_size must be > 0".to_string());
        }
        if self.consecutive_low_windows == 0 {
            errors.push("monitor.consecutive_low_windows must be > 0".to_string());
        }
        if self.baseline_fps < self.low_fps_threshold {
            errors.push(format!(
                "monitor.baseline_fps ({}) must be >= low_fps_threshold ({})",
                self.baseline_fps, self.low_fps_threshold
            ));
        }
        errors
    }
}

/// One completed window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowReading {
    pub fps: u32,
    pub low_streak: u32,
    pub degraded: bool,
}

/// Batch-window fps tracker.
#[derive(Debug, Clone)]
pub struct PerformanceMonitor {
    config: MonitorConfig,
    window: Vec<Duration>,
    last_tick: Option<Instant>,
    low_streak: u32,
    fps: u32,
    immersive: bool,
    windows_completed: u64,
}

impl PerformanceMonitor {
    /// Monitor in immersive mode, reporting the baseline until a window fills.
    #[must_use]
    pub fn new(config: MonitorConfig) -> Self {
        Self {
            config,
            window: Vec::with_capacity(config.window_size.max(1)),
            last_tick: None,
            low_streak: 0,
            fps: config.baseline_fps,
            immersive: true,
            windows_completed: 0,
        }
    }

    #[must_use]
    pub fn config(&self) -> &MonitorConfig {
        &self.config
    }

    /// Record a frame timestamp.
    pub fn record_tick(&mut self, now: Instant) -> Option<WindowReading> {
        let Some(previous) = self.last_tick else {
            self.last_tick = Some(now);
            return None;
        };
        if now <= previous {
            return None;
        }
        self.last_tick = Some(now);
        self.record_interval(now.duration_since(previous))
    }

    /// Record one inter-frame interval directly.
    pub fn record_interval(&mut self, interval: Duration) -> Option<WindowReading> {
        if !self.immersive || interval.is_zero() {
            return None;
        }
        self.window.push(interval);
        if self.window.len() < self.config.window_size.max(1) {
            return None;
        }
        Some(self.close_window())
    }

    fn close_window(&mut self) -> WindowReading {
        let total: Duration = self.window.iter().sum();
        let mean = total.as_secs_f64() / self.window.len() as f64;
        self.window.clear();
        self.windows_completed += 1;

        let fps = if mean > 0.0 {
            (1.0 / mean).round().min(f64::from(u32::MAX)) as u32
        } else {
            self.config.baseline_fps
        };
        let was_degraded = self.is_degraded();
        if fps < self.config.low_fps_threshold {
            self.low_streak = self.low_streak.saturating_add(1);
        } else {
            self.low_streak = 0;
        }
        self.fps = fps;
        let degraded = self.is_degraded();

        trace!(fps, low_streak = self.low_streak, "fps window closed");
        if degraded != was_degraded {
            debug!(fps, degraded, "frame-rate degradation changed");
        }
        WindowReading {
            fps,
            low_streak: self.low_streak,
            degraded,
        }
    }

    /// Switch immersive mode. Any change resets the window and streak.
    pub fn set_immersive(&mut self, active: bool) {
        if self.immersive == active {
            return;
        }
        self.immersive = active;
        self.clear_window();
        debug!(active, "immersive mode changed");
    }

    fn clear_window(&mut self) {
        self.window.clear();
        self.low_streak = 0;
        self.fps = self.config.baseline_fps;
    }

    #[inline]
    #[must_use]
    pub fn is_immersive(&self) -> bool {
        self.immersive
    }

    #[must_use]
    pub fn is_degraded(&self) -> bool {
        self.immersive && self.low_streak >= self.config.consecutive_low_windows.max(1)
    }

    /// Last completed reading, or the baseline.
    #[must_use]
    pub fn fps(&self) -> u32 {
        if self.immersive {
            self.fps
        } else {
            self.config.baseline_fps
        }
    }

    #[must_use]
    pub fn low_streak(&self) -> u32 {
        self.low_streak
    }

    /// Intervals in the current, incomplete window.
    #[must_use]
    pub fn pending_samples(&self) -> usize {
        self.window.len()
    }

    #[must_use]
    pub fn windows_completed(&self) -> u64 {
        self.windows_completed
    }
}

// ---------------------------------------------------------------------------
// Handle
// ---------------------------------------------------------------------------

/// Start a monitor. Ticks reach it only through the returned handle.
#[must_use]
pub fn start_monitoring(config: MonitorConfig) -> MonitorHandle {
    debug!(window = config.window_size, "frame monitor started");
    MonitorHandle {
        monitor: PerformanceMonitor::new(config),
    }
}

/// Owned subscription to frame ticks. Consumed by [`stop`](MonitorHandle::stop).
#[derive(Debug)]
pub struct MonitorHandle {
    monitor: PerformanceMonitor,
}

/// What a stopped monitor had seen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonitorSummary {
    pub windows_completed: u64,
    /// Samples in the partial window that was dropped.
    pub discarded_samples: usize,
}

impl MonitorHandle {
    pub fn tick(&mut self, now: Instant) -> Option<WindowReading> {
        self.monitor.record_tick(now)
    }

    pub fn set_immersive(&mut self, active: bool) {
        self.monitor.set_immersive(active);
    }

    #[must_use]
    pub fn is_degraded(&self) -> bool {
        self.monitor.is_degraded()
    }

    #[must_use]
    pub fn monitor(&self) -> &PerformanceMonitor {
        &self.monitor
    }

    /// Stop monitoring. The partial window is discarded without a reading.
    pub fn stop(self) -> MonitorSummary {
        let summary = MonitorSummary {
            windows_completed: self.monitor.windows_completed,
            discarded_samples: self.monitor.window.len(),
        };
        debug!(
            windows = summary.windows_completed,
            discarded = summary.discarded_samples,
            "frame monitor stopped"
        );
        summary
    }
}
