#![forbid(unsafe_code)]

//! Policy-as-data configuration for the canvas.
//!
//! Every tunable of the interaction engine lives in one [`CanvasConfig`],
//! loadable from TOML or JSON with the `policy-config` feature.
//!
//! ```toml
//! # hubcanvas.toml
//! [grid]
//! size = 16.0
//!
//! [monitor]
//! low_fps_threshold = 30
//!
//! [persistence]
//! quiet_ms = 750
//! ```
//!
//! ```rust,ignore
//! let config = CanvasConfig::from_toml_file("hubcanvas.toml")?;
//! ```
//!
//! # Defaults
//!
//! `CanvasConfig::default()` matches the defaults of each component: grid 32,
//! 60-sample windows, low fps 24 over 3 windows, dock 768/1024 px showing
//! 6/8/10 launchers, 500 ms persistence quiet period, 200 ms exit animation.

#[cfg(feature = "policy-config")]
use std::path::Path;
use std::time::Duration;

#[cfg(feature = "policy-config")]
use serde::{Deserialize, Serialize};

use hubcanvas_core::GridSnap;
use hubcanvas_core::animation::spring::{DEFAULT_DAMPING, DEFAULT_STIFFNESS};
use hubcanvas_core::snap::DEFAULT_GRID_SIZE;
use hubcanvas_layout::{
    Breakpoints, DEFAULT_DESKTOP_COUNT, DEFAULT_MOBILE_COUNT, DEFAULT_TABLET_COUNT, DockPolicy,
};

use crate::perf_monitor::MonitorConfig;

/// Default quiet period before committed geometry is persisted.
pub const DEFAULT_PERSIST_QUIET_PERIOD: Duration = Duration::from_millis(500);

/// Default widget exit animation.
pub const DEFAULT_EXIT_ANIMATION: Duration = Duration::from_millis(200);

// ---------------------------------------------------------------------------
// Top-level CanvasConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "policy-config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "policy-config", serde(default))]
pub struct CanvasConfig {
    pub grid: GridPolicyConfig,
    pub monitor: MonitorPolicyConfig,
    pub dock: DockPolicyConfig,
    pub persistence: PersistencePolicyConfig,
    pub close: ClosePolicyConfig,
    pub settle: SettlePolicyConfig,
}

impl CanvasConfig {
    /// Load from a TOML string.
    #[cfg(feature = "policy-config")]
    pub fn from_toml_str(s: &str) -> Result<Self, CanvasConfigError> {
        toml::from_str(s).map_err(CanvasConfigError::Toml)
    }

    /// Load from a TOML file on disk.
    #[cfg(feature = "policy-config")]
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, CanvasConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(CanvasConfigError::Io)?;
        let config = Self::from_toml_str(&content)?;
        tracing::info!(path = %path.as_ref().display(), "canvas config loaded");
        Ok(config)
    }

    /// Load from a JSON string.
    #[cfg(feature = "policy-config")]
    pub fn from_json_str(s: &str) -> Result<Self, CanvasConfigError> {
        serde_json::from_str(s).map_err(CanvasConfigError::Json)
    }

    /// Load from a JSON file on disk.
    #[cfg(feature = "policy-config")]
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, CanvasConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(CanvasConfigError::Io)?;
        let config = Self::from_json_str(&content)?;
        tracing::info!(path = %path.as_ref().display(), "canvas config loaded");
        Ok(config)
    }

    /// Serialize to TOML.
    #[cfg(feature = "policy-config")]
    pub fn to_toml_string(&self) -> Result<String, toml::ser::Error> {
        toml::to_string(self)
    }

    /// Validate all parameters. An empty list means the config is usable.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if !self.grid.size.is_finite() || self.grid.size < 0.0 {
            errors.push(format!(
                "grid.size must be finite and >= 0 (got {})",
                self.grid.size
            ));
        }

        errors.extend(self.to_monitor_config().validate());

        if self.dock.desktop_min_width < self.dock.tablet_min_width {
            errors.push(format!(
                "dock.desktop_min_width ({}) must be >= tablet_min_width ({})",
                self.dock.desktop_min_width, self.dock.tablet_min_width
            ));
        }

        if !self.settle.stiffness.is_finite() || self.settle.stiffness <= 0.0 {
            errors.push(format!(
                "settle.stiffness must be finite and > 0 (got {})",
                self.settle.stiffness
            ));
        }
        if !self.settle.damping.is_finite() || self.settle.damping < 0.0 {
            errors.push(format!(
                "settle.damping must be finite and >= 0 (got {})",
                self.settle.damping
            ));
        }

        errors
    }

    /// Validate, turning a non-empty error list into an error.
    pub fn validated(self) -> Result<Self, CanvasConfigError> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(self)
        } else {
            Err(CanvasConfigError::Validation(errors))
        }
    }

    #[must_use]
    pub fn to_grid(&self) -> GridSnap {
        GridSnap::new(self.grid.size)
    }

    #[must_use]
    pub fn to_monitor_config(&self) -> MonitorConfig {
        MonitorConfig {
            window_size: self.monitor.window_size,
            low_fps_threshold: self.monitor.low_fps_threshold,
            consecutive_low_windows: self.monitor.consecutive_low_windows,
            baseline_fps: self.monitor.baseline_fps,
        }
    }

    #[must_use]
    pub fn to_dock_policy(&self) -> DockPolicy {
        DockPolicy::new(
            Breakpoints::new(self.dock.tablet_min_width, self.dock.desktop_min_width),
            self.dock.mobile_count,
            self.dock.tablet_count,
            self.dock.desktop_count,
        )
    }

    #[must_use]
    pub fn quiet_period(&self) -> Duration {
        Duration::from_millis(self.persistence.quiet_ms)
    }

    #[must_use]
    pub fn exit_animation(&self) -> Duration {
        Duration::from_millis(self.close.exit_animation_ms)
    }
}

// ---------------------------------------------------------------------------
// Sections
// ---------------------------------------------------------------------------

/// Grid snapping. A size of 0 disables snapping.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "policy-config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "policy-config", serde(default))]
pub struct GridPolicyConfig {
    /// Grid pitch in logical px. Default: 32.
    pub size: f64,
}

impl Default for GridPolicyConfig {
    fn default() -> Self {
        Self {
            size: DEFAULT_GRID_SIZE,
        }
    }
}

/// Frame-rate monitor parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "policy-config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "policy-config", serde(default))]
pub struct MonitorPolicyConfig {
    pub window_size: usize,
    pub low_fps_threshold: u32,
    pub consecutive_low_windows: u32,
    pub baseline_fps: u32,
}

impl Default for MonitorPolicyConfig {
    fn default() -> Self {
        let d = MonitorConfig::default();
        Self {
            window_size: d.window_size,
            low_fps_threshold: d.low_fps_threshold,
            consecutive_low_windows: d.consecutive_low_windows,
            baseline_fps: d.baseline_fps,
        }
    }
}

/// Dock breakpoints and launcher counts.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "policy-config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "policy-config", serde(default))]
pub struct DockPolicyConfig {
    pub tablet_min_width: u32,
    pub desktop_min_width: u32,
    pub mobile_count: usize,
    pub tablet_count: usize,
    pub desktop_count: usize,
}

impl Default for DockPolicyConfig {
    fn default() -> Self {
        Self {
            tablet_min_width: Breakpoints::DEFAULT.tablet,
            desktop_min_width: Breakpoints::DEFAULT.desktop,
            mobile_count: DEFAULT_MOBILE_COUNT,
            tablet_count: DEFAULT_TABLET_COUNT,
            desktop_count: DEFAULT_DESKTOP_COUNT,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "policy-config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "policy-config", serde(default))]
pub struct PersistencePolicyConfig {
    /// Quiet period before committed geometry is emitted. Default: 500.
    pub quiet_ms: u64,
}

impl Default for PersistencePolicyConfig {
    fn default() -> Self {
        Self {
            quiet_ms: DEFAULT_PERSIST_QUIET_PERIOD.as_millis() as u64,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "policy-config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "policy-config", serde(default))]
pub struct ClosePolicyConfig {
    /// Exit animation before the removal signal. Default: 200.
    pub exit_animation_ms: u64,
}

impl Default for ClosePolicyConfig {
    fn default() -> Self {
        Self {
            exit_animation_ms: DEFAULT_EXIT_ANIMATION.as_millis() as u64,
        }
    }
}

/// Spring parameters for the post-drag settle.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "policy-config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "policy-config", serde(default))]
pub struct SettlePolicyConfig {
    pub stiffness: f64,
    pub damping: f64,
}

impl Default for SettlePolicyConfig {
    fn default() -> Self {
        Self {
            stiffness: DEFAULT_STIFFNESS,
            damping: DEFAULT_DAMPING,
        }
    }
}

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

/// Errors that can occur when loading a canvas configuration.
#[derive(Debug)]
pub enum CanvasConfigError {
    /// I/O error reading a file.
    Io(std::io::Error),
    /// TOML parse error.
    #[cfg(feature = "policy-config")]
    Toml(toml::de::Error),
    /// JSON parse error.
    #[cfg(feature = "policy-config")]
    Json(serde_json::Error),
    /// Validation errors.
    Validation(Vec<String>),
}

impl std::fmt::Display for CanvasConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            #[cfg(feature = "policy-config")]
            Self::Toml(e) => write!(f, "TOML parse error: {e}"),
            #[cfg(feature = "policy-config")]
            Self::Json(e) => write!(f, "JSON parse error: {e}"),
            Self::Validation(errors) => {
                write!(f, "validation errors: {}", errors.join("; "))
            }
        }
    }
}

impl std::error::Error for CanvasConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            #[cfg(feature = "policy-config")]
            Self::Toml(e) => Some(e),
            #[cfg(feature = "policy-config")]
            Self::Json(e) => Some(e),
            Self::Validation(_) => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
