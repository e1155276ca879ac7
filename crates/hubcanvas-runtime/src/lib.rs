#![forbid(unsafe_code)]

//! Runtime: the canvas host, frame-rate monitoring, and policy configuration.
//!
//! # Role in HubCanvas
//! `hubcanvas-runtime` owns everything time- and host-facing. It routes host
//! input to the per-widget controllers from `hubcanvas-layout`, drives the
//! clock-injected timers (commit debouncing, exit animations, release
//! settles), watches frame pacing, and queues outbound signals.
//!
//! # Key components
//! - **Canvas**: widget registry, z-order, gesture routing, output queue.
//! - **PerformanceMonitor / MonitorHandle**: batch-window fps with hysteresis.
//! - **CanvasConfig**: policy-as-data, loadable from TOML/JSON
//!   (`policy-config` feature).
//! - **telemetry**: `tracing-subscriber` setup (`telemetry` feature).

pub mod canvas;
pub mod config;
pub mod perf_monitor;
#[cfg(feature = "telemetry")]
pub mod telemetry;

pub use canvas::{Canvas, CanvasError, CanvasOutput};
pub use config::{
    CanvasConfig, CanvasConfigError, ClosePolicyConfig, DEFAULT_EXIT_ANIMATION,
    DEFAULT_PERSIST_QUIET_PERIOD, DockPolicyConfig, GridPolicyConfig, MonitorPolicyConfig,
    PersistencePolicyConfig, SettlePolicyConfig,
};
pub use perf_monitor::{
    MonitorConfig, MonitorHandle, MonitorSummary, PerformanceMonitor, WindowReading,
    start_monitoring,
};
