#![forbid(unsafe_code)]

//! Subscriber installation for binaries and demos embedding the canvas.
//!
//! Library code only emits `tracing` events; whoever owns the process decides
//! where they go. This helper installs a `fmt` layer filtered by `RUST_LOG`,
//! falling back to `default_directive` when the variable is unset.

use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};

/// Install the global subscriber. Fails if one is already set.
pub fn init(default_directive: &str) -> Result<(), TryInitError> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .try_init()
}
