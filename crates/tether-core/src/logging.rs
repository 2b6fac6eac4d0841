#![forbid(unsafe_code)]

//! Logging facade.
//!
//! With the `tracing` feature the usual `tracing` macros are re-exported at
//! the crate root so downstream crates can log through `tether_core::debug!`
//! without naming `tracing` themselves. Without it, nothing is exported and
//! callers gate their log statements on their own `tracing` feature.
//!
//! `tracing-json` adds [`init_json_subscriber`], which installs a global JSON
//! formatter filtered by `RUST_LOG` (default `tether=info`).

#[cfg(feature = "tracing")]
pub use tracing::{
    debug, debug_span, error, error_span, info, info_span, trace, trace_span, warn, warn_span,
};

/// Default filter when `RUST_LOG` is unset.
#[cfg(feature = "tracing-json")]
pub const DEFAULT_FILTER: &str = "tether=info";

/// Install a global JSON subscriber.
///
/// Returns `false` if a global subscriber was already installed (for example
/// by a test harness); the existing one is left in place.
#[cfg(feature = "tracing-json")]
pub fn init_json_subscriber() -> bool {
    use tracing_subscriber::EnvFilter;

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    tracing_subscriber::fmt()
        .json()
        .with_env_filter(filter)
        .with_target(true)
        .try_init()
        .is_ok()
}
