#![forbid(unsafe_code)]

//! Core: geometry primitives, canonical events, and event coalescing.
//!
//! # Role in Tether
//! `tether-core` is the vocabulary shared by every other crate. It owns the
//! measured-box and position types the positioning math works on, and the
//! normalized input events hosts feed into the runtime.
//!
//! # Primary responsibilities
//! - **Geometry**: `BoundingBox`, `Size`, `Viewport`, `Position`.
//! - **Event**: canonical key, pointer, scroll, resize and focus events.
//! - **EventCoalescer**: per-frame resize coalescing (latest wins).
//!
//! # How it fits in the system
//! `tether-layout` computes positions from core geometry without any state.
//! `tether-runtime` consumes core `Event`s and drives per-panel state
//! machines, so core stays free of timers and host bindings.

pub mod event;
pub mod event_coalescer;
pub mod geometry;
pub mod logging;

// Re-export tracing macros at crate root for ergonomic use.
#[cfg(feature = "tracing")]
pub use logging::{
    debug, debug_span, error, error_span, info, info_span, trace, trace_span, warn, warn_span,
};
