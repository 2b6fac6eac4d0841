#![forbid(unsafe_code)]

//! Tether runtime: the stateful half of the engine.
//!
//! # Key Components
//!
//! - [`Floating`] - one trigger/panel pair: hit-testing, visibility, painting
//! - [`Interaction`] - sans-IO visibility state machine with hover-intent delays
//! - [`Tracker`] - re-places an open panel on scroll and resize
//! - [`SignalHub`] - host-owned dispatcher of scroll/resize/frame signals
//! - [`LayerStack`] - nested panels, innermost closes first
//! - [`FloatingConfig`] - validated per-instance options and presets
//!
//! # Role in Tether
//! The host implements [`Measure`] and [`PanelMount`], forwards input events
//! to a [`Floating`] (or a [`LayerStack`]), emits layout signals on the
//! [`SignalHub`], and calls `poll` when `next_deadline` passes. Everything
//! runs on the host's event thread; nothing here is `Send`.

pub mod config;
pub mod floating;
pub mod host;
pub mod interaction;
pub mod signal;
pub mod stack;
pub mod tracker;

pub use config::{ConfigError, ConfigSet, FloatingConfig, MAX_DELAY, TriggerMode};
pub use floating::Floating;
pub use host::{Measure, PanelMount};
pub use interaction::{
    Cause, Interaction, InteractionEvent, Region, Transition, VisibilityState,
};
pub use signal::{Listener, Signal, SignalHub, SignalKind};
pub use stack::{LayerId, LayerStack};
pub use tracker::{Attachment, TrackOptions, Tracker};

/// Monotonic clock type used for deadlines.
pub use web_time::Instant;
