#![forbid(unsafe_code)]

//! Tether public facade crate.
//!
//! Anchors a floating panel (tooltip, popover, dropdown, select) to a
//! trigger, keeps it inside the viewport while the page scrolls or resizes,
//! and decides when it opens and closes. This crate re-exports the common
//! types from the internal crates and offers a small prelude.
//!
//! ```
//! use std::cell::RefCell;
//! use std::rc::Rc;
//! use tether::prelude::*;
//!
//! struct Page;
//! impl Measure for Page {
//!     fn anchor_box(&self) -> BoundingBox { BoundingBox::new(100.0, 50.0, 40.0, 20.0) }
//!     fn panel_size(&self) -> Size { Size::new(120.0, 60.0) }
//!     fn viewport(&self) -> Viewport { Viewport::new(800.0, 600.0) }
//! }
//!
//! struct Paint(Option<Placed>);
//! impl PanelMount for Paint {
//!     fn show(&mut self, placed: Placed) { self.0 = Some(placed); }
//!     fn hide(&mut self) { self.0 = None; }
//! }
//!
//! # fn main() -> tether::Result<()> {
//! let hub = SignalHub::new();
//! let config = presets::popover().placement("bottom".parse()?);
//! let mut panel = Floating::new(config, &hub, Rc::new(Page), Rc::new(RefCell::new(Paint(None))))?;
//! panel.open(Instant::now());
//! let pos = panel.position().expect("shown");
//! assert_eq!((pos.top, pos.left), (128.0, 10.0));
//! # Ok(())
//! # }
//! ```

mod error;
pub mod presets;

pub use error::{Error, Result};

// --- Core re-exports -------------------------------------------------------

pub use tether_core::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, Modifiers, PointerButton, PointerEvent,
    PointerEventKind, ScrollerId,
};
pub use tether_core::geometry::{BoundingBox, Position, Size, Viewport};

// --- Layout re-exports -----------------------------------------------------

pub use tether_layout::{Align, ParsePlacementError, Placed, Placement, Side, place};

// --- Runtime re-exports ----------------------------------------------------

pub use tether_runtime::{
    Cause, ConfigError, ConfigSet, Floating, FloatingConfig, Instant, InteractionEvent, LayerId,
    LayerStack, Measure, PanelMount, Region, Signal, SignalHub, TrackOptions, Tracker, Transition,
    TriggerMode, VisibilityState,
};

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        BoundingBox, Error, Event, Floating, FloatingConfig, Instant, InteractionEvent, LayerStack,
        Measure, PanelMount, Placed, Placement, Position, Region, Result, SignalHub, Size,
        TriggerMode, Viewport, VisibilityState,
    };

    pub use crate::{core, layout, presets, runtime};
}

pub use tether_core as core;
pub use tether_layout as layout;
pub use tether_runtime as runtime;
