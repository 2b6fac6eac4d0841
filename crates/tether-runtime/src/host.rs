#![forbid(unsafe_code)]

//! Traits the host surface implements.
//!
//! The engine never looks at a real UI tree. It asks [`Measure`] for fresh
//! boxes each time it needs them and tells [`PanelMount`] where to paint.

use tether_core::event::ScrollerId;
use tether_core::geometry::{BoundingBox, Size, Viewport};
use tether_layout::Placed;

/// Fresh layout measurements for one trigger/panel pair.
///
/// Every method is called again on every recompute; implementations must not
/// return cached values from a previous frame.
pub trait Measure {
    /// The trigger's current viewport-relative box.
    fn anchor_box(&self) -> BoundingBox;

    /// The panel's current size (its content may have changed).
    fn panel_size(&self) -> Size;

    /// The current viewport.
    fn viewport(&self) -> Viewport;

    /// Scroll containers whose scrolling moves the trigger.
    ///
    /// Defaults to the root scroller only.
    fn scroll_ancestors(&self) -> Vec<ScrollerId> {
        vec![ScrollerId::ROOT]
    }
}

/// Paints or removes the floating panel.
pub trait PanelMount {
    /// Paint (or move) the panel at `placed`.
    fn show(&mut self, placed: Placed);

    /// Remove the panel from screen.
    fn hide(&mut self);
}
