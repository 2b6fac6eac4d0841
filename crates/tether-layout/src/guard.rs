#![forbid(unsafe_code)]

//! Viewport guard: flip and clamp so panels never leave the screen.
//!
//! Placement runs in three steps:
//!
//! 1. [`choose_placement`] checks whether the preferred side has room. If it
//!    doesn't, the opposite side is tried **once**. If that has no room
//!    either, the preferred side is kept and clamping does the rest; the
//!    guard never bounces between two bad sides.
//! 2. [`compute_position`](crate::position::compute_position) places the
//!    panel against the chosen side.
//! 3. [`clamp`] pulls the result into
//!    `[margin, viewport − margin]` on both axes.
//!
//! # Invariants
//!
//! - For a panel no larger than `viewport − 2·margin` on an axis, the clamped
//!   box lies within `[margin, viewport − margin]` on that axis.
//! - A panel larger than that is pinned to `margin` on the leading edge and
//!   overflows on the trailing edge. This is not an error.
//!
//! # Example
//!
//! ```
//! use tether_core::geometry::{BoundingBox, Position, Size, Viewport};
//! use tether_layout::guard::Anchored;
//! use tether_layout::placement::Placement;
//!
//! let anchor = BoundingBox::new(100.0, 50.0, 40.0, 20.0);
//! let placed = Anchored::new(anchor, Placement::BOTTOM)
//!     .offset(8.0)
//!     .margin(8.0)
//!     .place(Size::new(120.0, 60.0), Viewport::new(800.0, 600.0));
//!
//! assert_eq!(placed.position, Position::new(128.0, 10.0));
//! assert_eq!(placed.placement, Placement::BOTTOM);
//! ```

use tether_core::geometry::{BoundingBox, Position, Size, Viewport};

use crate::placement::{Placement, Side};
use crate::position::compute_position;

/// Default gap between anchor and panel, in pixels.
pub const DEFAULT_OFFSET: f64 = 8.0;

/// Default clearance kept from every viewport edge, in pixels.
pub const DEFAULT_MARGIN: f64 = 8.0;

/// A final panel position together with the side it ended up on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placed {
    /// Top-left corner to paint the panel at.
    pub position: Position,
    /// Effective placement after flip logic (may differ from the preferred one).
    pub placement: Placement,
}

impl Placed {
    /// The panel's painted box.
    #[must_use]
    pub fn bounds(&self, panel: Size) -> BoundingBox {
        BoundingBox::at(self.position, panel)
    }

    /// Whether flip logic moved the panel to the opposite side.
    #[must_use]
    pub fn flipped_from(&self, preferred: Placement) -> bool {
        self.placement.side != preferred.side
    }
}

/// Whether `placement` keeps the panel's primary axis inside the margins.
#[must_use]
pub fn fits(
    anchor: &BoundingBox,
    panel: Size,
    placement: Placement,
    offset: f64,
    viewport: Viewport,
    margin: f64,
) -> bool {
    match placement.side {
        Side::Top => anchor.top - panel.height - offset >= margin,
        Side::Bottom => anchor.bottom() + offset + panel.height <= viewport.height - margin,
        Side::Left => anchor.left - panel.width - offset >= margin,
        Side::Right => anchor.right() + offset + panel.width <= viewport.width - margin,
    }
}

/// Pick the preferred placement, or its opposite if only that one has room.
#[must_use]
pub fn choose_placement(
    anchor: &BoundingBox,
    panel: Size,
    preferred: Placement,
    offset: f64,
    viewport: Viewport,
    margin: f64,
) -> Placement {
    if fits(anchor, panel, preferred, offset, viewport, margin) {
        return preferred;
    }

    let flipped = preferred.flip();
    if fits(anchor, panel, flipped, offset, viewport, margin) {
        #[cfg(feature = "tracing")]
        tether_core::debug!(
            message = "guard.flip",
            preferred = %preferred,
            effective = %flipped
        );
        return flipped;
    }

    preferred
}

/// Pull `position` into the viewport, keeping `margin` clear on each edge.
///
/// `max` is applied last, so oversized panels pin to the leading margin.
#[must_use]
pub fn clamp(position: Position, panel: Size, viewport: Viewport, margin: f64) -> Position {
    Position::new(
        clamp_axis(position.top, panel.height, viewport.height, margin),
        clamp_axis(position.left, panel.width, viewport.width, margin),
    )
}

#[inline]
fn clamp_axis(start: f64, len: f64, viewport_len: f64, margin: f64) -> f64 {
    start.min(viewport_len - len - margin).max(margin)
}

/// Choose, compute and clamp in one call.
#[must_use]
pub fn place(
    anchor: &BoundingBox,
    panel: Size,
    preferred: Placement,
    offset: f64,
    viewport: Viewport,
    margin: f64,
) -> Placed {
    Anchored::new(*anchor, preferred)
        .offset(offset)
        .margin(margin)
        .place(panel, viewport)
}

/// Placement request for one anchor.
///
/// Builder over the guard functions for callers that place the same anchor
/// repeatedly (e.g. on every scroll) with fixed options.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Anchored {
    /// The anchor box to position relative to.
    pub anchor: BoundingBox,
    /// Preferred placement.
    pub placement: Placement,
    /// Gap between anchor and panel.
    pub offset: f64,
    /// Clearance from the viewport edges.
    pub margin: f64,
    /// Whether to try the opposite side when the preferred one has no room.
    pub auto_flip: bool,
}

impl Anchored {
    /// Anchor a panel to `anchor` with default offset and margin.
    #[must_use]
    pub fn new(anchor: BoundingBox, placement: Placement) -> Self {
        Self {
            anchor,
            placement,
            offset: DEFAULT_OFFSET,
            margin: DEFAULT_MARGIN,
            auto_flip: true,
        }
    }

    /// Set the gap between anchor and panel.
    #[must_use]
    pub fn offset(mut self, offset: f64) -> Self {
        self.offset = offset;
        self
    }

    /// Set the viewport-edge clearance.
    #[must_use]
    pub fn margin(mut self, margin: f64) -> Self {
        self.margin = margin;
        self
    }

    /// Enable or disable flipping to the opposite side.
    #[must_use]
    pub fn auto_flip(mut self, flip: bool) -> Self {
        self.auto_flip = flip;
        self
    }

    /// Compute the final, clamped position of a panel of size `panel`.
    #[must_use]
    pub fn place(&self, panel: Size, viewport: Viewport) -> Placed {
        debug_assert!(
            self.offset.is_finite() && self.offset >= 0.0,
            "offset must be finite and non-negative, got {}",
            self.offset
        );
        debug_assert!(
            self.margin.is_finite() && self.margin >= 0.0,
            "margin must be finite and non-negative, got {}",
            self.margin
        );

        let placement = if self.auto_flip {
            choose_placement(
                &self.anchor,
                panel,
                self.placement,
                self.offset,
                viewport,
                self.margin,
            )
        } else {
            self.placement
        };
        let raw = compute_position(&self.anchor, panel, placement, self.offset);
        Placed {
            position: clamp(raw, panel, viewport, self.margin),
            placement,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn viewport() -> Viewport {
        Viewport::new(800.0, 600.0)
    }

    fn panel() -> Size {
        Size::new(120.0, 60.0)
    }

    #[test]
    fn end_to_end_no_clamp_needed() {
        let anchor = BoundingBox::new(100.0, 50.0, 40.0, 20.0);
        let placed = place(&anchor, panel(), Placement::BOTTOM, 8.0, viewport(), 8.0);
        assert_eq!(placed.position, Position::new(128.0, 10.0));
        assert_eq!(placed.placement, Placement::BOTTOM);
    }

    #[test]
    fn clamp_pulls_left_edge_to_margin() {
        let anchor = BoundingBox::new(100.0, 5.0, 40.0, 20.0);
        let placed = place(&anchor, panel(), Placement::BOTTOM, 8.0, viewport(), 8.0);
        assert_eq!(placed.position.left, 8.0);
        assert_eq!(placed.position.top, 128.0);
    }

    #[test]
    fn clamp_pulls_right_edge_in() {
        let anchor = BoundingBox::new(100.0, 780.0, 20.0, 20.0);
        let placed = place(&anchor, panel(), Placement::BOTTOM, 8.0, viewport(), 8.0);
        assert_eq!(placed.position.left, 800.0 - 120.0 - 8.0);
    }

    #[test]
    fn flip_top_to_bottom_near_top_edge() {
        let anchor = BoundingBox::new(5.0, 100.0, 40.0, 20.0);
        let tall = Size::new(120.0, 200.0);
        let chosen = choose_placement(&anchor, tall, Placement::TOP, 8.0, viewport(), 8.0);
        assert_eq!(chosen, Placement::BOTTOM);
    }

    #[test]
    fn flip_bottom_to_top_near_bottom_edge() {
        let anchor = BoundingBox::new(560.0, 100.0, 40.0, 20.0);
        let chosen = choose_placement(&anchor, panel(), Placement::BOTTOM_START, 8.0, viewport(), 8.0);
        assert_eq!(chosen, Placement::TOP_START);
    }

    #[test]
    fn flip_right_to_left() {
        let anchor = BoundingBox::new(100.0, 700.0, 40.0, 20.0);
        let chosen = choose_placement(&anchor, panel(), Placement::RIGHT, 8.0, viewport(), 8.0);
        assert_eq!(chosen, Placement::LEFT);
    }

    #[test]
    fn keep_preferred_when_neither_side_fits() {
        let anchor = BoundingBox::new(250.0, 100.0, 40.0, 100.0);
        let huge = Size::new(120.0, 300.0);
        let chosen = choose_placement(&anchor, huge, Placement::TOP, 8.0, viewport(), 8.0);
        assert_eq!(chosen, Placement::TOP);

        let placed = place(&anchor, huge, Placement::TOP, 8.0, viewport(), 8.0);
        assert!(placed.position.top >= 8.0);
        assert!(placed.position.top + 300.0 <= 592.0);
    }

    #[test]
    fn oversized_panel_pins_to_margin() {
        let anchor = BoundingBox::new(100.0, 100.0, 10.0, 10.0);
        let huge = Size::new(2000.0, 1000.0);
        let placed = place(&anchor, huge, Placement::BOTTOM, 8.0, viewport(), 8.0);
        assert_eq!(placed.position, Position::new(8.0, 8.0));
    }

    #[test]
    fn auto_flip_disabled_keeps_side() {
        let anchor = BoundingBox::new(5.0, 100.0, 40.0, 20.0);
        let placed = Anchored::new(anchor, Placement::TOP)
            .auto_flip(false)
            .place(Size::new(120.0, 200.0), viewport());
        assert_eq!(placed.placement, Placement::TOP);
        assert_eq!(placed.position.top, DEFAULT_MARGIN);
    }

    #[test]
    fn placed_reports_flip() {
        let anchor = BoundingBox::new(5.0, 100.0, 40.0, 20.0);
        let placed = place(&anchor, Size::new(120.0, 200.0), Placement::TOP, 8.0, viewport(), 8.0);
        assert!(placed.flipped_from(Placement::TOP));
        assert_eq!(
            placed.bounds(Size::new(120.0, 200.0)),
            BoundingBox::new(33.0, 60.0, 120.0, 200.0)
        );
    }

    #[test]
    fn zero_margin_allows_edge_contact() {
        let pos = clamp(Position::new(-3.0, -3.0), panel(), viewport(), 0.0);
        assert_eq!(pos, Position::new(0.0, 0.0));
    }
}
