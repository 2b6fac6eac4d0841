#![forbid(unsafe_code)]

//! Anchor-relative panel positioning.
//!
//! [`compute_position`] is the raw geometry: it puts the panel against the
//! requested side of the anchor, `offset` pixels away, aligned on the cross
//! axis. It knows nothing about the viewport; keeping the panel on screen is
//! the job of [`crate::guard`].
//!
//! The function is pure. It does not validate its inputs either: negative
//! sizes are a caller bug and produce a meaningless (but finite) result.

use tether_core::geometry::{BoundingBox, Position, Size};

use crate::placement::{Align, Placement, Side};

/// Where the panel's top-left corner goes for `placement`, ignoring the viewport.
#[must_use]
pub fn compute_position(
    anchor: &BoundingBox,
    panel: Size,
    placement: Placement,
    offset: f64,
) -> Position {
    match placement.side {
        Side::Top => Position::new(
            anchor.top - panel.height - offset,
            cross_start(anchor.left, anchor.width, panel.width, placement.align),
        ),
        Side::Bottom => Position::new(
            anchor.bottom() + offset,
            cross_start(anchor.left, anchor.width, panel.width, placement.align),
        ),
        Side::Left => Position::new(
            cross_start(anchor.top, anchor.height, panel.height, placement.align),
            anchor.left - panel.width - offset,
        ),
        Side::Right => Position::new(
            cross_start(anchor.top, anchor.height, panel.height, placement.align),
            anchor.right() + offset,
        ),
    }
}

/// Leading coordinate on the cross axis.
#[inline]
fn cross_start(anchor_start: f64, anchor_len: f64, panel_len: f64, align: Align) -> f64 {
    match align {
        Align::Center => anchor_start + (anchor_len - panel_len) / 2.0,
        Align::Start => anchor_start,
        Align::End => anchor_start + anchor_len - panel_len,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn anchor() -> BoundingBox {
        BoundingBox::new(100.0, 50.0, 40.0, 20.0)
    }

    fn panel() -> Size {
        Size::new(120.0, 60.0)
    }

    #[test]
    fn bottom_centered() {
        let pos = compute_position(&anchor(), panel(), Placement::BOTTOM, 8.0);
        assert_eq!(pos, Position::new(128.0, 10.0));
    }

    #[test]
    fn top_centered() {
        let pos = compute_position(&anchor(), panel(), Placement::TOP, 8.0);
        assert_eq!(pos, Position::new(100.0 - 60.0 - 8.0, 10.0));
    }

    #[test]
    fn bottom_start_aligns_left_edges() {
        let pos = compute_position(&anchor(), panel(), Placement::BOTTOM_START, 4.0);
        assert_eq!(pos, Position::new(124.0, 50.0));
    }

    #[test]
    fn bottom_end_aligns_right_edges() {
        let pos = compute_position(&anchor(), panel(), Placement::BOTTOM_END, 4.0);
        assert_eq!(pos.left + 120.0, anchor().right());
    }

    #[test]
    fn right_centered() {
        let pos = compute_position(&anchor(), panel(), Placement::RIGHT, 8.0);
        assert_eq!(pos, Position::new(100.0 + (20.0 - 60.0) / 2.0, 98.0));
    }

    #[test]
    fn left_start_and_end() {
        let start = compute_position(&anchor(), panel(), Placement::LEFT_START, 2.0);
        assert_eq!(start, Position::new(100.0, 50.0 - 120.0 - 2.0));

        let end = compute_position(&anchor(), panel(), Placement::LEFT_END, 2.0);
        assert_eq!(end.top + 60.0, anchor().bottom());
    }

    #[test]
    fn zero_offset_touches_anchor() {
        let pos = compute_position(&anchor(), panel(), Placement::TOP, 0.0);
        assert_eq!(pos.top + 60.0, anchor().top);
    }

    #[test]
    fn deterministic() {
        for p in Placement::ALL {
            let a = compute_position(&anchor(), panel(), p, 6.0);
            let b = compute_position(&anchor(), panel(), p, 6.0);
            assert_eq!(a, b);
        }
    }
}
