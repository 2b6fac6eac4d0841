#![forbid(unsafe_code)]

//! Layout: where a floating panel goes.
//!
//! # Role in Tether
//! `tether-layout` is the stateless half of the engine. Given the anchor's
//! box, the panel's size, a preferred [`Placement`] and the viewport, it
//! returns a [`Placed`] position that is anchored, flipped if the preferred
//! side has no room, and clamped inside the viewport margins.
//!
//! # Modules
//! - [`placement`]: `Side` × `Align` placements and their string form.
//! - [`position`]: the raw anchor-relative geometry.
//! - [`guard`]: flip and clamp against the viewport.
//!
//! Nothing here holds state, reads a clock or touches the host. The runtime
//! calls into it on every recompute with freshly measured boxes.

pub mod guard;
pub mod placement;
pub mod position;

pub use guard::{Anchored, DEFAULT_MARGIN, DEFAULT_OFFSET, Placed, choose_placement, clamp, place};
pub use placement::{Align, ParsePlacementError, Placement, Side};
pub use position::compute_position;
