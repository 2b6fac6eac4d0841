#![forbid(unsafe_code)]

//! Geometric primitives.
//!
//! All values are viewport-relative CSS pixels stored as `f64`, with the
//! origin at the top-left corner of the visible area. Boxes are immutable
//! snapshots: a host measures them after layout and the engine never mutates
//! them, only derives new values.

/// A measured element box (trigger, panel, or scroll container).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BoundingBox {
    /// Top edge (inclusive).
    pub top: f64,
    /// Left edge (inclusive).
    pub left: f64,
    /// Width in pixels.
    pub width: f64,
    /// Height in pixels.
    pub height: f64,
}

impl BoundingBox {
    /// Create a new box.
    #[inline]
    pub const fn new(top: f64, left: f64, width: f64, height: f64) -> Self {
        Self {
            top,
            left,
            width,
            height,
        }
    }

    /// Create a box at the origin with the given size.
    #[inline]
    pub const fn from_size(size: Size) -> Self {
        Self::new(0.0, 0.0, size.width, size.height)
    }

    /// Create a box whose top-left corner sits at `position`.
    #[inline]
    pub const fn at(position: Position, size: Size) -> Self {
        Self::new(position.top, position.left, size.width, size.height)
    }

    /// Right edge (exclusive).
    #[inline]
    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    /// Bottom edge (exclusive).
    #[inline]
    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    /// Horizontal centre.
    #[inline]
    pub fn center_x(&self) -> f64 {
        self.left + self.width / 2.0
    }

    /// Vertical centre.
    #[inline]
    pub fn center_y(&self) -> f64 {
        self.top + self.height / 2.0
    }

    /// Width and height without the origin.
    #[inline]
    pub const fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Top-left corner.
    #[inline]
    pub const fn origin(&self) -> Position {
        Position::new(self.top, self.left)
    }

    /// Check if the box has zero area.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// Check if a point is inside the box.
    ///
    /// Left and top edges are inclusive, right and bottom edges exclusive, so
    /// two boxes sharing an edge never both claim the same point.
    #[inline]
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.left && x < self.right() && y >= self.top && y < self.bottom()
    }

    /// Check if `other` lies completely within this box.
    #[inline]
    pub fn contains_box(&self, other: &BoundingBox) -> bool {
        other.left >= self.left
            && other.top >= self.top
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }

    /// Move the box by `(dx, dy)`.
    #[must_use]
    pub fn translate(&self, dx: f64, dy: f64) -> Self {
        Self::new(self.top + dy, self.left + dx, self.width, self.height)
    }

    /// Whether every component is finite and the size is non-negative.
    #[inline]
    pub fn is_well_formed(&self) -> bool {
        self.top.is_finite()
            && self.left.is_finite()
            && self.width.is_finite()
            && self.height.is_finite()
            && self.width >= 0.0
            && self.height >= 0.0
    }
}

/// Width and height, for panels whose origin is still unknown.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    #[inline]
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

impl From<BoundingBox> for Size {
    fn from(b: BoundingBox) -> Self {
        b.size()
    }
}

/// The visible rendering area.
///
/// Hosts re-read it on every recompute; the engine never caches it across
/// frames.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    #[inline]
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// The viewport as a box anchored at the origin.
    #[inline]
    pub const fn as_box(&self) -> BoundingBox {
        BoundingBox::new(0.0, 0.0, self.width, self.height)
    }

    /// The region a panel may occupy once `margin` is kept clear on every edge.
    ///
    /// Collapses to zero size (never negative) for viewports narrower than
    /// twice the margin.
    pub fn inset(&self, margin: f64) -> BoundingBox {
        BoundingBox::new(
            margin,
            margin,
            (self.width - 2.0 * margin).max(0.0),
            (self.height - 2.0 * margin).max(0.0),
        )
    }
}

/// Where a panel's top-left corner should be painted.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Position {
    pub top: f64,
    pub left: f64,
}

impl Position {
    #[inline]
    pub const fn new(top: f64, left: f64) -> Self {
        Self { top, left }
    }
}
