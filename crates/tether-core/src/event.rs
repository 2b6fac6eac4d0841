#![forbid(unsafe_code)]

//! Canonical input and surface events.
//!
//! Hosts translate their platform events (DOM, winit, terminal) into these
//! types before handing them to the engine. Pointer coordinates use the same
//! viewport-relative pixel space as [`crate::geometry::BoundingBox`].
//!
//! # Design Notes
//!
//! - `KeyEventKind` defaults to `Press` when the platform cannot tell
//! - `Modifiers` use bitflags for easy combination; a modified Escape is a
//!   host shortcut, not a dismissal
//! - Losing surface focus counts as an outside interaction
//! - Scroll events carry the id of the container that scrolled, not a delta;
//!   the engine re-measures instead of integrating offsets

use bitflags::bitflags;

/// Canonical event.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// A keyboard event.
    Key(KeyEvent),

    /// A pointer (mouse, pen, touch) event.
    Pointer(PointerEvent),

    /// A scrollable container scrolled.
    Scroll {
        /// The container that scrolled.
        source: ScrollerId,
    },

    /// The viewport was resized.
    Resize {
        /// New viewport width in pixels.
        width: f64,
        /// New viewport height in pixels.
        height: f64,
    },

    /// Focus gained or lost by the hosting surface.
    ///
    /// `true` = focus gained, `false` = focus lost. Losing focus dismisses
    /// panels that close on outside interaction.
    Focus(bool),
}

impl Event {
    /// Whether this event describes a change in layout rather than user input.
    #[must_use]
    pub const fn is_layout(&self) -> bool {
        matches!(self, Self::Scroll { .. } | Self::Resize { .. })
    }
}

/// Identifies a scrollable container on the host surface.
///
/// `ScrollerId::ROOT` is the document/window scroller, which is an ancestor
/// of every anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ScrollerId(pub u64);

impl ScrollerId {
    /// The top-level document scroller.
    pub const ROOT: Self = Self(0);
}

/// A keyboard event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    /// The key code that was pressed.
    pub code: KeyCode,

    /// Modifier keys held during the event.
    pub modifiers: Modifiers,

    /// The type of key event (press, repeat, or release).
    pub kind: KeyEventKind,
}

impl KeyEvent {
    /// Create a new key event with default modifiers and Press kind.
    #[must_use]
    pub const fn new(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: Modifiers::NONE,
            kind: KeyEventKind::Press,
        }
    }

    /// Create a key event with modifiers.
    #[must_use]
    pub const fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// Create a key event with a specific kind.
    #[must_use]
    pub const fn with_kind(mut self, kind: KeyEventKind) -> Self {
        self.kind = kind;
        self
    }

    /// Check if this is a bare Escape press (repeats count, releases and
    /// chords such as Shift+Escape do not).
    #[must_use]
    pub const fn is_escape(&self) -> bool {
        matches!(self.code, KeyCode::Escape)
            && !matches!(self.kind, KeyEventKind::Release)
            && self.modifiers.is_empty()
    }
}

/// Key codes for keyboard events.
///
/// Only the key the engine reacts to is named; everything else arrives as
/// `Other` and is ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    /// Escape key.
    Escape,

    /// Any other key, by platform key code.
    Other(u32),
}

/// The type of key event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum KeyEventKind {
    /// Key was pressed (default when not distinguishable).
    #[default]
    Press,

    /// Key is being held (repeat event).
    Repeat,

    /// Key was released.
    Release,
}

bitflags! {
    /// Modifier keys that can be held during an event.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Modifiers: u8 {
        /// No modifiers.
        const NONE  = 0b0000;
        /// Shift key.
        const SHIFT = 0b0001;
        /// Alt/Option key.
        const ALT   = 0b0010;
        /// Control key.
        const CTRL  = 0b0100;
        /// Super/Meta/Command key.
        const SUPER = 0b1000;
    }
}

impl Default for Modifiers {
    fn default() -> Self {
        Self::NONE
    }
}

/// A pointer event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    /// The type of pointer event.
    pub kind: PointerEventKind,

    /// X coordinate in viewport pixels.
    pub x: f64,

    /// Y coordinate in viewport pixels.
    pub y: f64,
}

impl PointerEvent {
    /// Create a new pointer event.
    #[must_use]
    pub const fn new(kind: PointerEventKind, x: f64, y: f64) -> Self {
        Self { kind, x, y }
    }

    /// Get the position as an `(x, y)` tuple.
    #[must_use]
    pub const fn position(&self) -> (f64, f64) {
        (self.x, self.y)
    }
}

/// The type of pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerEventKind {
    /// Button pressed down.
    Down(PointerButton),

    /// Button released.
    Up(PointerButton),

    /// A completed click (down and up on the same element).
    Click(PointerButton),

    /// Pointer moved.
    Moved,

    /// Pointer left the hosting surface entirely.
    Exited,
}

/// Pointer button identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerButton {
    /// Primary button.
    Left,

    /// Secondary button.
    Right,

    /// Middle button (wheel click).
    Middle,
}
