#![forbid(unsafe_code)]

//! Preferred side and alignment of a panel relative to its anchor.
//!
//! A [`Placement`] is a [`Side`] (which edge of the anchor the panel sits
//! against) crossed with an [`Align`] (how the panel lines up along that
//! edge). Centred alignment is the default; `Start`/`End` line the panel's
//! leading or trailing edge up with the anchor's, which is what dropdown
//! menus use.
//!
//! Placements round-trip through the strings hosts put in their config:
//! `"top"`, `"top-start"`, `"bottom-end"`, `"left"`, and so on.

use std::fmt;
use std::str::FromStr;

/// Edge of the anchor the panel is placed against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Top,
    Bottom,
    Left,
    Right,
}

impl Side {
    /// The opposite edge, used by flip logic.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Top => Self::Bottom,
            Self::Bottom => Self::Top,
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }

    /// Whether the panel stacks above/below the anchor (primary axis is y).
    #[must_use]
    pub const fn is_vertical(self) -> bool {
        matches!(self, Self::Top | Self::Bottom)
    }

    const fn as_str(self) -> &'static str {
        match self {
            Self::Top => "top",
            Self::Bottom => "bottom",
            Self::Left => "left",
            Self::Right => "right",
        }
    }
}

/// Alignment along the anchor edge (the cross axis).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Align {
    /// Centre the panel on the anchor.
    #[default]
    Center,
    /// Line up the panel's leading edge with the anchor's leading edge.
    Start,
    /// Line up the panel's trailing edge with the anchor's trailing edge.
    End,
}

/// Where a panel goes relative to its anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Placement {
    pub side: Side,
    pub align: Align,
}

impl Placement {
    pub const TOP: Self = Self::new(Side::Top, Align::Center);
    pub const TOP_START: Self = Self::new(Side::Top, Align::Start);
    pub const TOP_END: Self = Self::new(Side::Top, Align::End);
    pub const BOTTOM: Self = Self::new(Side::Bottom, Align::Center);
    pub const BOTTOM_START: Self = Self::new(Side::Bottom, Align::Start);
    pub const BOTTOM_END: Self = Self::new(Side::Bottom, Align::End);
    pub const LEFT: Self = Self::new(Side::Left, Align::Center);
    pub const LEFT_START: Self = Self::new(Side::Left, Align::Start);
    pub const LEFT_END: Self = Self::new(Side::Left, Align::End);
    pub const RIGHT: Self = Self::new(Side::Right, Align::Center);
    pub const RIGHT_START: Self = Self::new(Side::Right, Align::Start);
    pub const RIGHT_END: Self = Self::new(Side::Right, Align::End);

    /// Every placement, sides in `top, bottom, left, right` order.
    pub const ALL: [Self; 12] = [
        Self::TOP,
        Self::TOP_START,
        Self::TOP_END,
        Self::BOTTOM,
        Self::BOTTOM_START,
        Self::BOTTOM_END,
        Self::LEFT,
        Self::LEFT_START,
        Self::LEFT_END,
        Self::RIGHT,
        Self::RIGHT_START,
        Self::RIGHT_END,
    ];

    #[must_use]
    pub const fn new(side: Side, align: Align) -> Self {
        Self { side, align }
    }

    /// Same alignment on the opposite side.
    #[must_use]
    pub const fn flip(self) -> Self {
        Self::new(self.side.opposite(), self.align)
    }

    /// Whether this is a top/bottom placement.
    #[must_use]
    pub const fn is_vertical(self) -> bool {
        self.side.is_vertical()
    }
}

impl Default for Placement {
    fn default() -> Self {
        Self::BOTTOM
    }
}

impl fmt::Display for Placement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.side.as_str())?;
        match self.align {
            Align::Center => Ok(()),
            Align::Start => f.write_str("-start"),
            Align::End => f.write_str("-end"),
        }
    }
}

/// A placement string that names no known placement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsePlacementError {
    input: String,
}

impl ParsePlacementError {
    /// The rejected input.
    #[must_use]
    pub fn input(&self) -> &str {
        &self.input
    }
}

impl fmt::Display for ParsePlacementError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown placement {:?} (expected top|bottom|left|right with optional -start/-end)",
            self.input
        )
    }
}

impl std::error::Error for ParsePlacementError {}

impl FromStr for Placement {
    type Err = ParsePlacementError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParsePlacementError {
            input: s.to_owned(),
        };
        let normalized = s.trim().to_ascii_lowercase();
        let (side, align) = match normalized.split_once('-') {
            Some((side, "start")) => (side, Align::Start),
            Some((side, "end")) => (side, Align::End),
            Some((side, "center")) => (side, Align::Center),
            Some(_) => return Err(err()),
            None => (normalized.as_str(), Align::Center),
        };
        let side = match side {
            "top" => Side::Top,
            "bottom" => Side::Bottom,
            "left" => Side::Left,
            "right" => Side::Right,
            _ => return Err(err()),
        };
        Ok(Self::new(side, align))
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Placement {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Placement {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flip_keeps_alignment() {
        assert_eq!(Placement::TOP.flip(), Placement::BOTTOM);
        assert_eq!(Placement::BOTTOM_START.flip(), Placement::TOP_START);
        assert_eq!(Placement::LEFT_END.flip(), Placement::RIGHT_END);
        assert_eq!(Placement::RIGHT.flip(), Placement::LEFT);
    }

    #[test]
    fn flip_twice_is_identity() {
        for p in Placement::ALL {
            assert_eq!(p.flip().flip(), p);
        }
    }

    #[test]
    fn placement_is_vertical() {
        assert!(Placement::TOP.is_vertical());
        assert!(Placement::BOTTOM_END.is_vertical());
        assert!(!Placement::LEFT.is_vertical());
        assert!(!Placement::RIGHT_START.is_vertical());
    }

    #[test]
    fn display_and_parse_agree() {
        for p in Placement::ALL {
            assert_eq!(p.to_string().parse::<Placement>(), Ok(p));
        }
        assert_eq!(Placement::BOTTOM_START.to_string(), "bottom-start");
        assert_eq!(Placement::TOP.to_string(), "top");
    }

    #[test]
    fn parse_is_lenient_about_case_and_center() {
        assert_eq!(" Top-End ".parse::<Placement>(), Ok(Placement::TOP_END));
        assert_eq!("left-center".parse::<Placement>(), Ok(Placement::LEFT));
    }

    #[test]
    fn parse_rejects_unknown() {
        for bad in ["", "middle", "top-middle", "bottom-start-end", "up"] {
            let err = bad.parse::<Placement>().unwrap_err();
            assert_eq!(err.input(), bad);
        }
    }

    #[test]
    fn default_is_bottom_centered() {
        assert_eq!(Placement::default(), Placement::BOTTOM);
        assert_eq!(Align::default(), Align::Center);
    }
}
