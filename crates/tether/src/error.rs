#![forbid(unsafe_code)]

//! Unified error for the facade.
//!
//! Each internal crate reports its own typed error; this enum wraps them so
//! host code can use one `?` across placement parsing, configuration and
//! file loading.

use std::fmt;

use tether_layout::ParsePlacementError;
use tether_runtime::ConfigError;

/// Top-level error type for Tether hosts.
#[derive(Debug)]
pub enum Error {
    /// A configuration value or file was rejected.
    Config(ConfigError),
    /// A placement string named no known placement.
    Placement(ParsePlacementError),
    /// Raw I/O error (convenience variant for `?` on io::Result).
    Io(std::io::Error),
}

/// Standard result type for Tether APIs.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Error type label for logs.
    pub fn error_type(&self) -> &'static str {
        match self {
            Self::Config(_) => "config",
            Self::Placement(_) => "placement",
            Self::Io(_) => "io",
        }
    }
}

// ── Display ─────────────────────────────────────────────────────────────

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(err) => write!(f, "config: {err}"),
            Self::Placement(err) => write!(f, "{err}"),
            Self::Io(err) => write!(f, "I/O: {err}"),
        }
    }
}

// ── std::error::Error ───────────────────────────────────────────────────

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Config(err) => Some(err),
            Self::Placement(err) => Some(err),
            Self::Io(err) => Some(err),
        }
    }
}

// ── From conversions ────────────────────────────────────────────────────

impl From<ConfigError> for Error {
    fn from(err: ConfigError) -> Self {
        // Unwrap the two variants that have a top-level home of their own.
        match err {
            ConfigError::Placement(err) => Self::Placement(err),
            ConfigError::Io(err) => Self::Io(err),
            other => Self::Config(other),
        }
    }
}

impl From<ParsePlacementError> for Error {
    fn from(err: ParsePlacementError) -> Self {
        Self::Placement(err)
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}
