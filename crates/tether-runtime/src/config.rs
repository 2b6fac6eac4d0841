#![forbid(unsafe_code)]

//! Per-instance configuration for a floating panel.
//!
//! [`FloatingConfig`] carries every option one trigger/panel pair needs:
//! placement, gap, trigger mode, hover-intent delays and dismissal rules.
//! It is validated once at construction; an invalid value never reaches
//! the placement math.
//!
//! # Presets
//!
//! | preset                       | mode  | placement      | open / close  |
//! |------------------------------|-------|----------------|---------------|
//! | [`FloatingConfig::tooltip`]  | hover | `top`          | 300 ms / 0 ms |
//! | [`FloatingConfig::popover`]  | click | `bottom-start` | 0 / 0         |
//! | [`FloatingConfig::dropdown`] | click | `bottom-start` | 0 / 0         |
//! | [`FloatingConfig::select`]   | click | `bottom-start` | 0 / 0, closes on inner click |
//!
//! # Loading
//!
//! With the `config-file` feature, configs load from TOML or JSON. Delays
//! are written in milliseconds and every field is optional:
//!
//! ```toml
//! # tether.toml
//! [tooltip]
//! open_delay_ms = 500
//!
//! [menu]
//! extends = "dropdown"
//! placement = "right-start"
//! ```
//!
//! ```rust,ignore
//! let set = ConfigSet::from_toml_file("tether.toml")?;
//! let menu = set.get("menu").expect("declared above");
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

#[cfg(feature = "config-file")]
use std::collections::BTreeSet;
#[cfg(feature = "config-file")]
use std::path::Path;

#[cfg(feature = "config-file")]
use serde::Deserialize;

use tether_layout::{DEFAULT_MARGIN, DEFAULT_OFFSET, ParsePlacementError, Placement};

use crate::tracker::TrackOptions;

/// Longest accepted open or close delay.
pub const MAX_DELAY: Duration = Duration::from_secs(60);

/// Default hover-intent open delay of the tooltip preset.
pub const TOOLTIP_OPEN_DELAY: Duration = Duration::from_millis(300);

// ---------------------------------------------------------------------------
// TriggerMode
// ---------------------------------------------------------------------------

/// How the user opens the panel. Fixed per instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "config-file", derive(Deserialize))]
#[cfg_attr(feature = "config-file", serde(rename_all = "lowercase"))]
pub enum TriggerMode {
    /// Pointer-enter opens, pointer-leave closes.
    Hover,
    /// Click on the trigger toggles; outside interaction closes.
    #[default]
    Click,
}

impl fmt::Display for TriggerMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Hover => "hover",
            Self::Click => "click",
        })
    }
}

impl FromStr for TriggerMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "hover" => Ok(Self::Hover),
            "click" => Ok(Self::Click),
            _ => Err(ConfigError::UnknownTriggerMode(s.to_owned())),
        }
    }
}

// ---------------------------------------------------------------------------
// FloatingConfig
// ---------------------------------------------------------------------------

/// Options for one floating panel.
#[derive(Debug, Clone, PartialEq)]
pub struct FloatingConfig {
    /// Preferred side and alignment.
    pub placement: Placement,
    /// Gap between trigger and panel, in pixels.
    pub offset: f64,
    pub trigger_mode: TriggerMode,
    /// Hover-intent delay before showing. Zero opens synchronously.
    pub open_delay: Duration,
    /// Delay before hiding. Zero closes synchronously.
    pub close_delay: Duration,
    /// A disabled instance never leaves `Hidden`.
    pub disabled: bool,
    /// Click mode: a pointer-down outside trigger and panel closes.
    pub close_on_outside_interaction: bool,
    /// Click mode: a click inside the panel closes (option lists).
    pub close_on_inner_click: bool,
    /// Clearance kept from every viewport edge, in pixels.
    pub margin: f64,
    /// Coalesce resize bursts to one recompute per animation frame.
    pub throttle_resize: bool,
    /// Try the opposite side when the preferred one has no room.
    pub auto_flip: bool,
}

impl Default for FloatingConfig {
    fn default() -> Self {
        Self::popover()
    }
}

impl FloatingConfig {
    /// Hover tooltip above the trigger, shown after 300 ms.
    #[must_use]
    pub fn tooltip() -> Self {
        Self {
            placement: Placement::TOP,
            offset: DEFAULT_OFFSET,
            trigger_mode: TriggerMode::Hover,
            open_delay: TOOLTIP_OPEN_DELAY,
            close_delay: Duration::ZERO,
            disabled: false,
            close_on_outside_interaction: false,
            close_on_inner_click: false,
            margin: DEFAULT_MARGIN,
            throttle_resize: true,
            auto_flip: true,
        }
    }

    /// Click-to-open panel below the trigger, left edges aligned.
    #[must_use]
    pub fn popover() -> Self {
        Self {
            placement: Placement::BOTTOM_START,
            offset: DEFAULT_OFFSET,
            trigger_mode: TriggerMode::Click,
            open_delay: Duration::ZERO,
            close_delay: Duration::ZERO,
            disabled: false,
            close_on_outside_interaction: true,
            close_on_inner_click: false,
            margin: DEFAULT_MARGIN,
            throttle_resize: true,
            auto_flip: true,
        }
    }

    /// Generic dropdown menu. Same geometry as a popover, tighter gap.
    #[must_use]
    pub fn dropdown() -> Self {
        Self::popover().offset(4.0)
    }

    /// Dropdown whose option list closes once an option is clicked.
    #[must_use]
    pub fn select() -> Self {
        Self::dropdown().close_on_inner_click(true)
    }

    #[must_use]
    pub fn placement(mut self, placement: Placement) -> Self {
        self.placement = placement;
        self
    }

    #[must_use]
    pub fn offset(mut self, offset: f64) -> Self {
        self.offset = offset;
        self
    }

    #[must_use]
    pub fn trigger_mode(mut self, mode: TriggerMode) -> Self {
        self.trigger_mode = mode;
        self
    }

    #[must_use]
    pub fn open_delay(mut self, delay: Duration) -> Self {
        self.open_delay = delay;
        self
    }

    #[must_use]
    pub fn close_delay(mut self, delay: Duration) -> Self {
        self.close_delay = delay;
        self
    }

    #[must_use]
    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    #[must_use]
    pub fn close_on_outside_interaction(mut self, close: bool) -> Self {
        self.close_on_outside_interaction = close;
        self
    }

    #[must_use]
    pub fn close_on_inner_click(mut self, close: bool) -> Self {
        self.close_on_inner_click = close;
        self
    }

    #[must_use]
    pub fn margin(mut self, margin: f64) -> Self {
        self.margin = margin;
        self
    }

    #[must_use]
    pub fn throttle_resize(mut self, throttle: bool) -> Self {
        self.throttle_resize = throttle;
        self
    }

    #[must_use]
    pub fn auto_flip(mut self, flip: bool) -> Self {
        self.auto_flip = flip;
        self
    }

    /// Check every field. Returns the first problem found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.offset.is_finite() || self.offset < 0.0 {
            return Err(ConfigError::InvalidOffset(self.offset));
        }
        if !self.margin.is_finite() || self.margin < 0.0 {
            return Err(ConfigError::InvalidMargin(self.margin));
        }
        for (field, delay) in [
            ("open_delay", self.open_delay),
            ("close_delay", self.close_delay),
        ] {
            if delay > MAX_DELAY {
                return Err(ConfigError::DelayTooLong {
                    field,
                    millis: delay.as_millis(),
                });
            }
        }
        Ok(())
    }

    /// The subset of options the tracker re-applies on every recompute.
    #[must_use]
    pub fn track_options(&self) -> TrackOptions {
        TrackOptions {
            placement: self.placement,
            offset: self.offset,
            margin: self.margin,
            auto_flip: self.auto_flip,
            throttle_resize: self.throttle_resize,
        }
    }
}

#[cfg(feature = "config-file")]
impl FloatingConfig {
    /// Load from a TOML string. Missing fields keep the popover defaults.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let overrides: ConfigOverrides = toml::from_str(s)?;
        overrides.resolve(&ConfigSet::default())
    }

    /// Load from a TOML file on disk.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&content)
    }

    /// Load from a JSON string.
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        let overrides: ConfigOverrides = serde_json::from_str(s)?;
        overrides.resolve(&ConfigSet::default())
    }
}

// ---------------------------------------------------------------------------
// ConfigSet
// ---------------------------------------------------------------------------

/// Named configs, seeded with the four built-in presets.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigSet {
    entries: BTreeMap<String, FloatingConfig>,
}

impl Default for ConfigSet {
    fn default() -> Self {
        let entries = [
            ("tooltip", FloatingConfig::tooltip()),
            ("popover", FloatingConfig::popover()),
            ("dropdown", FloatingConfig::dropdown()),
            ("select", FloatingConfig::select()),
        ]
        .into_iter()
        .map(|(name, config)| (name.to_owned(), config))
        .collect();
        Self { entries }
    }
}

impl ConfigSet {
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&FloatingConfig> {
        self.entries.get(name)
    }

    /// Add or replace a named config after validating it.
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        config: FloatingConfig,
    ) -> Result<(), ConfigError> {
        config.validate()?;
        self.entries.insert(name.into(), config);
        Ok(())
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(feature = "config-file")]
impl ConfigSet {
    /// Load from a TOML string: one table per named config.
    ///
    /// A table named after a built-in preset starts from that preset. Other
    /// tables start from `extends` (a built-in or any other table in the
    /// same file, chains allowed), or from the popover defaults.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let tables: BTreeMap<String, ConfigOverrides> = toml::from_str(s)?;
        Self::resolve(tables)
    }

    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&content)
    }

    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        let tables: BTreeMap<String, ConfigOverrides> = serde_json::from_str(s)?;
        Self::resolve(tables)
    }

    fn resolve(tables: BTreeMap<String, ConfigOverrides>) -> Result<Self, ConfigError> {
        let builtins = Self::default();
        let mut set = Self::default();
        // Entries without `extends` first so user presets can build on them.
        let (plain, mut pending): (Vec<_>, Vec<_>) = tables
            .into_iter()
            .partition(|(_, overrides)| overrides.extends.is_none());
        for (name, overrides) in plain {
            let base = builtins
                .get(&name)
                .cloned()
                .unwrap_or_else(FloatingConfig::popover);
            let config = overrides.apply(base)?;
            set.entries.insert(name, config);
        }

        // Resolve `extends` chains in dependency order, whatever the table
        // names. A table is ready once its parent is no longer pending.
        while !pending.is_empty() {
            let waiting: BTreeSet<String> =
                pending.iter().map(|(name, _)| name.clone()).collect();
            let (ready, blocked): (Vec<_>, Vec<_>) =
                pending.into_iter().partition(|(_, overrides)| {
                    overrides
                        .extends
                        .as_deref()
                        .is_some_and(|parent| !waiting.contains(parent))
                });
            if ready.is_empty() {
                // Every remaining table waits on another remaining table.
                let names: Vec<String> = blocked.into_iter().map(|(name, _)| name).collect();
                return Err(ConfigError::ExtendsCycle(names.join(", ")));
            }
            for (name, overrides) in ready {
                let config = overrides.resolve(&set)?;
                set.entries.insert(name, config);
            }
            pending = blocked;
        }
        tracing::debug!(message = "config.loaded", presets = set.len());
        Ok(set)
    }
}

/// File form of a config: every field optional, delays in milliseconds.
#[cfg(feature = "config-file")]
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ConfigOverrides {
    extends: Option<String>,
    placement: Option<Placement>,
    offset: Option<f64>,
    trigger_mode: Option<TriggerMode>,
    open_delay_ms: Option<u64>,
    close_delay_ms: Option<u64>,
    disabled: Option<bool>,
    close_on_outside_interaction: Option<bool>,
    close_on_inner_click: Option<bool>,
    margin: Option<f64>,
    throttle_resize: Option<bool>,
    auto_flip: Option<bool>,
}

#[cfg(feature = "config-file")]
impl ConfigOverrides {
    fn resolve(self, known: &ConfigSet) -> Result<FloatingConfig, ConfigError> {
        let base = match self.extends.as_deref() {
            Some(name) => known
                .get(name)
                .cloned()
                .ok_or_else(|| ConfigError::UnknownPreset(name.to_owned()))?,
            None => FloatingConfig::popover(),
        };
        self.apply(base)
    }

    fn apply(self, mut config: FloatingConfig) -> Result<FloatingConfig, ConfigError> {
        if let Some(v) = self.placement {
            config.placement = v;
        }
        if let Some(v) = self.offset {
            config.offset = v;
        }
        if let Some(v) = self.trigger_mode {
            config.trigger_mode = v;
        }
        if let Some(ms) = self.open_delay_ms {
            config.open_delay = Duration::from_millis(ms);
        }
        if let Some(ms) = self.close_delay_ms {
            config.close_delay = Duration::from_millis(ms);
        }
        if let Some(v) = self.disabled {
            config.disabled = v;
        }
        if let Some(v) = self.close_on_outside_interaction {
            config.close_on_outside_interaction = v;
        }
        if let Some(v) = self.close_on_inner_click {
            config.close_on_inner_click = v;
        }
        if let Some(v) = self.margin {
            config.margin = v;
        }
        if let Some(v) = self.throttle_resize {
            config.throttle_resize = v;
        }
        if let Some(v) = self.auto_flip {
            config.auto_flip = v;
        }
        config.validate()?;
        Ok(config)
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// A configuration value was rejected.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("offset must be a finite, non-negative number of pixels, got {0}")]
    InvalidOffset(f64),

    #[error("margin must be a finite, non-negative number of pixels, got {0}")]
    InvalidMargin(f64),

    #[error("{field} of {millis} ms exceeds the 60000 ms limit")]
    DelayTooLong { field: &'static str, millis: u128 },

    #[error(transparent)]
    Placement(#[from] ParsePlacementError),

    #[error("unknown trigger mode {0:?} (expected hover|click)")]
    UnknownTriggerMode(String),

    #[error("unknown preset {0:?}")]
    UnknownPreset(String),

    #[error("`extends` cycle between presets: {0}")]
    ExtendsCycle(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[cfg(feature = "config-file")]
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[cfg(feature = "config-file")]
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}
