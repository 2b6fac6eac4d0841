#![forbid(unsafe_code)]

//! Ready-made configurations for the common floating components.
//!
//! | Preset     | Trigger | Placement      | Delays (open/close) | Closes on        |
//! |------------|---------|----------------|---------------------|------------------|
//! | `tooltip`  | hover   | `top`          | 300 ms / 0 ms       | leave, escape    |
//! | `popover`  | click   | `bottom-start` | 0 / 0               | outside, escape  |
//! | `dropdown` | click   | `bottom-start` | 0 / 0               | outside, escape  |
//! | `select`   | click   | `bottom-start` | 0 / 0               | + option click   |
//!
//! Every preset is a plain [`FloatingConfig`]; chain builder methods to
//! adjust it.

use tether_runtime::{ConfigError, FloatingConfig};

/// Names accepted by [`by_name`], in table order.
pub const NAMES: [&str; 4] = ["tooltip", "popover", "dropdown", "select"];

/// Hover-triggered label above the trigger.
#[must_use]
pub fn tooltip() -> FloatingConfig {
    FloatingConfig::tooltip()
}

/// Click-triggered panel below the trigger, dismissed by outside clicks.
#[must_use]
pub fn popover() -> FloatingConfig {
    FloatingConfig::popover()
}

/// Popover hugging its trigger; clicks inside the list keep it open.
#[must_use]
pub fn dropdown() -> FloatingConfig {
    FloatingConfig::dropdown()
}

/// Dropdown that dismisses once an option is clicked.
#[must_use]
pub fn select() -> FloatingConfig {
    FloatingConfig::select()
}

/// Look a preset up by name.
pub fn by_name(name: &str) -> Result<FloatingConfig, ConfigError> {
    match name {
        "tooltip" => Ok(tooltip()),
        "popover" => Ok(popover()),
        "dropdown" => Ok(dropdown()),
        "select" => Ok(select()),
        other => Err(ConfigError::UnknownPreset(other.to_owned())),
    }
}
