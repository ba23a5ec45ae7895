use std::env;

use log::warn;
use serde::Deserialize;
use serde::Serialize;

/// Forces (or forbids) headless mode regardless of what the platform reports.
pub const HEADLESS_VAR: &str = "SCREEN_DEVICES_HEADLESS";
/// X11 display to connect to instead of `$DISPLAY`.
pub const DISPLAY_VAR: &str = "SCREEN_DEVICES_DISPLAY";

/// Settings for opening the local graphics environment.
///
/// Every field is optional so a host can embed this in its own configuration
/// file and only spell out what it overrides.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// `Some(true)` skips enumeration entirely, `Some(false)` disables the
    /// platform's own headless detection, `None` leaves it to the platform.
    pub headless: Option<bool>,
    /// X11 display name, e.g. `:1`. Ignored on other platforms.
    pub display: Option<String>,
}

impl Config {
    /// Reads the configuration from `SCREEN_DEVICES_*` environment variables.
    pub fn from_env() -> Self {
        let headless = env::var(HEADLESS_VAR).ok().and_then(|value| {
            let flag = parse_flag(&value);
            if flag.is_none() {
                warn!("ignoring {HEADLESS_VAR}={value:?}, expected a boolean");
            }
            flag
        });
        let display = env::var(DISPLAY_VAR).ok().filter(|d| !d.is_empty());

        Self { headless, display }
    }

    #[must_use]
    pub const fn with_headless(mut self, headless: bool) -> Self {
        self.headless = Some(headless);
        self
    }

    #[must_use]
    pub fn with_display(mut self, display: impl Into<String>) -> Self {
        self.display = Some(display.into());
        self
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
