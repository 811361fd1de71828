//! Touch engine settings loaded from TOML.
//!
//! - `init_custom(toml_content)` sets a custom TOML before first `settings()` call
//! - `settings()` returns `&'static Settings` (lazy-init process default)
//! - Default values are embedded via `include_str!("default_settings.toml")`
//!
//! The process default only seeds hosts. A dispatcher always receives its own
//! owned `Settings` at construction and on reset.

use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

pub const DEFAULT_SETTINGS_TOML: &str = include_str!("default_settings.toml");

static CUSTOM_TOML: OnceLock<String> = OnceLock::new();

/// Set custom TOML before first `settings()` call.
pub fn init_custom(toml_content: String) -> Result<(), SettingsError> {
    parse_settings_toml(&toml_content)?;
    CUSTOM_TOML
        .set(toml_content)
        .map_err(|_| SettingsError::AlreadyInitialized)
}

/// Get or initialize the process-wide default settings.
pub fn settings() -> &'static Settings {
    static INSTANCE: OnceLock<Settings> = OnceLock::new();
    INSTANCE.get_or_init(|| {
        let toml_str = CUSTOM_TOML
            .get()
            .map(|s| s.as_str())
            .unwrap_or(DEFAULT_SETTINGS_TOML);
        parse_settings_toml(toml_str).expect("settings TOML must be valid")
    })
}

/// Returns the embedded default settings TOML content.
pub fn default_toml() -> &'static str {
    DEFAULT_SETTINGS_TOML
}

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("TOML parse error: {0}")]
    Parse(String),
    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },
    #[error("settings already initialized")]
    AlreadyInitialized,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    pub timing: TimingSettings,
    pub proximity: ProximitySettings,
    pub swipe: SwipeSettings,
    pub preview: PreviewSettings,
}

impl Default for Settings {
    fn default() -> Self {
        parse_settings_toml(DEFAULT_SETTINGS_TOML).expect("embedded settings TOML must be valid")
    }
}

impl Settings {
    /// Serialize back to TOML, e.g. for `touchtool settings export --resolved`.
    pub fn to_toml(&self) -> Result<String, SettingsError> {
        toml::to_string(self).map_err(|e| SettingsError::Parse(e.to_string()))
    }
}

/// Timer delays, all in milliseconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimingSettings {
    pub repeat_start_delay_ms: u64,
    pub repeat_interval_ms: u64,
    pub long_press_timeout_ms: u64,
    pub multi_tap_interval_ms: u64,
    pub debounce_ms: u64,
    pub preview_show_delay_ms: u64,
    pub preview_hide_delay_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProximitySettings {
    /// Accept near misses within the proximity threshold and report alternates.
    pub correction: bool,
    pub max_nearby_keys: usize,
}

/// Fling classification, velocities in pixels per second.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwipeSettings {
    pub threshold: f32,
    pub min_travel: f32,
    pub min_fling_velocity: f32,
    pub max_velocity: f32,
    /// Tell "key held, then swiped" apart from a pure swipe by the ending velocity.
    pub disambiguate: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreviewSettings {
    pub enabled: bool,
}

pub fn parse_settings_toml(toml_str: &str) -> Result<Settings, SettingsError> {
    let s: Settings = toml::from_str(toml_str).map_err(|e| SettingsError::Parse(e.to_string()))?;
    validate(&s)?;
    Ok(s)
}

fn validate(s: &Settings) -> Result<(), SettingsError> {
    macro_rules! check_positive {
        ($section:ident . $field:ident) => {
            if s.$section.$field == 0 {
                return Err(SettingsError::InvalidValue {
                    field: concat!(stringify!($section), ".", stringify!($field)).to_string(),
                    reason: "must be positive".to_string(),
                });
            }
        };
    }
    macro_rules! check_non_negative_f32 {
        ($section:ident . $field:ident) => {
            if !s.$section.$field.is_finite() || s.$section.$field < 0.0 {
                return Err(SettingsError::InvalidValue {
                    field: concat!(stringify!($section), ".", stringify!($field)).to_string(),
                    reason: "must be a finite non-negative number".to_string(),
                });
            }
        };
    }

    check_positive!(timing.repeat_interval_ms);
    check_positive!(timing.long_press_timeout_ms);
    check_positive!(timing.multi_tap_interval_ms);
    check_positive!(proximity.max_nearby_keys);

    check_non_negative_f32!(swipe.threshold);
    check_non_negative_f32!(swipe.min_travel);
    check_non_negative_f32!(swipe.min_fling_velocity);
    check_non_negative_f32!(swipe.max_velocity);
    if s.swipe.max_velocity == 0.0 {
        return Err(SettingsError::InvalidValue {
            field: "swipe.max_velocity".to_string(),
            reason: "must be positive".to_string(),
        });
    }

    Ok(())
}
