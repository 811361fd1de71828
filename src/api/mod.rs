//! UniFFI export layer for the touch engine.
//!
//! Each public type here maps to a generated Swift/Kotlin class, struct, or enum.

mod engine;
mod types;

pub use engine::SkEngine;
pub use types::{
    SkBinding, SkError, SkEvent, SkGesture, SkKey, SkKeyState, SkPointerAction, SkPointerEvent,
    SkShiftState,
};

use std::path::Path;

// ---------------------------------------------------------------------------
// Top-level functions
// ---------------------------------------------------------------------------

#[uniffi::export]
fn engine_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// Installs a settings file as the process default. Must run before the
/// first engine is created without explicit settings.
#[uniffi::export]
fn settings_load_config(path: String) -> Result<(), SkError> {
    let content = std::fs::read_to_string(&path).map_err(|e| SkError::Io {
        msg: format!("{path}: {e}"),
    })?;
    softkey_core::settings::init_custom(content)
        .map_err(|e| SkError::InvalidData { msg: e.to_string() })?;
    Ok(())
}

#[uniffi::export]
fn settings_default_config() -> String {
    softkey_core::settings::DEFAULT_SETTINGS_TOML.to_string()
}

#[uniffi::export]
fn trace_init(log_dir: String) {
    crate::trace_init::init_tracing(Path::new(&log_dir));
}
