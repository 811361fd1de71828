use std::fs;

use softkey_core::settings::{default_toml, parse_settings_toml, Settings};

pub fn settings_export(resolved: bool) {
    if resolved {
        let text = die!(Settings::default().to_toml(), "Error: {}");
        print!("{text}");
    } else {
        print!("{}", default_toml());
    }
}

pub fn settings_validate(file: &str) {
    let content = die!(fs::read_to_string(file), "Error reading {file}: {}");
    let s = die!(parse_settings_toml(&content), "Error: {}");
    println!(
        "OK: long_press={}ms, repeat={}+{}ms, debounce={}ms, swipe.threshold={}, correction={}",
        s.timing.long_press_timeout_ms,
        s.timing.repeat_start_delay_ms,
        s.timing.repeat_interval_ms,
        s.timing.debounce_ms,
        s.swipe.threshold,
        s.proximity.correction
    );
}

/// Settings from `file`, or the embedded defaults.
pub fn load_settings(file: Option<&str>) -> Settings {
    match file {
        Some(path) => {
            let content = die!(fs::read_to_string(path), "Error reading {path}: {}");
            die!(parse_settings_toml(&content), "Error in {path}: {}")
        }
        None => Settings::default(),
    }
}
