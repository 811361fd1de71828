use std::fmt;
use std::fs;

use serde::{Deserialize, Serialize};

use softkey_core::geometry::{GeometryError, GestureKind, KeyboardLayout};
use softkey_core::settings::Settings;
use softkey_core::visual::KeyVisualState;
use softkey_session::{
    GestureListener, KeyEvent, PointerAction, PointerEvent, PreviewUpdate, ShiftState,
    TouchDispatcher,
};

use super::config_ops::load_settings;

#[derive(Debug, thiserror::Error)]
pub enum ReplayError {
    #[error("line {line}: {source}")]
    Parse {
        line: usize,
        source: serde_json::Error,
    },
    #[error("invalid keyboard: {0}")]
    Geometry(#[from] GeometryError),
}

/// One line of a trace file.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "snake_case")]
enum TraceAction {
    Down,
    Move,
    Up,
    Cancel,
    PointerDown,
    PointerUp,
    /// No event; fire timers due at `time`.
    Advance,
}

fn one() -> usize {
    1
}

#[derive(Debug, Deserialize)]
struct TraceLine {
    action: TraceAction,
    #[serde(default)]
    x: i32,
    #[serde(default)]
    y: i32,
    time: u64,
    #[serde(default)]
    pointer_index: usize,
    #[serde(default = "one")]
    pointer_count: usize,
    #[serde(default)]
    modifiers: u32,
}

/// A listener callback as recorded during replay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "callback", rename_all = "snake_case")]
pub enum Callback {
    Press { code: i32 },
    Release { code: i32 },
    Key { code: i32, mask: u32 },
    Text { text: String },
    Event {
        index: usize,
        gesture: GestureKind,
        code: i32,
        tap_count: u32,
        nearby_codes: Vec<i32>,
    },
    Swipe { direction: &'static str },
    Preview { index: Option<usize>, gesture: Option<GestureKind> },
    KeyState { index: usize, state: KeyVisualState },
    Shift { shifted: bool, locked: bool },
    Popup { index: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TraceEntry {
    pub time: u64,
    #[serde(flatten)]
    pub callback: Callback,
}

impl fmt::Display for TraceEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:>7}  ", self.time)?;
        match &self.callback {
            Callback::Press { code } => write!(f, "press    {code}"),
            Callback::Release { code } => write!(f, "release  {code}"),
            Callback::Key { code, mask } => write!(f, "key      {code} mask={mask:#x}"),
            Callback::Text { text } => write!(f, "text     {text:?}"),
            Callback::Event {
                index,
                gesture,
                code,
                tap_count,
                nearby_codes,
            } => write!(
                f,
                "event    key={index} {gesture:?} code={code} taps={tap_count} nearby={nearby_codes:?}"
            ),
            Callback::Swipe { direction } => write!(f, "swipe    {direction}"),
            Callback::Preview {
                index: Some(index),
                gesture: Some(gesture),
            } => write!(f, "preview  show key={index} {gesture:?}"),
            Callback::Preview { .. } => write!(f, "preview  hide"),
            Callback::KeyState { index, state } => write!(f, "state    key={index} {state:?}"),
            Callback::Shift { shifted, locked } => {
                write!(f, "shift    shifted={shifted} locked={locked}")
            }
            Callback::Popup { index } => write!(f, "popup    key={index}"),
        }
    }
}

/// Records callbacks, stamped with the time of the step that caused them.
#[derive(Debug, Default)]
struct Recorder {
    now: u64,
    entries: Vec<TraceEntry>,
}

impl Recorder {
    fn push(&mut self, callback: Callback) {
        self.entries.push(TraceEntry {
            time: self.now,
            callback,
        });
    }
}

impl GestureListener for Recorder {
    fn on_press(&mut self, code: i32) {
        self.push(Callback::Press { code });
    }
    fn on_release(&mut self, code: i32) {
        self.push(Callback::Release { code });
    }
    fn on_key(&mut self, code: i32, mask: u32) {
        self.push(Callback::Key { code, mask });
    }
    fn on_text(&mut self, text: &str) {
        self.push(Callback::Text {
            text: text.to_string(),
        });
    }
    fn on_event(&mut self, event: &KeyEvent) {
        self.push(Callback::Event {
            index: event.index,
            gesture: event.gesture,
            code: event.code,
            tap_count: event.tap_count,
            nearby_codes: event.nearby_codes.clone(),
        });
    }
    fn swipe_left(&mut self) {
        self.push(Callback::Swipe { direction: "left" });
    }
    fn swipe_right(&mut self) {
        self.push(Callback::Swipe { direction: "right" });
    }
    fn swipe_up(&mut self) {
        self.push(Callback::Swipe { direction: "up" });
    }
    fn swipe_down(&mut self) {
        self.push(Callback::Swipe { direction: "down" });
    }
    fn on_preview(&mut self, update: PreviewUpdate) {
        let (index, gesture) = match update {
            PreviewUpdate::Show { index, gesture } => (Some(index), Some(gesture)),
            PreviewUpdate::Hide => (None, None),
        };
        self.push(Callback::Preview { index, gesture });
    }
    fn on_key_state(&mut self, index: usize, state: KeyVisualState) {
        self.push(Callback::KeyState { index, state });
    }
    fn on_shift_changed(&mut self, state: ShiftState) {
        self.push(Callback::Shift {
            shifted: state.shifted,
            locked: state.locked,
        });
    }
    fn on_popup(&mut self, index: usize) {
        self.push(Callback::Popup { index });
    }
}

/// Feeds a JSONL pointer trace through a fresh dispatcher. Blank lines and
/// lines starting with `#` are skipped. With `until`, timers due up to that
/// time fire after the last line.
pub fn replay(
    layout: &KeyboardLayout,
    settings: Settings,
    trace: &str,
    until: Option<u64>,
) -> Result<Vec<TraceEntry>, ReplayError> {
    let mut dispatcher = TouchDispatcher::new(Recorder::default(), settings);
    dispatcher.attach_keyboard(layout)?;

    for (i, raw) in trace.lines().enumerate() {
        let raw = raw.trim();
        if raw.is_empty() || raw.starts_with('#') {
            continue;
        }
        let line: TraceLine = serde_json::from_str(raw).map_err(|source| ReplayError::Parse {
            line: i + 1,
            source,
        })?;
        dispatcher.listener_mut().now = line.time;
        let action = match line.action {
            TraceAction::Advance => {
                dispatcher.advance_to(line.time);
                continue;
            }
            TraceAction::Down => PointerAction::Down,
            TraceAction::Move => PointerAction::Move,
            TraceAction::Up => PointerAction::Up,
            TraceAction::Cancel => PointerAction::Cancel,
            TraceAction::PointerDown => PointerAction::PointerDown,
            TraceAction::PointerUp => PointerAction::PointerUp,
        };
        let event = PointerEvent::new(action, line.x, line.y, line.time)
            .with_pointer(line.pointer_index, line.pointer_count)
            .with_modifiers(line.modifiers);
        dispatcher.handle_event(&event);
    }

    if let Some(until) = until {
        dispatcher.listener_mut().now = until;
        dispatcher.advance_to(until);
    }
    Ok(dispatcher.into_listener().entries)
}

pub fn replay_cmd(
    keyboard_file: &str,
    trace_file: &str,
    settings_file: Option<&str>,
    until: Option<u64>,
    json: bool,
    input_only: bool,
) {
    let keyboard = die!(fs::read_to_string(keyboard_file), "Error reading {keyboard_file}: {}");
    let layout = die!(KeyboardLayout::from_toml(&keyboard), "Error: {}");
    let trace = die!(fs::read_to_string(trace_file), "Error reading {trace_file}: {}");
    let settings = load_settings(settings_file);

    let entries = die!(replay(&layout, settings, &trace, until), "Error in {trace_file}: {}");
    for entry in entries.iter().filter(|e| !input_only || e.callback.is_input()) {
        if json {
            println!("{}", die!(serde_json::to_string(entry), "Error: {}"));
        } else {
            println!("{entry}");
        }
    }
}

impl Callback {
    /// Callbacks that reach the text engine; rendering hooks excluded.
    pub fn is_input(&self) -> bool {
        !matches!(
            self,
            Callback::Preview { .. }
                | Callback::KeyState { .. }
                | Callback::Shift { .. }
                | Callback::Popup { .. }
        )
    }
}
