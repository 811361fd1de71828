use softkey_core::geometry::{GestureKind, Key, KeyBinding};
use softkey_core::visual::KeyVisualState;
use softkey_session::{
    GestureListener, KeyEvent, PointerAction, PointerEvent, PreviewUpdate, ShiftState,
};

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error, uniffi::Error)]
pub enum SkError {
    #[error("IO error: {msg}")]
    Io { msg: String },
    #[error("invalid data: {msg}")]
    InvalidData { msg: String },
    #[error("invalid geometry: {msg}")]
    InvalidGeometry { msg: String },
}

// ---------------------------------------------------------------------------
// Records (value types, copied across FFI boundary)
// ---------------------------------------------------------------------------

#[derive(Clone, uniffi::Record)]
pub struct SkBinding {
    pub gesture: SkGesture,
    pub code: i32,
    pub mask: u32,
    pub text: Option<String>,
    pub preview: Option<String>,
}

#[derive(Clone, uniffi::Record)]
pub struct SkKey {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
    pub gap: i32,
    pub code: i32,
    pub label: Option<String>,
    pub bindings: Vec<SkBinding>,
    pub shift: bool,
    pub repeatable: bool,
    pub sticky: bool,
    pub popup: bool,
}

#[derive(Clone, Copy, uniffi::Record)]
pub struct SkPointerEvent {
    pub action: SkPointerAction,
    pub pointer_index: u32,
    pub x: i32,
    pub y: i32,
    pub time_ms: u64,
    pub modifiers: u32,
    pub pointer_count: u32,
}

#[derive(Clone, Copy, uniffi::Record)]
pub struct SkShiftState {
    pub shifted: bool,
    pub locked: bool,
}

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

#[derive(Clone, Copy, Debug, PartialEq, Eq, uniffi::Enum)]
pub enum SkGesture {
    Tap,
    LongPress,
    SwipeUp,
    SwipeDown,
    SwipeLeft,
    SwipeRight,
    Combo,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, uniffi::Enum)]
pub enum SkPointerAction {
    Down,
    Move,
    Up,
    Cancel,
    PointerDown,
    PointerUp,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, uniffi::Enum)]
pub enum SkKeyState {
    Normal,
    Pressed,
    NormalOn,
    PressedOn,
    NormalOff,
    PressedOff,
}

/// Listener callbacks, in the order the dispatcher made them.
#[derive(Clone, Debug, PartialEq, Eq, uniffi::Enum)]
pub enum SkEvent {
    Press {
        code: i32,
    },
    Release {
        code: i32,
    },
    Key {
        code: i32,
        mask: u32,
    },
    Text {
        text: String,
    },
    KeyDispatched {
        index: u32,
        gesture: SkGesture,
        code: i32,
        tap_count: u32,
        nearby_codes: Vec<i32>,
    },
    SwipeLeft,
    SwipeRight,
    SwipeUp,
    SwipeDown,
    ShowPreview {
        index: u32,
        gesture: SkGesture,
    },
    HidePreview,
    KeyState {
        index: u32,
        state: SkKeyState,
    },
    ShiftChanged {
        shifted: bool,
        locked: bool,
    },
    Popup {
        index: u32,
    },
}

// ---------------------------------------------------------------------------
// Conversion helpers
// ---------------------------------------------------------------------------

impl From<GestureKind> for SkGesture {
    fn from(g: GestureKind) -> Self {
        match g {
            GestureKind::Tap => SkGesture::Tap,
            GestureKind::LongPress => SkGesture::LongPress,
            GestureKind::SwipeUp => SkGesture::SwipeUp,
            GestureKind::SwipeDown => SkGesture::SwipeDown,
            GestureKind::SwipeLeft => SkGesture::SwipeLeft,
            GestureKind::SwipeRight => SkGesture::SwipeRight,
            GestureKind::Combo => SkGesture::Combo,
        }
    }
}

impl From<SkGesture> for GestureKind {
    fn from(g: SkGesture) -> Self {
        match g {
            SkGesture::Tap => GestureKind::Tap,
            SkGesture::LongPress => GestureKind::LongPress,
            SkGesture::SwipeUp => GestureKind::SwipeUp,
            SkGesture::SwipeDown => GestureKind::SwipeDown,
            SkGesture::SwipeLeft => GestureKind::SwipeLeft,
            SkGesture::SwipeRight => GestureKind::SwipeRight,
            SkGesture::Combo => GestureKind::Combo,
        }
    }
}

impl From<KeyVisualState> for SkKeyState {
    fn from(s: KeyVisualState) -> Self {
        match s {
            KeyVisualState::Normal => SkKeyState::Normal,
            KeyVisualState::Pressed => SkKeyState::Pressed,
            KeyVisualState::NormalOn => SkKeyState::NormalOn,
            KeyVisualState::PressedOn => SkKeyState::PressedOn,
            KeyVisualState::NormalOff => SkKeyState::NormalOff,
            KeyVisualState::PressedOff => SkKeyState::PressedOff,
        }
    }
}

impl From<SkBinding> for KeyBinding {
    fn from(b: SkBinding) -> Self {
        KeyBinding {
            gesture: b.gesture.into(),
            code: b.code,
            mask: b.mask,
            text: b.text,
            preview: b.preview,
        }
    }
}

impl From<SkKey> for Key {
    fn from(k: SkKey) -> Self {
        Key {
            x: k.x,
            y: k.y,
            width: k.width,
            height: k.height,
            gap: k.gap,
            code: k.code,
            label: k.label,
            bindings: k.bindings.into_iter().map(KeyBinding::from).collect(),
            shift: k.shift,
            repeatable: k.repeatable,
            sticky: k.sticky,
            popup: k.popup,
        }
    }
}

impl From<SkPointerEvent> for PointerEvent {
    fn from(e: SkPointerEvent) -> Self {
        let action = match e.action {
            SkPointerAction::Down => PointerAction::Down,
            SkPointerAction::Move => PointerAction::Move,
            SkPointerAction::Up => PointerAction::Up,
            SkPointerAction::Cancel => PointerAction::Cancel,
            SkPointerAction::PointerDown => PointerAction::PointerDown,
            SkPointerAction::PointerUp => PointerAction::PointerUp,
        };
        PointerEvent::new(action, e.x, e.y, e.time_ms)
            .with_pointer(e.pointer_index as usize, e.pointer_count as usize)
            .with_modifiers(e.modifiers)
    }
}

impl From<ShiftState> for SkShiftState {
    fn from(s: ShiftState) -> Self {
        SkShiftState {
            shifted: s.shifted,
            locked: s.locked,
        }
    }
}

/// Buffers listener callbacks until the FFI call returns them.
#[derive(Debug, Default)]
pub(super) struct EventCollector {
    events: Vec<SkEvent>,
}

impl EventCollector {
    pub(super) fn take(&mut self) -> Vec<SkEvent> {
        std::mem::take(&mut self.events)
    }
}

impl GestureListener for EventCollector {
    fn on_press(&mut self, code: i32) {
        self.events.push(SkEvent::Press { code });
    }

    fn on_release(&mut self, code: i32) {
        self.events.push(SkEvent::Release { code });
    }

    fn on_key(&mut self, code: i32, mask: u32) {
        self.events.push(SkEvent::Key { code, mask });
    }

    fn on_text(&mut self, text: &str) {
        self.events.push(SkEvent::Text {
            text: text.to_string(),
        });
    }

    fn on_event(&mut self, event: &KeyEvent) {
        self.events.push(SkEvent::KeyDispatched {
            index: event.index as u32,
            gesture: event.gesture.into(),
            code: event.code,
            tap_count: event.tap_count,
            nearby_codes: event.nearby_codes.clone(),
        });
    }

    fn swipe_left(&mut self) {
        self.events.push(SkEvent::SwipeLeft);
    }

    fn swipe_right(&mut self) {
        self.events.push(SkEvent::SwipeRight);
    }

    fn swipe_up(&mut self) {
        self.events.push(SkEvent::SwipeUp);
    }

    fn swipe_down(&mut self) {
        self.events.push(SkEvent::SwipeDown);
    }

    fn on_preview(&mut self, update: PreviewUpdate) {
        self.events.push(match update {
            PreviewUpdate::Show { index, gesture } => SkEvent::ShowPreview {
                index: index as u32,
                gesture: gesture.into(),
            },
            PreviewUpdate::Hide => SkEvent::HidePreview,
        });
    }

    fn on_key_state(&mut self, index: usize, state: KeyVisualState) {
        self.events.push(SkEvent::KeyState {
            index: index as u32,
            state: state.into(),
        });
    }

    fn on_shift_changed(&mut self, state: ShiftState) {
        self.events.push(SkEvent::ShiftChanged {
            shifted: state.shifted,
            locked: state.locked,
        });
    }

    fn on_popup(&mut self, index: usize) {
        self.events.push(SkEvent::Popup {
            index: index as u32,
        });
    }
}
