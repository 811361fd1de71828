use softkey_core::geometry::GestureKind;

/// Modifier bit OR'd into `on_key` masks while shift is on.
pub const MODIFIER_SHIFT: u32 = 0x1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerAction {
    Down,
    Move,
    Up,
    Cancel,
    /// A secondary pointer went down while another is held.
    PointerDown,
    /// A pointer went up while others remain held.
    PointerUp,
}

/// One inbound pointer event. `x`/`y` are the coordinates of the pointer the
/// action refers to, in keyboard-local pixels; `pointer_count` includes a
/// pointer that is lifting with this event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointerEvent {
    pub action: PointerAction,
    pub pointer_index: usize,
    pub x: i32,
    pub y: i32,
    pub time: u64,
    pub modifiers: u32,
    pub pointer_count: usize,
}

impl PointerEvent {
    pub fn new(action: PointerAction, x: i32, y: i32, time: u64) -> Self {
        Self {
            action,
            pointer_index: 0,
            x,
            y,
            time,
            modifiers: 0,
            pointer_count: 1,
        }
    }

    pub fn down(x: i32, y: i32, time: u64) -> Self {
        Self::new(PointerAction::Down, x, y, time)
    }

    pub fn moved(x: i32, y: i32, time: u64) -> Self {
        Self::new(PointerAction::Move, x, y, time)
    }

    pub fn up(x: i32, y: i32, time: u64) -> Self {
        Self::new(PointerAction::Up, x, y, time)
    }

    pub fn cancel(time: u64) -> Self {
        Self::new(PointerAction::Cancel, 0, 0, time)
    }

    pub fn with_pointer(mut self, pointer_index: usize, pointer_count: usize) -> Self {
        self.pointer_index = pointer_index;
        self.pointer_count = pointer_count;
        self
    }

    pub fn with_modifiers(mut self, modifiers: u32) -> Self {
        self.modifiers = modifiers;
        self
    }
}

/// Observable dispatcher state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DispatchState {
    Idle,
    TrackingSingle,
    LongPressPending,
    Repeating,
    TrackingCombo,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ShiftState {
    pub shifted: bool,
    /// Caps lock; only ever set while `shifted`.
    pub locked: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreviewUpdate {
    Show { index: usize, gesture: GestureKind },
    Hide,
}

/// Structured key action handed to `GestureListener::on_event`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyEvent {
    pub index: usize,
    pub gesture: GestureKind,
    pub code: i32,
    pub mask: u32,
    pub text: Option<String>,
    /// Alternate codes near the touch point, nearest first.
    pub nearby_codes: Vec<i32>,
    /// Consecutive taps on this key within the multi-tap interval, starting at 1.
    pub tap_count: u32,
}
