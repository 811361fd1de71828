//! Visual key states reported to the rendering adapter.

use serde::{Deserialize, Serialize};

use crate::geometry::Key;

/// Background state of a key. Checkable keys (shift and sticky keys) are
/// drawn `On`/`Off` depending on the shift state, everything else
/// `Normal`/`Pressed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyVisualState {
    Normal,
    Pressed,
    NormalOn,
    PressedOn,
    NormalOff,
    PressedOff,
}

// [plain, checked on, checked off] x [released, pressed]
const STATE_TABLE: [[KeyVisualState; 2]; 3] = [
    [KeyVisualState::Normal, KeyVisualState::Pressed],
    [KeyVisualState::NormalOn, KeyVisualState::PressedOn],
    [KeyVisualState::NormalOff, KeyVisualState::PressedOff],
];

impl KeyVisualState {
    pub fn for_key(key: &Key, pressed: bool, shift_on: bool) -> Self {
        let row = match (key.shift || key.sticky, shift_on) {
            (false, _) => 0,
            (true, true) => 1,
            (true, false) => 2,
        };
        STATE_TABLE[row][usize::from(pressed)]
    }

    pub fn is_pressed(self) -> bool {
        matches!(
            self,
            KeyVisualState::Pressed | KeyVisualState::PressedOn | KeyVisualState::PressedOff
        )
    }
}
