use softkey_core::visual::KeyVisualState;

use crate::types::{KeyEvent, PreviewUpdate, ShiftState};

/// Outbound callbacks of a [`TouchDispatcher`](crate::TouchDispatcher).
///
/// The key callbacks feed the downstream text engine. The hooks with default
/// bodies are for a rendering adapter and may be ignored.
pub trait GestureListener {
    fn on_press(&mut self, code: i32);
    fn on_release(&mut self, code: i32);
    fn on_key(&mut self, code: i32, mask: u32);
    fn on_text(&mut self, text: &str);
    fn on_event(&mut self, event: &KeyEvent);

    fn swipe_left(&mut self);
    fn swipe_right(&mut self);
    fn swipe_up(&mut self);
    fn swipe_down(&mut self);

    fn on_preview(&mut self, _update: PreviewUpdate) {}
    fn on_key_state(&mut self, _index: usize, _state: KeyVisualState) {}
    fn on_shift_changed(&mut self, _state: ShiftState) {}
    /// Long-press on a popup key: the adapter opens the sub-keyboard.
    fn on_popup(&mut self, _index: usize) {}
}
