mod timers;

use softkey_core::geometry::Key;
use softkey_core::settings::Settings;
use softkey_core::visual::KeyVisualState;

use super::{
    GestureListener, KeyEvent, PointerAction, PointerEvent, PreviewUpdate, ShiftState,
    TouchDispatcher,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) enum Callback {
    Press(i32),
    Release(i32),
    Key(i32, u32),
    Text(String),
    Event(KeyEvent),
    SwipeLeft,
    SwipeRight,
    SwipeUp,
    SwipeDown,
    Preview(PreviewUpdate),
    KeyState(usize, KeyVisualState),
    Shift(ShiftState),
    Popup(usize),
}

impl Callback {
    /// Everything the text engine sees; rendering hooks excluded.
    pub(super) fn is_input(&self) -> bool {
        !matches!(
            self,
            Callback::Preview(_) | Callback::KeyState(..) | Callback::Shift(_) | Callback::Popup(_)
        )
    }
}

#[derive(Debug, Default)]
pub(super) struct Recorder {
    pub calls: Vec<Callback>,
}

impl Recorder {
    pub fn take(&mut self) -> Vec<Callback> {
        std::mem::take(&mut self.calls)
    }

    pub fn input(&self) -> Vec<Callback> {
        self.calls.iter().filter(|c| c.is_input()).cloned().collect()
    }

    pub fn releases(&self) -> Vec<i32> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                Callback::Release(code) => Some(*code),
                _ => None,
            })
            .collect()
    }

    pub fn keys(&self) -> Vec<i32> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                Callback::Key(code, _) => Some(*code),
                _ => None,
            })
            .collect()
    }

    pub fn events(&self) -> Vec<KeyEvent> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                Callback::Event(e) => Some(e.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn previews(&self) -> Vec<PreviewUpdate> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                Callback::Preview(p) => Some(*p),
                _ => None,
            })
            .collect()
    }
}

impl GestureListener for Recorder {
    fn on_press(&mut self, code: i32) {
        self.calls.push(Callback::Press(code));
    }
    fn on_release(&mut self, code: i32) {
        self.calls.push(Callback::Release(code));
    }
    fn on_key(&mut self, code: i32, mask: u32) {
        self.calls.push(Callback::Key(code, mask));
    }
    fn on_text(&mut self, text: &str) {
        self.calls.push(Callback::Text(text.to_string()));
    }
    fn on_event(&mut self, event: &KeyEvent) {
        self.calls.push(Callback::Event(event.clone()));
    }
    fn swipe_left(&mut self) {
        self.calls.push(Callback::SwipeLeft);
    }
    fn swipe_right(&mut self) {
        self.calls.push(Callback::SwipeRight);
    }
    fn swipe_up(&mut self) {
        self.calls.push(Callback::SwipeUp);
    }
    fn swipe_down(&mut self) {
        self.calls.push(Callback::SwipeDown);
    }
    fn on_preview(&mut self, update: PreviewUpdate) {
        self.calls.push(Callback::Preview(update));
    }
    fn on_key_state(&mut self, index: usize, state: KeyVisualState) {
        self.calls.push(Callback::KeyState(index, state));
    }
    fn on_shift_changed(&mut self, state: ShiftState) {
        self.calls.push(Callback::Shift(state));
    }
    fn on_popup(&mut self, index: usize) {
        self.calls.push(Callback::Popup(index));
    }
}

pub(super) const A: i32 = 'a' as i32;

/// One row of ten 100x100 keys at y 0..100, codes 'a'..='j'. Key `i`
/// spans x `i*100 .. i*100+100`.
pub(super) fn row_keys() -> Vec<Key> {
    (0..10)
        .map(|i| Key::new(i * 100, 0, 100, 100, A + i).with_label(((b'a' + i as u8) as char).to_string()))
        .collect()
}

pub(super) fn dispatcher_with(keys: Vec<Key>, settings: Settings) -> TouchDispatcher<Recorder> {
    let mut d = TouchDispatcher::new(Recorder::default(), settings);
    d.attach_keyboard(&keys).unwrap();
    d
}

pub(super) fn dispatcher() -> TouchDispatcher<Recorder> {
    dispatcher_with(row_keys(), Settings::default())
}

/// Center of key `i` in the row keyboard.
pub(super) fn center(i: i32) -> (i32, i32) {
    (i * 100 + 50, 50)
}

pub(super) fn down(d: &mut TouchDispatcher<Recorder>, (x, y): (i32, i32), t: u64) {
    d.handle_event(&PointerEvent::down(x, y, t));
}

pub(super) fn moved(d: &mut TouchDispatcher<Recorder>, (x, y): (i32, i32), t: u64) {
    d.handle_event(&PointerEvent::moved(x, y, t));
}

pub(super) fn up(d: &mut TouchDispatcher<Recorder>, (x, y): (i32, i32), t: u64) {
    d.handle_event(&PointerEvent::up(x, y, t));
}

pub(super) fn tap(d: &mut TouchDispatcher<Recorder>, pos: (i32, i32), t: u64) {
    down(d, pos, t);
    up(d, pos, t + 40);
}

pub(super) fn pointer(
    d: &mut TouchDispatcher<Recorder>,
    action: PointerAction,
    (x, y): (i32, i32),
    t: u64,
    index: usize,
    count: usize,
) {
    d.handle_event(&PointerEvent::new(action, x, y, t).with_pointer(index, count));
}
