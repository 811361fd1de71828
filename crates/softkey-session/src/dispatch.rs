use tracing::debug;

use softkey_core::geometry::GestureKind;
use softkey_core::timer::TimerKind;

use crate::types::{KeyEvent, MODIFIER_SHIFT};
use crate::{GestureListener, TouchDispatcher};

impl<L: GestureListener> TouchDispatcher<L> {
    /// Sends the action bound to `gesture` on key `index`, touched at `pos`.
    /// "No key" and out-of-range indices are ignored.
    pub(crate) fn detect_and_send(
        &mut self,
        index: Option<usize>,
        pos: (i32, i32),
        time: u64,
        gesture: GestureKind,
    ) {
        let Some(keyboard) = self.keyboard.clone() else {
            return;
        };
        let Some((index, key)) = index.and_then(|i| keyboard.key(i).map(|k| (i, k))) else {
            return;
        };

        if key.shift && !key.has_binding(gesture) {
            self.multi_tap.record(index, time);
            self.toggle_shift(key.sticky);
            return;
        }

        if key.repeatable && !matches!(gesture, GestureKind::Tap | GestureKind::Combo) {
            self.abort_session();
            if !key.has_binding(gesture) {
                return;
            }
        }

        self.multi_tap.record(index, time);
        let binding = key.binding(gesture);
        let code = key.code_for(gesture);
        let mut mask = binding.map_or(0, |b| b.mask) | self.modifiers;
        if self.shift.shifted {
            mask |= MODIFIER_SHIFT;
        }
        let nearby_codes = self
            .resolver
            .resolve(&keyboard, pos.0, pos.1)
            .nearby_codes(&keyboard);
        let event = KeyEvent {
            index,
            gesture,
            code,
            mask,
            text: binding.and_then(|b| b.text.clone()),
            nearby_codes,
            tap_count: self.multi_tap.count(),
        };
        debug!(index, ?gesture, code, tap_count = event.tap_count, "key dispatched");

        self.listener.on_event(&event);
        match &event.text {
            Some(text) => self.listener.on_text(text),
            None => self.listener.on_key(code, mask),
        }
        self.release_key(code);
        self.clear_shift();
    }

    /// Reports a release, or holds it back while several pointers are down.
    /// The first release outside a chord flushes everything held, in arrival
    /// order, after itself.
    pub(crate) fn release_key(&mut self, code: i32) {
        if self.combo_mode {
            self.combo.push(code);
        } else if self.combo.is_empty() {
            self.listener.on_release(code);
        } else {
            self.combo.push(code);
            self.flush_combo();
        }
    }

    pub(crate) fn flush_combo(&mut self) {
        for code in self.combo.take() {
            self.listener.on_release(code);
        }
    }

    fn toggle_shift(&mut self, sticky: bool) {
        let shifted = !self.shift.shifted;
        self.shift.shifted = shifted;
        self.shift.locked = shifted && sticky;
        self.shift_changed();
    }

    /// A dispatched key ends a one-shot shift; a locked shift stays.
    fn clear_shift(&mut self) {
        if self.shift.shifted && !self.shift.locked {
            self.shift.shifted = false;
            self.shift_changed();
        }
    }

    pub(crate) fn shift_changed(&mut self) {
        debug!(shift = ?self.shift, "shift state changed");
        self.listener.on_shift_changed(self.shift);
        let Some(keyboard) = self.keyboard.clone() else {
            return;
        };
        let pressed = self.preview.current;
        for (i, key) in keyboard.keys().iter().enumerate() {
            if key.shift || key.sticky {
                self.emit_key_state(i, pressed == Some(i));
            }
        }
    }

    /// The rest of the gesture sends nothing: timers stop and Up is ignored.
    pub(crate) fn abort_session(&mut self) {
        self.timers.cancel(TimerKind::RepeatKey);
        self.timers.cancel(TimerKind::LongPress);
        if let Some(session) = self.session.as_mut() {
            session.aborted = true;
        }
    }

    pub(crate) fn key_center(&self, index: Option<usize>) -> Option<(i32, i32)> {
        let keyboard = self.keyboard.as_ref()?;
        Some(keyboard.key(index?)?.center())
    }
}
