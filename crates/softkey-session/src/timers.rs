use tracing::{debug, warn};

use softkey_core::geometry::GestureKind;
use softkey_core::timer::{FiredTimer, TimerKind};

use crate::types::PreviewUpdate;
use crate::{GestureListener, TouchDispatcher};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TimerPayload {
    /// Key the timer was armed for.
    Key(usize),
    Preview(usize, GestureKind),
    None,
}

impl<L: GestureListener> TouchDispatcher<L> {
    /// Fires every timer due at `now`, in deadline order. Time never moves
    /// backwards; an earlier `now` only fires what is already overdue.
    pub fn advance_to(&mut self, now: u64) {
        self.clock = self.clock.max(now);
        while let Some(fired) = self.timers.pop_due(self.clock) {
            self.fire(fired);
        }
    }

    fn fire(&mut self, fired: FiredTimer<TimerPayload>) {
        debug!(kind = ?fired.kind, deadline = fired.deadline, "timer fired");
        match (fired.kind, fired.payload) {
            (TimerKind::ShowPreview, TimerPayload::Preview(index, gesture)) => {
                self.preview.visible = true;
                self.listener.on_preview(PreviewUpdate::Show { index, gesture });
            }
            (TimerKind::HidePreview, _) => {
                if self.preview.visible {
                    self.preview.visible = false;
                    self.listener.on_preview(PreviewUpdate::Hide);
                }
            }
            (TimerKind::RepeatKey, TimerPayload::Key(index)) => {
                self.fire_repeat(index, fired.deadline)
            }
            (TimerKind::LongPress, TimerPayload::Key(index)) => {
                self.fire_long_press(index, fired.deadline)
            }
            (kind, payload) => warn!(?kind, ?payload, "timer fired with unexpected payload"),
        }
    }

    fn fire_repeat(&mut self, index: usize, at: u64) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        if session.aborted || session.repeat_key != Some(index) {
            return;
        }
        session.repeat_fired = true;
        let (current, last) = (session.current_key, session.last);
        let pos = self.key_center(current).unwrap_or(last);

        self.detect_and_send(current, pos, at, GestureKind::Tap);

        // the dispatch may have aborted the session
        let still_repeating = self
            .session
            .as_ref()
            .is_some_and(|s| !s.aborted && s.repeat_key == Some(index));
        if still_repeating {
            let interval = self.settings.timing.repeat_interval_ms.max(1);
            self.timers
                .schedule(TimerKind::RepeatKey, at, interval, TimerPayload::Key(index));
        }
    }

    /// Long-press on a popup key requests the popup; on a key bound for
    /// long-press it sends that binding; on an unbound shift key it toggles
    /// caps lock. In each case the session is aborted so the lift sends
    /// nothing. Other keys are left alone.
    fn fire_long_press(&mut self, index: usize, at: u64) {
        let Some(session) = self.session.as_ref() else {
            return;
        };
        if session.aborted || session.current_key != Some(index) {
            debug!(index, "stale long press ignored");
            return;
        }
        let pos = session.last;
        let Some((popup, bound, shift)) = self
            .keyboard
            .as_ref()
            .and_then(|kb| kb.key(index))
            .map(|k| (k.popup, k.has_binding(GestureKind::LongPress), k.shift))
        else {
            return;
        };
        if !popup && !bound && !shift {
            return;
        }

        self.show_preview(None, GestureKind::Tap, at);
        self.show_preview(Some(index), GestureKind::LongPress, at);
        if popup {
            self.listener.on_popup(index);
        } else if bound {
            self.detect_and_send(Some(index), pos, at, GestureKind::LongPress);
        } else {
            let lock = !self.shift.locked;
            self.shift.shifted = lock;
            self.shift.locked = lock;
            self.shift_changed();
        }
        self.abort_session();
        self.show_preview(None, GestureKind::Tap, at);
    }
}
