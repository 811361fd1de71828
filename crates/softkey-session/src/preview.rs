use softkey_core::geometry::GestureKind;
use softkey_core::timer::TimerKind;
use softkey_core::visual::KeyVisualState;

use crate::timers::TimerPayload;
use crate::types::PreviewUpdate;
use crate::{GestureListener, TouchDispatcher};

/// Highlighted key and whether the preview bubble is on screen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct PreviewState {
    pub current: Option<usize>,
    pub visible: bool,
}

impl<L: GestureListener> TouchDispatcher<L> {
    /// Moves the highlight to `key` (or clears it) and schedules the preview
    /// bubble accordingly. A non-tap `gesture` re-shows the bubble even when
    /// the key is unchanged.
    pub(crate) fn show_preview(&mut self, key: Option<usize>, gesture: GestureKind, now: u64) {
        let old = self.preview.current;
        self.preview.current = key;
        if old != key {
            if let Some(old) = old {
                self.emit_key_state(old, false);
            }
            if let Some(new) = key {
                self.emit_key_state(new, true);
            }
        }

        if !self.settings.preview.enabled || (old == key && gesture == GestureKind::Tap) {
            return;
        }
        self.timers.cancel(TimerKind::ShowPreview);
        match key {
            Some(index) => {
                self.timers.cancel(TimerKind::HidePreview);
                let delay = self.settings.timing.preview_show_delay_ms;
                if delay == 0 {
                    self.preview.visible = true;
                    self.listener.on_preview(PreviewUpdate::Show { index, gesture });
                } else {
                    self.timers.schedule(
                        TimerKind::ShowPreview,
                        now,
                        delay,
                        TimerPayload::Preview(index, gesture),
                    );
                }
            }
            None if self.preview.visible => {
                let delay = self.settings.timing.preview_hide_delay_ms;
                self.timers
                    .schedule(TimerKind::HidePreview, now, delay, TimerPayload::None);
            }
            None => {}
        }
    }

    /// Hides the bubble and the highlight right away.
    pub(crate) fn dismiss_preview(&mut self) {
        self.timers.cancel(TimerKind::ShowPreview);
        self.timers.cancel(TimerKind::HidePreview);
        if let Some(old) = self.preview.current.take() {
            self.emit_key_state(old, false);
        }
        if self.preview.visible {
            self.preview.visible = false;
            self.listener.on_preview(PreviewUpdate::Hide);
        }
    }

    pub(crate) fn emit_key_state(&mut self, index: usize, pressed: bool) {
        let Some(key) = self.keyboard.as_ref().and_then(|kb| kb.key(index)) else {
            return;
        };
        let state = KeyVisualState::for_key(key, pressed, self.shift.shifted);
        self.listener.on_key_state(index, state);
    }
}
