use tracing::{debug, debug_span};

use softkey_core::geometry::GestureKind;
use softkey_core::timer::TimerKind;

use crate::fling::{classify, SwipeDirection, SwipeOutcome};
use crate::session::TouchSession;
use crate::timers::TimerPayload;
use crate::types::{PointerAction, PointerEvent};
use crate::{GestureListener, TouchDispatcher};

impl<L: GestureListener> TouchDispatcher<L> {
    /// Processes one pointer event. Due timers fire first, at the event's time.
    ///
    /// Multi-pointer events are folded into the single-pointer flow: a
    /// secondary Down becomes a fresh Down at its location, and a lift while
    /// other pointers are (or were) down restarts the session at the lifting
    /// pointer before the normal Up, so its release goes through the combo
    /// buffer.
    pub fn handle_event(&mut self, event: &PointerEvent) {
        let _span = debug_span!(
            "handle_event",
            action = ?event.action,
            pointer = event.pointer_index,
            x = event.x,
            y = event.y,
            time = event.time
        )
        .entered();

        self.advance_to(event.time);
        self.modifiers = event.modifiers;

        let action = event.action;
        if self.keyboard.is_none() {
            debug!("no keyboard attached, event ignored");
            return;
        }
        if self.awaiting_down && action != PointerAction::Down {
            if action != PointerAction::Move {
                self.old_pointer_count = event.pointer_count;
            }
            return;
        }

        self.combo_mode = false;
        match action {
            PointerAction::Down | PointerAction::Cancel => self.combo.clear(),
            PointerAction::PointerDown | PointerAction::PointerUp => self.combo_mode = true,
            _ if event.pointer_count > 1 => self.combo_mode = true,
            _ => {}
        }

        if action == PointerAction::PointerUp
            || (self.old_pointer_count > 1 && action == PointerAction::Up)
        {
            self.on_down(event.x, event.y, event.time, false);
        }

        match action {
            PointerAction::Down | PointerAction::PointerDown => {
                self.on_down(event.x, event.y, event.time, true)
            }
            PointerAction::Move => self.on_move(event.x, event.y, event.time),
            PointerAction::Up | PointerAction::PointerUp => {
                self.on_up(event.x, event.y, event.time, event.pointer_count)
            }
            PointerAction::Cancel => self.on_cancel(event.time),
        }

        if action != PointerAction::Move {
            self.old_pointer_count = event.pointer_count;
        }
        // zero-delay timers armed by this event
        self.advance_to(event.time);
    }

    /// Starts a fresh session. `press` is false for the restart that
    /// precedes a lift in a chord: no press, no timers, no preview.
    fn on_down(&mut self, x: i32, y: i32, time: u64, press: bool) {
        let key = self.hit(x, y);
        self.timers.cancel(TimerKind::RepeatKey);
        self.timers.cancel(TimerKind::LongPress);
        self.session = Some(TouchSession::start(time, x, y, key));
        self.awaiting_down = false;
        self.swipe.clear();
        self.swipe.add_sample(x as f32, y as f32, time);
        self.fling.start(x, y, time);
        if !press {
            return;
        }

        self.multi_tap
            .check(time, key, self.settings.timing.multi_tap_interval_ms);
        let code = self.key_code(key);
        debug!(?key, code, "press");
        self.listener.on_press(code);

        if let Some(index) = key {
            if self.is_repeatable(index) {
                if let Some(session) = self.session.as_mut() {
                    session.repeat_key = Some(index);
                }
                self.timers.schedule(
                    TimerKind::RepeatKey,
                    time,
                    self.settings.timing.repeat_start_delay_ms,
                    TimerPayload::Key(index),
                );
            }
            self.timers.schedule(
                TimerKind::LongPress,
                time,
                self.settings.timing.long_press_timeout_ms,
                TimerPayload::Key(index),
            );
        }
        self.show_preview(key, GestureKind::Tap, time);
    }

    fn on_move(&mut self, x: i32, y: i32, time: u64) {
        self.swipe.add_sample(x as f32, y as f32, time);
        self.fling
            .track(x, y, time, self.settings.swipe.max_velocity);

        let key = self.hit(x, y);
        let Some(session) = self.session.as_mut() else {
            debug!("move without a session");
            return;
        };
        if session.aborted {
            return;
        }

        let mut same_key = false;
        if let Some(index) = key {
            match session.current_key {
                None => {
                    session.current_key = Some(index);
                    session.current_key_time = time.saturating_sub(session.down_time);
                }
                Some(current) if current == index => {
                    session.dwell(time);
                    same_key = true;
                }
                Some(_) if session.repeat_key.is_none() => {
                    session.switch_key(Some(index), time);
                    self.multi_tap.reset();
                }
                Some(_) => {}
            }
        }
        session.last_move_time = time;
        session.last = (x, y);
        let current = session.current_key;

        if !self.combo_mode && !same_key {
            self.timers.cancel(TimerKind::LongPress);
            if let Some(index) = key {
                self.timers.schedule(
                    TimerKind::LongPress,
                    time,
                    self.settings.timing.long_press_timeout_ms,
                    TimerPayload::Key(index),
                );
            }
        }
        self.show_preview(current, GestureKind::Tap, time);
    }

    fn on_up(&mut self, x: i32, y: i32, time: u64, pointer_count: usize) {
        self.swipe.add_sample(x as f32, y as f32, time);
        let fling = self.fling.finish(x, y, time, &self.settings.swipe);

        let Some(mut session) = self.session.take() else {
            debug!("up without a session");
            return;
        };
        self.awaiting_down = pointer_count <= 1;
        self.timers.cancel(TimerKind::RepeatKey);
        self.timers.cancel(TimerKind::LongPress);
        self.timers.cancel(TimerKind::ShowPreview);

        if session.aborted {
            self.show_preview(None, GestureKind::Tap, time);
            self.finish_chord();
            return;
        }

        let chord = self.combo_mode || self.old_pointer_count > 1;
        if !chord {
            let ending = self
                .swipe
                .velocity(1000.0, self.settings.swipe.max_velocity);
            let outcome = fling.and_then(|f| classify(&f, ending, &self.settings.swipe));
            if let Some(outcome) = outcome {
                self.on_swipe(outcome, &session, time);
                self.finish_chord();
                return;
            }
        }

        let key = self.hit(x, y);
        if key == session.current_key {
            session.dwell(time);
        } else {
            self.multi_tap.reset();
            session.switch_key(key, time);
        }
        let mut pos = (x, y);
        if session.should_debounce(self.settings.timing.debounce_ms) {
            debug!(from = ?session.current_key, to = ?session.last_key, "debounced");
            session.current_key = session.last_key;
            pos = session.last_key_pos;
        }

        self.show_preview(None, GestureKind::Tap, time);
        // a repeat that already fired has sent this key
        if !session.repeat_fired {
            let gesture = if chord {
                GestureKind::Combo
            } else {
                GestureKind::Tap
            };
            self.detect_and_send(session.current_key, pos, time, gesture);
        }
        self.finish_chord();
    }

    fn on_cancel(&mut self, time: u64) {
        self.timers.cancel_all();
        if let Some(session) = self.session.as_mut() {
            session.aborted = true;
        }
        self.show_preview(None, GestureKind::Tap, time);
        self.combo.clear();
        self.session = None;
        self.awaiting_down = true;
        debug!("session canceled");
    }

    /// Exactly one outcome per fling: a bare swipe, or the key pressed at
    /// Down tagged with the direction. Without a down key it is a bare swipe.
    fn on_swipe(&mut self, outcome: SwipeOutcome, session: &TouchSession, time: u64) {
        self.show_preview(None, GestureKind::Tap, time);
        match (outcome, session.down_key) {
            (SwipeOutcome::KeyedSwipe(direction), Some(down_key)) => {
                let gesture = direction.gesture();
                debug!(down_key, ?gesture, "keyed swipe");
                self.show_preview(Some(down_key), gesture, time);
                self.detect_and_send(Some(down_key), session.start, time, gesture);
                self.show_preview(None, GestureKind::Tap, time);
            }
            (SwipeOutcome::Swipe(direction) | SwipeOutcome::KeyedSwipe(direction), _) => {
                debug!(?direction, "swipe");
                match direction {
                    SwipeDirection::Left => self.listener.swipe_left(),
                    SwipeDirection::Right => self.listener.swipe_right(),
                    SwipeDirection::Up => self.listener.swipe_up(),
                    SwipeDirection::Down => self.listener.swipe_down(),
                }
            }
        }
    }

    /// Once no chord is in progress, anything still held back is released.
    fn finish_chord(&mut self) {
        if !self.combo_mode && !self.combo.is_empty() {
            self.flush_combo();
        }
    }

    fn hit(&self, x: i32, y: i32) -> Option<usize> {
        let keyboard = self.keyboard.as_ref()?;
        self.resolver.key_at(keyboard, x, y)
    }

    fn key_code(&self, key: Option<usize>) -> i32 {
        key.and_then(|i| self.keyboard.as_ref()?.key(i))
            .map_or(0, |k| k.code)
    }

    fn is_repeatable(&self, index: usize) -> bool {
        self.keyboard
            .as_ref()
            .and_then(|kb| kb.key(index))
            .is_some_and(|k| k.repeatable)
    }
}
