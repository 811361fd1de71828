use softkey_core::geometry::{GestureKind, Key, KeyBinding};
use softkey_core::settings::Settings;

use super::*;
use crate::DispatchState;

const BACKSPACE: i32 = 8;

fn keys_with_long_press() -> Vec<Key> {
    let mut keys = row_keys();
    keys[0] = keys[0]
        .clone()
        .with_binding(KeyBinding::new(GestureKind::LongPress, 'A' as i32));
    keys[1] = keys[1].clone().with_popup();
    keys[9] = Key::new(900, 0, 100, 100, BACKSPACE).as_repeatable();
    keys
}

fn dispatcher_lp() -> TouchDispatcher<Recorder> {
    dispatcher_with(keys_with_long_press(), Settings::default())
}

// --- Long press ---

#[test]
fn long_press_binding_fires_and_suppresses_tap() {
    let mut d = dispatcher_lp();
    down(&mut d, center(0), 0);
    assert_eq!(d.state(), DispatchState::LongPressPending);
    assert_eq!(d.next_deadline(), Some(500));

    d.advance_to(499);
    assert_eq!(d.listener().input(), vec![Callback::Press(A)]);

    d.advance_to(500);
    let events = d.listener().events();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].gesture, GestureKind::LongPress);
    assert_eq!(events[0].code, 'A' as i32);

    up(&mut d, center(0), 700);
    assert_eq!(d.listener().keys(), vec!['A' as i32]);
    assert_eq!(d.listener().releases(), vec!['A' as i32]);
    assert_eq!(d.state(), DispatchState::Idle);
}

#[test]
fn long_press_preview_shows_long_press_gesture() {
    let mut d = dispatcher_lp();
    down(&mut d, center(0), 0);
    d.advance_to(500);
    assert!(d.listener().previews().contains(&PreviewUpdate::Show {
        index: 0,
        gesture: GestureKind::LongPress
    }));
}

#[test]
fn long_press_on_popup_key_requests_popup() {
    let mut d = dispatcher_lp();
    down(&mut d, center(1), 0);
    d.advance_to(600);
    assert!(d.listener().calls.contains(&Callback::Popup(1)));
    up(&mut d, center(1), 800);
    assert_eq!(d.listener().input(), vec![Callback::Press(A + 1)]);
}

#[test]
fn long_press_without_binding_keeps_tap() {
    let mut d = dispatcher_lp();
    down(&mut d, center(2), 0);
    d.advance_to(600);
    assert_eq!(d.state(), DispatchState::TrackingSingle);
    up(&mut d, center(2), 700);
    assert_eq!(d.listener().keys(), vec![A + 2]);
}

#[test]
fn long_press_never_fires_for_key_left_before_timeout() {
    let mut d = dispatcher_lp();
    down(&mut d, center(0), 0);
    // slow drag from 'a' onto 'c'
    moved(&mut d, (100, 50), 200);
    moved(&mut d, (250, 50), 400);
    d.advance_to(2000);
    assert!(d
        .listener()
        .events()
        .iter()
        .all(|e| e.gesture != GestureKind::LongPress));
    assert!(!d.listener().calls.contains(&Callback::Popup(1)));
}

#[test]
fn long_press_rearms_for_new_key() {
    let mut keys = keys_with_long_press();
    keys[2] = keys[2]
        .clone()
        .with_binding(KeyBinding::new(GestureKind::LongPress, 'C' as i32));
    let mut d = dispatcher_with(keys, Settings::default());
    down(&mut d, center(0), 0);
    moved(&mut d, (120, 50), 300);
    moved(&mut d, (250, 50), 450);
    assert_eq!(d.next_deadline(), Some(950));
    d.advance_to(949);
    assert!(d.listener().events().is_empty());
    d.advance_to(950);
    let events = d.listener().events();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].index, 2);
    assert_eq!(events[0].code, 'C' as i32);
}

#[test]
fn moving_off_every_key_cancels_long_press() {
    let mut d = dispatcher_lp();
    down(&mut d, center(0), 0);
    // below the keyboard
    moved(&mut d, (50, 180), 300);
    assert_eq!(d.state(), DispatchState::TrackingSingle);
    d.advance_to(2000);
    assert!(d.listener().events().is_empty());
}

fn keys_with_shift_row() -> Vec<Key> {
    let mut keys = keys_with_long_press();
    keys.push(Key::new(0, 100, 100, 100, -1).as_shift(false));
    keys
}

#[test]
fn long_press_on_shift_locks_caps_without_a_tap() {
    let mut d = dispatcher_with(keys_with_shift_row(), Settings::default());
    down(&mut d, (50, 150), 0);
    d.advance_to(600);
    assert_eq!(
        d.shift_state(),
        ShiftState {
            shifted: true,
            locked: true
        }
    );
    up(&mut d, (50, 150), 700);
    assert_eq!(
        d.shift_state(),
        ShiftState {
            shifted: true,
            locked: true
        },
        "the lift must not toggle shift again"
    );
    assert!(d.listener().keys().is_empty());

    // locked caps survive typing
    tap(&mut d, center(2), 1000);
    assert_eq!(d.listener().keys(), vec![A + 2]);
    assert!(d.is_shifted());
}

#[test]
fn long_press_on_locked_shift_unlocks() {
    let mut d = dispatcher_with(keys_with_shift_row(), Settings::default());
    down(&mut d, (50, 150), 0);
    d.advance_to(600);
    up(&mut d, (50, 150), 700);

    down(&mut d, (50, 150), 1000);
    d.advance_to(1600);
    up(&mut d, (50, 150), 1700);
    assert_eq!(d.shift_state(), ShiftState::default());
}

// --- Repeat ---

#[test]
fn repeat_fires_after_start_delay_then_every_interval() {
    let mut d = dispatcher_lp();
    down(&mut d, center(9), 0);
    assert_eq!(d.state(), DispatchState::Repeating);
    d.advance_to(399);
    assert!(d.listener().keys().is_empty());
    d.advance_to(400);
    assert_eq!(d.listener().keys(), vec![BACKSPACE]);
    d.advance_to(500);
    assert_eq!(d.listener().keys(), vec![BACKSPACE; 3]);

    up(&mut d, center(9), 520);
    assert_eq!(d.listener().keys(), vec![BACKSPACE; 3]);
    assert_eq!(d.listener().releases(), vec![BACKSPACE; 3]);
    d.advance_to(5000);
    assert_eq!(d.listener().keys().len(), 3);
}

#[test]
fn repeat_key_released_early_sends_one_tap() {
    let mut d = dispatcher_lp();
    tap(&mut d, center(9), 0);
    d.advance_to(5000);
    assert_eq!(d.listener().keys(), vec![BACKSPACE]);
}

#[test]
fn repeat_interval_is_configurable() {
    let mut settings = Settings::default();
    settings.timing.repeat_start_delay_ms = 100;
    settings.timing.repeat_interval_ms = 10;
    let mut d = dispatcher_with(keys_with_long_press(), settings);
    down(&mut d, center(9), 0);
    d.advance_to(150);
    assert_eq!(d.listener().keys().len(), 6);
}

#[test]
fn repeat_ignores_unbound_swipe_and_aborts() {
    let mut d = dispatcher_lp();
    // keyed swipe left starting on the repeatable key
    down(&mut d, center(9), 0);
    moved(&mut d, (850, 50), 20);
    moved(&mut d, (750, 50), 40);
    up(&mut d, (650, 50), 60);
    d.advance_to(5000);
    assert!(d.listener().keys().is_empty());
    assert!(d.listener().events().is_empty());
}

#[test]
fn repeat_sends_bound_swipe() {
    let mut keys = keys_with_long_press();
    keys[9] = keys[9]
        .clone()
        .with_binding(KeyBinding::new(GestureKind::SwipeLeft, 127));
    let mut d = dispatcher_with(keys, Settings::default());
    down(&mut d, center(9), 0);
    moved(&mut d, (850, 50), 20);
    moved(&mut d, (750, 50), 40);
    up(&mut d, (650, 50), 60);
    d.advance_to(5000);
    assert_eq!(d.listener().keys(), vec![127]);
}

#[test]
fn time_only_moves_forward() {
    let mut d = dispatcher_lp();
    down(&mut d, center(0), 0);
    d.advance_to(300);
    d.advance_to(100);
    // the event time is behind the clock; the overdue timer still fires
    d.advance_to(500);
    assert_eq!(d.listener().events().len(), 1);
}
