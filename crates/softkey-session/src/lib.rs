//! Touch dispatch state machine for a soft keyboard.
//!
//! `TouchDispatcher` consumes pointer events for one keyboard surface, drives
//! hit-testing, swipe tracking, timers and combo buffering from
//! `softkey-core`, and reports key actions to a [`GestureListener`].
//!
//! Everything runs on the caller's thread. Time comes from the events
//! themselves; between events the host calls [`TouchDispatcher::advance_to`]
//! at [`TouchDispatcher::next_deadline`] so pending timers can fire.

pub(crate) mod types;

mod dispatch;
mod fling;
mod listener;
mod pointer_handlers;
mod preview;
mod session;
mod timers;

#[cfg(test)]
mod tests;

use std::sync::Arc;

use tracing::{debug, warn};

use softkey_core::combo::ComboAccumulator;
use softkey_core::geometry::{GeometryError, KeyGeometryIndex, KeyGeometryProvider};
use softkey_core::hit::KeyHitResolver;
use softkey_core::settings::Settings;
use softkey_core::swipe::SwipeTracker;
use softkey_core::timer::{TimerKind, TimerScheduler};

pub use fling::{Fling, SwipeDirection, SwipeOutcome};
pub use listener::GestureListener;
pub use types::{
    DispatchState, KeyEvent, PointerAction, PointerEvent, PreviewUpdate, ShiftState,
    MODIFIER_SHIFT,
};

use fling::FlingDetector;
use preview::PreviewState;
use session::{MultiTap, TouchSession};
use timers::TimerPayload;

/// Turns pointer events on one keyboard into key actions for `L`.
pub struct TouchDispatcher<L> {
    listener: L,
    settings: Settings,
    resolver: KeyHitResolver,
    keyboard: Option<Arc<KeyGeometryIndex>>,

    session: Option<TouchSession>,
    swipe: SwipeTracker,
    fling: FlingDetector,
    timers: TimerScheduler<TimerPayload>,
    combo: ComboAccumulator,
    /// Set per event: more than one pointer involved in it.
    combo_mode: bool,
    /// Pointer count of the last non-move event.
    old_pointer_count: usize,
    multi_tap: MultiTap,
    shift: ShiftState,
    preview: PreviewState,
    /// Modifier mask of the event being processed.
    modifiers: u32,
    clock: u64,
    /// After Cancel, a final Up, a keyboard swap or close, everything but a
    /// fresh Down is ignored.
    awaiting_down: bool,
}

impl<L: GestureListener> TouchDispatcher<L> {
    pub fn new(listener: L, settings: Settings) -> Self {
        Self {
            listener,
            resolver: KeyHitResolver::from_settings(&settings),
            settings,
            keyboard: None,
            session: None,
            swipe: SwipeTracker::new(),
            fling: FlingDetector::default(),
            timers: TimerScheduler::new(),
            combo: ComboAccumulator::new(),
            combo_mode: false,
            old_pointer_count: 0,
            multi_tap: MultiTap::default(),
            shift: ShiftState::default(),
            preview: PreviewState::default(),
            modifiers: 0,
            clock: 0,
            awaiting_down: true,
        }
    }

    /// Builds the geometry index for `provider` and makes it the active
    /// keyboard. Any in-flight session is abandoned. On invalid geometry the
    /// dispatcher is left without a keyboard and ignores events until a valid
    /// one is attached.
    pub fn attach_keyboard<P: KeyGeometryProvider + ?Sized>(
        &mut self,
        provider: &P,
    ) -> Result<(), GeometryError> {
        match KeyGeometryIndex::from_provider(provider) {
            Ok(index) => {
                self.attach_index(Arc::new(index));
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "rejected keyboard geometry");
                self.abandon();
                self.keyboard = None;
                Err(e)
            }
        }
    }

    /// Attaches an already built index, e.g. one shared between surfaces.
    pub fn attach_index(&mut self, index: Arc<KeyGeometryIndex>) {
        self.abandon();
        debug!(keys = index.len(), "keyboard attached");
        self.keyboard = Some(index);
    }

    /// Replaces the settings and drops all transient state. The keyboard
    /// and shift state are kept.
    pub fn reset(&mut self, settings: Settings) {
        self.abandon();
        self.resolver = KeyHitResolver::from_settings(&settings);
        self.settings = settings;
        self.multi_tap.reset();
        debug!("dispatcher reset");
    }

    /// Tears down: cancels every timer and hides the preview.
    pub fn close(&mut self) {
        self.timers.cancel_all();
        self.dismiss_preview();
        self.session = None;
        self.combo.clear();
        self.combo_mode = false;
        self.old_pointer_count = 0;
        self.awaiting_down = true;
    }

    pub fn state(&self) -> DispatchState {
        match &self.session {
            None => DispatchState::Idle,
            Some(_) if self.combo_mode || self.old_pointer_count > 1 => DispatchState::TrackingCombo,
            Some(s) if s.repeat_key.is_some() && self.timers.is_pending(TimerKind::RepeatKey) => {
                DispatchState::Repeating
            }
            Some(_) if self.timers.is_pending(TimerKind::LongPress) => {
                DispatchState::LongPressPending
            }
            Some(_) => DispatchState::TrackingSingle,
        }
    }

    /// Earliest pending timer deadline; the host should call `advance_to`
    /// with it if no event arrives first.
    pub fn next_deadline(&self) -> Option<u64> {
        self.timers.next_deadline()
    }

    pub fn shift_state(&self) -> ShiftState {
        self.shift
    }

    pub fn is_shifted(&self) -> bool {
        self.shift.shifted
    }

    pub fn keyboard(&self) -> Option<&Arc<KeyGeometryIndex>> {
        self.keyboard.as_ref()
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Releases held back for a chord, in arrival order.
    pub fn pending_combo(&self) -> usize {
        self.combo.len()
    }

    pub fn listener(&self) -> &L {
        &self.listener
    }

    pub fn listener_mut(&mut self) -> &mut L {
        &mut self.listener
    }

    pub fn into_listener(self) -> L {
        self.listener
    }

    /// Drops session, timers and buffers. Only the preview teardown is
    /// reported, against the keyboard still attached.
    fn abandon(&mut self) {
        self.dismiss_preview();
        self.timers.cancel_all();
        self.session = None;
        self.swipe.clear();
        self.fling.reset();
        self.combo.clear();
        self.combo_mode = false;
        self.old_pointer_count = 0;
        self.preview = PreviewState::default();
        self.awaiting_down = true;
    }
}
