use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use softkey_core::geometry::{Key, KeyboardLayout};
use softkey_core::settings::{parse_settings_toml, settings, Settings};
use softkey_session::TouchDispatcher;

use super::types::EventCollector;
use super::{SkError, SkEvent, SkKey, SkPointerEvent, SkShiftState};

/// One keyboard surface. Every call returns the listener callbacks it caused.
#[derive(uniffi::Object)]
pub struct SkEngine {
    dispatcher: Mutex<TouchDispatcher<EventCollector>>,
}

fn resolve_settings(settings_toml: Option<String>) -> Result<Settings, SkError> {
    match settings_toml {
        Some(content) => {
            parse_settings_toml(&content).map_err(|e| SkError::InvalidData { msg: e.to_string() })
        }
        None => Ok(settings().clone()),
    }
}

#[uniffi::export]
impl SkEngine {
    /// `settings_toml` overrides the process default settings.
    #[uniffi::constructor]
    fn new(settings_toml: Option<String>) -> Result<Arc<Self>, SkError> {
        let settings = resolve_settings(settings_toml)?;
        Ok(Arc::new(Self {
            dispatcher: Mutex::new(TouchDispatcher::new(EventCollector::default(), settings)),
        }))
    }

    fn attach_keyboard(&self, keys: Vec<SkKey>) -> Result<(), SkError> {
        let keys: Vec<Key> = keys.into_iter().map(Key::from).collect();
        self.lock()
            .attach_keyboard(&keys)
            .map_err(|e| SkError::InvalidGeometry { msg: e.to_string() })
    }

    fn attach_keyboard_toml(&self, toml: String) -> Result<(), SkError> {
        let layout = KeyboardLayout::from_toml(&toml)
            .map_err(|e| SkError::InvalidData { msg: e.to_string() })?;
        self.lock()
            .attach_keyboard(&layout)
            .map_err(|e| SkError::InvalidGeometry { msg: e.to_string() })
    }

    fn handle_pointer(&self, event: SkPointerEvent) -> Vec<SkEvent> {
        let mut dispatcher = self.lock();
        dispatcher.handle_event(&event.into());
        dispatcher.listener_mut().take()
    }

    /// Fires timers due at `now_ms`. Hosts call this at `next_deadline`.
    fn advance(&self, now_ms: u64) -> Vec<SkEvent> {
        let mut dispatcher = self.lock();
        dispatcher.advance_to(now_ms);
        dispatcher.listener_mut().take()
    }

    fn next_deadline(&self) -> Option<u64> {
        self.lock().next_deadline()
    }

    fn reset(&self, settings_toml: Option<String>) -> Result<Vec<SkEvent>, SkError> {
        let settings = resolve_settings(settings_toml)?;
        let mut dispatcher = self.lock();
        dispatcher.reset(settings);
        Ok(dispatcher.listener_mut().take())
    }

    fn close(&self) -> Vec<SkEvent> {
        let mut dispatcher = self.lock();
        dispatcher.close();
        dispatcher.listener_mut().take()
    }

    fn shift_state(&self) -> SkShiftState {
        self.lock().shift_state().into()
    }

    fn is_shifted(&self) -> bool {
        self.lock().is_shifted()
    }
}

impl SkEngine {
    fn lock(&self) -> MutexGuard<'_, TouchDispatcher<EventCollector>> {
        // the dispatcher never panics midway through an event
        self.dispatcher.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
