/// State of one logical single-finger gesture, from Down to Up or Cancel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct TouchSession {
    pub down_time: u64,
    pub start: (i32, i32),
    /// Position of the previous event.
    pub last: (i32, i32),
    pub down_key: Option<usize>,
    pub current_key: Option<usize>,
    /// Dwell time on `current_key` since it became current.
    pub current_key_time: u64,
    pub last_key: Option<usize>,
    pub last_key_time: u64,
    /// Position at which `last_key` was left, restored by debounce.
    pub last_key_pos: (i32, i32),
    pub last_move_time: u64,
    pub repeat_key: Option<usize>,
    pub repeat_fired: bool,
    pub aborted: bool,
}

impl TouchSession {
    pub fn start(time: u64, x: i32, y: i32, key: Option<usize>) -> Self {
        Self {
            down_time: time,
            start: (x, y),
            last: (x, y),
            down_key: key,
            current_key: key,
            current_key_time: 0,
            last_key: None,
            last_key_time: 0,
            last_key_pos: (x, y),
            last_move_time: time,
            repeat_key: None,
            repeat_fired: false,
            aborted: false,
        }
    }

    /// Makes `key` current, remembering the one being left.
    pub fn switch_key(&mut self, key: Option<usize>, time: u64) {
        self.last_key = self.current_key;
        self.last_key_pos = self.last;
        self.last_key_time = self.current_key_time + time.saturating_sub(self.last_move_time);
        self.current_key = key;
        self.current_key_time = 0;
    }

    pub fn dwell(&mut self, time: u64) {
        self.current_key_time += time.saturating_sub(self.last_move_time);
    }

    /// The final key lingered too briefly after a longer stay on the
    /// previous one: the finger grazed a neighbor while lifting.
    pub fn should_debounce(&self, debounce_ms: u64) -> bool {
        self.last_key.is_some()
            && self.current_key_time < self.last_key_time
            && self.current_key_time < debounce_ms
    }
}

/// Last tapped key and when, persisting across sessions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct MultiTap {
    last_index: Option<usize>,
    last_time: Option<u64>,
    count: u32,
}

impl MultiTap {
    /// Resets when the idle gap exceeds `interval` or the key differs.
    pub fn check(&mut self, time: u64, key: Option<usize>, interval: u64) {
        let Some(key) = key else {
            return;
        };
        let expired = self
            .last_time
            .map_or(true, |t| time > t.saturating_add(interval));
        if expired || self.last_index != Some(key) {
            self.reset();
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn record(&mut self, index: usize, time: u64) {
        if self.last_index == Some(index) {
            self.count += 1;
        } else {
            self.count = 1;
        }
        self.last_index = Some(index);
        self.last_time = Some(time);
    }

    pub fn count(&self) -> u32 {
        self.count
    }
}
