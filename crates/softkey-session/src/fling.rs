//! Fling detection and swipe classification.

use softkey_core::geometry::GestureKind;
use softkey_core::settings::SwipeSettings;
use softkey_core::swipe::Velocity;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SwipeDirection {
    Left,
    Right,
    Up,
    Down,
}

impl SwipeDirection {
    pub fn gesture(self) -> GestureKind {
        match self {
            SwipeDirection::Left => GestureKind::SwipeLeft,
            SwipeDirection::Right => GestureKind::SwipeRight,
            SwipeDirection::Up => GestureKind::SwipeUp,
            SwipeDirection::Down => GestureKind::SwipeDown,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwipeOutcome {
    /// Bare directional gesture, not tied to a key.
    Swipe(SwipeDirection),
    /// The key pressed at Down, tagged with the swipe direction.
    KeyedSwipe(SwipeDirection),
}

/// A completed fling: where it started and ended, and its peak velocity in px/s.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fling {
    pub start: (i32, i32),
    pub end: (i32, i32),
    pub velocity: Velocity,
}

/// Tracks the peak per-axis velocity between successive samples of one gesture.
#[derive(Debug, Clone, Default)]
pub(crate) struct FlingDetector {
    start: Option<(i32, i32)>,
    last: (i32, i32, u64),
    peak: Velocity,
}

impl FlingDetector {
    pub fn start(&mut self, x: i32, y: i32, time: u64) {
        self.start = Some((x, y));
        self.last = (x, y, time);
        self.peak = Velocity::ZERO;
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn track(&mut self, x: i32, y: i32, time: u64, max_velocity: f32) {
        if self.start.is_none() {
            return;
        }
        let (lx, ly, lt) = self.last;
        self.last = (x, y, time);
        let dt = time.saturating_sub(lt);
        if dt == 0 {
            return;
        }
        let dt = dt as f32;
        let dx = (i64::from(x) - i64::from(lx)) as f32;
        let dy = (i64::from(y) - i64::from(ly)) as f32;
        let vx = (dx / dt * 1000.0).clamp(-max_velocity, max_velocity);
        let vy = (dy / dt * 1000.0).clamp(-max_velocity, max_velocity);
        if vx.abs() > self.peak.x.abs() {
            self.peak.x = vx;
        }
        if vy.abs() > self.peak.y.abs() {
            self.peak.y = vy;
        }
    }

    /// Ends the gesture. Returns a fling when either peak axis velocity
    /// reached `min_velocity`.
    pub fn finish(&mut self, x: i32, y: i32, time: u64, settings: &SwipeSettings) -> Option<Fling> {
        self.track(x, y, time, settings.max_velocity);
        let start = self.start.take()?;
        let peak = self.peak;
        if peak.x.abs() < settings.min_fling_velocity && peak.y.abs() < settings.min_fling_velocity {
            return None;
        }
        Some(Fling {
            start,
            end: (x, y),
            velocity: peak,
        })
    }
}

/// Classifies a fling against the swipe settings. `ending` is the smoothed
/// velocity at lift, in the same units as the fling.
///
/// Directions are tried right, left, up, down. A direction matches when its
/// peak velocity exceeds the threshold, the cross axis is slower, and the net
/// travel exceeds `min_travel`.
pub fn classify(fling: &Fling, ending: Velocity, settings: &SwipeSettings) -> Option<SwipeOutcome> {
    let Velocity { x: vx, y: vy } = fling.velocity;
    let (ax, ay) = (vx.abs(), vy.abs());
    let dx = (i64::from(fling.end.0) - i64::from(fling.start.0)) as f32;
    let dy = (i64::from(fling.end.1) - i64::from(fling.start.1)) as f32;
    let threshold = settings.threshold;
    let travel = settings.min_travel;

    let direction = if vx > threshold && ay < ax && dx > travel {
        SwipeDirection::Right
    } else if vx < -threshold && ay < ax && dx < -travel {
        SwipeDirection::Left
    } else if vy < -threshold && ax < ay && dy < -travel {
        SwipeDirection::Up
    } else if vy > threshold && ax < ay && dy > travel {
        SwipeDirection::Down
    } else {
        return None;
    };

    if !settings.disambiguate {
        return Some(SwipeOutcome::Swipe(direction));
    }
    let (peak, end) = match direction {
        SwipeDirection::Left | SwipeDirection::Right => (vx, ending.x),
        SwipeDirection::Up | SwipeDirection::Down => (vy, ending.y),
    };
    // decelerated to under a quarter of the peak along the swipe
    if end * peak.signum() < peak.abs() / 4.0 {
        Some(SwipeOutcome::Swipe(direction))
    } else {
        Some(SwipeOutcome::KeyedSwipe(direction))
    }
}
