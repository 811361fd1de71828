//! Rolling window of pointer samples used to estimate the ending velocity of a
//! gesture.

use std::collections::VecDeque;

/// Samples kept at most.
pub const MAX_SAMPLES: usize = 4;
/// Samples older than this, relative to the newest, are dropped on insert.
pub const SAMPLE_HORIZON_MS: u64 = 200;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SwipeSample {
    pub x: f32,
    pub y: f32,
    pub time: u64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Velocity {
    pub x: f32,
    pub y: f32,
}

impl Velocity {
    pub const ZERO: Velocity = Velocity { x: 0.0, y: 0.0 };

    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Default)]
pub struct SwipeTracker {
    samples: VecDeque<SwipeSample>,
}

impl SwipeTracker {
    pub fn new() -> Self {
        Self {
            samples: VecDeque::with_capacity(MAX_SAMPLES),
        }
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn samples(&self) -> impl Iterator<Item = &SwipeSample> {
        self.samples.iter()
    }

    pub fn add_sample(&mut self, x: f32, y: f32, time: u64) {
        let horizon = time.saturating_sub(SAMPLE_HORIZON_MS);
        while self.samples.front().is_some_and(|s| s.time < horizon) {
            self.samples.pop_front();
        }
        if self.samples.len() == MAX_SAMPLES {
            self.samples.pop_front();
        }
        self.samples.push_back(SwipeSample { x, y, time });
    }

    /// Blended velocity in pixels per `units` milliseconds (1000 gives px/s),
    /// each axis clamped to `±max`.
    ///
    /// Every retained sample is compared with the oldest one; successive
    /// estimates are averaged 50/50. Samples sharing the oldest timestamp are
    /// skipped.
    pub fn velocity(&self, units: f32, max: f32) -> Velocity {
        let Some(oldest) = self.samples.front() else {
            return Velocity::ZERO;
        };
        let mut accum: Option<(f32, f32)> = None;
        for sample in self.samples.iter().skip(1) {
            let dur = sample.time.saturating_sub(oldest.time);
            if dur == 0 {
                continue;
            }
            let dur = dur as f32;
            let vx = (sample.x - oldest.x) / dur * units;
            let vy = (sample.y - oldest.y) / dur * units;
            // Both axes seed from the same first estimate.
            accum = Some(match accum {
                None => (vx, vy),
                Some((ax, ay)) => ((ax + vx) * 0.5, (ay + vy) * 0.5),
            });
        }
        let (vx, vy) = accum.unwrap_or((0.0, 0.0));
        Velocity::new(vx.clamp(-max, max), vy.clamp(-max, max))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-3
    }

    #[test]
    fn empty_and_single_sample_have_no_velocity() {
        let mut t = SwipeTracker::new();
        assert_eq!(t.velocity(1000.0, f32::MAX), Velocity::ZERO);
        t.add_sample(10.0, 10.0, 5);
        assert_eq!(t.velocity(1000.0, f32::MAX), Velocity::ZERO);
    }

    #[test]
    fn constant_motion_gives_constant_velocity() {
        let mut t = SwipeTracker::new();
        for i in 0..4u64 {
            t.add_sample(i as f32 * 10.0, 0.0, i * 10);
        }
        let v = t.velocity(1000.0, f32::MAX);
        assert!(close(v.x, 1000.0), "{v:?}");
        assert!(close(v.y, 0.0));
    }

    #[test]
    fn estimates_are_blended_half_and_half() {
        let mut t = SwipeTracker::new();
        t.add_sample(0.0, 0.0, 0);
        t.add_sample(10.0, 0.0, 10); // 1000 px/s
        t.add_sample(10.0, 0.0, 20); // 500 px/s
        t.add_sample(10.0, 40.0, 40); // x 250 px/s, y 1000 px/s
        let v = t.velocity(1000.0, f32::MAX);
        // x: (1000 + 500) / 2 = 750, (750 + 250) / 2 = 500
        assert!(close(v.x, 500.0), "{v:?}");
        // y: 0, 0, then (0 + 1000) / 2
        assert!(close(v.y, 500.0), "{v:?}");
    }

    #[test]
    fn keeps_at_most_four_samples() {
        let mut t = SwipeTracker::new();
        for i in 0..6u64 {
            t.add_sample(i as f32, 0.0, i);
        }
        assert_eq!(t.len(), MAX_SAMPLES);
        assert_eq!(t.samples().next().map(|s| s.time), Some(2));
    }

    #[test]
    fn drops_samples_beyond_horizon() {
        let mut t = SwipeTracker::new();
        t.add_sample(0.0, 0.0, 0);
        t.add_sample(5.0, 0.0, 50);
        t.add_sample(6.0, 0.0, 260);
        let times: Vec<u64> = t.samples().map(|s| s.time).collect();
        assert_eq!(times, vec![260]);

        // exactly on the horizon is kept
        let mut t = SwipeTracker::new();
        t.add_sample(0.0, 0.0, 100);
        t.add_sample(1.0, 0.0, 300);
        assert_eq!(t.len(), 2);
    }

    #[test]
    fn zero_duration_samples_are_skipped() {
        let mut t = SwipeTracker::new();
        t.add_sample(0.0, 0.0, 10);
        t.add_sample(50.0, 0.0, 10);
        t.add_sample(20.0, 0.0, 30);
        let v = t.velocity(1000.0, f32::MAX);
        assert!(close(v.x, 1000.0), "{v:?}");
    }

    #[test]
    fn velocity_is_clamped_per_axis() {
        let mut t = SwipeTracker::new();
        t.add_sample(0.0, 0.0, 0);
        t.add_sample(-100.0, 100.0, 1);
        let v = t.velocity(1000.0, 8000.0);
        assert_eq!(v, Velocity::new(-8000.0, 8000.0));
    }

    #[test]
    fn clear_forgets_samples() {
        let mut t = SwipeTracker::new();
        t.add_sample(0.0, 0.0, 0);
        t.add_sample(10.0, 0.0, 10);
        t.clear();
        assert!(t.is_empty());
        assert_eq!(t.velocity(1000.0, f32::MAX), Velocity::ZERO);
    }
}
