//! Cancellable delayed actions driven by event time.
//!
//! The scheduler never sleeps and owns no thread. The owner asks for due
//! timers with [`TimerScheduler::pop_due`] whenever time advances, and uses
//! [`TimerScheduler::next_deadline`] to know when to wake up.

use tracing::debug;

/// The four delayed actions of a touch session. At most one of each is pending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TimerKind {
    ShowPreview,
    HidePreview,
    RepeatKey,
    LongPress,
}

impl TimerKind {
    pub const ALL: [TimerKind; 4] = [
        TimerKind::ShowPreview,
        TimerKind::HidePreview,
        TimerKind::RepeatKey,
        TimerKind::LongPress,
    ];

    fn slot(self) -> usize {
        match self {
            TimerKind::ShowPreview => 0,
            TimerKind::HidePreview => 1,
            TimerKind::RepeatKey => 2,
            TimerKind::LongPress => 3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Pending<T> {
    deadline: u64,
    seq: u64,
    payload: T,
}

/// A timer taken out of the scheduler because its deadline passed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FiredTimer<T> {
    pub kind: TimerKind,
    pub deadline: u64,
    pub payload: T,
}

#[derive(Debug, Clone)]
pub struct TimerScheduler<T> {
    slots: [Option<Pending<T>>; 4],
    next_seq: u64,
}

impl<T> Default for TimerScheduler<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> TimerScheduler<T> {
    pub fn new() -> Self {
        Self {
            slots: [None, None, None, None],
            next_seq: 0,
        }
    }

    /// Arms `kind` to fire at `now + delay`, replacing any pending timer of
    /// the same kind.
    pub fn schedule(&mut self, kind: TimerKind, now: u64, delay: u64, payload: T) {
        let deadline = now.saturating_add(delay);
        let seq = self.next_seq;
        self.next_seq += 1;
        debug!(?kind, deadline, "timer scheduled");
        self.slots[kind.slot()] = Some(Pending {
            deadline,
            seq,
            payload,
        });
    }

    /// Removes a pending timer. Returns whether one was pending.
    pub fn cancel(&mut self, kind: TimerKind) -> bool {
        let was_pending = self.slots[kind.slot()].take().is_some();
        if was_pending {
            debug!(?kind, "timer canceled");
        }
        was_pending
    }

    pub fn cancel_all(&mut self) {
        for slot in &mut self.slots {
            *slot = None;
        }
    }

    pub fn is_pending(&self, kind: TimerKind) -> bool {
        self.slots[kind.slot()].is_some()
    }

    pub fn deadline(&self, kind: TimerKind) -> Option<u64> {
        self.slots[kind.slot()].as_ref().map(|p| p.deadline)
    }

    pub fn payload(&self, kind: TimerKind) -> Option<&T> {
        self.slots[kind.slot()].as_ref().map(|p| &p.payload)
    }

    pub fn next_deadline(&self) -> Option<u64> {
        self.slots.iter().flatten().map(|p| p.deadline).min()
    }

    pub fn has_pending(&self) -> bool {
        self.slots.iter().any(Option::is_some)
    }

    /// Takes the earliest timer due at `now`, if any. Timers with equal
    /// deadlines come out in scheduling order.
    pub fn pop_due(&mut self, now: u64) -> Option<FiredTimer<T>> {
        let kind = TimerKind::ALL
            .into_iter()
            .filter_map(|kind| {
                self.slots[kind.slot()]
                    .as_ref()
                    .filter(|p| p.deadline <= now)
                    .map(|p| (p.deadline, p.seq, kind))
            })
            .min()
            .map(|(_, _, kind)| kind)?;
        let pending = self.slots[kind.slot()].take()?;
        Some(FiredTimer {
            kind,
            deadline: pending.deadline,
            payload: pending.payload,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fires_at_deadline_not_before() {
        let mut timers = TimerScheduler::new();
        timers.schedule(TimerKind::LongPress, 100, 500, 7usize);
        assert!(timers.pop_due(599).is_none());
        let fired = timers.pop_due(600).unwrap();
        assert_eq!(fired.kind, TimerKind::LongPress);
        assert_eq!(fired.deadline, 600);
        assert_eq!(fired.payload, 7);
        assert!(!timers.has_pending());
    }

    #[test]
    fn reschedule_replaces_pending_timer() {
        let mut timers = TimerScheduler::new();
        timers.schedule(TimerKind::LongPress, 0, 500, "k");
        timers.schedule(TimerKind::LongPress, 200, 500, "j");
        assert!(timers.pop_due(500).is_none());
        let fired = timers.pop_due(700).unwrap();
        assert_eq!(fired.payload, "j");
        assert!(timers.pop_due(u64::MAX).is_none());
    }

    #[test]
    fn canceled_timer_never_fires() {
        let mut timers = TimerScheduler::new();
        timers.schedule(TimerKind::RepeatKey, 0, 400, ());
        assert!(timers.cancel(TimerKind::RepeatKey));
        assert!(!timers.cancel(TimerKind::RepeatKey));
        assert!(timers.pop_due(10_000).is_none());
    }

    #[test]
    fn due_timers_come_out_in_deadline_order() {
        let mut timers = TimerScheduler::new();
        timers.schedule(TimerKind::LongPress, 0, 500, 1);
        timers.schedule(TimerKind::HidePreview, 0, 70, 2);
        timers.schedule(TimerKind::RepeatKey, 0, 400, 3);
        let order: Vec<TimerKind> = std::iter::from_fn(|| timers.pop_due(1000))
            .map(|f| f.kind)
            .collect();
        assert_eq!(
            order,
            vec![
                TimerKind::HidePreview,
                TimerKind::RepeatKey,
                TimerKind::LongPress
            ]
        );
    }

    #[test]
    fn equal_deadlines_keep_scheduling_order() {
        let mut timers = TimerScheduler::new();
        timers.schedule(TimerKind::LongPress, 0, 100, ());
        timers.schedule(TimerKind::ShowPreview, 0, 100, ());
        assert_eq!(timers.pop_due(100).unwrap().kind, TimerKind::LongPress);
        assert_eq!(timers.pop_due(100).unwrap().kind, TimerKind::ShowPreview);
    }

    #[test]
    fn next_deadline_is_earliest_pending() {
        let mut timers = TimerScheduler::new();
        assert_eq!(timers.next_deadline(), None);
        timers.schedule(TimerKind::LongPress, 10, 500, ());
        timers.schedule(TimerKind::HidePreview, 10, 70, ());
        assert_eq!(timers.next_deadline(), Some(80));
        assert_eq!(timers.deadline(TimerKind::LongPress), Some(510));
        timers.cancel_all();
        assert_eq!(timers.next_deadline(), None);
        for kind in TimerKind::ALL {
            assert!(!timers.is_pending(kind));
        }
    }

    #[test]
    fn deadline_saturates() {
        let mut timers = TimerScheduler::new();
        timers.schedule(TimerKind::RepeatKey, u64::MAX - 1, 50, ());
        assert_eq!(timers.deadline(TimerKind::RepeatKey), Some(u64::MAX));
    }
}
