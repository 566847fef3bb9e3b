use std::time::{Duration, Instant};

/// Identifies one armed tick.
///
/// A scene remembers the handle it armed and ignores any tick that does not
/// match, so a tick that was cancelled (or belongs to a torn-down scene) can
/// never run its frame body.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct TickHandle(pub u64);

/// Source of display-synchronised ticks.
///
/// At most one tick is pending at a time: the animation loop re-arms the
/// scheduler at the end of every frame, the same way a browser loop calls
/// `requestAnimationFrame` once per frame.
pub trait TickScheduler {
    /// Arms the next tick, replacing any tick that is already pending.
    fn schedule_next_tick(&mut self) -> TickHandle;

    /// Disarms the pending tick. Returns `true` if one was pending.
    fn cancel(&mut self) -> bool;

    /// Takes the pending tick once it is due, along with its timestamp in ms.
    fn poll(&mut self) -> Option<(TickHandle, f64)>;

    fn is_pending(&self) -> bool;
}

/// Scheduler whose clock only moves when told to. Used by tests and by
/// headless hosts that step frames as fast as possible.
#[derive(Debug, Default)]
pub struct ManualScheduler {
    now_ms: f64,
    pending: Option<TickHandle>,
    next_id: u64,
    armed_total: u64,
}

impl ManualScheduler {
    pub fn new(start_ms: f64) -> Self {
        Self {
            now_ms: start_ms,
            ..Self::default()
        }
    }

    pub fn now_ms(&self) -> f64 {
        self.now_ms
    }

    pub fn advance(&mut self, ms: f64) {
        self.now_ms += ms;
    }

    /// Number of times a tick has been armed over the scheduler's lifetime.
    pub fn armed_total(&self) -> u64 {
        self.armed_total
    }
}

impl TickScheduler for ManualScheduler {
    fn schedule_next_tick(&mut self) -> TickHandle {
        let handle = TickHandle(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        self.armed_total += 1;
        self.pending = Some(handle);
        handle
    }

    fn cancel(&mut self) -> bool {
        self.pending.take().is_some()
    }

    fn poll(&mut self) -> Option<(TickHandle, f64)> {
        let handle = self.pending.take()?;
        Some((handle, self.now_ms))
    }

    fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

/// Fixed-interval wall-clock scheduler for native hosts without vsync.
///
/// `poll` blocks until the next deadline. Deadlines that were missed are not
/// replayed: the following deadline is measured from "now".
#[derive(Debug)]
pub struct IntervalScheduler {
    interval: Duration,
    origin: Instant,
    next_due: Instant,
    pending: Option<TickHandle>,
    next_id: u64,
}

impl IntervalScheduler {
    pub fn new(interval: Duration) -> Self {
        let origin = Instant::now();
        Self {
            interval,
            origin,
            next_due: origin,
            pending: None,
            next_id: 0,
        }
    }

    /// ~60 Hz.
    pub fn sixty_hz() -> Self {
        Self::new(Duration::from_micros(16_667))
    }
}

impl TickScheduler for IntervalScheduler {
    fn schedule_next_tick(&mut self) -> TickHandle {
        let handle = TickHandle(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        self.pending = Some(handle);
        handle
    }

    fn cancel(&mut self) -> bool {
        self.pending.take().is_some()
    }

    fn poll(&mut self) -> Option<(TickHandle, f64)> {
        let handle = self.pending.take()?;
        let now = Instant::now();
        if self.next_due > now {
            std::thread::sleep(self.next_due - now);
        }
        let fired_at = Instant::now();
        self.next_due = (self.next_due + self.interval).max(fired_at);
        let ms = fired_at.duration_since(self.origin).as_secs_f64() * 1000.0;
        Some((handle, ms))
    }

    fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::{IntervalScheduler, ManualScheduler, TickScheduler};
    use std::time::Duration;

    #[test]
    fn manual_poll_consumes_pending_tick() {
        let mut s = ManualScheduler::new(100.0);
        assert!(s.poll().is_none());

        let h = s.schedule_next_tick();
        s.advance(16.0);
        assert_eq!(s.poll(), Some((h, 116.0)));
        assert!(s.poll().is_none());
    }

    #[test]
    fn rearming_replaces_pending_tick() {
        let mut s = ManualScheduler::default();
        let first = s.schedule_next_tick();
        let second = s.schedule_next_tick();
        assert_ne!(first, second);
        assert_eq!(s.poll().map(|(h, _)| h), Some(second));
        assert_eq!(s.armed_total(), 2);
    }

    #[test]
    fn cancel_reports_whether_a_tick_was_pending() {
        let mut s = ManualScheduler::default();
        assert!(!s.cancel());
        s.schedule_next_tick();
        assert!(s.cancel());
        assert!(!s.is_pending());
        assert!(s.poll().is_none());
    }

    #[test]
    fn interval_timestamps_increase() {
        let mut s = IntervalScheduler::new(Duration::from_millis(2));
        s.schedule_next_tick();
        let (_, a) = s.poll().unwrap();
        s.schedule_next_tick();
        let (_, b) = s.poll().unwrap();
        assert!(b >= a + 1.0, "a={a} b={b}");
    }
}
