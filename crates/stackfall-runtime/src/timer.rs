use std::{
    fmt,
    time::{Duration, Instant},
};

/// Fixed-period schedule that does not drift.
///
/// Once started at `t0`, boundaries fall at `t0 + n * period` regardless of
/// how late they are observed. A caller that polls late gets every boundary
/// that elapsed in the meantime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickSchedule {
    period: Duration,
    next_due: Option<Instant>,
}

impl TickSchedule {
    /// Creates a stopped schedule.
    ///
    /// # Panics
    ///
    /// Panics if `period` is zero.
    #[must_use]
    pub fn new(period: Duration) -> Self {
        assert!(!period.is_zero(), "tick period must be non-zero");
        Self {
            period,
            next_due: None,
        }
    }

    /// Creates a schedule whose first boundary is one period after `now`.
    ///
    /// # Panics
    ///
    /// Panics if `period` is zero.
    #[must_use]
    pub fn started(period: Duration, now: Instant) -> Self {
        let mut schedule = Self::new(period);
        schedule.start(now);
        schedule
    }

    #[must_use]
    pub const fn period(&self) -> Duration {
        self.period
    }

    #[must_use]
    pub const fn is_running(&self) -> bool {
        self.next_due.is_some()
    }

    /// Returns the instant of the next boundary, or `None` if stopped.
    #[must_use]
    pub const fn next_due(&self) -> Option<Instant> {
        self.next_due
    }

    /// (Re)starts the schedule with its phase anchored at `now`.
    pub fn start(&mut self, now: Instant) {
        self.next_due = Some(now + self.period);
    }

    pub fn stop(&mut self) {
        self.next_due = None;
    }

    /// Changes the period.
    ///
    /// A running schedule restarts its phase at `now`. Setting the current
    /// period again is a no-op and returns `false`.
    ///
    /// # Panics
    ///
    /// Panics if `period` is zero.
    pub fn set_period(&mut self, period: Duration, now: Instant) -> bool {
        assert!(!period.is_zero(), "tick period must be non-zero");
        if period == self.period {
            return false;
        }
        self.period = period;
        if self.is_running() {
            self.start(now);
        }
        true
    }

    /// Consumes every boundary at or before `now` and returns how many there
    /// were.
    pub fn poll(&mut self, now: Instant) -> u32 {
        let Some(mut due) = self.next_due else {
            return 0;
        };
        let mut elapsed = 0;
        while due <= now {
            elapsed += 1;
            due += self.period;
        }
        self.next_due = Some(due);
        elapsed
    }
}

/// Fixed-period timer that invokes a replaceable callback on a target.
///
/// The callback can be swapped at any time with [`Self::set_callback`]; the
/// next boundary always runs the most recently registered one and the phase
/// is left untouched. Only [`Self::set_period`] restarts the phase.
///
/// The driver does not own a thread. The owner calls [`Self::advance`] from
/// its event loop and passes the state the callback operates on.
///
/// # Example
///
/// ```
/// use std::time::{Duration, Instant};
///
/// use stackfall_runtime::TimerDriver;
///
/// let start = Instant::now();
/// let mut ticks = 0;
/// let mut timer = TimerDriver::new(Duration::from_millis(500), |n: &mut i32| *n += 1);
/// timer.start(start);
///
/// assert_eq!(timer.advance(start + Duration::from_millis(1200), &mut ticks), 2);
/// assert_eq!(ticks, 2);
///
/// timer.stop();
/// assert_eq!(timer.advance(start + Duration::from_secs(10), &mut ticks), 0);
/// ```
pub struct TimerDriver<'a, T> {
    schedule: TickSchedule,
    callback: Box<dyn FnMut(&mut T) + 'a>,
}

impl<T> fmt::Debug for TimerDriver<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TimerDriver")
            .field("schedule", &self.schedule)
            .finish_non_exhaustive()
    }
}

impl<'a, T> TimerDriver<'a, T> {
    /// Creates a stopped timer.
    ///
    /// # Panics
    ///
    /// Panics if `period` is zero.
    pub fn new<F>(period: Duration, callback: F) -> Self
    where
        F: FnMut(&mut T) + 'a,
    {
        Self {
            schedule: TickSchedule::new(period),
            callback: Box::new(callback),
        }
    }

    #[must_use]
    pub const fn period(&self) -> Duration {
        self.schedule.period()
    }

    #[must_use]
    pub const fn is_running(&self) -> bool {
        self.schedule.is_running()
    }

    #[must_use]
    pub const fn next_due(&self) -> Option<Instant> {
        self.schedule.next_due()
    }

    pub fn start(&mut self, now: Instant) {
        self.schedule.start(now);
    }

    /// Stops the timer. No callback runs until it is started again.
    pub fn stop(&mut self) {
        self.schedule.stop();
    }

    /// Changes the period, restarting the phase if it actually changed.
    ///
    /// # Panics
    ///
    /// Panics if `period` is zero.
    pub fn set_period(&mut self, period: Duration, now: Instant) -> bool {
        self.schedule.set_period(period, now)
    }

    /// Replaces the callback without touching the schedule.
    pub fn set_callback<F>(&mut self, callback: F)
    where
        F: FnMut(&mut T) + 'a,
    {
        self.callback = Box::new(callback);
    }

    /// Runs the callback once per boundary elapsed up to `now`.
    ///
    /// Returns the number of callbacks run.
    pub fn advance(&mut self, now: Instant, target: &mut T) -> u32 {
        let fired = self.schedule.poll(now);
        for _ in 0..fired {
            (self.callback)(target);
        }
        fired
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PERIOD: Duration = Duration::from_millis(500);

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    mod tick_schedule {
        use super::*;

        #[test]
        fn test_stopped_schedule_never_fires() {
            let t0 = Instant::now();
            let mut schedule = TickSchedule::new(PERIOD);
            assert!(!schedule.is_running());
            assert_eq!(schedule.poll(t0 + ms(10_000)), 0);
            assert_eq!(schedule.next_due(), None);
        }

        #[test]
        fn test_fires_on_boundaries() {
            let t0 = Instant::now();
            let mut schedule = TickSchedule::started(PERIOD, t0);

            assert_eq!(schedule.poll(t0 + ms(499)), 0);
            assert_eq!(schedule.poll(t0 + ms(500)), 1);
            assert_eq!(schedule.poll(t0 + ms(500)), 0);
            assert_eq!(schedule.poll(t0 + ms(1600)), 2);
            assert_eq!(schedule.next_due(), Some(t0 + ms(2000)));
        }

        #[test]
        fn test_late_polls_do_not_drift() {
            let t0 = Instant::now();
            let mut schedule = TickSchedule::started(PERIOD, t0);

            // Each poll is 30ms late; the phase stays anchored at t0.
            for n in 1..=10 {
                assert_eq!(schedule.poll(t0 + PERIOD * n + ms(30)), 1);
            }
            assert_eq!(schedule.next_due(), Some(t0 + PERIOD * 11));
        }

        #[test]
        fn test_set_period_restarts_only_on_change() {
            let t0 = Instant::now();
            let mut schedule = TickSchedule::started(PERIOD, t0);

            assert!(!schedule.set_period(PERIOD, t0 + ms(300)));
            assert_eq!(schedule.next_due(), Some(t0 + ms(500)));

            assert!(schedule.set_period(ms(200), t0 + ms(300)));
            assert_eq!(schedule.next_due(), Some(t0 + ms(500)));
            assert_eq!(schedule.poll(t0 + ms(900)), 3);
        }

        #[test]
        fn test_set_period_keeps_stopped_schedule_stopped() {
            let t0 = Instant::now();
            let mut schedule = TickSchedule::new(PERIOD);
            assert!(schedule.set_period(ms(100), t0));
            assert!(!schedule.is_running());
        }

        #[test]
        #[should_panic(expected = "non-zero")]
        fn test_zero_period_panics() {
            let _ = TickSchedule::new(Duration::ZERO);
        }
    }

    mod timer_driver {
        use super::*;

        #[test]
        fn test_one_period_fires_once() {
            let t0 = Instant::now();
            let mut count = 0_u32;
            let mut timer = TimerDriver::new(PERIOD, |n: &mut u32| *n += 1);
            timer.start(t0);

            assert_eq!(timer.advance(t0, &mut count), 0);
            assert_eq!(timer.advance(t0 + PERIOD, &mut count), 1);
            assert_eq!(count, 1);
        }

        #[test]
        fn test_stop_prevents_further_callbacks() {
            let t0 = Instant::now();
            let mut count = 0_u32;
            let mut timer = TimerDriver::new(PERIOD, |n: &mut u32| *n += 1);
            timer.start(t0);
            timer.advance(t0 + ms(1000), &mut count);

            timer.stop();
            assert!(!timer.is_running());
            assert_eq!(timer.advance(t0 + ms(60_000), &mut count), 0);
            assert_eq!(count, 2);
        }

        #[test]
        fn test_replacing_callback_keeps_phase() {
            let t0 = Instant::now();
            let mut log = Vec::new();
            let mut timer = TimerDriver::new(PERIOD, |log: &mut Vec<char>| log.push('a'));
            timer.start(t0);

            timer.advance(t0 + ms(500), &mut log);
            timer.set_callback(|log: &mut Vec<char>| log.push('b'));
            assert_eq!(timer.next_due(), Some(t0 + ms(1000)));

            // Still due at 1000ms, not 500ms after the replacement.
            assert_eq!(timer.advance(t0 + ms(999), &mut log), 0);
            timer.advance(t0 + ms(1000), &mut log);
            assert_eq!(log, ['a', 'b']);
        }

        #[test]
        fn test_callback_can_capture_state() {
            let t0 = Instant::now();
            let mut step = 1;
            let mut total = 0;
            {
                let mut timer = TimerDriver::new(PERIOD, |n: &mut i32| {
                    *n += step;
                    step *= 2;
                });
                timer.start(t0);
                timer.advance(t0 + ms(1500), &mut total);
            }
            assert_eq!(total, 1 + 2 + 4);
            assert_eq!(step, 8);
        }

        #[test]
        fn test_debug_omits_callback() {
            let timer = TimerDriver::new(PERIOD, |_: &mut ()| {});
            let debug = format!("{timer:?}");
            assert!(debug.starts_with("TimerDriver"), "{debug}");
            assert!(debug.contains("schedule"), "{debug}");
        }
    }
}
