//! Pausable wall-clock timers and the rates derived from them.

use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TimerState {
    Stopped,
    Running(Instant),
    Paused,
}

#[derive(Debug, Clone)]
pub struct Timer {
    state: TimerState,
    // time accumulated before the last pause
    accumulated: Duration,
}

impl Default for Timer {
    fn default() -> Timer {
        Timer {
            state: TimerState::Stopped,
            accumulated: Duration::ZERO,
        }
    }
}

impl Timer {
    pub fn start(&mut self) {
        self.accumulated = Duration::ZERO;
        self.state = TimerState::Running(Instant::now());
    }

    pub fn stop(&mut self) {
        self.accumulated = self.elapsed();
        self.state = TimerState::Stopped;
    }

    pub fn pause(&mut self) {
        if let TimerState::Running(since) = self.state {
            self.accumulated += since.elapsed();
            self.state = TimerState::Paused;
        }
    }

    pub fn resume(&mut self) {
        if self.state == TimerState::Paused {
            self.state = TimerState::Running(Instant::now());
        }
    }

    /// Restarts the count, keeping the running or paused state.
    pub fn reset(&mut self) {
        self.accumulated = Duration::ZERO;

        if let TimerState::Running(_) = self.state {
            self.state = TimerState::Running(Instant::now());
        }
    }

    pub fn started(&self) -> bool {
        self.state != TimerState::Stopped
    }

    pub fn paused(&self) -> bool {
        self.state == TimerState::Paused
    }

    pub fn elapsed(&self) -> Duration {
        match self.state {
            TimerState::Running(since) => self.accumulated + since.elapsed(),
            _ => self.accumulated,
        }
    }
}

/// Events per second over `elapsed`. Degenerate rates report 0.
pub fn rate(count: u64, elapsed: Duration) -> f64 {
    let per_second = count as f64 / elapsed.as_secs_f64();

    if per_second.is_finite() {
        per_second
    } else {
        0.0
    }
}

/// An event counter tied to a timer.
#[derive(Debug, Clone, Default)]
pub struct Counter {
    pub timer: Timer,
    count: u64,
}

impl Counter {
    pub fn start(&mut self) {
        self.timer.start();
        self.count = 0;
    }

    /// Counts one event unless the timer is paused.
    pub fn tick(&mut self) {
        if !self.timer.paused() {
            self.count += 1;
        }
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn rate(&self) -> f64 {
        rate(self.count, self.timer.elapsed())
    }

    pub fn reset(&mut self) {
        if self.timer.started() {
            self.count = 0;
            self.timer.reset();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn degenerate_rates_are_zero() {
        assert_eq!(rate(0, Duration::ZERO), 0.0);
        assert_eq!(rate(10, Duration::ZERO), 0.0);
        assert_eq!(rate(10, Duration::from_secs(2)), 5.0);
    }

    #[test]
    fn timer_states() {
        let mut timer = Timer::default();
        assert!(!timer.started());
        assert_eq!(timer.elapsed(), Duration::ZERO);

        timer.start();
        assert!(timer.started());
        assert!(!timer.paused());

        timer.pause();
        assert!(timer.paused());
        let frozen = timer.elapsed();
        assert_eq!(timer.elapsed(), frozen);

        timer.resume();
        assert!(!timer.paused());
        assert!(timer.elapsed() >= frozen);

        timer.stop();
        assert!(!timer.started());
    }

    #[test]
    fn paused_counters_do_not_tick() {
        let mut counter = Counter::default();
        counter.start();
        counter.tick();
        counter.timer.pause();
        counter.tick();

        assert_eq!(counter.count(), 1);

        counter.reset();
        assert_eq!(counter.count(), 0);
    }

    #[test]
    fn reset_is_ignored_before_start() {
        let mut counter = Counter::default();
        counter.tick();
        counter.reset();

        assert_eq!(counter.count(), 1);
        assert_eq!(counter.rate(), 0.0);
    }
}
