//! Scoped elapsed-time measurement
//!
//! Starting an [`ElapsedTimer`] yields a [`RunningTimer`]; the interval only
//! exists on the [`TimedInterval`] returned by [`RunningTimer::stop`], so it
//! cannot be read while the measured scope is still open.

use std::time::{Duration, Instant};

use crate::runtime::{Clock, SystemClock};

pub struct ElapsedTimer;

impl ElapsedTimer {
    /// Record the start instant
    pub fn start<K: Clock>(clock: K) -> RunningTimer<K> {
        let start = clock.now();
        RunningTimer { clock, start }
    }

    /// Run `f` and measure how long it took
    pub fn measure<K, T, F>(clock: K, f: F) -> (T, TimedInterval)
    where
        K: Clock,
        F: FnOnce() -> T,
    {
        let timer = Self::start(clock);
        let value = f();
        (value, timer.stop())
    }

    /// [`ElapsedTimer::measure`] against the system clock
    pub fn measure_system<T, F>(f: F) -> (T, TimedInterval)
    where
        F: FnOnce() -> T,
    {
        Self::measure(SystemClock, f)
    }
}

#[derive(Debug)]
#[must_use = "a running timer measures nothing until it is stopped"]
pub struct RunningTimer<K: Clock> {
    clock: K,
    start: Instant,
}

impl<K: Clock> RunningTimer<K> {
    pub fn start(&self) -> Instant {
        self.start
    }

    /// Record the end instant and compute the interval
    pub fn stop(self) -> TimedInterval {
        let end = self.clock.now();
        TimedInterval {
            start: self.start,
            end,
            interval: end.saturating_duration_since(self.start),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimedInterval {
    pub start: Instant,
    pub end: Instant,
    pub interval: Duration,
}
