/*
 * Copyright (c) 2020. Beautiful Code BV, Rotterdam, Netherlands
 * Licensed under GNU GENERAL PUBLIC LICENSE Version 3.
 */

//! Time sources and the fixed-period tick scheduler.
//!
//! All waiting in the motion core goes through a [`Clock`], so the same
//! executor can run against the wall clock on the device or against a
//! [`SimulatedClock`] whose sleeps complete instantly.

use crate::units::Seconds;
use instant::Instant;
use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

/// Monotonic time source that can block the caller.
pub trait Clock {
    /// Time elapsed since the clock was created.
    fn now(&self) -> Duration;

    /// Block for the given duration.
    fn sleep(&mut self, duration: Duration);
}

/// Wall-clock time, sleeping the current thread.
#[derive(Debug, Clone)]
pub struct SystemClock {
    origin: Instant,
}

impl Default for SystemClock {
    fn default() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl SystemClock {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }

    fn sleep(&mut self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// Virtual time that only moves when someone sleeps on it.
///
/// Clones share the same timeline.
#[derive(Debug, Clone, Default)]
pub struct SimulatedClock {
    now: Rc<Cell<Duration>>,
}

impl SimulatedClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, duration: Duration) {
        self.now.set(self.now.get() + duration);
    }
}

impl Clock for SimulatedClock {
    fn now(&self) -> Duration {
        self.now.get()
    }

    fn sleep(&mut self, duration: Duration) {
        self.advance(duration);
    }
}

/// Fixed-period sampling loop.
#[derive(Debug, Clone, Copy)]
pub struct Ticker {
    period: Duration,
}

impl Ticker {
    pub fn new(period: Seconds) -> Self {
        Self {
            period: period.to_duration(),
        }
    }

    /// Call `sample` with the elapsed time once per tick, starting at zero,
    /// for as long as less than `span` has elapsed. Returns the number of samples.
    pub fn run_for<C: Clock>(
        &self,
        clock: &mut C,
        span: Seconds,
        mut sample: impl FnMut(Seconds),
    ) -> usize {
        let mut samples = 0;
        self.poll_for(clock, span, |elapsed| {
            sample(elapsed);
            samples += 1;
            false
        });
        samples
    }

    /// Like [`run_for`](Ticker::run_for), but stops as soon as `sample`
    /// returns true. Returns whether it stopped that way.
    pub fn poll_for<C: Clock>(
        &self,
        clock: &mut C,
        span: Seconds,
        mut sample: impl FnMut(Seconds) -> bool,
    ) -> bool {
        let start = clock.now();
        let end = start + span.to_duration();
        let mut now = start;
        while now < end {
            if sample(Seconds::from_duration(now - start)) {
                return true;
            }
            clock.sleep(self.period);
            now = clock.now();
        }
        false
    }
}

impl Default for Ticker {
    fn default() -> Self {
        Self::new(crate::units::TICK)
    }
}
