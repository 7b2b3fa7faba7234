/*
 * Copyright (c) 2020. Beautiful Code BV, Rotterdam, Netherlands
 * Licensed under GNU GENERAL PUBLIC LICENSE Version 3.
 */

//! Single servo moves in real time.

use crate::actuator::Actuator;
use crate::clock::{Clock, Ticker};
use crate::units::{Degrees, Seconds};
use log::trace;

/// Drives an [`Actuator`] through one move at a time, blocking on a [`Clock`].
pub struct MotionExecutor<A, C> {
    actuator: A,
    clock: C,
    ticker: Ticker,
    time_scale: f64,
}

impl<A: Actuator, C: Clock> MotionExecutor<A, C> {
    pub fn new(actuator: A, clock: C) -> Self {
        Self {
            actuator,
            clock,
            ticker: Ticker::default(),
            time_scale: 1.0,
        }
    }

    pub fn with_ticker(mut self, ticker: Ticker) -> Self {
        self.ticker = ticker;
        self
    }

    /// Stretch (> 1) or compress (< 1) every wait.
    pub fn with_time_scale(mut self, time_scale: f64) -> Self {
        self.time_scale = time_scale;
        self
    }

    /// Move from `from` to `to`.
    ///
    /// - no duration: command `to` at once and wait for the servo's own slew time
    /// - same angles: just wait `duration`
    /// - otherwise: interpolate linearly once per tick, then command `to` exactly
    pub fn execute_move(&mut self, duration: Option<Seconds>, from: Degrees, to: Degrees) {
        let Self {
            actuator,
            clock,
            ticker,
            time_scale,
        } = self;

        let Some(duration) = duration else {
            let wait = (to - from).abs() * actuator.time_per_degree() * *time_scale;
            trace!("fast move {from} → {to}, waiting {wait}");
            actuator.set_angle(to);
            clock.sleep(wait.to_duration());
            return;
        };

        let duration = duration * *time_scale;
        if from == to {
            trace!("hold {from} for {duration}");
            clock.sleep(duration.to_duration());
            return;
        }

        let degrees_per_second = (to - from).0 / duration.0;
        let samples = ticker.run_for(clock, duration, |elapsed| {
            actuator.set_angle(from + Degrees(elapsed.0 * degrees_per_second));
        });
        trace!("timed move {from} → {to} over {duration} in {samples} ticks");
        actuator.set_angle(to);
    }

    pub fn actuator(&self) -> &A {
        &self.actuator
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::simulated::RecordingServo;
    use crate::clock::SimulatedClock;
    use crate::units::{Deg, Sec};
    use std::time::Duration;

    fn executor() -> MotionExecutor<RecordingServo, SimulatedClock> {
        MotionExecutor::new(RecordingServo::new(Sec(0.35 / 60.0)), SimulatedClock::new())
    }

    #[test]
    fn test_fast_move_waits_for_slew() {
        let mut executor = executor();
        executor.execute_move(None, Deg(120.0), Deg(60.0));
        assert_eq!(executor.actuator().angles(), &[Deg(60.0)]);
        let expected = Duration::from_secs_f64(60.0 * 0.35 / 60.0);
        let waited = executor.clock().now();
        let error = if waited > expected { waited - expected } else { expected - waited };
        assert!(error < Duration::from_micros(1));
    }

    #[test]
    fn test_fast_move_to_same_angle() {
        let mut executor = executor();
        executor.execute_move(None, Deg(120.0), Deg(120.0));
        assert_eq!(executor.actuator().angles(), &[Deg(120.0)]);
        assert_eq!(executor.clock().now(), Duration::ZERO);
    }

    #[test]
    fn test_hold_issues_no_angle() {
        let mut executor = executor();
        executor.execute_move(Some(Sec(2.0)), Deg(90.0), Deg(90.0));
        assert!(executor.actuator().angles().is_empty());
        assert_eq!(executor.clock().now(), Duration::from_secs(2));
    }

    #[test]
    fn test_timed_move_interpolates_and_lands_exactly() {
        let mut executor = executor();
        executor.execute_move(Some(Sec(0.1)), Deg(0.0), Deg(100.0));
        let angles = executor.actuator().angles();
        assert_eq!(angles.len(), 11);
        assert_eq!(angles[0], Deg(0.0));
        for (index, angle) in angles[..10].iter().enumerate() {
            assert!((angle.0 - 10.0 * index as f64).abs() < 1e-6, "tick {index}: {angle}");
        }
        assert!(angles.windows(2).all(|pair| pair[0] < pair[1]));
        assert_eq!(angles.last(), Some(&Deg(100.0)));
        assert_eq!(executor.clock().now(), Duration::from_millis(100));
    }

    #[test]
    fn test_timed_move_downwards_lands_exactly() {
        let mut executor = executor();
        executor.execute_move(Some(Sec(0.33)), Deg(120.0), Deg(17.0));
        let angles = executor.actuator().angles();
        assert!(angles.windows(2).all(|pair| pair[0] > pair[1]));
        assert!(angles[..angles.len() - 1].iter().all(|angle| angle.0 > 17.0));
        assert_eq!(angles.last(), Some(&Deg(17.0)));
    }

    #[test]
    fn test_zero_duration_move_still_lands() {
        let mut executor = executor();
        executor.execute_move(Some(Sec(0.0)), Deg(120.0), Deg(17.0));
        assert_eq!(executor.actuator().angles(), &[Deg(17.0)]);
        assert_eq!(executor.clock().now(), Duration::ZERO);
    }

    #[test]
    fn test_time_scale_stretches_waits() {
        let mut executor = executor().with_time_scale(2.0);
        executor.execute_move(Some(Sec(1.0)), Deg(50.0), Deg(50.0));
        assert_eq!(executor.clock().now(), Duration::from_secs(2));
        executor.execute_move(Some(Sec(0.05)), Deg(50.0), Deg(60.0));
        assert_eq!(executor.actuator().angles().len(), 11);
        assert_eq!(executor.clock().now(), Duration::from_millis(2100));
    }

    #[test]
    fn test_custom_tick() {
        let mut executor = executor().with_ticker(Ticker::new(Sec(0.025)));
        executor.execute_move(Some(Sec(0.1)), Deg(0.0), Deg(10.0));
        assert_eq!(executor.actuator().angles().len(), 5);
    }
}
