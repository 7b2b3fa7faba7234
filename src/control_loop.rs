/*
 * Copyright (c) 2020. Beautiful Code BV, Rotterdam, Netherlands
 * Licensed under GNU GENERAL PUBLIC LICENSE Version 3.
 */

//! The box's life: play a pattern, wait for the switch, choose again.

use crate::actuator::{Actuator, Trigger};
use crate::clock::Clock;
use crate::motion::runner::PatternRunner;
use crate::pattern::PatternLibrary;
use crate::prng::Xorshift32;
use crate::selector::{pick_next, UsageStats};
use crate::units::Seconds;
use log::{debug, info};

/// What happened while waiting after a pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activation {
    /// The switch was flipped again and `next` will run on the following step
    Triggered { next: usize },
    /// Nobody came back in time
    TimedOut,
}

/// Everything the loop mutates, owned in one place.
///
/// Usage counters and the generator only change between patterns.
pub struct ControlLoopContext<A, T, C> {
    library: PatternLibrary,
    runner: PatternRunner<A, C>,
    trigger: T,
    prng: Xorshift32,
    usage: UsageStats,
    power_off_after: Seconds,
    next: usize,
}

impl<A: Actuator, T: Trigger, C: Clock> ControlLoopContext<A, T, C> {
    pub fn new(
        library: PatternLibrary,
        runner: PatternRunner<A, C>,
        trigger: T,
        prng: Xorshift32,
        power_off_after: Seconds,
    ) -> Self {
        let usage = UsageStats::new(library.len());
        Self {
            library,
            runner,
            trigger,
            prng,
            usage,
            power_off_after,
            next: 0,
        }
    }

    /// Run the pending pattern to completion, then wait for the switch.
    pub fn step(&mut self) -> Activation {
        let current = self.next;
        self.runner.run_pattern(&self.library[current]);
        self.usage.record(current);
        info!("Closed");

        if !self.trigger.await_activation(self.power_off_after) {
            return Activation::TimedOut;
        }
        let entropy = self.runner.executor().clock().now().as_nanos() as u32;
        self.prng.entropy(entropy);
        self.next = pick_next(&self.usage, &mut self.prng);
        debug!("next pattern: {}", self.library[self.next].name());
        Activation::Triggered { next: self.next }
    }

    /// Keep playing until the switch is left alone, then cut the power.
    pub fn run(mut self) -> ! {
        while let Activation::Triggered { .. } = self.step() {}
        info!("Powering off after {}", self.power_off_after);
        self.trigger.power_off()
    }

    pub fn library(&self) -> &PatternLibrary {
        &self.library
    }

    pub fn usage(&self) -> &UsageStats {
        &self.usage
    }

    pub fn runner(&self) -> &PatternRunner<A, C> {
        &self.runner
    }

    pub fn prng(&self) -> &Xorshift32 {
        &self.prng
    }

    /// Index of the pattern the next step will run.
    pub fn next(&self) -> usize {
        self.next
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::simulated::{RecordingServo, ScriptedTrigger};
    use crate::clock::SimulatedClock;
    use crate::motion::executor::MotionExecutor;
    use crate::motion::AngleRange;
    use crate::units::{Deg, Sec};
    use std::time::Duration;

    type TestLoop = ControlLoopContext<RecordingServo, ScriptedTrigger, SimulatedClock>;

    fn control_loop(trigger: ScriptedTrigger, seed: u32) -> TestLoop {
        let runner = PatternRunner::new(
            MotionExecutor::new(RecordingServo::new(Sec(0.35 / 60.0)), SimulatedClock::new()),
            AngleRange::new(Deg(120.0), Deg(17.0)),
        );
        ControlLoopContext::new(
            PatternLibrary::builtin(),
            runner,
            trigger,
            Xorshift32::new(seed),
            Sec(20.0),
        )
    }

    #[test]
    fn test_first_step_plays_first_pattern() {
        let mut control = control_loop(ScriptedTrigger::new([false]), 1);
        assert_eq!(control.next(), 0);
        assert_eq!(control.step(), Activation::TimedOut);
        assert_eq!(control.usage().counts(), &[1, 0, 0, 0, 0, 0]);
        assert_eq!(control.usage().total(), 1);
        assert_eq!(control.runner().executor().actuator().last(), Some(Deg(120.0)));
        // timing out leaves the generator alone
        assert_eq!(control.prng().seed(), 1);
    }

    #[test]
    fn test_activation_feeds_entropy_and_picks() {
        let mut control = control_loop(ScriptedTrigger::activations(1), 1);
        let Activation::Triggered { next } = control.step() else {
            panic!("expected an activation");
        };
        assert_eq!(next, control.next());
        assert!(next < control.library().len());

        let elapsed = control.runner().executor().clock().now();
        let mut expected = Xorshift32::new(1);
        expected.entropy(elapsed.as_nanos() as u32);
        let mut usage = UsageStats::new(6);
        usage.record(0);
        assert_eq!(pick_next(&usage, &mut expected), next);
        assert_eq!(control.prng(), &expected);
    }

    #[test]
    fn test_steps_are_reproducible() {
        let run = || {
            let mut control = control_loop(ScriptedTrigger::activations(30), 77);
            let mut order = vec![control.next()];
            while let Activation::Triggered { next } = control.step() {
                order.push(next);
            }
            (order, control.usage().clone())
        };
        let (first, usage) = run();
        assert_eq!(run(), (first.clone(), usage.clone()));
        assert_eq!(usage.total(), 31);
        // every pick was played exactly once
        assert_eq!(first.len(), 31);
        for (index, &count) in usage.counts().iter().enumerate() {
            assert_eq!(first.iter().filter(|&&played| played == index).count() as u64, count);
        }
    }

    #[test]
    fn test_usage_spreads_over_the_library() {
        let mut control = control_loop(ScriptedTrigger::activations(120), 12345);
        while let Activation::Triggered { .. } = control.step() {}
        let usage = control.usage();
        assert!(usage.counts().iter().all(|&count| count > 0), "{:?}", usage.counts());
        assert!(usage.balance().unwrap() > 0.9, "{:?}", usage.counts());
    }

    #[test]
    fn test_every_step_ends_at_rest() {
        let mut control = control_loop(ScriptedTrigger::activations(10), 5);
        let mut before = Duration::ZERO;
        while let Activation::Triggered { .. } = control.step() {
            assert_eq!(control.runner().executor().actuator().last(), Some(Deg(120.0)));
            let now = control.runner().executor().clock().now();
            assert!(now > before);
            before = now;
        }
    }
}
