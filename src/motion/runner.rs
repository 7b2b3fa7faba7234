/*
 * Copyright (c) 2020. Beautiful Code BV, Rotterdam, Netherlands
 * Licensed under GNU GENERAL PUBLIC LICENSE Version 3.
 */

use crate::actuator::Actuator;
use crate::clock::Clock;
use crate::motion::executor::MotionExecutor;
use crate::motion::AngleRange;
use crate::pattern::Pattern;
use log::{info, trace};

/// Plays whole patterns, always finishing at the rest angle.
pub struct PatternRunner<A, C> {
    executor: MotionExecutor<A, C>,
    range: AngleRange,
}

impl<A: Actuator, C: Clock> PatternRunner<A, C> {
    pub fn new(executor: MotionExecutor<A, C>, range: AngleRange) -> Self {
        Self { executor, range }
    }

    pub fn run_pattern(&mut self, pattern: &Pattern) {
        info!("Pattern: {}", pattern.name());
        let mut angle_now = self.range.rest;
        for step in pattern.moves() {
            let angle_target = match step.target {
                Some(fraction) => self.range.angle_at(fraction),
                None => angle_now,
            };
            trace!("move [{step}]: {angle_now} → {angle_target}");
            self.executor.execute_move(step.duration, angle_now, angle_target);
            angle_now = angle_target;
        }
        self.executor.execute_move(None, angle_now, self.range.rest);
    }

    pub fn range(&self) -> AngleRange {
        self.range
    }

    pub fn executor(&self) -> &MotionExecutor<A, C> {
        &self.executor
    }
}
