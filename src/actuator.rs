/*
 * Copyright (c) 2020. Beautiful Code BV, Rotterdam, Netherlands
 * Licensed under GNU GENERAL PUBLIC LICENSE Version 3.
 */

//! Capability interfaces for the hardware the core drives.
//!
//! The motion core never knows whether it talks to a real servo or to a
//! stand-in; it only sees these traits. Concrete variants live in
//! [`crate::backend`] and are chosen once at startup.

use crate::units::{Degrees, Seconds};
use log::debug;

/// A positional servo.
pub trait Actuator {
    /// Command a new target angle.
    fn set_angle(&mut self, angle: Degrees);

    /// Maximum slew time per degree of travel.
    fn time_per_degree(&self) -> Seconds;
}

/// The activation switch and the power latch behind it.
pub trait Trigger {
    /// Block until activated or until `timeout` passes.
    /// Returns true when activated in time.
    fn await_activation(&mut self, timeout: Seconds) -> bool;

    /// Cut power. Never returns.
    fn power_off(&mut self) -> !;
}

/// Decorator that logs every angle command before passing it on.
#[derive(Debug, Clone)]
pub struct Logged<A> {
    inner: A,
}

impl<A: Actuator> Logged<A> {
    pub fn new(inner: A) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &A {
        &self.inner
    }
}

impl<A: Actuator> Actuator for Logged<A> {
    fn set_angle(&mut self, angle: Degrees) {
        debug!("set servo: {angle}");
        self.inner.set_angle(angle);
    }

    fn time_per_degree(&self) -> Seconds {
        self.inner.time_per_degree()
    }
}

/// Time-per-degree from the datasheet figure "seconds per 60°".
pub fn time_per_degree_from_60(time_60_deg: Seconds) -> Seconds {
    Seconds(time_60_deg.0 / 60.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::simulated::RecordingServo;
    use crate::units::{Deg, Sec};

    #[test]
    fn test_logged_passes_through() {
        let mut servo = Logged::new(RecordingServo::new(Sec(0.01)));
        servo.set_angle(Deg(42.0));
        servo.set_angle(Deg(17.0));
        assert_eq!(servo.time_per_degree(), Sec(0.01));
        assert_eq!(servo.inner().angles(), &[Deg(42.0), Deg(17.0)]);
    }

    #[test]
    fn test_time_per_degree_from_60() {
        let per_degree = time_per_degree_from_60(Sec(0.35));
        assert!((*per_degree - 0.35 / 60.0).abs() < 1e-15);
    }
}
