/*
 * Copyright (c) 2020. Beautiful Code BV, Rotterdam, Netherlands
 * Licensed under GNU GENERAL PUBLIC LICENSE Version 3.
 */

//! Physical units for the servo arm
//!
//! Type-safe wrappers for the quantities that flow between the pattern
//! table, the motion executor and the actuator, so that a duration can
//! never be passed where an angle is expected.

use std::ops::{Add, Deref, Mul, Sub};
use std::time::Duration;

/// Time in seconds
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
pub struct Seconds(pub f64);

/// Servo angle in degrees
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
pub struct Degrees(pub f64);

/// Position between idle (0.0) and fully actuated (1.0)
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
pub struct Fraction(pub f64);

/// Interpolation tick of the motion executor
pub const TICK: Seconds = Seconds(0.01);

/// Seconds helper for the pattern DSL.
#[allow(non_snake_case)]
pub fn Sec(seconds: f64) -> Seconds {
    Seconds(seconds)
}

/// Degrees helper for the pattern DSL.
#[allow(non_snake_case)]
pub fn Deg(degrees: f64) -> Degrees {
    Degrees(degrees)
}

impl Deref for Seconds {
    type Target = f64;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Deref for Degrees {
    type Target = f64;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Deref for Fraction {
    type Target = f64;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Seconds {
    pub fn to_duration(self) -> Duration {
        Duration::from_secs_f64(self.0)
    }

    /// `None` for negative, non-finite or too large values.
    pub fn try_to_duration(self) -> Option<Duration> {
        Duration::try_from_secs_f64(self.0).ok()
    }

    pub fn from_duration(duration: Duration) -> Self {
        Self(duration.as_secs_f64())
    }

    pub fn to_millis(self) -> f64 {
        self.0 * 1000.0
    }
}

impl Degrees {
    pub fn abs(self) -> Self {
        Self(self.0.abs())
    }
}

impl Fraction {
    pub fn is_valid(self) -> bool {
        (0.0..=1.0).contains(&self.0)
    }
}

impl Mul<f64> for Seconds {
    type Output = Seconds;
    fn mul(self, rhs: f64) -> Self::Output {
        Seconds(self.0 * rhs)
    }
}

impl Add for Degrees {
    type Output = Degrees;
    fn add(self, rhs: Self) -> Self::Output {
        Degrees(self.0 + rhs.0)
    }
}

impl Sub for Degrees {
    type Output = Degrees;
    fn sub(self, rhs: Self) -> Self::Output {
        Degrees(self.0 - rhs.0)
    }
}

impl Mul<f64> for Degrees {
    type Output = Degrees;
    fn mul(self, rhs: f64) -> Self::Output {
        Degrees(self.0 * rhs)
    }
}

/// Slew time for a travel: degrees × seconds-per-degree = seconds
impl Mul<Seconds> for Degrees {
    type Output = Seconds;
    fn mul(self, rhs: Seconds) -> Self::Output {
        Seconds(self.0 * rhs.0)
    }
}

impl std::fmt::Display for Seconds {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.3}s", self.0)
    }
}

impl std::fmt::Display for Degrees {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.1}°", self.0)
    }
}

impl std::fmt::Display for Fraction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}
