/*
 * Copyright (c) 2020. Beautiful Code BV, Rotterdam, Netherlands
 * Licensed under GNU GENERAL PUBLIC LICENSE Version 3.
 */

pub mod executor;
pub mod runner;

use crate::units::{Degrees, Fraction};

/// Maps a pattern fraction onto the servo's travel.
///
/// Fraction 0 is the idle (rest) angle, fraction 1 presses the switch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AngleRange {
    pub rest: Degrees,
    pub full_actuation: Degrees,
}

impl AngleRange {
    pub fn new(rest: Degrees, full_actuation: Degrees) -> Self {
        Self {
            rest,
            full_actuation,
        }
    }

    pub fn angle_at(&self, fraction: Fraction) -> Degrees {
        self.rest + (self.full_actuation - self.rest) * fraction.0
    }

    /// Inverse of [`angle_at`](AngleRange::angle_at).
    pub fn fraction_of(&self, angle: Degrees) -> Fraction {
        let travel = self.full_actuation - self.rest;
        if travel.0 == 0.0 {
            Fraction(0.0)
        } else {
            Fraction((angle - self.rest).0 / travel.0)
        }
    }
}
