/*
 * Copyright (c) 2020. Beautiful Code BV, Rotterdam, Netherlands
 * Licensed under GNU GENERAL PUBLIC LICENSE Version 3.
 */

//! Small builder vocabulary for authoring patterns in code.
//!
//! ```ignore
//! pattern("wiggle")
//!     .then(glide(Sec(0.5), 0.5))
//!     .repeat(4, [glide(Sec(0.3), 0.7), glide(Sec(0.3), 0.5)])
//!     .moves([glide(Sec(1.0), 1.0), glide(Sec(0.5), 0.0)])
//!     .build()
//! ```

use crate::pattern::{Move, Pattern};
use crate::units::{Fraction, Seconds};

/// Move to `target` as fast as the servo allows.
pub fn snap(target: f64) -> Move {
    Move::new(None, Some(Fraction(target)))
}

/// Move to `target` linearly over `duration`.
pub fn glide(duration: Seconds, target: f64) -> Move {
    Move::new(Some(duration), Some(Fraction(target)))
}

/// Stay put for `duration`.
pub fn pause(duration: Seconds) -> Move {
    Move::new(Some(duration), None)
}

pub fn pattern(name: impl Into<String>) -> PatternBuilder {
    PatternBuilder {
        name: name.into(),
        moves: Vec::new(),
    }
}

pub struct PatternBuilder {
    name: String,
    moves: Vec<Move>,
}

impl PatternBuilder {
    pub fn then(mut self, step: Move) -> Self {
        self.moves.push(step);
        self
    }

    pub fn moves(mut self, steps: impl IntoIterator<Item = Move>) -> Self {
        self.moves.extend(steps);
        self
    }

    pub fn repeat<const N: usize>(mut self, times: usize, steps: [Move; N]) -> Self {
        for _ in 0..times {
            self.moves.extend_from_slice(&steps);
        }
        self
    }

    pub fn build(self) -> Pattern {
        Pattern::new(self.name, self.moves)
    }
}
