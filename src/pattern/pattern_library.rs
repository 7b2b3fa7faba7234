/*
 * Copyright (c) 2020. Beautiful Code BV, Rotterdam, Netherlands
 * Licensed under GNU GENERAL PUBLIC LICENSE Version 3.
 */

use crate::pattern::pattern_dsl::*;
use crate::pattern::{Pattern, PatternLibrary};
use crate::units::Sec;
use strum::{Display, EnumIter, EnumString, IntoEnumIterator};

/// The patterns the box ships with, in table order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter)]
#[strum(serialize_all = "snake_case")]
pub enum PatternName {
    SimpleOff,
    DelayedOff,
    Teaser,
    Shy,
    Wiggle,
    #[strum(to_string = "pushpushpush")]
    PushPushPush,
}

impl PatternName {
    pub fn pattern(self) -> Pattern {
        let name = self.to_string();
        match self {
            PatternName::SimpleOff => pattern(name).moves([snap(1.0), snap(0.0)]).build(),
            PatternName::DelayedOff => pattern(name)
                .moves([pause(Sec(2.0)), snap(1.0), snap(0.0)])
                .build(),
            PatternName::Teaser => pattern(name)
                .moves([
                    pause(Sec(1.0)),
                    snap(0.5),
                    glide(Sec(1.0), 0.0),
                    glide(Sec(0.5), 0.9),
                    pause(Sec(2.0)),
                    snap(1.0),
                    snap(0.0),
                ])
                .build(),
            PatternName::Shy => pattern(name)
                .moves([
                    glide(Sec(1.0), 0.2),
                    pause(Sec(2.0)),
                    glide(Sec(1.0), 0.3),
                    pause(Sec(1.0)),
                    glide(Sec(1.0), 0.5),
                    pause(Sec(1.0)),
                    glide(Sec(1.0), 1.0),
                    glide(Sec(0.5), 0.0),
                ])
                .build(),
            PatternName::Wiggle => pattern(name)
                .then(glide(Sec(0.5), 0.5))
                .repeat(4, [glide(Sec(0.3), 0.7), glide(Sec(0.3), 0.5)])
                .moves([glide(Sec(1.0), 1.0), glide(Sec(0.5), 0.0)])
                .build(),
            // ends pressed against the switch; the runner brings it home
            PatternName::PushPushPush => pattern(name)
                .moves([
                    snap(0.8),
                    pause(Sec(1.0)),
                    glide(Sec(0.2), 1.0),
                    glide(Sec(0.2), 0.7),
                    glide(Sec(0.2), 0.96),
                    glide(Sec(0.2), 0.7),
                    glide(Sec(0.2), 0.96),
                ])
                .build(),
        }
    }
}

impl PatternLibrary {
    /// The built-in table, one entry per [`PatternName`].
    pub fn builtin() -> Self {
        Self {
            patterns: PatternName::iter().map(PatternName::pattern).collect(),
        }
    }
}
