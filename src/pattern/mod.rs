/*
 * Copyright (c) 2020. Beautiful Code BV, Rotterdam, Netherlands
 * Licensed under GNU GENERAL PUBLIC LICENSE Version 3.
 */

pub mod pattern_dsl;
pub mod pattern_file;
pub mod pattern_library;

use crate::error::{ConfigError, ConfigResult};
use crate::units::{Fraction, Seconds};
use std::collections::HashSet;
use std::fmt::{Display, Formatter};

/// One step of a pattern.
///
/// No duration means "as fast as the servo allows", no target means
/// "stay where you are".
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Move {
    pub duration: Option<Seconds>,
    pub target: Option<Fraction>,
}

impl Move {
    pub fn new(duration: Option<Seconds>, target: Option<Fraction>) -> Self {
        Self { duration, target }
    }

    /// Reason this move cannot be executed, if any.
    pub fn problem(&self) -> Option<String> {
        if let Some(duration) = self.duration {
            if duration.try_to_duration().is_none() {
                return Some(format!("duration {} is not a usable wait", *duration));
            }
        }
        if let Some(target) = self.target {
            if !target.is_valid() {
                return Some(format!("target {} is outside [0, 1]", *target));
            }
        }
        None
    }
}

impl Display for Move {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.duration {
            Some(duration) => write!(f, "{duration}")?,
            None => write!(f, "fast")?,
        }
        match self.target {
            Some(target) => write!(f, " → {target}"),
            None => write!(f, " hold"),
        }
    }
}

/// A named, ordered routine of moves.
#[derive(Debug, Clone, PartialEq)]
pub struct Pattern {
    name: String,
    moves: Vec<Move>,
}

impl Pattern {
    pub fn new(name: impl Into<String>, moves: impl IntoIterator<Item = Move>) -> Self {
        Self {
            name: name.into(),
            moves: moves.into_iter().collect(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn moves(&self) -> &[Move] {
        &self.moves
    }

    fn validate(&self) -> ConfigResult<()> {
        if self.name.is_empty() {
            return Err(ConfigError::EmptyName);
        }
        for (index, step) in self.moves.iter().enumerate() {
            if let Some(reason) = step.problem() {
                return Err(ConfigError::InvalidMove {
                    pattern: self.name.clone(),
                    index,
                    reason,
                });
            }
        }
        Ok(())
    }
}

impl Display for Pattern {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:", self.name)?;
        for step in &self.moves {
            write!(f, " [{step}]")?;
        }
        Ok(())
    }
}

/// The pattern table. Position in the table is the pattern's identity
/// for usage counting, and the first entry is the cold-start choice.
#[derive(Debug, Clone, PartialEq)]
pub struct PatternLibrary {
    patterns: Vec<Pattern>,
}

impl PatternLibrary {
    pub fn new(patterns: Vec<Pattern>) -> ConfigResult<Self> {
        if patterns.is_empty() {
            return Err(ConfigError::EmptyLibrary);
        }
        let mut names = HashSet::new();
        for pattern in &patterns {
            pattern.validate()?;
            if !names.insert(pattern.name()) {
                return Err(ConfigError::DuplicatePattern(pattern.name.clone()));
            }
        }
        Ok(Self { patterns })
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Pattern> {
        self.patterns.get(index)
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.patterns.iter().position(|pattern| pattern.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Pattern> {
        self.patterns.iter()
    }
}

impl std::ops::Index<usize> for PatternLibrary {
    type Output = Pattern;

    fn index(&self, index: usize) -> &Self::Output {
        &self.patterns[index]
    }
}
