/*
 * Copyright (c) 2020. Beautiful Code BV, Rotterdam, Netherlands
 * Licensed under GNU GENERAL PUBLIC LICENSE Version 3.
 */

//! Pattern tables authored as JSON.
//!
//! ```json
//! [
//!   { "name": "simple_off", "moves": [[null, 1.0], [null, 0.0]] },
//!   { "name": "delayed_off", "moves": [[2.0, null], [null, 1.0], [null, 0.0]] }
//! ]
//! ```
//!
//! Each move is `[duration, fraction]`, where `null` duration means as fast
//! as possible and `null` fraction means hold. File order is table order.

use crate::error::ConfigResult;
use crate::pattern::{Move, Pattern, PatternLibrary};
use crate::units::{Fraction, Seconds};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct PatternEntry {
    name: String,
    moves: Vec<(Option<f64>, Option<f64>)>,
}

impl From<PatternEntry> for Pattern {
    fn from(entry: PatternEntry) -> Self {
        Pattern::new(
            entry.name,
            entry
                .moves
                .into_iter()
                .map(|(duration, target)| Move::new(duration.map(Seconds), target.map(Fraction))),
        )
    }
}

impl From<&Pattern> for PatternEntry {
    fn from(pattern: &Pattern) -> Self {
        Self {
            name: pattern.name().to_string(),
            moves: pattern
                .moves()
                .iter()
                .map(|step| (step.duration.map(|d| d.0), step.target.map(|t| t.0)))
                .collect(),
        }
    }
}

impl PatternLibrary {
    pub fn from_json(json: &str) -> ConfigResult<Self> {
        let entries: Vec<PatternEntry> = serde_json::from_str(json)?;
        Self::new(entries.into_iter().map(Pattern::from).collect())
    }

    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn to_json(&self) -> ConfigResult<String> {
        let entries: Vec<PatternEntry> = self.iter().map(PatternEntry::from).collect();
        Ok(serde_json::to_string_pretty(&entries)?)
    }
}
