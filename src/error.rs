/*
 * Copyright (c) 2020. Beautiful Code BV, Rotterdam, Netherlands
 * Licensed under GNU GENERAL PUBLIC LICENSE Version 3.
 */

use thiserror::Error;

/// Everything the loading layer can reject before the arm moves.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid setting {name}: {reason}")]
    InvalidSetting { name: &'static str, reason: String },

    #[error("Pattern {pattern:?}, move {index}: {reason}")]
    InvalidMove {
        pattern: String,
        index: usize,
        reason: String,
    },

    #[error("Pattern name must not be empty")]
    EmptyName,

    #[error("Duplicate pattern name {0:?}")]
    DuplicatePattern(String),

    #[error("Pattern table is empty")]
    EmptyLibrary,
}

pub type ConfigResult<T> = Result<T, ConfigError>;
