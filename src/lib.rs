/*
 * Copyright (c) 2020. Beautiful Code BV, Rotterdam, Netherlands
 * Licensed under GNU GENERAL PUBLIC LICENSE Version 3.
 */

pub mod actuator;
pub mod backend;
pub mod clock;
pub mod config;
pub mod control_loop;
pub mod error;
pub mod motion;
pub mod pattern;
pub mod prng;
pub mod selector;
pub mod units;
