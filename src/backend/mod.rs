/*
 * Copyright (c) 2020. Beautiful Code BV, Rotterdam, Netherlands
 * Licensed under GNU GENERAL PUBLIC LICENSE Version 3.
 */

//! Concrete servos and switches, chosen at startup.

pub mod simulated;
pub mod sysfs;
