/*
 * Copyright (c) 2020. Beautiful Code BV, Rotterdam, Netherlands
 * Licensed under GNU GENERAL PUBLIC LICENSE Version 3.
 */

//! Settings of the box, with the values of the built unit as defaults.
//!
//! Any subset can be overridden from a JSON file:
//! ```json
//! { "rest_angle": 115.0, "servo": { "time_60_deg": 0.17 } }
//! ```

use crate::actuator::time_per_degree_from_60;
use crate::error::{ConfigError, ConfigResult};
use crate::motion::AngleRange;
use crate::pattern::PatternLibrary;
use crate::units::{Degrees, Seconds};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServoConfig {
    /// Seconds to travel 60°, unloaded (MG995: 0.17 at 4.8V, slower under load)
    pub time_60_deg: f64,
    pub frequency_hz: f64,
    /// Pulse width at 0°
    pub pulse_0_ms: f64,
    /// Pulse width at 180°
    pub pulse_180_ms: f64,
}

impl Default for ServoConfig {
    fn default() -> Self {
        Self {
            time_60_deg: 0.35,
            frequency_hz: 100.0,
            pulse_0_ms: 0.5,
            pulse_180_ms: 2.5,
        }
    }
}

impl ServoConfig {
    pub fn time_per_degree(&self) -> Seconds {
        time_per_degree_from_60(Seconds(self.time_60_deg))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SysfsConfig {
    pub pwm_chip: PathBuf,
    pub pwm_channel: u32,
    pub gpio_root: PathBuf,
    /// Switch input, active-high
    pub switch_gpio: u32,
    /// Power relay output, active-high
    pub power_gpio: u32,
}

impl Default for SysfsConfig {
    fn default() -> Self {
        Self {
            pwm_chip: PathBuf::from("/sys/class/pwm/pwmchip0"),
            pwm_channel: 0,
            gpio_root: PathBuf::from("/sys/class/gpio"),
            switch_gpio: 11,
            power_gpio: 12,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub servo: ServoConfig,
    /// Idle angle, also where the arm sits when power is cut
    pub rest_angle: f64,
    /// Angle that flips the switch off
    pub full_actuation_angle: f64,
    /// Power off if the switch is not flipped again within this time
    pub power_off_after: f64,
    pub tick: f64,
    pub time_scale: f64,
    pub seed: u32,
    pub sysfs: SysfsConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            servo: ServoConfig::default(),
            rest_angle: 120.0,
            full_actuation_angle: 17.0,
            power_off_after: 20.0,
            tick: 0.01,
            time_scale: 1.0,
            seed: 1,
            sysfs: SysfsConfig::default(),
        }
    }
}

fn invalid(name: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::InvalidSetting {
        name,
        reason: reason.into(),
    }
}

fn positive(name: &'static str, value: f64) -> ConfigResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(invalid(name, format!("{value} must be a positive number")))
    }
}

/// The clock must be able to wait this long.
fn wait(name: &'static str, value: Seconds) -> ConfigResult<()> {
    match value.try_to_duration() {
        Some(_) => Ok(()),
        None => Err(invalid(name, format!("{} is not a usable wait", value.0))),
    }
}

fn servo_angle(name: &'static str, value: f64) -> ConfigResult<()> {
    if (0.0..=180.0).contains(&value) {
        Ok(())
    } else {
        Err(invalid(name, format!("{value} is outside [0, 180]")))
    }
}

impl Config {
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn from_json(json: &str) -> ConfigResult<Self> {
        let config: Config = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        positive("servo.time_60_deg", self.servo.time_60_deg)?;
        positive("servo.frequency_hz", self.servo.frequency_hz)?;
        positive("servo.pulse_0_ms", self.servo.pulse_0_ms)?;
        if self.servo.pulse_180_ms <= self.servo.pulse_0_ms {
            return Err(invalid("servo.pulse_180_ms", "must exceed pulse_0_ms"));
        }
        servo_angle("rest_angle", self.rest_angle)?;
        servo_angle("full_actuation_angle", self.full_actuation_angle)?;
        wait("power_off_after", self.power_off_after())?;
        positive("tick", self.tick)?;
        wait("tick", self.tick())?;
        positive("time_scale", self.time_scale)?;
        // a full sweep is the longest fast move
        let sweep = Degrees(180.0) * self.servo.time_per_degree() * self.time_scale;
        wait("time_scale", sweep)?;
        Ok(())
    }

    /// Every timed move must still be a usable wait once stretched by `time_scale`.
    pub fn check_library(&self, library: &PatternLibrary) -> ConfigResult<()> {
        for pattern in library.iter() {
            for (index, step) in pattern.moves().iter().enumerate() {
                let Some(duration) = step.duration else { continue };
                if (duration * self.time_scale).try_to_duration().is_none() {
                    return Err(ConfigError::InvalidMove {
                        pattern: pattern.name().to_string(),
                        index,
                        reason: format!("{duration} stretched by {} is not a usable wait", self.time_scale),
                    });
                }
            }
        }
        Ok(())
    }

    pub fn angle_range(&self) -> AngleRange {
        AngleRange::new(Degrees(self.rest_angle), Degrees(self.full_actuation_angle))
    }

    pub fn tick(&self) -> Seconds {
        Seconds(self.tick)
    }

    pub fn power_off_after(&self) -> Seconds {
        Seconds(self.power_off_after)
    }
}
