/*
 * Copyright (c) 2020. Beautiful Code BV, Rotterdam, Netherlands
 * Licensed under GNU GENERAL PUBLIC LICENSE Version 3.
 */

//! Servo and switch on a Linux board through the PWM and GPIO sysfs trees.
//!
//! The servo is driven with a standard hobby-servo pulse:
//! `pulse_0_ms` at 0°, `pulse_180_ms` at 180°, repeated at `frequency_hz`.

use crate::actuator::{Actuator, Trigger};
use crate::clock::{Clock, Ticker};
use crate::config::{ServoConfig, SysfsConfig};
use crate::units::{Degrees, Seconds};
use log::{debug, error, info, trace};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

const NANOS_PER_MILLI: f64 = 1_000_000.0;
const NANOS_PER_SECOND: f64 = 1_000_000_000.0;

/// Angle to pulse width mapping of a hobby servo.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PulseMapping {
    pub frequency_hz: f64,
    pub pulse_0_ms: f64,
    pub pulse_180_ms: f64,
}

impl From<&ServoConfig> for PulseMapping {
    fn from(servo: &ServoConfig) -> Self {
        Self {
            frequency_hz: servo.frequency_hz,
            pulse_0_ms: servo.pulse_0_ms,
            pulse_180_ms: servo.pulse_180_ms,
        }
    }
}

impl PulseMapping {
    pub fn period_ns(&self) -> u64 {
        (NANOS_PER_SECOND / self.frequency_hz).round() as u64
    }

    /// Angles beyond the servo's travel are clamped to `[0, 180]`.
    pub fn pulse_ns(&self, angle: Degrees) -> u64 {
        let degrees = angle.0.clamp(0.0, 180.0);
        let per_degree_ms = (self.pulse_180_ms - self.pulse_0_ms) / 180.0;
        ((self.pulse_0_ms + per_degree_ms * degrees) * NANOS_PER_MILLI).round() as u64
    }
}

fn write_attribute(path: &Path, value: impl ToString) -> io::Result<()> {
    trace!("{} <- {}", path.display(), value.to_string());
    fs::write(path, value.to_string())
}

/// Export `number` under `root` unless its directory already exists.
fn export(root: &Path, directory: &Path, number: u32) -> io::Result<()> {
    if !directory.exists() {
        debug!("exporting {} under {}", number, root.display());
        write_attribute(&root.join("export"), number)?;
    }
    Ok(())
}

/// Servo on a PWM channel.
pub struct SysfsServo {
    channel: PathBuf,
    pulse: PulseMapping,
    time_per_degree: Seconds,
}

impl SysfsServo {
    pub fn open(sysfs: &SysfsConfig, servo: &ServoConfig) -> io::Result<Self> {
        let channel = sysfs.pwm_chip.join(format!("pwm{}", sysfs.pwm_channel));
        export(&sysfs.pwm_chip, &channel, sysfs.pwm_channel)?;
        let pulse = PulseMapping::from(servo);
        write_attribute(&channel.join("period"), pulse.period_ns())?;
        write_attribute(&channel.join("duty_cycle"), 0)?;
        write_attribute(&channel.join("enable"), 1)?;
        info!("Servo on {}", channel.display());
        Ok(Self {
            channel,
            pulse,
            time_per_degree: servo.time_per_degree(),
        })
    }
}

impl Actuator for SysfsServo {
    fn set_angle(&mut self, angle: Degrees) {
        let duty = self.pulse.pulse_ns(angle);
        if let Err(e) = write_attribute(&self.channel.join("duty_cycle"), duty) {
            error!("Servo error: {e}");
        }
    }

    fn time_per_degree(&self) -> Seconds {
        self.time_per_degree
    }
}

/// Polling period for the switch input.
const SWITCH_POLL: Seconds = Seconds(0.001);

/// The activation switch and the relay that holds the power on.
pub struct SysfsSwitch<C> {
    switch: PathBuf,
    power: PathBuf,
    clock: C,
    ticker: Ticker,
}

impl<C: Clock> SysfsSwitch<C> {
    pub fn open(sysfs: &SysfsConfig, clock: C) -> io::Result<Self> {
        let switch = sysfs.gpio_root.join(format!("gpio{}", sysfs.switch_gpio));
        let power = sysfs.gpio_root.join(format!("gpio{}", sysfs.power_gpio));
        export(&sysfs.gpio_root, &switch, sysfs.switch_gpio)?;
        export(&sysfs.gpio_root, &power, sysfs.power_gpio)?;
        write_attribute(&switch.join("direction"), "in")?;
        // low keeps the relay released; the switch itself holds the power
        write_attribute(&power.join("direction"), "out")?;
        write_attribute(&power.join("value"), 0)?;
        Ok(Self {
            switch,
            power,
            clock,
            ticker: Ticker::new(SWITCH_POLL),
        })
    }

    pub fn is_pressed(&self) -> bool {
        read_switch(&self.switch.join("value"))
    }
}

/// A switch that cannot be read counts as not pressed.
fn read_switch(value: &Path) -> bool {
    match fs::read_to_string(value) {
        Ok(level) => level.trim() == "1",
        Err(e) => {
            error!("Switch error: {e}");
            false
        }
    }
}

impl<C: Clock> Trigger for SysfsSwitch<C> {
    fn await_activation(&mut self, timeout: Seconds) -> bool {
        debug!("Waiting for switch, up to {timeout}");
        let Self {
            switch,
            clock,
            ticker,
            ..
        } = self;
        let value = switch.join("value");
        ticker.poll_for(clock, timeout, |_| read_switch(&value)) || read_switch(&value)
    }

    fn power_off(&mut self) -> ! {
        // drive the relay, then float the pin in case driving is not enough
        if let Err(e) = write_attribute(&self.power.join("value"), 1)
            .and_then(|_| write_attribute(&self.power.join("direction"), "in"))
        {
            error!("Power relay error: {e}");
        }
        std::process::exit(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::SimulatedClock;
    use crate::units::{Deg, Sec};
    use std::time::Duration;

    fn sysfs_in(root: &Path) -> SysfsConfig {
        SysfsConfig {
            pwm_chip: root.join("pwmchip0"),
            gpio_root: root.join("gpio"),
            ..SysfsConfig::default()
        }
    }

    fn read(path: PathBuf) -> String {
        fs::read_to_string(path).unwrap()
    }

    #[test]
    fn test_pulse_mapping() {
        let pulse = PulseMapping::from(&ServoConfig::default());
        assert_eq!(pulse.period_ns(), 10_000_000);
        assert_eq!(pulse.pulse_ns(Deg(0.0)), 500_000);
        assert_eq!(pulse.pulse_ns(Deg(90.0)), 1_500_000);
        assert_eq!(pulse.pulse_ns(Deg(180.0)), 2_500_000);
        assert_eq!(pulse.pulse_ns(Deg(120.0)), 1_833_333);
        assert_eq!(pulse.pulse_ns(Deg(-10.0)), 500_000);
        assert_eq!(pulse.pulse_ns(Deg(200.0)), 2_500_000);
    }

    #[test]
    fn test_servo_writes_duty_cycle() {
        let root = tempfile::tempdir().unwrap();
        let sysfs = sysfs_in(root.path());
        fs::create_dir_all(sysfs.pwm_chip.join("pwm0")).unwrap();

        let mut servo = SysfsServo::open(&sysfs, &ServoConfig::default()).unwrap();
        let channel = sysfs.pwm_chip.join("pwm0");
        assert_eq!(read(channel.join("period")), "10000000");
        assert_eq!(read(channel.join("enable")), "1");
        assert!(!sysfs.pwm_chip.join("export").exists());

        servo.set_angle(Deg(90.0));
        assert_eq!(read(channel.join("duty_cycle")), "1500000");
    }

    #[test]
    fn test_servo_exports_missing_channel() {
        let root = tempfile::tempdir().unwrap();
        let sysfs = sysfs_in(root.path());
        fs::create_dir_all(&sysfs.pwm_chip).unwrap();
        // a real kernel creates pwm0/ on export; a plain directory cannot
        assert!(SysfsServo::open(&sysfs, &ServoConfig::default()).is_err());
        assert_eq!(read(sysfs.pwm_chip.join("export")), "0");
    }

    fn switch_tree(root: &Path, switch_value: &str) -> SysfsConfig {
        let sysfs = sysfs_in(root);
        for gpio in ["gpio11", "gpio12"] {
            fs::create_dir_all(sysfs.gpio_root.join(gpio)).unwrap();
        }
        fs::write(sysfs.gpio_root.join("gpio11").join("value"), switch_value).unwrap();
        sysfs
    }

    #[test]
    fn test_switch_pressed() {
        let root = tempfile::tempdir().unwrap();
        let sysfs = switch_tree(root.path(), "1\n");
        let clock = SimulatedClock::new();
        let mut switch = SysfsSwitch::open(&sysfs, clock.clone()).unwrap();
        assert_eq!(read(sysfs.gpio_root.join("gpio11").join("direction")), "in");
        assert_eq!(read(sysfs.gpio_root.join("gpio12").join("direction")), "out");
        assert_eq!(read(sysfs.gpio_root.join("gpio12").join("value")), "0");
        assert!(switch.is_pressed());
        assert!(switch.await_activation(Sec(20.0)));
        assert_eq!(clock.now(), Duration::ZERO);
    }

    #[test]
    fn test_switch_times_out() {
        let root = tempfile::tempdir().unwrap();
        let sysfs = switch_tree(root.path(), "0\n");
        let clock = SimulatedClock::new();
        let mut switch = SysfsSwitch::open(&sysfs, clock.clone()).unwrap();
        assert!(!switch.is_pressed());
        assert!(!switch.await_activation(Sec(0.05)));
        assert_eq!(clock.now(), Duration::from_millis(50));
    }
}
