/*
 * Copyright (c) 2020. Beautiful Code BV, Rotterdam, Netherlands
 * Licensed under GNU GENERAL PUBLIC LICENSE Version 3.
 */

//! Stand-ins for the servo and switch, for running without the box.

use crate::actuator::{Actuator, Trigger};
use crate::motion::AngleRange;
use crate::units::{Degrees, Seconds};
use log::{debug, error, info, trace};
use std::collections::VecDeque;
use std::io::{BufRead, BufReader, Write};
use std::sync::mpsc::{channel, Receiver, RecvTimeoutError};
use std::thread;

/// Remembers every angle it was given.
#[derive(Debug, Clone, Default)]
pub struct RecordingServo {
    time_per_degree: Seconds,
    angles: Vec<Degrees>,
}

impl RecordingServo {
    pub fn new(time_per_degree: Seconds) -> Self {
        Self {
            time_per_degree,
            angles: Vec::new(),
        }
    }

    pub fn angles(&self) -> &[Degrees] {
        &self.angles
    }

    pub fn last(&self) -> Option<Degrees> {
        self.angles.last().copied()
    }
}

impl Actuator for RecordingServo {
    fn set_angle(&mut self, angle: Degrees) {
        self.angles.push(angle);
    }

    fn time_per_degree(&self) -> Seconds {
        self.time_per_degree
    }
}

const BAR_WIDTH: usize = 50;

/// Draws the arm position as a bar on a terminal line.
///
/// An empty bar is the arm at rest, a full bar is the arm on the switch.
pub struct TerminalServo<W> {
    out: W,
    range: AngleRange,
    time_per_degree: Seconds,
}

impl<W: Write> TerminalServo<W> {
    pub fn new(out: W, range: AngleRange, time_per_degree: Seconds) -> Self {
        Self {
            out,
            range,
            time_per_degree,
        }
    }

    pub fn render(&self, angle: Degrees) -> String {
        let reach = self.range.fraction_of(angle).0.clamp(0.0, 1.0);
        let filled = (reach * BAR_WIDTH as f64).round() as usize;
        format!(
            "\r[{}{}] {:>6.1}°",
            "#".repeat(filled),
            " ".repeat(BAR_WIDTH - filled),
            angle.0
        )
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Actuator for TerminalServo<W> {
    fn set_angle(&mut self, angle: Degrees) {
        let line = self.render(angle);
        if let Err(e) = self.out.write_all(line.as_bytes()).and_then(|_| self.out.flush()) {
            error!("Servo display error: {e}");
        }
    }

    fn time_per_degree(&self) -> Seconds {
        self.time_per_degree
    }
}

/// Replays a fixed sequence of activation outcomes, then times out forever.
#[derive(Debug, Clone, Default)]
pub struct ScriptedTrigger {
    script: VecDeque<bool>,
}

impl ScriptedTrigger {
    pub fn new(script: impl IntoIterator<Item = bool>) -> Self {
        Self {
            script: script.into_iter().collect(),
        }
    }

    /// Activate `count` times, then time out.
    pub fn activations(count: usize) -> Self {
        Self::new(std::iter::repeat(true).take(count))
    }

    pub fn remaining(&self) -> usize {
        self.script.len()
    }
}

impl Trigger for ScriptedTrigger {
    fn await_activation(&mut self, _timeout: Seconds) -> bool {
        self.script.pop_front().unwrap_or(false)
    }

    fn power_off(&mut self) -> ! {
        info!("Script finished, exiting");
        std::process::exit(0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Key {
    Activate,
    Quit,
}

/// Keyboard switch: an empty line (or space and enter) flips it, `q` quits.
pub struct StdinTrigger {
    keys: Receiver<Key>,
}

impl StdinTrigger {
    pub fn new() -> Self {
        Self::from_reader(BufReader::new(std::io::stdin()))
    }

    pub fn from_reader(reader: impl BufRead + Send + 'static) -> Self {
        let (tx, keys) = channel();
        thread::spawn(move || {
            for line in reader.lines() {
                let Ok(line) = line else { break };
                let key = match line.trim() {
                    "" => Key::Activate,
                    "q" | "Q" => Key::Quit,
                    other => {
                        trace!("ignoring input {other:?}");
                        continue;
                    }
                };
                if tx.send(key).is_err() {
                    break;
                }
            }
        });
        Self { keys }
    }
}

impl Default for StdinTrigger {
    fn default() -> Self {
        Self::new()
    }
}

impl Trigger for StdinTrigger {
    fn await_activation(&mut self, timeout: Seconds) -> bool {
        debug!("Waiting for enter, up to {timeout}");
        match self.keys.recv_timeout(timeout.to_duration()) {
            Ok(Key::Activate) => true,
            Ok(Key::Quit) => self.power_off(),
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => false,
        }
    }

    fn power_off(&mut self) -> ! {
        eprintln!();
        info!("Power off");
        std::process::exit(0)
    }
}
