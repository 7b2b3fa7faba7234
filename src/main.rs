/*
 * Copyright (c) 2020. Beautiful Code BV, Rotterdam, Netherlands
 * Licensed under GNU GENERAL PUBLIC LICENSE Version 3.
 */

use clap::{ArgAction, Parser, ValueEnum};
use log::info;
use std::error::Error;
use std::io;
use std::path::PathBuf;

use useless_box::actuator::{Actuator, Logged, Trigger};
use useless_box::backend::simulated::{ScriptedTrigger, StdinTrigger, TerminalServo};
use useless_box::backend::sysfs::{SysfsServo, SysfsSwitch};
use useless_box::clock::{Clock, SimulatedClock, SystemClock, Ticker};
use useless_box::config::Config;
use useless_box::control_loop::{Activation, ControlLoopContext};
use useless_box::motion::executor::MotionExecutor;
use useless_box::motion::runner::PatternRunner;
use useless_box::pattern::PatternLibrary;
use useless_box::prng::Xorshift32;
use useless_box::units::Seconds;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Backend {
    /// Bar on the terminal, enter flips the switch
    Simulated,
    /// Servo on Linux PWM, switch and relay on GPIO
    Sysfs,
}

#[derive(Parser, Debug)]
#[command(author, version, about = "A box whose only purpose is to switch itself off", long_about = None)]
struct Args {
    /// JSON settings file, missing fields keep their defaults
    #[arg(long)]
    config: Option<PathBuf>,

    /// JSON pattern table replacing the built-in one
    #[arg(long)]
    patterns: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = Backend::Simulated)]
    backend: Backend,

    /// Initial generator seed
    #[arg(long)]
    seed: Option<u32>,

    /// Stretch (> 1) or compress (< 1) every wait
    #[arg(long)]
    time_scale: Option<f64>,

    /// Play N activations on a simulated clock and report pattern usage
    #[arg(long, value_name = "N")]
    simulate: Option<usize>,

    /// Print the pattern table and exit
    #[arg(long)]
    list: bool,

    /// With --list, print the table as a pattern file
    #[arg(long, requires = "list")]
    json: bool,

    /// More logging, -v for debug, -vv for trace
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    let level = match args.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let mut config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    if let Some(time_scale) = args.time_scale {
        config.time_scale = time_scale;
    }
    config.validate()?;

    let library = match &args.patterns {
        Some(path) => PatternLibrary::load(path)?,
        None => PatternLibrary::builtin(),
    };
    config.check_library(&library)?;

    if args.list && args.json {
        println!("{}", library.to_json()?);
        return Ok(());
    }
    if args.list {
        for (index, pattern) in library.iter().enumerate() {
            println!("{index:>2} {pattern}");
        }
        return Ok(());
    }

    if let Some(activations) = args.simulate {
        simulate(&config, library, activations);
        return Ok(());
    }

    match args.backend {
        Backend::Simulated => {
            let servo = TerminalServo::new(
                io::stderr(),
                config.angle_range(),
                config.servo.time_per_degree(),
            );
            info!("Enter flips the switch, q pulls the plug");
            control_loop(&config, library, Logged::new(servo), StdinTrigger::new(), SystemClock::new()).run()
        }
        Backend::Sysfs => {
            let servo = SysfsServo::open(&config.sysfs, &config.servo)?;
            let switch = SysfsSwitch::open(&config.sysfs, SystemClock::new())?;
            control_loop(&config, library, Logged::new(servo), switch, SystemClock::new()).run()
        }
    }
}

fn control_loop<A: Actuator, T: Trigger, C: Clock>(
    config: &Config,
    library: PatternLibrary,
    actuator: A,
    trigger: T,
    clock: C,
) -> ControlLoopContext<A, T, C> {
    let executor = MotionExecutor::new(actuator, clock)
        .with_ticker(Ticker::new(config.tick()))
        .with_time_scale(config.time_scale);
    let runner = PatternRunner::new(executor, config.angle_range());
    ControlLoopContext::new(
        library,
        runner,
        trigger,
        Xorshift32::new(config.seed),
        config.power_off_after(),
    )
}

fn simulate(config: &Config, library: PatternLibrary, activations: usize) {
    let servo = TerminalServo::new(io::sink(), config.angle_range(), config.servo.time_per_degree());
    let clock = SimulatedClock::new();
    let trigger = ScriptedTrigger::activations(activations);
    let mut control = control_loop(config, library, Logged::new(servo), trigger, clock.clone());
    while let Activation::Triggered { .. } = control.step() {}

    let usage = control.usage();
    println!("{:<16} {:>8} {:>7}", "pattern", "runs", "share");
    for (pattern, &count) in control.library().iter().zip(usage.counts()) {
        let share = 100.0 * count as f64 / usage.total() as f64;
        println!("{:<16} {:>8} {:>6.1}%", pattern.name(), count, share);
    }
    if let Some(balance) = usage.balance() {
        println!(
            "balance {balance:.3} after {} runs, {} of arm time",
            usage.total(),
            Seconds::from_duration(clock.now())
        );
    }
}
