//! Spinsim - STT-MRAM write pulse simulator
//!
//! Drives a single 1T-1MTJ cell (access transistor modeled as its on
//! resistance) with a rectangular bit-line pulse and reports whether the
//! free layer switched.
//!
//! # Usage
//!
//! ```bash
//! RUST_LOG=info spinsim --voltage 0.9 --width 5e-9 --trials 200 --thermal
//! ```

use std::ops::ControlFlow;

use clap::Parser;
use log::info;
use spinsim_core::{
    circuit::{Circuit, TransientDirective},
    components::{JunctionParams, Waveform},
    error::Result,
    magnetics::{LayerParams, ResistanceModel, StackParams},
    sweep::{self, TrialConfig},
    Simulator, SimulatorConfig, Vec3,
};

/// STT-MRAM write pulse simulator
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Bit-line pulse amplitude in V
    #[arg(short, long, default_value_t = 0.9)]
    voltage: f64,

    /// Pulse width in s
    #[arg(short, long, default_value_t = 5.0e-9)]
    width: f64,

    /// Access transistor on resistance in Ω
    #[arg(long, default_value_t = 1.0e3)]
    series_resistance: f64,

    /// Junction diameter in m
    #[arg(long, default_value_t = 50.0e-9)]
    diameter: f64,

    /// Parallel resistance-area product in Ω·µm²
    #[arg(long, default_value_t = 5.0)]
    ra: f64,

    /// TMR ratio in percent
    #[arg(long, default_value_t = 150.0)]
    tmr: f64,

    /// Free-layer Gilbert damping
    #[arg(long, default_value_t = 0.01)]
    damping: f64,

    /// Time step in s
    #[arg(long, default_value_t = 1.0e-12)]
    dt: f64,

    /// Enable the thermal field
    #[arg(long)]
    thermal: bool,

    /// Noise seed (trial i uses seed + i)
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Number of independent trials; more than one reports a write error rate
    #[arg(short, long, default_value_t = 1)]
    trials: usize,
}

/// Free layer starts antiparallel, slightly tilted so the torque can act at 0 K.
fn write_cell(args: &Args) -> Result<Circuit> {
    let tilt: f64 = 0.05;
    let stack = StackParams::default()
        .with_free(LayerParams::cofeb_free().with_damping(args.damping))
        .with_initial_free(Vec3::new(tilt.sin(), 0.0, -tilt.cos()));
    let params = JunctionParams::default()
        .with_diameter(args.diameter)
        .with_resistance(ResistanceModel::Tmr {
            ra_parallel: args.ra * 1.0e-12,
            ratio: args.tmr / 100.0,
        })
        .with_stack(stack);

    let mut circuit = Circuit::new();
    circuit.add_voltage_source(
        "VBL",
        "bl",
        "0",
        Waveform::Pulse {
            initial: 0.0,
            pulsed: args.voltage,
            delay: 0.1e-9,
            rise: 50.0e-12,
            fall: 50.0e-12,
            width: args.width,
            period: 0.0,
        },
    );
    circuit.add_resistor("RACC", "bl", "free", args.series_resistance);
    circuit.add_junction("MTJ1", "free", "0", params);

    let stop = 0.1e-9 + args.width + 1.0e-9;
    Ok(circuit.with_transient(TransientDirective::new(stop, args.dt)))
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let circuit = write_cell(&args)?;
    let directive = circuit
        .transient
        .unwrap_or_else(|| TransientDirective::new(args.width, args.dt));
    let config = SimulatorConfig::default()
        .with_thermal_noise(args.thermal)
        .with_seed(args.seed);

    if args.trials > 1 {
        let trials = TrialConfig::default()
            .with_trials(args.trials)
            .with_base_seed(args.seed)
            .with_dt(args.dt)
            .with_max_steps((directive.stop / args.dt).ceil() as usize)
            .with_simulator(config.with_history_capacity(0));
        let outcomes = sweep::run_switching_trials(
            &trials,
            |_| write_cell(&args),
            |sim| sim.junctions()[0].stack.free.z > 0.9,
        )?;
        println!("trials:           {}", outcomes.len());
        println!("write error rate: {:.4}", sweep::write_error_rate(&outcomes));
        match sweep::mean_switching_time(&outcomes) {
            Some(t) => println!("mean switch time: {:.3} ns", t * 1.0e9),
            None => println!("mean switch time: -"),
        }
        return Ok(());
    }

    let mut simulator = Simulator::with_config(circuit, config);
    simulator.initialize()?;
    let r_initial = simulator.junctions()[0].resistance;

    let mut switched_at = None;
    let summary = simulator.run(&directive, |result| {
        if switched_at.is_none() && result.magnetizations[0].z > 0.9 {
            switched_at = Some(result.time);
        }
        ControlFlow::Continue(())
    })?;
    info!(
        "{} steps, {} Newton iterations",
        summary.steps, summary.iterations
    );

    let junction = &simulator.junctions()[0];
    println!("simulated time:   {:.3} ns", summary.final_time * 1.0e9);
    println!("initial R:        {:.1} Ω", r_initial);
    println!("final R:          {:.1} Ω", junction.resistance);
    println!(
        "final m_free:     ({:.3}, {:.3}, {:.3})",
        junction.stack.free.x, junction.stack.free.y, junction.stack.free.z
    );
    match switched_at {
        Some(t) => println!("switched at:      {:.3} ns", t * 1.0e9),
        None => println!("switched at:      -"),
    }
    Ok(())
}
