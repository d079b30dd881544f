//! # Spinsim Core
//!
//! A transient simulator for spintronic devices: magnetic tunnel junctions
//! embedded in a resistor/capacitor/inductor network.
//!
//! This library provides:
//! - A programmatic circuit builder (topology + component list)
//! - Modified Nodal Analysis (MNA) based circuit simulation
//! - Magnetoresistance models (explicit TMR, Julliere, Valet-Fert CPP-GMR)
//! - Landau-Lifshitz-Gilbert magnetization dynamics with spin-transfer and
//!   spin-orbit torques and optional thermal noise
//! - Parallel Monte-Carlo switching trials across independent simulators
//!
//! ## Architecture
//!
//! - [`circuit`] - Circuit graph representation and validation
//! - [`components`] - Component models and their MNA stamps
//! - [`magnetics`] - Resistance laws, effective fields, torques, LLG integration
//! - [`solver`] - MNA assembly, Newton-Raphson, and the co-simulation orchestrator
//! - [`sweep`] - Independent trials and parameter sweeps
//!
//! ## Usage
//!
//! ```no_run
//! use spinsim_core::circuit::Circuit;
//! use spinsim_core::components::{JunctionParams, Waveform};
//! use spinsim_core::Simulator;
//!
//! let mut circuit = Circuit::new();
//! circuit.add_voltage_source("V1", "bl", "0", Waveform::Dc(0.4));
//! circuit.add_resistor("R1", "bl", "top", 1e3);
//! circuit.add_junction("MTJ1", "top", "0", JunctionParams::default());
//!
//! let mut sim = Simulator::new(circuit);
//! sim.initialize()?;
//! for _ in 0..1000 {
//!     sim.step(1e-12)?;
//! }
//! # Ok::<(), spinsim_core::SpinSimError>(())
//! ```
//!
//! ## Simulation Method
//!
//! For each time step dt:
//!
//! 1. Assemble the conductance matrix J and source vector b at the present guess
//! 2. Add the backward-Euler storage term C/dt and solve for the new state
//! 3. Repeat (Newton-Raphson) until the state stops changing
//! 4. Convert each junction's voltage to a current density and torque
//! 5. Advance every magnetic layer by one LLG step and renormalize

pub mod circuit;
pub mod components;
pub mod error;
pub mod magnetics;
pub mod solver;
pub mod sweep;

// Re-export main types for convenience
pub use circuit::Circuit;
pub use error::{Result, SpinSimError};
pub use magnetics::Vec3;
pub use solver::{Simulator, SimulatorConfig};

/// Electron gyromagnetic ratio in rad/(s·T)
pub const GYROMAGNETIC_RATIO: f64 = 1.760_859_630e11;

/// Vacuum permeability in T·m/A
pub const MU0: f64 = 1.256_637_062e-6;

/// Boltzmann constant in J/K
pub const BOLTZMANN: f64 = 1.380_649e-23;

/// Elementary charge in C
pub const ELEMENTARY_CHARGE: f64 = 1.602_176_634e-19;

/// Reduced Planck constant in J·s
pub const HBAR: f64 = 1.054_571_817e-34;
