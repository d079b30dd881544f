//! MNA (Modified Nodal Analysis) solver and co-simulation orchestrator.
//!
//! ## Modified Nodal Analysis
//!
//! Each step solves a system of the form
//! ```text
//! (G(x) + C/dt) · x = b(t) + (C/dt) · x_prev
//! ```
//! where:
//! - x contains node voltages (ground excluded) followed by branch currents
//! - G is the conductance/incidence matrix; junction conductances depend on
//!   their own bias, so G is re-linearized by Newton-Raphson
//! - C is the constant storage matrix (capacitances, and -L on inductor
//!   branch rows)
//! - b holds the independent sources evaluated at the solve time
//!
//! Dropping C gives the DC operating point.

mod history;
mod mna;
mod newton;
mod simulator;

pub use history::{History, Sample};
pub use mna::{assemble, build_capacitance, CapacitanceMatrix, MnaMatrix};
pub use newton::{NewtonOutcome, NewtonRaphson, TransientTerm};
pub use simulator::{
    JunctionState, RunSummary, Simulator, SimulatorConfig, SimulatorStatus, StepResult,
};

/// Default convergence tolerance on ‖x_next - x_guess‖₂.
pub const DEFAULT_TOLERANCE: f64 = 1e-6;

/// Default maximum Newton-Raphson iterations per solve.
pub const DEFAULT_MAX_ITERATIONS: usize = 20;

/// Shunt conductance from every node to ground.
pub const MIN_CONDUCTANCE: f64 = 1e-12;

/// Default number of history samples kept.
pub const DEFAULT_HISTORY_CAPACITY: usize = 10_000;
