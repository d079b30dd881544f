//! Newton-Raphson iteration for the junction nonlinearity.
//!
//! Each iteration re-linearizes every junction at the present guess (its
//! conductance depends on its own bias) and solves the resulting linear
//! system. Iteration stops when successive solutions agree in the
//! Euclidean norm.

use log::debug;

use super::mna::{assemble, CapacitanceMatrix, MnaMatrix};
use super::{DEFAULT_MAX_ITERATIONS, DEFAULT_TOLERANCE};
use crate::circuit::Circuit;
use crate::components::StampContext;
use crate::error::{Result, SpinSimError};

/// How a Newton solve ended.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NewtonOutcome {
    Converged { iterations: usize },
    MaxIterationsExceeded { iterations: usize, residual: f64 },
}

impl NewtonOutcome {
    pub fn is_converged(&self) -> bool {
        matches!(self, NewtonOutcome::Converged { .. })
    }

    /// Convert a non-converged outcome into a [`SpinSimError::ConvergenceFailure`].
    pub fn into_result(self) -> Result<usize> {
        match self {
            NewtonOutcome::Converged { iterations } => Ok(iterations),
            NewtonOutcome::MaxIterationsExceeded {
                iterations,
                residual,
            } => Err(SpinSimError::convergence_failure(iterations, residual)),
        }
    }
}

/// Backward-Euler storage term of a transient solve.
#[derive(Debug, Clone, Copy)]
pub struct TransientTerm<'a> {
    pub storage: &'a CapacitanceMatrix,
    pub dt: f64,
    /// Converged state of the previous step
    pub x_prev: &'a [f64],
}

/// Newton-Raphson solver for circuits containing junctions.
#[derive(Debug, Clone)]
pub struct NewtonRaphson {
    /// Maximum iterations
    pub max_iterations: usize,
    /// Convergence tolerance on ‖x_next - x_guess‖₂
    pub tolerance: f64,
    matrix: MnaMatrix,
    guess: Vec<f64>,
}

impl NewtonRaphson {
    /// Create a solver for a system of `size` unknowns with default limits.
    pub fn new(size: usize) -> Self {
        Self::with_config(size, DEFAULT_MAX_ITERATIONS, DEFAULT_TOLERANCE)
    }

    pub fn with_config(size: usize, max_iterations: usize, tolerance: f64) -> Self {
        Self {
            max_iterations,
            tolerance,
            matrix: MnaMatrix::new(size),
            guess: vec![0.0; size],
        }
    }

    /// Solution of the last solve.
    pub fn solution(&self) -> &[f64] {
        &self.matrix.x
    }

    /// DC operating point: storage terms dropped, sources at t = 0, seeded from zero.
    pub fn solve_dc(&mut self, circuit: &Circuit, junction_cos: &[f64]) -> Result<NewtonOutcome> {
        self.guess.fill(0.0);
        let outcome = self.iterate(circuit, 0.0, junction_cos, None)?;
        debug!("DC operating point: {:?}", outcome);
        Ok(outcome)
    }

    /// One backward-Euler time step ending at `time`, seeded from the previous state.
    pub fn solve_transient(
        &mut self,
        circuit: &Circuit,
        time: f64,
        junction_cos: &[f64],
        transient: TransientTerm<'_>,
    ) -> Result<NewtonOutcome> {
        self.guess.copy_from_slice(transient.x_prev);
        self.iterate(circuit, time, junction_cos, Some(transient))
    }

    fn iterate(
        &mut self,
        circuit: &Circuit,
        time: f64,
        junction_cos: &[f64],
        transient: Option<TransientTerm<'_>>,
    ) -> Result<NewtonOutcome> {
        // Without junctions the system does not depend on the guess
        let linear = !circuit.is_nonlinear();
        let mut residual = f64::INFINITY;

        for iter in 1..=self.max_iterations {
            let ctx = StampContext {
                x: &self.guess,
                time,
                junction_cos,
                num_nodes: circuit.num_nodes,
            };
            assemble(circuit, &ctx, &mut self.matrix);
            if let Some(term) = transient {
                term.storage
                    .apply_backward_euler(&mut self.matrix, term.dt, term.x_prev);
            }

            self.matrix.factor_and_solve()?;
            check_finite(&self.matrix.x)?;

            if linear {
                return Ok(NewtonOutcome::Converged { iterations: 1 });
            }

            residual = l2_distance(&self.matrix.x, &self.guess);
            if residual < self.tolerance {
                debug!("Newton converged in {} iterations (residual {:.2e})", iter, residual);
                return Ok(NewtonOutcome::Converged { iterations: iter });
            }

            self.guess.copy_from_slice(&self.matrix.x);
        }

        debug!(
            "Newton stopped after {} iterations (residual {:.2e})",
            self.max_iterations, residual
        );
        Ok(NewtonOutcome::MaxIterationsExceeded {
            iterations: self.max_iterations,
            residual,
        })
    }
}

fn l2_distance(a: &[f64], b: &[f64]) -> f64 {
    a.iter()
        .zip(b)
        .map(|(x, y)| (x - y) * (x - y))
        .sum::<f64>()
        .sqrt()
}

fn check_finite(x: &[f64]) -> Result<()> {
    match x.iter().position(|v| !v.is_finite()) {
        Some(index) => Err(SpinSimError::NumericalOverflow {
            index,
            value: x[index],
        }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{JunctionParams, Waveform};

    fn junction_cell() -> Circuit {
        let mut circuit = Circuit::new();
        circuit.add_voltage_source("V1", "in", "0", Waveform::Dc(0.3));
        circuit.add_resistor("R1", "in", "top", 1.0e3);
        circuit.add_junction("MTJ1", "top", "0", JunctionParams::default());
        circuit
    }

    #[test]
    fn test_linear_circuit_reports_single_iteration() {
        let mut circuit = Circuit::new();
        circuit.add_voltage_source("V1", "in", "0", Waveform::Dc(1.0));
        circuit.add_resistor("R1", "in", "out", 1.0e3);
        circuit.add_resistor("R2", "out", "0", 1.0e3);
        let mut newton = NewtonRaphson::new(circuit.matrix_size());
        let outcome = newton.solve_dc(&circuit, &[]).unwrap();
        assert_eq!(outcome, NewtonOutcome::Converged { iterations: 1 });
    }

    #[test]
    fn test_junction_bias_is_self_consistent() {
        let circuit = junction_cell();
        let mut newton = NewtonRaphson::new(circuit.matrix_size());
        let outcome = newton.solve_dc(&circuit, &[-1.0]).unwrap();
        assert!(outcome.is_converged());

        let top = circuit.find_node("top").and_then(|n| n.matrix_index()).unwrap();
        let v = newton.solution()[top];
        let r = JunctionParams::default().resistance(-1.0, v);
        // Divider equation at the converged bias
        let expected = 0.3 * r / (r + 1.0e3);
        assert!((v - expected).abs() < 1e-5, "v = {v}, expected {expected}");
    }

    #[test]
    fn test_iteration_cap_is_reported() {
        let circuit = junction_cell();
        let mut newton = NewtonRaphson::with_config(circuit.matrix_size(), 3, 0.0);
        let outcome = newton.solve_dc(&circuit, &[-1.0]).unwrap();
        match outcome {
            NewtonOutcome::MaxIterationsExceeded { iterations, .. } => assert_eq!(iterations, 3),
            other => panic!("unexpected outcome {:?}", other),
        }
        assert!(outcome.into_result().is_err());
    }
}
