//! Error types for the spintronic transient simulator.
//!
//! This module provides a unified error type [`SpinSimError`] that covers
//! all error conditions that can occur during circuit construction,
//! validation, and simulation.

use thiserror::Error;

/// Result type alias using [`SpinSimError`].
pub type Result<T> = std::result::Result<T, SpinSimError>;

/// Unified error type for all simulator operations.
#[derive(Error, Debug)]
pub enum SpinSimError {
    // ============ Circuit Construction Errors ============
    /// Node not found in circuit
    #[error("Node '{node}' not found in circuit")]
    NodeNotFound { node: String },

    /// Magnetic junction not found in circuit
    #[error("Magnetic junction '{name}' not found in circuit")]
    JunctionNotFound { name: String },

    /// Duplicate component name
    #[error("Duplicate component name '{name}'")]
    DuplicateComponent { name: String },

    /// Invalid parameter value
    #[error("Invalid parameter '{param}' for component '{component}': {message}")]
    InvalidParameter {
        component: String,
        param: String,
        message: String,
    },

    // ============ Circuit Validation Errors ============
    /// Floating node (no DC path to ground)
    #[error("Floating node '{node}' detected - no DC path to ground")]
    FloatingNode { node: String },

    /// Invalid circuit topology
    #[error("Invalid circuit topology: {message}")]
    InvalidTopology { message: String },

    // ============ Simulation Errors ============
    /// Matrix is singular and cannot be solved
    #[error("Singular matrix at row {row} - circuit may have a voltage source loop or floating node")]
    SingularMatrix { row: usize },

    /// Newton-Raphson iteration did not converge
    #[error("Newton-Raphson did not converge after {iterations} iterations (residual: {residual:.2e})")]
    ConvergenceFailure { iterations: usize, residual: f64 },

    /// Numerical overflow detected in the solution vector
    #[error("Numerical overflow detected at unknown {index} (value: {value:.2e})")]
    NumericalOverflow { index: usize, value: f64 },

    /// Operation requires an initialized simulator
    #[error("Simulator is not initialized - call initialize() first")]
    NotInitialized,

    /// Invalid simulation parameter
    #[error("Invalid simulation parameter: {message}")]
    InvalidSimulationParam { message: String },

    /// A transient step failed; the last converged state is kept
    #[error("Step {step} at t = {time:.4e} s failed: {source}")]
    StepFailed {
        step: usize,
        time: f64,
        #[source]
        source: Box<SpinSimError>,
    },
}

impl SpinSimError {
    /// Create an invalid parameter error
    pub fn invalid_parameter(
        component: impl Into<String>,
        param: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::InvalidParameter {
            component: component.into(),
            param: param.into(),
            message: message.into(),
        }
    }

    /// Create a convergence failure error
    pub fn convergence_failure(iterations: usize, residual: f64) -> Self {
        Self::ConvergenceFailure {
            iterations,
            residual,
        }
    }

    /// Create an invalid simulation parameter error
    pub fn invalid_simulation_param(message: impl Into<String>) -> Self {
        Self::InvalidSimulationParam {
            message: message.into(),
        }
    }

    /// Whether the caller can reasonably retry (e.g. with a smaller time step).
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::ConvergenceFailure { .. } | Self::NumericalOverflow { .. } => true,
            Self::StepFailed { source, .. } => source.is_recoverable(),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_failure_chains_source() {
        let err = SpinSimError::StepFailed {
            step: 12,
            time: 1.2e-9,
            source: Box::new(SpinSimError::convergence_failure(20, 3.5e-3)),
        };
        let message = err.to_string();
        assert!(message.contains("Step 12"));
        assert!(message.contains("did not converge after 20"));
        assert!(err.is_recoverable());
    }

    #[test]
    fn test_singular_matrix_not_recoverable() {
        let err = SpinSimError::StepFailed {
            step: 1,
            time: 0.0,
            source: Box::new(SpinSimError::SingularMatrix { row: 3 }),
        };
        assert!(!err.is_recoverable());
    }
}
