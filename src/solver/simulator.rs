//! Main simulator interface.
//!
//! The [`Simulator`] owns the circuit state, the magnetic state of every
//! junction and the simulation clock. Each step performs one nonlinear
//! circuit solve followed by one magnetization update; a failed solve
//! leaves every piece of state untouched so the caller can retry.

use std::ops::ControlFlow;

use log::{debug, trace, warn};

use crate::circuit::{validate_circuit, Circuit, JunctionId, NodeId, TransientDirective};
use crate::error::{Result, SpinSimError};
use crate::magnetics::field::effective_field;
use crate::magnetics::thermal::{thermal_field, thermal_field_std};
use crate::magnetics::torque::{spin_hall_polarization, spin_orbit_field, spin_transfer_field};
use crate::magnetics::{
    IntegrationScheme, LayerParams, MagneticStack, MagnetizationIntegrator, Vec3, Xor128,
};
use crate::GYROMAGNETIC_RATIO;

use super::history::{History, Sample};
use super::mna::{build_capacitance, CapacitanceMatrix};
use super::newton::{NewtonOutcome, NewtonRaphson, TransientTerm};
use super::{DEFAULT_HISTORY_CAPACITY, DEFAULT_MAX_ITERATIONS, DEFAULT_TOLERANCE};

/// Configuration for the simulator.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulatorConfig {
    /// Maximum Newton-Raphson iterations per solve.
    pub max_iterations: usize,
    /// Convergence tolerance on the state update norm.
    pub tolerance: f64,
    /// Number of samples kept in the history.
    pub history_capacity: usize,
    /// LLG time-stepping scheme.
    pub scheme: IntegrationScheme,
    /// Gyromagnetic ratio in rad/(s·T).
    pub gamma: f64,
    /// Add the stochastic thermal field to every layer.
    pub thermal_noise: bool,
    /// Seed of the thermal noise source.
    pub seed: u64,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            max_iterations: DEFAULT_MAX_ITERATIONS,
            tolerance: DEFAULT_TOLERANCE,
            history_capacity: DEFAULT_HISTORY_CAPACITY,
            scheme: IntegrationScheme::default(),
            gamma: GYROMAGNETIC_RATIO,
            thermal_noise: false,
            seed: 0,
        }
    }
}

impl SimulatorConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Set the convergence tolerance.
    ///
    /// The norm mixes volts and amperes, so very small branch currents
    /// are effectively checked against an absolute tolerance.
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn with_history_capacity(mut self, capacity: usize) -> Self {
        self.history_capacity = capacity;
        self
    }

    pub fn with_scheme(mut self, scheme: IntegrationScheme) -> Self {
        self.scheme = scheme;
        self
    }

    pub fn with_gamma(mut self, gamma: f64) -> Self {
        self.gamma = gamma;
        self
    }

    pub fn with_thermal_noise(mut self, enabled: bool) -> Self {
        self.thermal_noise = enabled;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }
}

/// Lifecycle of a [`Simulator`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimulatorStatus {
    Uninitialized,
    Ready,
    /// The last step failed; the state is that of the last successful step
    Failed,
}

/// Magnetic and electrical state of one junction.
#[derive(Debug, Clone, PartialEq)]
pub struct JunctionState {
    pub stack: MagneticStack,
    /// Voltage from the free-layer terminal to the reference-layer terminal (V)
    pub voltage: f64,
    /// Resistance at the last solve (Ω)
    pub resistance: f64,
    /// Current through the barrier (A)
    pub current: f64,
    /// Barrier current density (A/m²)
    pub current_density: f64,
    /// In-plane heavy-metal current density driving spin-orbit torque (A/m²)
    pub sot_current_density: f64,
}

/// Externally imposed per-junction drive.
#[derive(Debug, Clone, Copy, Default)]
struct JunctionDrive {
    applied_field: Vec3,
    sot_current_density: f64,
}

/// Outcome of one successful step.
#[derive(Debug, Clone, PartialEq)]
pub struct StepResult {
    pub step: usize,
    pub time: f64,
    /// Newton iterations used
    pub iterations: usize,
    /// Node voltages (ground excluded)
    pub voltages: Vec<f64>,
    /// Free-layer magnetization of every junction
    pub magnetizations: Vec<Vec3>,
}

/// Summary of [`Simulator::run`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunSummary {
    pub steps: usize,
    pub iterations: usize,
    pub final_time: f64,
    /// The callback asked to stop before `stop` was reached
    pub cancelled: bool,
}

/// The co-simulation orchestrator.
pub struct Simulator {
    circuit: Circuit,
    config: SimulatorConfig,
    newton: NewtonRaphson,
    integrator: MagnetizationIntegrator,
    storage: CapacitanceMatrix,
    status: SimulatorStatus,
    time: f64,
    step_count: usize,
    state: Vec<f64>,
    junctions: Vec<JunctionState>,
    drives: Vec<JunctionDrive>,
    history: History,
    noise: Xor128,
    /// Steps ending before this time are not recorded
    record_from: f64,
}

impl Simulator {
    /// Create a new simulator for the given circuit with default configuration.
    pub fn new(circuit: Circuit) -> Self {
        Self::with_config(circuit, SimulatorConfig::default())
    }

    /// Create a new simulator for the given circuit with custom configuration.
    pub fn with_config(circuit: Circuit, config: SimulatorConfig) -> Self {
        let size = circuit.matrix_size();
        let newton = NewtonRaphson::with_config(size, config.max_iterations, config.tolerance);
        let integrator = MagnetizationIntegrator::new(config.scheme).with_gamma(config.gamma);
        let drives = vec![JunctionDrive::default(); circuit.num_junctions()];
        let history = History::new(config.history_capacity);
        let noise = Xor128::new(config.seed);

        Self {
            circuit,
            newton,
            integrator,
            storage: CapacitanceMatrix::new(size),
            status: SimulatorStatus::Uninitialized,
            time: 0.0,
            step_count: 0,
            state: vec![0.0; size],
            junctions: Vec::new(),
            drives,
            history,
            noise,
            record_from: f64::NEG_INFINITY,
            config,
        }
    }

    /// Validate the circuit, solve the DC operating point and record t = 0.
    pub fn initialize(&mut self) -> Result<()> {
        self.status = SimulatorStatus::Uninitialized;
        validate_circuit(&self.circuit)?;

        let size = self.circuit.matrix_size();
        self.storage = build_capacitance(&self.circuit);
        self.newton =
            NewtonRaphson::with_config(size, self.config.max_iterations, self.config.tolerance);
        self.noise = Xor128::new(self.config.seed);

        let stacks: Vec<MagneticStack> = self
            .circuit
            .junctions()
            .map(|m| m.params.stack.initial_state())
            .collect();
        let cos: Vec<f64> = stacks.iter().map(MagneticStack::cos_angle).collect();

        let iterations = self.newton.solve_dc(&self.circuit, &cos)?.into_result()?;
        let x = self.newton.solution().to_vec();
        self.junctions = self.electrical_states(&x, &stacks);
        self.state = x;
        self.time = 0.0;
        self.step_count = 0;
        self.history.clear();
        self.record();
        self.status = SimulatorStatus::Ready;

        debug!(
            "Initialized: {} unknowns, {} junctions, DC solved in {} iterations",
            size,
            self.junctions.len(),
            iterations
        );
        Ok(())
    }

    /// Advance the simulation by `dt` seconds.
    pub fn step(&mut self, dt: f64) -> Result<StepResult> {
        if self.status == SimulatorStatus::Uninitialized {
            return Err(SpinSimError::NotInitialized);
        }
        if !dt.is_finite() || dt <= 0.0 {
            return Err(SpinSimError::invalid_simulation_param(format!(
                "time step must be positive and finite, got {}",
                dt
            )));
        }

        let t_next = self.time + dt;
        let cos: Vec<f64> = self.junctions.iter().map(|j| j.stack.cos_angle()).collect();
        let solved = self
            .newton
            .solve_transient(
                &self.circuit,
                t_next,
                &cos,
                TransientTerm {
                    storage: &self.storage,
                    dt,
                    x_prev: &self.state,
                },
            )
            .and_then(NewtonOutcome::into_result);

        let iterations = match solved {
            Ok(iterations) => iterations,
            Err(source) => return Err(self.fail(t_next, source)),
        };

        let x = self.newton.solution().to_vec();
        let stacks: Vec<MagneticStack> = self.junctions.iter().map(|j| j.stack).collect();
        let mut next = self.electrical_states(&x, &stacks);
        self.advance_magnetization(&mut next, dt);

        self.state = x;
        self.junctions = next;
        self.time = t_next;
        self.step_count += 1;
        self.status = SimulatorStatus::Ready;
        if self.time >= self.record_from {
            self.record();
        }

        trace!(
            "step {} t = {:.4e} s ({} iterations)",
            self.step_count,
            self.time,
            iterations
        );

        Ok(StepResult {
            step: self.step_count,
            time: self.time,
            iterations,
            voltages: self.last_voltages().to_vec(),
            magnetizations: self.junctions.iter().map(|j| j.stack.free).collect(),
        })
    }

    /// Step with a fixed time step until `directive.stop`.
    ///
    /// Samples are only recorded from `directive.start` on. The callback
    /// sees every step and may stop the run early with `ControlFlow::Break`.
    pub fn run<F>(&mut self, directive: &TransientDirective, mut on_step: F) -> Result<RunSummary>
    where
        F: FnMut(&StepResult) -> ControlFlow<()>,
    {
        if self.status == SimulatorStatus::Uninitialized {
            return Err(SpinSimError::NotInitialized);
        }
        let TransientDirective { start, stop, step } = *directive;
        if !step.is_finite() || step <= 0.0 {
            return Err(SpinSimError::invalid_simulation_param(format!(
                "transient step must be positive and finite, got {}",
                step
            )));
        }
        if !stop.is_finite() || !start.is_finite() || start < 0.0 || start > stop {
            return Err(SpinSimError::invalid_simulation_param(format!(
                "invalid transient window [{}, {}]",
                start, stop
            )));
        }

        self.record_from = start;
        let mut summary = RunSummary {
            steps: 0,
            iterations: 0,
            final_time: self.time,
            cancelled: false,
        };

        let mut outcome = Ok(());
        while self.time < stop - 0.5 * step {
            match self.step(step) {
                Ok(result) => {
                    summary.steps += 1;
                    summary.iterations += result.iterations;
                    summary.final_time = result.time;
                    if on_step(&result).is_break() {
                        summary.cancelled = true;
                        break;
                    }
                }
                Err(e) => {
                    outcome = Err(e);
                    break;
                }
            }
        }
        self.record_from = f64::NEG_INFINITY;

        outcome.map(|()| summary)
    }

    /// Discard all simulation state. The circuit and per-junction drives are kept.
    pub fn reset(&mut self) {
        self.status = SimulatorStatus::Uninitialized;
        self.time = 0.0;
        self.step_count = 0;
        self.state.fill(0.0);
        self.junctions.clear();
        self.history.clear();
        self.noise = Xor128::new(self.config.seed);
    }

    pub fn status(&self) -> SimulatorStatus {
        self.status
    }

    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn step_count(&self) -> usize {
        self.step_count
    }

    pub fn config(&self) -> &SimulatorConfig {
        &self.config
    }

    /// Get a reference to the circuit.
    pub fn circuit(&self) -> &Circuit {
        &self.circuit
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    /// Full state vector of the last successful solve.
    pub fn state(&self) -> &[f64] {
        &self.state
    }

    /// Node voltages of the last successful solve (ground excluded).
    pub fn last_voltages(&self) -> &[f64] {
        &self.state[..self.circuit.num_nodes - 1]
    }

    /// Voltage at a node by name.
    pub fn node_voltage(&self, name: &str) -> Result<f64> {
        let node = self
            .circuit
            .find_node(name)
            .ok_or_else(|| SpinSimError::NodeNotFound {
                node: name.to_string(),
            })?;
        Ok(voltage_at(&self.state, node))
    }

    pub fn junctions(&self) -> &[JunctionState] {
        &self.junctions
    }

    pub fn junction_state(&self, id: JunctionId) -> Result<&JunctionState> {
        if self.status == SimulatorStatus::Uninitialized {
            return Err(SpinSimError::NotInitialized);
        }
        self.junctions
            .get(id.0)
            .ok_or_else(|| SpinSimError::JunctionNotFound {
                name: id.to_string(),
            })
    }

    /// External field (T) applied to every layer of a junction.
    pub fn set_applied_field(&mut self, id: JunctionId, field: Vec3) -> Result<()> {
        self.drive_mut(id)?.applied_field = field;
        Ok(())
    }

    /// External in-plane heavy-metal current density (A/m²), added to
    /// the current of any spin-orbit channel attached to the junction.
    pub fn set_sot_current_density(&mut self, id: JunctionId, density: f64) -> Result<()> {
        if !density.is_finite() {
            return Err(SpinSimError::invalid_simulation_param(format!(
                "SOT current density must be finite, got {}",
                density
            )));
        }
        self.drive_mut(id)?.sot_current_density = density;
        Ok(())
    }

    /// Change the Newton iteration cap and tolerance for subsequent solves.
    pub fn set_newton_limits(&mut self, max_iterations: usize, tolerance: f64) -> Result<()> {
        if max_iterations == 0 {
            return Err(SpinSimError::invalid_simulation_param(
                "max_iterations must be at least 1",
            ));
        }
        if !tolerance.is_finite() || tolerance < 0.0 {
            return Err(SpinSimError::invalid_simulation_param(format!(
                "tolerance must be non-negative and finite, got {}",
                tolerance
            )));
        }
        self.config.max_iterations = max_iterations;
        self.config.tolerance = tolerance;
        self.newton.max_iterations = max_iterations;
        self.newton.tolerance = tolerance;
        Ok(())
    }

    fn drive_mut(&mut self, id: JunctionId) -> Result<&mut JunctionDrive> {
        self.drives
            .get_mut(id.0)
            .ok_or_else(|| SpinSimError::JunctionNotFound {
                name: id.to_string(),
            })
    }

    fn fail(&mut self, time: f64, source: SpinSimError) -> SpinSimError {
        self.status = SimulatorStatus::Failed;
        let step = self.step_count + 1;
        warn!("step {} at t = {:.4e} s failed: {}", step, time, source);
        SpinSimError::StepFailed {
            step,
            time,
            source: Box::new(source),
        }
    }

    fn record(&mut self) {
        self.history.push(Sample {
            time: self.time,
            state: self.state.clone(),
            magnetizations: self.junctions.iter().map(|j| j.stack).collect(),
        });
    }

    /// Junction voltages, currents and SOT drive for a solved state vector.
    fn electrical_states(&self, x: &[f64], stacks: &[MagneticStack]) -> Vec<JunctionState> {
        let mut states: Vec<JunctionState> = self
            .circuit
            .junctions()
            .zip(stacks)
            .map(|(m, stack)| {
                let voltage = voltage_at(x, m.nodes[0]) - voltage_at(x, m.nodes[1]);
                let resistance = m.params.resistance(stack.cos_angle(), voltage);
                let current = voltage / resistance;
                JunctionState {
                    stack: *stack,
                    voltage,
                    resistance,
                    current,
                    current_density: current / m.params.area,
                    sot_current_density: self.drives[m.junction.0].sot_current_density,
                }
            })
            .collect();

        for channel in self.circuit.spin_orbit_channels() {
            let voltage = voltage_at(x, channel.nodes[0]) - voltage_at(x, channel.nodes[1]);
            if let Some(state) = states.get_mut(channel.target.0) {
                state.sot_current_density += channel.current_density(voltage);
            }
        }
        states
    }

    /// One LLG step for every layer, all from pre-step copies.
    fn advance_magnetization(&mut self, states: &mut [JunctionState], dt: f64) {
        let integrator = self.integrator;
        let gamma = integrator.gamma;
        let thermal = self.config.thermal_noise;

        for (state, junction) in states.iter_mut().zip(self.circuit.junctions()) {
            let params = &junction.params;
            let stack = &params.stack;
            let applied = self.drives[junction.junction.0].applied_field;
            let pre = state.stack;

            let mut noise_for = |layer: &LayerParams| {
                if !thermal {
                    return Vec3::zeros();
                }
                let std_dev = thermal_field_std(
                    layer.damping,
                    layer.temperature,
                    gamma,
                    layer.saturation_magnetization,
                    layer.volume(params.area),
                    dt,
                );
                thermal_field(std_dev, &mut self.noise)
            };

            let free = &stack.free;
            let h_free = noise_for(free);
            let sigma = spin_hall_polarization(&params.sot.current_direction);
            let j_stt = state.current_density;
            let j_sot = state.sot_current_density;
            let free_next = integrator.step(&pre.free, free.damping, dt, |m| {
                effective_field(free, m, &applied)
                    + h_free
                    + spin_transfer_field(free, m, &pre.reference, j_stt, params.stt_field_like_ratio)
                    + spin_orbit_field(
                        free,
                        m,
                        &sigma,
                        j_sot,
                        params.sot.spin_hall_angle,
                        params.sot.field_like_ratio,
                    )
            });

            let reference = &stack.reference;
            let h_reference = noise_for(reference);
            let saf = stack.saf.as_ref().zip(pre.saf_pinned);
            let reference_next = integrator.step(&pre.reference, reference.damping, dt, |m| {
                let coupling = saf.map_or(Vec3::zeros(), |(s, pinned)| pinned * s.coupling_field);
                effective_field(reference, m, &applied) + h_reference + coupling
            });

            let saf_next = match saf {
                Some((s, pinned)) => {
                    let h_pinned = noise_for(&s.pinned);
                    Some(integrator.step(&pinned, s.pinned.damping, dt, |m| {
                        effective_field(&s.pinned, m, &applied)
                            + h_pinned
                            + pre.reference * s.coupling_field
                    }))
                }
                None => None,
            };

            state.stack = MagneticStack {
                free: free_next,
                reference: reference_next,
                saf_pinned: saf_next,
            };
        }
    }
}

fn voltage_at(x: &[f64], node: NodeId) -> f64 {
    node.matrix_index().map_or(0.0, |i| x[i])
}
