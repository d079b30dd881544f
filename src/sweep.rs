//! Independent switching trials and parameter sweeps.
//!
//! Every trial builds its own circuit and owns its own [`Simulator`] and
//! noise source (seed = base seed + trial index), so trials run in parallel
//! on rayon's thread pool without sharing any state.

use log::{debug, info};
use rayon::prelude::*;

use crate::circuit::Circuit;
use crate::error::{Result, SpinSimError};
use crate::solver::{Simulator, SimulatorConfig};

/// Configuration of a batch of switching trials.
#[derive(Debug, Clone)]
pub struct TrialConfig {
    /// Number of independent trials
    pub trials: usize,
    /// Seed of trial 0; trial i uses `base_seed + i`
    pub base_seed: u64,
    /// Fixed time step (s)
    pub dt: f64,
    /// Step budget per trial
    pub max_steps: usize,
    /// Simulator settings shared by all trials (the seed is overridden)
    pub simulator: SimulatorConfig,
}

impl Default for TrialConfig {
    fn default() -> Self {
        Self {
            trials: 100,
            base_seed: 0,
            dt: 1.0e-12,
            max_steps: 10_000,
            simulator: SimulatorConfig::default()
                .with_thermal_noise(true)
                .with_history_capacity(0),
        }
    }
}

impl TrialConfig {
    pub fn with_trials(mut self, trials: usize) -> Self {
        self.trials = trials;
        self
    }

    pub fn with_base_seed(mut self, seed: u64) -> Self {
        self.base_seed = seed;
        self
    }

    pub fn with_dt(mut self, dt: f64) -> Self {
        self.dt = dt;
        self
    }

    pub fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = max_steps;
        self
    }

    pub fn with_simulator(mut self, simulator: SimulatorConfig) -> Self {
        self.simulator = simulator;
        self
    }

    fn validate(&self) -> Result<()> {
        if !self.dt.is_finite() || self.dt <= 0.0 {
            return Err(SpinSimError::invalid_simulation_param(format!(
                "trial time step must be positive and finite, got {}",
                self.dt
            )));
        }
        Ok(())
    }
}

/// Result of one trial.
#[derive(Debug, Clone, PartialEq)]
pub struct TrialOutcome {
    pub seed: u64,
    pub switched: bool,
    /// Time at which the switching criterion first held
    pub switching_time: Option<f64>,
    pub steps: usize,
    /// Error that ended the trial early, if any
    pub error: Option<String>,
}

/// Aggregate of one sweep point.
#[derive(Debug, Clone, PartialEq)]
pub struct SweepPoint {
    pub value: f64,
    pub outcomes: Vec<TrialOutcome>,
}

impl SweepPoint {
    pub fn write_error_rate(&self) -> f64 {
        write_error_rate(&self.outcomes)
    }

    pub fn mean_switching_time(&self) -> Option<f64> {
        mean_switching_time(&self.outcomes)
    }
}

fn run_trial<B, P>(config: &TrialConfig, index: usize, build: &B, switched: &P) -> TrialOutcome
where
    B: Fn(usize) -> Result<Circuit>,
    P: Fn(&Simulator) -> bool,
{
    let seed = config.base_seed.wrapping_add(index as u64);
    let mut outcome = TrialOutcome {
        seed,
        switched: false,
        switching_time: None,
        steps: 0,
        error: None,
    };

    let circuit = match build(index) {
        Ok(circuit) => circuit,
        Err(e) => {
            outcome.error = Some(e.to_string());
            return outcome;
        }
    };
    let mut sim = Simulator::with_config(circuit, config.simulator.clone().with_seed(seed));
    if let Err(e) = sim.initialize() {
        outcome.error = Some(e.to_string());
        return outcome;
    }

    for _ in 0..config.max_steps {
        match sim.step(config.dt) {
            Ok(result) => {
                outcome.steps = result.step;
                if switched(&sim) {
                    outcome.switched = true;
                    outcome.switching_time = Some(result.time);
                    break;
                }
            }
            Err(e) => {
                debug!("trial {} (seed {}) stopped: {}", index, seed, e);
                outcome.error = Some(e.to_string());
                break;
            }
        }
    }
    outcome
}

/// Run `config.trials` independent switching trials in parallel.
///
/// `build` constructs the circuit of trial `i`; `switched` is evaluated
/// after every step and ends the trial once it returns true.
pub fn run_switching_trials<B, P>(
    config: &TrialConfig,
    build: B,
    switched: P,
) -> Result<Vec<TrialOutcome>>
where
    B: Fn(usize) -> Result<Circuit> + Sync,
    P: Fn(&Simulator) -> bool + Sync,
{
    config.validate()?;
    info!(
        "Running {} switching trials ({} threads)",
        config.trials,
        rayon::current_num_threads()
    );

    let outcomes: Vec<TrialOutcome> = (0..config.trials)
        .into_par_iter()
        .map(|i| run_trial(config, i, &build, &switched))
        .collect();

    info!(
        "Trials done: write error rate {:.4}",
        write_error_rate(&outcomes)
    );
    Ok(outcomes)
}

/// Run a batch of trials for every value of a swept parameter.
///
/// Points are evaluated in parallel, and so are the trials within a point.
pub fn sweep_parameter<B, P>(
    values: &[f64],
    config: &TrialConfig,
    build: B,
    switched: P,
) -> Result<Vec<SweepPoint>>
where
    B: Fn(f64, usize) -> Result<Circuit> + Sync,
    P: Fn(&Simulator) -> bool + Sync,
{
    config.validate()?;
    info!(
        "Sweeping {} values x {} trials",
        values.len(),
        config.trials
    );

    let points: Vec<SweepPoint> = values
        .par_iter()
        .map(|&value| {
            let outcomes = (0..config.trials)
                .into_par_iter()
                .map(|i| run_trial(config, i, &|index: usize| build(value, index), &switched))
                .collect();
            SweepPoint { value, outcomes }
        })
        .collect();
    Ok(points)
}

/// Fraction of trials that did not switch (failed trials count as errors).
pub fn write_error_rate(outcomes: &[TrialOutcome]) -> f64 {
    if outcomes.is_empty() {
        return 0.0;
    }
    let failures = outcomes.iter().filter(|o| !o.switched).count();
    failures as f64 / outcomes.len() as f64
}

/// Mean switching time over the trials that switched.
pub fn mean_switching_time(outcomes: &[TrialOutcome]) -> Option<f64> {
    let times: Vec<f64> = outcomes.iter().filter_map(|o| o.switching_time).collect();
    if times.is_empty() {
        None
    } else {
        Some(times.iter().sum::<f64>() / times.len() as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{JunctionParams, Waveform};
    use crate::magnetics::{LayerParams, ResistanceModel, StackParams};
    use crate::Vec3;

    fn cell(current: f64) -> Result<Circuit> {
        let tilt: f64 = 0.1;
        let params = JunctionParams::default()
            .with_resistance(ResistanceModel::Tmr {
                ra_parallel: 0.5e-12,
                ratio: 1.5,
            })
            .with_half_bias(1.0)
            .with_stack(
                StackParams::default()
                    .with_free(LayerParams::cofeb_free().with_damping(0.05))
                    .with_initial_free(Vec3::new(tilt.sin(), 0.0, -tilt.cos())),
            );
        let mut circuit = Circuit::new();
        circuit.add_current_source("I1", "0", "top", Waveform::Dc(current));
        circuit.add_junction("MTJ1", "top", "0", params);
        Ok(circuit)
    }

    fn free_mz_positive(sim: &Simulator) -> bool {
        sim.junctions()[0].stack.free.z > 0.0
    }

    fn quick_config() -> TrialConfig {
        TrialConfig::default()
            .with_trials(4)
            .with_base_seed(10)
            .with_dt(1.0e-13)
            .with_max_steps(40_000)
            .with_simulator(SimulatorConfig::default().with_history_capacity(0))
    }

    #[test]
    fn test_seeds_follow_trial_index() {
        let config = quick_config().with_max_steps(10);
        let outcomes = run_switching_trials(&config, |_| cell(0.0), free_mz_positive).unwrap();
        let seeds: Vec<u64> = outcomes.iter().map(|o| o.seed).collect();
        assert_eq!(seeds, vec![10, 11, 12, 13]);
        assert!(outcomes.iter().all(|o| o.steps == 10 && !o.switched));
        assert_eq!(write_error_rate(&outcomes), 1.0);
        assert_eq!(mean_switching_time(&outcomes), None);
    }

    #[test]
    fn test_large_current_switches_every_trial() {
        // About 6x the critical current of this free layer
        let outcomes =
            run_switching_trials(&quick_config(), |_| cell(1.0e-3), free_mz_positive).unwrap();
        assert_eq!(write_error_rate(&outcomes), 0.0);
        let t = mean_switching_time(&outcomes).unwrap();
        assert!(t > 0.0 && t < 4.0e-9, "t = {t:e}");
    }

    #[test]
    fn test_build_errors_are_reported_per_trial() {
        let outcomes = run_switching_trials(
            &quick_config(),
            |_| Err(SpinSimError::InvalidTopology {
                message: "no cell".to_string(),
            }),
            free_mz_positive,
        )
        .unwrap();
        assert!(outcomes.iter().all(|o| o.error.is_some() && !o.switched));
    }

    #[test]
    fn test_sweep_orders_points_by_value() {
        let config = quick_config().with_trials(2);
        let points =
            sweep_parameter(&[0.0, 1.0e-3], &config, |i, _| cell(i), free_mz_positive).unwrap();
        assert_eq!(points.len(), 2);
        assert_eq!(points[0].value, 0.0);
        assert_eq!(points[0].write_error_rate(), 1.0);
        assert_eq!(points[1].write_error_rate(), 0.0);
        assert!(points[1].mean_switching_time().is_some());
    }

    #[test]
    fn test_invalid_dt_rejected() {
        let config = quick_config().with_dt(0.0);
        assert!(run_switching_trials(&config, |_| cell(0.0), free_mz_positive).is_err());
    }
}
