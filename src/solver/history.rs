//! Bounded simulation history.

use std::collections::VecDeque;

use crate::circuit::JunctionId;
use crate::magnetics::{MagneticStack, Vec3};

/// One recorded time point.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    pub time: f64,
    /// Full state vector (node voltages, then branch currents)
    pub state: Vec<f64>,
    /// Magnetic stack of every junction, in junction order
    pub magnetizations: Vec<MagneticStack>,
}

/// FIFO of samples; the oldest sample is dropped once capacity is exceeded.
#[derive(Debug, Clone)]
pub struct History {
    samples: VecDeque<Sample>,
    capacity: usize,
}

impl History {
    pub fn new(capacity: usize) -> Self {
        Self {
            samples: VecDeque::with_capacity(capacity.min(1024)),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn push(&mut self, sample: Sample) {
        if self.capacity == 0 {
            return;
        }
        while self.samples.len() >= self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(sample);
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }

    /// Samples, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &Sample> {
        self.samples.iter()
    }

    pub fn first(&self) -> Option<&Sample> {
        self.samples.front()
    }

    pub fn latest(&self) -> Option<&Sample> {
        self.samples.back()
    }

    /// (time, free-layer magnetization) of one junction.
    pub fn magnetization_trace(&self, junction: JunctionId) -> Vec<(f64, Vec3)> {
        self.samples
            .iter()
            .filter_map(|s| s.magnetizations.get(junction.0).map(|m| (s.time, m.free)))
            .collect()
    }

    /// (time, value) of one entry of the state vector.
    pub fn state_trace(&self, index: usize) -> Vec<(f64, f64)> {
        self.samples
            .iter()
            .filter_map(|s| s.state.get(index).map(|&v| (s.time, v)))
            .collect()
    }
}
