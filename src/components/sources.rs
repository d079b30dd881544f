//! Voltage and current sources.

use crate::circuit::{BranchId, ComponentId, NodeId};

/// Time dependence of an independent source.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Waveform {
    /// Constant value
    Dc(f64),
    /// Trapezoidal pulse train (`PULSE(v1 v2 td tr tf pw per)`).
    /// A non-positive period means a single pulse.
    Pulse {
        initial: f64,
        pulsed: f64,
        delay: f64,
        rise: f64,
        fall: f64,
        width: f64,
        period: f64,
    },
    /// `offset + amplitude · sin(2πf(t - delay))`, holding `offset` before `delay`
    Sine {
        offset: f64,
        amplitude: f64,
        frequency: f64,
        delay: f64,
    },
}

impl Default for Waveform {
    fn default() -> Self {
        Waveform::Dc(0.0)
    }
}

impl Waveform {
    /// Single rectangular pulse with instantaneous edges.
    pub fn pulse(initial: f64, pulsed: f64, delay: f64, width: f64) -> Self {
        Waveform::Pulse {
            initial,
            pulsed,
            delay,
            rise: 0.0,
            fall: 0.0,
            width,
            period: 0.0,
        }
    }

    /// Evaluate the waveform at time `t`.
    pub fn value_at(&self, t: f64) -> f64 {
        match *self {
            Waveform::Dc(v) => v,
            Waveform::Pulse {
                initial,
                pulsed,
                delay,
                rise,
                fall,
                width,
                period,
            } => {
                if t < delay {
                    return initial;
                }
                let mut local = t - delay;
                if period > 0.0 {
                    local %= period;
                }
                if local < rise {
                    initial + (pulsed - initial) * local / rise
                } else if local < rise + width {
                    pulsed
                } else if local < rise + width + fall {
                    pulsed + (initial - pulsed) * (local - rise - width) / fall
                } else {
                    initial
                }
            }
            Waveform::Sine {
                offset,
                amplitude,
                frequency,
                delay,
            } => {
                if t < delay {
                    offset
                } else {
                    offset + amplitude * (2.0 * std::f64::consts::PI * frequency * (t - delay)).sin()
                }
            }
        }
    }
}

/// A voltage source component.
///
/// Voltage sources require an extra row/column in the MNA matrix for the
/// branch current. The source enforces: V+ - V- = V_source(t)
#[derive(Debug, Clone)]
pub struct VoltageSource {
    pub id: ComponentId,
    pub name: String,
    pub nodes: [NodeId; 2], // [positive, negative]
    pub waveform: Waveform,
    pub branch: BranchId,
}

impl VoltageSource {
    pub fn new(
        id: ComponentId,
        name: String,
        nodes: [NodeId; 2],
        waveform: Waveform,
        branch: BranchId,
    ) -> Self {
        Self {
            id,
            name,
            nodes,
            waveform,
            branch,
        }
    }

    /// Source voltage at time `t`.
    pub fn voltage(&self, t: f64) -> f64 {
        self.waveform.value_at(t)
    }
}

/// A current source component.
///
/// Current sources add directly to the RHS vector of the MNA equations.
#[derive(Debug, Clone)]
pub struct CurrentSource {
    pub id: ComponentId,
    pub name: String,
    pub nodes: [NodeId; 2], // current flows from nodes[0] through the source into nodes[1]
    pub waveform: Waveform,
}

impl CurrentSource {
    pub fn new(id: ComponentId, name: String, nodes: [NodeId; 2], waveform: Waveform) -> Self {
        Self {
            id,
            name,
            nodes,
            waveform,
        }
    }

    /// Source current at time `t`.
    pub fn current(&self, t: f64) -> f64 {
        self.waveform.value_at(t)
    }
}
