//! Core types for circuit representation.

use std::fmt;

/// A unique identifier for a node in the circuit.
/// Node 0 is always ground.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

impl NodeId {
    /// The ground node (always index 0).
    pub const GROUND: NodeId = NodeId(0);

    /// Check if this is the ground node.
    pub fn is_ground(&self) -> bool {
        self.0 == 0
    }

    /// Row/column of this node's voltage in the MNA system.
    /// Returns None for ground, which carries no unknown.
    pub fn matrix_index(&self) -> Option<usize> {
        if self.is_ground() {
            None
        } else {
            Some(self.0 - 1)
        }
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_ground() {
            write!(f, "GND")
        } else {
            write!(f, "N{}", self.0)
        }
    }
}

/// A unique identifier for a component in the circuit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ComponentId(pub usize);

impl fmt::Display for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "C{}", self.0)
    }
}

/// Index for extra variables in the MNA matrix (voltage source and inductor currents).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BranchId(pub usize);

impl BranchId {
    /// Row/column of this branch current in the MNA system.
    /// Branch currents follow the node voltages (ground excluded).
    pub fn matrix_index(&self, num_nodes: usize) -> usize {
        (num_nodes - 1) + self.0
    }
}

impl fmt::Display for BranchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "I{}", self.0)
    }
}

/// Ordinal of a magnetic tunnel junction.
///
/// Indexes the magnetic state owned by the simulator, so it stays valid
/// for the lifetime of the circuit it was issued by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct JunctionId(pub usize);

impl fmt::Display for JunctionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MTJ{}", self.0)
    }
}

/// Transient analysis request attached to a netlist (`.TRAN start stop step`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransientDirective {
    /// Time from which samples are recorded (s)
    pub start: f64,
    /// Final simulated time (s)
    pub stop: f64,
    /// Fixed time step (s)
    pub step: f64,
}

impl TransientDirective {
    /// Create a directive that records from t = 0.
    pub fn new(stop: f64, step: f64) -> Self {
        Self {
            start: 0.0,
            stop,
            step,
        }
    }

    /// Delay recording until `start`.
    pub fn with_start(mut self, start: f64) -> Self {
        self.start = start;
        self
    }
}
