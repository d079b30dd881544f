//! Linear passive components: Resistor, Capacitor, Inductor.
//!
//! Reactive elements carry no companion-model state. Their storage terms go
//! into the constant C matrix once, and the time discretization is applied by
//! the transient solver as C/dt.

use crate::circuit::{BranchId, ComponentId, NodeId};

/// A resistor component.
#[derive(Debug, Clone)]
pub struct Resistor {
    pub id: ComponentId,
    pub name: String,
    pub nodes: [NodeId; 2],
    pub resistance: f64,
}

impl Resistor {
    pub fn new(id: ComponentId, name: String, nodes: [NodeId; 2], resistance: f64) -> Self {
        Self {
            id,
            name,
            nodes,
            resistance,
        }
    }

    /// Get the conductance (1/R).
    pub fn conductance(&self) -> f64 {
        1.0 / self.resistance
    }
}

/// A capacitor component.
///
/// Open circuit at DC. In a transient step it contributes
///   i = C · (v(t) - v(t-dt)) / dt
/// through the storage matrix.
#[derive(Debug, Clone)]
pub struct Capacitor {
    pub id: ComponentId,
    pub name: String,
    pub nodes: [NodeId; 2],
    pub capacitance: f64,
}

impl Capacitor {
    pub fn new(id: ComponentId, name: String, nodes: [NodeId; 2], capacitance: f64) -> Self {
        Self {
            id,
            name,
            nodes,
            capacitance,
        }
    }
}

/// An inductor component.
///
/// Adds a branch current unknown with the constitutive row
///   v1 - v2 - L · di/dt = 0
/// which reduces to a short circuit at DC.
#[derive(Debug, Clone)]
pub struct Inductor {
    pub id: ComponentId,
    pub name: String,
    pub nodes: [NodeId; 2],
    pub inductance: f64,
    pub branch: BranchId,
}

impl Inductor {
    pub fn new(
        id: ComponentId,
        name: String,
        nodes: [NodeId; 2],
        inductance: f64,
        branch: BranchId,
    ) -> Self {
        Self {
            id,
            name,
            nodes,
            inductance,
            branch,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resistor_conductance() {
        let r = Resistor::new(
            ComponentId(0),
            "R1".to_string(),
            [NodeId(1), NodeId(0)],
            1000.0,
        );
        assert!((r.conductance() - 0.001).abs() < 1e-10);
    }
}
