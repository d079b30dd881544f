//! Component models for circuit simulation.
//!
//! This module provides models for all supported circuit components:
//! - Linear: Resistor, Capacitor, Inductor
//! - Sources: Voltage Source, Current Source (with DC, pulse and sine waveforms)
//! - Spintronic: Magnetic Tunnel Junction, Spin-Orbit Channel
//!
//! Each component stamps itself into the MNA matrix; reactive components
//! additionally stamp into the constant storage matrix.

mod junction;
mod linear;
mod sources;

pub use junction::{ChannelParams, JunctionParams, MagneticJunction, SotParams, SpinOrbitChannel};
pub use linear::{Capacitor, Inductor, Resistor};
pub use sources::{CurrentSource, VoltageSource, Waveform};

use crate::circuit::{BranchId, ComponentId, NodeId};
use crate::solver::{CapacitanceMatrix, MnaMatrix};

/// What a component needs to know to linearize itself.
#[derive(Debug, Clone, Copy)]
pub struct StampContext<'a> {
    /// Present guess of the state vector
    pub x: &'a [f64],
    /// Solve time (s), used to evaluate source waveforms
    pub time: f64,
    /// cos θ between free and reference layer, per junction
    pub junction_cos: &'a [f64],
    /// Number of nodes including ground
    pub num_nodes: usize,
}

impl StampContext<'_> {
    /// Voltage of a node in the present guess; ground is 0 V.
    pub fn voltage(&self, node: NodeId) -> f64 {
        node.matrix_index().map_or(0.0, |i| self.x[i])
    }

    /// Voltage drop across a two-terminal element.
    pub fn voltage_across(&self, nodes: &[NodeId; 2]) -> f64 {
        self.voltage(nodes[0]) - self.voltage(nodes[1])
    }

    /// Row/column of a branch current.
    pub fn branch_index(&self, branch: BranchId) -> usize {
        branch.matrix_index(self.num_nodes)
    }
}

/// A circuit component.
#[derive(Debug, Clone)]
pub enum Component {
    Resistor(Resistor),
    Capacitor(Capacitor),
    Inductor(Inductor),
    VoltageSource(VoltageSource),
    CurrentSource(CurrentSource),
    MagneticJunction(MagneticJunction),
    SpinOrbitChannel(SpinOrbitChannel),
}

impl Component {
    /// Get the component ID.
    pub fn id(&self) -> ComponentId {
        match self {
            Component::Resistor(r) => r.id,
            Component::Capacitor(c) => c.id,
            Component::Inductor(l) => l.id,
            Component::VoltageSource(v) => v.id,
            Component::CurrentSource(i) => i.id,
            Component::MagneticJunction(m) => m.id,
            Component::SpinOrbitChannel(s) => s.id,
        }
    }

    /// Get the component name.
    pub fn name(&self) -> &str {
        match self {
            Component::Resistor(r) => &r.name,
            Component::Capacitor(c) => &c.name,
            Component::Inductor(l) => &l.name,
            Component::VoltageSource(v) => &v.name,
            Component::CurrentSource(i) => &i.name,
            Component::MagneticJunction(m) => &m.name,
            Component::SpinOrbitChannel(s) => &s.name,
        }
    }

    /// Terminal nodes.
    pub fn nodes(&self) -> [NodeId; 2] {
        match self {
            Component::Resistor(r) => r.nodes,
            Component::Capacitor(c) => c.nodes,
            Component::Inductor(l) => l.nodes,
            Component::VoltageSource(v) => v.nodes,
            Component::CurrentSource(i) => i.nodes,
            Component::MagneticJunction(m) => m.nodes,
            Component::SpinOrbitChannel(s) => s.nodes,
        }
    }

    /// Branch current unknown owned by this component, if any.
    pub fn branch(&self) -> Option<BranchId> {
        match self {
            Component::Inductor(l) => Some(l.branch),
            Component::VoltageSource(v) => Some(v.branch),
            _ => None,
        }
    }

    /// Check if this component is nonlinear (requires Newton-Raphson iteration).
    pub fn is_nonlinear(&self) -> bool {
        matches!(self, Component::MagneticJunction(_))
    }

    /// Whether the component ties the potentials of its terminals together.
    ///
    /// Capacitors count: a node reached only through capacitors is held at
    /// DC by the minimum shunt conductance. An ideal current source fixes
    /// no potential.
    pub fn ties_nodes(&self) -> bool {
        !matches!(self, Component::CurrentSource(_))
    }

    /// Stamp the resistive part linearized at `ctx` into `mna`.
    pub fn stamp(&self, ctx: &StampContext<'_>, mna: &mut MnaMatrix) {
        match self {
            Component::Resistor(r) => {
                let [n1, n2] = r.nodes;
                mna.stamp_conductance(n1.matrix_index(), n2.matrix_index(), r.conductance());
            }

            // Open at DC; handled entirely by stamp_storage
            Component::Capacitor(_) => {}

            Component::Inductor(l) => {
                let [n1, n2] = l.nodes;
                let br = ctx.branch_index(l.branch);
                mna.stamp_branch_incidence(n1.matrix_index(), n2.matrix_index(), br);
            }

            Component::VoltageSource(v) => {
                let [n1, n2] = v.nodes;
                let br = ctx.branch_index(v.branch);
                mna.stamp_voltage_source(
                    n1.matrix_index(),
                    n2.matrix_index(),
                    br,
                    v.voltage(ctx.time),
                );
            }

            Component::CurrentSource(i) => {
                let [n1, n2] = i.nodes;
                mna.stamp_current_source(n1.matrix_index(), n2.matrix_index(), i.current(ctx.time));
            }

            Component::MagneticJunction(m) => {
                let [n1, n2] = m.nodes;
                let bias = ctx.voltage_across(&m.nodes);
                let cos_theta = ctx.junction_cos[m.junction.0];
                mna.stamp_conductance(
                    n1.matrix_index(),
                    n2.matrix_index(),
                    m.conductance(cos_theta, bias),
                );
            }

            Component::SpinOrbitChannel(s) => {
                let [n1, n2] = s.nodes;
                mna.stamp_conductance(n1.matrix_index(), n2.matrix_index(), s.conductance());
            }
        }
    }

    /// Stamp the charge/flux storage terms into the constant C matrix.
    pub fn stamp_storage(&self, num_nodes: usize, storage: &mut CapacitanceMatrix) {
        match self {
            Component::Capacitor(c) => {
                let [n1, n2] = c.nodes;
                storage.stamp_capacitance(n1.matrix_index(), n2.matrix_index(), c.capacitance);
            }
            Component::Inductor(l) => {
                let br = l.branch.matrix_index(num_nodes);
                storage.add(br, br, -l.inductance);
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::circuit::JunctionId;

    #[test]
    fn test_junction_stamp_uses_angle() {
        let mtj = Component::MagneticJunction(MagneticJunction::new(
            ComponentId(0),
            "MTJ1".to_string(),
            [NodeId(1), NodeId::GROUND],
            JunctionId(0),
            JunctionParams::default(),
        ));
        let x = [0.0];
        let mut parallel = MnaMatrix::new(1);
        let mut antiparallel = MnaMatrix::new(1);
        mtj.stamp(
            &StampContext {
                x: &x,
                time: 0.0,
                junction_cos: &[1.0],
                num_nodes: 2,
            },
            &mut parallel,
        );
        mtj.stamp(
            &StampContext {
                x: &x,
                time: 0.0,
                junction_cos: &[-1.0],
                num_nodes: 2,
            },
            &mut antiparallel,
        );
        let ratio = parallel.get(0, 0) / antiparallel.get(0, 0);
        assert!((ratio - 2.5).abs() < 1e-9);
        assert!(mtj.is_nonlinear());
    }

    #[test]
    fn test_inductor_stamps_branch_and_storage() {
        let l = Component::Inductor(Inductor::new(
            ComponentId(0),
            "L1".to_string(),
            [NodeId(1), NodeId(2)],
            1.0e-9,
            BranchId(0),
        ));
        // Nodes 0..=2 -> two voltages, branch at index 2
        let ctx = StampContext {
            x: &[0.0; 3],
            time: 0.0,
            junction_cos: &[],
            num_nodes: 3,
        };
        let mut mna = MnaMatrix::new(3);
        l.stamp(&ctx, &mut mna);
        assert_eq!(mna.get(0, 2), 1.0);
        assert_eq!(mna.get(2, 1), -1.0);

        let mut storage = CapacitanceMatrix::new(3);
        l.stamp_storage(3, &mut storage);
        assert_eq!(storage.get(2, 2), -1.0e-9);
        assert_eq!(l.branch(), Some(BranchId(0)));
    }
}
