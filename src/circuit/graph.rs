//! Circuit graph structure and programmatic builder.

use std::collections::HashMap;

use super::types::{BranchId, ComponentId, JunctionId, NodeId, TransientDirective};
use crate::components::{
    Capacitor, ChannelParams, Component, CurrentSource, Inductor, JunctionParams,
    MagneticJunction, Resistor, SpinOrbitChannel, VoltageSource, Waveform,
};
use crate::error::{Result, SpinSimError};

/// Whether a node name refers to ground ("0" or "gnd", any case).
pub fn is_ground_name(name: &str) -> bool {
    name == "0" || name.eq_ignore_ascii_case("gnd")
}

/// A complete circuit ready for simulation.
#[derive(Debug, Clone)]
pub struct Circuit {
    /// All components in the circuit
    pub components: Vec<Component>,

    /// Mapping from node names to node IDs (ground is stored as "0")
    pub node_map: HashMap<String, NodeId>,

    /// Reverse mapping from node IDs to names (for error messages)
    pub node_names: Vec<String>,

    /// Number of nodes (including ground)
    pub num_nodes: usize,

    /// Number of branch current variables (voltage sources, inductors)
    pub num_branches: usize,

    /// Component index of each junction, indexed by JunctionId
    junctions: Vec<usize>,

    /// Optional `.TRAN` metadata
    pub transient: Option<TransientDirective>,
}

impl Default for Circuit {
    fn default() -> Self {
        Self::new()
    }
}

impl Circuit {
    /// Create an empty circuit containing only the ground node.
    pub fn new() -> Self {
        let mut node_map = HashMap::new();
        node_map.insert("0".to_string(), NodeId::GROUND);
        Self {
            components: Vec::new(),
            node_map,
            node_names: vec!["0".to_string()],
            num_nodes: 1,
            num_branches: 0,
            junctions: Vec::new(),
            transient: None,
        }
    }

    /// Attach transient analysis metadata.
    pub fn with_transient(mut self, directive: TransientDirective) -> Self {
        self.transient = Some(directive);
        self
    }

    /// Look up a node by name, creating it on first use.
    pub fn node(&mut self, name: &str) -> NodeId {
        if is_ground_name(name) {
            return NodeId::GROUND;
        }
        if let Some(&id) = self.node_map.get(name) {
            return id;
        }
        let id = NodeId(self.num_nodes);
        self.node_map.insert(name.to_string(), id);
        self.node_names.push(name.to_string());
        self.num_nodes += 1;
        id
    }

    fn next_component_id(&self) -> ComponentId {
        ComponentId(self.components.len())
    }

    fn next_branch(&mut self) -> BranchId {
        let branch = BranchId(self.num_branches);
        self.num_branches += 1;
        branch
    }

    fn push(&mut self, component: Component) -> ComponentId {
        let id = component.id();
        self.components.push(component);
        id
    }

    pub fn add_resistor(&mut self, name: &str, n1: &str, n2: &str, resistance: f64) -> ComponentId {
        let nodes = [self.node(n1), self.node(n2)];
        let id = self.next_component_id();
        self.push(Component::Resistor(Resistor::new(
            id,
            name.to_string(),
            nodes,
            resistance,
        )))
    }

    pub fn add_capacitor(&mut self, name: &str, n1: &str, n2: &str, capacitance: f64) -> ComponentId {
        let nodes = [self.node(n1), self.node(n2)];
        let id = self.next_component_id();
        self.push(Component::Capacitor(Capacitor::new(
            id,
            name.to_string(),
            nodes,
            capacitance,
        )))
    }

    pub fn add_inductor(&mut self, name: &str, n1: &str, n2: &str, inductance: f64) -> ComponentId {
        let nodes = [self.node(n1), self.node(n2)];
        let id = self.next_component_id();
        let branch = self.next_branch();
        self.push(Component::Inductor(Inductor::new(
            id,
            name.to_string(),
            nodes,
            inductance,
            branch,
        )))
    }

    /// Add a voltage source enforcing V(pos) - V(neg) = waveform(t).
    pub fn add_voltage_source(
        &mut self,
        name: &str,
        pos: &str,
        neg: &str,
        waveform: Waveform,
    ) -> ComponentId {
        let nodes = [self.node(pos), self.node(neg)];
        let id = self.next_component_id();
        let branch = self.next_branch();
        self.push(Component::VoltageSource(VoltageSource::new(
            id,
            name.to_string(),
            nodes,
            waveform,
            branch,
        )))
    }

    /// Add a current source driving waveform(t) out of `from` and into `to`.
    pub fn add_current_source(
        &mut self,
        name: &str,
        from: &str,
        to: &str,
        waveform: Waveform,
    ) -> ComponentId {
        let nodes = [self.node(from), self.node(to)];
        let id = self.next_component_id();
        self.push(Component::CurrentSource(CurrentSource::new(
            id,
            name.to_string(),
            nodes,
            waveform,
        )))
    }

    /// Add a magnetic tunnel junction between its free-layer and
    /// reference-layer terminals.
    pub fn add_junction(
        &mut self,
        name: &str,
        free_side: &str,
        reference_side: &str,
        params: JunctionParams,
    ) -> JunctionId {
        let nodes = [self.node(free_side), self.node(reference_side)];
        let id = self.next_component_id();
        let junction = JunctionId(self.junctions.len());
        self.junctions.push(self.components.len());
        self.push(Component::MagneticJunction(MagneticJunction::new(
            id,
            name.to_string(),
            nodes,
            junction,
            params,
        )));
        junction
    }

    /// Add a heavy-metal channel under the free layer of junction `target`.
    ///
    /// Positive current flows from `n1` to `n2` along the junction's
    /// SOT current direction.
    pub fn add_spin_orbit_channel(
        &mut self,
        name: &str,
        n1: &str,
        n2: &str,
        target: &str,
        params: ChannelParams,
    ) -> Result<ComponentId> {
        let junction = self
            .find_junction(target)
            .ok_or_else(|| SpinSimError::JunctionNotFound {
                name: target.to_string(),
            })?;
        let nodes = [self.node(n1), self.node(n2)];
        let id = self.next_component_id();
        Ok(self.push(Component::SpinOrbitChannel(SpinOrbitChannel::new(
            id,
            name.to_string(),
            nodes,
            junction,
            params,
        ))))
    }

    /// Get the total size of the MNA solution vector.
    pub fn matrix_size(&self) -> usize {
        // Nodes (excluding ground) + branch currents
        (self.num_nodes - 1) + self.num_branches
    }

    /// Get the matrix index for a branch current.
    pub fn branch_index(&self, branch: BranchId) -> usize {
        branch.matrix_index(self.num_nodes)
    }

    /// Find a node ID by name.
    pub fn find_node(&self, name: &str) -> Option<NodeId> {
        if is_ground_name(name) {
            return Some(NodeId::GROUND);
        }
        self.node_map.get(name).copied()
    }

    /// Get the name of a node.
    pub fn node_name(&self, node: NodeId) -> &str {
        &self.node_names[node.0]
    }

    /// Find a component by name.
    pub fn find_component(&self, name: &str) -> Option<&Component> {
        self.components.iter().find(|c| c.name() == name)
    }

    pub fn num_junctions(&self) -> usize {
        self.junctions.len()
    }

    pub fn junction(&self, id: JunctionId) -> Option<&MagneticJunction> {
        let index = *self.junctions.get(id.0)?;
        match &self.components[index] {
            Component::MagneticJunction(m) => Some(m),
            _ => None,
        }
    }

    /// Junctions in JunctionId order.
    pub fn junctions(&self) -> impl Iterator<Item = &MagneticJunction> {
        self.components.iter().filter_map(|c| match c {
            Component::MagneticJunction(m) => Some(m),
            _ => None,
        })
    }

    pub fn find_junction(&self, name: &str) -> Option<JunctionId> {
        self.junctions().find(|m| m.name == name).map(|m| m.junction)
    }

    pub fn spin_orbit_channels(&self) -> impl Iterator<Item = &SpinOrbitChannel> {
        self.components.iter().filter_map(|c| match c {
            Component::SpinOrbitChannel(s) => Some(s),
            _ => None,
        })
    }

    /// Whether any component requires Newton-Raphson iteration.
    pub fn is_nonlinear(&self) -> bool {
        self.components.iter().any(|c| c.is_nonlinear())
    }
}
