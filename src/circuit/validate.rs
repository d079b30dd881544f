//! Circuit validation.

use std::collections::HashSet;

use crate::components::Component;
use crate::error::{Result, SpinSimError};
use crate::magnetics::LayerParams;

use super::Circuit;

/// Validate a circuit for simulation.
///
/// Checks:
/// - The circuit has at least one component
/// - No duplicate component names
/// - Component parameters are positive and finite
/// - Junction initial magnetizations are non-zero
/// - Every magnetic layer, SAF pinned layer included, has sane material data
/// - Every node is tied to ground through something other than a current source
pub fn validate_circuit(circuit: &Circuit) -> Result<()> {
    if circuit.components.is_empty() {
        return Err(SpinSimError::InvalidTopology {
            message: "Circuit has no components".to_string(),
        });
    }

    let mut names = HashSet::new();
    for component in &circuit.components {
        if !names.insert(component.name()) {
            return Err(SpinSimError::DuplicateComponent {
                name: component.name().to_string(),
            });
        }
        validate_parameters(component)?;
    }

    check_dc_paths(circuit)
}

fn require_positive(component: &str, param: &str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(SpinSimError::invalid_parameter(
            component,
            param,
            format!("must be positive and finite, got {}", value),
        ))
    }
}

fn require_non_negative(component: &str, param: &str, value: f64) -> Result<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(SpinSimError::invalid_parameter(
            component,
            param,
            format!("must be non-negative and finite, got {}", value),
        ))
    }
}

fn validate_layer(component: &str, layer_name: &str, layer: &LayerParams) -> Result<()> {
    let param = |field: &str| format!("{}.{}", layer_name, field);
    require_positive(
        component,
        &param("saturation_magnetization"),
        layer.saturation_magnetization,
    )?;
    require_positive(component, &param("thickness"), layer.thickness)?;
    require_non_negative(component, &param("damping"), layer.damping)?;
    require_non_negative(component, &param("temperature"), layer.temperature)?;
    if !(0.0..=1.0).contains(&layer.polarization) {
        return Err(SpinSimError::invalid_parameter(
            component,
            &param("polarization"),
            format!("must lie in [0, 1], got {}", layer.polarization),
        ));
    }
    Ok(())
}

fn validate_parameters(component: &Component) -> Result<()> {
    match component {
        Component::Resistor(r) => require_positive(&r.name, "resistance", r.resistance),
        Component::Capacitor(c) => require_positive(&c.name, "capacitance", c.capacitance),
        Component::Inductor(l) => require_positive(&l.name, "inductance", l.inductance),
        Component::VoltageSource(_) | Component::CurrentSource(_) => Ok(()),
        Component::MagneticJunction(m) => {
            let params = &m.params;
            require_positive(&m.name, "area", params.area)?;
            require_positive(
                &m.name,
                "ra_parallel",
                params.resistance.parallel_area_resistance(),
            )?;
            let ratio = params.resistance.magnetoresistance_ratio(&params.stack);
            if !ratio.is_finite() || ratio < 0.0 {
                return Err(SpinSimError::invalid_parameter(
                    &m.name,
                    "magnetoresistance",
                    format!("ratio must be finite and non-negative, got {}", ratio),
                ));
            }
            if params.stack.initial_free.norm() == 0.0 {
                return Err(SpinSimError::invalid_parameter(
                    &m.name,
                    "initial_free",
                    "magnetization must be non-zero",
                ));
            }
            if params.stack.initial_reference.norm() == 0.0 {
                return Err(SpinSimError::invalid_parameter(
                    &m.name,
                    "initial_reference",
                    "magnetization must be non-zero",
                ));
            }
            validate_layer(&m.name, "free", &params.stack.free)?;
            validate_layer(&m.name, "reference", &params.stack.reference)?;
            if let Some(saf) = &params.stack.saf {
                validate_layer(&m.name, "saf.pinned", &saf.pinned)?;
                if !saf.coupling_field.is_finite() {
                    return Err(SpinSimError::invalid_parameter(
                        &m.name,
                        "saf.coupling_field",
                        format!("must be finite, got {}", saf.coupling_field),
                    ));
                }
            }
            Ok(())
        }
        Component::SpinOrbitChannel(s) => {
            require_positive(&s.name, "resistance", s.params.resistance)?;
            require_positive(&s.name, "width", s.params.width)?;
            require_positive(&s.name, "thickness", s.params.thickness)
        }
    }
}

/// Union-find over node-tying components; every node must share a root with ground.
fn check_dc_paths(circuit: &Circuit) -> Result<()> {
    let mut parent: Vec<usize> = (0..circuit.num_nodes).collect();

    fn find(parent: &mut [usize], mut i: usize) -> usize {
        while parent[i] != i {
            parent[i] = parent[parent[i]];
            i = parent[i];
        }
        i
    }

    for component in circuit.components.iter().filter(|c| c.ties_nodes()) {
        let [a, b] = component.nodes();
        let ra = find(&mut parent, a.0);
        let rb = find(&mut parent, b.0);
        if ra != rb {
            parent[ra] = rb;
        }
    }

    let ground = find(&mut parent, 0);
    for node in 1..circuit.num_nodes {
        if find(&mut parent, node) != ground {
            return Err(SpinSimError::FloatingNode {
                node: circuit.node_names[node].clone(),
            });
        }
    }
    Ok(())
}
