//! Magnetic tunnel junctions and spin-orbit channels.
//!
//! A junction is a two-terminal element whose resistance depends on the
//! angle between its free and reference layers and on its own bias. The
//! first terminal is the free-layer side: positive current flows from it
//! into the reference layer and favors parallel alignment.
//!
//! A spin-orbit channel is a heavy-metal strip under a junction's free
//! layer. Electrically it is a plain resistor; the current it carries is
//! converted to an in-plane current density that drives the target
//! junction through the spin Hall effect.

use crate::circuit::{ComponentId, JunctionId, NodeId};
use crate::magnetics::resistance::{DEFAULT_HALF_BIAS, ResistanceModel};
use crate::magnetics::{StackParams, Vec3};

/// Spin Hall parameters of the heavy metal under a junction's free layer.
#[derive(Debug, Clone, PartialEq)]
pub struct SotParams {
    /// Effective spin Hall angle θ_SH
    pub spin_hall_angle: f64,
    /// Field-like to damping-like torque ratio ξ
    pub field_like_ratio: f64,
    /// In-plane charge current direction (normalized on use)
    pub current_direction: Vec3,
}

impl Default for SotParams {
    fn default() -> Self {
        // β-tungsten
        Self {
            spin_hall_angle: 0.3,
            field_like_ratio: 0.0,
            current_direction: Vec3::x(),
        }
    }
}

/// Parameters of a magnetic tunnel junction.
#[derive(Debug, Clone, PartialEq)]
pub struct JunctionParams {
    /// Junction cross-section in m²
    pub area: f64,
    pub resistance: ResistanceModel,
    /// Bias at which the magnetoresistance ratio halves (V)
    pub half_bias: f64,
    pub stack: StackParams,
    /// Field-like to damping-like spin-transfer ratio
    pub stt_field_like_ratio: f64,
    pub sot: SotParams,
}

impl Default for JunctionParams {
    /// A 50 nm diameter perpendicular CoFeB/MgO junction with RA = 10 Ω·µm²
    /// and TMR = 150 %.
    fn default() -> Self {
        let radius = 25.0e-9;
        Self {
            area: std::f64::consts::PI * radius * radius,
            resistance: ResistanceModel::default(),
            half_bias: DEFAULT_HALF_BIAS,
            stack: StackParams::default(),
            stt_field_like_ratio: 0.0,
            sot: SotParams::default(),
        }
    }
}

impl JunctionParams {
    pub fn with_area(mut self, area: f64) -> Self {
        self.area = area;
        self
    }

    /// Circular cross-section of the given diameter.
    pub fn with_diameter(mut self, diameter: f64) -> Self {
        self.area = std::f64::consts::PI * diameter * diameter / 4.0;
        self
    }

    pub fn with_resistance(mut self, model: ResistanceModel) -> Self {
        self.resistance = model;
        self
    }

    pub fn with_half_bias(mut self, half_bias: f64) -> Self {
        self.half_bias = half_bias;
        self
    }

    pub fn with_stack(mut self, stack: StackParams) -> Self {
        self.stack = stack;
        self
    }

    pub fn with_stt_field_like_ratio(mut self, ratio: f64) -> Self {
        self.stt_field_like_ratio = ratio;
        self
    }

    pub fn with_sot(mut self, sot: SotParams) -> Self {
        self.sot = sot;
        self
    }

    /// Junction resistance (Ω) at a given free/reference angle cosine and bias.
    pub fn resistance(&self, cos_theta: f64, bias: f64) -> f64 {
        let theta = cos_theta.clamp(-1.0, 1.0).acos();
        self.resistance
            .area_resistance_biased(theta, bias, self.half_bias, &self.stack)
            / self.area
    }
}

/// A magnetic tunnel junction instance.
#[derive(Debug, Clone)]
pub struct MagneticJunction {
    pub id: ComponentId,
    pub name: String,
    pub nodes: [NodeId; 2], // [free-layer side, reference-layer side]
    pub junction: JunctionId,
    pub params: JunctionParams,
}

impl MagneticJunction {
    pub fn new(
        id: ComponentId,
        name: String,
        nodes: [NodeId; 2],
        junction: JunctionId,
        params: JunctionParams,
    ) -> Self {
        Self {
            id,
            name,
            nodes,
            junction,
            params,
        }
    }

    /// Conductance at the given angle cosine and bias.
    pub fn conductance(&self, cos_theta: f64, bias: f64) -> f64 {
        1.0 / self.params.resistance(cos_theta, bias)
    }
}

/// Geometry of a heavy-metal strip.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChannelParams {
    /// Strip resistance in Ω
    pub resistance: f64,
    /// Strip width in m
    pub width: f64,
    /// Strip thickness in m
    pub thickness: f64,
}

impl ChannelParams {
    pub fn new(resistance: f64, width: f64, thickness: f64) -> Self {
        Self {
            resistance,
            width,
            thickness,
        }
    }

    /// Cross-section carrying the in-plane current (m²).
    pub fn cross_section(&self) -> f64 {
        self.width * self.thickness
    }
}

/// A spin-orbit channel driving a junction's free layer.
#[derive(Debug, Clone)]
pub struct SpinOrbitChannel {
    pub id: ComponentId,
    pub name: String,
    pub nodes: [NodeId; 2],
    pub target: JunctionId,
    pub params: ChannelParams,
}

impl SpinOrbitChannel {
    pub fn new(
        id: ComponentId,
        name: String,
        nodes: [NodeId; 2],
        target: JunctionId,
        params: ChannelParams,
    ) -> Self {
        Self {
            id,
            name,
            nodes,
            target,
            params,
        }
    }

    pub fn conductance(&self) -> f64 {
        1.0 / self.params.resistance
    }

    /// In-plane current density (A/m²) for a voltage drop across the strip.
    pub fn current_density(&self, voltage: f64) -> f64 {
        voltage * self.conductance() / self.params.cross_section()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_default_junction_resistance() {
        let params = JunctionParams::default();
        let r_p = params.resistance(1.0, 0.0);
        // 10 Ω·µm² over π·(25 nm)² ≈ 5.09 kΩ
        assert_relative_eq!(r_p, 10.0e-12 / params.area, epsilon = 1e-9);
        assert!(r_p > 5.0e3 && r_p < 5.2e3);
        assert_relative_eq!(params.resistance(-1.0, 0.0), 2.5 * r_p, epsilon = 1e-6);
    }

    #[test]
    fn test_bias_lowers_antiparallel_resistance() {
        let params = JunctionParams::default();
        let zero_bias = params.resistance(-1.0, 0.0);
        let biased = params.resistance(-1.0, 0.5);
        assert!(biased < zero_bias);
        // Parallel state is bias independent
        assert_relative_eq!(
            params.resistance(1.0, 0.5),
            params.resistance(1.0, 0.0),
            epsilon = 1e-9
        );
    }

    #[test]
    fn test_cosine_overshoot_is_clamped() {
        let params = JunctionParams::default();
        assert!(params.resistance(1.0 + 1e-12, 0.0).is_finite());
    }

    #[test]
    fn test_channel_current_density() {
        let channel = SpinOrbitChannel::new(
            ComponentId(0),
            "SOT1".to_string(),
            [NodeId(1), NodeId(0)],
            JunctionId(0),
            ChannelParams::new(500.0, 100.0e-9, 5.0e-9),
        );
        // 0.5 V / 500 Ω = 1 mA over 5e-16 m²
        assert_relative_eq!(channel.current_density(0.5), 2.0e12, epsilon = 1.0);
    }
}
