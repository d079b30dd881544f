//! Current-induced torques expressed as pseudo-fields.
//!
//! A torque density τ acting on the free layer is folded into the LLG
//! equation as an extra field B such that -γ m×B reproduces it. Both the
//! spin-transfer (through-plane current) and the spin-orbit (in-plane
//! heavy-metal current) torques have a damping-like and a field-like part:
//!
//! ```text
//! B_DL = a · (m × p)        drives m towards p for a > 0
//! B_FL = ξ · a · p
//! ```

use super::{LayerParams, Vec3};
use crate::{ELEMENTARY_CHARGE, HBAR};

/// Slonczewski spin-transfer efficiency for a tunnel junction.
///
/// η(θ) = P / (2·(1 + P²·cos θ))
pub fn slonczewski_efficiency(polarization: f64, cos_theta: f64) -> f64 {
    polarization / (2.0 * (1.0 + polarization * polarization * cos_theta))
}

/// Damping-like spin-transfer amplitude a_J = ħ·η·J / (2·e·Ms·t), in T.
///
/// Positive current density (flowing from the free-layer terminal towards
/// the reference layer) favors parallel alignment.
pub fn spin_transfer_amplitude(layer: &LayerParams, current_density: f64, efficiency: f64) -> f64 {
    HBAR * efficiency * current_density
        / (2.0 * ELEMENTARY_CHARGE * layer.saturation_magnetization * layer.thickness)
}

/// Spin-transfer pseudo-field on a free layer `m` from a reference layer `p`.
pub fn spin_transfer_field(
    layer: &LayerParams,
    m: &Vec3,
    p: &Vec3,
    current_density: f64,
    field_like_ratio: f64,
) -> Vec3 {
    if current_density == 0.0 {
        return Vec3::zeros();
    }
    let cos_theta = m.dot(p).clamp(-1.0, 1.0);
    let eta = slonczewski_efficiency(layer.polarization, cos_theta);
    let a_j = spin_transfer_amplitude(layer, current_density, eta);
    m.cross(p) * a_j + p * (field_like_ratio * a_j)
}

/// Spin polarization direction σ = ẑ × ĵ of a heavy-metal current along `current_direction`.
pub fn spin_hall_polarization(current_direction: &Vec3) -> Vec3 {
    Vec3::z()
        .cross(current_direction)
        .try_normalize(0.0)
        .unwrap_or_else(Vec3::zeros)
}

/// Spin-orbit pseudo-field from an in-plane charge current density in the heavy metal.
///
/// a = ħ·θ_SH·J / (2·e·Ms·t_F)
pub fn spin_orbit_field(
    layer: &LayerParams,
    m: &Vec3,
    sigma: &Vec3,
    current_density: f64,
    spin_hall_angle: f64,
    field_like_ratio: f64,
) -> Vec3 {
    if current_density == 0.0 {
        return Vec3::zeros();
    }
    let a = spin_transfer_amplitude(layer, current_density, spin_hall_angle);
    m.cross(sigma) * a + sigma * (field_like_ratio * a)
}

/// Zero-temperature critical current density for a perpendicular free layer.
///
/// J_c = 2·e·α·Ms·t·B_k,eff / (ħ·η), evaluated at the given starting angle.
pub fn critical_current_density(layer: &LayerParams, cos_theta: f64) -> f64 {
    let eta = slonczewski_efficiency(layer.polarization, cos_theta);
    2.0 * ELEMENTARY_CHARGE
        * layer.damping
        * layer.saturation_magnetization
        * layer.thickness
        * layer.effective_perpendicular_field()
        / (HBAR * eta)
}

#[cfg(test)]
mod tests {
    use super::super::field::effective_field;
    use super::super::{IntegrationScheme, MagnetizationIntegrator};
    use super::*;
    use approx::assert_relative_eq;

    fn switching_layer() -> LayerParams {
        LayerParams::cofeb_free().with_damping(0.05)
    }

    /// Run a free layer starting near -z under STT from a +z reference.
    fn final_mz(current_density: f64, steps: usize) -> f64 {
        let layer = switching_layer();
        let p = Vec3::z();
        let tilt: f64 = 0.1;
        let mut m = Vec3::new(tilt.sin(), 0.0, -tilt.cos());
        let integrator = MagnetizationIntegrator::new(IntegrationScheme::Heun);
        let dt = 1.0e-13;
        for _ in 0..steps {
            m = integrator.step(&m, layer.damping, dt, |m| {
                effective_field(&layer, m, &Vec3::zeros())
                    + spin_transfer_field(&layer, m, &p, current_density, 0.0)
            });
        }
        m.z
    }

    #[test]
    fn test_efficiency_larger_when_antiparallel() {
        let p = 0.6;
        assert!(slonczewski_efficiency(p, -1.0) > slonczewski_efficiency(p, 1.0));
        assert_relative_eq!(slonczewski_efficiency(p, 0.0), 0.3, epsilon = 1e-12);
    }

    #[test]
    fn test_spin_transfer_field_perpendicular_to_m() {
        let layer = LayerParams::cofeb_free();
        let m = Vec3::new(0.6, 0.0, 0.8);
        let h = spin_transfer_field(&layer, &m, &Vec3::z(), 1.0e11, 0.0);
        assert!(h.dot(&m).abs() < 1e-15);
        assert!(h.norm() > 0.0);
    }

    #[test]
    fn test_spin_hall_polarization_for_x_current() {
        let sigma = spin_hall_polarization(&Vec3::x());
        assert_relative_eq!(sigma.y, 1.0, epsilon = 1e-15);
        assert_eq!(spin_hall_polarization(&Vec3::z()), Vec3::zeros());
    }

    #[test]
    fn test_spin_orbit_field_components() {
        let layer = LayerParams::cofeb_free();
        let sigma = Vec3::y();
        let m = Vec3::z();
        let h = spin_orbit_field(&layer, &m, &sigma, 1.0e11, 0.3, 0.5);
        let a = spin_transfer_amplitude(&layer, 1.0e11, 0.3);
        // m × σ = z × y = -x
        assert_relative_eq!(h.x, -a, epsilon = 1e-15);
        assert_relative_eq!(h.y, 0.5 * a, epsilon = 1e-15);
    }

    #[test]
    fn test_stt_above_threshold_switches() {
        let jc = critical_current_density(&switching_layer(), -1.0);
        assert!(jc > 1.0e10 && jc < 1.0e12, "jc = {jc:e}");
        assert!(final_mz(3.0 * jc, 40_000) > 0.0);
    }

    #[test]
    fn test_stt_below_threshold_does_not_switch() {
        let jc = critical_current_density(&switching_layer(), -1.0);
        let mz = final_mz(0.1 * jc, 40_000);
        assert!(mz < -0.99, "mz = {mz}");
    }
}
