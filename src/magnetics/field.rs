//! Effective field assembly for a single macrospin layer.
//!
//! All contributions are returned in Tesla (µ0·H).

use super::{LayerParams, Vec3};
use crate::MU0;

/// Uniaxial anisotropy field (2Ku/Ms)(m·ê)ê.
pub fn uniaxial_anisotropy_field(layer: &LayerParams, m: &Vec3) -> Vec3 {
    match layer.easy_axis.try_normalize(0.0) {
        Some(axis) => axis * (layer.anisotropy_field() * m.dot(&axis)),
        None => Vec3::zeros(),
    }
}

/// Interfacial perpendicular anisotropy field (2K⊥/Ms)·m_z·ẑ.
pub fn perpendicular_anisotropy_field(layer: &LayerParams, m: &Vec3) -> Vec3 {
    let h = 2.0 * layer.perpendicular_anisotropy / layer.saturation_magnetization;
    Vec3::new(0.0, 0.0, h * m.z)
}

/// Demagnetizing field -µ0·Ms·N·m with a diagonal demag tensor.
pub fn demagnetizing_field(layer: &LayerParams, m: &Vec3) -> Vec3 {
    -layer.demag_factors.component_mul(m) * (MU0 * layer.saturation_magnetization)
}

/// Internal field of a layer: anisotropies, demag and exchange bias.
pub fn internal_field(layer: &LayerParams, m: &Vec3) -> Vec3 {
    uniaxial_anisotropy_field(layer, m)
        + perpendicular_anisotropy_field(layer, m)
        + demagnetizing_field(layer, m)
        + layer.exchange_bias
}

/// Total effective field: internal contributions plus an applied field.
pub fn effective_field(layer: &LayerParams, m: &Vec3, applied: &Vec3) -> Vec3 {
    internal_field(layer, m) + applied
}
