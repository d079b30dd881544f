//! Magnetic layer parameters and the per-junction magnetization state.

use super::resistance::cos_angle;
use super::Vec3;
use crate::MU0;

/// Material and geometry parameters of a single ferromagnetic layer.
#[derive(Debug, Clone, PartialEq)]
pub struct LayerParams {
    /// Saturation magnetization Ms in A/m
    pub saturation_magnetization: f64,
    /// Gilbert damping constant (dimensionless)
    pub damping: f64,
    /// Uniaxial anisotropy constant Ku in J/m³, along `easy_axis`
    pub anisotropy: f64,
    /// Uniaxial easy axis (normalized on use)
    pub easy_axis: Vec3,
    /// Interfacial perpendicular anisotropy in J/m³, along z
    pub perpendicular_anisotropy: f64,
    /// Demagnetizing factors (Nx, Ny, Nz), summing to 1
    pub demag_factors: Vec3,
    /// Layer thickness in m
    pub thickness: f64,
    /// Layer temperature in K
    pub temperature: f64,
    /// Spin polarization P (0..1)
    pub polarization: f64,
    /// Exchange-bias field in T (pinned layers)
    pub exchange_bias: Vec3,
}

impl Default for LayerParams {
    fn default() -> Self {
        Self::cofeb_free()
    }
}

impl LayerParams {
    /// Perpendicular CoFeB free layer (MgO interface), ~1.3 nm.
    ///
    /// The interfacial anisotropy slightly exceeds the thin-film shape
    /// anisotropy, leaving roughly 0.2 T of effective perpendicular field.
    pub fn cofeb_free() -> Self {
        Self {
            saturation_magnetization: 1.0e6,
            damping: 0.01,
            anisotropy: 0.0,
            easy_axis: Vec3::z(),
            perpendicular_anisotropy: 7.3e5,
            demag_factors: Vec3::new(0.0, 0.0, 1.0),
            thickness: 1.3e-9,
            temperature: 300.0,
            polarization: 0.6,
            exchange_bias: Vec3::zeros(),
        }
    }

    /// Perpendicular CoFeB reference layer, strongly pinned along +z.
    pub fn cofeb_reference() -> Self {
        Self {
            saturation_magnetization: 1.0e6,
            damping: 0.1,
            anisotropy: 0.0,
            easy_axis: Vec3::z(),
            perpendicular_anisotropy: 1.0e6,
            demag_factors: Vec3::new(0.0, 0.0, 1.0),
            thickness: 2.0e-9,
            temperature: 300.0,
            polarization: 0.6,
            exchange_bias: Vec3::new(0.0, 0.0, 0.5),
        }
    }

    /// In-plane NiFe layer for spin-valve (CPP-GMR) stacks, easy axis along x.
    pub fn permalloy() -> Self {
        Self {
            saturation_magnetization: 8.0e5,
            damping: 0.01,
            anisotropy: 5.0e2,
            easy_axis: Vec3::x(),
            perpendicular_anisotropy: 0.0,
            demag_factors: Vec3::new(0.0, 0.0, 1.0),
            thickness: 3.0e-9,
            temperature: 300.0,
            polarization: 0.4,
            exchange_bias: Vec3::zeros(),
        }
    }

    pub fn with_saturation_magnetization(mut self, ms: f64) -> Self {
        self.saturation_magnetization = ms;
        self
    }

    pub fn with_damping(mut self, damping: f64) -> Self {
        self.damping = damping;
        self
    }

    pub fn with_anisotropy(mut self, ku: f64, easy_axis: Vec3) -> Self {
        self.anisotropy = ku;
        self.easy_axis = easy_axis;
        self
    }

    pub fn with_perpendicular_anisotropy(mut self, k_perp: f64) -> Self {
        self.perpendicular_anisotropy = k_perp;
        self
    }

    pub fn with_demag_factors(mut self, factors: Vec3) -> Self {
        self.demag_factors = factors;
        self
    }

    pub fn with_thickness(mut self, thickness: f64) -> Self {
        self.thickness = thickness;
        self
    }

    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_polarization(mut self, polarization: f64) -> Self {
        self.polarization = polarization;
        self
    }

    pub fn with_exchange_bias(mut self, field: Vec3) -> Self {
        self.exchange_bias = field;
        self
    }

    /// Magnetic volume for a given junction area (m³).
    pub fn volume(&self, area: f64) -> f64 {
        area * self.thickness
    }

    /// Uniaxial anisotropy field 2Ku/Ms in T.
    pub fn anisotropy_field(&self) -> f64 {
        2.0 * self.anisotropy / self.saturation_magnetization
    }

    /// Net restoring field for a perpendicular layer, in T.
    ///
    /// Uniaxial (projected on z) plus interfacial anisotropy, minus the
    /// shape anisotropy between the out-of-plane and in-plane demag factors.
    pub fn effective_perpendicular_field(&self) -> f64 {
        let ez = self.easy_axis.try_normalize(0.0).map_or(0.0, |e| e.z);
        let uniaxial = 2.0 * self.anisotropy * ez * ez / self.saturation_magnetization;
        let interfacial = 2.0 * self.perpendicular_anisotropy / self.saturation_magnetization;
        let shape = MU0
            * self.saturation_magnetization
            * (self.demag_factors.z - self.demag_factors.x);
        uniaxial + interfacial - shape
    }
}

/// Synthetic-antiferromagnet pinned layer below the reference layer.
#[derive(Debug, Clone, PartialEq)]
pub struct SafParams {
    /// Bottom (hard) layer of the SAF
    pub pinned: LayerParams,
    /// Interlayer exchange coupling field in T; negative couples antiparallel
    pub coupling_field: f64,
}

/// Layer parameters and initial orientation of a junction's magnetic stack.
#[derive(Debug, Clone, PartialEq)]
pub struct StackParams {
    pub free: LayerParams,
    /// Layer adjacent to the barrier; its orientation sets the TMR angle
    pub reference: LayerParams,
    pub saf: Option<SafParams>,
    pub initial_free: Vec3,
    pub initial_reference: Vec3,
}

impl Default for StackParams {
    fn default() -> Self {
        Self {
            free: LayerParams::cofeb_free(),
            reference: LayerParams::cofeb_reference(),
            saf: None,
            initial_free: Vec3::z(),
            initial_reference: Vec3::z(),
        }
    }
}

impl StackParams {
    pub fn with_free(mut self, free: LayerParams) -> Self {
        self.free = free;
        self
    }

    pub fn with_reference(mut self, reference: LayerParams) -> Self {
        self.reference = reference;
        self
    }

    /// Add a SAF pinned layer, initialized antiparallel to the reference layer.
    pub fn with_saf(mut self, pinned: LayerParams, coupling_field: f64) -> Self {
        self.saf = Some(SafParams {
            pinned,
            coupling_field,
        });
        self
    }

    pub fn with_initial_free(mut self, m: Vec3) -> Self {
        self.initial_free = m;
        self
    }

    pub fn with_initial_reference(mut self, m: Vec3) -> Self {
        self.initial_reference = m;
        self
    }

    /// Normalized magnetization state at t = 0.
    pub fn initial_state(&self) -> MagneticStack {
        let reference = self.initial_reference.normalize();
        MagneticStack {
            free: self.initial_free.normalize(),
            reference,
            saf_pinned: self.saf.as_ref().map(|_| -reference),
        }
    }
}

/// Magnetization vectors of one junction. Owned by the simulator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MagneticStack {
    pub free: Vec3,
    pub reference: Vec3,
    pub saf_pinned: Option<Vec3>,
}

impl MagneticStack {
    /// Create a two-layer stack, normalizing both vectors.
    pub fn new(free: Vec3, reference: Vec3) -> Self {
        Self {
            free: free.normalize(),
            reference: reference.normalize(),
            saf_pinned: None,
        }
    }

    /// Cosine of the angle between the free and reference layers, clamped to [-1, 1].
    pub fn cos_angle(&self) -> f64 {
        cos_angle(&self.free, &self.reference)
    }

    /// Angle between the free and reference layers (rad).
    pub fn angle(&self) -> f64 {
        self.cos_angle().acos()
    }

    pub fn is_parallel(&self) -> bool {
        self.cos_angle() > 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_cofeb_free_is_perpendicular() {
        let layer = LayerParams::cofeb_free();
        let b_eff = layer.effective_perpendicular_field();
        // 2*7.3e5/1e6 - mu0*1e6 = 1.46 - 1.2566
        assert_relative_eq!(b_eff, 1.46 - MU0 * 1.0e6, epsilon = 1e-9);
        assert!(b_eff > 0.0);
    }

    #[test]
    fn test_saf_starts_antiparallel() {
        let params = StackParams::default().with_saf(LayerParams::cofeb_reference(), -0.8);
        let state = params.initial_state();
        let pinned = state.saf_pinned.unwrap();
        assert_relative_eq!(pinned.dot(&state.reference), -1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_initial_state_is_normalized() {
        let params = StackParams::default().with_initial_free(Vec3::new(0.0, 3.0, -4.0));
        let state = params.initial_state();
        assert_relative_eq!(state.free.norm(), 1.0, epsilon = 1e-12);
        assert_relative_eq!(state.cos_angle(), -0.8, epsilon = 1e-12);
        assert!(!state.is_parallel());
    }
}
