//! Magnetoresistance laws.
//!
//! Every model reduces to a parallel and an antiparallel area-resistance
//! product (Ω·m²) and interpolates between them with the angle θ between
//! the free and reference magnetizations:
//!
//! ```text
//! R(θ) = R_P + (R_AP - R_P) · sin²(θ/2)
//! ```
//!
//! The bias-dependent degradation of the magnetoresistance ratio is applied
//! before interpolation:
//!
//! ```text
//! MR(V) = MR(0) / (1 + (V / V_half)²)
//! ```

use super::{StackParams, Vec3};

/// Default bias at which the magnetoresistance ratio halves (V).
pub const DEFAULT_HALF_BIAS: f64 = 0.5;

/// Cosine of the angle between two magnetizations, clamped to [-1, 1].
///
/// Both vectors are expected to be unit length; the clamp absorbs
/// floating-point overshoot before any inverse cosine.
pub fn cos_angle(a: &Vec3, b: &Vec3) -> f64 {
    a.dot(b).clamp(-1.0, 1.0)
}

/// Angle between two magnetizations in radians.
pub fn angle_between(a: &Vec3, b: &Vec3) -> f64 {
    cos_angle(a, b).acos()
}

/// Julliere tunnel magnetoresistance ratio from two spin polarizations.
///
/// TMR = 2·P1·P2 / (1 - P1·P2)
pub fn julliere_tmr(p1: f64, p2: f64) -> f64 {
    let product = p1 * p2;
    2.0 * product / (1.0 - product)
}

/// Angular interpolation between parallel and antiparallel resistance.
pub fn interpolate(r_parallel: f64, r_antiparallel: f64, theta: f64) -> f64 {
    let s = (0.5 * theta).sin();
    r_parallel + (r_antiparallel - r_parallel) * s * s
}

/// Bias roll-off factor 1/(1 + (V/V_half)²).
pub fn bias_rolloff(bias: f64, half_bias: f64) -> f64 {
    if !half_bias.is_finite() || half_bias <= 0.0 {
        return 1.0;
    }
    let x = bias / half_bias;
    1.0 / (1.0 + x * x)
}

/// One ferromagnetic layer in the two-current series-resistor model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GmrLayer {
    /// Resistivity ρ in Ω·m
    pub resistivity: f64,
    /// Bulk spin asymmetry coefficient β (-1..1)
    pub spin_asymmetry: f64,
    /// Thickness in m
    pub thickness: f64,
}

impl GmrLayer {
    pub fn new(resistivity: f64, spin_asymmetry: f64, thickness: f64) -> Self {
        Self {
            resistivity,
            spin_asymmetry,
            thickness,
        }
    }

    /// Channel area resistances (majority, minority) in Ω·m².
    fn channels(&self) -> (f64, f64) {
        let base = 2.0 * self.resistivity * self.thickness;
        (
            base * (1.0 - self.spin_asymmetry),
            base * (1.0 + self.spin_asymmetry),
        )
    }
}

/// Valet-Fert CPP-GMR stack in the long spin-diffusion-length limit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValetFertStack {
    pub free: GmrLayer,
    pub reference: GmrLayer,
    /// Optional SAF layer, always antiparallel to the reference layer
    pub saf_pinned: Option<GmrLayer>,
    /// Non-magnetic spacer area resistance in Ω·m²
    pub spacer_area_resistance: f64,
}

impl ValetFertStack {
    pub fn new(free: GmrLayer, reference: GmrLayer, spacer_area_resistance: f64) -> Self {
        Self {
            free,
            reference,
            saf_pinned: None,
            spacer_area_resistance,
        }
    }

    pub fn with_saf(mut self, pinned: GmrLayer) -> Self {
        self.saf_pinned = Some(pinned);
        self
    }

    /// Parallel combination of the two spin channels.
    ///
    /// `free_flipped` swaps the free layer's channels (antiparallel state).
    fn channel_total(&self, free_flipped: bool) -> f64 {
        let (f_maj, f_min) = self.free.channels();
        let (r_maj, r_min) = self.reference.channels();
        let spacer = 2.0 * self.spacer_area_resistance;

        let (f_up, f_down) = if free_flipped { (f_min, f_maj) } else { (f_maj, f_min) };
        let mut up = f_up + r_maj + spacer;
        let mut down = f_down + r_min + spacer;

        if let Some(saf) = self.saf_pinned {
            let (s_maj, s_min) = saf.channels();
            up += s_min;
            down += s_maj;
        }

        up * down / (up + down)
    }

    pub fn parallel_area_resistance(&self) -> f64 {
        self.channel_total(false)
    }

    pub fn antiparallel_area_resistance(&self) -> f64 {
        self.channel_total(true)
    }
}

/// Area-resistance law of a junction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ResistanceModel {
    /// Explicit parallel RA (Ω·m²) and TMR ratio (1.5 = 150 %)
    Tmr { ra_parallel: f64, ratio: f64 },
    /// Parallel RA with the TMR ratio derived from the spin polarizations
    /// of the stack's free and reference layers
    Julliere { ra_parallel: f64 },
    /// All-metallic spin valve
    ValetFert(ValetFertStack),
}

impl Default for ResistanceModel {
    fn default() -> Self {
        // RA = 10 Ω·µm², TMR = 150 %
        Self::Tmr {
            ra_parallel: 10.0e-12,
            ratio: 1.5,
        }
    }
}

impl ResistanceModel {
    /// Parallel-state area resistance in Ω·m².
    pub fn parallel_area_resistance(&self) -> f64 {
        match self {
            Self::Tmr { ra_parallel, .. } | Self::Julliere { ra_parallel, .. } => *ra_parallel,
            Self::ValetFert(stack) => stack.parallel_area_resistance(),
        }
    }

    /// Zero-bias magnetoresistance ratio (R_AP - R_P) / R_P of a junction
    /// built on `stack`.
    pub fn magnetoresistance_ratio(&self, stack: &StackParams) -> f64 {
        match self {
            Self::Tmr { ratio, .. } => *ratio,
            Self::Julliere { .. } => {
                julliere_tmr(stack.free.polarization, stack.reference.polarization)
            }
            Self::ValetFert(layers) => {
                let r_p = layers.parallel_area_resistance();
                (layers.antiparallel_area_resistance() - r_p) / r_p
            }
        }
    }

    /// Area resistance at angle θ and zero bias.
    pub fn area_resistance(&self, theta: f64, stack: &StackParams) -> f64 {
        let r_p = self.parallel_area_resistance();
        let r_ap = r_p * (1.0 + self.magnetoresistance_ratio(stack));
        interpolate(r_p, r_ap, theta)
    }

    /// Area resistance at angle θ with the bias roll-off applied to the ratio.
    pub fn area_resistance_biased(
        &self,
        theta: f64,
        bias: f64,
        half_bias: f64,
        stack: &StackParams,
    ) -> f64 {
        let r_p = self.parallel_area_resistance();
        let ratio = self.magnetoresistance_ratio(stack) * bias_rolloff(bias, half_bias);
        interpolate(r_p, r_p * (1.0 + ratio), theta)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::magnetics::LayerParams;
    use approx::assert_relative_eq;
    use std::f64::consts::PI;

    fn stack() -> StackParams {
        StackParams::default()
            .with_free(LayerParams::cofeb_free().with_polarization(0.6))
            .with_reference(LayerParams::cofeb_reference().with_polarization(0.55))
    }

    fn models() -> Vec<ResistanceModel> {
        let cofe = GmrLayer::new(2.0e-7, 0.5, 3.0e-9);
        vec![
            ResistanceModel::default(),
            ResistanceModel::Julliere { ra_parallel: 5.0e-12 },
            ResistanceModel::ValetFert(ValetFertStack::new(cofe, cofe, 1.0e-15)),
            ResistanceModel::ValetFert(
                ValetFertStack::new(cofe, cofe, 1.0e-15).with_saf(GmrLayer::new(2.0e-7, 0.3, 2.0e-9)),
            ),
        ]
    }

    #[test]
    fn test_julliere_ratio() {
        // P1 = P2 = 0.5 -> 2*0.25/0.75
        assert_relative_eq!(julliere_tmr(0.5, 0.5), 2.0 / 3.0, epsilon = 1e-12);
        assert_eq!(julliere_tmr(0.0, 0.7), 0.0);
    }

    #[test]
    fn test_julliere_model_uses_layer_polarizations() {
        let model = ResistanceModel::Julliere { ra_parallel: 5.0e-12 };
        assert_relative_eq!(
            model.magnetoresistance_ratio(&stack()),
            julliere_tmr(0.6, 0.55),
            epsilon = 1e-12
        );

        let unpolarized = stack().with_free(LayerParams::cofeb_free().with_polarization(0.0));
        assert_eq!(model.magnetoresistance_ratio(&unpolarized), 0.0);
        assert_relative_eq!(
            model.area_resistance(PI, &unpolarized),
            5.0e-12,
            epsilon = 1e-24
        );
    }

    #[test]
    fn test_resistance_bounded_by_parallel_and_antiparallel() {
        let stack = stack();
        for model in models() {
            let r0 = model.area_resistance(0.0, &stack);
            let r_pi = model.area_resistance(PI, &stack);
            assert!(r_pi > r0, "{:?}", model);
            let mut previous = r0;
            for i in 0..=64 {
                let theta = PI * i as f64 / 64.0;
                let r = model.area_resistance(theta, &stack);
                assert!(r >= r0 - 1e-24 && r <= r_pi + 1e-24);
                assert!(r >= previous - 1e-24);
                previous = r;
            }
        }
    }

    #[test]
    fn test_valet_fert_without_asymmetry_has_no_gmr() {
        let layer = GmrLayer::new(2.0e-7, 0.0, 3.0e-9);
        let stack = ValetFertStack::new(layer, layer, 1.0e-15);
        // Plain series resistance: rho*t + rho*t + AR_s
        assert_relative_eq!(
            stack.parallel_area_resistance(),
            2.0 * 2.0e-7 * 3.0e-9 + 1.0e-15,
            epsilon = 1e-27
        );
        assert_relative_eq!(
            stack.antiparallel_area_resistance(),
            stack.parallel_area_resistance(),
            epsilon = 1e-27
        );
    }

    #[test]
    fn test_interpolation_midpoint() {
        // sin²(π/4) = 1/2
        assert_relative_eq!(interpolate(1.0, 3.0, PI / 2.0), 2.0, epsilon = 1e-12);
    }

    #[test]
    fn test_angle_clamps_overshoot() {
        let a = Vec3::new(1.0 + 1e-15, 0.0, 0.0);
        let b = Vec3::new(1.0, 0.0, 0.0);
        let theta = angle_between(&a, &b);
        assert!(theta.is_finite());
        assert_eq!(theta, 0.0);

        let c = Vec3::new(-1.0 - 1e-15, 0.0, 0.0);
        assert_relative_eq!(angle_between(&c, &b), PI, epsilon = 1e-12);
    }

    #[test]
    fn test_bias_rolloff_reduces_antiparallel_only() {
        let model = ResistanceModel::default();
        let stack = stack();
        let r_p = model.parallel_area_resistance();
        assert_relative_eq!(
            model.area_resistance_biased(0.0, 0.8, 0.5, &stack),
            r_p,
            epsilon = 1e-24
        );

        // At V = V_half the ratio halves
        let r_ap = model.area_resistance_biased(PI, 0.5, 0.5, &stack);
        assert_relative_eq!(r_ap, r_p * (1.0 + 0.75), epsilon = 1e-20);
        assert!(r_ap < model.area_resistance(PI, &stack));

        // Symmetric in bias polarity
        assert_relative_eq!(
            model.area_resistance_biased(PI, -0.3, 0.5, &stack),
            model.area_resistance_biased(PI, 0.3, 0.5, &stack),
            epsilon = 1e-24
        );
    }

    #[test]
    fn test_infinite_half_bias_disables_rolloff() {
        assert_eq!(bias_rolloff(10.0, f64::INFINITY), 1.0);
    }
}
