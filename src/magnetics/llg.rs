//! Explicit Landau-Lifshitz-Gilbert integration.
//!
//! In Landau-Lifshitz form, with the effective field B in Tesla:
//!
//! ```text
//! dm/dt = -γ/(1+α²) · ( m×B + α·m×(m×B) )
//! ```
//!
//! Explicit schemes do not preserve |m| = 1, so every step ends with a
//! renormalization. Torques and thermal noise enter through the field
//! closure as pseudo-fields.

use super::Vec3;
use crate::GYROMAGNETIC_RATIO;

/// Time-stepping scheme for the LLG equation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IntegrationScheme {
    /// Forward Euler (first order)
    Euler,
    /// Heun predictor-corrector (second order)
    #[default]
    Heun,
}

/// Right-hand side of the LLG equation.
pub fn llg_rate(m: &Vec3, field: &Vec3, gamma: f64, alpha: f64) -> Vec3 {
    let precession = m.cross(field);
    let damping = m.cross(&precession);
    (precession + damping * alpha) * (-gamma / (1.0 + alpha * alpha))
}

/// Scale back to unit length. A zero or non-finite vector falls back to `fallback`.
pub fn renormalize(v: &Vec3, fallback: &Vec3) -> Vec3 {
    let norm = v.norm();
    if norm.is_finite() && norm > f64::MIN_POSITIVE {
        v / norm
    } else {
        *fallback
    }
}

/// Advances a single unit magnetization by one time step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MagnetizationIntegrator {
    pub scheme: IntegrationScheme,
    /// Gyromagnetic ratio in rad/(s·T)
    pub gamma: f64,
}

impl Default for MagnetizationIntegrator {
    fn default() -> Self {
        Self::new(IntegrationScheme::default())
    }
}

impl MagnetizationIntegrator {
    /// Create an integrator using the free-electron gyromagnetic ratio.
    pub fn new(scheme: IntegrationScheme) -> Self {
        Self {
            scheme,
            gamma: GYROMAGNETIC_RATIO,
        }
    }

    pub fn with_gamma(mut self, gamma: f64) -> Self {
        self.gamma = gamma;
        self
    }

    /// Advance `m` by `dt`.
    ///
    /// `field` returns the total field (internal + applied + torque
    /// pseudo-fields) for a given magnetization; Heun evaluates it twice.
    /// Stochastic contributions must be sampled by the caller once per step
    /// and captured by the closure.
    pub fn step<F>(&self, m: &Vec3, alpha: f64, dt: f64, field: F) -> Vec3
    where
        F: Fn(&Vec3) -> Vec3,
    {
        let k1 = llg_rate(m, &field(m), self.gamma, alpha);
        let next = match self.scheme {
            IntegrationScheme::Euler => m + k1 * dt,
            IntegrationScheme::Heun => {
                let predicted = renormalize(&(m + k1 * dt), m);
                let k2 = llg_rate(&predicted, &field(&predicted), self.gamma, alpha);
                m + (k1 + k2) * (0.5 * dt)
            }
        };
        renormalize(&next, m)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::PI;

    #[test]
    fn test_renormalize_rejects_non_finite() {
        let fallback = Vec3::z();
        assert_eq!(renormalize(&Vec3::new(f64::NAN, 0.0, 0.0), &fallback), fallback);
        assert_eq!(renormalize(&Vec3::new(f64::INFINITY, 1.0, 0.0), &fallback), fallback);
        assert_eq!(renormalize(&Vec3::zeros(), &fallback), fallback);
        assert_relative_eq!(renormalize(&Vec3::new(0.0, 3.0, 4.0), &fallback).norm(), 1.0);
    }

    #[test]
    fn test_nan_field_keeps_unit_magnetization() {
        let integrator = MagnetizationIntegrator::new(IntegrationScheme::Heun);
        let m0 = Vec3::new(0.0, 0.6, 0.8);
        let m = integrator.step(&m0, 0.01, 1.0e-12, |_| Vec3::repeat(f64::NAN));
        assert_eq!(m, m0);
    }

    #[test]
    fn test_field_along_m_leaves_m_unchanged() {
        let integrator = MagnetizationIntegrator::new(IntegrationScheme::Heun);
        let m0 = Vec3::new(1.0, 2.0, -2.0).normalize();
        let mut m = m0;
        for _ in 0..1000 {
            m = integrator.step(&m, 0.0, 1.0e-12, |m| m * 0.7);
        }
        assert_relative_eq!((m - m0).norm(), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_zero_damping_precession_period() {
        let b = 0.1;
        for (scheme, tolerance) in [
            (IntegrationScheme::Heun, 1e-5),
            (IntegrationScheme::Euler, 1e-3),
        ] {
            let integrator = MagnetizationIntegrator::new(scheme);
            let period = 2.0 * PI / (integrator.gamma * b);
            let steps = 4000;
            let dt = period / steps as f64;
            let field = Vec3::new(0.0, 0.0, b);

            let mut m = Vec3::x();
            let mut max_z: f64 = 0.0;
            for i in 0..steps {
                m = integrator.step(&m, 0.0, dt, |_| field);
                max_z = max_z.max(m.z.abs());
                if i == steps / 4 - 1 {
                    // Quarter period: counter-clockwise rotation reaches +y
                    assert_relative_eq!(m.y, 1.0, epsilon = 1e-3);
                }
            }
            assert!(max_z < 1e-12, "left the x-y plane: {max_z}");
            assert!((m - Vec3::x()).norm() < tolerance, "{scheme:?}: {m:?}");
        }
    }

    #[test]
    fn test_norm_preserved_every_step() {
        let integrator = MagnetizationIntegrator::new(IntegrationScheme::Euler);
        let mut m = Vec3::new(0.3, -0.4, 0.866).normalize();
        for i in 0..500 {
            let field = Vec3::new((i as f64).sin(), 0.5, -1.0);
            m = integrator.step(&m, 0.02, 5.0e-12, |_| field);
            assert!((m.norm() - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_damping_relaxes_towards_field() {
        let integrator = MagnetizationIntegrator::default();
        let mut m = Vec3::new(1.0, 0.0, 0.1).normalize();
        let field = Vec3::new(0.0, 0.0, 0.5);
        for _ in 0..20_000 {
            m = integrator.step(&m, 0.1, 1.0e-12, |_| field);
        }
        assert!(m.z > 0.999);
    }

    #[test]
    fn test_rate_is_tangent() {
        let m = Vec3::new(0.0, 0.6, 0.8);
        let rate = llg_rate(&m, &Vec3::new(0.3, -0.1, 0.2), GYROMAGNETIC_RATIO, 0.05);
        assert!(rate.dot(&m).abs() < 1e-3 * rate.norm());
    }
}
