//! Thermal fluctuations.
//!
//! The stochastic field is a Gaussian with per-axis standard deviation
//!
//! ```text
//! σ = sqrt( 2·α·k_B·T / (γ·Ms·V·Δt) )
//! ```
//!
//! Randomness is always injected through [`NoiseSource`] so runs are
//! reproducible from a seed and independent simulators never share state.

use super::Vec3;
use crate::BOLTZMANN;

/// A seedable source of standard normal samples.
pub trait NoiseSource {
    /// Draw one sample from N(0, 1).
    fn next_gaussian(&mut self) -> f64;

    /// Draw an isotropic 3D vector of independent N(0, 1) components.
    fn gaussian_vector(&mut self) -> Vec3 {
        let x = self.next_gaussian();
        let y = self.next_gaussian();
        let z = self.next_gaussian();
        Vec3::new(x, y, z)
    }
}

/// Xorshift128 generator with a Box-Muller normal transform.
#[derive(Debug, Clone)]
pub struct Xor128 {
    x: u32,
    y: u32,
    z: u32,
    w: u32,
    /// Second Box-Muller sample, returned on the next call
    spare: Option<f64>,
}

impl Xor128 {
    pub fn new(seed: u64) -> Self {
        let lo = seed as u32;
        let hi = (seed >> 32) as u32;
        Self {
            x: lo ^ 0x9E37_79B9,
            y: lo.wrapping_mul(1812433253).wrapping_add(1) ^ hi,
            z: hi.wrapping_mul(1812433253).wrapping_mul(2).wrapping_add(2),
            w: lo.wrapping_mul(1812433253).wrapping_mul(3).wrapping_add(3) ^ hi.rotate_left(16),
            spare: None,
        }
    }

    pub fn next_u32(&mut self) -> u32 {
        let t = self.x ^ (self.x << 11);
        self.x = self.y;
        self.y = self.z;
        self.z = self.w;
        self.w = self.w ^ (self.w >> 19) ^ (t ^ (t >> 8));
        self.w
    }

    /// Returns a float in (0.0, 1.0]
    pub fn next_unit(&mut self) -> f64 {
        (self.next_u32() as f64 + 1.0) / (u32::MAX as f64 + 1.0)
    }
}

impl NoiseSource for Xor128 {
    fn next_gaussian(&mut self) -> f64 {
        if let Some(sample) = self.spare.take() {
            return sample;
        }
        let u1 = self.next_unit();
        let u2 = self.next_unit();
        let radius = (-2.0 * u1.ln()).sqrt();
        let phase = 2.0 * std::f64::consts::PI * u2;
        self.spare = Some(radius * phase.sin());
        radius * phase.cos()
    }
}

/// Per-axis standard deviation of the thermal field in T.
pub fn thermal_field_std(
    alpha: f64,
    temperature: f64,
    gamma: f64,
    saturation_magnetization: f64,
    volume: f64,
    dt: f64,
) -> f64 {
    if temperature <= 0.0 || alpha <= 0.0 {
        return 0.0;
    }
    (2.0 * alpha * BOLTZMANN * temperature / (gamma * saturation_magnetization * volume * dt)).sqrt()
}

/// Draw one thermal field sample.
pub fn thermal_field<N: NoiseSource + ?Sized>(std_dev: f64, noise: &mut N) -> Vec3 {
    if std_dev == 0.0 {
        return Vec3::zeros();
    }
    noise.gaussian_vector() * std_dev
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::GYROMAGNETIC_RATIO;
    use approx::assert_relative_eq;

    #[test]
    fn test_xor128_deterministic() {
        let mut rng1 = Xor128::new(42);
        let mut rng2 = Xor128::new(42);
        for _ in 0..100 {
            assert_eq!(rng1.next_u32(), rng2.next_u32());
        }
        let mut rng3 = Xor128::new(43);
        let differs = (0..10).any(|_| rng1.next_u32() != rng3.next_u32());
        assert!(differs);
    }

    #[test]
    fn test_unit_range() {
        let mut rng = Xor128::new(0);
        for _ in 0..1000 {
            let v = rng.next_unit();
            assert!(v > 0.0 && v <= 1.0, "next_unit out of range: {}", v);
        }
    }

    #[test]
    fn test_gaussian_moments() {
        let mut rng = Xor128::new(7);
        let n = 200_000;
        let samples: Vec<f64> = (0..n).map(|_| rng.next_gaussian()).collect();
        let mean = samples.iter().sum::<f64>() / n as f64;
        let variance = samples.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n as f64;
        assert!(mean.abs() < 0.01, "mean = {mean}");
        assert!((variance - 1.0).abs() < 0.02, "variance = {variance}");
    }

    #[test]
    fn test_thermal_std_scaling() {
        let volume = 2.0e-24;
        let base = thermal_field_std(0.01, 300.0, GYROMAGNETIC_RATIO, 1.0e6, volume, 1.0e-12);
        // Quadrupling the time step halves the per-step amplitude
        let longer = thermal_field_std(0.01, 300.0, GYROMAGNETIC_RATIO, 1.0e6, volume, 4.0e-12);
        assert_relative_eq!(base / longer, 2.0, epsilon = 1e-12);
        assert_eq!(thermal_field_std(0.01, 0.0, GYROMAGNETIC_RATIO, 1.0e6, volume, 1.0e-12), 0.0);
    }

    #[test]
    fn test_zero_std_draws_nothing() {
        let mut rng = Xor128::new(1);
        let before = rng.clone().next_u32();
        assert_eq!(thermal_field(0.0, &mut rng), Vec3::zeros());
        // The generator was not advanced
        assert_eq!(rng.next_u32(), before);
    }
}
