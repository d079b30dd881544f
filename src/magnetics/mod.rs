//! Magnetization dynamics and magnetoresistance.
//!
//! Everything in here works on single-domain (macrospin) layers. Fields are
//! expressed in Tesla, current densities in A/m², magnetizations as unit
//! vectors.
//!
//! - [`resistance`] - Area-resistance laws (TMR, Julliere, Valet-Fert)
//! - [`field`] - Effective field assembly (anisotropy, demag, exchange bias)
//! - [`torque`] - Spin-transfer and spin-orbit torque pseudo-fields
//! - [`llg`] - Explicit LLG integration (Euler, Heun)
//! - [`thermal`] - Seeded Gaussian noise and the thermal field
//! - [`sublattice`] - Two-sublattice (ferrimagnetic) coupled integration

mod layer;
pub mod field;
pub mod llg;
pub mod resistance;
pub mod sublattice;
pub mod thermal;
pub mod torque;

pub use layer::{LayerParams, MagneticStack, SafParams, StackParams};
pub use llg::{IntegrationScheme, MagnetizationIntegrator};
pub use resistance::{GmrLayer, ResistanceModel, ValetFertStack};
pub use sublattice::{SublatticePair, SublatticeState};
pub use thermal::{NoiseSource, Xor128};

/// Three-component real vector used for magnetizations and fields.
pub type Vec3 = nalgebra::Vector3<f64>;
