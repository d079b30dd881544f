//! Two-sublattice (ferrimagnetic) macrospin.
//!
//! Each sublattice is integrated with its own LLG equation. The intersublattice
//! exchange enters as a field `-λ · m_other`, so a positive exchange field
//! favors antiparallel alignment. Both sublattices are advanced from the
//! same pre-step snapshot.
//!
//! The pair is a standalone integrator: junctions in a circuit do not use
//! it, and it takes no thermal field. Callers drive it step by step with
//! their own applied field.

use super::field::effective_field;
use super::{LayerParams, MagnetizationIntegrator, Vec3};

/// Parameters of a coupled sublattice pair.
#[derive(Debug, Clone, PartialEq)]
pub struct SublatticePair {
    pub a: LayerParams,
    pub b: LayerParams,
    /// Antiferromagnetic exchange field λ in T
    pub exchange_field: f64,
}

/// Unit magnetizations of the two sublattices.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SublatticeState {
    pub a: Vec3,
    pub b: Vec3,
}

impl SublatticeState {
    pub fn new(a: Vec3, b: Vec3) -> Self {
        Self {
            a: a.normalize(),
            b: b.normalize(),
        }
    }

    /// Antiparallel pair with sublattice A along `axis`.
    pub fn antiparallel(axis: Vec3) -> Self {
        let a = axis.normalize();
        Self { a, b: -a }
    }
}

impl SublatticePair {
    pub fn new(a: LayerParams, b: LayerParams, exchange_field: f64) -> Self {
        Self {
            a,
            b,
            exchange_field,
        }
    }

    /// Field on one sublattice, given its own and the other sublattice's direction.
    fn field_on(&self, layer: &LayerParams, m: &Vec3, other: &Vec3, applied: &Vec3) -> Vec3 {
        effective_field(layer, m, applied) - other * self.exchange_field
    }

    /// Advance both sublattices by `dt`.
    pub fn step(
        &self,
        integrator: &MagnetizationIntegrator,
        state: &SublatticeState,
        applied: &Vec3,
        dt: f64,
    ) -> SublatticeState {
        let SublatticeState { a: a_prev, b: b_prev } = *state;
        let a = integrator.step(&a_prev, self.a.damping, dt, |m| {
            self.field_on(&self.a, m, &b_prev, applied)
        });
        let b = integrator.step(&b_prev, self.b.damping, dt, |m| {
            self.field_on(&self.b, m, &a_prev, applied)
        });
        SublatticeState { a, b }
    }

    /// Net magnetization Ms_a·t_a·m_a + Ms_b·t_b·m_b per unit area (A).
    pub fn net_moment(&self, state: &SublatticeState) -> Vec3 {
        state.a * (self.a.saturation_magnetization * self.a.thickness)
            + state.b * (self.b.saturation_magnetization * self.b.thickness)
    }
}
