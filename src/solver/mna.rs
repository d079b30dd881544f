//! MNA matrix assembly and solving.

use crate::circuit::Circuit;
use crate::components::StampContext;
use crate::error::{Result, SpinSimError};

use super::MIN_CONDUCTANCE;

/// Pivots smaller than this are treated as zero.
const PIVOT_EPSILON: f64 = 1e-15;

/// MNA matrix system Ax = z.
#[derive(Debug, Clone)]
pub struct MnaMatrix {
    /// System matrix A (row-major)
    pub a: Vec<f64>,
    /// Source vector z
    pub z: Vec<f64>,
    /// Solution vector x
    pub x: Vec<f64>,
    /// Matrix dimension
    pub size: usize,
    /// LU decomposition of A
    lu: Vec<f64>,
    /// Pivot indices for LU decomposition
    pivots: Vec<usize>,
}

impl MnaMatrix {
    pub fn new(size: usize) -> Self {
        Self {
            a: vec![0.0; size * size],
            z: vec![0.0; size],
            x: vec![0.0; size],
            size,
            lu: vec![0.0; size * size],
            pivots: vec![0; size],
        }
    }

    /// Clear the matrix and source vector to zero.
    pub fn clear(&mut self) {
        self.a.fill(0.0);
        self.z.fill(0.0);
    }

    /// Get matrix element at (row, col).
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.a[row * self.size + col]
    }

    /// Add to matrix element at (row, col).
    pub fn add(&mut self, row: usize, col: usize, value: f64) {
        self.a[row * self.size + col] += value;
    }

    /// Add to source vector element.
    pub fn add_source(&mut self, row: usize, value: f64) {
        self.z[row] += value;
    }

    /// Stamp a conductance between two nodes.
    /// For a conductance G between nodes n1 and n2:
    ///   A[n1,n1] += G
    ///   A[n2,n2] += G
    ///   A[n1,n2] -= G
    ///   A[n2,n1] -= G
    pub fn stamp_conductance(&mut self, n1: Option<usize>, n2: Option<usize>, g: f64) {
        if let Some(i) = n1 {
            self.add(i, i, g);
        }
        if let Some(j) = n2 {
            self.add(j, j, g);
        }
        if let (Some(i), Some(j)) = (n1, n2) {
            self.add(i, j, -g);
            self.add(j, i, -g);
        }
    }

    /// Couple a branch current at row/column `br` to its two terminals.
    ///
    /// The branch current leaves n+ and enters n- (KCL columns), and the
    /// branch row reads V[n+] - V[n-].
    pub fn stamp_branch_incidence(&mut self, n_pos: Option<usize>, n_neg: Option<usize>, br: usize) {
        if let Some(i) = n_pos {
            self.add(br, i, 1.0);
            self.add(i, br, 1.0);
        }
        if let Some(j) = n_neg {
            self.add(br, j, -1.0);
            self.add(j, br, -1.0);
        }
    }

    /// Stamp a voltage source between two nodes with branch current at index br.
    /// V[n+] - V[n-] = E
    pub fn stamp_voltage_source(
        &mut self,
        n_pos: Option<usize>,
        n_neg: Option<usize>,
        br: usize,
        voltage: f64,
    ) {
        self.stamp_branch_incidence(n_pos, n_neg, br);
        self.add_source(br, voltage);
    }

    /// Stamp a current source between two nodes.
    /// Current is drawn out of n_from and pushed into n_to.
    pub fn stamp_current_source(&mut self, n_from: Option<usize>, n_to: Option<usize>, current: f64) {
        if let Some(i) = n_from {
            self.add_source(i, -current);
        }
        if let Some(j) = n_to {
            self.add_source(j, current);
        }
    }

    /// Perform LU decomposition with partial pivoting.
    pub fn factor(&mut self) -> Result<()> {
        let n = self.size;
        self.lu.copy_from_slice(&self.a);

        for (i, p) in self.pivots.iter_mut().enumerate() {
            *p = i;
        }

        for k in 0..n {
            // Find pivot
            let mut max_val = self.lu[k * n + k].abs();
            let mut max_row = k;

            for i in (k + 1)..n {
                let val = self.lu[i * n + k].abs();
                if val > max_val {
                    max_val = val;
                    max_row = i;
                }
            }

            if max_val < PIVOT_EPSILON {
                return Err(SpinSimError::SingularMatrix { row: k });
            }

            if max_row != k {
                self.pivots.swap(k, max_row);
                for j in 0..n {
                    self.lu.swap(k * n + j, max_row * n + j);
                }
            }

            // Eliminate
            let pivot = self.lu[k * n + k];
            for i in (k + 1)..n {
                let factor = self.lu[i * n + k] / pivot;
                self.lu[i * n + k] = factor;
                for j in (k + 1)..n {
                    self.lu[i * n + j] -= factor * self.lu[k * n + j];
                }
            }
        }

        Ok(())
    }

    /// Solve the system using the pre-computed LU decomposition.
    pub fn solve(&mut self) -> Result<()> {
        let n = self.size;

        // Apply pivot permutation to z
        for i in 0..n {
            self.x[i] = self.z[self.pivots[i]];
        }

        // Forward substitution (L * y = Pb)
        for i in 0..n {
            for j in 0..i {
                self.x[i] -= self.lu[i * n + j] * self.x[j];
            }
        }

        // Back substitution (U * x = y)
        for i in (0..n).rev() {
            for j in (i + 1)..n {
                self.x[i] -= self.lu[i * n + j] * self.x[j];
            }
            let diag = self.lu[i * n + i];
            if diag.abs() < PIVOT_EPSILON {
                return Err(SpinSimError::SingularMatrix { row: i });
            }
            self.x[i] /= diag;
        }

        Ok(())
    }

    /// Factor and solve in one go.
    pub fn factor_and_solve(&mut self) -> Result<()> {
        self.factor()?;
        self.solve()
    }
}

/// Constant storage matrix C (capacitances and inductances).
///
/// Built once per topology. A transient step with time step dt adds
/// C/dt to the system matrix and (C/dt)·x_prev to the source vector.
#[derive(Debug, Clone)]
pub struct CapacitanceMatrix {
    /// Row-major entries
    c: Vec<f64>,
    size: usize,
}

impl CapacitanceMatrix {
    pub fn new(size: usize) -> Self {
        Self {
            c: vec![0.0; size * size],
            size,
        }
    }

    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.c[row * self.size + col]
    }

    pub fn add(&mut self, row: usize, col: usize, value: f64) {
        self.c[row * self.size + col] += value;
    }

    /// Same pattern as a conductance stamp.
    pub fn stamp_capacitance(&mut self, n1: Option<usize>, n2: Option<usize>, c: f64) {
        if let Some(i) = n1 {
            self.add(i, i, c);
        }
        if let Some(j) = n2 {
            self.add(j, j, c);
        }
        if let (Some(i), Some(j)) = (n1, n2) {
            self.add(i, j, -c);
            self.add(j, i, -c);
        }
    }

    /// Whether no component stores energy.
    pub fn is_empty(&self) -> bool {
        self.c.iter().all(|&v| v == 0.0)
    }

    /// Add the backward-Euler terms C/dt and (C/dt)·x_prev to `mna`.
    pub fn apply_backward_euler(&self, mna: &mut MnaMatrix, dt: f64, x_prev: &[f64]) {
        let n = self.size;
        let inv_dt = 1.0 / dt;
        for row in 0..n {
            let mut history = 0.0;
            for col in 0..n {
                let c = self.c[row * n + col];
                if c != 0.0 {
                    mna.add(row, col, c * inv_dt);
                    history += c * inv_dt * x_prev[col];
                }
            }
            mna.add_source(row, history);
        }
    }
}

/// Build the storage matrix of a circuit.
pub fn build_capacitance(circuit: &Circuit) -> CapacitanceMatrix {
    let mut storage = CapacitanceMatrix::new(circuit.matrix_size());
    for component in &circuit.components {
        component.stamp_storage(circuit.num_nodes, &mut storage);
    }
    storage
}

/// Stamp every component linearized at `ctx`, plus a minimum shunt
/// conductance from each node to ground.
pub fn assemble(circuit: &Circuit, ctx: &StampContext<'_>, matrix: &mut MnaMatrix) {
    matrix.clear();
    for component in &circuit.components {
        component.stamp(ctx, matrix);
    }
    for i in 0..(circuit.num_nodes - 1) {
        matrix.add(i, i, MIN_CONDUCTANCE);
    }
}
