//! All-pairs geometry for the direct O(N²) force evaluation
//!
//! Built once per step from the current positions, handed by reference to the
//! force fields, then dropped. Self-pairs (and coincident particles) are given
//! an infinite distance and a zero unit vector, so every kernel that divides by
//! `r` produces an exact zero for them.

use nalgebra::DMatrix;

use crate::simulation::states::NVec3;

#[derive(Debug, Clone)]
pub struct PairwiseGeometry {
    /// `r[(i, j)]`: distance between i and j, `INFINITY` on the diagonal
    pub r: DMatrix<f64>,
    /// `r_unit[(i, j)]`: unit vector pointing from j to i
    pub r_unit: DMatrix<NVec3>,
}

impl PairwiseGeometry {
    pub fn compute(positions: &[NVec3]) -> Self {
        let n = positions.len();
        let mut r = DMatrix::from_element(n, n, f64::INFINITY);
        let mut r_unit = DMatrix::from_element(n, n, NVec3::zeros());

        // Fill the upper triangle and mirror it: r is symmetric, r_unit antisymmetric
        for i in 0..n {
            for j in (i + 1)..n {
                let diff = positions[i] - positions[j];
                let mut d = diff.norm();
                if d == 0.0 {
                    d = f64::INFINITY;
                }
                let u = diff / d;
                r[(i, j)] = d;
                r[(j, i)] = d;
                r_unit[(i, j)] = u;
                r_unit[(j, i)] = -u;
            }
        }

        Self { r, r_unit }
    }

    pub fn len(&self) -> usize {
        self.r.nrows()
    }

    pub fn is_empty(&self) -> bool {
        self.r.nrows() == 0
    }
}

/// Distance with pairs beyond `cutoff` pushed to infinity
#[inline]
pub fn within_cutoff(r: f64, cutoff: f64) -> f64 {
    if r > cutoff {
        f64::INFINITY
    } else {
        r
    }
}
