//! Lennard-Jones 12-6 field: V(r) = 4ε[(σ/r)^12 − (σ/r)^6]
//!
//! Cross-species parameters use Lorentz–Berthelot mixing. The LJ force and
//! potential OVERWRITE the per-particle values; Coulomb accumulates on top, so
//! LJ has to run first in every step.

use nalgebra::DMatrix;

use crate::simulation::geometry::{within_cutoff, PairwiseGeometry};
use crate::simulation::states::{NVec3, ParticleSet};

/// Mixed pair parameters, `sigma[(i, j)]` and `epsilon[(i, j)]`
#[derive(Debug, Clone)]
pub struct LennardJones {
    pub sigma: DMatrix<f64>,
    pub epsilon: DMatrix<f64>,
}

impl LennardJones {
    /// Pairwise σ/ε for the current particle list. Diagonal stays zero.
    pub fn mix(set: &ParticleSet) -> Self {
        let ps = set.particles();
        let n = ps.len();
        let mut sigma = DMatrix::zeros(n, n);
        let mut epsilon = DMatrix::zeros(n, n);

        for i in 0..n {
            for j in 0..n {
                if i == j {
                    continue;
                }
                if ps[i].group != ps[j].group {
                    sigma[(i, j)] = 0.5 * (ps[i].sigma() + ps[j].sigma());
                    epsilon[(i, j)] = (ps[i].epsilon() * ps[j].epsilon()).sqrt();
                } else {
                    sigma[(i, j)] = ps[j].sigma();
                    epsilon[(i, j)] = ps[j].epsilon();
                }
            }
        }

        Self { sigma, epsilon }
    }

    /// Overwrite every particle's force with its net LJ force
    pub fn force(&self, set: &mut ParticleSet, geom: &PairwiseGeometry, cutoff: f64) {
        let n = geom.len();
        let forces: Vec<NVec3> = (0..n)
            .map(|i| {
                let mut f = NVec3::zeros();
                for j in 0..n {
                    let r = within_cutoff(geom.r[(i, j)], cutoff);
                    f += pair_force(self.sigma[(i, j)], self.epsilon[(i, j)], r) * geom.r_unit[(i, j)];
                }
                f
            })
            .collect();

        set.modify(|ps| {
            for (p, f) in ps.iter_mut().zip(forces) {
                p.f = f;
            }
        });
    }

    /// Overwrite every particle's potential energy with its LJ sum
    pub fn potential(&self, set: &mut ParticleSet, geom: &PairwiseGeometry, cutoff: f64) {
        let n = geom.len();
        let energies: Vec<f64> = (0..n)
            .map(|i| {
                (0..n)
                    .map(|j| pair_potential(self.sigma[(i, j)], self.epsilon[(i, j)], within_cutoff(geom.r[(i, j)], cutoff)))
                    .sum()
            })
            .collect();

        set.modify(|ps| {
            for (p, e) in ps.iter_mut().zip(energies) {
                p.pe = e;
            }
        });
    }
}

/// 4ε[(σ/r)^12 − (σ/r)^6]; zero for r = ∞
#[inline]
pub fn pair_potential(sigma: f64, epsilon: f64, r: f64) -> f64 {
    let s6 = (sigma / r).powi(6);
    4.0 * epsilon * (s6 * s6 - s6)
}

/// (24ε/r)[2(σ/r)^12 − (σ/r)^6], positive = repulsive; zero for r = ∞
#[inline]
pub fn pair_force(sigma: f64, epsilon: f64, r: f64) -> f64 {
    let s6 = (sigma / r).powi(6);
    (24.0 * epsilon / r) * (2.0 * s6 * s6 - s6)
}
