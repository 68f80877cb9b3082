//! Coulomb field, V(r) = k q_i q_j / r
//!
//! Force and potential are ADDED to what the particles already carry, so this
//! runs after the Lennard-Jones pass in a step.

use nalgebra::DMatrix;

use crate::simulation::geometry::{within_cutoff, PairwiseGeometry};
use crate::simulation::params::COULOMB_K;
use crate::simulation::states::{NVec3, ParticleSet};

#[derive(Debug, Clone)]
pub struct Coulomb {
    /// `charges[(i, j)] = q_i q_j`, zero on the diagonal
    pub charges: DMatrix<f64>,
}

impl Coulomb {
    pub fn charges(set: &ParticleSet) -> Self {
        let q = set.charges();
        let n = q.len();
        let charges = DMatrix::from_fn(n, n, |i, j| if i == j { 0.0 } else { q[i] * q[j] });
        Self { charges }
    }

    /// Add k q_i q_j / r² along r_unit to each particle's force
    pub fn force(&self, set: &mut ParticleSet, geom: &PairwiseGeometry, cutoff: f64) {
        let n = geom.len();
        let forces: Vec<NVec3> = (0..n)
            .map(|i| {
                let mut f = NVec3::zeros();
                for j in 0..n {
                    let r = within_cutoff(geom.r[(i, j)], cutoff);
                    f += COULOMB_K * self.charges[(i, j)] / (r * r) * geom.r_unit[(i, j)];
                }
                f
            })
            .collect();

        set.modify(|ps| {
            for (p, f) in ps.iter_mut().zip(forces) {
                p.f += f;
            }
        });
    }

    /// Add k q_i q_j / r to each particle's potential energy
    pub fn potential(&self, set: &mut ParticleSet, geom: &PairwiseGeometry, cutoff: f64) {
        let n = geom.len();
        let energies: Vec<f64> = (0..n)
            .map(|i| {
                (0..n)
                    .map(|j| COULOMB_K * self.charges[(i, j)] / within_cutoff(geom.r[(i, j)], cutoff))
                    .sum()
            })
            .collect();

        set.modify(|ps| {
            for (p, e) in ps.iter_mut().zip(energies) {
                p.pe += e;
            }
        });
    }
}
