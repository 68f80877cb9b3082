//! Fixed-step velocity-Verlet integrator
//!
//! One call advances the particle set by `params.dt`:
//! drift with the previous acceleration, rebuild pair geometry, evaluate
//! LJ (+ Coulomb), kick with the average of old and new accelerations,
//! thermostat (or just refresh KE), then apply the walls.

use super::boundary::reflect;
use super::coulomb::Coulomb;
use super::geometry::PairwiseGeometry;
use super::lennard_jones::LennardJones;
use super::params::Parameters;
use super::states::{NVec3, ParticleSet};
use super::thermostat::{kinetic_energy, rescale};
use crate::error::EngineError;

/// Advance the system by one step using velocity–Verlet
pub fn verlet_integrator(set: &mut ParticleSet, params: &Parameters) -> Result<(), EngineError> {
    if set.is_empty() { // no particles, nothing to do
        return Ok(());
    }

    let dt = params.dt;

    // Drift: x_n+1 = x_n + v_n dt + 1/2 a_n dt^2
    set.modify(|ps| {
        for p in ps.iter_mut() {
            p.x += p.v * dt + 0.5 * p.a * dt * dt;
        }
    });

    // f_n+1, pE_n+1 from x_n+1
    evaluate(set, params.cutoff, params.coulomb);

    // a_n+1 = f_n+1 / m, keeping a_n for the kick
    let a_old: Vec<NVec3> = set.accelerations().to_vec();
    set.modify(|ps| {
        for p in ps.iter_mut() {
            p.a = p.f / p.m();
        }
    });

    // Kick: v_n+1 = v_n + 1/2 (a_n + a_n+1) dt
    set.modify(|ps| {
        for (p, a) in ps.iter_mut().zip(a_old.iter()) {
            p.v += 0.5 * (p.a + *a) * dt;
        }
    });

    if params.temp_bath > 0.0 {
        rescale(set, params.temp_bath)?;
    } else {
        kinetic_energy(set);
    }

    reflect(set, &params.cell);

    if log::log_enabled!(log::Level::Trace) {
        for p in set.iter() {
            log::trace!("{} {} x = {:?} f = {:?} v = {:?} a = {:?}", p.id(), p.symbol, p.x, p.f, p.v, p.a);
        }
    }

    Ok(())
}

/// Forces and potential energies at the current positions.
///
/// LJ overwrites, Coulomb (when enabled) accumulates on top.
pub fn evaluate(set: &mut ParticleSet, cutoff: f64, coulomb: bool) {
    let geom = PairwiseGeometry::compute(set.positions());

    let lj = LennardJones::mix(set);
    lj.force(set, &geom, cutoff);
    lj.potential(set, &geom, cutoff);

    if coulomb {
        let coul = Coulomb::charges(set);
        coul.force(set, &geom, cutoff);
        coul.potential(set, &geom, cutoff);
    }
}
