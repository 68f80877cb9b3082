//! Velocity-rescaling thermostat and kinetic energy bookkeeping
//!
//! Temperature comes from equipartition with 3 degrees of freedom per
//! particle: T = 2 KE / (3 k_B N).

use crate::error::EngineError;
use crate::simulation::params::BOLTZMANN_K;
use crate::simulation::states::ParticleSet;

/// Recompute every particle's 0.5 m |v|² and return the total
pub fn kinetic_energy(set: &mut ParticleSet) -> f64 {
    set.modify(|ps| {
        let mut total = 0.0;
        for p in ps.iter_mut() {
            p.ke = 0.5 * p.m() * p.v.norm_squared();
            total += p.ke;
        }
        total
    })
}

/// Instantaneous temperature from the current velocities (0 for an empty set)
pub fn system_temperature(set: &ParticleSet) -> f64 {
    if set.is_empty() {
        return 0.0;
    }
    let ke: f64 = set
        .masses()
        .iter()
        .zip(set.velocities())
        .map(|(m, v)| 0.5 * m * v.norm_squared())
        .sum();
    temperature_of(ke, set.len())
}

fn temperature_of(ke: f64, n: usize) -> f64 {
    2.0 * ke / (3.0 * BOLTZMANN_K * n as f64)
}

/// Scale all velocities so the system temperature equals `target`.
/// Returns the scale factor that was applied.
///
/// A system with zero kinetic energy has no defined scale and is rejected.
pub fn rescale(set: &mut ParticleSet, target: f64) -> Result<f64, EngineError> {
    if set.is_empty() {
        log::warn!("thermostat called on an empty particle set");
        return Ok(1.0);
    }

    let ke = kinetic_energy(set);
    if ke == 0.0 {
        return Err(EngineError::ZeroKineticEnergy { target });
    }

    let t_sys = temperature_of(ke, set.len());
    let scale = (target / t_sys).sqrt();
    log::trace!("thermostat: T_sys = {:.4} K, target = {:.4} K, scale = {:.6}", t_sys, target, scale);

    set.modify(|ps| {
        for p in ps.iter_mut() {
            p.v *= scale;
        }
    });
    kinetic_energy(set);

    Ok(scale)
}
