//! Initial velocities drawn from a Maxwell–Boltzmann distribution
//!
//! Components are sampled from N(0, sqrt(k_B T / m)), the centre-of-mass drift
//! is removed, and the result is rescaled so the system sits exactly at `T`.
//! Drawn velocities replace whatever the particles carried. With fewer than
//! two particles or `T = 0` nothing is drawn and the existing velocities stay.

use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};

use crate::error::EngineError;
use crate::simulation::params::BOLTZMANN_K;
use crate::simulation::states::{NVec3, ParticleSet};
use crate::simulation::thermostat::{kinetic_energy, rescale};

pub fn seed_velocities(set: &mut ParticleSet, temperature: f64, seed: u64) -> Result<(), EngineError> {
    if !temperature.is_finite() || temperature < 0.0 {
        return Err(EngineError::InvalidParameter { name: "velocities.temperature", value: temperature });
    }
    if temperature == 0.0 || set.len() < 2 {
        log::warn!(
            "not seeding velocities ({} particles at {} K), keeping the configured ones",
            set.len(),
            temperature
        );
        kinetic_energy(set);
        return Ok(());
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let unit = Normal::new(0.0, 1.0).map_err(|e| EngineError::Config(e.to_string()))?;

    set.modify(|ps| {
        for p in ps.iter_mut() {
            let s = (BOLTZMANN_K * temperature / p.m()).sqrt();
            p.v = NVec3::new(unit.sample(&mut rng), unit.sample(&mut rng), unit.sample(&mut rng)) * s;
        }
    });

    // remove net momentum
    let total_mass: f64 = set.masses().iter().sum();
    let drift = set.momentum() / total_mass;
    set.modify(|ps| ps.iter_mut().for_each(|p| p.v -= drift));

    rescale(set, temperature)?;
    log::info!("seeded velocities for {} particles at {} K (seed {})", set.len(), temperature, seed);
    Ok(())
}
