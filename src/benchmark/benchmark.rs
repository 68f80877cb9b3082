use std::time::Instant;

use crate::error::EngineError;
use crate::simulation::integrator::verlet_integrator;
use crate::simulation::params::Parameters;
use crate::simulation::states::{NVec3, Particle, ParticleSet, Species};

/// Helper to build a manual argon-like system of size `n` on a jittered lattice
fn make_system(n: usize, spacing: f64) -> Result<ParticleSet, EngineError> {
    let side = (n as f64).cbrt().ceil() as usize;
    let mut particles = Vec::with_capacity(n);

    for i in 0..n {
        let i_f = i as f64;
        // deterministic positions, no rand needed
        let cell = NVec3::new((i % side) as f64, ((i / side) % side) as f64, (i / (side * side)) as f64);
        let jitter = NVec3::new((i_f * 0.37).sin(), (i_f * 0.13).cos(), (i_f * 0.07).sin()) * 0.05;
        let v = NVec3::new((i_f * 0.11).cos(), (i_f * 0.23).sin(), (i_f * 0.31).cos()) * 0.1;
        let group = if i % 2 == 0 { "A" } else { "B" };
        particles.push(Particle::new(group, (cell + NVec3::repeat(0.5) + jitter) * spacing, v));
    }

    let mut set = ParticleSet::from_particles(particles);
    let a = Species { symbol: "Ar".into(), mass: 39.948, charge: 0.5, sigma: 3.4, epsilon: 0.0103 };
    let b = Species { symbol: "Ar".into(), mass: 39.948, charge: -0.5, sigma: 3.4, epsilon: 0.0103 };
    set.assign_species("A", &a)?;
    set.assign_species("B", &b)?;
    Ok(set)
}

/// Helper to build parameters for a box holding `n` particles at `spacing`
fn make_params(n: usize, spacing: f64, coulomb: bool) -> Parameters {
    let side = (n as f64).cbrt().ceil() * spacing;
    Parameters {
        t_start: 0.0,
        t_end: 1.0,
        dt: 0.001,
        cell: NVec3::repeat(side),
        temp_bath: 0.0,
        cutoff: 10.0,
        coulomb,
    }
}

/// Time one integrator step for a range of n, LJ only and LJ + Coulomb
/// Prints CSV: paste output directly into a spreadsheet to graph
pub fn bench_step() {
    let spacing = 4.0;
    println!("N,lj_ms,lj_coulomb_ms");

    for n in [50, 100, 200, 400, 800, 1600] {
        // Small n: average over a few steps to smooth noise
        let steps = if n <= 400 { 5 } else { 1 };
        let mut row = Vec::with_capacity(2);

        for coulomb in [false, true] {
            let mut set = match make_system(n, spacing) {
                Ok(set) => set,
                Err(e) => {
                    log::warn!("benchmark system setup failed: {}", e);
                    return;
                }
            };
            let params = make_params(n, spacing, coulomb);

            // Warm-up
            if let Err(e) = verlet_integrator(&mut set, &params) {
                log::warn!("benchmark step failed: {}", e);
                return;
            }

            let t0 = Instant::now();
            for _ in 0..steps {
                if let Err(e) = verlet_integrator(&mut set, &params) {
                    log::warn!("benchmark step failed: {}", e);
                    return;
                }
            }
            row.push(t0.elapsed().as_secs_f64() * 1000.0 / steps as f64);
        }

        println!("{},{:.6},{:.6}", n, row[0], row[1]);
    }
}
