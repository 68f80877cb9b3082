//! Build a fully-initialized simulation scenario from configuration
//!
//! Takes a `ScenarioConfig` (YAML-facing) and produces the runtime bundle:
//! - numerical parameters (`Parameters`)
//! - particle state (`ParticleSet` with species assigned, ready for step 1)

use crate::configuration::config::{vec3, ScenarioConfig};
use crate::error::EngineError;
use crate::simulation::params::Parameters;
use crate::simulation::states::{NVec3, Particle, ParticleSet, Species};
use crate::simulation::thermostat::{kinetic_energy, system_temperature};
use crate::simulation::velocities::seed_velocities;

#[derive(Debug, Clone)]
pub struct Scenario {
    pub parameters: Parameters,
    pub system: ParticleSet,
}

impl Scenario {
    pub fn build_scenario(cfg: &ScenarioConfig) -> Result<Self, EngineError> {
        // Parameters (runtime) from ParametersConfig + EngineConfig
        let parameters = Parameters {
            t_start: cfg.parameters.t_start,
            t_end: cfg.parameters.t_end,
            dt: cfg.parameters.dt,
            cell: vec3("parameters.cell", &cfg.parameters.cell)?,
            temp_bath: cfg.engine.temp_bath,
            cutoff: cfg.engine.cutoff,
            coulomb: cfg.engine.coulomb,
        };
        parameters.validate()?;

        // Particles in file order, ids 1..=N
        let mut system = ParticleSet::new();
        for (i, pc) in cfg.particles.iter().enumerate() {
            let x = vec3(&format!("particles[{}].x", i), &pc.x)?;
            let v = match &pc.v {
                Some(v) => vec3(&format!("particles[{}].v", i), v)?,
                None => NVec3::zeros(),
            };
            system.push(Particle::new(pc.group.clone(), x, v));
        }

        for sc in &cfg.species {
            let species = Species {
                symbol: sc.symbol.clone(),
                mass: sc.mass,
                charge: sc.charge,
                sigma: sc.sigma,
                epsilon: sc.epsilon,
            };
            system.assign_species(&sc.group, &species)?;
        }
        system.validate()?;

        match &cfg.velocities {
            Some(vc) => seed_velocities(&mut system, vc.temperature, vc.seed)?,
            None => {
                kinetic_energy(&mut system);
            }
        }

        if parameters.temp_bath > 0.0 && system.kinetic_energy() == 0.0 {
            log::warn!(
                "thermostat at {} K with a system at rest: the first step fails unless forces set it moving",
                parameters.temp_bath
            );
        }

        log::info!(
            "scenario: {} particles, {} steps of {} ps, T = {:.3} K",
            system.len(),
            parameters.n_steps(),
            parameters.dt,
            system_temperature(&system)
        );

        Ok(Self { parameters, system })
    }
}
