//! Time-stepping driver
//!
//! Calls the integrator once per step over `[t_start, t_end)` and hands the
//! updated state to every attached observer.

use crate::error::EngineError;
use crate::output::Observer;
use crate::simulation::integrator::verlet_integrator;
use crate::simulation::scenario::Scenario;

/// What a finished run looked like.
///
/// Energies are mechanical energies, KE + PE/2 in eV (the per-particle PE
/// counts every pair once per partner). `initial_energy` is taken after the
/// first step, the first point where forces and PE have been evaluated.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub steps: usize,
    pub initial_energy: f64,
    pub final_energy: f64,
    pub max_drift: f64, // largest |E(t) - initial_energy|
}

pub fn run(scenario: &mut Scenario, observers: &mut [Box<dyn Observer>]) -> Result<RunSummary, EngineError> {
    let params = scenario.parameters.clone();
    let n_steps = params.n_steps();
    log::info!("running {} steps, t = {} .. {} ps", n_steps, params.t_start, params.t_end);

    let mut summary = RunSummary {
        steps: 0,
        initial_energy: scenario.system.mechanical_energy(),
        final_energy: scenario.system.mechanical_energy(),
        max_drift: 0.0,
    };

    for step in 0..n_steps {
        let t = params.time_at(step);
        verlet_integrator(&mut scenario.system, &params)?;

        for obs in observers.iter_mut() {
            obs.observe(step, t, &scenario.system, &params.cell)?;
        }

        let pe = scenario.system.potential_energy();
        let ke = scenario.system.kinetic_energy();
        let total = scenario.system.total_energy();
        log::debug!("Time: {} ps, Potential Energy: {}, Kinetic Energy: {}, Total Energy: {}", t, pe, ke, total);

        let mech = scenario.system.mechanical_energy();
        if step == 0 {
            summary.initial_energy = mech;
        }
        summary.max_drift = summary.max_drift.max((mech - summary.initial_energy).abs());
        summary.final_energy = mech;
        summary.steps = step + 1;
    }

    for obs in observers.iter_mut() {
        obs.finish()?;
    }

    log::info!(
        "done: {} steps, E = {:.6} eV -> {:.6} eV, max drift {:.3e} eV",
        summary.steps,
        summary.initial_energy,
        summary.final_energy,
        summary.max_drift
    );
    Ok(summary)
}
