//! Numerical and physical parameters for the simulation
//!
//! Units: eV (energy), Å (length), ps (time), e (charge), K (temperature).
//! Masses are taken as supplied; forces are divided by them directly.
//!
//! `Parameters` holds the runtime settings of one run:
//! - time window and step size,
//! - simulation cell (reflective walls at 0 and `cell`),
//! - bath temperature (0 disables the thermostat),
//! - interaction cutoff and whether Coulomb is on

use crate::error::EngineError;
use crate::simulation::states::NVec3;

/// Coulomb constant k in eV·Å/e²
pub const COULOMB_K: f64 = 14.399645;

/// Boltzmann constant in eV/K
pub const BOLTZMANN_K: f64 = 8.617333262e-5;

#[derive(Debug, Clone)]
pub struct Parameters {
    pub t_start: f64, // time start
    pub t_end: f64, // time end (exclusive)
    pub dt: f64, // step size
    pub cell: NVec3, // cell edge lengths
    pub temp_bath: f64, // thermostat target, 0 = off
    pub cutoff: f64, // interaction cutoff, may exceed the cell
    pub coulomb: bool, // Coulomb on/off
}

impl Parameters {
    /// Number of steps in `[t_start, t_end)` with stride `dt`
    pub fn n_steps(&self) -> usize {
        let span = self.t_end - self.t_start;
        if span <= 0.0 || self.dt <= 0.0 {
            return 0;
        }
        (span / self.dt).ceil() as usize
    }

    /// Simulation time at the start of step `k`
    pub fn time_at(&self, k: usize) -> f64 {
        self.t_start + k as f64 * self.dt
    }

    pub fn validate(&self) -> Result<(), EngineError> {
        if !self.dt.is_finite() || self.dt <= 0.0 {
            return Err(EngineError::InvalidParameter { name: "dt", value: self.dt });
        }
        for (name, edge) in [("cell.x", self.cell.x), ("cell.y", self.cell.y), ("cell.z", self.cell.z)] {
            if !edge.is_finite() || edge <= 0.0 {
                return Err(EngineError::InvalidParameter { name, value: edge });
            }
        }
        if self.cutoff.is_nan() || self.cutoff <= 0.0 {
            return Err(EngineError::InvalidParameter { name: "cutoff", value: self.cutoff });
        }
        if !self.temp_bath.is_finite() || self.temp_bath < 0.0 {
            return Err(EngineError::InvalidParameter { name: "temp_bath", value: self.temp_bath });
        }
        if self.cutoff >= self.cell.norm() {
            log::info!("cutoff {} exceeds cell diagonal {:.3}: every pair interacts", self.cutoff, self.cell.norm());
        }
        Ok(())
    }
}
