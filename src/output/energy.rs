//! Energy time series as CSV

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use super::{open, Observer};
use crate::error::EngineError;
use crate::simulation::states::{NVec3, ParticleSet};

pub const HEADER: &str = "Time / ps,Potential Energy / eV,Kinetic Energy / eV,Total Energy / eV";

pub struct EnergyWriter {
    out: BufWriter<File>,
    every: usize,
}

impl EnergyWriter {
    pub fn create(path: &Path, every: usize) -> Result<Self, EngineError> {
        let mut out = open(path)?;
        writeln!(out, "{}", HEADER)?;
        Ok(Self { out, every: every.max(1) })
    }
}

impl Observer for EnergyWriter {
    fn observe(&mut self, step: usize, t: f64, set: &ParticleSet, _cell: &NVec3) -> Result<(), EngineError> {
        if step % self.every != 0 {
            return Ok(());
        }
        writeln!(
            self.out,
            "{},{},{},{}",
            t,
            set.potential_energy(),
            set.kinetic_energy(),
            set.total_energy()
        )?;
        Ok(())
    }

    fn finish(&mut self) -> Result<(), EngineError> {
        self.out.flush()?;
        Ok(())
    }
}
