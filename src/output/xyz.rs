//! Extended XYZ trajectory: one frame per written step with the cell as
//! `Lattice` and velocities after the coordinates

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use super::{open, Observer};
use crate::error::EngineError;
use crate::simulation::states::{NVec3, ParticleSet};

pub struct XyzWriter {
    out: BufWriter<File>,
    every: usize,
}

impl XyzWriter {
    pub fn create(path: &Path, every: usize) -> Result<Self, EngineError> {
        Ok(Self { out: open(path)?, every: every.max(1) })
    }
}

impl Observer for XyzWriter {
    fn observe(&mut self, step: usize, t: f64, set: &ParticleSet, cell: &NVec3) -> Result<(), EngineError> {
        if step % self.every != 0 {
            return Ok(());
        }
        writeln!(self.out, "{}", set.len())?;
        writeln!(self.out, "time = {} Lattice=\"{} 0 0 0 {} 0 0 0 {}\"", t, cell.x, cell.y, cell.z)?;
        for p in set.iter() {
            writeln!(self.out, "{} {} {} {} {} {} {}", p.symbol, p.x.x, p.x.y, p.x.z, p.v.x, p.v.y, p.v.z)?;
        }
        Ok(())
    }

    fn finish(&mut self) -> Result<(), EngineError> {
        self.out.flush()?;
        Ok(())
    }
}
