//! Verbose per-particle dump: position, force, velocity and acceleration

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use super::{open, Observer};
use crate::error::EngineError;
use crate::simulation::states::{NVec3, ParticleSet};

pub struct DebugWriter {
    out: BufWriter<File>,
    every: usize,
}

impl DebugWriter {
    pub fn create(path: &Path, every: usize) -> Result<Self, EngineError> {
        Ok(Self { out: open(path)?, every: every.max(1) })
    }
}

fn fmt3(v: &NVec3) -> String {
    format!("[{} {} {}]", v.x, v.y, v.z)
}

impl Observer for DebugWriter {
    fn observe(&mut self, step: usize, t: f64, set: &ParticleSet, _cell: &NVec3) -> Result<(), EngineError> {
        if step % self.every != 0 {
            return Ok(());
        }
        writeln!(self.out, "{}", set.len())?;
        writeln!(self.out, "time = {}", t)?;
        for p in set.iter() {
            writeln!(
                self.out,
                "{} {} {} {}, force = {}, velocity = {}, accel = {}",
                p.symbol,
                p.x.x,
                p.x.y,
                p.x.z,
                fmt3(&p.f),
                fmt3(&p.v),
                fmt3(&p.a)
            )?;
        }
        Ok(())
    }

    fn finish(&mut self) -> Result<(), EngineError> {
        self.out.flush()?;
        Ok(())
    }
}
