//! Per-step writers attached to a run
//!
//! Each writer is an [`Observer`]: the driver calls it once after every step
//! with the current time, particle set and cell.

pub mod debug;
pub mod energy;
pub mod xyz;

use std::fs::{self, File};
use std::io::BufWriter;
use std::path::Path;

use crate::configuration::config::OutputConfig;
use crate::error::EngineError;
use crate::simulation::states::{NVec3, ParticleSet};

pub use debug::DebugWriter;
pub use energy::EnergyWriter;
pub use xyz::XyzWriter;

pub trait Observer {
    fn observe(&mut self, step: usize, t: f64, set: &ParticleSet, cell: &NVec3) -> Result<(), EngineError>;

    /// Flush anything buffered; called once when the run ends
    fn finish(&mut self) -> Result<(), EngineError> {
        Ok(())
    }
}

/// Writers requested by `cfg`, created under `cfg.dir`
pub fn build_observers(cfg: &OutputConfig) -> Result<Vec<Box<dyn Observer>>, EngineError> {
    fs::create_dir_all(&cfg.dir)?;
    let every = cfg.every.max(1);

    let mut observers: Vec<Box<dyn Observer>> = Vec::new();
    if cfg.xyz {
        observers.push(Box::new(XyzWriter::create(&cfg.dir.join("output.xyz"), every)?));
    }
    if cfg.energy {
        observers.push(Box::new(EnergyWriter::create(&cfg.dir.join("energy.txt"), every)?));
    }
    if cfg.debug {
        observers.push(Box::new(DebugWriter::create(&cfg.dir.join("debug.txt"), every)?));
    }
    log::info!("writing {} output file(s) to {}", observers.len(), cfg.dir.display());
    Ok(observers)
}

/// Truncate-or-create `path` for buffered writing
fn open(path: &Path) -> Result<BufWriter<File>, EngineError> {
    Ok(BufWriter::new(File::create(path)?))
}
