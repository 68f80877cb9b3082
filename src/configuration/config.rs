//! Configuration types for loading simulation scenarios from YAML.
//!
//! This module defines a thin, `serde`-deserializable representation of a
//! simulation scenario. A scenario consists of:
//!
//! - [`EngineConfig`]     – interaction settings (Coulomb, cutoff, thermostat)
//! - [`ParametersConfig`] – time window, step size and cell
//! - [`SpeciesConfig`]    – per-group properties (symbol, mass, charge, σ, ε)
//! - [`ParticleConfig`]   – initial state for each particle
//! - [`VelocityConfig`]   – optional Maxwell–Boltzmann velocity seeding
//! - [`OutputConfig`]     – optional trajectory / energy / debug writers
//! - [`ScenarioConfig`]   – top-level wrapper used to load a scenario from YAML
//!
//! # YAML format
//!
//! ```yaml
//! engine:
//!   coulomb: false          # Coulomb on/off
//!   cutoff: 30.0            # Å, may exceed the cell ("no cutoff")
//!   temp_bath: 0.0          # K, 0 disables the thermostat
//!
//! parameters:
//!   t_start: 0.0            # ps
//!   t_end: 10.0             # ps, exclusive
//!   dt: 0.005               # ps
//!   cell: [20.0, 20.0, 20.0]
//!
//! species:
//!   - group: O
//!     symbol: O
//!     mass: 16.0
//!     charge: -0.8476
//!     sigma: 3.1169
//!     epsilon: 0.006516018
//!
//! particles:
//!   - group: O
//!     x: [12.5, 10.0, 10.0]
//!     v: [0.0, 0.0, 0.0]
//!   - group: O
//!     x: [7.5, 10.0, 10.0]
//!
//! output:
//!   dir: outdir
//!   xyz: true
//!   energy: true
//! ```

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::EngineError;
use crate::simulation::states::NVec3;

/// Interaction settings
#[derive(Deserialize, Debug, Clone)]
pub struct EngineConfig {
    #[serde(default)]
    pub coulomb: bool, // add Coulomb on top of LJ
    pub cutoff: f64, // pair distance beyond which nothing interacts
    #[serde(default)]
    pub temp_bath: f64, // velocity-rescaling target, 0 = off
}

/// Time window, step size and simulation cell
#[derive(Deserialize, Debug, Clone)]
pub struct ParametersConfig {
    #[serde(default)]
    pub t_start: f64, // time start
    pub t_end: f64,   // time end
    pub dt: f64,      // time step size
    pub cell: Vec<f64>, // cell edge lengths, reflective walls at 0 and cell
}

/// Properties of one species, applied to every particle in `group`
#[derive(Deserialize, Debug, Clone)]
pub struct SpeciesConfig {
    pub group: String,
    pub symbol: String,
    pub mass: f64,
    #[serde(default)]
    pub charge: f64,
    #[serde(default)]
    pub sigma: f64,
    #[serde(default)]
    pub epsilon: f64,
}

/// Initial state of one particle
#[derive(Deserialize, Debug, Clone)]
pub struct ParticleConfig {
    pub group: String, // species key
    pub x: Vec<f64>, // initial position
    #[serde(default)]
    pub v: Option<Vec<f64>>, // initial velocity, zero if omitted
}

/// Draw initial velocities, replacing the listed ones.
/// Skipped (listed velocities kept) for fewer than two particles or 0 K.
#[derive(Deserialize, Debug, Clone)]
pub struct VelocityConfig {
    pub temperature: f64,
    #[serde(default)]
    pub seed: u64,
}

/// Which writers to attach and where
#[derive(Deserialize, Debug, Clone)]
pub struct OutputConfig {
    #[serde(default = "default_output_dir")]
    pub dir: PathBuf,
    #[serde(default = "default_true")]
    pub xyz: bool,
    #[serde(default = "default_true")]
    pub energy: bool,
    #[serde(default)]
    pub debug: bool,
    #[serde(default = "default_every")]
    pub every: usize, // write every n-th step
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("outdir")
}

fn default_true() -> bool {
    true
}

fn default_every() -> usize {
    1
}

/// Top-level scenario configuration loaded from YAML.
#[derive(Deserialize, Debug, Clone)]
pub struct ScenarioConfig {
    pub engine: EngineConfig,
    pub parameters: ParametersConfig,
    pub species: Vec<SpeciesConfig>,
    pub particles: Vec<ParticleConfig>,
    #[serde(default)]
    pub velocities: Option<VelocityConfig>,
    #[serde(default)]
    pub output: Option<OutputConfig>,
}

impl ScenarioConfig {
    pub fn from_path(path: &Path) -> Result<Self, EngineError> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);
        serde_yaml::from_reader(reader).map_err(|e| EngineError::Config(format!("{}: {}", path.display(), e)))
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self, EngineError> {
        serde_yaml::from_str(yaml).map_err(|e| EngineError::Config(e.to_string()))
    }
}

/// Turn a YAML list into a 3-vector, naming the field on failure
pub fn vec3(field: &str, values: &[f64]) -> Result<NVec3, EngineError> {
    match values {
        [x, y, z] => Ok(NVec3::new(*x, *y, *z)),
        _ => Err(EngineError::Config(format!("{} needs 3 components, got {}", field, values.len()))),
    }
}
