//! Error type shared by the engine, the configuration layer and the writers
//!
//! The numerical core itself is total over well-formed input; everything here
//! is either a configuration problem caught before the first step or the
//! thermostat precondition (nonzero kinetic energy) failing mid-run

#[derive(thiserror::Error, Debug)]
pub enum EngineError {
    /// Species mass must be finite and strictly positive (it divides the force)
    #[error("species '{group}' has invalid mass {mass}: mass must be finite and > 0")]
    InvalidMass { group: String, mass: f64 },

    /// Lennard-Jones parameters must be finite and non-negative
    #[error("species '{group}' has invalid parameter {name} = {value}")]
    InvalidSpecies { group: String, name: &'static str, value: f64 },

    /// A particle was never given a species before integration
    #[error("particle {id} (group '{group}') has no species assigned")]
    UnassignedSpecies { id: usize, group: String },

    /// Velocity rescaling was requested for a system with no kinetic energy
    #[error("cannot rescale to {target} K: system kinetic energy is zero")]
    ZeroKineticEnergy { target: f64 },

    #[error("invalid parameter {name} = {value}")]
    InvalidParameter { name: &'static str, value: f64 },

    #[error("configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
