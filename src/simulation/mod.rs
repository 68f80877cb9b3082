pub mod states;
pub mod params;
pub mod geometry;
pub mod lennard_jones;
pub mod coulomb;
pub mod boundary;
pub mod thermostat;
pub mod integrator;
pub mod velocities;
pub mod scenario;
pub mod engine;
