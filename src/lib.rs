pub mod error;
pub mod simulation;
pub mod configuration;
pub mod output;
pub mod benchmark;

pub use error::EngineError;

pub use simulation::states::{Particle, ParticleSet, Species, NVec3};
pub use simulation::params::{Parameters, COULOMB_K, BOLTZMANN_K};
pub use simulation::geometry::PairwiseGeometry;
pub use simulation::lennard_jones::LennardJones;
pub use simulation::coulomb::Coulomb;
pub use simulation::integrator::{verlet_integrator, evaluate};
pub use simulation::scenario::Scenario;
pub use simulation::engine::{run, RunSummary};

pub use configuration::config::{EngineConfig, ParametersConfig, SpeciesConfig, ParticleConfig, VelocityConfig, OutputConfig, ScenarioConfig};

pub use output::{Observer, XyzWriter, EnergyWriter, DebugWriter, build_observers};

pub use benchmark::benchmark::bench_step;
