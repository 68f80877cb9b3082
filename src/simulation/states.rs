//! Core state types for the MD engine.
//!
//! - `Particle`: one point particle (species properties + dynamical state)
//! - `Species`: per-group properties assigned before the first step
//! - `ParticleSet`: the ordered particle list plus cached array views
//!
//! The particle list is the source of truth. The array views (positions,
//! velocities, masses, ...) are what the pairwise kernels read, and they are
//! resynced after every mutation that goes through `ParticleSet`.

use nalgebra::Vector3;

use crate::error::EngineError;

pub type NVec3 = Vector3<f64>;

#[derive(Debug, Clone)]
pub struct Particle {
    id: usize, // 1-based, set once when the particle joins a set
    pub group: String, // species key
    pub symbol: String, // element symbol, from species
    m: f64, // mass
    q: f64, // charge
    sigma: f64, // LJ sigma
    epsilon: f64, // LJ well depth
    pub x: NVec3, // position
    pub v: NVec3, // velocity
    pub a: NVec3, // acceleration
    pub f: NVec3, // net force
    pub pe: f64, // potential energy
    pub ke: f64, // kinetic energy
    assigned: bool,
}

impl Particle {
    /// New particle of `group` at `x` moving with `v`, with no species yet
    pub fn new(group: impl Into<String>, x: NVec3, v: NVec3) -> Self {
        Self {
            id: 0,
            group: group.into(),
            symbol: String::from("X"),
            m: 0.0,
            q: 0.0,
            sigma: 0.0,
            epsilon: 0.0,
            x,
            v,
            a: NVec3::zeros(),
            f: NVec3::zeros(),
            pe: 0.0,
            ke: 0.0,
            assigned: false,
        }
    }

    /// 1-based index within the owning set (0 until the particle is added)
    pub fn id(&self) -> usize {
        self.id
    }

    // species properties are read-only; they only change through `assign_species`

    pub fn m(&self) -> f64 {
        self.m
    }

    pub fn q(&self) -> f64 {
        self.q
    }

    pub fn sigma(&self) -> f64 {
        self.sigma
    }

    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    pub fn has_species(&self) -> bool {
        self.assigned
    }

    fn apply_species(&mut self, species: &Species) {
        self.symbol = species.symbol.clone();
        self.m = species.mass;
        self.q = species.charge;
        self.sigma = species.sigma;
        self.epsilon = species.epsilon;
        self.assigned = true;
    }
}

/// Properties shared by every particle carrying the same group tag
#[derive(Debug, Clone, PartialEq)]
pub struct Species {
    pub symbol: String,
    pub mass: f64,
    pub charge: f64,
    pub sigma: f64,
    pub epsilon: f64,
}

impl Species {
    fn validate(&self, group: &str) -> Result<(), EngineError> {
        if !self.mass.is_finite() || self.mass <= 0.0 {
            return Err(EngineError::InvalidMass { group: group.to_string(), mass: self.mass });
        }
        for (name, value) in [("sigma", self.sigma), ("epsilon", self.epsilon)] {
            if !value.is_finite() || value < 0.0 {
                return Err(EngineError::InvalidSpecies { group: group.to_string(), name, value });
            }
        }
        if !self.charge.is_finite() {
            return Err(EngineError::InvalidSpecies { group: group.to_string(), name: "charge", value: self.charge });
        }
        Ok(())
    }
}

/// Struct-of-arrays mirror of the particle list
#[derive(Debug, Clone, Default)]
struct Views {
    x: Vec<NVec3>,
    v: Vec<NVec3>,
    a: Vec<NVec3>,
    f: Vec<NVec3>,
    m: Vec<f64>,
    q: Vec<f64>,
    pe: Vec<f64>,
    ke: Vec<f64>,
}

#[derive(Debug, Clone, Default)]
pub struct ParticleSet {
    particles: Vec<Particle>,
    views: Views,
}

impl ParticleSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a set from `particles`, numbering them 1..=N in order
    pub fn from_particles(particles: Vec<Particle>) -> Self {
        let mut set = Self { particles, views: Views::default() };
        for (i, p) in set.particles.iter_mut().enumerate() {
            p.id = i + 1;
        }
        set.sync();
        set
    }

    /// Append a particle and return its id
    pub fn push(&mut self, mut particle: Particle) -> usize {
        particle.id = self.particles.len() + 1;
        self.particles.push(particle);
        self.sync();
        self.particles.len()
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Particle> {
        self.particles.iter()
    }

    pub fn get(&self, index: usize) -> Option<&Particle> {
        self.particles.get(index)
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Mutate particles in place; the array views are resynced afterwards
    pub fn modify<F, R>(&mut self, f: F) -> R
    where
        F: FnOnce(&mut [Particle]) -> R,
    {
        let out = f(&mut self.particles);
        self.sync();
        out
    }

    /// Assign `species` to every particle tagged `group`.
    /// Returns how many particles were touched.
    pub fn assign_species(&mut self, group: &str, species: &Species) -> Result<usize, EngineError> {
        species.validate(group)?;
        let touched = self.modify(|particles| {
            let mut n = 0;
            for p in particles.iter_mut().filter(|p| p.group == group) {
                p.apply_species(species);
                n += 1;
            }
            n
        });
        if touched == 0 {
            log::warn!("species '{}' ({}) matches no particle", group, species.symbol);
        }
        Ok(touched)
    }

    /// Every particle must have a species (and hence a positive mass)
    pub fn validate(&self) -> Result<(), EngineError> {
        match self.particles.iter().find(|p| !p.assigned) {
            Some(p) => Err(EngineError::UnassignedSpecies { id: p.id, group: p.group.clone() }),
            None => Ok(()),
        }
    }

    fn sync(&mut self) {
        let p = &self.particles;
        self.views = Views {
            x: p.iter().map(|p| p.x).collect(),
            v: p.iter().map(|p| p.v).collect(),
            a: p.iter().map(|p| p.a).collect(),
            f: p.iter().map(|p| p.f).collect(),
            m: p.iter().map(|p| p.m).collect(),
            q: p.iter().map(|p| p.q).collect(),
            pe: p.iter().map(|p| p.pe).collect(),
            ke: p.iter().map(|p| p.ke).collect(),
        };
    }

    // array views ==========================================================================

    pub fn positions(&self) -> &[NVec3] {
        &self.views.x
    }

    pub fn velocities(&self) -> &[NVec3] {
        &self.views.v
    }

    pub fn accelerations(&self) -> &[NVec3] {
        &self.views.a
    }

    pub fn forces(&self) -> &[NVec3] {
        &self.views.f
    }

    pub fn masses(&self) -> &[f64] {
        &self.views.m
    }

    pub fn charges(&self) -> &[f64] {
        &self.views.q
    }

    pub fn potential_energies(&self) -> &[f64] {
        &self.views.pe
    }

    pub fn kinetic_energies(&self) -> &[f64] {
        &self.views.ke
    }

    // aggregates ===========================================================================

    pub fn potential_energy(&self) -> f64 {
        self.views.pe.iter().sum()
    }

    pub fn kinetic_energy(&self) -> f64 {
        self.views.ke.iter().sum()
    }

    /// KE + the raw per-particle PE sum (each pair counted once per partner)
    pub fn total_energy(&self) -> f64 {
        self.potential_energy() + self.kinetic_energy()
    }

    /// KE + PE/2, the conserved quantity of an unthermostatted run
    pub fn mechanical_energy(&self) -> f64 {
        0.5 * self.potential_energy() + self.kinetic_energy()
    }

    /// Total linear momentum, sum of m v
    pub fn momentum(&self) -> NVec3 {
        self.views
            .m
            .iter()
            .zip(self.views.v.iter())
            .fold(NVec3::zeros(), |acc, (m, v)| acc + *v * *m)
    }
}
