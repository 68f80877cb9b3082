use std::cell::RefCell;
use std::rc::Rc;

use approx::{assert_abs_diff_eq, assert_relative_eq};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use ljmd::simulation::boundary::reflect;
use ljmd::simulation::thermostat::{kinetic_energy, rescale, system_temperature};
use ljmd::simulation::velocities::seed_velocities;
use ljmd::{
    evaluate, run, verlet_integrator, Coulomb, EngineError, LennardJones, NVec3, Observer, PairwiseGeometry,
    Parameters, Particle, ParticleSet, Scenario, ScenarioConfig, Species, COULOMB_K,
};

/// Species with LJ parameters only
fn lj_species(symbol: &str, mass: f64, sigma: f64, epsilon: f64) -> Species {
    Species { symbol: symbol.into(), mass, charge: 0.0, sigma, epsilon }
}

/// Build a 2-particle set separated along x around `center`
fn two_particle_set(dist: f64, a: (&str, &Species), b: (&str, &Species)) -> ParticleSet {
    let center = NVec3::new(10.0, 10.0, 10.0);
    let mut set = ParticleSet::from_particles(vec![
        Particle::new(a.0, center - NVec3::new(dist / 2.0, 0.0, 0.0), NVec3::zeros()),
        Particle::new(b.0, center + NVec3::new(dist / 2.0, 0.0, 0.0), NVec3::zeros()),
    ]);
    set.assign_species(a.0, a.1).unwrap();
    if a.0 != b.0 {
        set.assign_species(b.0, b.1).unwrap();
    }
    set
}

/// Default run parameters for tests
fn test_params() -> Parameters {
    Parameters {
        t_start: 0.0,
        t_end: 1.0,
        dt: 0.001,
        cell: NVec3::new(20.0, 20.0, 20.0),
        temp_bath: 0.0,
        cutoff: 100.0,
        coulomb: false,
    }
}

/// `n` particles of one species with random positions inside the cell and random velocities
fn random_set(n: usize, seed: u64) -> ParticleSet {
    let mut rng = StdRng::seed_from_u64(seed);
    let particles = (0..n)
        .map(|_| {
            let x = NVec3::new(rng.gen_range(1.0..19.0), rng.gen_range(1.0..19.0), rng.gen_range(1.0..19.0));
            let v = NVec3::new(rng.gen_range(-1.0..1.0), rng.gen_range(-1.0..1.0), rng.gen_range(-1.0..1.0));
            Particle::new("Ar", x, v)
        })
        .collect();
    let mut set = ParticleSet::from_particles(particles);
    set.assign_species("Ar", &lj_species("Ar", 39.948, 3.4, 0.0103)).unwrap();
    set
}

// ==================================================================================
// Lennard-Jones tests
// ==================================================================================

#[test]
fn lj_equilibrium_separation_has_no_net_force() {
    let s = lj_species("X", 1.0, 1.0, 1.0);
    let mut set = two_particle_set(2f64.powf(1.0 / 6.0), ("X", &s), ("X", &s));

    evaluate(&mut set, 100.0, false);

    for f in set.forces() {
        assert!(f.norm() < 1e-10, "force at LJ minimum not zero: {:?}", f);
    }
    // each particle carries the full pair energy -ε
    assert_relative_eq!(set.potential_energy(), -2.0, epsilon = 1e-10);
}

#[test]
fn lj_newton_third_law() {
    let s = lj_species("X", 1.0, 1.0, 1.0);
    let mut set = two_particle_set(1.05, ("X", &s), ("X", &s));

    evaluate(&mut set, 100.0, false);

    let net = set.forces()[0] + set.forces()[1];
    assert!(net.norm() < 1e-12, "net force not zero: {:?}", net);
    // closer than the minimum: repulsive, particle 0 (left) pushed to -x
    assert!(set.forces()[0].x < 0.0);
}

#[test]
fn lj_mixing_is_symmetric_and_lorentz_berthelot() {
    let mut set = ParticleSet::from_particles(vec![
        Particle::new("A", NVec3::new(1.0, 1.0, 1.0), NVec3::zeros()),
        Particle::new("B", NVec3::new(2.0, 1.0, 1.0), NVec3::zeros()),
        Particle::new("C", NVec3::new(3.0, 1.0, 1.0), NVec3::zeros()),
        Particle::new("A", NVec3::new(4.0, 1.0, 1.0), NVec3::zeros()),
    ]);
    set.assign_species("A", &lj_species("A", 1.0, 1.0, 0.5)).unwrap();
    set.assign_species("B", &lj_species("B", 2.0, 3.0, 2.0)).unwrap();
    set.assign_species("C", &lj_species("C", 3.0, 2.0, 0.125)).unwrap();

    let lj = LennardJones::mix(&set);

    for i in 0..4 {
        assert_eq!(lj.sigma[(i, i)], 0.0);
        assert_eq!(lj.epsilon[(i, i)], 0.0);
        for j in 0..4 {
            assert_eq!(lj.sigma[(i, j)], lj.sigma[(j, i)]);
            assert_eq!(lj.epsilon[(i, j)], lj.epsilon[(j, i)]);
        }
    }
    assert_relative_eq!(lj.sigma[(0, 1)], 2.0);
    assert_relative_eq!(lj.epsilon[(0, 1)], 1.0);
    assert_relative_eq!(lj.epsilon[(1, 2)], 0.5);
    // same group: taken straight from the partner
    assert_eq!(lj.sigma[(0, 3)], 1.0);
    assert_eq!(lj.epsilon[(0, 3)], 0.5);
}

// ==================================================================================
// Coulomb tests
// ==================================================================================

#[test]
fn coulomb_opposite_charges_attract_with_k_over_r_squared() {
    let plus = Species { symbol: "P".into(), mass: 1.0, charge: 1.0, sigma: 1.0, epsilon: 0.0 };
    let minus = Species { symbol: "M".into(), mass: 1.0, charge: -1.0, sigma: 1.0, epsilon: 0.0 };
    let mut set = two_particle_set(2.0, ("P", &plus), ("M", &minus));

    evaluate(&mut set, 100.0, true);

    let f0 = set.forces()[0];
    let f1 = set.forces()[1];
    assert_relative_eq!(f0.norm(), COULOMB_K / 4.0, epsilon = 1e-12);
    assert_relative_eq!(f1.norm(), COULOMB_K / 4.0, epsilon = 1e-12);

    // toward each other: 0 sits at -x, so it is pulled to +x
    let dx = set.positions()[1] - set.positions()[0];
    assert!(f0.dot(&dx) > 0.0, "force on 0 not toward 1");
    assert!(f1.dot(&dx) < 0.0, "force on 1 not toward 0");

    assert_relative_eq!(set.potential_energies()[0], -COULOMB_K / 2.0, epsilon = 1e-12);
}

#[test]
fn coulomb_accumulates_on_top_of_lj() {
    let a = Species { symbol: "A".into(), mass: 1.0, charge: 0.5, sigma: 1.0, epsilon: 1.0 };
    let b = Species { symbol: "B".into(), mass: 1.0, charge: 0.5, sigma: 1.0, epsilon: 1.0 };
    let mut lj_only = two_particle_set(1.3, ("A", &a), ("B", &b));
    let mut both = lj_only.clone();

    evaluate(&mut lj_only, 100.0, false);
    evaluate(&mut both, 100.0, true);

    let geom = PairwiseGeometry::compute(both.positions());
    let coul_pe = COULOMB_K * 0.25 / geom.r[(0, 1)];
    let coul_f = COULOMB_K * 0.25 / (geom.r[(0, 1)] * geom.r[(0, 1)]);

    assert_relative_eq!(both.potential_energies()[0], lj_only.potential_energies()[0] + coul_pe, epsilon = 1e-12);
    assert_relative_eq!((both.forces()[0] - lj_only.forces()[0]).norm(), coul_f, epsilon = 1e-12);
}

#[test]
fn pair_charge_matrix_has_zero_diagonal() {
    let plus = Species { symbol: "P".into(), mass: 1.0, charge: 2.0, sigma: 0.0, epsilon: 0.0 };
    let minus = Species { symbol: "M".into(), mass: 1.0, charge: -1.5, sigma: 0.0, epsilon: 0.0 };
    let set = two_particle_set(1.0, ("P", &plus), ("M", &minus));

    let coul = Coulomb::charges(&set);
    assert_eq!(coul.charges[(0, 0)], 0.0);
    assert_eq!(coul.charges[(1, 1)], 0.0);
    assert_eq!(coul.charges[(0, 1)], -3.0);
    assert_eq!(coul.charges[(1, 0)], -3.0);
}

// ==================================================================================
// Cutoff / self-interaction tests
// ==================================================================================

#[test]
fn pairs_beyond_cutoff_contribute_nothing() {
    let a = Species { symbol: "A".into(), mass: 1.0, charge: 1.0, sigma: 1.0, epsilon: 1.0 };
    let b = Species { symbol: "B".into(), mass: 1.0, charge: -1.0, sigma: 1.0, epsilon: 1.0 };
    let mut set = two_particle_set(5.0, ("A", &a), ("B", &b));

    evaluate(&mut set, 4.0, true);

    for (f, pe) in set.forces().iter().zip(set.potential_energies()) {
        assert_eq!(*f, NVec3::zeros());
        assert_eq!(*pe, 0.0);
    }
}

#[test]
fn single_particle_feels_nothing() {
    let s = Species { symbol: "A".into(), mass: 1.0, charge: 3.0, sigma: 2.0, epsilon: 5.0 };
    let mut set = ParticleSet::from_particles(vec![Particle::new("A", NVec3::new(1.0, 2.0, 3.0), NVec3::zeros())]);
    set.assign_species("A", &s).unwrap();

    for cutoff in [0.5, 1e6, f64::INFINITY] {
        evaluate(&mut set, cutoff, true);
        assert_eq!(set.forces()[0], NVec3::zeros());
        assert_eq!(set.potential_energies()[0], 0.0);
    }
}

// ==================================================================================
// Integrator tests
// ==================================================================================

#[test]
fn total_energy_is_potential_plus_kinetic_after_steps() {
    let mut set = random_set(12, 3);
    let mut p = test_params();
    p.coulomb = true;

    for _ in 0..20 {
        verlet_integrator(&mut set, &p).unwrap();
        assert_eq!(set.total_energy(), set.potential_energy() + set.kinetic_energy());
    }
}

#[test]
fn pair_oscillation_conserves_energy_and_momentum() {
    let ar = lj_species("Ar", 39.948, 3.4, 0.0103);
    let mut set = two_particle_set(3.6, ("Ar", &ar), ("Ar", &ar));
    let mut p = test_params();
    p.dt = 0.01;

    // per-particle PE counts each pair once per partner, so the mechanical energy is KE + PE / 2
    let energy = |s: &ParticleSet| s.kinetic_energy() + 0.5 * s.potential_energy();

    verlet_integrator(&mut set, &p).unwrap();
    let e0 = energy(&set);
    for _ in 0..500 {
        verlet_integrator(&mut set, &p).unwrap();
        assert_abs_diff_eq!(energy(&set), e0, epsilon = 1e-6);
        assert!(set.momentum().norm() < 1e-12);
    }
}

#[test]
fn integrator_uses_previous_acceleration_for_drift() {
    let s = lj_species("X", 2.0, 1.0, 0.0);
    let mut set = ParticleSet::from_particles(vec![Particle::new("X", NVec3::new(5.0, 5.0, 5.0), NVec3::new(1.0, 0.0, 0.0))]);
    set.assign_species("X", &s).unwrap();
    set.modify(|ps| ps[0].a = NVec3::new(0.0, 2.0, 0.0));

    let p = Parameters { dt: 0.1, ..test_params() };
    verlet_integrator(&mut set, &p).unwrap();

    let x = set.positions()[0];
    assert_relative_eq!(x.x, 5.1, epsilon = 1e-12);
    assert_relative_eq!(x.y, 5.0 + 0.5 * 2.0 * 0.01, epsilon = 1e-12);
    // no forces: a_new = 0, v_y = 0.5 (2 + 0) dt
    assert_relative_eq!(set.velocities()[0].y, 0.1, epsilon = 1e-12);
    assert_eq!(set.accelerations()[0], NVec3::zeros());
}

#[test]
fn particle_crossing_wall_is_reflected() {
    let s = lj_species("X", 1.0, 0.0, 0.0);
    let mut set = ParticleSet::from_particles(vec![Particle::new("X", NVec3::new(0.05, 5.0, 5.0), NVec3::new(-1.0, 0.0, 0.0))]);
    set.assign_species("X", &s).unwrap();
    let p = Parameters { dt: 0.1, ..test_params() };

    verlet_integrator(&mut set, &p).unwrap();

    let x = set.positions()[0];
    let v = set.velocities()[0];
    assert!(v.x > 0.0, "velocity not reflected: {:?}", v);
    assert_relative_eq!(v.x, 1.0, epsilon = 1e-12);
    assert!((0.0..=p.cell.x).contains(&x.x), "position outside cell: {:?}", x);
    assert_relative_eq!(x.x, 0.05, epsilon = 1e-9);
}

#[test]
fn thermostat_step_on_resting_isolated_particle_is_rejected() {
    let s = lj_species("X", 1.0, 1.0, 1.0);
    let mut set = ParticleSet::from_particles(vec![Particle::new("X", NVec3::new(5.0, 5.0, 5.0), NVec3::zeros())]);
    set.assign_species("X", &s).unwrap();
    let p = Parameters { temp_bath: 300.0, ..test_params() };

    let res = verlet_integrator(&mut set, &p);
    assert!(matches!(res, Err(EngineError::ZeroKineticEnergy { .. })));
}

// ==================================================================================
// Thermostat / boundary tests
// ==================================================================================

#[test]
fn rescale_hits_target_temperature() {
    let mut set = random_set(25, 11);
    let target = 300.0;

    rescale(&mut set, target).unwrap();

    assert_relative_eq!(system_temperature(&set), target, max_relative = 1e-10);
    // stored kinetic energies were refreshed after scaling
    let ke: f64 = set.kinetic_energies().iter().sum();
    assert_relative_eq!(ke, kinetic_energy(&mut set), max_relative = 1e-12);
}

#[test]
fn rescale_at_target_leaves_velocities_alone() {
    let mut set = random_set(10, 5);
    let t = system_temperature(&set);
    let before = set.velocities().to_vec();

    let scale = rescale(&mut set, t).unwrap();

    assert_relative_eq!(scale, 1.0, epsilon = 1e-12);
    for (a, b) in before.iter().zip(set.velocities()) {
        assert_relative_eq!((a - b).norm(), 0.0, epsilon = 1e-12);
    }
}

#[test]
fn rescale_without_motion_is_an_error() {
    let mut set = random_set(4, 1);
    set.modify(|ps| ps.iter_mut().for_each(|p| p.v = NVec3::zeros()));
    assert!(matches!(rescale(&mut set, 100.0), Err(EngineError::ZeroKineticEnergy { .. })));
}

#[test]
fn boundary_reflects_on_every_axis() {
    let cell = NVec3::new(10.0, 10.0, 10.0);
    let mut set = ParticleSet::from_particles(vec![Particle::new(
        "X",
        NVec3::new(-0.5, 10.25, 0.0),
        NVec3::new(-2.0, 3.0, -1.0),
    )]);

    reflect(&mut set, &cell);

    let x = set.positions()[0];
    let v = set.velocities()[0];
    assert_relative_eq!(x.x, 0.5, epsilon = 1e-12);
    assert_relative_eq!(x.y, 9.75, epsilon = 1e-12);
    assert!((0.0..=10.0).contains(&x.z));
    assert_eq!(v, NVec3::new(2.0, -3.0, 1.0));
}

#[test]
fn seeded_velocities_match_temperature_without_drift() {
    let mut set = random_set(30, 2);
    seed_velocities(&mut set, 150.0, 42).unwrap();

    assert_relative_eq!(system_temperature(&set), 150.0, max_relative = 1e-10);
    assert!(set.momentum().norm() < 1e-9);

    let mut again = random_set(30, 2);
    seed_velocities(&mut again, 150.0, 42).unwrap();
    assert_eq!(set.velocities(), again.velocities());
}

#[test]
fn seeding_a_lone_particle_keeps_its_velocity() {
    let mut set = ParticleSet::from_particles(vec![Particle::new("Ar", NVec3::new(5.0, 5.0, 5.0), NVec3::new(1.0, 0.0, 0.0))]);
    set.assign_species("Ar", &lj_species("Ar", 39.948, 3.4, 0.0103)).unwrap();

    seed_velocities(&mut set, 100.0, 1).unwrap();

    assert_eq!(set.velocities()[0], NVec3::new(1.0, 0.0, 0.0));
    assert_relative_eq!(set.kinetic_energy(), 0.5 * 39.948, epsilon = 1e-12);
}

#[test]
fn seeding_at_zero_kelvin_keeps_configured_velocities() {
    let mut set = random_set(5, 3);
    let before = set.velocities().to_vec();
    seed_velocities(&mut set, 0.0, 1).unwrap();
    assert_eq!(set.velocities(), &before[..]);
    assert!(set.kinetic_energy() > 0.0);
}

// ==================================================================================
// Scenario / driver tests
// ==================================================================================

const SCENARIO: &str = r#"
engine:
  coulomb: true
  cutoff: 30.0
parameters:
  t_end: 0.05
  dt: 0.005
  cell: [20.0, 20.0, 20.0]
species:
  - { group: Na, symbol: Na, mass: 22.99, charge: 1.0, sigma: 2.35, epsilon: 0.0055 }
  - { group: Cl, symbol: Cl, mass: 35.45, charge: -1.0, sigma: 4.40, epsilon: 0.0042 }
particles:
  - { group: Na, x: [8.0, 10.0, 10.0] }
  - { group: Cl, x: [12.0, 10.0, 10.0] }
  - { group: Na, x: [10.0, 14.0, 10.0], v: [0.0, -0.5, 0.0] }
"#;

#[test]
fn scenario_builds_from_yaml() {
    let cfg = ScenarioConfig::from_yaml_str(SCENARIO).unwrap();
    let scenario = Scenario::build_scenario(&cfg).unwrap();

    assert_eq!(scenario.system.len(), 3);
    assert_eq!(scenario.parameters.n_steps(), 10);
    let ids: Vec<usize> = scenario.system.iter().map(|p| p.id()).collect();
    assert_eq!(ids, vec![1, 2, 3]);
    assert_eq!(scenario.system.charges(), &[1.0, -1.0, 1.0]);
    assert_relative_eq!(scenario.system.kinetic_energy(), 0.5 * 22.99 * 0.25, epsilon = 1e-12);
}

#[test]
fn scenario_rejects_zero_mass_and_missing_species() {
    let zero_mass = SCENARIO.replace("mass: 35.45", "mass: 0.0");
    let cfg = ScenarioConfig::from_yaml_str(&zero_mass).unwrap();
    assert!(matches!(Scenario::build_scenario(&cfg), Err(EngineError::InvalidMass { .. })));

    let missing = SCENARIO.replace("group: Cl, x:", "group: K, x:");
    let cfg = ScenarioConfig::from_yaml_str(&missing).unwrap();
    assert!(matches!(Scenario::build_scenario(&cfg), Err(EngineError::UnassignedSpecies { id: 2, .. })));
}

#[test]
fn scenario_rejects_short_vectors() {
    let bad = SCENARIO.replace("[8.0, 10.0, 10.0]", "[8.0, 10.0]");
    let cfg = ScenarioConfig::from_yaml_str(&bad).unwrap();
    assert!(matches!(Scenario::build_scenario(&cfg), Err(EngineError::Config(_))));
}

/// Records what the driver hands out
struct Recorder {
    times: Rc<RefCell<Vec<f64>>>,
    finished: Rc<RefCell<bool>>,
}

impl Observer for Recorder {
    fn observe(&mut self, _step: usize, t: f64, set: &ParticleSet, _cell: &NVec3) -> Result<(), EngineError> {
        assert_eq!(set.total_energy(), set.potential_energy() + set.kinetic_energy());
        self.times.borrow_mut().push(t);
        Ok(())
    }

    fn finish(&mut self) -> Result<(), EngineError> {
        *self.finished.borrow_mut() = true;
        Ok(())
    }
}

#[test]
fn driver_steps_over_half_open_time_range() {
    let cfg = ScenarioConfig::from_yaml_str(SCENARIO).unwrap();
    let mut scenario = Scenario::build_scenario(&cfg).unwrap();

    let times = Rc::new(RefCell::new(Vec::new()));
    let finished = Rc::new(RefCell::new(false));
    let mut observers: Vec<Box<dyn Observer>> =
        vec![Box::new(Recorder { times: Rc::clone(&times), finished: Rc::clone(&finished) })];
    let summary = run(&mut scenario, &mut observers).unwrap();

    assert_eq!(summary.steps, 10);
    assert_relative_eq!(summary.final_energy, scenario.system.mechanical_energy());
    assert!(*finished.borrow());

    let times = times.borrow();
    assert_eq!(times.len(), 10);
    assert_eq!(times[0], 0.0);
    assert_relative_eq!(times[9], 0.045, epsilon = 1e-12);
}

#[test]
fn driver_drift_tracks_mechanical_energy() {
    let ar = lj_species("Ar", 39.948, 3.4, 0.0103);
    let system = two_particle_set(3.6, ("Ar", &ar), ("Ar", &ar));
    let parameters = Parameters { t_end: 5.0, dt: 0.01, ..test_params() };
    let mut scenario = Scenario { parameters, system };

    let mut observers: Vec<Box<dyn Observer>> = Vec::new();
    let summary = run(&mut scenario, &mut observers).unwrap();

    assert!(summary.steps >= 500);
    // the pair starts at rest and 3.6 A apart: bound, so E < 0 once PE is evaluated
    assert!(summary.initial_energy < 0.0);
    assert!(summary.max_drift < 1e-6, "max drift {}", summary.max_drift);
    assert_abs_diff_eq!(summary.final_energy, summary.initial_energy, epsilon = 1e-6);
    // KE and PE trade places over the oscillation, the raw total does not stay put
    assert!(scenario.system.kinetic_energy() > 1e-5);
}

#[test]
fn writers_produce_frames() {
    let dir = tempfile::tempdir().unwrap();
    let yaml = format!(
        "{}output:\n  dir: {}\n  xyz: true\n  energy: true\n  debug: true\n  every: 2\n",
        SCENARIO,
        dir.path().display()
    );
    let cfg = ScenarioConfig::from_yaml_str(&yaml).unwrap();
    let mut scenario = Scenario::build_scenario(&cfg).unwrap();
    let mut observers = ljmd::build_observers(cfg.output.as_ref().unwrap()).unwrap();

    run(&mut scenario, &mut observers).unwrap();
    drop(observers);

    let energy = std::fs::read_to_string(dir.path().join("energy.txt")).unwrap();
    let lines: Vec<&str> = energy.lines().collect();
    assert_eq!(lines[0], "Time / ps,Potential Energy / eV,Kinetic Energy / eV,Total Energy / eV");
    assert_eq!(lines.len(), 1 + 5);
    assert_eq!(lines[1].split(',').count(), 4);

    let xyz = std::fs::read_to_string(dir.path().join("output.xyz")).unwrap();
    let xyz_lines: Vec<&str> = xyz.lines().collect();
    assert_eq!(xyz_lines.len(), 5 * (2 + 3));
    assert_eq!(xyz_lines[0], "3");
    assert!(xyz_lines[1].starts_with("time = 0 Lattice=\"20 0 0 0 20 0 0 0 20\""));
    assert!(xyz_lines[2].starts_with("Na "));
    assert_eq!(xyz_lines[2].split_whitespace().count(), 7);

    let debug = std::fs::read_to_string(dir.path().join("debug.txt")).unwrap();
    assert!(debug.contains("force = ["));
}
