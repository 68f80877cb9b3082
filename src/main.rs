use ljmd::{bench_step, build_observers, run, Observer, Scenario, ScenarioConfig};

use anyhow::{Context, Result};
use clap::Parser;

use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(version, about = "Lennard-Jones + Coulomb molecular dynamics")]
struct Args {
    /// Scenario YAML; bare names are also looked up in ./scenarios
    #[arg(short, default_value = "oxygen_pair.yaml")]
    file_name: String,

    /// Time one integrator step over a range of system sizes and exit
    #[arg(long)]
    bench: bool,
}

// load here to keep main clean
fn load_scenario_from_yaml(file_name: &str) -> Result<ScenarioConfig> {
    let given = PathBuf::from(file_name);
    let config_path = if given.exists() {
        given
    } else {
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("scenarios").join(file_name)
    };
    let scenario_cfg = ScenarioConfig::from_path(&config_path)
        .with_context(|| format!("failed to load scenario {}", config_path.display()))?;
    Ok(scenario_cfg)
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    if args.bench {
        bench_step();
        return Ok(());
    }

    let scenario_cfg = load_scenario_from_yaml(&args.file_name)?;
    let mut scenario = Scenario::build_scenario(&scenario_cfg)?;

    let mut observers: Vec<Box<dyn Observer>> = match &scenario_cfg.output {
        Some(out) => build_observers(out)?,
        None => Vec::new(),
    };

    let summary = run(&mut scenario, &mut observers)?;
    println!(
        "{} steps, E(KE + PE/2) = {:.6} -> {:.6} eV (PE {:.6}, KE {:.6}), max drift {:.3e} eV",
        summary.steps,
        summary.initial_energy,
        summary.final_energy,
        scenario.system.potential_energy(),
        scenario.system.kinetic_energy(),
        summary.max_drift
    );

    Ok(())
}
