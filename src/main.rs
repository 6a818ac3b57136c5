use ropefall::{Engine, Scenario, ScenarioConfig};

use clap::Parser;
use anyhow::Result;

use std::fs::File;
use std::io::{BufReader, BufWriter};

#[derive(Parser, Debug)]
struct Args {
    #[arg(short, default_value = "scenarios/sport_fall.yaml")]
    file_name: String,

    #[arg(short, default_value = "snapshots.json")]
    out: String,
}

// load here to keep main clean
fn load_scenario_from_yaml(file_name: &str) -> Result<ScenarioConfig> {
    let file = File::open(file_name)?;
    let reader = BufReader::new(file);
    let scenario_cfg: ScenarioConfig = serde_yaml::from_reader(reader)?;
    Ok(scenario_cfg)
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let scenario_cfg = load_scenario_from_yaml(&args.file_name)?;
    let scenario = Scenario::build(&scenario_cfg)?;

    let mut engine = Engine::new(scenario);
    engine.run()?;

    let out = File::create(&args.out)?;
    serde_json::to_writer(BufWriter::new(out), &engine.snapshots)?;

    println!(
        "simulated {:.3} s, wrote {} snapshots to {}",
        engine.simulated,
        engine.snapshots.len(),
        args.out
    );

    Ok(())
}
