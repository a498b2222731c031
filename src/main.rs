use phasesim::{ScenarioConfig, Scenario, AnySketch};
use phasesim::{bench_frames, bench_three_body_substeps};

use clap::Parser;
use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(about = "Run a phase-space sketch headless")]
struct Args {
    /// Scenario file, as given or under the crate's scenarios/ directory
    #[arg(short, default_value = "oscillator.yaml")]
    file_name: String,

    /// Override the number of frames to run
    #[arg(long)]
    frames: Option<u64>,

    /// Print the final snapshot as YAML
    #[arg(long)]
    dump: bool,

    /// Time frames instead of running the scenario
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
    let file = File::open(&config_path).with_context(|| format!("opening {}", config_path.display()))?;
    let reader = BufReader::new(file);
    let scenario_cfg: ScenarioConfig =
        serde_yaml::from_reader(reader).with_context(|| format!("parsing {}", config_path.display()))?;

    Ok(scenario_cfg)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    let mut scenario_cfg = load_scenario_from_yaml(&args.file_name)?;
    if let Some(frames) = args.frames {
        scenario_cfg.engine.frames = frames;
    }

    let mut scenario = Scenario::build_scenario(scenario_cfg).context("building scenario")?;

    if args.bench {
        let frames = scenario.engine.frames;
        let report = bench_frames(&mut scenario, frames);
        println!("kind,frames,entities,ms_per_frame");
        println!("{},{},{},{:.6}", report.kind, report.frames, report.entities, report.per_frame_ms());

        if let AnySketch::ThreeBody(s) = &scenario.sketch {
            println!("substeps,ms_per_frame");
            let sweep = bench_three_body_substeps(s.params(), scenario.canvas, scenario.engine.seed, &[1, 2, 4, 8, 16], frames)?;
            for (n, r) in sweep {
                println!("{},{:.6}", n, r.per_frame_ms());
            }
        }
        return Ok(());
    }

    scenario.run();

    if args.dump {
        let snapshot = scenario.snapshot();
        print!("{}", serde_yaml::to_string(&snapshot)?);
    }

    Ok(())
}
