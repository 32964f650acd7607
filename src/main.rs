use trailsim::{bench_pipeline, run_fixed, run_viewer};
use trailsim::{Pipeline, Scenario, SimulationConfig, Ticker};

use anyhow::{Context, Result};
use clap::Parser;

use std::fs;
use std::path::PathBuf;

#[derive(Parser, Debug)]
struct Args {
    #[arg(short, default_value = "launching_balls.yaml")]
    file_name: String,

    /// Run without a window for a fixed number of ticks
    #[arg(long)]
    headless: bool,

    /// Ticks to run in headless mode
    #[arg(long, default_value_t = 500)]
    ticks: u64,

    /// Time the pipeline for a range of sizes and exit
    #[arg(long)]
    bench: bool,
}

// load here to keep main clean
fn load_config(file_name: &str) -> Result<SimulationConfig> {
    let direct = PathBuf::from(file_name);
    let config_path = if direct.exists() {
        direct
    } else {
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("scenarios").join(file_name)
    };

    let text = fs::read_to_string(&config_path)
        .with_context(|| format!("failed to read scenario {}", config_path.display()))?;
    let config = SimulationConfig::from_yaml(&text)
        .with_context(|| format!("failed to parse scenario {}", config_path.display()))?;

    Ok(config)
}

fn main() -> Result<()> {
    let args = Args::parse();

    if args.bench {
        env_logger::init();
        bench_pipeline();
        return Ok(());
    }

    let config = load_config(&args.file_name)?;
    if args.headless {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    }

    let scenario = Scenario::build_scenario(&config)?;
    let pool = scenario.engine.build_pool()?;
    let interval = scenario.engine.tick_interval;
    let mut pipeline = Pipeline::from_scenario(scenario, pool);

    if args.headless {
        let mut ticker = Ticker::new(interval);
        let summary = run_fixed(&mut pipeline, &mut ticker, args.ticks, |p, report| {
            log::debug!("step {}: {} entities, waited {:?}", report.step, p.len(), report.waited);
        });
        log::info!(
            "ran {} ticks ({} failed), mean wait {:?}, max wait {:?}",
            summary.ticks,
            summary.failures,
            summary.mean_wait(),
            summary.max_wait
        );
    } else {
        run_viewer(config, pipeline);
    }

    Ok(())
}
