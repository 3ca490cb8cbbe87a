mod view_app;

use clap::{Parser, Subcommand};
use sheetsim_core::{ScenarioConfig, SimulationContext};
use std::fs;
use std::path::{Path, PathBuf};
use view_app::ViewApp;

#[derive(Parser)]
#[command(name = "sheetsim")]
#[command(about = "sheetsim - one-dimensional electrostatic sheet plasma", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a scenario without display and print observables
    Run {
        /// Path to a YAML scenario file (defaults apply when omitted)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Override the number of steps
        #[arg(long)]
        steps: Option<usize>,

        /// Override the step size
        #[arg(long)]
        dt: Option<f64>,
    },
    /// Open the interactive viewer
    View {
        /// Path to a YAML scenario file, reloaded when it changes
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run { config, steps, dt } => run_headless(config.as_deref(), steps, dt),
        Commands::View { config } => run_viewer(config),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

pub(crate) fn load_scenario(path: Option<&Path>) -> Result<ScenarioConfig, Box<dyn std::error::Error>> {
    match path {
        Some(path) => {
            let source = fs::read_to_string(path)?;
            Ok(ScenarioConfig::from_yaml_str(&source)?)
        }
        None => Ok(ScenarioConfig::default()),
    }
}

fn run_headless(
    path: Option<&Path>,
    steps: Option<usize>,
    dt: Option<f64>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut scenario = load_scenario(path)?;
    if let Some(steps) = steps {
        scenario.run.steps = steps;
    }
    if let Some(dt) = dt {
        scenario.run.dt = dt;
    }

    let steps = scenario.run.steps;
    let mut ctx = SimulationContext::new(scenario)?;
    log::info!(
        "running {} sheets for {} steps of dt {}",
        ctx.config().resolution(),
        steps,
        ctx.run_config().dt
    );
    let last = ctx.run(steps);

    for observable in ctx.observables(last.as_ref()) {
        println!("{} = {}", observable.name, observable.value);
    }

    Ok(())
}

fn run_viewer(path: Option<PathBuf>) -> Result<(), Box<dyn std::error::Error>> {
    let options = eframe::NativeOptions::default();
    eframe::run_native(
        "sheetsim",
        options,
        Box::new(move |cc| Ok(Box::new(ViewApp::new(path, cc)))),
    )?;
    Ok(())
}
