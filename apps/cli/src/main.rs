#![deny(warnings)]

//! Headless CLI: plays a scenario through the engine and prints the reports.

mod interactive;
mod report;

use std::io;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use sim_core::{validate_decisions, validate_parameters, Parameters};
use sim_runtime::{compare_presets, Engine, Preset, Scenario};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Default)]
struct Args {
    params: Option<PathBuf>,
    scenario: Option<String>,
    quarters: Option<usize>,
    export: Option<PathBuf>,
    csv: Option<PathBuf>,
    compare: bool,
    interactive: bool,
}

fn parse_args(args: impl IntoIterator<Item = String>) -> Result<Args> {
    let mut out = Args::default();
    let mut it = args.into_iter();
    while let Some(arg) = it.next() {
        match arg.as_str() {
            "--params" => out.params = it.next().map(PathBuf::from),
            "--scenario" => out.scenario = it.next(),
            "--quarters" => {
                let n = it.next().context("--quarters needs a value")?;
                out.quarters = Some(n.parse().with_context(|| format!("bad quarter count: {n}"))?);
            }
            "--export" => out.export = it.next().map(PathBuf::from),
            "--csv" => out.csv = it.next().map(PathBuf::from),
            "--compare" => out.compare = true,
            "--interactive" => out.interactive = true,
            other => bail!("unknown argument: {other}"),
        }
    }
    if out.interactive && (out.compare || out.scenario.is_some()) {
        bail!("--interactive cannot be combined with --scenario or --compare");
    }
    Ok(out)
}

/// Filter from `RUST_LOG`-style directives, `info` when absent or invalid.
fn log_filter(directives: Option<&str>) -> EnvFilter {
    directives
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new("info"))
}

fn resolve_scenario(args: &Args) -> Result<Scenario> {
    let mut scenario = match &args.scenario {
        None => Scenario::defaults(args.quarters.unwrap_or(4)),
        Some(name) => match name.parse::<Preset>() {
            Ok(preset) => preset.scenario(),
            Err(_) if Path::new(name).exists() => persistence::load_scenario_yaml(name)
                .with_context(|| format!("loading scenario {name}"))?,
            Err(e) => bail!(e),
        },
    };
    if let (Some(n), Some(_)) = (args.quarters, &args.scenario) {
        scenario.quarters.truncate(n);
    }
    Ok(scenario)
}

fn main() -> Result<()> {
    // Logging setup
    let directives = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(directives.as_deref()))
        .init();

    let args = parse_args(std::env::args().skip(1))?;
    info!(?args, "starting CLI");
    println!(
        "Factory business simulation | build {} ({})",
        env!("GIT_SHA"),
        env!("BUILD_DATE")
    );

    let params = match &args.params {
        Some(path) => persistence::load_parameters_yaml(path)
            .with_context(|| format!("loading parameters {}", path.display()))?,
        None => Parameters::default(),
    };
    validate_parameters(&params)?;

    if args.compare {
        let rows = compare_presets(&params)?;
        print!("{}", report::comparison(&rows));
        return Ok(());
    }

    let mut engine = Engine::new(params);
    if args.interactive {
        let quarters = args.quarters.unwrap_or(4);
        info!(quarters, "interactive game");
        print!("{}", report::opening_position(engine.state()));
        let mut input = io::stdin().lock();
        let mut out = io::stdout();
        for _ in 0..quarters {
            let next = engine.state().current_quarter + 1;
            let d = interactive::read_decisions(&mut input, &mut out, engine.params(), next)?;
            let result = engine.simulate_quarter(&d);
            print!("{}", report::quarter_report(&result));
        }
    } else {
        let scenario = resolve_scenario(&args)?;
        for d in &scenario.quarters {
            validate_decisions(d)?;
        }
        info!(name = %scenario.name, quarters = scenario.quarters.len(), "playing scenario");

        print!("{}", report::opening_position(engine.state()));
        for d in &scenario.quarters {
            let result = engine.simulate_quarter(d);
            print!("{}", report::quarter_report(&result));
        }
    }

    match engine.summary() {
        Ok(summary) => print!("{}", report::year_end(&summary)),
        Err(e) => println!("\nNo summary: {e}"),
    }

    if let Some(path) = &args.export {
        persistence::write_export_json(path, &engine.export())?;
        println!("Results exported to {}", path.display());
    }
    if let Some(path) = &args.csv {
        persistence::write_quarter_csv(path, engine.ledger().entries())?;
        println!("Quarter table written to {}", path.display());
    }
    if args.export.is_none() && args.csv.is_none() {
        let path = Path::new(persistence::default_export_dir())
            .join(persistence::timestamped_file_name("factory_results", "json"));
        persistence::write_export_json(&path, &engine.export())?;
        println!("Results exported to {}", path.display());
    }

    Ok(())
}
