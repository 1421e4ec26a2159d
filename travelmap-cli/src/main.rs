mod constants;

use clap::{ArgAction, Parser, ValueEnum};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::info;
use tracing_subscriber::EnvFilter;
use travelmap_core::{
    edge_error, load_graph, write_locations, Comparison, Error, Graph, Optimizer, OptimizerConfig,
    RatePolicy, RunSummary, Scale, SelectionPolicy, DEFAULT_FIXED_RATE,
};

use constants::*;

#[derive(Parser, Debug)]
#[command(about = "Infer 2D coordinates for locations from pairwise travel times")]
struct Args {
    /// Location table, `name,x,y` per line.
    #[arg(long, default_value = DEFAULT_COORDS_PATH)]
    coords: PathBuf,

    /// Connection table, `from,to,H:MM` per line.
    #[arg(long, default_value = DEFAULT_CONNS_PATH)]
    conns: PathBuf,

    /// JSON optimizer config; flags below override it.
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long, value_enum)]
    selection: Option<SelectionArg>,

    #[arg(long, value_enum)]
    rate: Option<RateArg>,

    /// Step rate used with `--rate fixed`; implies it when given alone.
    #[arg(long)]
    fixed_rate: Option<f64>,

    #[arg(long)]
    iterations: Option<usize>,

    #[arg(long)]
    seed: Option<u64>,

    /// Write optimized positions here in the `name,x,y` format.
    #[arg(long)]
    out: Option<PathBuf>,

    #[arg(long)]
    json: bool,

    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum SelectionArg {
    Random,
    #[value(alias = "top")]
    ExhaustiveWorst,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum RateArg {
    Random,
    Fixed,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct Params {
    selection: SelectionPolicy,
    rate: RatePolicy,
    iterations: usize,
    seed: Option<u64>,
    avg_distance_per_time: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct RunOutput {
    params: Params,
    locations: usize,
    connections: usize,
    duplicate_connections: usize,
    summary: RunSummary,
    comparison: Comparison,
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.verbose);
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("[!!] {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<(), Error> {
    let cfg = build_config(args)?;
    let mut graph = load_graph(&args.coords, &args.conns)?;
    let original = graph.clone();

    let duplicates = graph.duplicate_connections();

    let rng = match cfg.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let mut optimizer = Optimizer::new(&graph, cfg.clone(), rng)?;
    let summary = optimizer.run(&mut graph);
    let comparison = Comparison::new(&original, &graph);

    if let Some(path) = &args.out {
        let file = File::create(path)?;
        write_locations(&graph, BufWriter::new(file))?;
        info!("Wrote {} locations to {}", graph.locations().len(), path.display());
    }

    let output = RunOutput {
        params: Params {
            selection: cfg.selection,
            rate: cfg.rate,
            iterations: cfg.iterations,
            seed: cfg.seed,
            avg_distance_per_time: optimizer.scale().value(),
        },
        locations: graph.locations().len(),
        connections: graph.connections().len(),
        duplicate_connections: duplicates.len(),
        summary,
        comparison,
    };

    if args.json {
        let text = serde_json::to_string_pretty(&output)?;
        println!("{text}");
        return Ok(());
    }

    print_output(&output, &graph, optimizer.scale());
    Ok(())
}

fn init_tracing(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        1 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn build_config(args: &Args) -> Result<OptimizerConfig, Error> {
    let mut cfg = match &args.config {
        Some(path) => OptimizerConfig::load(path)?,
        None => OptimizerConfig::default(),
    };
    if let Some(selection) = args.selection {
        cfg.selection = match selection {
            SelectionArg::Random => SelectionPolicy::Random,
            SelectionArg::ExhaustiveWorst => SelectionPolicy::ExhaustiveWorst,
        };
    }
    let configured_rate = match cfg.rate {
        RatePolicy::Fixed(rate) => rate,
        RatePolicy::Random => DEFAULT_FIXED_RATE,
    };
    match (args.rate, args.fixed_rate) {
        (Some(RateArg::Random), Some(_)) => {
            return Err(Error::Config("--fixed-rate conflicts with --rate random".into()));
        }
        (Some(RateArg::Random), None) => cfg.rate = RatePolicy::Random,
        (Some(RateArg::Fixed), rate) => {
            cfg.rate = RatePolicy::Fixed(rate.unwrap_or(configured_rate));
        }
        (None, Some(rate)) => cfg.rate = RatePolicy::Fixed(rate),
        (None, None) => {}
    }
    if let Some(iterations) = args.iterations {
        cfg.iterations = iterations;
    }
    if args.seed.is_some() {
        cfg.seed = args.seed;
    }
    cfg.validate()?;
    Ok(cfg)
}

fn print_output(output: &RunOutput, graph: &Graph, scale: Scale) {
    let p = &output.params;
    let s = &output.summary;
    println!(
        "Graph: {} locations, {} connections",
        output.locations, output.connections
    );
    if output.duplicate_connections > 0 {
        println!(
            "Note: {} location pairs have more than one connection; each counts separately",
            output.duplicate_connections
        );
    }
    println!(
        "Average distance-per-time: {:.3} units/min",
        p.avg_distance_per_time
    );
    println!(
        "Iterations: {} (commits a={} b={}, rejects={}, degenerate trials={})",
        s.iterations, s.commits_a, s.commits_b, s.rejects, s.degenerate_trials
    );
    if s.stopped_early {
        println!("Stopped early: no connections to optimize.");
    }
    println!(
        "Total error: {:.3} -> {:.3} units",
        s.initial_error, s.final_error
    );

    println!("\nLocations (original -> optimized):");
    for shift in &output.comparison.locations {
        println!(
            "- {} ({:.3}, {:.3}) -> ({:.3}, {:.3}) moved={:.3}",
            shift.name,
            shift.original.x,
            shift.original.y,
            shift.optimized.x,
            shift.optimized.y,
            shift.displacement
        );
    }

    let worst = graph
        .connections()
        .iter()
        .map(|c| (c, edge_error(graph, scale, c).abs()))
        .max_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));
    if let Some((conn, err)) = worst {
        println!(
            "\nWorst remaining connection: {} - {} error={:.3}",
            graph.location(conn.a).name,
            graph.location(conn.b).name,
            err
        );
    }
}
