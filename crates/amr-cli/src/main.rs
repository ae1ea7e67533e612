use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};

use amr_drive::{run_pipeline, JsonRenderer, PipelineConfig};
use amr_graph::{canonical_hash, graph_from_json, initial_mesh, MeshGraph};
use clap::{Args as ClapArgs, Parser, Subcommand};
use serde_json::json;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(name = "amr-refine", about = "Hexagon/quadrilateral mesh refinement by graph grammar")]
struct Cli {
    /// Log level
    #[arg(long, default_value = "info", global = true)]
    log_level: String,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Execute a refinement pipeline from a YAML configuration.
    Run(RunArgs),
    /// Print a graph together with its structural audit.
    Inspect(InspectArgs),
}

#[derive(ClapArgs, Debug)]
struct RunArgs {
    /// YAML pipeline configuration.
    #[arg(long)]
    config: PathBuf,
    /// JSON graph to start from; the reference mesh is used when omitted.
    #[arg(long)]
    graph: Option<PathBuf>,
    /// Scale of the reference mesh.
    #[arg(long, default_value_t = 5.0)]
    scale: f64,
    /// Overrides `output_dir` from the configuration.
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(ClapArgs, Debug)]
struct InspectArgs {
    /// JSON graph to inspect.
    #[arg(long)]
    graph: PathBuf,
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    let log_level = match cli.log_level.as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Command::Run(args) => run(args),
        Command::Inspect(args) => inspect(args),
    }
}

fn run(args: RunArgs) -> Result<(), Box<dyn Error>> {
    let mut config = PipelineConfig::load(&args.config)?;
    if args.out.is_some() {
        config.output_dir = args.out;
    }
    let graph = match &args.graph {
        Some(path) => load_graph(path)?,
        None => initial_mesh(args.scale)?,
    };
    info!(stages = config.stages.len(), "starting pipeline");

    let (graph, summary) = run_pipeline(&config, graph, Box::new(JsonRenderer))?;
    if let Some(dir) = &config.output_dir {
        fs::create_dir_all(dir)?;
        fs::write(dir.join("summary.json"), serde_json::to_string_pretty(&summary)?)?;
        fs::copy(&args.config, dir.join("config.yaml")).ok();
    }
    println!("{}", serde_json::to_string_pretty(&summary)?);
    info!(steps = summary.steps, hash = %canonical_hash(&graph), "done");
    Ok(())
}

fn inspect(args: InspectArgs) -> Result<(), Box<dyn Error>> {
    let graph = load_graph(&args.graph)?;
    print!("{graph}");
    let report = graph.audit();
    let value = json!({
        "nodes": graph.node_count(),
        "edges": graph.edge_count(),
        "hyperedges": graph.hyperedge_count(),
        "hash": canonical_hash(&graph),
        "clean": report.is_clean(),
        "audit": report,
    });
    println!("{}", serde_json::to_string_pretty(&value)?);
    Ok(())
}

fn load_graph(path: &Path) -> Result<MeshGraph, Box<dyn Error>> {
    Ok(graph_from_json(&fs::read_to_string(path)?)?)
}
