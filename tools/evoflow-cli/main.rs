use clap::{Parser, Subcommand};
use evoflow::codegen::visualizer::visualize_program;
use evoflow::prelude::*;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Compiles evolutionary-algorithm flowcharts into Rust source
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compile a saved scene and write the generated sources
    Export {
        /// Path to the scene save file (one JSON node per line)
        scene: PathBuf,
        /// Name of the folder to create; a timestamp when omitted
        #[arg(short, long)]
        folder: Option<String>,
        /// Directory to create the export folder in
        #[arg(short, long)]
        out: Option<PathBuf>,
        /// TOML configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Copy the runtime support files from this directory
        #[arg(long)]
        support_dir: Option<PathBuf>,
        /// Rename colliding node identifiers instead of failing
        #[arg(long)]
        suffix_collisions: bool,
    },
    /// Compile a saved scene and run it in-process
    Run {
        scene: PathBuf,
        /// Seed for a reproducible run
        #[arg(short, long)]
        seed: Option<u64>,
        /// Number of independent runs
        #[arg(short, long, default_value_t = 1)]
        runs: usize,
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Print the compiled units of a saved scene
    Inspect { scene: PathBuf },
}

fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "evoflow=info,evoflow_cli=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Export {
            scene,
            folder,
            out,
            config,
            support_dir,
            suffix_collisions,
        } => {
            let mut config = load_config(config);
            if folder.is_some() {
                config.export.folder = folder;
            }
            if let Some(out) = out {
                config.export.output_root = out;
            }
            if support_dir.is_some() {
                config.export.support_dir = support_dir;
            }
            if suffix_collisions {
                config.export.collision_policy = CollisionPolicy::Suffix;
            }
            run_export(&scene, config);
        }
        Command::Run {
            scene,
            seed,
            runs,
            config,
        } => run_flowchart(&scene, seed, runs, load_config(config)),
        Command::Inspect { scene } => run_inspect(&scene),
    }
}

fn run_export(scene: &Path, config: FlowConfig) {
    let total_start = Instant::now();
    let graph = load_graph(scene);

    let summary = ExportDriver::new(config.export)
        .export(&graph)
        .unwrap_or_else(|e| exit_with_error(&format!("Export failed: {}", e)));

    println!("Exported to {}", summary.folder.display());
    for file in &summary.files {
        println!("  {}", file.display());
    }
    info!(elapsed = ?total_start.elapsed(), "done");
}

fn run_flowchart(scene: &Path, seed: Option<u64>, runs: usize, config: FlowConfig) {
    let graph = load_graph(scene);
    let program = Compiler::builder(&graph)
        .with_collision_policy(config.export.collision_policy)
        .with_main_scope(&config.export.main_scope)
        .build()
        .compile()
        .unwrap_or_else(|e| exit_with_error(&format!("Compilation failed: {}", e)));

    let rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    let mut rt = NodeImplementation::with_rng(rng);
    let executor = Executor::new(&program).with_max_steps(config.run.max_steps);

    for run in 1..=runs {
        rt.reset();
        let trace = executor.run(&mut rt).unwrap_or_else(|e| {
            error!(run, error = %e, "run failed");
            exit_with_error(&format!("Run {} failed: {}", run, e))
        });
        println!("--- Run {} ({} steps) ---", run, trace.len());
        print!("{}", trace);
    }
}

fn run_inspect(scene: &Path) {
    let graph = load_graph(scene);
    let walker = GraphWalker::new(&graph);
    println!(
        "{} nodes, {} edges, {} nested scopes",
        graph.len(),
        graph.edges().len(),
        graph.scopes().count()
    );
    println!("Start nodes: {:?}", walker.find_start_nodes());

    let program = Compiler::builder(&graph)
        .with_collision_policy(CollisionPolicy::Suffix)
        .build()
        .compile()
        .unwrap_or_else(|e| exit_with_error(&format!("Compilation failed: {}", e)));
    print!("{}", visualize_program(&program));
}

fn load_config(path: Option<PathBuf>) -> FlowConfig {
    match path {
        Some(path) => FlowConfig::from_file(&path)
            .unwrap_or_else(|e| exit_with_error(&format!("Failed to load config: {}", e))),
        None => FlowConfig::default(),
    }
}

fn load_graph(scene: &Path) -> FlowGraph {
    SceneDefinition::from_file(scene)
        .and_then(IntoFlow::into_flow)
        .unwrap_or_else(|e| {
            error!(scene = %scene.display(), error = %e, "could not load scene");
            exit_with_error(&format!("Failed to load scene '{}': {}", scene.display(), e))
        })
}

fn exit_with_error(message: &str) -> ! {
    eprintln!("\nError: {}", message);
    std::process::exit(1);
}
