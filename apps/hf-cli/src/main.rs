use clap::{Args, Parser, Subcommand};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::path::{Path, PathBuf};
use thiserror::Error;

use hf_chain::{DiscreteChain, SemiMarkovChain, StationaryOptions};
use hf_model::{FlowSumPolicy, ModelConfig, TransitionModel, TransitionModelBuilder};
use hf_table::CompartmentTable;

#[derive(Error, Debug)]
enum AppError {
    #[error("{0}")]
    Table(#[from] hf_table::TableError),
    #[error("{0}")]
    Model(#[from] hf_model::ModelError),
    #[error("{0}")]
    Chain(#[from] hf_chain::ChainError),
    #[error("{0}")]
    Io(#[from] std::io::Error),
    #[error("{0}")]
    Json(#[from] serde_json::Error),
    #[error("{0}")]
    Usage(String),
}

type AppResult<T> = Result<T, AppError>;

#[derive(Parser)]
#[command(name = "hf-cli")]
#[command(about = "Hemoflow CLI - blood compartment transition modeling tool", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Scalar model inputs shared by every model-building command.
///
/// Defaults are the ICRP adult male reference values.
#[derive(Args)]
struct ModelArgs {
    /// Total blood volume in liters
    #[arg(long, default_value_t = 5.3)]
    volume: f64,
    /// Cardiac output in liters per minute
    #[arg(long, default_value_t = 6.5)]
    cardiac: f64,
    /// Time steps per minute of cardiac output
    #[arg(long, default_value_t = 60)]
    resolution: u32,
    /// Recompute flow sums from the flow matrix instead of trusting the
    /// table's flow_sum column
    #[arg(long)]
    derived_flow_sum: bool,
}

impl ModelArgs {
    fn config(&self) -> ModelConfig {
        ModelConfig {
            total_volume_l: self.volume,
            cardiac_output_lpm: self.cardiac,
            resolution: self.resolution,
            flow_sum_policy: if self.derived_flow_sum {
                FlowSumPolicy::Derived
            } else {
                FlowSumPolicy::Measured
            },
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a compartment table CSV
    Validate {
        /// Path to the table CSV file
        table_path: PathBuf,
    },
    /// Build the model and describe its compartment graph
    Describe {
        /// Path to the table CSV file
        table_path: PathBuf,
        #[command(flatten)]
        model: ModelArgs,
    },
    /// Print the transition matrix and sojourn scales
    Matrix {
        /// Path to the table CSV file
        table_path: PathBuf,
        #[command(flatten)]
        model: ModelArgs,
        /// Emit JSON instead of a plain-text table
        #[arg(long)]
        json: bool,
    },
    /// Compute the stationary distribution of the discrete chain
    Stationary {
        /// Path to the table CSV file
        table_path: PathBuf,
        #[command(flatten)]
        model: ModelArgs,
    },
    /// Simulate one semi-Markov path with Weibull sojourn times
    Simulate {
        /// Path to the table CSV file
        table_path: PathBuf,
        #[command(flatten)]
        model: ModelArgs,
        /// Starting compartment name
        #[arg(long)]
        start: String,
        /// Time horizon in steps
        #[arg(long, default_value_t = 1000.0)]
        horizon: f64,
        /// RNG seed
        #[arg(long, default_value_t = 0)]
        seed: u64,
    },
}

fn main() -> AppResult<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Validate { table_path } => cmd_validate(&table_path),
        Commands::Describe { table_path, model } => cmd_describe(&table_path, &model),
        Commands::Matrix {
            table_path,
            model,
            json,
        } => cmd_matrix(&table_path, &model, json),
        Commands::Stationary { table_path, model } => cmd_stationary(&table_path, &model),
        Commands::Simulate {
            table_path,
            model,
            start,
            horizon,
            seed,
        } => cmd_simulate(&table_path, &model, &start, horizon, seed),
    }
}

fn load_table(table_path: &Path) -> AppResult<CompartmentTable> {
    Ok(hf_table::read_table_from_path(table_path)?)
}

fn build_model(table_path: &Path, args: &ModelArgs) -> AppResult<TransitionModel> {
    let table = load_table(table_path)?;
    Ok(TransitionModelBuilder::new(args.config()).build(&table)?)
}

fn cmd_validate(table_path: &Path) -> AppResult<()> {
    println!("Validating table: {}", table_path.display());
    let table = load_table(table_path)?;
    println!("✓ Table is valid ({} compartments)", table.size());
    Ok(())
}

fn cmd_describe(table_path: &Path, args: &ModelArgs) -> AppResult<()> {
    let model = build_model(table_path, args)?;
    let summary = model.to_graph()?.summary();

    println!("Total number of compartments: {}", summary.node_count);
    println!("Total number of edges: {}", summary.edge_count);
    println!("Compartments:");
    for name in &summary.names {
        println!("  {}", name);
    }
    Ok(())
}

fn cmd_matrix(table_path: &Path, args: &ModelArgs, json: bool) -> AppResult<()> {
    let model = build_model(table_path, args)?;

    if json {
        let report = serde_json::json!({
            "names": model.names(),
            "resolution": model.resolution(),
            "matrix": (0..model.size())
                .map(|i| model.matrix().row(i).iter().copied().collect::<Vec<f64>>())
                .collect::<Vec<_>>(),
            "sojourn_scales": model.scales().iter().copied().collect::<Vec<f64>>(),
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("Transition matrix (one row per compartment):");
    for i in 0..model.size() {
        let row: Vec<String> = model
            .matrix()
            .row(i)
            .iter()
            .map(|p| format!("{:.6}", p))
            .collect();
        println!("  {:<16} {}", model.names()[i], row.join(" "));
    }
    println!("Sojourn scales (steps):");
    for i in 0..model.size() {
        println!("  {:<16} {:.3}", model.names()[i], model.scale(i));
    }
    Ok(())
}

fn cmd_stationary(table_path: &Path, args: &ModelArgs) -> AppResult<()> {
    let model = build_model(table_path, args)?;
    let chain = DiscreteChain::from_model(&model)?;
    let pi = chain.stationary(&StationaryOptions::default())?;

    println!("Stationary distribution:");
    for i in 0..chain.size() {
        println!("  {:<16} {:.6}", chain.names()[i], pi[i]);
    }
    Ok(())
}

fn cmd_simulate(
    table_path: &Path,
    args: &ModelArgs,
    start: &str,
    horizon: f64,
    seed: u64,
) -> AppResult<()> {
    let model = build_model(table_path, args)?;
    let smc = SemiMarkovChain::from_model(&model)?;
    let start_idx = model
        .index_of(start)
        .ok_or_else(|| AppError::Usage(format!("no compartment named '{start}'")))?;

    let mut rng = StdRng::seed_from_u64(seed);
    let path = smc.simulate(start_idx, horizon, &mut rng)?;

    println!("Simulated path ({} visits over {} steps):", path.len(), horizon);
    for visit in &path {
        println!(
            "  t={:>10.2}  {:<16} sojourn={:.2}",
            visit.entered_at,
            model.names()[visit.compartment],
            visit.sojourn
        );
    }
    Ok(())
}
