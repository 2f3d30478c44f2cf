use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use restock_sim::app::{AppConfig, AppContext};
use restock_sim::io::demand::DemandPattern;
use restock_sim::io::reporting;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "restock-sim", about = "Daily stock and restock simulation")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one simulation over the daily demand data.
    Run(RunArgs),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum PatternKind {
    Constant,
    Normal,
    Step,
}

#[derive(Args)]
struct RunArgs {
    /// Path to a TOML config file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Demand CSV. Overrides `data_path` from the config.
    #[arg(long)]
    data: Option<PathBuf>,

    /// Use N days of generated demand instead of a CSV file.
    #[arg(long)]
    synthetic: Option<usize>,

    /// Shape of the generated demand.
    #[arg(long, value_enum, default_value_t = PatternKind::Normal)]
    pattern: PatternKind,

    /// Daily demand for the constant pattern.
    #[arg(long, default_value_t = 20)]
    value: u32,

    /// Mean daily demand for the normal pattern.
    #[arg(long, default_value_t = 20.0)]
    mean: f64,

    /// Standard deviation for the normal pattern.
    #[arg(long, default_value_t = 6.0)]
    std_dev: f64,

    /// RNG seed for the normal pattern.
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Demand before the jump in the step pattern.
    #[arg(long, default_value_t = 4)]
    low: u32,

    /// Demand after the jump in the step pattern.
    #[arg(long, default_value_t = 8)]
    high: u32,

    /// First day (0-based) of the high demand in the step pattern.
    #[arg(long, default_value_t = 4)]
    switch_day: usize,

    /// Starting stock. Unparseable values fall back to the default.
    #[arg(long, allow_hyphen_values = true)]
    initial_stock: Option<String>,

    /// Restock when post-sale stock is at or below this level.
    #[arg(long, allow_hyphen_values = true)]
    threshold: Option<String>,

    /// Units added per restock.
    #[arg(long, allow_hyphen_values = true)]
    restock_amount: Option<String>,

    /// Directory for days.csv and summary.json.
    #[arg(long)]
    output_dir: Option<PathBuf>,
}

impl RunArgs {
    fn pattern(&self) -> DemandPattern {
        match self.pattern {
            PatternKind::Constant => DemandPattern::Constant { value: self.value },
            PatternKind::Normal => DemandPattern::Normal {
                mean: self.mean,
                std_dev: self.std_dev,
                seed: self.seed,
            },
            PatternKind::Step => DemandPattern::Step {
                switch_day: self.switch_day,
                low: self.low,
                high: self.high,
            },
        }
    }

    fn app_config(&self) -> Result<AppConfig> {
        let file_config = match &self.config {
            Some(path) => AppConfig::load(path)?,
            None => AppConfig::default(),
        };
        Ok(file_config.with_overrides(self.data.clone(), self.output_dir.clone()))
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("restock_sim=info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run(args) => run(args),
    }
}

fn run(args: RunArgs) -> Result<()> {
    let app_config = args.app_config()?;

    let ctx = match args.synthetic {
        Some(days) => AppContext::new(args.pattern().generate(days)?, app_config.defaults),
        None => AppContext::from_config(&app_config).with_context(|| "failed to load demand data")?,
    };

    let (params, result) = ctx.run_form(
        args.initial_stock.as_deref(),
        args.threshold.as_deref(),
        args.restock_amount.as_deref(),
    );

    std::fs::create_dir_all(&app_config.output_dir)
        .with_context(|| format!("failed to create {}", app_config.output_dir.display()))?;
    reporting::write_day_results(app_config.output_dir.join("days.csv"), &result.days)?;
    reporting::write_summary(app_config.output_dir.join("summary.json"), &result.summary)?;

    let s = &result.summary;
    println!("=== Restock Simulation ===");
    println!(
        "initial stock {}, threshold {}, restock amount {}",
        params.initial_stock, params.threshold, params.restock_amount
    );
    println!("Days simulated:     {}", result.days.len());
    println!("Total demand:       {}", s.total_demand);
    println!("Fulfilled:          {}", s.total_fulfilled);
    println!("Lost (stockout):    {}", s.total_lost);
    println!("Restock days:       {}", s.restock_days);
    println!("Units restocked:    {}", s.total_restocked);
    println!("Average stock:      {:.2}", s.average_stock);

    Ok(())
}
