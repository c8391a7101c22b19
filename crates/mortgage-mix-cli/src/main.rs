mod commands;
mod input;
mod logging;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use rust_decimal::Decimal;
use std::process;

use mortgage_mix_core::EngineConfig;

use commands::loan::{PaymentArgs, ScheduleArgs};
use commands::mix::{AnalyzeArgs, CompareArgs, MixArgs, SeriesArgs, TrackArgs};

/// Mortgage mix amortization and comparison
#[derive(Parser)]
#[command(
    name = "mix",
    version,
    about = "Mortgage mix amortization, comparison and chart series",
    long_about = "A CLI for the mortgage mix engine with decimal precision. Computes \
                  track payments and amortization schedules, aggregates mixes of \
                  tracks, compares competing mixes and derives chart series."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Residual balance treated as paid off (overrides a config in `analyze` input)
    #[arg(long, global = true)]
    tolerance: Option<Decimal>,

    /// Log engine activity to stderr
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Monthly payment for a single loan
    Payment(PaymentArgs),
    /// Full amortization schedule for a single loan
    Schedule(ScheduleArgs),
    /// Payment profile of one mix track
    Track(TrackArgs),
    /// Aggregate a mix of tracks
    Mix(MixArgs),
    /// Compare several mixes
    Compare(CompareArgs),
    /// Month-by-month chart series for a mix
    Series(SeriesArgs),
    /// Run any engine operation from a tagged JSON input
    Analyze(AnalyzeArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn main() {
    let cli = Cli::parse();
    logging::init_tracing(cli.verbose);

    let config = match cli.tolerance {
        Some(tolerance) => match EngineConfig::with_balance_tolerance(tolerance) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("{}: {}", "error".red().bold(), e);
                process::exit(1);
            }
        },
        None => EngineConfig::default(),
    };

    let tolerance_override = cli.tolerance.map(|_| config.clone());

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Payment(args) => commands::loan::run_payment(args),
        Commands::Schedule(args) => commands::loan::run_schedule(args, config),
        Commands::Track(args) => commands::mix::run_track(args, config),
        Commands::Mix(args) => commands::mix::run_mix(args, config),
        Commands::Compare(args) => commands::mix::run_compare(args, config),
        Commands::Series(args) => commands::mix::run_series(args, config),
        Commands::Analyze(args) => commands::mix::run_analyze(args, tolerance_override),
        Commands::Version => {
            println!("mix {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            tracing::debug!(error = %e, "command failed");
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
