use clap::{Args, ValueEnum};
use serde_json::Value;

use mortgage_mix_core::analytics::{
    self, CompareInput, MixAnalyticsInput, MixInput, SeriesInput, SeriesKind, TrackInput,
};
use mortgage_mix_core::series::YearlyAggregation;
use mortgage_mix_core::{EngineConfig, Mix, Track};

use crate::input::read_input;

#[derive(Args)]
pub struct TrackArgs {
    /// Path to a JSON track
    #[arg(long)]
    pub input: Option<String>,
}

#[derive(Args)]
pub struct MixArgs {
    /// Path to a JSON mix
    #[arg(long)]
    pub input: Option<String>,
}

#[derive(Args)]
pub struct CompareArgs {
    /// Path to a JSON array of mixes
    #[arg(long)]
    pub input: Option<String>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum SeriesKindArg {
    Payment,
    Balance,
    Rate,
    Breakdown,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum YearlyArg {
    Sum,
    Last,
}

#[derive(Args)]
pub struct SeriesArgs {
    /// Path to a JSON mix
    #[arg(long)]
    pub input: Option<String>,

    /// Series to generate
    #[arg(long, default_value = "payment")]
    pub kind: SeriesKindArg,

    /// Collapse months into loan years
    #[arg(long)]
    pub yearly: Option<YearlyArg>,
}

#[derive(Args)]
pub struct AnalyzeArgs {
    /// Path to a tagged JSON input, e.g. {"Mix": {"mix": {...}}}
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_track(args: TrackArgs, config: EngineConfig) -> Result<Value, Box<dyn std::error::Error>> {
    let track: Track = read_input(args.input.as_deref(), "track")?;
    run(MixAnalyticsInput::Track(TrackInput { track, config }))
}

pub fn run_mix(args: MixArgs, config: EngineConfig) -> Result<Value, Box<dyn std::error::Error>> {
    let mix: Mix = read_input(args.input.as_deref(), "mix")?;
    run(MixAnalyticsInput::Mix(MixInput { mix, config }))
}

pub fn run_compare(
    args: CompareArgs,
    config: EngineConfig,
) -> Result<Value, Box<dyn std::error::Error>> {
    let mixes: Vec<Mix> = read_input(args.input.as_deref(), "comparison")?;
    run(MixAnalyticsInput::Compare(CompareInput { mixes, config }))
}

pub fn run_series(
    args: SeriesArgs,
    config: EngineConfig,
) -> Result<Value, Box<dyn std::error::Error>> {
    let mix: Mix = read_input(args.input.as_deref(), "series")?;
    let kind = match args.kind {
        SeriesKindArg::Payment => SeriesKind::MonthlyPayment,
        SeriesKindArg::Balance => SeriesKind::DebtBalance,
        SeriesKindArg::Rate => SeriesKind::BlendedRate,
        SeriesKindArg::Breakdown => SeriesKind::PrincipalInterest,
    };
    let yearly = args.yearly.map(|y| match y {
        YearlyArg::Sum => YearlyAggregation::Sum,
        YearlyArg::Last => YearlyAggregation::Last,
    });
    run(MixAnalyticsInput::Series(SeriesInput {
        mix,
        kind,
        yearly,
        config,
    }))
}

/// `config` is set only when `--tolerance` was given; it then replaces any
/// config carried in the JSON input.
pub fn run_analyze(
    args: AnalyzeArgs,
    config: Option<EngineConfig>,
) -> Result<Value, Box<dyn std::error::Error>> {
    let analytics_input: MixAnalyticsInput = read_input(args.input.as_deref(), "analysis")?;
    run(apply_override(analytics_input, config))
}

fn apply_override(input: MixAnalyticsInput, config: Option<EngineConfig>) -> MixAnalyticsInput {
    match config {
        Some(config) => input.with_config(config),
        None => input,
    }
}

fn run(analytics_input: MixAnalyticsInput) -> Result<Value, Box<dyn std::error::Error>> {
    let result = analytics::analyze_mix(&analytics_input)?;
    Ok(serde_json::to_value(result)?)
}
