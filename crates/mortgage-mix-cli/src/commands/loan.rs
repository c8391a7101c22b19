use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use mortgage_mix_core::analytics::{self, LoanTerms, MixAnalyticsInput, ScheduleInput};
use mortgage_mix_core::EngineConfig;

use crate::input;

/// Arguments shared by the single-loan commands
#[derive(Args)]
pub struct LoanArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Loan principal
    #[arg(long)]
    pub principal: Option<Decimal>,

    /// Annual interest rate in percent (e.g. 4.5)
    #[arg(long, alias = "rate")]
    pub interest_rate: Option<Decimal>,

    /// Term in whole years
    #[arg(long)]
    pub years: Option<u32>,
}

/// Arguments for the monthly payment calculation
#[derive(Args)]
pub struct PaymentArgs {
    #[command(flatten)]
    pub loan: LoanArgs,
}

/// Arguments for the amortization schedule
#[derive(Args)]
pub struct ScheduleArgs {
    #[command(flatten)]
    pub loan: LoanArgs,
}

pub fn run_payment(args: PaymentArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let terms = loan_terms(args.loan)?;
    let result = analytics::analyze_mix(&MixAnalyticsInput::Payment(terms))?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_schedule(
    args: ScheduleArgs,
    config: EngineConfig,
) -> Result<Value, Box<dyn std::error::Error>> {
    let terms = loan_terms(args.loan)?;
    let result = analytics::analyze_mix(&MixAnalyticsInput::Schedule(ScheduleInput {
        terms,
        config,
    }))?;
    Ok(serde_json::to_value(result)?)
}

fn loan_terms(args: LoanArgs) -> Result<LoanTerms, Box<dyn std::error::Error>> {
    if let Some(ref path) = args.input {
        return input::read_json(path);
    }
    if let Some(data) = input::read_stdin()? {
        return Ok(serde_json::from_value(data)?);
    }
    Ok(LoanTerms {
        principal: args
            .principal
            .ok_or("--principal is required (or provide --input)")?,
        interest_rate: args
            .interest_rate
            .ok_or("--interest-rate is required (or provide --input)")?,
        years: args.years.ok_or("--years is required (or provide --input)")?,
    })
}
