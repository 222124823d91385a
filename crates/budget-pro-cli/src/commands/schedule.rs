use chrono::NaiveDate;
use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use budget_pro_core::schedule::builder::{
    self, AmortizationMode, LoanDefinition, RateType, UpfrontFeePolicy,
};
use budget_pro_core::schedule::calendar::Frequency;

use crate::input;

/// Arguments for building an amortization schedule
#[derive(Args)]
pub struct ScheduleArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Amount borrowed
    #[arg(long)]
    pub principal: Option<Decimal>,

    /// Annual rate as a decimal fraction (0.05 = 5%)
    #[arg(long)]
    pub annual_rate: Option<Decimal>,

    /// Amortization mode: annuity, principal-constant, interest-only, balloon
    #[arg(long)]
    pub mode: Option<String>,

    /// Number of installment periods, including grace
    #[arg(long)]
    pub periods: Option<u32>,

    /// Leading periods with no principal due
    #[arg(long, default_value_t = 0)]
    pub grace: u32,

    /// Fraction of principal deferred to the final period (balloon mode)
    #[arg(long)]
    pub balloon_pct: Option<Decimal>,

    /// Flat insurance premium per period
    #[arg(long)]
    pub insurance: Option<Decimal>,

    /// One-time fee
    #[arg(long)]
    pub upfront_fees: Option<Decimal>,

    /// Fee policy: first-period or amortized
    #[arg(long)]
    pub fee_policy: Option<String>,

    /// Repayment frequency: monthly, weekly, annual
    #[arg(long)]
    pub frequency: Option<String>,

    /// Date of the first installment (YYYY-MM-DD)
    #[arg(long)]
    pub start_date: Option<NaiveDate>,

    /// Recompute the remaining schedule each period from the current balance
    #[arg(long)]
    pub recalc: bool,
}

pub fn run_schedule(args: ScheduleArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let loan: LoanDefinition = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        let principal = args
            .principal
            .ok_or("--principal is required (or provide --input)")?;
        let annual_rate = args
            .annual_rate
            .ok_or("--annual-rate is required (or provide --input)")?;
        let total_periods = args
            .periods
            .ok_or("--periods is required (or provide --input)")?;
        let start_date = args
            .start_date
            .ok_or("--start-date is required (or provide --input)")?;

        LoanDefinition {
            principal,
            annual_rate,
            rate_type: RateType::Fixed,
            amortization_mode: parse_mode(args.mode.as_deref().unwrap_or("annuity"))?,
            total_periods,
            grace_periods: args.grace,
            balloon_pct: args.balloon_pct.unwrap_or(Decimal::ZERO),
            monthly_insurance: args.insurance.unwrap_or(Decimal::ZERO),
            upfront_fees: args.upfront_fees.unwrap_or(Decimal::ZERO),
            upfront_fee_policy: parse_fee_policy(args.fee_policy.as_deref().unwrap_or("first-period"))?,
            frequency: parse_frequency(args.frequency.as_deref().unwrap_or("monthly"))?,
            start_date,
            variable_rates: Vec::new(),
            recalc_each_period: args.recalc,
        }
    };

    let result = builder::build_schedule(&loan)?;
    Ok(serde_json::to_value(result)?)
}

fn parse_mode(s: &str) -> Result<AmortizationMode, String> {
    match s.to_lowercase().replace('_', "-").as_str() {
        "annuity" => Ok(AmortizationMode::Annuity),
        "principal-constant" => Ok(AmortizationMode::PrincipalConstant),
        "interest-only" => Ok(AmortizationMode::InterestOnly),
        "balloon" => Ok(AmortizationMode::Balloon),
        other => Err(format!(
            "Unknown mode '{other}' (expected annuity, principal-constant, interest-only, balloon)"
        )),
    }
}

fn parse_fee_policy(s: &str) -> Result<UpfrontFeePolicy, String> {
    match s.to_lowercase().replace('_', "-").as_str() {
        "first-period" => Ok(UpfrontFeePolicy::FirstPeriod),
        "amortized" => Ok(UpfrontFeePolicy::Amortized),
        other => Err(format!(
            "Unknown fee policy '{other}' (expected first-period or amortized)"
        )),
    }
}

fn parse_frequency(s: &str) -> Result<Frequency, String> {
    match s.to_lowercase().as_str() {
        "monthly" => Ok(Frequency::Monthly),
        "weekly" => Ok(Frequency::Weekly),
        "annual" => Ok(Frequency::Annual),
        other => Err(format!(
            "Unknown frequency '{other}' (expected monthly, weekly, annual)"
        )),
    }
}
