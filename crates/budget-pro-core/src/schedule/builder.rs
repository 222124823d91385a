use chrono::NaiveDate;
use rust_decimal::{Decimal, MathematicalOps};
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::BudgetProError;
use crate::schedule::calendar::{self, Frequency};
use crate::schedule::rates::{self, RateOverride};
use crate::types::*;
use crate::BudgetProResult;

/// How the annual rate behaves over the life of the loan
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RateType {
    #[default]
    Fixed,
    /// Per-period rate changes supplied through `variable_rates`
    Variable,
}

/// How principal is distributed across periods
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AmortizationMode {
    /// Constant total payment per period (interest/principal split shifts)
    Annuity,
    /// Constant principal per amortizing period, declining interest
    PrincipalConstant,
    /// No principal until the final period, which repays it all
    InterestOnly,
    /// Annuity over `principal * (1 - balloon_pct)`, deferred remainder
    /// due with the final period
    Balloon,
}

/// Whether upfront fees are charged entirely in period 1 or spread evenly
/// across the full term.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpfrontFeePolicy {
    #[default]
    FirstPeriod,
    Amortized,
}

/// Input for a full amortization schedule
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanDefinition {
    pub principal: Money,
    pub annual_rate: Rate,
    #[serde(default)]
    pub rate_type: RateType,
    pub amortization_mode: AmortizationMode,
    pub total_periods: u32,
    #[serde(default)]
    pub grace_periods: u32,
    /// Fraction of original principal deferred to the final period.
    /// Only meaningful for `Balloon` mode.
    #[serde(default)]
    pub balloon_pct: Rate,
    /// Flat insurance premium due each period
    #[serde(default)]
    pub monthly_insurance: Money,
    /// One-time fee, charged per `upfront_fee_policy`
    #[serde(default)]
    pub upfront_fees: Money,
    #[serde(default)]
    pub upfront_fee_policy: UpfrontFeePolicy,
    #[serde(default)]
    pub frequency: Frequency,
    pub start_date: NaiveDate,
    /// Ordered rate overrides, consulted when `rate_type` is `Variable`
    /// or `recalc_each_period` is set
    #[serde(default)]
    pub variable_rates: Vec<RateOverride>,
    /// Rebuild the remaining schedule at each period from the then-current
    /// balance instead of precomputing one static payment
    #[serde(default)]
    pub recalc_each_period: bool,
}

/// A single installment line in the schedule
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleLine {
    pub period_index: u32,
    pub due_date: NaiveDate,
    pub principal_due: Money,
    pub interest_due: Money,
    pub insurance_due: Money,
    pub fees_due: Money,
    pub total_due: Money,
    pub remaining_principal_after: Money,
}

/// Full schedule output
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleOutput {
    pub lines: Vec<ScheduleLine>,
    pub total_principal: Money,
    pub total_interest: Money,
    pub total_insurance: Money,
    pub total_fees: Money,
}

/// Build the full payment schedule for a loan.
///
/// Always returns exactly `total_periods` lines. The final period's
/// principal is set to the exact remaining balance, so the terminal
/// balance is zero to the penny in every mode.
pub fn build_schedule(
    loan: &LoanDefinition,
) -> BudgetProResult<ComputationOutput<ScheduleOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    validate(loan)?;

    let n = loan.total_periods;
    let grace = loan.grace_periods;
    let amortizing_periods = n - grace;
    let periods_per_year = loan.frequency.periods_per_year();

    let dynamic_rate = loan.rate_type == RateType::Variable || loan.recalc_each_period;
    if !dynamic_rate && !loan.variable_rates.is_empty() {
        warnings.push(
            "variable_rates ignored: rate_type is fixed and recalc_each_period is off".into(),
        );
    }
    if loan.balloon_pct > Decimal::ZERO && loan.amortization_mode != AmortizationMode::Balloon {
        warnings.push(format!(
            "balloon_pct ignored for {:?} mode",
            loan.amortization_mode
        ));
    }

    let balloon_amount = if loan.amortization_mode == AmortizationMode::Balloon {
        round_money(loan.principal * loan.balloon_pct)
    } else {
        Decimal::ZERO
    };

    // Static annuity payment for the fixed-rate case. Dynamic-rate loans
    // recompute the payment each period from the current balance instead.
    let static_payment = match loan.amortization_mode {
        AmortizationMode::Annuity | AmortizationMode::Balloon if !dynamic_rate => Some(
            annuity_payment(
                loan.principal - balloon_amount,
                loan.annual_rate / periods_per_year,
                amortizing_periods,
            ),
        ),
        _ => None,
    };

    let constant_principal = match loan.amortization_mode {
        AmortizationMode::PrincipalConstant => {
            Some(round_money(loan.principal / Decimal::from(amortizing_periods)))
        }
        _ => None,
    };

    let insurance_due = round_money(loan.monthly_insurance);

    let mut balance = loan.principal;
    // Outstanding amortized portion; equals `balance` except in Balloon mode
    let mut amortized_balance = loan.principal - balloon_amount;

    let mut lines = Vec::with_capacity(n as usize);
    let mut total_interest = Decimal::ZERO;
    let mut total_insurance = Decimal::ZERO;
    let mut total_fees = Decimal::ZERO;
    let mut fees_charged = Decimal::ZERO;

    for period in 1..=n {
        let due_date = calendar::due_date(loan.start_date, loan.frequency, period - 1)?;

        let annual_rate = if dynamic_rate {
            rates::rate_for_period(&loan.variable_rates, loan.annual_rate, period, due_date)
        } else {
            loan.annual_rate
        };
        let rate = annual_rate / periods_per_year;

        // Interest accrues on the full outstanding balance, including any
        // deferred balloon portion and during grace periods.
        let interest_due = round_money(balance * rate);

        let fees_due = match loan.upfront_fee_policy {
            UpfrontFeePolicy::FirstPeriod => {
                if period == 1 {
                    round_money(loan.upfront_fees)
                } else {
                    Decimal::ZERO
                }
            }
            UpfrontFeePolicy::Amortized => {
                // Cumulative rounding keeps every increment non-negative and
                // the total exactly equal to upfront_fees.
                let cumulative =
                    round_money(loan.upfront_fees * Decimal::from(period) / Decimal::from(n));
                let fee = cumulative - fees_charged;
                fees_charged = cumulative;
                fee
            }
        };

        let is_final = period == n;
        let principal_due = if period <= grace {
            Decimal::ZERO
        } else if is_final {
            // Absorb any rounding residue (and the balloon) here
            balance
        } else {
            match loan.amortization_mode {
                AmortizationMode::Annuity | AmortizationMode::Balloon => {
                    let payment = match static_payment {
                        Some(a) => a,
                        None => {
                            let remaining = n - period + 1;
                            annuity_payment(amortized_balance, rate, remaining)
                        }
                    };
                    let split = round_money(payment - round_money(amortized_balance * rate));
                    split.clamp(Decimal::ZERO, amortized_balance)
                }
                AmortizationMode::PrincipalConstant => {
                    constant_principal.unwrap_or(Decimal::ZERO).min(balance)
                }
                AmortizationMode::InterestOnly => Decimal::ZERO,
            }
        };

        balance -= principal_due;
        amortized_balance = (amortized_balance - principal_due).max(Decimal::ZERO);

        total_interest += interest_due;
        total_insurance += insurance_due;
        total_fees += fees_due;

        lines.push(ScheduleLine {
            period_index: period,
            due_date,
            principal_due,
            interest_due,
            insurance_due,
            fees_due,
            total_due: principal_due + interest_due + insurance_due + fees_due,
            remaining_principal_after: balance,
        });
    }

    let output = ScheduleOutput {
        lines,
        total_principal: loan.principal,
        total_interest,
        total_insurance,
        total_fees,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Amortization Schedule Builder",
        &serde_json::json!({
            "mode": loan.amortization_mode,
            "principal": loan.principal.to_string(),
            "annual_rate": loan.annual_rate.to_string(),
            "total_periods": loan.total_periods,
            "grace_periods": loan.grace_periods,
            "frequency": loan.frequency,
        }),
        warnings,
        elapsed,
        output,
    ))
}

/// Constant per-period payment amortizing `pv` over `periods` at rate `rate`.
/// The zero-rate case degenerates to equal principal installments and is an
/// explicit branch, never a division by a zero rate.
fn annuity_payment(pv: Money, rate: Rate, periods: u32) -> Money {
    if rate.is_zero() {
        return pv / Decimal::from(periods);
    }
    let factor = (Decimal::ONE + rate).powd(Decimal::from(periods));
    pv * rate * factor / (factor - Decimal::ONE)
}

fn validate(loan: &LoanDefinition) -> BudgetProResult<()> {
    if loan.principal <= Decimal::ZERO {
        return Err(BudgetProError::InvalidInput {
            field: "principal".into(),
            reason: "Principal must be positive".into(),
        });
    }
    if loan.total_periods == 0 {
        return Err(BudgetProError::InvalidInput {
            field: "total_periods".into(),
            reason: "Term must be at least 1 period".into(),
        });
    }
    if loan.grace_periods > loan.total_periods {
        return Err(BudgetProError::InvalidInput {
            field: "grace_periods".into(),
            reason: "Grace periods cannot exceed total periods".into(),
        });
    }
    if loan.grace_periods == loan.total_periods {
        return Err(BudgetProError::InvalidInput {
            field: "grace_periods".into(),
            reason: "At least one amortizing period is required".into(),
        });
    }
    if loan.annual_rate < Decimal::ZERO {
        return Err(BudgetProError::InvalidInput {
            field: "annual_rate".into(),
            reason: "Annual rate cannot be negative".into(),
        });
    }
    if loan.balloon_pct < Decimal::ZERO || loan.balloon_pct > Decimal::ONE {
        return Err(BudgetProError::InvalidInput {
            field: "balloon_pct".into(),
            reason: "Balloon fraction must be between 0 and 1".into(),
        });
    }
    if loan.monthly_insurance < Decimal::ZERO {
        return Err(BudgetProError::InvalidInput {
            field: "monthly_insurance".into(),
            reason: "Insurance premium cannot be negative".into(),
        });
    }
    if loan.upfront_fees < Decimal::ZERO {
        return Err(BudgetProError::InvalidInput {
            field: "upfront_fees".into(),
            reason: "Upfront fees cannot be negative".into(),
        });
    }
    for (i, o) in loan.variable_rates.iter().enumerate() {
        if o.annual_rate < Decimal::ZERO {
            return Err(BudgetProError::InvalidInput {
                field: format!("variable_rates[{i}]"),
                reason: "Override rate cannot be negative".into(),
            });
        }
    }
    Ok(())
}
