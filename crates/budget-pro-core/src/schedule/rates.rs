use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::types::Rate;

/// When a rate override takes effect: from a calendar date onwards, or from
/// a 1-based period index onwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RateEffective {
    Date(NaiveDate),
    Period(u32),
}

/// A single annual-rate override in a variable-rate loan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateOverride {
    pub effective: RateEffective,
    pub annual_rate: Rate,
}

impl RateOverride {
    fn applies_to(&self, period_index: u32, period_due: NaiveDate) -> bool {
        match self.effective {
            RateEffective::Date(date) => date <= period_due,
            RateEffective::Period(index) => index <= period_index,
        }
    }
}

/// Resolve the annual rate for one period: the last override effective on or
/// before the period's due date (or with index <= the period's), falling
/// back to the base rate when none applies.
pub fn rate_for_period(
    overrides: &[RateOverride],
    base_rate: Rate,
    period_index: u32,
    period_due: NaiveDate,
) -> Rate {
    overrides
        .iter()
        .filter(|o| o.applies_to(period_index, period_due))
        .last()
        .map(|o| o.annual_rate)
        .unwrap_or(base_rate)
}
