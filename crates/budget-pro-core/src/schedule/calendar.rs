use chrono::{Days, Months, NaiveDate};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::BudgetProError;
use crate::BudgetProResult;

/// Repayment cadence. Determines both the due-date increment and the
/// per-period divisor applied to the annual rate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Frequency {
    #[default]
    Monthly,
    Weekly,
    Annual,
}

impl Frequency {
    /// Number of installment periods per year.
    pub fn periods_per_year(&self) -> Decimal {
        match self {
            Frequency::Monthly => dec!(12),
            Frequency::Weekly => dec!(52),
            Frequency::Annual => dec!(1),
        }
    }
}

/// Due date for the period at `offset` steps after `start` (offset 0 is
/// period 1). Monthly/Annual stepping clamps to month length, so a schedule
/// started on Jan 31 falls due on Feb 28/29, Mar 31, and so on.
pub fn due_date(start: NaiveDate, frequency: Frequency, offset: u32) -> BudgetProResult<NaiveDate> {
    let date = match frequency {
        Frequency::Monthly => start.checked_add_months(Months::new(offset)),
        Frequency::Annual => start.checked_add_months(Months::new(offset * 12)),
        Frequency::Weekly => start.checked_add_days(Days::new(u64::from(offset) * 7)),
    };
    date.ok_or_else(|| {
        BudgetProError::DateError(format!(
            "Due date overflow stepping {offset} {frequency:?} periods from {start}"
        ))
    })
}
