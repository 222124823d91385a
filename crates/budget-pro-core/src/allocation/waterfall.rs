use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::BudgetProError;
use crate::types::*;
use crate::BudgetProResult;

/// Amounts still contractually owed for one installment period
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DueSnapshot {
    pub fees_due: Money,
    pub interest_due: Money,
    pub insurance_due: Money,
    pub principal_due: Money,
}

/// Amounts already credited against that period by earlier payments
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PaidSnapshot {
    pub fees_paid: Money,
    pub interest_paid: Money,
    pub insurance_paid: Money,
    pub principal_paid: Money,
}

/// Portion of one incoming payment applied to each bucket
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AllocationBreakdown {
    pub fees: Money,
    pub interest: Money,
    pub insurance: Money,
    pub principal: Money,
}

/// Result of allocating a single cash payment against one period
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AllocationOutput {
    pub allocation: AllocationBreakdown,
    /// Cash left over once every bucket is fully satisfied. What to do
    /// with it (next period, refund, credit) is the caller's policy.
    pub remainder: Money,
}

/// Single JSON shape for invoking the allocator over a wire (CLI file
/// input, Node bindings).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AllocationRequest {
    pub payment_amount: Money,
    pub due: DueSnapshot,
    #[serde(default)]
    pub paid: PaidSnapshot,
}

/// Allocate a cash payment across the fixed waterfall:
/// fees, then interest, then insurance, then principal.
///
/// Each bucket receives at most its remaining liability (`due - paid`,
/// clamped at zero); unconsumed cash is reported as the remainder, so the
/// four allocations plus the remainder always equal the payment exactly.
/// A `paid` amount exceeding its `due` indicates a corrupted ledger
/// upstream; the bucket is clamped to zero liability and a warning is
/// pushed into the envelope.
pub fn allocate_payment(
    payment_amount: Money,
    due: &DueSnapshot,
    paid: &PaidSnapshot,
) -> BudgetProResult<ComputationOutput<AllocationOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    if payment_amount < Decimal::ZERO {
        return Err(BudgetProError::InvalidInput {
            field: "payment_amount".into(),
            reason: "Payment amount cannot be negative".into(),
        });
    }
    validate_snapshot(due, paid)?;

    let mut remaining = payment_amount;
    let mut take = |bucket: &str, due: Money, paid: Money| -> Money {
        let liability = due - paid;
        if liability < Decimal::ZERO {
            warnings.push(format!(
                "{bucket}: paid {paid} exceeds due {due}; treating bucket as settled"
            ));
        }
        let applied = liability.max(Decimal::ZERO).min(remaining);
        remaining -= applied;
        applied
    };

    let allocation = AllocationBreakdown {
        fees: take("fees", due.fees_due, paid.fees_paid),
        interest: take("interest", due.interest_due, paid.interest_paid),
        insurance: take("insurance", due.insurance_due, paid.insurance_paid),
        principal: take("principal", due.principal_due, paid.principal_paid),
    };

    let output = AllocationOutput {
        allocation,
        remainder: remaining,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Waterfall Payment Allocator",
        &serde_json::json!({
            "payment_amount": payment_amount.to_string(),
            "precedence": ["fees", "interest", "insurance", "principal"],
        }),
        warnings,
        elapsed,
        output,
    ))
}

fn validate_snapshot(due: &DueSnapshot, paid: &PaidSnapshot) -> BudgetProResult<()> {
    let components = [
        ("fees_due", due.fees_due),
        ("interest_due", due.interest_due),
        ("insurance_due", due.insurance_due),
        ("principal_due", due.principal_due),
        ("fees_paid", paid.fees_paid),
        ("interest_paid", paid.interest_paid),
        ("insurance_paid", paid.insurance_paid),
        ("principal_paid", paid.principal_paid),
    ];
    for (field, amount) in components {
        if amount < Decimal::ZERO {
            return Err(BudgetProError::InvalidInput {
                field: field.into(),
                reason: "Snapshot amounts cannot be negative".into(),
            });
        }
    }
    Ok(())
}
