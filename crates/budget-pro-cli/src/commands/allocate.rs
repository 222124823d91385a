use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use budget_pro_core::allocation::waterfall::{
    self, AllocationRequest, DueSnapshot, PaidSnapshot,
};

use crate::input;

/// Arguments for allocating a payment against one installment period
#[derive(Args)]
pub struct AllocateArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Cash payment to allocate
    #[arg(long)]
    pub amount: Option<Decimal>,

    /// Fees owed this period
    #[arg(long, default_value = "0")]
    pub fees_due: Decimal,

    /// Interest owed this period
    #[arg(long, default_value = "0")]
    pub interest_due: Decimal,

    /// Insurance owed this period
    #[arg(long, default_value = "0")]
    pub insurance_due: Decimal,

    /// Principal owed this period
    #[arg(long, default_value = "0")]
    pub principal_due: Decimal,

    /// Fees already credited against this period
    #[arg(long, default_value = "0")]
    pub fees_paid: Decimal,

    /// Interest already credited against this period
    #[arg(long, default_value = "0")]
    pub interest_paid: Decimal,

    /// Insurance already credited against this period
    #[arg(long, default_value = "0")]
    pub insurance_paid: Decimal,

    /// Principal already credited against this period
    #[arg(long, default_value = "0")]
    pub principal_paid: Decimal,
}

pub fn run_allocate(args: AllocateArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let request: AllocationRequest = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        let amount = args
            .amount
            .ok_or("--amount is required (or provide --input)")?;
        AllocationRequest {
            payment_amount: amount,
            due: DueSnapshot {
                fees_due: args.fees_due,
                interest_due: args.interest_due,
                insurance_due: args.insurance_due,
                principal_due: args.principal_due,
            },
            paid: PaidSnapshot {
                fees_paid: args.fees_paid,
                interest_paid: args.interest_paid,
                insurance_paid: args.insurance_paid,
                principal_paid: args.principal_paid,
            },
        }
    };

    let result = waterfall::allocate_payment(request.payment_amount, &request.due, &request.paid)?;
    Ok(serde_json::to_value(result)?)
}
