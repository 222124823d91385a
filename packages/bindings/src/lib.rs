use napi::Result as NapiResult;
use napi_derive::napi;

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

// ---------------------------------------------------------------------------
// Schedule Builder
// ---------------------------------------------------------------------------

#[napi]
pub fn build_schedule(input_json: String) -> NapiResult<String> {
    let input: budget_pro_core::schedule::builder::LoanDefinition =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = budget_pro_core::schedule::builder::build_schedule(&input)
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Payment Allocator
// ---------------------------------------------------------------------------

#[napi]
pub fn allocate_payment(request_json: String) -> NapiResult<String> {
    let request: budget_pro_core::allocation::waterfall::AllocationRequest =
        serde_json::from_str(&request_json).map_err(to_napi_error)?;
    let output = budget_pro_core::allocation::waterfall::allocate_payment(
        request.payment_amount,
        &request.due,
        &request.paid,
    )
    .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}
