pub mod error;
pub mod types;

#[cfg(feature = "schedule")]
pub mod schedule;

#[cfg(feature = "allocation")]
pub mod allocation;

pub use error::BudgetProError;
pub use types::*;

/// Standard result type for all debt-engine operations
pub type BudgetProResult<T> = Result<T, BudgetProError>;
