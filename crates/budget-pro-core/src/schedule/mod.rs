pub mod builder;
pub mod calendar;
pub mod rates;
