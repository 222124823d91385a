pub mod allocate;
pub mod schedule;
