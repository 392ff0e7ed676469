//! Use-cases behind the HTTP handlers.
pub mod catalog;
pub mod commissions;
pub mod orders;
