//! Ledger module containing expense construction, balance computation, and
//! the household orchestrator

pub mod balance;
pub mod core;
pub mod expense;

pub use balance::*;
pub use core::*;
pub use expense::*;
