//! # Household Ledger
//!
//! Shared expense accounting for households: who paid, who owes, and the
//! fewest transfers that square everyone up.
//!
//! ## Features
//!
//! - **Net balances**: credit, owed share, and net position per member, with
//!   exact decimal arithmetic and rounding only at the end
//! - **Settlement**: greedy creditor/debtor matching into an ordered list of transfers
//! - **Summaries**: totals by category, category group, fixed/variable type,
//!   payer, and week, with percentages of the grand total
//! - **Insights**: budget tracking, contribution balance, month-over-month comparison
//! - **Storage abstraction**: the data store is an injected [`ExpenseSource`]
//!
//! ## Quick Start
//!
//! ```rust
//! use household_ledger::{
//!     BalanceAggregator, Category, ExpenseRecord, LedgerConfig, MemberId, SettlementSolver,
//! };
//! use bigdecimal::BigDecimal;
//! use chrono::NaiveDate;
//!
//! let groceries = ExpenseRecord::new(
//!     BigDecimal::from(100),
//!     MemberId(1),
//!     vec![MemberId(1), MemberId(2)],
//!     Category::Groceries,
//!     NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(),
//! );
//!
//! let balances = BalanceAggregator::new(&LedgerConfig::default())
//!     .aggregate(&[groceries])
//!     .unwrap();
//! let settlement = SettlementSolver.solve(&balances);
//!
//! assert_eq!(settlement.transfers.len(), 1);
//! assert_eq!(settlement.transfers[0].debtor, MemberId(2));
//! ```

pub mod category;
pub mod config;
pub mod ledger;
pub mod period;
pub mod settlement;
pub mod summary;
pub mod traits;
pub mod types;
pub mod utils;

// Re-export commonly used types
pub use category::*;
pub use config::*;
pub use ledger::*;
pub use period::*;
pub use settlement::*;
pub use summary::*;
pub use traits::*;
pub use types::*;

// Re-export expense patterns for convenience
pub use ledger::expense::patterns;
