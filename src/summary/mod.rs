//! Spending summaries and insights over a period's expenses

pub mod categories;
pub mod insights;

pub use categories::*;
pub use insights::*;
