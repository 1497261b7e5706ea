//! Traits for data access and expense validation

use async_trait::async_trait;

use crate::period::Period;
use crate::types::*;
use crate::utils::validation::{
    validate_currency_scale, validate_positive_amount, validate_shared_with,
};

/// Data access for the ledger
///
/// The core never talks to a database directly. Implement this trait over
/// whatever store holds the household's expenses (a hosted Postgres, SQLite,
/// in-memory, etc.) and hand it to [`crate::HouseholdLedger`].
#[async_trait]
pub trait ExpenseSource: Send + Sync {
    /// All expenses of a household whose date falls inside `period`
    async fn fetch_expenses(
        &self,
        household_id: HouseholdId,
        period: Period,
    ) -> LedgerResult<Vec<ExpenseRecord>>;

    /// Active members of a household
    async fn fetch_members(&self, household_id: HouseholdId) -> LedgerResult<Vec<Member>>;

    /// The household row, if it exists
    async fn fetch_household(&self, household_id: HouseholdId) -> LedgerResult<Option<Household>>;
}

/// Trait for implementing custom expense validation rules
pub trait ExpenseValidator: Send + Sync {
    /// Validate a single expense before it is aggregated
    fn validate_expense(&self, expense: &ExpenseRecord) -> LedgerResult<()>;

    /// Validate every expense, stopping at the first invalid one
    fn validate_all(&self, expenses: &[ExpenseRecord]) -> LedgerResult<()> {
        for (index, expense) in expenses.iter().enumerate() {
            self.validate_expense(expense).map_err(|e| match e {
                LedgerError::InvalidExpense(reason) => LedgerError::InvalidExpense(format!(
                    "record {} ({}): {}",
                    index, expense.id, reason
                )),
                other => other,
            })?;
        }
        Ok(())
    }
}

/// Default expense validator with the rules balances and summaries depend on:
/// positive whole-cent amounts and distinct sharing members
#[derive(Debug, Clone, Default)]
pub struct DefaultExpenseValidator {
    /// Accept expenses with an empty `shared_with`
    pub allow_unshared: bool,
}

impl DefaultExpenseValidator {
    pub fn new(allow_unshared: bool) -> Self {
        Self { allow_unshared }
    }
}

impl ExpenseValidator for DefaultExpenseValidator {
    fn validate_expense(&self, expense: &ExpenseRecord) -> LedgerResult<()> {
        validate_positive_amount(&expense.amount)?;
        validate_currency_scale(&expense.amount)?;

        if expense.shared_with.is_empty() && self.allow_unshared {
            return Ok(());
        }
        validate_shared_with(&expense.shared_with)
    }
}
