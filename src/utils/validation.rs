//! Validation utilities

use crate::traits::*;
use crate::types::*;
use bigdecimal::BigDecimal;

/// Validate that an amount is positive
pub fn validate_positive_amount(amount: &BigDecimal) -> LedgerResult<()> {
    if *amount <= BigDecimal::from(0) {
        Err(LedgerError::InvalidExpense(
            "Amount must be positive".to_string(),
        ))
    } else {
        Ok(())
    }
}

/// Validate that an amount has no more precision than the currency allows
pub fn validate_currency_scale(amount: &BigDecimal) -> LedgerResult<()> {
    if round_currency(amount) != *amount {
        return Err(LedgerError::InvalidExpense(format!(
            "Amount {} has more than {} decimal places",
            amount, CURRENCY_SCALE
        )));
    }
    Ok(())
}

/// Validate that an expense is shared with a non-empty set of distinct members
pub fn validate_shared_with(shared_with: &[MemberId]) -> LedgerResult<()> {
    if shared_with.is_empty() {
        return Err(LedgerError::InvalidExpense(
            "Expense must be shared with at least one member".to_string(),
        ));
    }

    let mut seen = std::collections::HashSet::new();
    if let Some(duplicate) = shared_with.iter().find(|member| !seen.insert(**member)) {
        return Err(LedgerError::InvalidExpense(format!(
            "Member {} appears more than once in shared_with",
            duplicate
        )));
    }

    Ok(())
}

/// Validate that an expense description is valid
pub fn validate_description(description: &str) -> LedgerResult<()> {
    if description.trim().is_empty() {
        return Err(LedgerError::InvalidExpense(
            "Expense description cannot be blank".to_string(),
        ));
    }

    if description.chars().count() > 500 {
        return Err(LedgerError::InvalidExpense(
            "Expense description cannot exceed 500 characters".to_string(),
        ));
    }

    Ok(())
}

/// Strict expense validator for data entry: everything the default validator
/// checks, plus description rules
pub struct StrictExpenseValidator;

impl ExpenseValidator for StrictExpenseValidator {
    fn validate_expense(&self, expense: &ExpenseRecord) -> LedgerResult<()> {
        DefaultExpenseValidator::default().validate_expense(expense)?;

        if let Some(description) = &expense.description {
            validate_description(description)?;
        }

        Ok(())
    }
}
