//! Expense construction

use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use uuid::Uuid;

use crate::category::Category;
use crate::traits::*;
use crate::types::*;

/// Builder for expense records
#[derive(Debug)]
pub struct ExpenseBuilder {
    expense: ExpenseRecord,
}

impl ExpenseBuilder {
    /// Start an expense paid by `paid_by`. Nobody shares it until members are added.
    pub fn new(
        amount: BigDecimal,
        paid_by: MemberId,
        category: Category,
        occurred_at: NaiveDate,
    ) -> Self {
        Self {
            expense: ExpenseRecord::new(amount, paid_by, Vec::new(), category, occurred_at),
        }
    }

    /// Use a known id instead of a generated one
    pub fn id(mut self, id: Uuid) -> Self {
        self.expense.id = id;
        self
    }

    /// Set the description
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.expense.description = Some(description.into());
        self
    }

    /// Add one member to the split
    pub fn share_with(mut self, member: MemberId) -> Self {
        self.expense.shared_with.push(member);
        self
    }

    /// Add several members to the split
    pub fn shared_with(mut self, members: impl IntoIterator<Item = MemberId>) -> Self {
        self.expense.shared_with.extend(members);
        self
    }

    /// Build the expense
    pub fn build(self) -> LedgerResult<ExpenseRecord> {
        DefaultExpenseValidator::default().validate_expense(&self.expense)?;
        Ok(self.expense)
    }
}

/// Common expense shapes
pub mod patterns {
    use super::*;

    /// Split evenly between the given members (payer included only if listed)
    pub fn split_between(
        amount: BigDecimal,
        paid_by: MemberId,
        members: impl IntoIterator<Item = MemberId>,
        category: Category,
        occurred_at: NaiveDate,
    ) -> LedgerResult<ExpenseRecord> {
        ExpenseBuilder::new(amount, paid_by, category, occurred_at)
            .shared_with(members)
            .build()
    }

    /// Something the payer bought for themselves. Shows up in summaries, never in balances.
    pub fn personal(
        amount: BigDecimal,
        member: MemberId,
        category: Category,
        occurred_at: NaiveDate,
    ) -> LedgerResult<ExpenseRecord> {
        ExpenseBuilder::new(amount, member, category, occurred_at)
            .share_with(member)
            .build()
    }

    /// Paid entirely on someone else's behalf; they owe the full amount
    pub fn paid_for(
        amount: BigDecimal,
        paid_by: MemberId,
        beneficiary: MemberId,
        category: Category,
        occurred_at: NaiveDate,
    ) -> LedgerResult<ExpenseRecord> {
        ExpenseBuilder::new(amount, paid_by, category, occurred_at)
            .share_with(beneficiary)
            .build()
    }
}
