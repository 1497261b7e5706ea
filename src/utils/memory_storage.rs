//! In-memory expense source for testing

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use crate::period::Period;
use crate::traits::*;
use crate::types::*;

fn poisoned<T>(_: PoisonError<T>) -> LedgerError {
    LedgerError::Storage("memory storage lock poisoned".to_string())
}

/// In-memory storage implementation for testing and development
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    households: Arc<RwLock<HashMap<HouseholdId, Household>>>,
    members: Arc<RwLock<HashMap<HouseholdId, Vec<Member>>>>,
    expenses: Arc<RwLock<HashMap<HouseholdId, Vec<ExpenseRecord>>>>,
}

impl MemoryStorage {
    /// Create a new memory storage instance
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a household
    pub fn save_household(&self, household: Household) -> LedgerResult<()> {
        self.households
            .write()
            .map_err(poisoned)?
            .insert(household.id, household);
        Ok(())
    }

    /// Add a member to a household, replacing any member with the same id
    pub fn add_member(&self, household_id: HouseholdId, member: Member) -> LedgerResult<()> {
        let mut members = self.members.write().map_err(poisoned)?;
        let roster = members.entry(household_id).or_default();
        roster.retain(|existing| existing.id != member.id);
        roster.push(member);
        Ok(())
    }

    /// Record an expense for a household
    pub fn record_expense(
        &self,
        household_id: HouseholdId,
        expense: ExpenseRecord,
    ) -> LedgerResult<()> {
        self.expenses
            .write()
            .map_err(poisoned)?
            .entry(household_id)
            .or_default()
            .push(expense);
        Ok(())
    }

    /// Clear all data (useful for testing)
    pub fn clear(&self) -> LedgerResult<()> {
        self.households.write().map_err(poisoned)?.clear();
        self.members.write().map_err(poisoned)?.clear();
        self.expenses.write().map_err(poisoned)?.clear();
        Ok(())
    }
}

#[async_trait]
impl ExpenseSource for MemoryStorage {
    async fn fetch_expenses(
        &self,
        household_id: HouseholdId,
        period: Period,
    ) -> LedgerResult<Vec<ExpenseRecord>> {
        let expenses = self.expenses.read().map_err(poisoned)?;
        let mut filtered: Vec<ExpenseRecord> = expenses
            .get(&household_id)
            .map(|all| {
                all.iter()
                    .filter(|expense| period.contains(expense.occurred_at))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();

        // Newest first, same as the hosted store
        filtered.sort_by(|a, b| b.occurred_at.cmp(&a.occurred_at));
        Ok(filtered)
    }

    async fn fetch_members(&self, household_id: HouseholdId) -> LedgerResult<Vec<Member>> {
        Ok(self
            .members
            .read()
            .map_err(poisoned)?
            .get(&household_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn fetch_household(&self, household_id: HouseholdId) -> LedgerResult<Option<Household>> {
        Ok(self
            .households
            .read()
            .map_err(poisoned)?
            .get(&household_id)
            .cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::category::Category;
    use bigdecimal::BigDecimal;
    use chrono::NaiveDate;

    fn expense_on(day: u32, month: u32) -> ExpenseRecord {
        ExpenseRecord::new(
            BigDecimal::from(10),
            MemberId(1),
            vec![MemberId(1)],
            Category::Other,
            NaiveDate::from_ymd_opt(2024, month, day).unwrap(),
        )
    }

    #[tokio::test]
    async fn test_fetch_expenses_filters_by_period() {
        let storage = MemoryStorage::new();
        let household = HouseholdId(1);
        storage.record_expense(household, expense_on(3, 5)).unwrap();
        storage.record_expense(household, expense_on(20, 5)).unwrap();
        storage.record_expense(household, expense_on(1, 6)).unwrap();
        storage
            .record_expense(HouseholdId(2), expense_on(4, 5))
            .unwrap();

        let may = storage
            .fetch_expenses(household, Period::new(2024, 5).unwrap())
            .await
            .unwrap();

        assert_eq!(may.len(), 2);
        // Newest first
        assert_eq!(may[0].occurred_at, NaiveDate::from_ymd_opt(2024, 5, 20).unwrap());
        assert_eq!(may[1].occurred_at, NaiveDate::from_ymd_opt(2024, 5, 3).unwrap());
    }

    #[tokio::test]
    async fn test_members_and_households() {
        let storage = MemoryStorage::new();
        let household = HouseholdId(7);
        storage
            .add_member(household, Member::new(MemberId(1), "Andrea"))
            .unwrap();
        storage
            .add_member(household, Member::new(MemberId(1), "Andrea P."))
            .unwrap();
        storage
            .add_member(household, Member::new(MemberId(2), "Pamela"))
            .unwrap();

        let members = storage.fetch_members(household).await.unwrap();
        assert_eq!(members.len(), 2);
        assert!(members.iter().any(|m| m.name == "Andrea P."));

        assert!(storage.fetch_household(household).await.unwrap().is_none());
        storage
            .save_household(Household {
                id: household,
                name: "Casa".to_string(),
                monthly_budget: Some(BigDecimal::from(2000)),
            })
            .unwrap();
        assert!(storage.fetch_household(household).await.unwrap().is_some());

        storage.clear().unwrap();
        assert!(storage.fetch_members(household).await.unwrap().is_empty());
    }
}
