//! Household ledger orchestrator that pulls expenses from a source and runs
//! balances, settlement, and summaries over them

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::config::LedgerConfig;
use crate::ledger::{BalanceAggregator, NetBalances};
use crate::period::Period;
use crate::settlement::{self, IntegrityReport, Settlement, SettlementSolver};
use crate::summary::*;
use crate::traits::*;
use crate::types::*;

/// Net balances together with the transfers that settle them
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BalanceReport {
    pub household_id: HouseholdId,
    pub period: Period,
    pub balances: NetBalances,
    pub settlement: Settlement,
}

/// Everything the presentation layer shows for one household month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyReport {
    pub household_id: HouseholdId,
    pub period: Period,
    /// Roster for resolving member ids to names
    pub members: Vec<Member>,
    pub balances: NetBalances,
    pub settlement: Settlement,
    pub summary: CategorySummary,
    pub budget: Option<BudgetStatus>,
    pub contributions: Option<ContributionReport>,
    pub comparison: PeriodComparison,
}

/// Main ledger system for shared household expenses
pub struct HouseholdLedger<S: ExpenseSource> {
    source: S,
    config: LedgerConfig,
    aggregator: BalanceAggregator,
    summarizer: CategorySummarizer,
    solver: SettlementSolver,
}

impl<S: ExpenseSource> HouseholdLedger<S> {
    /// Create a new ledger over the given source with default configuration
    pub fn new(source: S) -> Self {
        let config = LedgerConfig::default();
        Self {
            source,
            aggregator: BalanceAggregator::new(&config),
            config,
            summarizer: CategorySummarizer,
            solver: SettlementSolver,
        }
    }

    /// Create a new ledger with custom configuration
    pub fn with_config(source: S, config: LedgerConfig) -> LedgerResult<Self> {
        config.validate()?;
        Ok(Self {
            source,
            aggregator: BalanceAggregator::new(&config),
            config,
            summarizer: CategorySummarizer,
            solver: SettlementSolver,
        })
    }

    /// Create a new ledger with custom configuration and expense validator
    pub fn with_validator(
        source: S,
        config: LedgerConfig,
        validator: Box<dyn ExpenseValidator>,
    ) -> LedgerResult<Self> {
        config.validate()?;
        Ok(Self {
            source,
            aggregator: BalanceAggregator::with_validator(config.member_order, validator),
            config,
            summarizer: CategorySummarizer,
            solver: SettlementSolver,
        })
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    /// Expenses of a household for a period, straight from the source
    pub async fn expenses(
        &self,
        household_id: HouseholdId,
        period: Period,
    ) -> LedgerResult<Vec<ExpenseRecord>> {
        let expenses = self.source.fetch_expenses(household_id, period).await?;
        debug!(
            "fetched {} expenses for household {} in {}",
            expenses.len(),
            household_id,
            period
        );
        Ok(expenses)
    }

    /// Net balance of every member involved in the period's expenses
    pub async fn balances(
        &self,
        household_id: HouseholdId,
        period: Period,
    ) -> LedgerResult<NetBalances> {
        let expenses = self.expenses(household_id, period).await?;
        self.aggregate(household_id, &expenses)
    }

    /// Net balances and the transfers that settle them
    pub async fn settle(
        &self,
        household_id: HouseholdId,
        period: Period,
    ) -> LedgerResult<BalanceReport> {
        let balances = self.balances(household_id, period).await?;
        let settlement = self.solver.solve(&balances);
        Ok(BalanceReport {
            household_id,
            period,
            balances,
            settlement,
        })
    }

    /// Spending by category and payer
    pub async fn summary(
        &self,
        household_id: HouseholdId,
        period: Period,
    ) -> LedgerResult<CategorySummary> {
        let expenses = self.expenses(household_id, period).await?;
        self.summarizer.summarize(&expenses)
    }

    /// Spending against the household budget. `None` when no budget is set.
    pub async fn budget_status(
        &self,
        household_id: HouseholdId,
        period: Period,
    ) -> LedgerResult<Option<BudgetStatus>> {
        let household = self
            .source
            .fetch_household(household_id)
            .await?
            .ok_or(LedgerError::HouseholdNotFound(household_id))?;
        let Some(budget) = household.monthly_budget else {
            return Ok(None);
        };
        let summary = self.summary(household_id, period).await?;
        Ok(Some(BudgetStatus::new(budget, summary.grand_total)))
    }

    /// How evenly members paid for the period's spending
    pub async fn contributions(
        &self,
        household_id: HouseholdId,
        period: Period,
    ) -> LedgerResult<Option<ContributionReport>> {
        let members = self.source.fetch_members(household_id).await?;
        let summary = self.summary(household_id, period).await?;
        Ok(ContributionReport::new(
            &members,
            &summary,
            &self.config.contribution_tolerance_pct,
        ))
    }

    /// Total spending of the period against the month before
    pub async fn compare_with_previous(
        &self,
        household_id: HouseholdId,
        period: Period,
    ) -> LedgerResult<PeriodComparison> {
        let current = self.summary(household_id, period).await?;
        let previous = self.summary(household_id, period.previous()).await?;
        Ok(PeriodComparison::new(
            current.grand_total,
            previous.grand_total,
        ))
    }

    /// Check that the period's settlement leaves nothing but rounding residue
    pub async fn verify_settlement(
        &self,
        household_id: HouseholdId,
        period: Period,
    ) -> LedgerResult<IntegrityReport> {
        let report = self.settle(household_id, period).await?;
        let integrity = settlement::verify(&report.balances, &report.settlement);
        if !integrity.is_valid {
            warn!(
                "settlement for household {} in {} failed verification: {:?}",
                household_id, period, integrity.issues
            );
        }
        Ok(integrity)
    }

    /// Full report for one household month.
    ///
    /// A missing household row is not an error here; the report simply has no
    /// budget section.
    pub async fn monthly_report(
        &self,
        household_id: HouseholdId,
        period: Period,
    ) -> LedgerResult<MonthlyReport> {
        let expenses = self.expenses(household_id, period).await?;
        let previous_expenses = self.expenses(household_id, period.previous()).await?;
        let members = self.source.fetch_members(household_id).await?;
        let household = self.source.fetch_household(household_id).await?;

        let balances = self.aggregate(household_id, &expenses)?;
        let settlement = self.solver.solve(&balances);
        let summary = self.summarizer.summarize(&expenses)?;
        let previous = self.summarizer.summarize(&previous_expenses)?;

        let budget = match household {
            Some(household) => household
                .monthly_budget
                .map(|budget| BudgetStatus::new(budget, summary.grand_total.clone())),
            None => {
                warn!("household {} has no household record", household_id);
                None
            }
        };
        let contributions = ContributionReport::new(
            &members,
            &summary,
            &self.config.contribution_tolerance_pct,
        );
        let comparison =
            PeriodComparison::new(summary.grand_total.clone(), previous.grand_total.clone());

        Ok(MonthlyReport {
            household_id,
            period,
            members,
            balances,
            settlement,
            summary,
            budget,
            contributions,
            comparison,
        })
    }

    fn aggregate(
        &self,
        household_id: HouseholdId,
        expenses: &[ExpenseRecord],
    ) -> LedgerResult<NetBalances> {
        self.aggregator.aggregate(expenses).inspect_err(|e| {
            warn!(
                "rejected expenses for household {}: {}",
                household_id, e
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::category::Category;
    use crate::utils::memory_storage::MemoryStorage;
    use bigdecimal::BigDecimal;
    use chrono::NaiveDate;

    #[tokio::test]
    async fn test_ledger_basic_operations() {
        let storage = MemoryStorage::new();
        let household = HouseholdId(1);
        storage
            .record_expense(
                household,
                ExpenseRecord::new(
                    BigDecimal::from(100),
                    MemberId(1),
                    vec![MemberId(1), MemberId(2)],
                    Category::Groceries,
                    NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(),
                ),
            )
            .unwrap();

        let ledger = HouseholdLedger::new(storage);
        let period = Period::new(2024, 1).unwrap();

        let report = ledger.settle(household, period).await.unwrap();
        assert_eq!(report.balances.net(MemberId(1)), Some(&BigDecimal::from(50)));
        assert_eq!(report.settlement.transfers.len(), 1);

        let transfer = &report.settlement.transfers[0];
        assert_eq!(transfer.debtor, MemberId(2));
        assert_eq!(transfer.creditor, MemberId(1));
        assert_eq!(transfer.amount, BigDecimal::from(50));

        // Other months are untouched
        let february = ledger
            .settle(household, Period::new(2024, 2).unwrap())
            .await
            .unwrap();
        assert!(february.balances.is_empty());
        assert!(february.settlement.is_settled());
    }

    #[tokio::test]
    async fn test_budget_status_requires_household() {
        let ledger = HouseholdLedger::new(MemoryStorage::new());
        let result = ledger
            .budget_status(HouseholdId(42), Period::new(2024, 1).unwrap())
            .await;
        assert!(matches!(
            result,
            Err(LedgerError::HouseholdNotFound(HouseholdId(42)))
        ));
    }

    #[test]
    fn test_with_config_validates() {
        let mut config = LedgerConfig::default();
        config.contribution_tolerance_pct = BigDecimal::from(-1);
        assert!(HouseholdLedger::with_config(MemoryStorage::new(), config).is_err());
    }
}
