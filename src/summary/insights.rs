//! Budget tracking, contribution balance, and period-over-period comparison

use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};

use super::categories::{percentage_of, CategorySummary};
use crate::types::*;

/// Spending against a monthly budget
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetStatus {
    pub budget: BigDecimal,
    pub spent: BigDecimal,
    /// `budget - spent`, negative once the budget is exceeded
    pub remaining: BigDecimal,
    /// Share of the budget used, capped at 100. 0 when there is no budget.
    pub used_percentage: BigDecimal,
}

impl BudgetStatus {
    pub fn new(budget: BigDecimal, spent: BigDecimal) -> Self {
        let remaining = round_currency(&(&budget - &spent));
        let used_percentage = if budget > BigDecimal::from(0) {
            percentage_of(&spent, &budget).min(BigDecimal::from(100))
        } else {
            BigDecimal::from(0)
        };
        Self {
            budget,
            spent,
            remaining,
            used_percentage,
        }
    }

    pub fn is_over_budget(&self) -> bool {
        self.remaining < BigDecimal::from(0)
    }
}

/// How much one member has paid toward the period's spending
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemberContribution {
    pub member: MemberId,
    pub name: String,
    pub paid: BigDecimal,
    /// Share of total spending, 0-100
    pub percentage: BigDecimal,
}

/// Whether members are carrying the spending evenly
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContributionReport {
    pub contributions: Vec<MemberContribution>,
    pub total: BigDecimal,
    /// Even split of the total across members
    pub average: BigDecimal,
    /// Every member paid within the tolerance of the average
    pub is_balanced: bool,
}

impl ContributionReport {
    /// Build the report for `members` from a period summary.
    ///
    /// `None` when nothing was spent or the household has no members.
    pub fn new(
        members: &[Member],
        summary: &CategorySummary,
        tolerance_pct: &BigDecimal,
    ) -> Option<Self> {
        let total = summary.grand_total.clone();
        if members.is_empty() || total == BigDecimal::from(0) {
            return None;
        }

        let average = &total / BigDecimal::from(members.len() as u64);
        let allowed = &average * tolerance_pct / BigDecimal::from(100);

        let contributions: Vec<MemberContribution> = members
            .iter()
            .map(|member| {
                let paid = summary.payer_total(member.id);
                MemberContribution {
                    member: member.id,
                    name: member.name.clone(),
                    percentage: percentage_of(&paid, &total),
                    paid,
                }
            })
            .collect();

        let is_balanced = contributions
            .iter()
            .all(|contribution| (&contribution.paid - &average).abs() < allowed);

        Some(Self {
            contributions,
            total,
            average: round_currency(&average),
            is_balanced,
        })
    }

    pub fn contribution(&self, member: MemberId) -> Option<&MemberContribution> {
        self.contributions
            .iter()
            .find(|contribution| contribution.member == member)
    }
}

/// Total spending of a period against the one before it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodComparison {
    pub current_total: BigDecimal,
    pub previous_total: BigDecimal,
    /// `previous - current`; positive means less was spent this period
    pub difference: BigDecimal,
}

impl PeriodComparison {
    pub fn new(current_total: BigDecimal, previous_total: BigDecimal) -> Self {
        let difference = round_currency(&(&previous_total - &current_total));
        Self {
            current_total,
            previous_total,
            difference,
        }
    }

    /// Spent no more than in the previous period
    pub fn is_lower(&self) -> bool {
        self.difference >= BigDecimal::from(0)
    }

    /// Change relative to the previous period in percent, `None` without a previous total
    pub fn change_percentage(&self) -> Option<BigDecimal> {
        if self.previous_total == BigDecimal::from(0) {
            return None;
        }
        Some(percentage_of(
            &(&self.current_total - &self.previous_total),
            &self.previous_total,
        ))
    }
}
