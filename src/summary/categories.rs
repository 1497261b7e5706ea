//! Spending totals by category, group, type, payer, and week

use bigdecimal::BigDecimal;
use chrono::Datelike;
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::category::{Category, ExpenseType, MacroCategory};
use crate::types::*;
use crate::utils::validation::{validate_currency_scale, validate_positive_amount};

/// `amount` as a percentage of `total`, 0 when `total` is 0
pub fn percentage_of(amount: &BigDecimal, total: &BigDecimal) -> BigDecimal {
    if *total == BigDecimal::from(0) {
        return BigDecimal::from(0);
    }
    round_currency(&(amount * BigDecimal::from(100) / total))
}

/// Total spent in one category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryTotal {
    pub category: Category,
    pub amount: BigDecimal,
    /// Share of the grand total, 0-100
    pub percentage: BigDecimal,
}

/// Total spent in one category group
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MacroTotal {
    pub macro_category: MacroCategory,
    pub amount: BigDecimal,
    pub percentage: BigDecimal,
}

/// Gross amount one member paid (not their net balance)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayerTotal {
    pub payer: MemberId,
    pub amount: BigDecimal,
}

/// Spending summary of a set of expenses
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategorySummary {
    /// Categories with spending, in category order
    pub category_totals: Vec<CategoryTotal>,
    /// Category groups with spending, in group order
    pub macro_totals: Vec<MacroTotal>,
    pub fixed_total: BigDecimal,
    pub variable_total: BigDecimal,
    /// Payers in ascending member id order
    pub payer_totals: Vec<PayerTotal>,
    /// Days 1-7, 8-14, 15-21, and 22 to month end
    pub weekly_totals: [BigDecimal; 4],
    pub grand_total: BigDecimal,
    pub expense_count: usize,
}

impl CategorySummary {
    /// Total for one category, 0 if nothing was spent in it
    pub fn category_total(&self, category: Category) -> BigDecimal {
        self.category_totals
            .iter()
            .find(|total| total.category == category)
            .map(|total| total.amount.clone())
            .unwrap_or_else(|| BigDecimal::from(0))
    }

    /// Gross amount paid by a member, 0 if they paid nothing
    pub fn payer_total(&self, payer: MemberId) -> BigDecimal {
        self.payer_totals
            .iter()
            .find(|total| total.payer == payer)
            .map(|total| total.amount.clone())
            .unwrap_or_else(|| BigDecimal::from(0))
    }

    /// Total for fixed or variable spending
    pub fn type_total(&self, expense_type: ExpenseType) -> &BigDecimal {
        match expense_type {
            ExpenseType::Fixed => &self.fixed_total,
            ExpenseType::Variable => &self.variable_total,
        }
    }

    /// Categories from largest to smallest spend
    pub fn ranked_categories(&self) -> Vec<&CategoryTotal> {
        let mut ranked: Vec<&CategoryTotal> = self.category_totals.iter().collect();
        ranked.sort_by(|a, b| b.amount.cmp(&a.amount));
        ranked
    }

    /// Payers from largest to smallest contribution
    pub fn ranked_payers(&self) -> Vec<&PayerTotal> {
        let mut ranked: Vec<&PayerTotal> = self.payer_totals.iter().collect();
        ranked.sort_by(|a, b| b.amount.cmp(&a.amount));
        ranked
    }

    pub fn is_empty(&self) -> bool {
        self.expense_count == 0
    }
}

/// Summarizes expenses by category and payer
#[derive(Debug, Clone, Copy, Default)]
pub struct CategorySummarizer;

impl CategorySummarizer {
    /// Summarize a set of expenses.
    ///
    /// Fails on the first amount that is not a positive whole number of cents,
    /// so every breakdown adds up to the grand total exactly.
    pub fn summarize(&self, expenses: &[ExpenseRecord]) -> LedgerResult<CategorySummary> {
        let mut by_category: BTreeMap<Category, BigDecimal> = BTreeMap::new();
        let mut by_macro: BTreeMap<MacroCategory, BigDecimal> = BTreeMap::new();
        let mut by_payer: BTreeMap<MemberId, BigDecimal> = BTreeMap::new();
        let mut fixed_total = BigDecimal::from(0);
        let mut variable_total = BigDecimal::from(0);
        let mut weekly: [BigDecimal; 4] = Default::default();
        let mut grand_total = BigDecimal::from(0);

        for expense in expenses {
            validate_positive_amount(&expense.amount).map_err(|_| {
                LedgerError::InvalidExpense(format!(
                    "expense {} has non-positive amount {}",
                    expense.id, expense.amount
                ))
            })?;
            validate_currency_scale(&expense.amount).map_err(|_| {
                LedgerError::InvalidExpense(format!(
                    "expense {} has sub-cent amount {}",
                    expense.id, expense.amount
                ))
            })?;

            let amount = &expense.amount;
            *by_category.entry(expense.category).or_default() += amount;
            *by_macro
                .entry(expense.category.macro_category())
                .or_default() += amount;
            *by_payer.entry(expense.paid_by).or_default() += amount;

            match expense.category.expense_type() {
                ExpenseType::Fixed => fixed_total += amount,
                ExpenseType::Variable => variable_total += amount,
            }

            let week = ((expense.occurred_at.day() as usize - 1) / 7).min(3);
            weekly[week] += amount;
            grand_total += amount;
        }

        let grand_total = round_currency(&grand_total);

        let category_totals = by_category
            .into_iter()
            .map(|(category, amount)| {
                let amount = round_currency(&amount);
                CategoryTotal {
                    category,
                    percentage: percentage_of(&amount, &grand_total),
                    amount,
                }
            })
            .collect();

        let macro_totals = by_macro
            .into_iter()
            .map(|(macro_category, amount)| {
                let amount = round_currency(&amount);
                MacroTotal {
                    macro_category,
                    percentage: percentage_of(&amount, &grand_total),
                    amount,
                }
            })
            .collect();

        let payer_totals = by_payer
            .into_iter()
            .map(|(payer, amount)| PayerTotal {
                payer,
                amount: round_currency(&amount),
            })
            .collect();

        debug!(
            "summarized {} expenses totalling {}",
            expenses.len(),
            grand_total
        );

        Ok(CategorySummary {
            category_totals,
            macro_totals,
            fixed_total: round_currency(&fixed_total),
            variable_total: round_currency(&variable_total),
            payer_totals,
            weekly_totals: weekly.map(|total| round_currency(&total)),
            grand_total,
            expense_count: expenses.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::str::FromStr;

    fn dec(s: &str) -> BigDecimal {
        BigDecimal::from_str(s).unwrap()
    }

    fn expense(amount: &str, paid_by: u64, category: Category, day: u32) -> ExpenseRecord {
        ExpenseRecord::new(
            dec(amount),
            MemberId(paid_by),
            vec![MemberId(1), MemberId(2)],
            category,
            NaiveDate::from_ymd_opt(2024, 1, day).unwrap(),
        )
    }

    #[test]
    fn test_summary_totals() {
        let expenses = vec![
            expense("1200", 1, Category::Rent, 1),
            expense("250.50", 2, Category::Groceries, 9),
            expense("49.50", 1, Category::Delivery, 16),
            expense("100", 2, Category::Groceries, 31),
        ];

        let summary = CategorySummarizer.summarize(&expenses).unwrap();

        assert_eq!(summary.grand_total, dec("1600"));
        assert_eq!(summary.expense_count, 4);
        assert_eq!(summary.category_total(Category::Groceries), dec("350.50"));
        assert_eq!(summary.category_total(Category::Cinema), BigDecimal::from(0));

        let rent = &summary.category_totals[0];
        assert_eq!(rent.category, Category::Rent);
        assert_eq!(rent.percentage, dec("75"));

        assert_eq!(summary.macro_totals.len(), 2);
        assert_eq!(summary.macro_totals[1].macro_category, MacroCategory::Food);
        assert_eq!(summary.macro_totals[1].amount, dec("400"));
        assert_eq!(summary.macro_totals[1].percentage, dec("25"));

        assert_eq!(summary.fixed_total, dec("1200"));
        assert_eq!(*summary.type_total(ExpenseType::Variable), dec("400"));

        assert_eq!(summary.payer_total(MemberId(1)), dec("1249.50"));
        assert_eq!(summary.payer_total(MemberId(2)), dec("350.50"));
        assert_eq!(summary.payer_total(MemberId(3)), BigDecimal::from(0));

        assert_eq!(
            summary.weekly_totals,
            [dec("1200"), dec("250.50"), dec("49.50"), dec("100")]
        );
    }

    #[test]
    fn test_category_totals_add_up_to_grand_total() {
        let expenses = vec![
            expense("10.01", 1, Category::Taxi, 2),
            expense("20.02", 2, Category::Fuel, 3),
            expense("30.03", 1, Category::Taxi, 4),
        ];
        let summary = CategorySummarizer.summarize(&expenses).unwrap();

        let category_sum: BigDecimal = summary.category_totals.iter().map(|t| &t.amount).sum();
        let payer_sum: BigDecimal = summary.payer_totals.iter().map(|t| &t.amount).sum();
        assert_eq!(category_sum, summary.grand_total);
        assert_eq!(payer_sum, summary.grand_total);
        assert_eq!(summary.grand_total, dec("60.06"));
    }

    #[test]
    fn test_ranked() {
        let expenses = vec![
            expense("5", 1, Category::Cinema, 2),
            expense("50", 2, Category::Health, 3),
            expense("20", 2, Category::Clothing, 4),
        ];
        let summary = CategorySummarizer.summarize(&expenses).unwrap();

        let ranked: Vec<_> = summary.ranked_categories().iter().map(|t| t.category).collect();
        assert_eq!(ranked, vec![Category::Health, Category::Clothing, Category::Cinema]);
        assert_eq!(summary.ranked_payers()[0].payer, MemberId(2));
    }

    #[test]
    fn test_empty_summary() {
        let summary = CategorySummarizer.summarize(&[]).unwrap();

        assert!(summary.is_empty());
        assert!(summary.category_totals.is_empty());
        assert!(summary.payer_totals.is_empty());
        assert_eq!(summary.grand_total, BigDecimal::from(0));
        assert_eq!(percentage_of(&dec("10"), &summary.grand_total), BigDecimal::from(0));
    }

    #[test]
    fn test_rejects_non_positive_amount() {
        let result = CategorySummarizer.summarize(&[expense("0", 1, Category::Other, 1)]);
        assert!(matches!(result, Err(LedgerError::InvalidExpense(_))));
    }

    #[test]
    fn test_rejects_sub_cent_amounts() {
        // Rounded separately these would total 0.00 by category but 0.01 overall
        let result = CategorySummarizer.summarize(&[
            expense("0.005", 1, Category::Taxi, 2),
            expense("0.005", 2, Category::Fuel, 3),
        ]);
        assert!(matches!(result, Err(LedgerError::InvalidExpense(_))));

        let trailing_zeros = CategorySummarizer
            .summarize(&[expense("12.500", 1, Category::Taxi, 2)])
            .unwrap();
        assert_eq!(trailing_zeros.grand_total, dec("12.5"));
    }

    #[test]
    fn test_percentage_rounding() {
        assert_eq!(percentage_of(&dec("1"), &dec("3")), dec("33.33"));
        assert_eq!(percentage_of(&dec("2"), &dec("3")), dec("66.67"));
    }
}
