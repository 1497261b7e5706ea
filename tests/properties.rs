//! Property tests for balances, settlement, and summaries

use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use household_ledger::{
    currency_unit, settlement, BalanceAggregator, Category, CategorySummarizer, ExpenseRecord,
    LedgerConfig, MemberId, SettlementSolver,
};
use proptest::prelude::*;

fn expense() -> impl Strategy<Value = ExpenseRecord> {
    let members: Vec<MemberId> = (1..=5).map(MemberId).collect();
    (
        1i64..=500_000,
        prop::sample::select(members.clone()),
        prop::sample::subsequence(members, 1..=5),
        prop::sample::select(Category::ALL.to_vec()),
        1u32..=28,
    )
        .prop_map(|(cents, paid_by, shared_with, category, day)| {
            ExpenseRecord::new(
                BigDecimal::new(cents.into(), 2),
                paid_by,
                shared_with,
                category,
                NaiveDate::from_ymd_opt(2024, 3, day).unwrap(),
            )
        })
}

fn expenses() -> impl Strategy<Value = Vec<ExpenseRecord>> {
    prop::collection::vec(expense(), 0..40)
}

fn aggregator() -> BalanceAggregator {
    BalanceAggregator::new(&LedgerConfig::default())
}

proptest! {
    #[test]
    fn nets_sum_to_zero_within_a_cent_per_member(expenses in expenses()) {
        let balances = aggregator().aggregate(&expenses).unwrap();
        let tolerance = currency_unit() * BigDecimal::from(balances.len() as u64);
        prop_assert!(balances.total().abs() <= tolerance);
    }

    #[test]
    fn settlement_clears_everything_but_residue(expenses in expenses()) {
        let balances = aggregator().aggregate(&expenses).unwrap();
        let settlement = SettlementSolver.solve(&balances);

        let report = settlement::verify(&balances, &settlement);
        prop_assert!(report.is_valid, "{:?}", report.issues);
        prop_assert_eq!(&report.remaining, &settlement.residue);

        if balances.total() == BigDecimal::from(0) {
            prop_assert!(settlement.residue.is_empty());
        }
    }

    #[test]
    fn transfer_count_is_bounded(expenses in expenses()) {
        let balances = aggregator().aggregate(&expenses).unwrap();
        let settlement = SettlementSolver.solve(&balances);

        let bound = balances.unsettled_count().saturating_sub(1);
        prop_assert!(settlement.transfers.len() <= bound);
        prop_assert!(settlement
            .transfers
            .iter()
            .all(|transfer| transfer.amount > BigDecimal::from(0)
                && transfer.debtor != transfer.creditor));
    }

    #[test]
    fn computation_is_deterministic(expenses in expenses()) {
        let aggregator = aggregator();
        let first = aggregator.aggregate(&expenses).unwrap();
        let second = aggregator.aggregate(&expenses).unwrap();
        prop_assert_eq!(&first, &second);
        prop_assert_eq!(SettlementSolver.solve(&first), SettlementSolver.solve(&second));
    }

    #[test]
    fn member_order_by_id_ignores_record_order(expenses in expenses()) {
        let mut reversed = expenses.clone();
        reversed.reverse();

        let forward = aggregator().aggregate(&expenses).unwrap();
        let backward = aggregator().aggregate(&reversed).unwrap();
        prop_assert_eq!(&forward, &backward);

        let ids: Vec<MemberId> = forward.members().collect();
        let mut sorted = ids.clone();
        sorted.sort();
        prop_assert_eq!(ids, sorted);
    }

    #[test]
    fn summary_totals_agree(expenses in expenses()) {
        let summary = CategorySummarizer.summarize(&expenses).unwrap();

        let by_category: BigDecimal = summary.category_totals.iter().map(|t| &t.amount).sum();
        let by_macro: BigDecimal = summary.macro_totals.iter().map(|t| &t.amount).sum();
        let by_payer: BigDecimal = summary.payer_totals.iter().map(|t| &t.amount).sum();
        let by_week: BigDecimal = summary.weekly_totals.iter().sum();

        prop_assert_eq!(&by_category, &summary.grand_total);
        prop_assert_eq!(&by_macro, &summary.grand_total);
        prop_assert_eq!(&by_payer, &summary.grand_total);
        prop_assert_eq!(&by_week, &summary.grand_total);
        prop_assert_eq!(&(&summary.fixed_total + &summary.variable_total), &summary.grand_total);
        prop_assert_eq!(summary.expense_count, expenses.len());
    }
}
