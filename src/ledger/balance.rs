//! Net balance computation over a set of shared expenses

use bigdecimal::BigDecimal;
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::config::{LedgerConfig, MemberOrder};
use crate::traits::*;
use crate::types::*;

/// Per-member balances in a fixed member order
///
/// The order is significant: the settlement solver pairs creditors and
/// debtors in exactly this order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NetBalances {
    balances: Vec<MemberBalance>,
}

impl NetBalances {
    /// Wrap already computed balances, keeping their order
    pub fn new(balances: Vec<MemberBalance>) -> Self {
        Self { balances }
    }

    /// Build balances from bare net amounts. Credit and owed are derived from
    /// the sign of each net.
    pub fn from_nets(nets: impl IntoIterator<Item = (MemberId, BigDecimal)>) -> Self {
        let zero = BigDecimal::from(0);
        let balances = nets
            .into_iter()
            .map(|(member, net)| {
                let net = round_currency(&net);
                let (credit, owed) = if net >= zero {
                    (net.clone(), zero.clone())
                } else {
                    (zero.clone(), net.abs())
                };
                MemberBalance {
                    member,
                    credit,
                    owed,
                    net,
                }
            })
            .collect();
        Self { balances }
    }

    /// Balance of a single member
    pub fn get(&self, member: MemberId) -> Option<&MemberBalance> {
        self.balances.iter().find(|balance| balance.member == member)
    }

    /// Net amount of a single member
    pub fn net(&self, member: MemberId) -> Option<&BigDecimal> {
        self.get(member).map(|balance| &balance.net)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, MemberBalance> {
        self.balances.iter()
    }

    pub fn members(&self) -> impl Iterator<Item = MemberId> + '_ {
        self.balances.iter().map(|balance| balance.member)
    }

    pub fn len(&self) -> usize {
        self.balances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.balances.is_empty()
    }

    /// Sum of all nets. Zero up to one cent per member.
    pub fn total(&self) -> BigDecimal {
        self.balances.iter().map(|balance| &balance.net).sum()
    }

    /// Members with a non-zero net
    pub fn unsettled_count(&self) -> usize {
        self.balances
            .iter()
            .filter(|balance| !balance.is_settled())
            .count()
    }

    /// True when nobody owes anybody
    pub fn is_all_settled(&self) -> bool {
        self.unsettled_count() == 0
    }

    /// Balances ordered from largest creditor to largest debtor
    pub fn ranked(&self) -> Vec<&MemberBalance> {
        let mut ranked: Vec<&MemberBalance> = self.balances.iter().collect();
        ranked.sort_by(|a, b| b.net.cmp(&a.net));
        ranked
    }

    pub fn into_inner(self) -> Vec<MemberBalance> {
        self.balances
    }
}

impl<'a> IntoIterator for &'a NetBalances {
    type Item = &'a MemberBalance;
    type IntoIter = std::slice::Iter<'a, MemberBalance>;

    fn into_iter(self) -> Self::IntoIter {
        self.balances.iter()
    }
}

#[derive(Default)]
struct Accumulator {
    credit: BigDecimal,
    owed: BigDecimal,
}

fn slot<'a>(
    accounts: &'a mut HashMap<MemberId, Accumulator>,
    order: &mut Vec<MemberId>,
    member: MemberId,
) -> &'a mut Accumulator {
    accounts.entry(member).or_insert_with(|| {
        order.push(member);
        Accumulator::default()
    })
}

/// Turns expense records into per-member credit, owed share, and net balance
///
/// Shares are accumulated at full precision; only the final figures are
/// rounded to currency scale, so many small three-way splits do not drift.
pub struct BalanceAggregator {
    member_order: MemberOrder,
    validator: Box<dyn ExpenseValidator>,
}

impl BalanceAggregator {
    /// Create an aggregator using the default validator for `config`
    pub fn new(config: &LedgerConfig) -> Self {
        Self {
            member_order: config.member_order,
            validator: Box::new(DefaultExpenseValidator::new(
                config.allow_unshared_expenses,
            )),
        }
    }

    /// Create an aggregator with a custom validator
    pub fn with_validator(member_order: MemberOrder, validator: Box<dyn ExpenseValidator>) -> Self {
        Self {
            member_order,
            validator,
        }
    }

    /// Compute balances for every member that pays or shares any expense.
    ///
    /// All records are validated before anything is accumulated; one invalid
    /// record fails the whole call.
    pub fn aggregate(&self, expenses: &[ExpenseRecord]) -> LedgerResult<NetBalances> {
        self.validator.validate_all(expenses)?;

        let mut order = Vec::new();
        let mut accounts: HashMap<MemberId, Accumulator> = HashMap::new();

        for expense in expenses {
            slot(&mut accounts, &mut order, expense.paid_by).credit += &expense.amount;

            match expense.share() {
                Some(share) => {
                    for member in &expense.shared_with {
                        slot(&mut accounts, &mut order, *member).owed += &share;
                    }
                }
                // Nobody shares it: the payer covers it alone
                None => slot(&mut accounts, &mut order, expense.paid_by).owed += &expense.amount,
            }
        }

        if self.member_order == MemberOrder::ById {
            order.sort();
        }

        let balances = order
            .into_iter()
            .filter_map(|member| {
                accounts.remove(&member).map(|acc| MemberBalance {
                    member,
                    net: round_currency(&(&acc.credit - &acc.owed)),
                    credit: round_currency(&acc.credit),
                    owed: round_currency(&acc.owed),
                })
            })
            .collect::<Vec<_>>();

        debug!(
            "aggregated {} expenses into {} member balances",
            expenses.len(),
            balances.len()
        );

        Ok(NetBalances::new(balances))
    }
}
