//! Greedy debt settlement
//!
//! Creditors and debtors are queued in balance order and matched front to
//! front. Each match settles the smaller of the two remaining amounts, so at
//! least one party leaves the queue per transfer. This is optimal for the
//! common two-person household and close to optimal for small groups; it is
//! not a minimum-transaction solver in general.

use bigdecimal::BigDecimal;
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, VecDeque};

use crate::ledger::NetBalances;
use crate::types::*;

/// Amount a member is left with after all transfers, caused by per-member
/// rounding of the nets. Positive means still owed, negative means still owing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Residue {
    pub member: MemberId,
    pub amount: BigDecimal,
}

/// Result of a settlement run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Settlement {
    /// Payments to make, in the order they were produced
    pub transfers: Vec<Transfer>,
    /// Leftover cents that could not be matched
    pub residue: Vec<Residue>,
}

impl Settlement {
    /// True when no payments are needed
    pub fn is_settled(&self) -> bool {
        self.transfers.is_empty()
    }

    /// Total money moved
    pub fn total_transferred(&self) -> BigDecimal {
        self.transfers.iter().map(|transfer| &transfer.amount).sum()
    }

    /// Transfers a member has to pay
    pub fn payments_by(&self, member: MemberId) -> impl Iterator<Item = &Transfer> + '_ {
        self.transfers
            .iter()
            .filter(move |transfer| transfer.debtor == member)
    }

    /// Transfers a member will receive
    pub fn payments_to(&self, member: MemberId) -> impl Iterator<Item = &Transfer> + '_ {
        self.transfers
            .iter()
            .filter(move |transfer| transfer.creditor == member)
    }
}

/// Settlement calculation service
#[derive(Debug, Clone, Copy, Default)]
pub struct SettlementSolver;

impl SettlementSolver {
    /// Produce the transfers that zero out `balances`
    pub fn solve(&self, balances: &NetBalances) -> Settlement {
        let zero = BigDecimal::from(0);

        let mut creditors: VecDeque<(MemberId, BigDecimal)> = balances
            .iter()
            .filter(|balance| balance.net > zero)
            .map(|balance| (balance.member, balance.net.clone()))
            .collect();
        let mut debtors: VecDeque<(MemberId, BigDecimal)> = balances
            .iter()
            .filter(|balance| balance.net < zero)
            .map(|balance| (balance.member, balance.net.abs()))
            .collect();

        let mut transfers = Vec::new();

        loop {
            let (Some(creditor), Some(debtor)) = (creditors.front_mut(), debtors.front_mut())
            else {
                break;
            };

            let amount = round_currency(&creditor.1.clone().min(debtor.1.clone()));
            creditor.1 = round_currency(&(&creditor.1 - &amount));
            debtor.1 = round_currency(&(&debtor.1 - &amount));

            transfers.push(Transfer {
                debtor: debtor.0,
                creditor: creditor.0,
                amount,
            });

            let creditor_done = creditor.1 == zero;
            let debtor_done = debtor.1 == zero;
            if creditor_done {
                creditors.pop_front();
            }
            if debtor_done {
                debtors.pop_front();
            }
        }

        let residue: Vec<Residue> = creditors
            .into_iter()
            .map(|(member, amount)| Residue { member, amount })
            .chain(debtors.into_iter().map(|(member, amount)| Residue {
                member,
                amount: -amount,
            }))
            .collect();

        debug!(
            "settled {} balances with {} transfers ({} residual)",
            balances.len(),
            transfers.len(),
            residue.len()
        );

        Settlement { transfers, residue }
    }
}

/// Outcome of checking a settlement against the balances it was built from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntegrityReport {
    pub is_valid: bool,
    pub issues: Vec<String>,
    /// Sum of all nets before settlement
    pub net_total: BigDecimal,
    /// Balances left after applying every transfer, non-zero entries only
    pub remaining: Vec<Residue>,
    pub transfer_count: usize,
}

/// Apply every transfer to the balances and check that nothing but rounding
/// residue is left over
pub fn verify(balances: &NetBalances, settlement: &Settlement) -> IntegrityReport {
    let zero = BigDecimal::from(0);
    let mut issues = Vec::new();

    let mut positions: HashMap<MemberId, BigDecimal> = balances
        .iter()
        .map(|balance| (balance.member, balance.net.clone()))
        .collect();

    for transfer in &settlement.transfers {
        if transfer.amount <= zero {
            issues.push(format!("Transfer '{}' has a non-positive amount", transfer));
        }
        match positions.get_mut(&transfer.debtor) {
            Some(net) => *net += &transfer.amount,
            None => issues.push(format!("Unknown debtor {}", transfer.debtor)),
        }
        match positions.get_mut(&transfer.creditor) {
            Some(net) => *net -= &transfer.amount,
            None => issues.push(format!("Unknown creditor {}", transfer.creditor)),
        }
    }

    let tolerance = currency_unit() * BigDecimal::from(balances.len() as u64);
    let net_total = balances.total();
    if net_total.abs() > tolerance {
        issues.push(format!(
            "Net balances sum to {}, more than the rounding tolerance of {}",
            net_total, tolerance
        ));
    }

    let remaining: Vec<Residue> = balances
        .members()
        .filter_map(|member| {
            positions
                .get(&member)
                .filter(|amount| **amount != zero)
                .map(|amount| Residue {
                    member,
                    amount: round_currency(amount),
                })
        })
        .collect();

    for left in &remaining {
        let reported = settlement
            .residue
            .iter()
            .find(|residue| residue.member == left.member);
        if reported.map(|residue| &residue.amount) != Some(&left.amount) {
            issues.push(format!(
                "Member {} is left with {} that the settlement does not report",
                left.member, left.amount
            ));
        }
        if left.amount.abs() > tolerance {
            issues.push(format!(
                "Member {} is left with {}, more than the rounding tolerance",
                left.member, left.amount
            ));
        }
    }

    for reported in &settlement.residue {
        if !remaining.iter().any(|left| left.member == reported.member) {
            issues.push(format!(
                "Settlement reports {} left with member {} who has nothing left over",
                reported.amount, reported.member
            ));
        }
    }

    let transfer_count = settlement.transfers.len();
    let max_transfers = balances.unsettled_count().saturating_sub(1);
    if transfer_count > max_transfers {
        issues.push(format!(
            "{} transfers for {} unsettled members",
            transfer_count,
            balances.unsettled_count()
        ));
    }

    IntegrityReport {
        is_valid: issues.is_empty(),
        issues,
        net_total,
        remaining,
        transfer_count,
    }
}
