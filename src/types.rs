//! Core types and data structures for the household ledger

use bigdecimal::{BigDecimal, RoundingMode};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::category::Category;

/// Number of decimal places money is reported at
pub const CURRENCY_SCALE: i64 = 2;

/// Round an amount to currency scale.
///
/// Half-even, so `round_currency(0.125) == 0.12` and `round_currency(0.135) == 0.14`.
pub fn round_currency(amount: &BigDecimal) -> BigDecimal {
    amount.with_scale_round(CURRENCY_SCALE, RoundingMode::HalfEven)
}

/// The smallest representable currency unit (0.01)
pub fn currency_unit() -> BigDecimal {
    BigDecimal::new(1.into(), CURRENCY_SCALE)
}

/// Identifier of a household member
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MemberId(pub u64);

impl fmt::Display for MemberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a household (the unit expenses are shared within)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HouseholdId(pub u64);

impl fmt::Display for HouseholdId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A household member as known to the data store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub id: MemberId,
    /// Display name, only used by the presentation layer
    pub name: String,
}

impl Member {
    pub fn new(id: MemberId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// A household and its optional monthly spending budget
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Household {
    pub id: HouseholdId,
    pub name: String,
    pub monthly_budget: Option<BigDecimal>,
}

/// A single shared expense. Immutable once recorded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseRecord {
    /// Unique identifier for the expense
    pub id: Uuid,
    /// Amount paid, positive, at currency scale
    pub amount: BigDecimal,
    /// Member who paid
    pub paid_by: MemberId,
    /// Members who share the cost equally (may or may not include the payer)
    pub shared_with: Vec<MemberId>,
    /// Spending category
    pub category: Category,
    /// Date the expense happened
    pub occurred_at: NaiveDate,
    /// Free-form note
    pub description: Option<String>,
}

impl ExpenseRecord {
    /// Create a new expense with a fresh id and no description
    pub fn new(
        amount: BigDecimal,
        paid_by: MemberId,
        shared_with: Vec<MemberId>,
        category: Category,
        occurred_at: NaiveDate,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            amount,
            paid_by,
            shared_with,
            category,
            occurred_at,
            description: None,
        }
    }

    /// Members involved in this expense: the payer first, then everyone sharing it
    pub fn participants(&self) -> impl Iterator<Item = MemberId> + '_ {
        std::iter::once(self.paid_by).chain(self.shared_with.iter().copied())
    }

    /// The equal share each `shared_with` member owes, at full precision.
    /// `None` when nobody shares the expense.
    pub fn share(&self) -> Option<BigDecimal> {
        if self.shared_with.is_empty() {
            None
        } else {
            Some(&self.amount / BigDecimal::from(self.shared_with.len() as u64))
        }
    }
}

/// Credit, owed share, and net position of one member over a period
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemberBalance {
    pub member: MemberId,
    /// Total this member paid
    pub credit: BigDecimal,
    /// Total share this member is responsible for
    pub owed: BigDecimal,
    /// `credit - owed`; positive means others owe this member
    pub net: BigDecimal,
}

impl MemberBalance {
    pub fn is_creditor(&self) -> bool {
        self.net > BigDecimal::from(0)
    }

    pub fn is_debtor(&self) -> bool {
        self.net < BigDecimal::from(0)
    }

    pub fn is_settled(&self) -> bool {
        self.net == BigDecimal::from(0)
    }
}

/// A payment instruction: `debtor` pays `amount` to `creditor`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transfer {
    pub debtor: MemberId,
    pub creditor: MemberId,
    pub amount: BigDecimal,
}

impl fmt::Display for Transfer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} pays {} to {}",
            self.debtor,
            round_currency(&self.amount),
            self.creditor
        )
    }
}

/// Errors that can occur in the ledger system
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    #[error("Storage error: {0}")]
    Storage(String),
    #[error("Invalid expense: {0}")]
    InvalidExpense(String),
    #[error("Unknown category: {0}")]
    UnknownCategory(String),
    #[error("Invalid period: {0}")]
    InvalidPeriod(String),
    #[error("Household not found: {0}")]
    HouseholdNotFound(HouseholdId),
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type for ledger operations
pub type LedgerResult<T> = Result<T, LedgerError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> BigDecimal {
        BigDecimal::from_str(s).unwrap()
    }

    #[test]
    fn test_round_currency_half_even() {
        assert_eq!(round_currency(&dec("0.125")), dec("0.12"));
        assert_eq!(round_currency(&dec("0.135")), dec("0.14"));
        assert_eq!(round_currency(&dec("-33.335")), dec("-33.34"));
        assert_eq!(round_currency(&dec("66.6666")), dec("66.67"));
    }

    #[test]
    fn test_share_splits_equally() {
        let expense = ExpenseRecord::new(
            BigDecimal::from(90),
            MemberId(1),
            vec![MemberId(1), MemberId(2), MemberId(3)],
            Category::Groceries,
            NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
        );

        assert_eq!(expense.share(), Some(BigDecimal::from(30)));
        let participants: Vec<_> = expense.participants().collect();
        assert_eq!(
            participants,
            vec![MemberId(1), MemberId(1), MemberId(2), MemberId(3)]
        );
    }

    #[test]
    fn test_share_is_none_without_members() {
        let expense = ExpenseRecord::new(
            BigDecimal::from(10),
            MemberId(1),
            Vec::new(),
            Category::Other,
            NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
        );
        assert!(expense.share().is_none());
    }

    #[test]
    fn test_transfer_display() {
        let transfer = Transfer {
            debtor: MemberId(2),
            creditor: MemberId(1),
            amount: dec("50"),
        };
        assert_eq!(transfer.to_string(), "2 pays 50.00 to 1");
    }
}
