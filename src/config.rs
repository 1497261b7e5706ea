//! Ledger configuration

use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};

use crate::types::{LedgerError, LedgerResult};

/// Order members are listed in balances, and therefore the order the
/// settlement solver pairs creditors with debtors.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemberOrder {
    /// Ascending member id. Independent of the order the store returns records in.
    #[default]
    ById,
    /// Order members were first seen in the expense list (payer, then sharers)
    FirstAppearance,
}

/// Tunables for balance computation and reporting
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerConfig {
    /// How members are ordered in balances and settlement
    pub member_order: MemberOrder,
    /// Accept expenses nobody shares, booking them as paid and owed by the payer
    pub allow_unshared_expenses: bool,
    /// Percentage deviation from the average contribution still counted as balanced
    pub contribution_tolerance_pct: BigDecimal,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            member_order: MemberOrder::ById,
            allow_unshared_expenses: false,
            contribution_tolerance_pct: BigDecimal::from(5),
        }
    }
}

impl LedgerConfig {
    /// Load configuration from a JSON document. Missing fields take their defaults.
    pub fn from_json_str(json: &str) -> LedgerResult<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| LedgerError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check that the configured values make sense
    pub fn validate(&self) -> LedgerResult<()> {
        if self.contribution_tolerance_pct < BigDecimal::from(0)
            || self.contribution_tolerance_pct > BigDecimal::from(100)
        {
            return Err(LedgerError::Config(format!(
                "contribution_tolerance_pct must be between 0 and 100, got {}",
                self.contribution_tolerance_pct
            )));
        }
        Ok(())
    }

    pub fn with_member_order(mut self, member_order: MemberOrder) -> Self {
        self.member_order = member_order;
        self
    }

    pub fn with_unshared_expenses(mut self, allow: bool) -> Self {
        self.allow_unshared_expenses = allow;
        self
    }
}
