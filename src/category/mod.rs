//! Fixed spending category taxonomy
//!
//! Every expense carries one [`Category`] (a sub-category). Sub-categories roll
//! up into a [`MacroCategory`] for grouped reporting, and each one is either a
//! fixed or a variable [`ExpenseType`].

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::types::LedgerError;

/// Whether a category is a recurring commitment or discretionary spending
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpenseType {
    /// Recurring bills (rent, utilities, subscriptions, ...)
    Fixed,
    /// Everything else
    Variable,
}

/// Top-level grouping of sub-categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MacroCategory {
    Housing,
    Food,
    Services,
    Transport,
    Entertainment,
    Health,
    Other,
}

impl MacroCategory {
    pub const ALL: [MacroCategory; 7] = [
        MacroCategory::Housing,
        MacroCategory::Food,
        MacroCategory::Services,
        MacroCategory::Transport,
        MacroCategory::Entertainment,
        MacroCategory::Health,
        MacroCategory::Other,
    ];

    /// Sub-categories belonging to this group
    pub fn categories(&self) -> impl Iterator<Item = Category> + '_ {
        Category::ALL
            .into_iter()
            .filter(move |category| category.macro_category() == *self)
    }
}

/// Spending category of an expense
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Category {
    Rent,
    Maintenance,
    Groceries,
    Delivery,
    Utilities,
    Phone,
    Subscriptions,
    Taxi,
    Fuel,
    CarInsurance,
    CarLoan,
    Restaurants,
    Cinema,
    Clothing,
    Wellness,
    Health,
    Pharmacy,
    Other,
}

impl Category {
    /// All categories in declaration order
    pub const ALL: [Category; 18] = [
        Category::Rent,
        Category::Maintenance,
        Category::Groceries,
        Category::Delivery,
        Category::Utilities,
        Category::Phone,
        Category::Subscriptions,
        Category::Taxi,
        Category::Fuel,
        Category::CarInsurance,
        Category::CarLoan,
        Category::Restaurants,
        Category::Cinema,
        Category::Clothing,
        Category::Wellness,
        Category::Health,
        Category::Pharmacy,
        Category::Other,
    ];

    /// The group this category is reported under
    pub const fn macro_category(&self) -> MacroCategory {
        match self {
            Category::Rent | Category::Maintenance => MacroCategory::Housing,
            Category::Groceries | Category::Delivery => MacroCategory::Food,
            Category::Utilities | Category::Phone | Category::Subscriptions => {
                MacroCategory::Services
            }
            Category::Taxi | Category::Fuel | Category::CarInsurance | Category::CarLoan => {
                MacroCategory::Transport
            }
            Category::Restaurants | Category::Cinema | Category::Clothing | Category::Wellness => {
                MacroCategory::Entertainment
            }
            Category::Health | Category::Pharmacy => MacroCategory::Health,
            Category::Other => MacroCategory::Other,
        }
    }

    /// Fixed or variable spending
    pub const fn expense_type(&self) -> ExpenseType {
        match self {
            Category::Rent
            | Category::Maintenance
            | Category::Utilities
            | Category::Phone
            | Category::Subscriptions
            | Category::CarInsurance
            | Category::CarLoan => ExpenseType::Fixed,
            _ => ExpenseType::Variable,
        }
    }

    /// The value stored in the `category` column of the expenses table
    pub const fn as_str(&self) -> &'static str {
        match self {
            Category::Rent => "Alquiler",
            Category::Maintenance => "Mantenimiento",
            Category::Groceries => "Supermercado",
            Category::Delivery => "Delivery",
            Category::Utilities => "Luz y agua",
            Category::Phone => "Telefono",
            Category::Subscriptions => "Suscripciones",
            Category::Taxi => "Taxi",
            Category::Fuel => "Gasolina",
            Category::CarInsurance => "Seguro auto",
            Category::CarLoan => "Credito auto",
            Category::Restaurants => "Restaurante",
            Category::Cinema => "Cine",
            Category::Clothing => "Ropa",
            Category::Wellness => "Bienestar",
            Category::Health => "Salud",
            Category::Pharmacy => "Farmacia",
            Category::Other => "Otros",
        }
    }

    /// snake_case identifier
    pub const fn key(&self) -> &'static str {
        match self {
            Category::Rent => "rent",
            Category::Maintenance => "maintenance",
            Category::Groceries => "groceries",
            Category::Delivery => "delivery",
            Category::Utilities => "utilities",
            Category::Phone => "phone",
            Category::Subscriptions => "subscriptions",
            Category::Taxi => "taxi",
            Category::Fuel => "fuel",
            Category::CarInsurance => "car_insurance",
            Category::CarLoan => "car_loan",
            Category::Restaurants => "restaurants",
            Category::Cinema => "cinema",
            Category::Clothing => "clothing",
            Category::Wellness => "wellness",
            Category::Health => "health",
            Category::Pharmacy => "pharmacy",
            Category::Other => "other",
        }
    }

    /// Parse any stored category name, falling back to [`Category::Other`]
    pub fn normalize(raw: &str) -> Category {
        raw.parse().unwrap_or(Category::Other)
    }

    /// Names written by older versions of the app before the category hierarchy
    fn from_legacy(raw: &str) -> Option<Category> {
        match raw {
            "Servicios" => Some(Category::Utilities),
            "Transporte" => Some(Category::Taxi),
            "Entretenimiento" => Some(Category::Cinema),
            _ => None,
        }
    }
}

impl FromStr for Category {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Category::ALL
            .into_iter()
            .find(|category| category.as_str() == trimmed || category.key() == trimmed)
            .or_else(|| Category::from_legacy(trimmed))
            .ok_or_else(|| LedgerError::UnknownCategory(s.to_string()))
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl Serialize for Category {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Category {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
