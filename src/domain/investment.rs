//! Domain model for investment positions.

use std::fmt;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::common::{Displayable, Identifiable};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
/// Asset class of an investment position.
pub enum InvestmentKind {
    Stocks,
    FixedIncome,
    RealEstateFunds,
    Crypto,
    Other,
}

impl fmt::Display for InvestmentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            InvestmentKind::Stocks => "Stocks",
            InvestmentKind::FixedIncome => "Fixed Income",
            InvestmentKind::RealEstateFunds => "Real Estate Funds",
            InvestmentKind::Crypto => "Crypto",
            InvestmentKind::Other => "Other",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
/// A position tracked by its purchase cost and current valuation.
pub struct Investment {
    pub id: Uuid,
    pub name: String,
    pub kind: InvestmentKind,
    pub initial_value: Decimal,
    pub current_value: Decimal,
    pub purchase_date: NaiveDate,
}

impl Investment {
    pub fn new(
        name: impl Into<String>,
        kind: InvestmentKind,
        initial_value: Decimal,
        current_value: Decimal,
        purchase_date: NaiveDate,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            kind,
            initial_value,
            current_value,
            purchase_date,
        }
    }

    pub fn profit(&self) -> Decimal {
        self.current_value - self.initial_value
    }

    /// Profit as a percentage of the initial value; zero when nothing was
    /// invested (imported rows may carry a zero cost basis).
    pub fn profit_percent(&self) -> Decimal {
        if self.initial_value.is_zero() {
            Decimal::ZERO
        } else {
            self.profit() / self.initial_value * Decimal::ONE_HUNDRED
        }
    }
}

impl Identifiable for Investment {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl Displayable for Investment {
    fn display_label(&self) -> String {
        format!("inv:{} [{}]", self.id, self.kind)
    }
}
