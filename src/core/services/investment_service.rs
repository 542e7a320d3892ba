//! Creation and removal of investment positions.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::{
    core::errors::{FinanceError, Result},
    domain::{
        book::Book,
        investment::{Investment, InvestmentKind},
    },
};

/// Fields supplied by the caller when recording a new position.
#[derive(Debug, Clone)]
pub struct NewInvestment {
    pub name: String,
    pub kind: InvestmentKind,
    pub initial_value: Decimal,
    pub current_value: Decimal,
    pub purchase_date: NaiveDate,
}

pub struct InvestmentService;

impl InvestmentService {
    pub fn create(book: &mut Book, new: NewInvestment) -> Result<Uuid> {
        if new.name.trim().is_empty() {
            return Err(FinanceError::InvalidInput("name must not be empty".into()));
        }
        if new.initial_value <= Decimal::ZERO || new.current_value <= Decimal::ZERO {
            return Err(FinanceError::InvalidInput(
                "investment values must be positive".into(),
            ));
        }
        let investment = Investment::new(
            new.name,
            new.kind,
            new.initial_value,
            new.current_value,
            new.purchase_date,
        );
        Ok(book.add_investment(investment))
    }

    pub fn remove(book: &mut Book, id: Uuid) -> Result<()> {
        if book.remove_investment(id) {
            Ok(())
        } else {
            Err(FinanceError::InvestmentNotFound(id))
        }
    }
}
