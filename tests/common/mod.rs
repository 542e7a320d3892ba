#![allow(dead_code)]

use std::sync::Mutex;

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use finance_core::{
    core::clock::Clock,
    core::services::{NewInvestment, NewTransaction, RecurringExpense},
    domain::{Category, InvestmentKind, TransactionKind},
    storage::JsonStorage,
};
use once_cell::sync::Lazy;
use rust_decimal::Decimal;
use tempfile::TempDir;

/// Holds TempDir guards so temporary folders live for the duration of the run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

/// Creates an isolated JSON backend backed by a unique directory.
pub fn setup_storage() -> (JsonStorage, std::path::PathBuf) {
    let temp = TempDir::new().expect("create temp dir");
    let base = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);

    let storage = JsonStorage::with_retention(base.join("books"), base.join("backups"), 3)
        .expect("create json storage backend");
    (storage, base)
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn dec(value: &str) -> Decimal {
    value.parse().expect("decimal literal")
}

pub fn new_expense(
    description: &str,
    amount: i64,
    day: NaiveDate,
    due_date: Option<NaiveDate>,
) -> NewTransaction {
    NewTransaction {
        description: description.into(),
        amount: Decimal::from(amount),
        kind: TransactionKind::Expense,
        category: Category::Other,
        date: day,
        due_date,
    }
}

pub fn new_income(description: &str, amount: i64, day: NaiveDate) -> NewTransaction {
    NewTransaction {
        description: description.into(),
        amount: Decimal::from(amount),
        kind: TransactionKind::Income,
        category: Category::Salary,
        date: day,
        due_date: None,
    }
}

pub fn new_investment(name: &str, initial: i64, current: i64) -> NewInvestment {
    NewInvestment {
        name: name.into(),
        kind: InvestmentKind::Stocks,
        initial_value: Decimal::from(initial),
        current_value: Decimal::from(current),
        purchase_date: date(2023, 6, 1),
    }
}

pub fn recurring(description: &str, amount: i64, first_due: NaiveDate, count: u32) -> RecurringExpense {
    RecurringExpense {
        description: description.into(),
        amount: Decimal::from(amount),
        category: Category::Debts,
        date: first_due,
        first_due_date: first_due,
        installments: count,
    }
}

/// Clock pinned to one calendar day for deterministic assertions.
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        Utc.from_utc_datetime(&self.0.and_hms_opt(12, 0, 0).unwrap())
    }

    fn today(&self) -> NaiveDate {
        self.0
    }
}
