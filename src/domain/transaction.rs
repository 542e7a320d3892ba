//! Domain model for income/expense transactions and their status lifecycle.

use std::fmt;

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    core::errors::{FinanceError, Result},
    domain::common::{Displayable, Identifiable},
};

/// Matches the legacy ` (i/N)` installment suffix on imported descriptions.
static INSTALLMENT_SUFFIX: Lazy<Regex> = Lazy::new(|| Regex::new(r" \(\d+/\d+\)$").unwrap());

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
/// Distinguishes money coming in from money going out.
pub enum TransactionKind {
    Income,
    Expense,
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            TransactionKind::Income => "Income",
            TransactionKind::Expense => "Expense",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
/// Closed set of spending/earning categories.
pub enum Category {
    Housing,
    Transport,
    Food,
    Health,
    Leisure,
    Education,
    Investments,
    Salary,
    Debts,
    Other,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Category::Housing => "Housing",
            Category::Transport => "Transport",
            Category::Food => "Food",
            Category::Health => "Health",
            Category::Leisure => "Leisure",
            Category::Education => "Education",
            Category::Investments => "Investments",
            Category::Salary => "Salary",
            Category::Debts => "Debts",
            Category::Other => "Other",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
/// Enumerates the lifecycle state of a transaction.
///
/// Income settles immediately; an expense without a due date settles on
/// creation as well. Only expenses with a due date move through
/// `Pending`/`Overdue`/`Paid`.
pub enum TransactionStatus {
    Paid,
    Pending,
    Overdue,
    IncomeSettled,
    ExpenseSettled,
}

impl TransactionStatus {
    /// Status assigned when a transaction is first recorded.
    ///
    /// An expense due exactly today is `Pending`, not `Overdue`.
    pub fn on_creation(
        kind: TransactionKind,
        due_date: Option<NaiveDate>,
        today: NaiveDate,
    ) -> Self {
        match kind {
            TransactionKind::Income => TransactionStatus::IncomeSettled,
            TransactionKind::Expense => match due_date {
                None => TransactionStatus::ExpenseSettled,
                Some(due) if due < today => TransactionStatus::Overdue,
                Some(_) => TransactionStatus::Pending,
            },
        }
    }

    /// True for statuses that can still be marked paid.
    pub fn is_payable(self) -> bool {
        matches!(self, TransactionStatus::Pending | TransactionStatus::Overdue)
    }
}

impl fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            TransactionStatus::Paid => "Paid",
            TransactionStatus::Pending => "Pending",
            TransactionStatus::Overdue => "Overdue",
            TransactionStatus::IncomeSettled => "Income",
            TransactionStatus::ExpenseSettled => "Expense",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
/// Position of an installment within its recurring group.
pub struct Installment {
    pub index: u32,
    pub count: u32,
}

impl Installment {
    /// The ` (i/N)` suffix appended to installment descriptions.
    pub fn suffix(&self) -> String {
        format!(" ({}/{})", self.index, self.count)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
/// A single recorded income or expense.
pub struct Transaction {
    pub id: Uuid,
    pub description: String,
    pub amount: Decimal,
    pub kind: TransactionKind,
    pub category: Category,
    pub date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recurring_group_id: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub installment: Option<Installment>,
    pub status: TransactionStatus,
}

impl Transaction {
    pub fn new(
        description: impl Into<String>,
        amount: Decimal,
        kind: TransactionKind,
        category: Category,
        date: NaiveDate,
        due_date: Option<NaiveDate>,
        today: NaiveDate,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            description: description.into(),
            amount,
            kind,
            category,
            date,
            due_date,
            recurring_group_id: None,
            installment: None,
            status: TransactionStatus::on_creation(kind, due_date, today),
        }
    }

    /// The status this transaction should display relative to `today`.
    ///
    /// A `Pending` expense whose due date has passed reads as `Overdue`; every
    /// other status is returned unchanged.
    pub fn normalized_status(&self, today: NaiveDate) -> TransactionStatus {
        match self.status {
            TransactionStatus::Pending
                if self.due_date.map_or(false, |due| due < today) =>
            {
                TransactionStatus::Overdue
            }
            status => status,
        }
    }

    /// Applies the read-pass recompute in place; returns whether it changed.
    pub fn refresh_status(&mut self, today: NaiveDate) -> bool {
        let normalized = self.normalized_status(today);
        if normalized != self.status {
            self.status = normalized;
            true
        } else {
            false
        }
    }

    /// Settles a payable expense. Re-marking a `Paid` transaction is a no-op;
    /// settled income/expense rows reject the operation.
    pub fn mark_paid(&mut self) -> Result<()> {
        if self.status.is_payable() {
            self.status = TransactionStatus::Paid;
            Ok(())
        } else if self.status == TransactionStatus::Paid {
            Ok(())
        } else {
            Err(FinanceError::InvalidOperation(format!(
                "transaction {} has no payment to settle",
                self.id
            )))
        }
    }

    /// Date used for monthly expense bucketing: the due date when present,
    /// otherwise the nominal date.
    pub fn reference_date(&self) -> NaiveDate {
        self.due_date.unwrap_or(self.date)
    }

    pub fn is_recurring(&self) -> bool {
        self.recurring_group_id.is_some()
    }

    /// The description without its installment suffix.
    ///
    /// Rows created by this crate carry an explicit [`Installment`] pair and
    /// strip exactly. Recurring rows from legacy exports only encode the
    /// position in the text, so those fall back to a suffix pattern match.
    pub fn base_description(&self) -> String {
        if let Some(installment) = self.installment {
            if let Some(stripped) = self.description.strip_suffix(&installment.suffix()) {
                return stripped.to_string();
            }
        }
        if self.is_recurring() {
            return INSTALLMENT_SUFFIX.replace(&self.description, "").into_owned();
        }
        self.description.clone()
    }
}

impl Identifiable for Transaction {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl Displayable for Transaction {
    fn display_label(&self) -> String {
        format!("txn:{} [{}]", self.id, self.status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn expense(due_date: Option<NaiveDate>, today: NaiveDate) -> Transaction {
        Transaction::new(
            "Internet",
            Decimal::new(8990, 2),
            TransactionKind::Expense,
            Category::Housing,
            today,
            due_date,
            today,
        )
    }

    #[test]
    fn income_settles_on_creation() {
        let today = date(2024, 3, 1);
        let txn = Transaction::new(
            "Paycheck",
            Decimal::from(3200),
            TransactionKind::Income,
            Category::Salary,
            today,
            None,
            today,
        );
        assert_eq!(txn.status, TransactionStatus::IncomeSettled);
    }

    #[test]
    fn expense_status_follows_due_date() {
        let today = date(2024, 3, 10);
        assert_eq!(expense(None, today).status, TransactionStatus::ExpenseSettled);
        assert_eq!(
            expense(Some(date(2024, 3, 9)), today).status,
            TransactionStatus::Overdue
        );
        assert_eq!(
            expense(Some(date(2024, 3, 10)), today).status,
            TransactionStatus::Pending,
            "due exactly today stays pending"
        );
        assert_eq!(
            expense(Some(date(2024, 3, 11)), today).status,
            TransactionStatus::Pending
        );
    }

    #[test]
    fn pending_normalizes_to_overdue_once_due_passes() {
        let created = date(2024, 3, 1);
        let mut txn = expense(Some(date(2024, 3, 5)), created);
        assert_eq!(txn.normalized_status(created), TransactionStatus::Pending);
        assert_eq!(
            txn.normalized_status(date(2024, 3, 6)),
            TransactionStatus::Overdue
        );
        assert!(txn.refresh_status(date(2024, 3, 6)));
        assert_eq!(txn.status, TransactionStatus::Overdue);
        assert!(!txn.refresh_status(date(2024, 3, 7)));
    }

    #[test]
    fn paid_never_reverts_on_normalize() {
        let created = date(2024, 3, 1);
        let mut txn = expense(Some(date(2024, 3, 5)), created);
        txn.mark_paid().unwrap();
        assert_eq!(txn.normalized_status(date(2024, 4, 1)), TransactionStatus::Paid);
    }

    #[test]
    fn mark_paid_is_idempotent_and_guards_settled_rows() {
        let today = date(2024, 3, 10);
        let mut txn = expense(Some(date(2024, 3, 1)), today);
        txn.mark_paid().unwrap();
        assert_eq!(txn.status, TransactionStatus::Paid);
        txn.mark_paid().unwrap();
        assert_eq!(txn.status, TransactionStatus::Paid);

        let mut settled = expense(None, today);
        assert!(settled.mark_paid().is_err());
    }

    #[test]
    fn base_description_prefers_installment_field() {
        let today = date(2024, 1, 1);
        let mut txn = expense(Some(today), today);
        txn.description = "Rent (2/12)".into();
        txn.recurring_group_id = Some(Uuid::new_v4());
        txn.installment = Some(Installment { index: 2, count: 12 });
        assert_eq!(txn.base_description(), "Rent");
    }

    #[test]
    fn base_description_falls_back_to_legacy_suffix_parse() {
        let today = date(2024, 1, 1);
        let mut txn = expense(Some(today), today);
        txn.description = "Course (3/6)".into();
        txn.recurring_group_id = Some(Uuid::new_v4());
        assert_eq!(txn.base_description(), "Course");

        // A plain transaction keeps parenthesised text untouched.
        let plain = Transaction {
            description: "Dinner (birthday)".into(),
            ..expense(None, today)
        };
        assert_eq!(plain.base_description(), "Dinner (birthday)");
    }
}
