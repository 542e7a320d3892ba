//! Installment expansion and grouping for recurring expenses.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::{
    core::errors::{FinanceError, Result},
    domain::{
        book::Book,
        common::shift_month,
        transaction::{Category, Installment, Transaction, TransactionKind, TransactionStatus},
    },
};

/// One user submission describing a recurring expense.
#[derive(Debug, Clone)]
pub struct RecurringExpense {
    pub description: String,
    pub amount: Decimal,
    pub category: Category,
    pub date: NaiveDate,
    pub first_due_date: NaiveDate,
    pub installments: u32,
}

/// Expansion and grouping of installment series.
pub struct RecurringService;

impl RecurringService {
    /// Expands one submission into its dated installments.
    ///
    /// Every installment carries the full stated amount (not a split), a
    /// ` (i/N)` description suffix, and a due date advanced `i - 1` calendar
    /// months from `first_due_date`. All share one freshly generated group id.
    pub fn expand(submission: &RecurringExpense, today: NaiveDate) -> Result<Vec<Transaction>> {
        if submission.installments < 2 {
            return Err(FinanceError::InvalidInput(format!(
                "a recurring expense needs at least 2 installments, got {}",
                submission.installments
            )));
        }
        if submission.description.trim().is_empty() {
            return Err(FinanceError::InvalidInput(
                "description must not be empty".into(),
            ));
        }
        if submission.amount <= Decimal::ZERO {
            return Err(FinanceError::InvalidInput("amount must be positive".into()));
        }

        let group_id = Uuid::new_v4();
        let count = submission.installments;
        let mut installments = Vec::with_capacity(count as usize);
        for index in 1..=count {
            let position = Installment { index, count };
            let due_date = shift_month(submission.first_due_date, index as i32 - 1);
            let mut transaction = Transaction::new(
                format!("{}{}", submission.description, position.suffix()),
                submission.amount,
                TransactionKind::Expense,
                submission.category,
                submission.date,
                Some(due_date),
                today,
            );
            transaction.recurring_group_id = Some(group_id);
            transaction.installment = Some(position);
            installments.push(transaction);
        }
        Ok(installments)
    }

    /// Expands and records a submission as one indivisible batch, returning
    /// the new ids in installment order.
    pub fn submit(
        book: &mut Book,
        submission: &RecurringExpense,
        today: NaiveDate,
    ) -> Result<Vec<Uuid>> {
        let installments = Self::expand(submission, today)?;
        Ok(installments
            .into_iter()
            .map(|transaction| book.add_transaction(transaction))
            .collect())
    }

    /// Partitions the collection into standalone rows and recurring groups,
    /// then orders the merged listing by nominal date, newest first.
    /// Installments inside each group are sorted by due date.
    pub fn entries(transactions: &[Transaction]) -> Vec<BookEntry> {
        let mut singles: Vec<Transaction> = Vec::new();
        let mut groups: Vec<InstallmentGroup> = Vec::new();
        for transaction in transactions {
            match transaction.recurring_group_id {
                None => singles.push(transaction.clone()),
                Some(group_id) => {
                    match groups.iter_mut().find(|group| group.group_id == group_id) {
                        Some(group) => group.installments.push(transaction.clone()),
                        None => groups.push(InstallmentGroup {
                            group_id,
                            installments: vec![transaction.clone()],
                        }),
                    }
                }
            }
        }
        for group in &mut groups {
            group.installments.sort_by_key(|t| t.due_date);
        }

        let mut entries: Vec<BookEntry> = singles.into_iter().map(BookEntry::Single).collect();
        entries.extend(groups.into_iter().map(BookEntry::Group));
        entries.sort_by(|a, b| b.date().cmp(&a.date()));
        entries
    }
}

/// A row in the combined transaction listing: either a standalone transaction
/// or a collapsed recurring group.
#[derive(Debug, Clone)]
pub enum BookEntry {
    Single(Transaction),
    Group(InstallmentGroup),
}

impl BookEntry {
    /// Nominal date used to order the merged listing.
    pub fn date(&self) -> NaiveDate {
        match self {
            BookEntry::Single(transaction) => transaction.date,
            BookEntry::Group(group) => group.earliest_date(),
        }
    }
}

/// All installments sharing one recurring group id, due-date ascending.
#[derive(Debug, Clone)]
pub struct InstallmentGroup {
    pub group_id: Uuid,
    pub installments: Vec<Transaction>,
}

impl InstallmentGroup {
    pub fn len(&self) -> usize {
        self.installments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.installments.is_empty()
    }

    fn earliest_date(&self) -> NaiveDate {
        self.installments
            .first()
            .map(|t| t.date)
            .unwrap_or(NaiveDate::MIN)
    }

    /// Picks the installment shown on the collapsed row: the next `Pending`
    /// one due today or later, else the earliest `Overdue`, else the most
    /// recently `Paid`, else the first installment.
    pub fn representative(&self, today: NaiveDate) -> Option<&Transaction> {
        self.installments
            .iter()
            .find(|t| {
                t.status == TransactionStatus::Pending
                    && t.due_date.map_or(false, |due| due >= today)
            })
            .or_else(|| {
                self.installments
                    .iter()
                    .find(|t| t.status == TransactionStatus::Overdue)
            })
            .or_else(|| {
                self.installments
                    .iter()
                    .rev()
                    .find(|t| t.status == TransactionStatus::Paid)
            })
            .or_else(|| self.installments.first())
    }

    /// Collapsed description: the base text plus an `(Nx)` badge for groups
    /// with more than one installment.
    pub fn collapsed_label(&self) -> String {
        let base = self
            .installments
            .first()
            .map(|t| t.base_description())
            .unwrap_or_default();
        if self.installments.len() > 1 {
            format!("{} ({}x)", base, self.installments.len())
        } else {
            base
        }
    }
}
