//! Creation, mutation, and status maintenance for transactions.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::debug;
use uuid::Uuid;

use crate::{
    core::errors::{FinanceError, Result},
    domain::{
        book::Book,
        common::Displayable,
        transaction::{Category, Transaction, TransactionKind, TransactionStatus},
    },
};

/// Fields supplied by the caller when recording a new transaction.
#[derive(Debug, Clone)]
pub struct NewTransaction {
    pub description: String,
    pub amount: Decimal,
    pub kind: TransactionKind,
    pub category: Category,
    pub date: NaiveDate,
    pub due_date: Option<NaiveDate>,
}

/// Partial update for a single transaction. `None` leaves a field untouched;
/// the nested option on `due_date` sets or clears it explicitly.
#[derive(Debug, Clone, Default)]
pub struct TransactionPatch {
    pub description: Option<String>,
    pub amount: Option<Decimal>,
    pub kind: Option<TransactionKind>,
    pub category: Option<Category>,
    pub date: Option<NaiveDate>,
    pub due_date: Option<Option<NaiveDate>>,
}

impl TransactionPatch {
    pub fn has_effect(&self) -> bool {
        self.description.is_some()
            || self.amount.is_some()
            || self.kind.is_some()
            || self.category.is_some()
            || self.date.is_some()
            || self.due_date.is_some()
    }
}

/// Lifecycle operations over the transaction collection of a [`Book`].
pub struct TransactionService;

impl TransactionService {
    /// Validates and records one transaction, deriving its initial status.
    pub fn create(book: &mut Book, new: NewTransaction, today: NaiveDate) -> Result<Uuid> {
        Self::validate(&new)?;
        let transaction = Transaction::new(
            new.description,
            new.amount,
            new.kind,
            new.category,
            new.date,
            new.due_date,
            today,
        );
        Ok(book.add_transaction(transaction))
    }

    /// Applies a field patch. Status is re-derived when the kind or due date
    /// changes, unless the row is already `Paid` (terminal).
    pub fn update(
        book: &mut Book,
        id: Uuid,
        patch: TransactionPatch,
        today: NaiveDate,
    ) -> Result<()> {
        if !patch.has_effect() {
            return Ok(());
        }
        if let Some(description) = &patch.description {
            if description.trim().is_empty() {
                return Err(FinanceError::InvalidInput(
                    "description must not be empty".into(),
                ));
            }
        }
        if let Some(amount) = patch.amount {
            if amount <= Decimal::ZERO {
                return Err(FinanceError::InvalidInput("amount must be positive".into()));
            }
        }
        let transaction = book
            .transaction_mut(id)
            .ok_or(FinanceError::TransactionNotFound(id))?;

        let kind = patch.kind.unwrap_or(transaction.kind);
        let due_date = patch.due_date.unwrap_or(transaction.due_date);
        if kind == TransactionKind::Income && due_date.is_some() {
            return Err(FinanceError::InvalidInput(
                "income does not carry a due date".into(),
            ));
        }
        let reclassified = kind != transaction.kind || due_date != transaction.due_date;

        if let Some(description) = patch.description {
            transaction.description = description;
        }
        if let Some(amount) = patch.amount {
            transaction.amount = amount;
        }
        if let Some(category) = patch.category {
            transaction.category = category;
        }
        if let Some(date) = patch.date {
            transaction.date = date;
        }
        transaction.kind = kind;
        transaction.due_date = due_date;
        if reclassified && transaction.status != TransactionStatus::Paid {
            transaction.status = TransactionStatus::on_creation(kind, due_date, today);
        }
        Ok(())
    }

    pub fn remove(book: &mut Book, id: Uuid) -> Result<()> {
        if book.remove_transaction(id) {
            Ok(())
        } else {
            Err(FinanceError::TransactionNotFound(id))
        }
    }

    /// Deletes every installment sharing `group_id`; returns how many rows
    /// went away. An unknown group removes nothing.
    pub fn remove_group(book: &mut Book, group_id: Uuid) -> usize {
        let removed = book.remove_group(group_id);
        if removed > 0 {
            debug!(%group_id, removed, "deleted recurring group");
        }
        removed
    }

    /// Adds a positive top-up to one installment without touching its
    /// siblings. Returns the new amount.
    pub fn add_amount(book: &mut Book, id: Uuid, delta: Decimal) -> Result<Decimal> {
        if delta <= Decimal::ZERO {
            return Err(FinanceError::InvalidInput(
                "adjustment must be positive".into(),
            ));
        }
        let transaction = book
            .transaction_mut(id)
            .ok_or(FinanceError::TransactionNotFound(id))?;
        transaction.amount += delta;
        Ok(transaction.amount)
    }

    /// Settles a payable transaction; re-marking `Paid` is a no-op.
    pub fn mark_paid(book: &mut Book, id: Uuid) -> Result<()> {
        let transaction = book
            .transaction_mut(id)
            .ok_or(FinanceError::TransactionNotFound(id))?;
        transaction.mark_paid()?;
        debug!("marked paid: {}", transaction.display_label());
        Ok(())
    }

    /// Gateway-facing status override; enforces kind/status coherence.
    pub fn set_status(book: &mut Book, id: Uuid, status: TransactionStatus) -> Result<()> {
        let transaction = book
            .transaction_mut(id)
            .ok_or(FinanceError::TransactionNotFound(id))?;
        let allowed = match transaction.kind {
            TransactionKind::Income => status == TransactionStatus::IncomeSettled,
            TransactionKind::Expense => status != TransactionStatus::IncomeSettled,
        };
        if !allowed {
            return Err(FinanceError::InvalidOperation(format!(
                "status {} is not valid for a {} transaction",
                status, transaction.kind
            )));
        }
        transaction.status = status;
        Ok(())
    }

    /// Eager pending-to-overdue sweep over the whole book; returns the number
    /// of rows that changed. Callers that persist afterwards get the
    /// recompute-on-write variant of the status engine.
    pub fn refresh_statuses(book: &mut Book, today: NaiveDate) -> usize {
        let mut changed = 0;
        for transaction in &mut book.transactions {
            if transaction.refresh_status(today) {
                changed += 1;
            }
        }
        if changed > 0 {
            debug!(changed, "transactions rolled over to overdue");
        }
        changed
    }

    /// Lazy read pass: a copy of the collection with statuses recomputed
    /// against `today`, newest nominal date first.
    pub fn normalized(transactions: &[Transaction], today: NaiveDate) -> Vec<Transaction> {
        let mut listed: Vec<Transaction> = transactions
            .iter()
            .map(|transaction| {
                let mut copy = transaction.clone();
                copy.refresh_status(today);
                copy
            })
            .collect();
        listed.sort_by(|a, b| b.date.cmp(&a.date));
        listed
    }

    fn validate(new: &NewTransaction) -> Result<()> {
        if new.description.trim().is_empty() {
            return Err(FinanceError::InvalidInput(
                "description must not be empty".into(),
            ));
        }
        if new.amount <= Decimal::ZERO {
            return Err(FinanceError::InvalidInput("amount must be positive".into()));
        }
        if new.kind == TransactionKind::Income && new.due_date.is_some() {
            return Err(FinanceError::InvalidInput(
                "income does not carry a due date".into(),
            ));
        }
        Ok(())
    }
}
