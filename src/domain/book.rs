//! The in-memory snapshot holding both persisted collections.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{common::Identifiable, investment::Investment, transaction::Transaction};

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
/// Everything the tracker persists for one user: transactions plus
/// investments. Serializes as the bulk-interchange document
/// `{ "transactions": [...], "investments": [...] }`.
pub struct Book {
    pub transactions: Vec<Transaction>,
    pub investments: Vec<Investment>,
}

impl Book {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty() && self.investments.is_empty()
    }

    pub fn transaction(&self, id: Uuid) -> Option<&Transaction> {
        find(&self.transactions, id)
    }

    pub fn transaction_mut(&mut self, id: Uuid) -> Option<&mut Transaction> {
        find_mut(&mut self.transactions, id)
    }

    pub fn investment(&self, id: Uuid) -> Option<&Investment> {
        find(&self.investments, id)
    }

    pub fn add_transaction(&mut self, transaction: Transaction) -> Uuid {
        let id = transaction.id;
        self.transactions.push(transaction);
        id
    }

    pub fn add_investment(&mut self, investment: Investment) -> Uuid {
        let id = investment.id;
        self.investments.push(investment);
        id
    }

    /// Removes one transaction; false when the id is unknown.
    pub fn remove_transaction(&mut self, id: Uuid) -> bool {
        let before = self.transactions.len();
        self.transactions.retain(|t| t.id != id);
        self.transactions.len() < before
    }

    /// Removes every installment sharing `group_id` in one sweep and returns
    /// how many rows went away.
    pub fn remove_group(&mut self, group_id: Uuid) -> usize {
        let before = self.transactions.len();
        self.transactions
            .retain(|t| t.recurring_group_id != Some(group_id));
        before - self.transactions.len()
    }

    pub fn remove_investment(&mut self, id: Uuid) -> bool {
        let before = self.investments.len();
        self.investments.retain(|i| i.id != id);
        self.investments.len() < before
    }
}

fn find<T: Identifiable>(items: &[T], id: Uuid) -> Option<&T> {
    items.iter().find(|item| item.id() == id)
}

fn find_mut<T: Identifiable>(items: &mut [T], id: Uuid) -> Option<&mut T> {
    items.iter_mut().find(|item| item.id() == id)
}
