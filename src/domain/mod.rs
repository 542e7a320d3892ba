//! Pure domain models: transactions, investments, and the book snapshot.
//! No I/O, no storage. Only data types and the status/calendar rules.

pub mod book;
pub mod common;
pub mod investment;
pub mod transaction;

pub use book::Book;
pub use common::{same_month, shift_month, Displayable, Identifiable};
pub use investment::{Investment, InvestmentKind};
pub use transaction::{
    Category, Installment, Transaction, TransactionKind, TransactionStatus,
};
