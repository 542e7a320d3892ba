//! Service layer exposing the operations the presentation shell calls.

pub mod investment_service;
pub mod recurring_service;
pub mod summary_service;
pub mod transaction_service;

pub use investment_service::{InvestmentService, NewInvestment};
pub use recurring_service::{BookEntry, InstallmentGroup, RecurringExpense, RecurringService};
pub use summary_service::{
    CategorySpend, DashboardSummary, InvestmentTotals, MonthlyTotals, Reminder, ReminderKind,
    SummaryService,
};
pub use transaction_service::{NewTransaction, TransactionPatch, TransactionService};
