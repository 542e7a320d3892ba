//! Aggregation of transactions and investments into dashboard view models.

use chrono::{Duration, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{
    core::clock::Clock,
    core::services::recurring_service::{BookEntry, RecurringService},
    core::services::transaction_service::TransactionService,
    domain::{
        book::Book,
        common::same_month,
        investment::Investment,
        transaction::{Category, Transaction, TransactionKind, TransactionStatus},
    },
};

/// How many rows the recent-activity list keeps.
const RECENT_ACTIVITY_LIMIT: usize = 5;
/// Reminder window for upcoming due dates, in days (inclusive).
const DUE_SOON_DAYS: i64 = 7;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
/// Income, expense, and balance for one calendar month.
pub struct MonthlyTotals {
    pub income: Decimal,
    pub expense: Decimal,
    pub balance: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
/// Aggregate valuation across every investment position.
pub struct InvestmentTotals {
    pub current_value: Decimal,
    pub initial_value: Decimal,
    pub profit: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
/// Summed expense for one category of the reference month.
pub struct CategorySpend {
    pub category: Category,
    pub total: Decimal,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ReminderKind {
    Overdue,
    DueSoon,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
/// One notification row: an overdue expense or one due within the week.
pub struct Reminder {
    pub kind: ReminderKind,
    pub transaction: Transaction,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
/// Complete dashboard view model derived from one snapshot.
pub struct DashboardSummary {
    pub reference: NaiveDate,
    pub monthly: MonthlyTotals,
    pub investments: InvestmentTotals,
    pub expenses_by_category: Vec<CategorySpend>,
    pub reminders: Vec<Reminder>,
    pub recent_activity: Vec<Transaction>,
}

/// Aggregates snapshot data for the dashboard.
pub struct SummaryService;

impl SummaryService {
    /// Income counts by nominal date; expenses count by due date when one is
    /// present, otherwise by nominal date.
    pub fn monthly_totals(transactions: &[Transaction], reference: NaiveDate) -> MonthlyTotals {
        let income: Decimal = transactions
            .iter()
            .filter(|t| t.kind == TransactionKind::Income && same_month(t.date, reference))
            .map(|t| t.amount)
            .sum();
        let expense: Decimal = transactions
            .iter()
            .filter(|t| {
                t.kind == TransactionKind::Expense && same_month(t.reference_date(), reference)
            })
            .map(|t| t.amount)
            .sum();
        MonthlyTotals {
            income,
            expense,
            balance: income - expense,
        }
    }

    pub fn investment_totals(investments: &[Investment]) -> InvestmentTotals {
        let current_value: Decimal = investments.iter().map(|i| i.current_value).sum();
        let initial_value: Decimal = investments.iter().map(|i| i.initial_value).sum();
        InvestmentTotals {
            current_value,
            initial_value,
            profit: current_value - initial_value,
        }
    }

    /// Expense totals per category for the reference month, in first-seen
    /// order; categories without spending are absent.
    pub fn category_breakdown(
        transactions: &[Transaction],
        reference: NaiveDate,
    ) -> Vec<CategorySpend> {
        let mut breakdown: Vec<CategorySpend> = Vec::new();
        let monthly_expenses = transactions.iter().filter(|t| {
            t.kind == TransactionKind::Expense && same_month(t.reference_date(), reference)
        });
        for transaction in monthly_expenses {
            match breakdown
                .iter_mut()
                .find(|entry| entry.category == transaction.category)
            {
                Some(entry) => entry.total += transaction.amount,
                None => breakdown.push(CategorySpend {
                    category: transaction.category,
                    total: transaction.amount,
                }),
            }
        }
        breakdown
    }

    /// Overdue expenses first, then pending ones due within the next seven
    /// days (both bounds inclusive). Statuses are normalized against `today`
    /// before filtering, so raw snapshots work too.
    pub fn reminders(transactions: &[Transaction], today: NaiveDate) -> Vec<Reminder> {
        let horizon = today + Duration::days(DUE_SOON_DAYS);
        let mut reminders = Vec::new();
        for transaction in transactions {
            if transaction.normalized_status(today) == TransactionStatus::Overdue {
                reminders.push(Self::reminder(transaction, ReminderKind::Overdue, today));
            }
        }
        for transaction in transactions {
            let due_soon = transaction.normalized_status(today) == TransactionStatus::Pending
                && transaction
                    .due_date
                    .map_or(false, |due| due >= today && due <= horizon);
            if due_soon {
                reminders.push(Self::reminder(transaction, ReminderKind::DueSoon, today));
            }
        }
        reminders
    }

    /// Merged listing with recurring groups collapsed to their representative,
    /// truncated to the five newest entries.
    pub fn recent_activity(transactions: &[Transaction], today: NaiveDate) -> Vec<Transaction> {
        RecurringService::entries(transactions)
            .into_iter()
            .filter_map(|entry| match entry {
                BookEntry::Single(transaction) => Some(transaction),
                BookEntry::Group(group) => {
                    let label = group.collapsed_label();
                    group.representative(today).cloned().map(|mut row| {
                        row.description = label;
                        row
                    })
                }
            })
            .take(RECENT_ACTIVITY_LIMIT)
            .collect()
    }

    /// Derives the whole dashboard for the current day.
    pub fn dashboard(book: &Book, clock: &dyn Clock) -> DashboardSummary {
        Self::dashboard_at(book, clock.today())
    }

    /// Derives the whole dashboard against an explicit reference day. The
    /// snapshot passes through the status engine once before aggregation.
    pub fn dashboard_at(book: &Book, reference: NaiveDate) -> DashboardSummary {
        let listed = TransactionService::normalized(&book.transactions, reference);
        DashboardSummary {
            reference,
            monthly: Self::monthly_totals(&listed, reference),
            investments: Self::investment_totals(&book.investments),
            expenses_by_category: Self::category_breakdown(&listed, reference),
            reminders: Self::reminders(&listed, reference),
            recent_activity: Self::recent_activity(&listed, reference),
        }
    }

    fn reminder(transaction: &Transaction, kind: ReminderKind, today: NaiveDate) -> Reminder {
        let mut copy = transaction.clone();
        copy.refresh_status(today);
        Reminder {
            kind,
            transaction: copy,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::investment::InvestmentKind;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn expense(amount: i64, day: NaiveDate, due: Option<NaiveDate>) -> Transaction {
        Transaction::new(
            "Expense",
            Decimal::from(amount),
            TransactionKind::Expense,
            Category::Other,
            day,
            due,
            day,
        )
    }

    #[test]
    fn expenses_bucket_by_due_date_when_present() {
        let reference = date(2024, 2, 1);
        let transactions = vec![expense(50, date(2024, 1, 5), Some(date(2024, 2, 10)))];
        let february = SummaryService::monthly_totals(&transactions, reference);
        assert_eq!(february.expense, Decimal::from(50));
        let january = SummaryService::monthly_totals(&transactions, date(2024, 1, 15));
        assert_eq!(january.expense, Decimal::ZERO);
    }

    #[test]
    fn balance_subtracts_expense_from_income() {
        let reference = date(2024, 2, 1);
        let mut transactions = vec![expense(300, reference, None)];
        transactions.push(Transaction::new(
            "Paycheck",
            Decimal::from(1000),
            TransactionKind::Income,
            Category::Salary,
            date(2024, 2, 5),
            None,
            reference,
        ));
        let totals = SummaryService::monthly_totals(&transactions, reference);
        assert_eq!(totals.income, Decimal::from(1000));
        assert_eq!(totals.expense, Decimal::from(300));
        assert_eq!(totals.balance, Decimal::from(700));
    }

    #[test]
    fn category_breakdown_keeps_first_seen_order() {
        let reference = date(2024, 2, 1);
        let mut grocery = expense(80, reference, None);
        grocery.category = Category::Food;
        let mut bus = expense(20, date(2024, 2, 2), None);
        bus.category = Category::Transport;
        let mut market = expense(40, date(2024, 2, 20), None);
        market.category = Category::Food;

        let breakdown =
            SummaryService::category_breakdown(&[grocery, bus, market], reference);
        assert_eq!(breakdown.len(), 2);
        assert_eq!(breakdown[0].category, Category::Food);
        assert_eq!(breakdown[0].total, Decimal::from(120));
        assert_eq!(breakdown[1].category, Category::Transport);
    }

    #[test]
    fn investment_totals_sum_both_sides() {
        let investments = vec![
            Investment::new(
                "Fund",
                InvestmentKind::Stocks,
                Decimal::from(1000),
                Decimal::from(1200),
                date(2023, 1, 1),
            ),
            Investment::new(
                "Bond",
                InvestmentKind::FixedIncome,
                Decimal::from(500),
                Decimal::from(450),
                date(2023, 6, 1),
            ),
        ];
        let totals = SummaryService::investment_totals(&investments);
        assert_eq!(totals.current_value, Decimal::from(1650));
        assert_eq!(totals.initial_value, Decimal::from(1500));
        assert_eq!(totals.profit, Decimal::from(150));
    }
}
