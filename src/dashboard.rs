use crate::aggregate::{DailySeries, PeriodActivity};
use crate::budget::BudgetStatus;
use crate::forecast::ForecastResult;
use crate::period::DateWindow;
use crate::schema::Transaction;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Everything the dashboard renders, in one immutable snapshot.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DashboardSnapshot {
    pub window: DateWindow,
    pub reference_date: NaiveDate,

    /// Sum of all account balance snapshots, authoritative for "now".
    pub total_balance: Decimal,

    pub total_income: Decimal,
    pub total_expense: Decimal,
    pub expense_by_category: BTreeMap<String, Decimal>,
    pub income_by_day: DailySeries,
    pub expense_by_day: DailySeries,

    /// Most utilized budget first.
    pub budgets: Vec<BudgetStatus>,

    /// Newest window transactions, date descending.
    pub recent_transactions: Vec<Transaction>,

    pub forecast: ForecastResult,
}

impl DashboardSnapshot {
    /// Bundles the upstream results. Composition only, no computation.
    pub fn assemble(
        window: DateWindow,
        reference_date: NaiveDate,
        total_balance: Decimal,
        activity: PeriodActivity,
        budgets: Vec<BudgetStatus>,
        recent_transactions: Vec<Transaction>,
        forecast: ForecastResult,
    ) -> Self {
        Self {
            window,
            reference_date,
            total_balance,
            total_income: activity.total_income,
            total_expense: activity.total_expense,
            expense_by_category: activity.expense_by_category,
            income_by_day: activity.income_by_day,
            expense_by_day: activity.expense_by_day,
            budgets,
            recent_transactions,
            forecast,
        }
    }
}

/// The `limit` newest transactions by date. Same-day entries keep their
/// ledger order.
pub fn recent_transactions(transactions: &[Transaction], limit: usize) -> Vec<Transaction> {
    let mut recent = transactions.to_vec();
    recent.sort_by(|a, b| b.date.cmp(&a.date));
    recent.truncate(limit);
    recent
}
