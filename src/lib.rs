//! # Ledger Analytics
//!
//! A library for turning a personal-finance ledger (accounts, categories,
//! budgets, transactions) into the analytics a dashboard renders: period
//! totals, per-day activity series, budget utilization, and a daily
//! cumulative-balance curve that extends past today with a forecast.
//!
//! ## Core Concepts
//!
//! - **Window**: the inclusive `[start, end]` date range reported over,
//!   defaulting to the current calendar month
//! - **Reference date**: the explicit "today" every component receives, so
//!   any past dashboard can be replayed exactly
//! - **Backward anchoring**: the balance curve is reconstructed from the
//!   authoritative present-day account total minus observed window flows,
//!   so it always closes exactly on the real balance
//! - **Model or fallback**: the forecast segment comes from a trend model
//!   fit on observed daily balances when history allows, and from a linear
//!   daily-average projection otherwise; model failure is control flow,
//!   never a dashboard error
//!
//! ## Example
//!
//! ```rust,ignore
//! use ledger_analytics::{build_dashboard, DashboardQuery, MemoryLedger};
//!
//! let ledger = MemoryLedger::from_json_file("ledger.json")?;
//! let query = DashboardQuery::default(); // current month, today as reference
//!
//! let snapshot = build_dashboard(&ledger, &query).await?;
//!
//! println!("Balance: {}", snapshot.total_balance);
//! for status in &snapshot.budgets {
//!     println!("{}: {}%", status.category_name, status.percentage.round_dp(0));
//! }
//! let chart = serde_json::to_string(&snapshot.forecast)?;
//! ```

pub mod access;
pub mod aggregate;
pub mod budget;
pub mod cashflow;
pub mod dashboard;
pub mod error;
pub mod forecast;
pub mod period;
pub mod schema;
pub mod trend;

pub use access::{LedgerAccessor, MemoryLedger};
pub use aggregate::{aggregate_activity, DailySeries, PeriodActivity};
pub use budget::{evaluate_budgets, BudgetStatus};
pub use cashflow::{reconstruct_history, BalanceHistory, DailyBalance};
pub use dashboard::{recent_transactions, DashboardSnapshot};
pub use error::{AnalyticsError, Result};
pub use forecast::{project_balances, ForecastMethod, ForecastResult, ForecastSegment};
pub use period::{first_day_of_month, last_day_of_month, DateWindow};
pub use schema::*;
pub use trend::{TrendError, TrendForecast, TrendModel};

use chrono::{Local, NaiveDate};
use log::{debug, info};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Per-request inputs. Every field may be omitted: missing bounds resolve
/// per [`DateWindow::resolve`] and a missing reference date falls back to
/// the wall clock at the entry point, nowhere deeper.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct DashboardQuery {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub reference_date: Option<NaiveDate>,
}

/// Engine tuning knobs.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct EngineOptions {
    /// Observed days required before the trend model is attempted.
    pub min_model_history: usize,

    /// Two-sided confidence level for the model's prediction interval.
    pub confidence_level: f64,

    /// How many of the newest transactions the snapshot lists.
    pub recent_limit: usize,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            min_model_history: 7,
            confidence_level: 0.95,
            recent_limit: 5,
        }
    }
}

/// Runs the full analytics pipeline for one dashboard request.
///
/// Stateless apart from its options; every invocation recomputes from a
/// fresh ledger fetch.
#[derive(Debug, Clone, Default)]
pub struct DashboardEngine {
    options: EngineOptions,
}

impl DashboardEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: EngineOptions) -> Self {
        Self { options }
    }

    /// Resolves the window, fetches the four ledger collections
    /// concurrently, and composes the snapshot.
    ///
    /// The only fallible phase is the fetch; once the data is in hand the
    /// analytics always complete.
    pub async fn build<A>(&self, ledger: &A, query: &DashboardQuery) -> Result<DashboardSnapshot>
    where
        A: LedgerAccessor + ?Sized,
    {
        let reference_date = query.reference_date.unwrap_or_else(today);
        let window = DateWindow::resolve(query.start_date, query.end_date, reference_date);

        info!(
            "Building dashboard for {} to {} (reference {})",
            window.start, window.end, reference_date
        );

        let (accounts, categories, budgets, transactions) = futures::try_join!(
            ledger.fetch_accounts(),
            ledger.fetch_categories(),
            ledger.fetch_budgets(),
            ledger.fetch_transactions(window),
        )?;
        debug!(
            "Fetched {} accounts, {} categories, {} budgets, {} transactions",
            accounts.len(),
            categories.len(),
            budgets.len(),
            transactions.len()
        );

        let index = CategoryIndex::new(&categories);
        let total_balance: Decimal = accounts.iter().map(|account| account.balance).sum();

        let activity = aggregate_activity(&window, &transactions, &index);
        let budget_statuses = evaluate_budgets(&budgets, &transactions, &index);

        let history =
            reconstruct_history(&window, reference_date, total_balance, &transactions, &index);
        let forecast = project_balances(&window, reference_date, history, &self.options);

        let recent = recent_transactions(&transactions, self.options.recent_limit);

        Ok(DashboardSnapshot::assemble(
            window,
            reference_date,
            total_balance,
            activity,
            budget_statuses,
            recent,
            forecast,
        ))
    }
}

/// Builds one dashboard snapshot with default options.
pub async fn build_dashboard<A>(ledger: &A, query: &DashboardQuery) -> Result<DashboardSnapshot>
where
    A: LedgerAccessor + ?Sized,
{
    DashboardEngine::new().build(ledger, query).await
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}
