use crate::error::Result;
use crate::period::DateWindow;
use crate::schema::{Account, Budget, Category, Transaction};
use async_trait::async_trait;
use log::debug;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Read-only contract through which the engine reaches ledger data.
///
/// The four fetches are independent and may be awaited concurrently.
/// Implementors surface their own I/O failures as
/// [`AnalyticsError::LedgerAccess`](crate::AnalyticsError::LedgerAccess);
/// once a fetch succeeds the engine assumes the returned snapshot is
/// complete and consistent.
#[async_trait]
pub trait LedgerAccessor: Send + Sync {
    /// All accounts with their current balance snapshots.
    async fn fetch_accounts(&self) -> Result<Vec<Account>>;

    /// All categories, whether or not they have activity in the window.
    async fn fetch_categories(&self) -> Result<Vec<Category>>;

    /// All budgets.
    async fn fetch_budgets(&self) -> Result<Vec<Budget>>;

    /// Transactions dated inside `window`, both ends inclusive.
    async fn fetch_transactions(&self, window: DateWindow) -> Result<Vec<Transaction>>;
}

/// An owned, serializable ledger held entirely in memory.
///
/// Serves as the reference [`LedgerAccessor`] for tests and for embedders
/// that keep their data in a JSON file rather than a database.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MemoryLedger {
    #[serde(default)]
    pub accounts: Vec<Account>,
    #[serde(default)]
    pub categories: Vec<Category>,
    #[serde(default)]
    pub budgets: Vec<Budget>,
    #[serde(default)]
    pub transactions: Vec<Transaction>,
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let ledger: Self = serde_json::from_str(json)?;
        debug!(
            "Loaded ledger: {} accounts, {} categories, {} budgets, {} transactions",
            ledger.accounts.len(),
            ledger.categories.len(),
            ledger.budgets.len(),
            ledger.transactions.len()
        );
        Ok(ledger)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }
}

#[async_trait]
impl LedgerAccessor for MemoryLedger {
    async fn fetch_accounts(&self) -> Result<Vec<Account>> {
        Ok(self.accounts.clone())
    }

    async fn fetch_categories(&self) -> Result<Vec<Category>> {
        Ok(self.categories.clone())
    }

    async fn fetch_budgets(&self) -> Result<Vec<Budget>> {
        Ok(self.budgets.clone())
    }

    async fn fetch_transactions(&self, window: DateWindow) -> Result<Vec<Transaction>> {
        Ok(self
            .transactions
            .iter()
            .filter(|t| window.contains(t.date))
            .cloned()
            .collect())
    }
}
