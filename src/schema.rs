use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub type AccountId = i64;
pub type CategoryId = i64;
pub type BudgetId = i64;
pub type TransactionId = i64;

/// Whether a category's transactions add to or subtract from the balance.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum CategoryKind {
    Income,
    Expense,
}

/// A real-world account snapshot. Only `balance` matters to the analytics:
/// the sum of all account balances is treated as the authoritative total
/// for the reference date.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Account {
    pub id: AccountId,
    pub name: String,
    pub balance: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub kind: CategoryKind,

    /// Presentation badge identifier (Bootstrap icon name).
    #[serde(default = "Category::default_icon")]
    pub icon: String,

    /// Presentation color as a hex string.
    #[serde(default = "Category::default_color")]
    pub color: String,
}

impl Category {
    pub fn new(id: CategoryId, name: impl Into<String>, kind: CategoryKind) -> Self {
        Self {
            id,
            name: name.into(),
            kind,
            icon: Self::default_icon(),
            color: Self::default_color(),
        }
    }

    fn default_icon() -> String {
        "bi-tag".to_string()
    }

    fn default_color() -> String {
        "#6c757d".to_string()
    }
}

/// A spending limit for one category. Multiple budgets may target the same
/// category; each is evaluated independently.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Budget {
    pub id: BudgetId,
    pub name: String,
    pub category_id: CategoryId,
    pub limit_amount: Decimal,
}

/// A dated ledger entry. `amount` is always non-negative; the sign of its
/// monetary effect comes from the category kind. `category_id` is `None`
/// when the transaction was never categorized (or the category was deleted,
/// in which case the id dangles and resolves to nothing).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Transaction {
    pub id: TransactionId,
    pub description: String,
    pub amount: Decimal,
    pub date: NaiveDate,
    pub category_id: Option<CategoryId>,
    pub account_id: AccountId,
}

/// Resolves category references on transactions and budgets.
///
/// Also owns the single sign rule used by every aggregation: a transaction's
/// net effect on the balance is `+amount` when its category is Income,
/// `-amount` when Expense, and zero when the category cannot be resolved.
pub struct CategoryIndex<'a> {
    by_id: HashMap<CategoryId, &'a Category>,
}

impl<'a> CategoryIndex<'a> {
    pub fn new(categories: &'a [Category]) -> Self {
        Self {
            by_id: categories.iter().map(|c| (c.id, c)).collect(),
        }
    }

    pub fn get(&self, id: CategoryId) -> Option<&'a Category> {
        self.by_id.get(&id).copied()
    }

    /// The resolved kind for a transaction's category reference, if any.
    pub fn kind_of(&self, category_id: Option<CategoryId>) -> Option<CategoryKind> {
        category_id.and_then(|id| self.get(id)).map(|c| c.kind)
    }

    /// Signed monetary effect of a transaction on the cumulative balance.
    pub fn net_effect(&self, transaction: &Transaction) -> Decimal {
        match self.kind_of(transaction.category_id) {
            Some(CategoryKind::Income) => transaction.amount,
            Some(CategoryKind::Expense) => -transaction.amount,
            None => Decimal::ZERO,
        }
    }
}
