use crate::period::DateWindow;
use crate::schema::{CategoryIndex, CategoryKind, Transaction};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One value per calendar day. Dense over the window by construction:
/// every day is present, zero when nothing happened.
pub type DailySeries = BTreeMap<NaiveDate, Decimal>;

/// Aggregated view of one window's transaction activity.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PeriodActivity {
    pub total_income: Decimal,
    pub total_expense: Decimal,

    /// Category name to summed expense. Only categories with at least one
    /// expense transaction in the window appear.
    pub expense_by_category: BTreeMap<String, Decimal>,

    pub income_by_day: DailySeries,
    pub expense_by_day: DailySeries,
}

/// Sums window activity into totals, a per-category expense breakdown, and
/// zero-filled daily income/expense series.
///
/// Transactions whose category cannot be resolved contribute nothing.
/// Deterministic for identical inputs.
pub fn aggregate_activity(
    window: &DateWindow,
    transactions: &[Transaction],
    categories: &CategoryIndex,
) -> PeriodActivity {
    // 1. Pre-fill both series so every window day has an entry.
    let mut income_by_day: DailySeries = window.days().map(|day| (day, Decimal::ZERO)).collect();
    let mut expense_by_day = income_by_day.clone();

    let mut total_income = Decimal::ZERO;
    let mut total_expense = Decimal::ZERO;
    let mut expense_by_category: BTreeMap<String, Decimal> = BTreeMap::new();

    // 2. Accumulate each resolvable transaction into its kind's buckets.
    for transaction in transactions {
        let category = match transaction.category_id.and_then(|id| categories.get(id)) {
            Some(category) => category,
            None => continue,
        };

        // Accessor contract: transactions are window-restricted. Strays
        // would puncture the dense series, so skip them.
        if !window.contains(transaction.date) {
            continue;
        }

        match category.kind {
            CategoryKind::Income => {
                total_income += transaction.amount;
                if let Some(slot) = income_by_day.get_mut(&transaction.date) {
                    *slot += transaction.amount;
                }
            }
            CategoryKind::Expense => {
                total_expense += transaction.amount;
                if let Some(slot) = expense_by_day.get_mut(&transaction.date) {
                    *slot += transaction.amount;
                }
                *expense_by_category
                    .entry(category.name.clone())
                    .or_insert(Decimal::ZERO) += transaction.amount;
            }
        }
    }

    PeriodActivity {
        total_income,
        total_expense,
        expense_by_category,
        income_by_day,
        expense_by_day,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{Category, CategoryId};
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    fn transaction(
        id: i64,
        amount: Decimal,
        day: NaiveDate,
        category_id: Option<CategoryId>,
    ) -> Transaction {
        Transaction {
            id,
            description: format!("txn-{}", id),
            amount,
            date: day,
            category_id,
            account_id: 1,
        }
    }

    fn test_categories() -> Vec<Category> {
        vec![
            Category::new(1, "Salary", CategoryKind::Income),
            Category::new(2, "Groceries", CategoryKind::Expense),
            Category::new(3, "Transport", CategoryKind::Expense),
        ]
    }

    #[test]
    fn test_totals_split_by_category_kind() {
        let categories = test_categories();
        let index = CategoryIndex::new(&categories);
        let window = DateWindow::new(date(2025, 11, 1), date(2025, 11, 30));
        let transactions = vec![
            transaction(1, dec!(2000), date(2025, 11, 1), Some(1)),
            transaction(2, dec!(50.25), date(2025, 11, 2), Some(2)),
            transaction(3, dec!(30), date(2025, 11, 2), Some(3)),
            transaction(4, dec!(999), date(2025, 11, 3), None),
            transaction(5, dec!(999), date(2025, 11, 3), Some(42)),
        ];

        let activity = aggregate_activity(&window, &transactions, &index);

        assert_eq!(activity.total_income, dec!(2000));
        assert_eq!(activity.total_expense, dec!(80.25));
    }

    #[test]
    fn test_expense_breakdown_accumulates_per_category() {
        let categories = test_categories();
        let index = CategoryIndex::new(&categories);
        let window = DateWindow::new(date(2025, 11, 1), date(2025, 11, 30));
        let transactions = vec![
            transaction(1, dec!(40), date(2025, 11, 2), Some(2)),
            transaction(2, dec!(60), date(2025, 11, 20), Some(2)),
            transaction(3, dec!(15), date(2025, 11, 5), Some(3)),
            transaction(4, dec!(500), date(2025, 11, 6), Some(1)),
        ];

        let activity = aggregate_activity(&window, &transactions, &index);

        assert_eq!(activity.expense_by_category.len(), 2);
        assert_eq!(activity.expense_by_category["Groceries"], dec!(100));
        assert_eq!(activity.expense_by_category["Transport"], dec!(15));
        // Income categories never show up in the expense breakdown.
        assert!(!activity.expense_by_category.contains_key("Salary"));
    }

    #[test]
    fn test_daily_series_zero_filled_and_placed() {
        let categories = test_categories();
        let index = CategoryIndex::new(&categories);
        let window = DateWindow::new(date(2025, 11, 1), date(2025, 11, 10));
        let transactions = vec![
            transaction(1, dec!(25), date(2025, 11, 4), Some(2)),
            transaction(2, dec!(10), date(2025, 11, 4), Some(2)),
            transaction(3, dec!(100), date(2025, 11, 7), Some(1)),
        ];

        let activity = aggregate_activity(&window, &transactions, &index);

        assert_eq!(activity.income_by_day.len(), 10);
        assert_eq!(activity.expense_by_day.len(), 10);
        assert_eq!(activity.expense_by_day[&date(2025, 11, 4)], dec!(35));
        assert_eq!(activity.expense_by_day[&date(2025, 11, 5)], dec!(0));
        assert_eq!(activity.income_by_day[&date(2025, 11, 7)], dec!(100));
        assert_eq!(activity.income_by_day[&date(2025, 11, 4)], dec!(0));
    }

    #[test]
    fn test_empty_window_activity() {
        let categories = test_categories();
        let index = CategoryIndex::new(&categories);
        let window = DateWindow::new(date(2025, 11, 1), date(2025, 11, 30));

        let activity = aggregate_activity(&window, &[], &index);

        assert_eq!(activity.total_income, dec!(0));
        assert_eq!(activity.total_expense, dec!(0));
        assert!(activity.expense_by_category.is_empty());
        assert_eq!(activity.income_by_day.len(), 30);
        assert!(activity.income_by_day.values().all(|v| v.is_zero()));
    }

    proptest! {
        // Dense-series property: one entry per window day, no matter what
        // the transaction set looks like.
        #[test]
        fn prop_series_stay_dense(
            entries in prop::collection::vec((0i64..90, 1u32..100_000u32, 0u8..3), 0..50)
        ) {
            let categories = test_categories();
            let index = CategoryIndex::new(&categories);
            let window = DateWindow::new(date(2025, 11, 1), date(2025, 11, 30));

            let transactions: Vec<Transaction> = entries
                .iter()
                .enumerate()
                .map(|(i, (offset, cents, kind))| {
                    let day = date(2025, 10, 1) + chrono::Days::new(*offset as u64);
                    let category_id = match kind {
                        0 => Some(1),
                        1 => Some(2),
                        _ => None,
                    };
                    transaction(i as i64, Decimal::new(*cents as i64, 2), day, category_id)
                })
                .collect();

            let activity = aggregate_activity(&window, &transactions, &index);

            prop_assert_eq!(activity.income_by_day.len(), window.num_days());
            prop_assert_eq!(activity.expense_by_day.len(), window.num_days());
            let expected_days: Vec<NaiveDate> = window.days().collect();
            let income_days: Vec<NaiveDate> = activity.income_by_day.keys().copied().collect();
            prop_assert_eq!(income_days, expected_days);
            prop_assert!(activity.total_income >= Decimal::ZERO);
            prop_assert!(activity.total_expense >= Decimal::ZERO);
        }
    }
}
