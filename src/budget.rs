use crate::schema::{Budget, BudgetId, CategoryIndex, CategoryKind, Transaction};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Spending position of one budget within the window.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BudgetStatus {
    pub budget_id: BudgetId,
    pub name: String,
    pub category_name: String,
    pub category_icon: String,
    pub category_color: String,
    pub limit_amount: Decimal,
    pub spent_amount: Decimal,

    /// `limit - spent`. Negative once the budget is blown.
    pub remaining_amount: Decimal,

    /// Utilization in percent. Zero when the limit is zero, unbounded
    /// above 100 so over-budget stays visible.
    pub percentage: Decimal,
}

/// Evaluates every budget against the window's transactions, most utilized
/// first.
///
/// A budget whose category no longer resolves is skipped. Spending counts
/// transactions that reference the budget's category and whose kind is
/// Expense; a budget pointed at an Income category therefore reports zero
/// spending. Ties in the ranking keep their input order.
pub fn evaluate_budgets(
    budgets: &[Budget],
    transactions: &[Transaction],
    categories: &CategoryIndex,
) -> Vec<BudgetStatus> {
    let mut statuses: Vec<BudgetStatus> = Vec::with_capacity(budgets.len());

    for budget in budgets {
        let category = match categories.get(budget.category_id) {
            Some(category) => category,
            None => continue,
        };

        let spent_amount: Decimal = if category.kind == CategoryKind::Expense {
            transactions
                .iter()
                .filter(|t| t.category_id == Some(budget.category_id))
                .map(|t| t.amount)
                .sum()
        } else {
            Decimal::ZERO
        };

        let percentage = if budget.limit_amount.is_zero() {
            Decimal::ZERO
        } else {
            spent_amount / budget.limit_amount * Decimal::ONE_HUNDRED
        };

        statuses.push(BudgetStatus {
            budget_id: budget.id,
            name: budget.name.clone(),
            category_name: category.name.clone(),
            category_icon: category.icon.clone(),
            category_color: category.color.clone(),
            limit_amount: budget.limit_amount,
            spent_amount,
            remaining_amount: budget.limit_amount - spent_amount,
            percentage,
        });
    }

    statuses.sort_by(|a, b| b.percentage.cmp(&a.percentage));
    statuses
}
