//! Groups a month's expenses by category for the dashboard.

use std::collections::HashMap;

use crate::{category::CategoryId, expense::Expense, summary::finite_or_zero};

/// How much was planned and spent in one expense category.
#[derive(Debug, Clone, PartialEq)]
pub(super) struct CategoryTotal {
    pub category_id: CategoryId,
    pub category_name: String,
    pub estimated: f64,
    /// Expenses without an actual amount count as zero.
    pub actual: f64,
    pub count: usize,
}

/// Sums `expenses` per category.
///
/// # Returns
/// One total per category, largest actual spend first, ties broken by name
/// and then ID. Categories that share a name get a total each.
pub(super) fn totals_by_category(expenses: &[Expense]) -> Vec<CategoryTotal> {
    let mut totals: HashMap<CategoryId, CategoryTotal> = HashMap::new();

    for expense in expenses {
        let total = totals
            .entry(expense.category_id)
            .or_insert_with(|| CategoryTotal {
                category_id: expense.category_id,
                category_name: expense.category_name.clone(),
                estimated: 0.0,
                actual: 0.0,
                count: 0,
            });

        total.estimated += finite_or_zero(expense.estimated_amount);
        total.actual += finite_or_zero(expense.actual_amount.unwrap_or(0.0));
        total.count += 1;
    }

    let mut totals: Vec<_> = totals.into_values().collect();
    totals.sort_by(|a, b| {
        b.actual
            .total_cmp(&a.actual)
            .then_with(|| a.category_name.cmp(&b.category_name))
            .then_with(|| a.category_id.cmp(&b.category_id))
    });
    totals
}
