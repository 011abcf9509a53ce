//! Aggregates shown in the summary panels above each list.
//!
//! Every summary is reduced from the rows fetched for the page, so it always
//! agrees with the month being viewed.

use serde::Serialize;

use crate::{
    expense::Expense,
    income::Income,
    saving_goal::{GoalStatus, SavingGoal},
    shopping::ShoppingItem,
};

/// Replace NaN and infinite amounts with zero so they do not poison a total.
pub fn finite_or_zero(amount: f64) -> f64 {
    if amount.is_finite() { amount } else { 0.0 }
}

fn sum(amounts: impl Iterator<Item = f64>) -> f64 {
    amounts.map(finite_or_zero).sum()
}

fn average(total: f64, count: usize) -> f64 {
    if count == 0 {
        0.0
    } else {
        total / count as f64
    }
}

/// Totals for a list of expenses.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExpenseSummary {
    pub total_estimated: f64,
    /// Expenses without an actual amount count as zero.
    pub total_actual: f64,
    pub completed_count: usize,
    pub count: usize,
    /// The fraction of expenses that have been completed, between 0 and 1.
    pub completion_ratio: f64,
}

impl ExpenseSummary {
    pub fn new(expenses: &[Expense]) -> Self {
        let count = expenses.len();
        let completed_count = expenses
            .iter()
            .filter(|expense| expense.completed_at.is_some())
            .count();

        Self {
            total_estimated: sum(expenses.iter().map(|expense| expense.estimated_amount)),
            total_actual: sum(
                expenses
                    .iter()
                    .map(|expense| expense.actual_amount.unwrap_or(0.0)),
            ),
            completed_count,
            count,
            completion_ratio: average(completed_count as f64, count),
        }
    }
}

/// Totals for a list of income entries.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IncomeSummary {
    pub total: f64,
    pub count: usize,
    pub average: f64,
}

impl IncomeSummary {
    pub fn new(income: &[Income]) -> Self {
        let total = sum(income.iter().map(|entry| entry.amount));

        Self {
            total,
            count: income.len(),
            average: average(total, income.len()),
        }
    }
}

/// Totals for a shopping list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShoppingSummary {
    /// The sum of the estimated price of each item.
    pub total_estimated_price: f64,
    pub count: usize,
    /// Capped at `i64::MAX` rather than overflowing.
    pub total_quantity: i64,
    pub average_price: f64,
}

impl ShoppingSummary {
    pub fn new(items: &[ShoppingItem]) -> Self {
        let total_estimated_price = sum(items.iter().map(|item| item.estimated_price));

        Self {
            total_estimated_price,
            count: items.len(),
            total_quantity: items
                .iter()
                .fold(0, |total: i64, item| total.saturating_add(item.quantity)),
            average_price: average(total_estimated_price, items.len()),
        }
    }
}

/// Totals for a list of saving goals.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SavingGoalSummary {
    pub total_target: f64,
    pub active_count: usize,
    pub completed_count: usize,
    pub count: usize,
}

impl SavingGoalSummary {
    pub fn new(goals: &[SavingGoal]) -> Self {
        let count_with_status = |status: GoalStatus| {
            goals.iter().filter(|goal| goal.status == status).count()
        };

        Self {
            total_target: sum(goals.iter().map(|goal| goal.target_amount)),
            active_count: count_with_status(GoalStatus::Active),
            completed_count: count_with_status(GoalStatus::Completed),
            count: goals.len(),
        }
    }
}

/// The money that came in and went out over one month.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyBalance {
    pub total_income: f64,
    /// The sum of the actual amounts of the month's expenses.
    pub total_expenses: f64,
    pub net_balance: f64,
}

impl MonthlyBalance {
    pub fn new(income: &[Income], expenses: &[Expense]) -> Self {
        let total_income = IncomeSummary::new(income).total;
        let total_expenses = ExpenseSummary::new(expenses).total_actual;

        Self {
            total_income,
            total_expenses,
            net_balance: total_income - total_expenses,
        }
    }
}
