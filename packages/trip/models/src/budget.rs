//! Shared expenses (the `budget` document) and their summaries.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Bucket name for expenses that are not split between people.
pub const GROUP_BUCKET: &str = "Group";

/// A single expense.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    /// Identifier.
    #[serde(default)]
    pub id: u64,
    /// What was paid for.
    #[serde(default)]
    pub description: String,
    /// Amount in US dollars.
    #[serde(default)]
    pub amount: f64,
    /// Category label (Food, Transportation, Accommodation, ...).
    #[serde(default)]
    pub category: String,
    /// Date recorded, `YYYY-MM-DD`.
    #[serde(default)]
    pub date: String,
    /// Whether the amount is divided between `split_users`.
    #[serde(default)]
    pub split: bool,
    /// People sharing a split expense.
    #[serde(default)]
    pub split_users: Vec<String>,
}

/// The `budget` document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BudgetDocument {
    /// Expenses in insertion order.
    #[serde(default)]
    pub expenses: Vec<Expense>,
}

impl BudgetDocument {
    /// Sum of every expense.
    #[must_use]
    pub fn total_spent(&self) -> f64 {
        self.expenses.iter().map(|e| e.amount).sum()
    }

    /// Totals and counts per category. A blank category counts as `Other`.
    #[must_use]
    pub fn category_totals(&self) -> BTreeMap<String, (f64, u64)> {
        let mut totals: BTreeMap<String, (f64, u64)> = BTreeMap::new();
        for expense in &self.expenses {
            let category = if expense.category.is_empty() {
                "Other"
            } else {
                expense.category.as_str()
            };
            let entry = totals.entry(category.to_string()).or_default();
            entry.0 += expense.amount;
            entry.1 += 1;
        }
        totals
    }

    /// Totals and counts per person.
    ///
    /// A split expense adds `amount / split_users.len()` to each listed
    /// person; shares are not reconciled, so they may not sum exactly to
    /// the amount. Anything else accrues to [`GROUP_BUCKET`].
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn person_totals(&self) -> BTreeMap<String, (f64, u64)> {
        let mut totals: BTreeMap<String, (f64, u64)> = BTreeMap::new();
        for expense in &self.expenses {
            if expense.split && !expense.split_users.is_empty() {
                let share = expense.amount / expense.split_users.len() as f64;
                for user in &expense.split_users {
                    let entry = totals.entry(user.clone()).or_default();
                    entry.0 += share;
                    entry.1 += 1;
                }
            } else {
                let entry = totals.entry(GROUP_BUCKET.to_string()).or_default();
                entry.0 += expense.amount;
                entry.1 += 1;
            }
        }
        totals
    }

    /// Appends an expense under a fresh id and returns that id.
    pub fn add_expense(&mut self, mut expense: Expense) -> u64 {
        expense.id = crate::next_id(self.expenses.iter().map(|e| e.id));
        if !expense.split {
            expense.split_users.clear();
        }
        let id = expense.id;
        self.expenses.push(expense);
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expense(amount: f64, split_users: &[&str]) -> Expense {
        Expense {
            amount,
            category: "Food".to_string(),
            split: !split_users.is_empty(),
            split_users: split_users.iter().map(ToString::to_string).collect(),
            ..Expense::default()
        }
    }

    #[test]
    fn split_expense_divides_evenly_without_reconciliation() {
        let mut budget = BudgetDocument::default();
        budget.add_expense(expense(100.0, &["Ana", "Ben", "Cy"]));
        let totals = budget.person_totals();

        let share = 100.0 / 3.0;
        assert!((totals["Ana"].0 - share).abs() < f64::EPSILON);
        assert_eq!(totals["Ben"].1, 1);
        assert!(!totals.contains_key(GROUP_BUCKET));
    }

    #[test]
    fn unsplit_expense_goes_to_group() {
        let mut budget = BudgetDocument::default();
        budget.add_expense(expense(40.0, &[]));
        budget.add_expense(expense(60.0, &["Ana"]));
        let totals = budget.person_totals();

        assert!((totals[GROUP_BUCKET].0 - 40.0).abs() < f64::EPSILON);
        assert!((totals["Ana"].0 - 60.0).abs() < f64::EPSILON);
        assert!((budget.total_spent() - 100.0).abs() < f64::EPSILON);
        assert_eq!(budget.category_totals()["Food"].1, 2);
    }

    #[test]
    fn ids_are_assigned_in_sequence() {
        let mut budget = BudgetDocument::default();
        assert_eq!(budget.add_expense(expense(1.0, &[])), 1);
        assert_eq!(budget.add_expense(expense(1.0, &[])), 2);
    }
}
