//! Expense entry and the budget summary view.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use trip_planner_database::{DomainKey, PersistenceStore};
use trip_planner_trip_models::{BudgetDocument, Expense};

use crate::{TripError, read_or_default};

/// A total and how many expenses made it up.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tally {
    /// Sum in US dollars.
    pub total: f64,
    /// Number of contributing expenses.
    pub count: u64,
}

impl From<(f64, u64)> for Tally {
    fn from((total, count): (f64, u64)) -> Self {
        Self { total, count }
    }
}

/// Overview of shared spending.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetSummary {
    /// Sum of every expense.
    pub total_spent: f64,
    /// Per category.
    pub by_category: BTreeMap<String, Tally>,
    /// Per person, with unsplit expenses under the group bucket.
    pub by_person: BTreeMap<String, Tally>,
}

impl BudgetSummary {
    /// Summarizes a budget document.
    #[must_use]
    pub fn from_document(doc: &BudgetDocument) -> Self {
        Self {
            total_spent: doc.total_spent(),
            by_category: doc
                .category_totals()
                .into_iter()
                .map(|(k, v)| (k, v.into()))
                .collect(),
            by_person: doc
                .person_totals()
                .into_iter()
                .map(|(k, v)| (k, v.into()))
                .collect(),
        }
    }
}

/// Summarizes the stored budget. Store failures read as an empty budget.
pub async fn budget_summary(store: &PersistenceStore) -> BudgetSummary {
    let doc: BudgetDocument = read_or_default(store, DomainKey::Budget).await;
    BudgetSummary::from_document(&doc)
}

/// Records an expense and returns its id.
///
/// # Errors
///
/// Returns [`TripError::Store`] on store failure.
pub async fn add_expense(store: &PersistenceStore, expense: Expense) -> Result<u64, TripError> {
    let mut doc: BudgetDocument = store.load_typed(DomainKey::Budget).await?;
    let id = doc.add_expense(expense);
    store.save_typed(DomainKey::Budget, &doc).await?;
    Ok(id)
}
