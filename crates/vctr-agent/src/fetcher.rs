// SPDX-FileCopyrightText: 2026 VCTR Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Decides which tables a request needs and fetches them concurrently.

use futures::future::join_all;
use tracing::{debug, error};
use vctr_core::{Category, DataStore, FetchedData, IntentResult, Row, VctrError};

pub const FETCH_FAILED: &str = "Failed to fetch data from database";

/// Tables to fetch for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchPlan {
    /// Tables that go into the prompt. Always starts with `Profile`.
    pub tables: Vec<Category>,
    /// Whether education must be fetched separately for the date context.
    pub education_for_dates: bool,
}

impl FetchPlan {
    /// Plan for a client-chosen category.
    ///
    /// Projects are served by the tool path, so their table is not fetched.
    pub fn for_category(category: Category) -> Self {
        let mut tables = vec![Category::Profile];
        if !matches!(category, Category::Profile | Category::Projects) {
            tables.push(category);
        }
        Self::with_dates(tables)
    }

    /// Plan for a resolved intent. Labels outside the category set fetch
    /// only the baseline.
    pub fn for_intent(intent: &IntentResult) -> Self {
        let mut tables = vec![Category::Profile];
        if let Some(
            category @ (Category::Experience | Category::Education | Category::Personal),
        ) = intent.category()
        {
            tables.push(category);
        }
        Self::with_dates(tables)
    }

    fn with_dates(tables: Vec<Category>) -> Self {
        let education_for_dates = !tables.contains(&Category::Education);
        Self {
            tables,
            education_for_dates,
        }
    }

    fn queries(&self) -> Vec<Category> {
        let mut queries = self.tables.clone();
        if self.education_for_dates {
            queries.push(Category::Education);
        }
        queries
    }
}

/// Runs every query of the plan concurrently and waits for all of them.
///
/// Any failure fails the whole fetch; `details` lists each failed query.
pub async fn fetch(store: &dyn DataStore, plan: &FetchPlan) -> Result<FetchedData, VctrError> {
    let queries = plan.queries();
    let results = join_all(queries.iter().map(|&category| store.select_all(category))).await;

    let mut data = FetchedData::default();
    let mut details = Vec::new();
    let mut education: Option<Vec<Row>> = None;

    for (category, result) in queries.into_iter().zip(results) {
        match result {
            Ok(rows) => {
                if category == Category::Education {
                    education = Some(rows.clone());
                }
                if plan.tables.contains(&category) {
                    data.tables.insert(category, rows);
                }
            }
            Err(e) => {
                error!(table = category.table(), error = %e, "query failed");
                details.push(e.public_message());
            }
        }
    }

    if !details.is_empty() {
        return Err(VctrError::Storage {
            message: FETCH_FAILED.to_string(),
            details,
        });
    }

    debug!(tables = ?plan.tables, "fetched prompt data");
    data.education = education;
    Ok(data)
}
