// SPDX-FileCopyrightText: 2026 VCTR Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory `DataStore` with per-table failure injection.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::Value;

use vctr_core::types::{AdapterType, HealthStatus};
use vctr_core::{Category, DataStore, PluginAdapter, Row, RowPage, VctrError};

/// One recorded store call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreCall {
    All(Category),
    Page {
        category: Category,
        offset: u64,
        limit: u64,
    },
}

/// A data store backed by in-memory tables.
#[derive(Clone, Default)]
pub struct MockStore {
    tables: Arc<Mutex<HashMap<Category, Vec<Row>>>>,
    failing: Arc<Mutex<HashSet<Category>>>,
    calls: Arc<Mutex<Vec<StoreCall>>>,
}

impl MockStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces a table's rows. Non-object values are skipped.
    pub fn with_table(self, category: Category, rows: Vec<Value>) -> Self {
        let rows = rows
            .into_iter()
            .filter_map(|v| match v {
                Value::Object(map) => Some(map),
                _ => None,
            })
            .collect();
        self.lock_tables().insert(category, rows);
        self
    }

    /// Makes every query against `category` fail.
    pub fn failing(self, category: Category) -> Self {
        self.failing
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(category);
        self
    }

    /// Every call received so far, in order.
    pub fn calls(&self) -> Vec<StoreCall> {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    fn lock_tables(&self) -> std::sync::MutexGuard<'_, HashMap<Category, Vec<Row>>> {
        self.tables.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn record(&self, call: StoreCall) -> Result<(), VctrError> {
        let category = match &call {
            StoreCall::All(c) | StoreCall::Page { category: c, .. } => *c,
        };
        self.calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(call);
        if self
            .failing
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .contains(&category)
        {
            return Err(VctrError::storage(format!(
                "relation \"public.{}\" does not exist",
                category.table()
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl PluginAdapter for MockStore {
    fn name(&self) -> &str {
        "mock-store"
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Storage
    }

    /// Unhealthy while the profile table is failing.
    async fn health_check(&self) -> Result<HealthStatus, VctrError> {
        let failing = self
            .failing
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .contains(&Category::Profile);
        Ok(if failing {
            HealthStatus::Unhealthy("relation \"public.profile\" does not exist".to_string())
        } else {
            HealthStatus::Healthy
        })
    }
}

#[async_trait]
impl DataStore for MockStore {
    async fn select_all(&self, category: Category) -> Result<Vec<Row>, VctrError> {
        self.record(StoreCall::All(category))?;
        Ok(self.lock_tables().get(&category).cloned().unwrap_or_default())
    }

    async fn select_page(
        &self,
        category: Category,
        offset: u64,
        limit: u64,
    ) -> Result<RowPage, VctrError> {
        self.record(StoreCall::Page {
            category,
            offset,
            limit,
        })?;
        let tables = self.lock_tables();
        let all = tables.get(&category).map(Vec::as_slice).unwrap_or_default();
        let rows = all
            .iter()
            .skip(offset as usize)
            .take(limit as usize)
            .cloned()
            .collect();
        Ok(RowPage {
            rows,
            total: all.len() as u64,
        })
    }
}
