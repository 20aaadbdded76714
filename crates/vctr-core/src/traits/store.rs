// SPDX-FileCopyrightText: 2026 VCTR Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Data store trait for the read-only portfolio tables.

use async_trait::async_trait;

use crate::error::VctrError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{Category, Row, RowPage};

/// Read-only access to the portfolio tables.
///
/// Tables are addressed by [`Category`] only, so caller-supplied strings
/// never reach the backend as a table identifier.
#[async_trait]
pub trait DataStore: PluginAdapter {
    /// Fetches every row of the category's table.
    async fn select_all(&self, category: Category) -> Result<Vec<Row>, VctrError>;

    /// Fetches `limit` rows starting at `offset`, with the exact total count.
    async fn select_page(
        &self,
        category: Category,
        offset: u64,
        limit: u64,
    ) -> Result<RowPage, VctrError>;
}
