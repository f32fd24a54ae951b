//! Shared response envelope types for API handlers.
//!
//! All API responses use a `{ "data": ... }` envelope. Use [`DataResponse`]
//! instead of ad-hoc `serde_json::json!({ "data": ... })`.

use serde::Serialize;
use skudesk_core::item::{CatalogSummary, Item};

/// Standard `{ "data": T }` response envelope.
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}

/// The catalog together with its completion counters.
///
/// Returned by every catalog read and mutation, and pushed to WebSocket
/// clients as the `data_update` payload.
#[derive(Debug, Clone, Serialize)]
pub struct CatalogSnapshot {
    pub items: Vec<Item>,
    pub summary: CatalogSummary,
}

impl CatalogSnapshot {
    pub fn new(items: Vec<Item>) -> Self {
        let summary = CatalogSummary::from_items(&items);
        Self { items, summary }
    }
}
