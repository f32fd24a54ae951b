//! JSON messages exchanged over the catalog WebSocket.
//!
//! Every message is an object tagged by `"type"`:
//!
//! ```text
//! client -> server                       server -> client
//! {"type":"get_data"}                    {"type":"data_update","data":[...],"summary":{...}}
//! {"type":"import_csv","rows":[[..]]}    {"type":"error","code":"...","message":"..."}
//! {"type":"update_description","id":1,"description":"..."}
//! {"type":"remove_photo","id":1,"file_full":"...","file_thumb":"..."}
//! {"type":"update_photo_order","id":1,"new_order":["..."]}
//! {"type":"clear_data","pin":"...."}
//! ```

use axum::extract::ws::Message;
use serde::{Deserialize, Serialize};
use skudesk_core::item::{CatalogSummary, Item};
use skudesk_core::types::ItemId;

use crate::error::AppError;

/// A request from a browser client.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Ask for the current catalog (answered to this client only).
    GetData,
    /// Replace the catalog with rows parsed client-side.
    ImportCsv { rows: Vec<Vec<String>> },
    UpdateDescription { id: ItemId, description: String },
    RemovePhoto {
        id: ItemId,
        file_full: String,
        file_thumb: String,
    },
    /// `new_order` lists photo `full` names in display order.
    UpdatePhotoOrder { id: ItemId, new_order: Vec<String> },
    ClearData {
        #[serde(default)]
        pin: String,
    },
}

/// A message pushed to browser clients.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage<'a> {
    DataUpdate {
        data: &'a [Item],
        summary: CatalogSummary,
    },
    Error {
        code: &'static str,
        message: String,
    },
}

impl<'a> ServerMessage<'a> {
    pub fn data_update(items: &'a [Item]) -> Self {
        Self::DataUpdate {
            data: items,
            summary: CatalogSummary::from_items(items),
        }
    }

    /// Client-safe rendering of an operation failure.
    pub fn error(err: &AppError) -> Self {
        let (_, code, message) = err.classify();
        Self::Error { code, message }
    }

    /// Serialize into a text frame.
    pub fn to_ws(&self) -> Message {
        // Serializing these plain structs cannot fail.
        let json = serde_json::to_string(self).unwrap_or_default();
        Message::Text(json.into())
    }
}
