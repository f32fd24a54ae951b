pub mod auth;
pub mod export;
pub mod health;
pub mod items;

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::photos;
use crate::state::AppState;
use crate::ws;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /ws                                   WebSocket (token in query)
///
/// /auth/login                           login (public)
///
/// /items                                list
/// /items/import                         CSV file import
/// /items/import/rows                    pre-parsed rows import
/// /items/import/sheet                   spreadsheet import
/// /items/clear                          wipe catalog + uploads (PIN)
/// /items/{id}/description               update description
/// /items/{id}/photos                    upload (POST), remove (DELETE)
/// /items/{id}/photos/order              reorder
///
/// /photos                               upload form with `id` field
///
/// /export/photos                        ZIP of complete items
/// /export/descriptions                  CSV of complete items
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/ws", get(ws::ws_handler))
        .nest("/auth", auth::router())
        .nest("/items", items::router())
        .route("/photos", post(photos::upload_photos_form))
        .nest("/export", export::router())
}
