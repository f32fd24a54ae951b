//! Route definitions for the `/items` resource.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::{items, photos};
use crate::state::AppState;

/// Routes mounted at `/items`.
///
/// ```text
/// GET    /                     -> list_items
/// POST   /import               -> import_csv (multipart `file`)
/// POST   /import/rows          -> import_rows
/// POST   /import/sheet         -> import_sheet
/// POST   /clear                -> clear
/// PUT    /{id}/description     -> update_description
/// POST   /{id}/photos          -> upload_item_photos
/// DELETE /{id}/photos          -> remove_photo
/// PUT    /{id}/photos/order    -> reorder_photos
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(items::list_items))
        .route("/import", post(items::import_csv))
        .route("/import/rows", post(items::import_rows))
        .route("/import/sheet", post(items::import_sheet))
        .route("/clear", post(items::clear))
        .route("/{id}/description", put(items::update_description))
        .route(
            "/{id}/photos",
            post(photos::upload_item_photos).delete(items::remove_photo),
        )
        .route("/{id}/photos/order", put(items::reorder_photos))
}
