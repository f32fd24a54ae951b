//! Route definitions for the `/export` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::export;
use crate::state::AppState;

/// Routes mounted at `/export`.
///
/// ```text
/// GET /photos         -> export_photos (ZIP)
/// GET /descriptions   -> export_descriptions (CSV)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/photos", get(export::export_photos))
        .route("/descriptions", get(export::export_descriptions))
}
