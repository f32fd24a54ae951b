//! Export downloads: the photo archive and the description sheet.

use std::collections::HashMap;

use axum::extract::State;
use axum::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use axum::response::{IntoResponse, Response};
use skudesk_core::export::{
    build_description_csv, build_photo_archive, complete_items, DESCRIPTION_CSV_NAME,
    PHOTO_ARCHIVE_NAME,
};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

fn attachment(content_type: &'static str, file_name: &str, body: Vec<u8>) -> Response {
    (
        [
            (CONTENT_TYPE, content_type.to_string()),
            (
                CONTENT_DISPOSITION,
                format!("attachment; filename=\"{file_name}\""),
            ),
        ],
        body,
    )
        .into_response()
}

/// GET /api/v1/export/photos
///
/// ZIP of the photos of every complete item. 400 when nothing is complete.
pub async fn export_photos(user: AuthUser, State(state): State<AppState>) -> AppResult<Response> {
    let items = state.catalog.load().await?;

    let mut files: HashMap<String, Vec<u8>> = HashMap::new();
    for item in complete_items(&items) {
        for photo in &item.photos {
            if let Some(bytes) = state.uploads.read(&photo.full).await? {
                files.insert(photo.full.clone(), bytes);
            } else {
                tracing::warn!(item_id = item.id, file = %photo.full, "Photo file missing, skipped in export");
            }
        }
    }

    let archive = tokio::task::spawn_blocking(move || {
        build_photo_archive(&items, |name| files.get(name).cloned())
    })
    .await
    .map_err(|e| AppError::InternalError(format!("Archive task failed: {e}")))??;

    tracing::info!(username = %user.username, bytes = archive.len(), "Photo archive exported");
    Ok(attachment("application/zip", PHOTO_ARCHIVE_NAME, archive))
}

/// GET /api/v1/export/descriptions
///
/// CSV of SKU, title and description of every complete item.
pub async fn export_descriptions(
    user: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Response> {
    let items = state.catalog.load().await?;
    let csv = build_description_csv(&items)?;

    tracing::info!(username = %user.username, bytes = csv.len(), "Descriptions exported");
    Ok(attachment("text/csv; charset=utf-8", DESCRIPTION_CSV_NAME, csv))
}
